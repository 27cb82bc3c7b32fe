//! Tests for xlsx decoding
