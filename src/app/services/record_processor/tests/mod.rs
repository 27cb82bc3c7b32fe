//! Tests for deduplication and caption formatting
