//! Tests for pipeline orchestration
