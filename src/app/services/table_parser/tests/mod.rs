//! Tests for table parsing: header location, column resolution and
//! normalization

pub mod header_tests;
pub mod normalizer_tests;
pub mod values_tests;
