//! Tests for the idempotency ledger

pub mod ledger_tests;
