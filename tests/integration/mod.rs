//! Integration tests for pylembic-preflight.
//!
//! These tests drive whole sessions against mock engines and on-disk fixtures.

pub mod cli_tests;
pub mod output_tests;
