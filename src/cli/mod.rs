//! CLI module for argument parsing and output formatting.
//!
//! This module provides command line argument parsing, output format
//! selection and the end-of-session migrations summary block.

pub mod args;
pub mod output;
pub mod summary;
