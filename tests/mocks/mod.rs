//! Mock implementations for testing without a real alembic project.
//!
//! Provides a configurable validation engine and on-disk migration fixtures.

pub mod validator;
