//! Shared test utilities for dropzone integration tests.
//!
//! This module provides:
//! - `TestHarness` wiring a fresh store, simulator and link generator per test
//! - Builders for file descriptors and fixture records

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::{FailingStore, TestHarness};
