//! Mock filesystem implementations for testing.
//!
//! This module provides `MockFs` and pre-built GPU host scenarios for testing
//! the labeling pipeline without real sysfs/devfs/debugfs access.

mod filesystem;
mod scenarios;

pub use filesystem::MockFs;
