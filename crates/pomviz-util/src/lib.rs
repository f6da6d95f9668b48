//! Shared utilities for pomviz.
//!
//! This crate provides cross-cutting concerns used by the other pomviz crates:
//! the unified error type, filesystem helpers, external process spawning,
//! and terminal status output.

pub mod errors;
pub mod fs;
pub mod process;
pub mod progress;
