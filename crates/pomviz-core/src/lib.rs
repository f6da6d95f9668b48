//! Core data types for pomviz.
//!
//! This crate defines the package coordinate used as graph node identity and
//! the run configuration (config file plus command-line overrides).
//!
//! This crate is intentionally free of async code and network I/O.

pub mod config;
pub mod coordinate;
