//! Dependency graph engine: property substitution, parent-chain inheritance,
//! dependency-management lookup, depth-bounded traversal, and graph output.

pub mod dot;
pub mod graph;
pub mod management;
pub mod manifest;
pub mod properties;
pub mod tree;
