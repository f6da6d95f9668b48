//! Maven repository protocol: POM parsing, repository layout, and manifest
//! fetching over HTTP or from a local directory.

pub mod fetch;
pub mod pom;
pub mod repository;
