// file: src/lib.rs
// version: 3.0.0
// guid: c3e81f47-0a6d-4b92-8d35-f7a2b04e9c16

//! # Maven Steps
//!
//! Pipeline steps around the Maven build tool. Options structs are turned
//! into correctly ordered `mvn` command lines and run through an injectable
//! process runner. On top of that sit expression evaluation, installation of
//! module artifacts into the local repository and uploading artifacts to a
//! Nexus Repository Manager.

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod maven;
pub mod nexus;
pub mod telemetry;

pub use error::{MavenError, Result};

/// Version information for the utility
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
