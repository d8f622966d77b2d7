// file: src/cli/mod.rs
// version: 1.1.0
// guid: 64a0c9e2-3b57-4d18-9f6a-e8d21b5c704f

//! Command line interface for the Maven steps

pub mod args;
pub mod commands;

pub use args::Cli;
pub use commands::*;
