// file: src/logging/mod.rs
// version: 1.1.0
// guid: 9c2f4a71-e85b-4d06-a3c9-74b1d6e08f25

//! Logging system for the Maven steps

pub mod logger;

pub use logger::{init_json_logger, init_logger, with_async_step_span};
