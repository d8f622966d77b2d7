// file: src/maven/mod.rs
// version: 1.0.0
// guid: b05d3e8f-7c21-4a96-8f4b-e19a6c03d572

//! Maven step wrapper
//!
//! Builds `mvn` command lines from option structs, evaluates pom
//! expressions and installs module artifacts into the local repository.

pub mod execute;
pub mod install;
pub mod options;
pub mod utils;

pub use execute::{evaluate, execute, parameters_from_options, test_modules_excludes, MAVEN_EXECUTABLE};
pub use install::{install_file, install_maven_artifacts};
pub use options::{EvaluateOptions, ExecuteOptions};
pub use utils::{MavenUtils, SystemMavenUtils};
