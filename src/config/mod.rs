// file: src/config/mod.rs
// version: 2.0.0
// guid: 4a8e2c61-d93f-4b70-a5c8-1e7f06b92d3a

//! Pipeline configuration
//!
//! Step parameters not given on the command line are looked up in the
//! pipeline configuration file: first in the step's own section, then in the
//! general section.

pub mod loader;
pub mod metadata;

pub use loader::{ConfigLoader, DEFAULT_CONFIG_PATH};
pub use metadata::{Alias, Scope, StepData, StepParameter};

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;

/// Contents of the pipeline configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub general: Mapping,
    pub steps: HashMap<String, Mapping>,
}

impl PipelineConfig {
    /// Look up `key` in the general section
    pub fn general_value(&self, key: &str) -> Option<String> {
        lookup(&self.general, key)
    }

    /// Look up `key` in the section of `step`
    pub fn step_value(&self, step: &str, key: &str) -> Option<String> {
        self.steps.get(step).and_then(|section| lookup(section, key))
    }
}

/// Resolve a possibly nested key such as `nexus/url` inside `section`.
///
/// Scalars are rendered as strings; sequences and mappings as JSON.
fn lookup(section: &Mapping, key: &str) -> Option<String> {
    let mut parts = key.split('/');
    let first = parts.next()?;
    let mut value = section.get(first)?;
    for part in parts {
        value = value.as_mapping()?.get(part)?;
    }
    render(value)
}

fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Sequence(_) | Value::Mapping(_) => serde_json::to_string(value).ok(),
        Value::Tagged(tagged) => render(&tagged.value),
    }
}
