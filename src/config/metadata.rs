// file: src/config/metadata.rs
// version: 1.0.0
// guid: 8b3f6e27-a410-4c9d-b25e-d07c9a1f3e84

//! Step metadata: parameter names, scopes, aliases and requirements

use super::PipelineConfig;
use crate::error::{MavenError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where a parameter may be configured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Scope {
    General,
    Parameters,
    Stages,
    Steps,
}

/// Alternative name of a step or parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub name: String,
    #[serde(default)]
    pub deprecated: bool,
}

impl Alias {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            deprecated: false,
        }
    }
}

/// Description of one step parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepParameter {
    pub name: String,
    pub scope: Vec<Scope>,
    #[serde(rename = "type")]
    pub kind: String,
    pub mandatory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default)]
    pub aliases: Vec<Alias>,
}

/// Metadata of a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepData {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<Alias>,
    pub parameters: Vec<StepParameter>,
}

impl StepData {
    /// Find a parameter by name
    pub fn parameter(&self, name: &str) -> Option<&StepParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Section names under which this step may be configured
    fn section_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(|a| a.name.as_str()))
    }

    /// Resolve every parameter.
    ///
    /// Explicit values (flags or environment) win, then the step section,
    /// then the general section for parameters with general scope, then the
    /// parameter default. Missing mandatory parameters are an error.
    pub fn resolve(
        &self,
        explicit: &BTreeMap<String, String>,
        config: &PipelineConfig,
    ) -> Result<BTreeMap<String, String>> {
        let mut resolved = BTreeMap::new();
        let mut missing = Vec::new();

        for parameter in &self.parameters {
            let value = explicit
                .get(&parameter.name)
                .filter(|v| !v.is_empty())
                .cloned()
                .or_else(|| self.from_config(parameter, config))
                .or_else(|| parameter.default.clone());

            match value {
                Some(value) => {
                    resolved.insert(parameter.name.clone(), value);
                }
                None if parameter.mandatory => missing.push(parameter.name.clone()),
                None => {}
            }
        }

        if !missing.is_empty() {
            return Err(MavenError::config(format!(
                "the following parameters are mandatory for step '{}': {}",
                self.name,
                missing.join(", ")
            )));
        }

        Ok(resolved)
    }

    fn from_config(&self, parameter: &StepParameter, config: &PipelineConfig) -> Option<String> {
        let keys: Vec<&str> = std::iter::once(parameter.name.as_str())
            .chain(parameter.aliases.iter().map(|a| a.name.as_str()))
            .collect();

        if parameter.scope.contains(&Scope::Steps) {
            for section in self.section_names() {
                if let Some(value) = keys.iter().find_map(|key| config.step_value(section, key)) {
                    return Some(value);
                }
            }
        }

        if parameter.scope.contains(&Scope::General) {
            return keys.iter().find_map(|key| config.general_value(key));
        }

        None
    }
}
