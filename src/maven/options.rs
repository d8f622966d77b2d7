// file: src/maven/options.rs
// version: 1.0.0
// guid: 91c4e07b-5a3d-4f28-b6e9-0d82a7c5f316

//! Option types describing a Maven invocation

use crate::config::{Alias, PipelineConfig, Scope, StepData, StepParameter};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Step name under which Maven settings are configured
pub const MAVEN_STEP_NAME: &str = "mavenExecute";

/// Options used by [`execute`](super::execute) to construct the Maven command line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExecuteOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pom_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_settings_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_settings_file: Option<String>,
    #[serde(rename = "m2Path", skip_serializing_if = "Option::is_none")]
    pub m2_path: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub goals: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub defines: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub log_successful_maven_transfers: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub return_stdout: bool,
}

/// Options used by [`evaluate`](super::evaluate). Evaluation needs fewer
/// settings than a full execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EvaluateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pom_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_settings_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_settings_file: Option<String>,
    #[serde(rename = "m2Path", skip_serializing_if = "Option::is_none")]
    pub m2_path: Option<String>,
}

impl From<&EvaluateOptions> for ExecuteOptions {
    fn from(options: &EvaluateOptions) -> Self {
        Self {
            pom_path: options.pom_path.clone(),
            project_settings_file: options.project_settings_file.clone(),
            global_settings_file: options.global_settings_file.clone(),
            m2_path: options.m2_path.clone(),
            ..Self::default()
        }
    }
}

impl EvaluateOptions {
    /// Resolve options from explicit values and the pipeline configuration
    pub fn resolve(explicit: &BTreeMap<String, String>, config: &PipelineConfig) -> Result<Self> {
        let resolved = maven_metadata().resolve(explicit, config)?;
        let get = |name: &str| resolved.get(name).cloned();

        Ok(Self {
            pom_path: get("pomPath"),
            project_settings_file: get("projectSettingsFile"),
            global_settings_file: get("globalSettingsFile"),
            m2_path: get("m2Path"),
        })
    }
}

/// Metadata of the settings shared by all Maven steps
pub fn maven_metadata() -> StepData {
    let parameter = |name: &str, scope: &[Scope], alias: Option<&str>| StepParameter {
        name: name.to_string(),
        scope: scope.to_vec(),
        kind: "string".to_string(),
        mandatory: false,
        default: None,
        aliases: alias.map(Alias::new).into_iter().collect(),
    };
    let everywhere = [Scope::General, Scope::Parameters, Scope::Stages, Scope::Steps];

    StepData {
        name: MAVEN_STEP_NAME.to_string(),
        aliases: vec![],
        parameters: vec![
            parameter("pomPath", &[Scope::Parameters, Scope::Stages, Scope::Steps], None),
            parameter("projectSettingsFile", &everywhere, Some("maven/projectSettingsFile")),
            parameter("globalSettingsFile", &everywhere, Some("maven/globalSettingsFile")),
            parameter("m2Path", &everywhere, Some("maven/m2Path")),
        ],
    }
}

/// Treat empty strings the same as unset values
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
