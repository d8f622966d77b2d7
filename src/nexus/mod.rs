// file: src/nexus/mod.rs
// version: 1.0.0
// guid: 5e7c1a93-b6d2-4f08-9a34-c8e2f17d06b5

//! Nexus upload step
//!
//! Uploads the artifacts of a Maven project to a Nexus Repository Manager
//! by running Maven's `deploy:deploy-file` goal.

pub mod upload;

pub use upload::{nexus_upload, repository_url, NexusVersion};

use crate::config::{Alias, PipelineConfig, Scope, StepData, StepParameter};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the step, used for configuration lookup and telemetry
pub const STEP_NAME: &str = "nexusUpload";

/// Resolved options of the Nexus upload step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NexusUploadOptions {
    pub version: String,
    pub url: String,
    pub repository: String,
    pub group_id: String,
    pub artifact_id: String,
    pub global_settings_file: String,
    pub m2_path: String,
    pub additional_classifiers: String,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl NexusUploadOptions {
    /// Resolve options from explicit values and the pipeline configuration
    pub fn resolve(explicit: &BTreeMap<String, String>, config: &PipelineConfig) -> Result<Self> {
        let resolved = nexus_upload_metadata().resolve(explicit, config)?;
        let get = |name: &str| resolved.get(name).cloned().unwrap_or_default();

        Ok(Self {
            version: get("version"),
            url: get("url"),
            repository: get("repository"),
            group_id: get("groupId"),
            artifact_id: get("artifactId"),
            global_settings_file: get("globalSettingsFile"),
            m2_path: get("m2Path"),
            additional_classifiers: get("additionalClassifiers"),
            user: get("user"),
            password: get("password"),
        })
    }
}

fn parameter(name: &str, scope: &[Scope], mandatory: bool, aliases: &[&str]) -> StepParameter {
    StepParameter {
        name: name.to_string(),
        scope: scope.to_vec(),
        kind: "string".to_string(),
        mandatory,
        default: None,
        aliases: aliases.iter().map(|a| Alias::new(a)).collect(),
    }
}

/// Metadata of the Nexus upload step
pub fn nexus_upload_metadata() -> StepData {
    use Scope::*;

    let mut version = parameter("version", &[Parameters, Stages, Steps], false, &["nexus/version"]);
    version.default = Some(NexusVersion::Nexus3.as_str().to_string());

    StepData {
        name: STEP_NAME.to_string(),
        aliases: vec![Alias::new("mavenExecute")],
        parameters: vec![
            version,
            parameter("url", &[Parameters, Stages, Steps], true, &["nexus/url"]),
            parameter("repository", &[Parameters, Stages, Steps], true, &["nexus/repository"]),
            parameter("groupId", &[Parameters], false, &["nexus/groupId"]),
            parameter("artifactId", &[Parameters], false, &[]),
            parameter(
                "globalSettingsFile",
                &[General, Parameters, Stages, Steps],
                false,
                &["maven/globalSettingsFile"],
            ),
            parameter("m2Path", &[General, Parameters, Stages, Steps], false, &["maven/m2Path"]),
            parameter(
                "additionalClassifiers",
                &[Parameters, Stages, Steps],
                false,
                &["nexus/additionalClassifiers"],
            ),
            parameter("user", &[Parameters], false, &[]),
            parameter("password", &[Parameters], false, &[]),
        ],
    }
}
