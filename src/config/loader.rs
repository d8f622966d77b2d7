// file: src/config/loader.rs
// version: 2.0.0
// guid: c7d1f5a9-3b2e-48c6-9d07-6f4a8e1b25c3

//! Pipeline configuration loading and environment variable substitution

use super::PipelineConfig;
use crate::error::MavenError;
use crate::Result;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Location of the pipeline configuration relative to the project root
pub const DEFAULT_CONFIG_PATH: &str = ".pipeline/config.yml";

/// Configuration loader with environment variable substitution
pub struct ConfigLoader {
    env_vars: HashMap<String, String>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self {
            env_vars: std::env::vars().collect(),
        }
    }

    /// Load the pipeline configuration.
    ///
    /// An explicitly given path must exist. Without one the default location
    /// is tried and a missing file yields an empty configuration.
    pub fn load_pipeline_config(&self, path: Option<&Path>) -> Result<PipelineConfig> {
        let path = match path {
            Some(path) => path,
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if !default.exists() {
                    debug!("No pipeline config at {}, using defaults", DEFAULT_CONFIG_PATH);
                    return Ok(PipelineConfig::default());
                }
                default
            }
        };

        let content = fs::read_to_string(path).map_err(|e| {
            MavenError::config(format!(
                "Failed to read pipeline config file {}: {}",
                path.display(),
                e
            ))
        })?;

        self.parse(&content)
    }

    /// Parse configuration content after expanding environment variables
    pub fn parse(&self, content: &str) -> Result<PipelineConfig> {
        let expanded = self.expand_env_vars(content)?;
        if expanded.trim().is_empty() {
            return Ok(PipelineConfig::default());
        }
        Ok(serde_yaml::from_str(&expanded)?)
    }

    /// Expand `${VAR}` references in configuration content
    fn expand_env_vars(&self, content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| MavenError::config(format!("Invalid regex pattern: {}", e)))?;

        let mut missing_vars = Vec::new();
        let result = re.replace_all(content, |cap: &regex::Captures| {
            let var_name = &cap[1];
            match self.env_vars.get(var_name) {
                Some(value) => value.clone(),
                None => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    cap[0].to_string()
                }
            }
        });

        if !missing_vars.is_empty() {
            return Err(MavenError::config(format!(
                "Missing environment variables: {}",
                missing_vars.join(", ")
            )));
        }

        Ok(result.into_owned())
    }

    /// Set environment variable for substitution
    pub fn set_env_var(&mut self, key: String, value: String) {
        self.env_vars.insert(key, value);
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_env_var_expansion() {
        let mut loader = ConfigLoader::new();
        loader.set_env_var("TEST_NEXUS_HOST".to_string(), "nexus.local".to_string());

        let content = "url: ${TEST_NEXUS_HOST}:8081";
        let result = loader.expand_env_vars(content).unwrap();
        assert_eq!(result, "url: nexus.local:8081");
    }

    #[test]
    fn test_missing_env_var() {
        let loader = ConfigLoader::new();
        let content = "key: ${MISSING_VAR_FOR_TEST} ${MISSING_VAR_FOR_TEST}";

        let result = loader.expand_env_vars(content);
        let message = result.unwrap_err().to_string();
        assert!(message.contains("Missing environment variables: MISSING_VAR_FOR_TEST"));
        assert!(!message.contains("MISSING_VAR_FOR_TEST, MISSING_VAR_FOR_TEST"));
    }

    #[test]
    fn test_load_pipeline_config() -> Result<()> {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
general:
  maven:
    globalSettingsFile: https://example.com/settings.xml
steps:
  nexusUpload:
    repository: ${{TEST_REPOSITORY}}
"#
        )
        .unwrap();

        let mut loader = ConfigLoader::new();
        loader.set_env_var("TEST_REPOSITORY".to_string(), "snapshots".to_string());
        let config = loader.load_pipeline_config(Some(file.path()))?;

        assert_eq!(
            config.general_value("maven/globalSettingsFile").as_deref(),
            Some("https://example.com/settings.xml")
        );
        assert_eq!(
            config.step_value("nexusUpload", "repository").as_deref(),
            Some("snapshots")
        );
        Ok(())
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let loader = ConfigLoader::new();
        let result = loader.load_pipeline_config(Some(Path::new("/nonexistent/config.yml")));
        assert!(matches!(result, Err(MavenError::Config(_))));
    }

    #[test]
    fn test_empty_content_is_default() {
        let loader = ConfigLoader::new();
        assert_eq!(loader.parse("").unwrap(), PipelineConfig::default());
    }
}
