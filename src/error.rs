// file: src/error.rs
// version: 3.0.0
// guid: 3f1c9a52-6b0e-4d27-9e84-1a5d7c2e9b60

use thiserror::Error;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, MavenError>;

/// Error types for the Maven step wrapper
#[derive(Error, Debug)]
pub enum MavenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Command execution error: {0}")]
    Execution(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An error wrapped with a description of the step that failed
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<MavenError>,
    },
}

impl MavenError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new execution error
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new file not found error
    pub fn file_not_found(msg: impl Into<String>) -> Self {
        Self::FileNotFound(msg.into())
    }

    /// Create a new network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Wrap this error with additional context
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Extension for attaching context to results
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;

    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(context))
    }

    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| e.context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_message_includes_source() {
        let err = MavenError::execution("exit code 1").context("failed to install maven artifacts");
        assert_eq!(
            err.to_string(),
            "failed to install maven artifacts: Command execution error: exit code 1"
        );
    }

    #[test]
    fn test_result_ext_with_context() {
        let result: Result<()> = Err(MavenError::validation("bad"));
        let err = result.with_context(|| format!("step {}", "x")).unwrap_err();
        assert!(err.to_string().starts_with("step x: "));
    }
}
