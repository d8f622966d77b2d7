// file: src/telemetry.rs
// version: 1.0.0
// guid: f2a90c7e-5d18-4e63-b7a1-39c4d8e6f025

//! Step telemetry
//!
//! Telemetry is recorded as a single structured log event per step run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;
use tracing::info;

/// Error code reported while a step has not completed successfully
pub const ERROR_CODE_FAILURE: &str = "1";

/// Error code reported after a step completed successfully
pub const ERROR_CODE_SUCCESS: &str = "0";

/// Per-run data of a step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomData {
    pub step_name: String,
    pub error_code: String,
    /// Duration of the run in milliseconds
    pub duration: String,
    pub timestamp: DateTime<Utc>,
}

/// Collects and emits telemetry for one step run
#[derive(Debug)]
pub struct Telemetry {
    disabled: bool,
    started: Instant,
    data: CustomData,
    sent: bool,
}

impl Telemetry {
    /// Start recording for `step_name`; the run counts as failed until
    /// [`Telemetry::succeed`] is called.
    pub fn initialize(disabled: bool, step_name: &str) -> Self {
        Self {
            disabled,
            started: Instant::now(),
            data: CustomData {
                step_name: step_name.to_string(),
                error_code: ERROR_CODE_FAILURE.to_string(),
                duration: String::new(),
                timestamp: Utc::now(),
            },
            sent: false,
        }
    }

    /// Mark the run as successful
    pub fn succeed(&mut self) {
        self.data.error_code = ERROR_CODE_SUCCESS.to_string();
    }

    /// Current data
    pub fn data(&self) -> &CustomData {
        &self.data
    }

    /// Emit the telemetry event. Only the first call has an effect.
    pub fn send(&mut self) {
        if self.sent {
            return;
        }
        self.sent = true;
        self.data.duration = self.started.elapsed().as_millis().to_string();

        if self.disabled {
            return;
        }

        match serde_json::to_string(&self.data) {
            Ok(payload) => info!(target: "telemetry", step = %self.data.step_name, "{}", payload),
            Err(e) => tracing::debug!("Failed to serialize telemetry: {}", e),
        }
    }
}

impl Drop for Telemetry {
    fn drop(&mut self) {
        self.send();
    }
}
