// file: src/executor.rs
// version: 3.0.0
// guid: 0b7e4d19-2c8a-4f63-a1d5-93e6f20c7b84

//! Process execution behind an injectable trait
//!
//! Every Maven invocation goes through [`ExecRunner`]. The real implementation
//! spawns the process with tokio and streams its output into the log; tests
//! substitute a recording runner.

use crate::error::{MavenError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

/// What to do with the standard output of a process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdoutMode {
    /// Stream to the log only
    Log,
    /// Stream to the log and return the raw output to the caller
    Capture,
}

/// Trait for running external executables
#[async_trait]
pub trait ExecRunner: Send {
    /// Add an environment variable for all subsequent runs
    fn env(&mut self, key: &str, value: &str);

    /// Whether commands are only logged instead of run
    fn is_dry_run(&self) -> bool {
        false
    }

    /// Run `executable` with `params`. Returns the captured standard output
    /// for [`StdoutMode::Capture`], an empty string otherwise.
    async fn run_executable(
        &mut self,
        executable: &str,
        params: &[String],
        stdout: StdoutMode,
    ) -> Result<String>;
}

/// Render an executable and its parameters as a single command line
pub fn command_line(executable: &str, params: &[String]) -> String {
    std::iter::once(executable)
        .chain(params.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs executables as child processes of the current working directory
#[derive(Debug, Default)]
pub struct ProcessRunner {
    env: Vec<(String, String)>,
    dry_run: bool,
}

impl ProcessRunner {
    /// Create a new process runner
    pub fn new() -> Self {
        Self::default()
    }

    /// Log commands instead of running them
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

#[async_trait]
impl ExecRunner for ProcessRunner {
    fn env(&mut self, key: &str, value: &str) {
        self.env.push((key.to_string(), value.to_string()));
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    async fn run_executable(
        &mut self,
        executable: &str,
        params: &[String],
        stdout: StdoutMode,
    ) -> Result<String> {
        if self.dry_run {
            info!("DRY RUN: Would execute: {}", command_line(executable, params));
            return Ok(String::new());
        }

        if which::which(executable).is_err() {
            return Err(MavenError::execution(format!(
                "Command not found: {}",
                executable
            )));
        }

        debug!("Executing: {}", command_line(executable, params));

        let mut child = Command::new(executable)
            .args(params)
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                MavenError::execution(format!("Failed to start {}: {}", executable, e))
            })?;

        let out = child
            .stdout
            .take()
            .ok_or_else(|| MavenError::execution("stdout of child process not captured"))?;
        let err = child
            .stderr
            .take()
            .ok_or_else(|| MavenError::execution("stderr of child process not captured"))?;

        let capture = stdout == StdoutMode::Capture;
        let (captured, _, status) = tokio::try_join!(
            forward_lines(out, "stdout", capture),
            forward_lines(err, "stderr", false),
            child.wait()
        )?;

        if !status.success() {
            return Err(MavenError::execution(format!(
                "{} failed with exit code: {:?}",
                executable,
                status.code()
            )));
        }

        Ok(captured)
    }
}

/// Log every line read from `reader`; keep the raw bytes when `capture` is set.
async fn forward_lines<R>(reader: R, stream: &'static str, capture: bool) -> std::io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut captured = Vec::new();
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            break;
        }
        info!(stream, "{}", String::from_utf8_lossy(&line).trim_end());
        if capture {
            captured.extend_from_slice(&line);
        }
    }

    Ok(String::from_utf8_lossy(&captured).into_owned())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        let params = vec!["--batch-mode".to_string(), "install".to_string()];
        assert_eq!(command_line("mvn", &params), "mvn --batch-mode install");
        assert_eq!(command_line("mvn", &[]), "mvn");
    }

    #[tokio::test]
    async fn test_dry_run_returns_empty_output() {
        let mut runner = ProcessRunner::new().with_dry_run(true);
        let output = runner
            .run_executable("definitely-not-installed-xyz", &[], StdoutMode::Capture)
            .await
            .unwrap();
        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn test_missing_executable_is_an_error() {
        let mut runner = ProcessRunner::new();
        let err = runner
            .run_executable("definitely-not-installed-xyz", &[], StdoutMode::Log)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Command not found"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_capture_keeps_raw_output() {
        let mut runner = ProcessRunner::new();
        let params = vec!["-n".to_string(), "1.2.3".to_string()];
        let output = runner
            .run_executable("echo", &params, StdoutMode::Capture)
            .await
            .unwrap();
        assert_eq!(output, "1.2.3");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_env_reaches_child_process() {
        let mut runner = ProcessRunner::new();
        runner.env("NEXUS_username", "x");
        let params = vec!["-c".to_string(), "printf %s \"$NEXUS_username\"".to_string()];
        let output = runner
            .run_executable("sh", &params, StdoutMode::Capture)
            .await
            .unwrap();
        assert_eq!(output, "x");
    }

    #[test]
    fn test_dry_run_flag_is_reported() {
        assert!(!ProcessRunner::new().is_dry_run());
        assert!(ProcessRunner::new().with_dry_run(true).is_dry_run());
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_dropped_run_kills_child() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let pid_file = temp_dir.path().join("pid");
        let script = format!("echo $$ > {}; exec sleep 30", pid_file.display());
        let params = vec!["-c".to_string(), script];

        let mut runner = ProcessRunner::new();
        let timed_out = tokio::time::timeout(
            std::time::Duration::from_millis(500),
            runner.run_executable("sh", &params, StdoutMode::Log),
        )
        .await;
        assert!(timed_out.is_err());

        let pid = std::fs::read_to_string(&pid_file).unwrap().trim().to_string();
        let stat = format!("/proc/{}/stat", pid);
        let mut gone = false;
        for _ in 0..40 {
            match std::fs::read_to_string(&stat) {
                // a killed child may linger as a zombie until reaped
                Ok(content) => {
                    let state = content.rsplit(')').next().unwrap_or_default().trim_start();
                    if state.starts_with('Z') || state.starts_with('X') {
                        gone = true;
                        break;
                    }
                }
                Err(_) => {
                    gone = true;
                    break;
                }
            }
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
        assert!(gone, "child {} still running", pid);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_an_error() {
        let mut runner = ProcessRunner::new();
        let err = runner
            .run_executable("false", &[], StdoutMode::Log)
            .await
            .unwrap_err();
        assert!(matches!(err, MavenError::Execution(_)));
    }
}
