// file: src/maven/execute.rs
// version: 1.0.0
// guid: e4b8a6c2-1f37-49d0-8c5a-72b9d3e01f58

//! Maven command line construction, execution and expression evaluation

use super::options::{non_empty, EvaluateOptions, ExecuteOptions};
use super::utils::MavenUtils;
use crate::error::{MavenError, Result, ResultExt};
use crate::executor::{command_line, ExecRunner, StdoutMode};
use tracing::{debug, info};

/// Name of the Maven executable
pub const MAVEN_EXECUTABLE: &str = "mvn";

/// Goal used to evaluate expressions against a pom
pub const HELP_PLUGIN_EVALUATE: &str = "org.apache.maven.plugins:maven-help-plugin:3.1.0:evaluate";

/// Download target for a global settings file given as URL
pub const GLOBAL_SETTINGS_TARGET: &str = ".pipeline/mavenGlobalSettings.xml";

/// Download target for a project settings file given as URL
pub const PROJECT_SETTINGS_TARGET: &str = ".pipeline/mavenProjectSettings.xml";

/// Silences the per-artifact download log of Maven
pub const TRANSFER_LOG_WARN_ONLY: &str =
    "-Dorg.slf4j.simpleLogger.log.org.apache.maven.cli.transfer.Slf4jMavenTransferListener=warn";

const UNRESOLVED_EXPRESSION: &str = "null object or invalid expression";

/// Build a `mvn` command line from `options` and run it.
///
/// Standard output always goes to the log. With `return_stdout` it is also
/// returned; otherwise the result is an empty string.
pub async fn execute<R, U>(options: &ExecuteOptions, runner: &mut R, utils: &mut U) -> Result<String>
where
    R: ExecRunner + ?Sized,
    U: MavenUtils + ?Sized,
{
    let parameters = parameters_from_options(options, utils)
        .await
        .context("failed to construct parameters from options")?;

    let stdout = if options.return_stdout {
        StdoutMode::Capture
    } else {
        StdoutMode::Log
    };

    let output = runner
        .run_executable(MAVEN_EXECUTABLE, &parameters, stdout)
        .await
        .with_context(|| {
            format!(
                "failed to run executable, command: '{}'",
                command_line(MAVEN_EXECUTABLE, &parameters)
            )
        })?;

    Ok(match stdout {
        StdoutMode::Capture => output,
        StdoutMode::Log => String::new(),
    })
}

/// Evaluate `expression` against a pom file using the help plugin.
///
/// This yields e.g. `project.version` exactly as Maven itself resolves it.
pub async fn evaluate<R, U>(
    options: &EvaluateOptions,
    expression: &str,
    runner: &mut R,
    utils: &mut U,
) -> Result<String>
where
    R: ExecRunner + ?Sized,
    U: MavenUtils + ?Sized,
{
    let execute_options = ExecuteOptions {
        goals: vec![HELP_PLUGIN_EVALUATE.to_string()],
        defines: vec![
            format!("-Dexpression={}", expression),
            "-DforceStdout".to_string(),
            "-q".to_string(),
        ],
        return_stdout: true,
        ..ExecuteOptions::from(options)
    };

    let value = execute(&execute_options, runner, utils).await?;
    if value.starts_with(UNRESOLVED_EXPRESSION) {
        return Err(MavenError::validation(format!(
            "expression '{}' in file '{}' could not be resolved",
            expression,
            options.pom_path.as_deref().unwrap_or_default()
        )));
    }

    debug!("Evaluated '{}' to '{}'", expression, value);
    Ok(value)
}

/// Translate `options` into `mvn` parameters.
///
/// The order is fixed: settings, local repository, pom, flags, defines,
/// transfer logging, batch mode, goals.
pub async fn parameters_from_options<U>(options: &ExecuteOptions, utils: &mut U) -> Result<Vec<String>>
where
    U: MavenUtils + ?Sized,
{
    let mut parameters = Vec::new();

    if let Some(global_settings) = non_empty(&options.global_settings_file) {
        let file = download_settings_if_url(global_settings, GLOBAL_SETTINGS_TARGET, utils).await?;
        parameters.push("--global-settings".to_string());
        parameters.push(file);
    }

    if let Some(project_settings) = non_empty(&options.project_settings_file) {
        let file = download_settings_if_url(project_settings, PROJECT_SETTINGS_TARGET, utils).await?;
        parameters.push("--settings".to_string());
        parameters.push(file);
    }

    if let Some(m2_path) = non_empty(&options.m2_path) {
        parameters.push(format!("-Dmaven.repo.local={}", m2_path));
    }

    if let Some(pom_path) = non_empty(&options.pom_path) {
        parameters.push("--file".to_string());
        parameters.push(pom_path.to_string());
    }

    parameters.extend(options.flags.iter().cloned());
    parameters.extend(options.defines.iter().cloned());

    if !options.log_successful_maven_transfers {
        parameters.push(TRANSFER_LOG_WARN_ONLY.to_string());
    }

    parameters.push("--batch-mode".to_string());
    parameters.extend(options.goals.iter().cloned());

    Ok(parameters)
}

/// Module exclusions for the conventional `unit-tests` and
/// `integration-tests` modules, when present.
pub fn test_modules_excludes<U>(utils: &U) -> Vec<String>
where
    U: MavenUtils + ?Sized,
{
    let mut excludes = Vec::new();
    for module in ["unit-tests", "integration-tests"] {
        if utils
            .file_exists(&format!("{}/pom.xml", module))
            .unwrap_or(false)
        {
            excludes.push("-pl".to_string());
            excludes.push(format!("!{}", module));
        }
    }
    excludes
}

fn is_url(value: &str) -> bool {
    value.starts_with("http:") || value.starts_with("https:")
}

async fn download_settings_if_url<U>(value: &str, target: &str, utils: &mut U) -> Result<String>
where
    U: MavenUtils + ?Sized,
{
    if !is_url(value) {
        return Ok(value.to_string());
    }

    if utils.file_exists(target).unwrap_or(false) {
        info!(
            "Not downloading maven settings file, because it already exists at '{}'",
            target
        );
        return Ok(target.to_string());
    }

    utils.download_file(value, target).await.with_context(|| {
        format!(
            "failed to download maven settings from URL '{}' to file '{}'",
            value, target
        )
    })?;

    Ok(target.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::mock::RecordingRunner;
    use crate::maven::utils::mock::MockUtils;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_parameters_full_order() {
        let options = ExecuteOptions {
            pom_path: Some("pom.xml".to_string()),
            project_settings_file: Some("settings.xml".to_string()),
            global_settings_file: Some("global.xml".to_string()),
            m2_path: Some(".m2".to_string()),
            goals: strings(&["clean", "install"]),
            defines: strings(&["-DskipTests"]),
            flags: strings(&["-U", "-e"]),
            log_successful_maven_transfers: false,
            return_stdout: false,
        };
        let mut utils = MockUtils::new();

        let parameters = parameters_from_options(&options, &mut utils).await.unwrap();
        assert_eq!(
            parameters,
            strings(&[
                "--global-settings",
                "global.xml",
                "--settings",
                "settings.xml",
                "-Dmaven.repo.local=.m2",
                "--file",
                "pom.xml",
                "-U",
                "-e",
                "-DskipTests",
                TRANSFER_LOG_WARN_ONLY,
                "--batch-mode",
                "clean",
                "install",
            ])
        );
    }

    #[tokio::test]
    async fn test_parameters_minimal_with_transfer_logging() {
        let options = ExecuteOptions {
            goals: strings(&["verify"]),
            log_successful_maven_transfers: true,
            ..ExecuteOptions::default()
        };
        let mut utils = MockUtils::new();

        let parameters = parameters_from_options(&options, &mut utils).await.unwrap();
        assert_eq!(parameters, strings(&["--batch-mode", "verify"]));
    }

    #[tokio::test]
    async fn test_empty_strings_are_ignored() {
        let options = ExecuteOptions {
            pom_path: Some(String::new()),
            m2_path: Some(String::new()),
            log_successful_maven_transfers: true,
            ..ExecuteOptions::default()
        };
        let mut utils = MockUtils::new();

        let parameters = parameters_from_options(&options, &mut utils).await.unwrap();
        assert_eq!(parameters, strings(&["--batch-mode"]));
    }

    #[tokio::test]
    async fn test_settings_urls_are_downloaded() {
        let options = ExecuteOptions {
            global_settings_file: Some("https://example.com/global.xml".to_string()),
            project_settings_file: Some("http://example.com/project.xml".to_string()),
            log_successful_maven_transfers: true,
            ..ExecuteOptions::default()
        };
        let mut utils = MockUtils::new();

        let parameters = parameters_from_options(&options, &mut utils).await.unwrap();
        assert_eq!(
            parameters,
            strings(&[
                "--global-settings",
                GLOBAL_SETTINGS_TARGET,
                "--settings",
                PROJECT_SETTINGS_TARGET,
                "--batch-mode",
            ])
        );
        assert_eq!(
            utils.downloads,
            vec![
                (
                    "https://example.com/global.xml".to_string(),
                    GLOBAL_SETTINGS_TARGET.to_string()
                ),
                (
                    "http://example.com/project.xml".to_string(),
                    PROJECT_SETTINGS_TARGET.to_string()
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_existing_settings_file_is_not_downloaded_again() {
        let options = ExecuteOptions {
            project_settings_file: Some("https://example.com/project.xml".to_string()),
            ..ExecuteOptions::default()
        };
        let mut utils = MockUtils::new().with_files(&[PROJECT_SETTINGS_TARGET]);

        let parameters = parameters_from_options(&options, &mut utils).await.unwrap();
        assert_eq!(parameters[..2], strings(&["--settings", PROJECT_SETTINGS_TARGET])[..]);
        assert!(utils.downloads.is_empty());
    }

    #[tokio::test]
    async fn test_failed_download_aborts_execution() {
        let options = ExecuteOptions {
            global_settings_file: Some("https://example.com/global.xml".to_string()),
            goals: strings(&["install"]),
            ..ExecuteOptions::default()
        };
        let mut utils = MockUtils {
            fail_download: true,
            ..MockUtils::new()
        };
        let mut runner = RecordingRunner::default();

        let err = execute(&options, &mut runner, &mut utils).await.unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("failed to construct parameters from options"));
        assert!(message.contains(
            "failed to download maven settings from URL 'https://example.com/global.xml' to file '.pipeline/mavenGlobalSettings.xml'"
        ));
        assert!(runner.calls.is_empty());
    }

    #[tokio::test]
    async fn test_execute_without_return_stdout() {
        let options = ExecuteOptions {
            goals: strings(&["install"]),
            ..ExecuteOptions::default()
        };
        let mut runner = RecordingRunner::with_outputs(["ignored"]);
        let mut utils = MockUtils::new();

        let output = execute(&options, &mut runner, &mut utils).await.unwrap();
        assert_eq!(output, "");
        assert_eq!(runner.calls.len(), 1);
        assert_eq!(runner.calls[0].executable, MAVEN_EXECUTABLE);
        assert_eq!(runner.calls[0].stdout, StdoutMode::Log);
    }

    #[tokio::test]
    async fn test_execute_returns_stdout() {
        let options = ExecuteOptions {
            goals: strings(&["help:effective-pom"]),
            return_stdout: true,
            ..ExecuteOptions::default()
        };
        let mut runner = RecordingRunner::with_outputs(["<project/>"]);
        let mut utils = MockUtils::new();

        let output = execute(&options, &mut runner, &mut utils).await.unwrap();
        assert_eq!(output, "<project/>");
        assert_eq!(runner.calls[0].stdout, StdoutMode::Capture);
    }

    #[tokio::test]
    async fn test_execute_error_names_command_line() {
        let options = ExecuteOptions {
            goals: strings(&["deploy"]),
            log_successful_maven_transfers: true,
            ..ExecuteOptions::default()
        };
        let mut runner = RecordingRunner::default().fail_on("deploy");
        let mut utils = MockUtils::new();

        let err = execute(&options, &mut runner, &mut utils).await.unwrap_err();
        assert!(err
            .to_string()
            .starts_with("failed to run executable, command: 'mvn --batch-mode deploy'"));
    }

    #[tokio::test]
    async fn test_evaluate_builds_help_plugin_call() {
        let options = EvaluateOptions {
            pom_path: Some("pom.xml".to_string()),
            m2_path: Some(".m2".to_string()),
            ..EvaluateOptions::default()
        };
        let mut runner = RecordingRunner::with_outputs(["1.0.0-SNAPSHOT"]);
        let mut utils = MockUtils::new();

        let value = evaluate(&options, "project.version", &mut runner, &mut utils)
            .await
            .unwrap();
        assert_eq!(value, "1.0.0-SNAPSHOT");
        assert_eq!(
            runner.params(0),
            &strings(&[
                "-Dmaven.repo.local=.m2",
                "--file",
                "pom.xml",
                "-Dexpression=project.version",
                "-DforceStdout",
                "-q",
                TRANSFER_LOG_WARN_ONLY,
                "--batch-mode",
                HELP_PLUGIN_EVALUATE,
            ])[..]
        );
    }

    #[tokio::test]
    async fn test_evaluate_unresolved_expression() {
        let options = EvaluateOptions {
            pom_path: Some("pom.xml".to_string()),
            ..EvaluateOptions::default()
        };
        let mut runner =
            RecordingRunner::with_outputs(["null object or invalid expression: project.foo"]);
        let mut utils = MockUtils::new();

        let err = evaluate(&options, "project.foo", &mut runner, &mut utils)
            .await
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("expression 'project.foo' in file 'pom.xml' could not be resolved"));
    }

    #[test]
    fn test_test_modules_excludes() {
        let utils = MockUtils::new();
        assert!(test_modules_excludes(&utils).is_empty());

        let utils = MockUtils::new().with_files(&["unit-tests/pom.xml"]);
        assert_eq!(test_modules_excludes(&utils), strings(&["-pl", "!unit-tests"]));

        let utils =
            MockUtils::new().with_files(&["integration-tests/pom.xml", "unit-tests/pom.xml"]);
        assert_eq!(
            test_modules_excludes(&utils),
            strings(&["-pl", "!unit-tests", "-pl", "!integration-tests"])
        );
    }
}
