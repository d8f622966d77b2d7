// file: src/cli/commands.rs
// version: 2.0.0
// guid: 2d8e5b14-6f90-4ac7-83e2-b1f47c09a6d5

//! Command implementations for the CLI

use super::args::{MavenArgs, NexusUploadArgs};
use crate::{
    config::{ConfigLoader, PipelineConfig},
    executor::ProcessRunner,
    logging::with_async_step_span,
    maven::{self, EvaluateOptions, ExecuteOptions, SystemMavenUtils},
    nexus::{self, NexusUploadOptions},
    telemetry::Telemetry,
    Result,
};
use std::collections::BTreeMap;
use std::future::Future;
use std::path::PathBuf;
use tracing::{debug, info};

/// Settings shared by every command
#[derive(Debug, Clone, Default)]
pub struct StepContext {
    pub config_path: Option<PathBuf>,
    pub no_telemetry: bool,
    pub dry_run: bool,
}

impl StepContext {
    fn load_config(&self) -> Result<PipelineConfig> {
        ConfigLoader::new().load_pipeline_config(self.config_path.as_deref())
    }

    fn runner(&self) -> ProcessRunner {
        ProcessRunner::new().with_dry_run(self.dry_run)
    }
}

/// Run `step` inside its log span and report telemetry for it
async fn run_step<F, Fut, T>(ctx: &StepContext, step: &str, f: F) -> Result<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut telemetry = Telemetry::initialize(ctx.no_telemetry, step);
    let result = with_async_step_span(step, f).await;
    if result.is_ok() {
        telemetry.succeed();
    }
    telemetry.send();
    result
}

/// Run Maven with the given goals
pub async fn execute_command(
    ctx: &StepContext,
    maven_args: &MavenArgs,
    goals: Vec<String>,
    defines: Vec<String>,
    flags: Vec<String>,
    log_successful_maven_transfers: bool,
    return_stdout: bool,
) -> Result<()> {
    run_step(ctx, "mavenExecute", || async move {
        let config = ctx.load_config()?;
        let base = EvaluateOptions::resolve(&maven_args.explicit_values(), &config)?;
        let options = ExecuteOptions {
            goals,
            defines,
            flags,
            log_successful_maven_transfers,
            return_stdout,
            ..ExecuteOptions::from(&base)
        };

        let output = maven::execute(&options, &mut ctx.runner(), &mut SystemMavenUtils::new()).await?;
        if return_stdout {
            print!("{}", output);
        }
        Ok(())
    })
    .await
}

/// Evaluate an expression and print its value
pub async fn evaluate_command(ctx: &StepContext, maven_args: &MavenArgs, expression: &str) -> Result<()> {
    run_step(ctx, "mavenEvaluate", || async move {
        let config = ctx.load_config()?;
        let options = EvaluateOptions::resolve(&maven_args.explicit_values(), &config)?;

        let value = maven::evaluate(&options, expression, &mut ctx.runner(), &mut SystemMavenUtils::new())
            .await?;
        println!("{}", value);
        Ok(())
    })
    .await
}

/// Install a single artifact and its pom
pub async fn install_file_command(
    ctx: &StepContext,
    file: &str,
    pom_file: &str,
    m2_path: Option<&str>,
) -> Result<()> {
    run_step(ctx, "mavenInstallFile", || async move {
        let m2_path = resolve_m2_path(ctx, m2_path)?;
        maven::install_file(
            file,
            pom_file,
            m2_path.as_deref(),
            &mut ctx.runner(),
            &mut SystemMavenUtils::new(),
        )
        .await?;
        info!("Installed {} into the local repository", if file.is_empty() { pom_file } else { file });
        Ok(())
    })
    .await
}

/// Local repository from the flag, else from the Maven settings in the pipeline config
fn resolve_m2_path(ctx: &StepContext, m2_path: Option<&str>) -> Result<Option<String>> {
    let config = ctx.load_config()?;
    let explicit: BTreeMap<String, String> = m2_path
        .map(|path| ("m2Path".to_string(), path.to_string()))
        .into_iter()
        .collect();
    Ok(EvaluateOptions::resolve(&explicit, &config)?.m2_path)
}

/// Install the artifacts of all modules below the working directory
pub async fn install_artifacts_command(ctx: &StepContext, maven_args: &MavenArgs) -> Result<()> {
    run_step(ctx, "mavenInstallArtifacts", || async move {
        let config = ctx.load_config()?;
        let options = EvaluateOptions::resolve(&maven_args.explicit_values(), &config)?;

        maven::install_maven_artifacts(&mut ctx.runner(), &options, &mut SystemMavenUtils::new())
            .await?;
        info!("Maven artifacts installed");
        Ok(())
    })
    .await
}

/// Print the module exclusions for test modules
pub async fn test_module_excludes_command(ctx: &StepContext) -> Result<()> {
    run_step(ctx, "mavenTestModuleExcludes", || async move {
        let excludes = maven::test_modules_excludes(&SystemMavenUtils::new());
        debug!("Test module excludes: {:?}", excludes);
        println!("{}", excludes.join(" "));
        Ok(())
    })
    .await
}

/// Upload artifacts to Nexus
pub async fn nexus_upload_command(ctx: &StepContext, args: &NexusUploadArgs) -> Result<()> {
    run_step(ctx, nexus::STEP_NAME, || async move {
        let config = ctx.load_config()?;
        let options = NexusUploadOptions::resolve(&args.explicit_values(), &config)?;

        nexus::nexus_upload(&options, &mut ctx.runner(), &mut SystemMavenUtils::new()).await
    })
    .await
}
