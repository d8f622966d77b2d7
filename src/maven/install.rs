// file: src/maven/install.rs
// version: 1.0.0
// guid: 27f9c1d4-8e6a-4b05-93d2-5a0e8b7c4f19

//! Installing build artifacts into the local Maven repository

use super::execute::{evaluate, execute};
use super::options::{EvaluateOptions, ExecuteOptions};
use super::utils::{parent_dir, MavenUtils};
use crate::error::{MavenError, Result, ResultExt};
use crate::executor::ExecRunner;
use tracing::{info, warn};

const POM_FILE: &str = "pom.xml";

/// Install an artifact and its pom into the local Maven repository.
///
/// With an empty `file` only the pom is installed. `pom_file` must not be empty.
pub async fn install_file<R, U>(
    file: &str,
    pom_file: &str,
    m2_path: Option<&str>,
    runner: &mut R,
    utils: &mut U,
) -> Result<()>
where
    R: ExecRunner + ?Sized,
    U: MavenUtils + ?Sized,
{
    if pom_file.is_empty() {
        return Err(MavenError::validation("pomFile can't be empty"));
    }

    let mut defines = Vec::new();
    if file.is_empty() {
        defines.push(format!("-Dfile={}", pom_file));
    } else {
        defines.push(format!("-Dfile={}", file));
        if file.contains(".jar") {
            defines.push("-Dpackaging=jar".to_string());
        }
        if file.contains("-classes") {
            defines.push("-Dclassifier=classes".to_string());
        }
    }
    defines.push(format!("-DpomFile={}", pom_file));

    let options = ExecuteOptions {
        goals: vec!["install:install-file".to_string()],
        defines,
        pom_path: Some(pom_file.to_string()),
        m2_path: m2_path.map(str::to_string),
        ..ExecuteOptions::default()
    };

    execute(&options, runner, utils)
        .await
        .context("failed to install maven artifacts")?;
    Ok(())
}

/// Find all Maven modules below the working directory and install their
/// artifacts into the local repository.
///
/// The root pom is flattened first so that CI friendly versions resolve.
/// Each module is handled from inside its own directory.
pub async fn install_maven_artifacts<R, U>(
    runner: &mut R,
    options: &EvaluateOptions,
    utils: &mut U,
) -> Result<()>
where
    R: ExecRunner + ?Sized,
    U: MavenUtils + ?Sized,
{
    flatten_pom(runner, utils).await?;

    let pom_files = utils.glob_pom_files()?;
    let old_working_directory = utils.getwd()?;

    // each module is evaluated from inside its own directory
    let options = EvaluateOptions {
        pom_path: Some(POM_FILE.to_string()),
        ..options.clone()
    };

    for pom_file in &pom_files {
        info!("Installing maven artifacts from module: {}", pom_file);
        utils.chdir(parent_dir(pom_file))?;

        let packaging = evaluate(&options, "project.packaging", runner, utils).await?;
        if packaging == "pom" {
            install_file("", POM_FILE, options.m2_path.as_deref(), runner, utils).await?;
        } else {
            install_jar_war_artifacts(runner, utils, &options).await?;
        }

        utils.chdir(&old_working_directory)?;
    }

    Ok(())
}

async fn install_jar_war_artifacts<R, U>(
    runner: &mut R,
    utils: &mut U,
    options: &EvaluateOptions,
) -> Result<()>
where
    R: ExecRunner + ?Sized,
    U: MavenUtils + ?Sized,
{
    let m2_path = options.m2_path.as_deref();
    let final_name = evaluate(options, "project.build.finalName", runner, utils).await?;

    if final_name.is_empty() {
        warn!("project.build.finalName is empty, skipping install of artifact. Installing only the pom file.");
        return install_file("", POM_FILE, m2_path, runner, utils).await;
    }

    let candidates = [
        jar_file(&final_name),
        war_file(&final_name),
        classes_jar_file(&final_name),
    ];
    // probe all before installing anything
    let present: Vec<bool> = candidates
        .iter()
        .map(|file| utils.file_exists(file).unwrap_or(false))
        .collect();

    for (file, exists) in candidates.iter().zip(present) {
        if exists {
            install_file(file, POM_FILE, m2_path, runner, utils).await?;
        }
    }

    Ok(())
}

async fn flatten_pom<R, U>(runner: &mut R, utils: &mut U) -> Result<()>
where
    R: ExecRunner + ?Sized,
    U: MavenUtils + ?Sized,
{
    let options = ExecuteOptions {
        goals: vec!["flatten:flatten".to_string()],
        defines: vec!["-Dflatten.mode=resolveCiFriendliesOnly".to_string()],
        pom_path: Some(POM_FILE.to_string()),
        ..ExecuteOptions::default()
    };
    execute(&options, runner, utils).await?;
    Ok(())
}

pub(crate) fn jar_file(final_name: &str) -> String {
    format!("target/{}.jar", final_name)
}

pub(crate) fn classes_jar_file(final_name: &str) -> String {
    format!("target/{}-classes.jar", final_name)
}

pub(crate) fn war_file(final_name: &str) -> String {
    format!("target/{}.war", final_name)
}
