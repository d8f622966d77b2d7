// file: src/nexus/upload.rs
// version: 1.0.0
// guid: a9d4f2b7-1c6e-4385-b0f7-6e3a9c25d8e1

//! Deploying Maven artifacts to Nexus

use super::NexusUploadOptions;
use crate::error::{MavenError, Result, ResultExt};
use crate::executor::ExecRunner;
use crate::maven::{evaluate, execute, EvaluateOptions, ExecuteOptions, MavenUtils};
use serde::Deserialize;
use std::str::FromStr;
use tracing::{debug, info};

/// Settings file holding the Nexus server entry
pub const SETTINGS_FILE: &str = ".pipeline/nexusUploadSettings.xml";

/// Environment variables the generated settings file reads credentials from
pub const USERNAME_ENV: &str = "NEXUS_username";
pub const PASSWORD_ENV: &str = "NEXUS_password";

/// Supported Nexus Repository Manager versions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NexusVersion {
    Nexus2,
    Nexus3,
}

impl NexusVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            NexusVersion::Nexus2 => "nexus2",
            NexusVersion::Nexus3 => "nexus3",
        }
    }

    fn repository_path(&self) -> &'static str {
        match self {
            NexusVersion::Nexus2 => "content/repositories",
            NexusVersion::Nexus3 => "repository",
        }
    }
}

impl FromStr for NexusVersion {
    type Err = MavenError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "nexus2" => Ok(NexusVersion::Nexus2),
            "nexus3" => Ok(NexusVersion::Nexus3),
            _ => Err(MavenError::validation(format!(
                "unsupported Nexus version '{}', expected 'nexus2' or 'nexus3'",
                s
            ))),
        }
    }
}

/// An additional artifact identified by classifier and file type
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Classifier {
    pub classifier: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Parse the JSON list of additional classifiers. Blank input means none.
pub fn parse_classifiers(value: &str) -> Result<Vec<Classifier>> {
    if value.trim().is_empty() {
        return Ok(Vec::new());
    }
    let classifiers: Vec<Classifier> = serde_json::from_str(value)
        .map_err(|e| MavenError::config(format!("invalid additionalClassifiers '{}': {}", value, e)))?;
    for c in &classifiers {
        if c.classifier.is_empty() || c.kind.is_empty() {
            return Err(MavenError::config(
                "each additional classifier needs a 'classifier' and a 'type'",
            ));
        }
    }
    Ok(classifiers)
}

/// Build the repository URL for `repository`.
///
/// Any scheme in `url` is dropped; uploads always use plain http.
pub fn repository_url(version: NexusVersion, url: &str, repository: &str) -> Result<String> {
    let host = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    let host = host.trim_end_matches('/');
    if host.is_empty() {
        return Err(MavenError::validation("Nexus url must not be empty"));
    }

    let candidate = format!(
        "http://{}/{}/{}/",
        host,
        version.repository_path(),
        repository.trim_matches('/')
    );
    let parsed = url::Url::parse(&candidate)
        .map_err(|e| MavenError::validation(format!("invalid Nexus url '{}': {}", url, e)))?;
    Ok(parsed.to_string())
}

fn artifact_extension(packaging: &str) -> &str {
    match packaging {
        "war" | "ear" | "rar" | "aar" => packaging,
        _ => "jar",
    }
}

fn settings_xml(server_id: &str) -> String {
    let id = server_id
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<settings xmlns="http://maven.apache.org/SETTINGS/1.0.0">
  <servers>
    <server>
      <id>{}</id>
      <username>${{env.{}}}</username>
      <password>${{env.{}}}</password>
    </server>
  </servers>
</settings>
"#,
        id, USERNAME_ENV, PASSWORD_ENV
    )
}

/// Upload the artifacts of the Maven project in the working directory.
pub async fn nexus_upload<R, U>(options: &NexusUploadOptions, runner: &mut R, utils: &mut U) -> Result<()>
where
    R: ExecRunner + ?Sized,
    U: MavenUtils + ?Sized,
{
    let version = NexusVersion::from_str(&options.version)?;
    let url = repository_url(version, &options.url, &options.repository)?;
    let classifiers = parse_classifiers(&options.additional_classifiers)?;

    if !options.group_id.is_empty() || !options.artifact_id.is_empty() {
        debug!("groupId and artifactId are taken from the pom for Maven projects");
    }

    // artifacts are not built when commands are only logged
    let dry_run = runner.is_dry_run();

    if !utils.file_exists("pom.xml")? {
        return Err(MavenError::file_not_found(
            "pom.xml not found, only Maven projects can be uploaded",
        ));
    }

    let non_empty = |v: &str| (!v.is_empty()).then(|| v.to_string());
    let evaluate_options = EvaluateOptions {
        pom_path: Some("pom.xml".to_string()),
        global_settings_file: non_empty(&options.global_settings_file),
        m2_path: non_empty(&options.m2_path),
        ..EvaluateOptions::default()
    };

    let group_id = evaluate(&evaluate_options, "project.groupId", runner, utils).await?;
    let artifact_id = evaluate(&evaluate_options, "project.artifactId", runner, utils).await?;
    let artifact_version = evaluate(&evaluate_options, "project.version", runner, utils).await?;
    let packaging = evaluate(&evaluate_options, "project.packaging", runner, utils).await?;
    let final_name = evaluate(&evaluate_options, "project.build.finalName", runner, utils).await?;

    let main_file = if packaging == "pom" {
        "pom.xml".to_string()
    } else {
        let file = format!("target/{}.{}", final_name, artifact_extension(&packaging));
        if !dry_run && !utils.file_exists(&file)? {
            return Err(MavenError::file_not_found(format!(
                "artifact '{}' not found, was the project built?",
                file
            )));
        }
        file
    };

    let mut files = Vec::new();
    for c in &classifiers {
        let file = format!("target/{}-{}.{}", final_name, c.classifier, c.kind);
        if !dry_run && !utils.file_exists(&file)? {
            return Err(MavenError::file_not_found(format!(
                "artifact '{}' for classifier '{}' not found",
                file, c.classifier
            )));
        }
        files.push(file);
    }

    let mut defines = vec![
        format!("-Durl={}", url),
        format!("-DrepositoryId={}", options.repository),
        format!("-Dfile={}", main_file),
        "-DpomFile=pom.xml".to_string(),
        format!("-DgroupId={}", group_id),
        format!("-DartifactId={}", artifact_id),
        format!("-Dversion={}", artifact_version),
        format!("-Dpackaging={}", packaging),
    ];
    if !classifiers.is_empty() {
        let names: Vec<&str> = classifiers.iter().map(|c| c.classifier.as_str()).collect();
        let types: Vec<&str> = classifiers.iter().map(|c| c.kind.as_str()).collect();
        defines.push(format!("-Dfiles={}", files.join(",")));
        defines.push(format!("-Dclassifiers={}", names.join(",")));
        defines.push(format!("-Dtypes={}", types.join(",")));
    }

    let project_settings_file = if options.user.is_empty() {
        None
    } else {
        if dry_run {
            info!("DRY RUN: Would write {}", SETTINGS_FILE);
        } else {
            utils.write_file(SETTINGS_FILE, &settings_xml(&options.repository))?;
        }
        runner.env(USERNAME_ENV, &options.user);
        runner.env(PASSWORD_ENV, &options.password);
        Some(SETTINGS_FILE.to_string())
    };

    let deploy_options = ExecuteOptions {
        goals: vec!["deploy:deploy-file".to_string()],
        defines,
        global_settings_file: evaluate_options.global_settings_file.clone(),
        project_settings_file,
        m2_path: evaluate_options.m2_path.clone(),
        ..ExecuteOptions::default()
    };

    info!(
        "Uploading {}:{}:{} to {}",
        group_id, artifact_id, artifact_version, url
    );
    execute(&deploy_options, runner, utils)
        .await
        .context("failed to upload artifacts to Nexus")?;

    info!("Upload to Nexus completed");
    Ok(())
}
