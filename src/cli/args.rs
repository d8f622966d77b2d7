// file: src/cli/args.rs
// version: 2.0.0
// guid: 7f3b8c25-d14a-4e69-a0b7-c5e92f16d843

//! Command line argument definitions

use clap::{Args, Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "maven-steps")]
#[command(about = "Pipeline steps wrapping Maven and uploading artifacts to Nexus")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, global = true, env = "PIPER_noTelemetry", help = "Do not emit telemetry events")]
    pub no_telemetry: bool,

    #[arg(long, global = true, help = "Pipeline configuration file [default: .pipeline/config.yml]")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Log the Maven command lines instead of running them")]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run Maven with the given goals
    Execute {
        #[command(flatten)]
        maven: MavenArgs,

        #[arg(long, required = true, value_delimiter = ',', help = "Maven goals to execute")]
        goals: Vec<String>,

        #[arg(long = "define", allow_hyphen_values = true, help = "Additional -D property, e.g. -DskipTests")]
        defines: Vec<String>,

        #[arg(long = "flag", allow_hyphen_values = true, help = "Additional Maven flag, e.g. -U")]
        flags: Vec<String>,

        #[arg(long, help = "Keep Maven's per-artifact transfer log")]
        log_successful_maven_transfers: bool,

        #[arg(long, help = "Print Maven's standard output when done")]
        return_stdout: bool,
    },

    /// Evaluate an expression against a pom, e.g. project.version
    Evaluate {
        #[command(flatten)]
        maven: MavenArgs,

        #[arg(short, long)]
        expression: String,
    },

    /// Install a single artifact and its pom into the local repository
    InstallFile {
        #[arg(long, default_value = "", help = "Artifact to install; only the pom when empty")]
        file: String,

        #[arg(long, default_value = "pom.xml")]
        pom_file: String,

        #[arg(long, env = "PIPER_m2Path")]
        m2_path: Option<String>,
    },

    /// Install the artifacts of every module below the working directory
    InstallArtifacts {
        #[command(flatten)]
        maven: MavenArgs,
    },

    /// Print the -pl exclusions for unit-tests and integration-tests modules
    TestModuleExcludes,

    /// Upload artifacts to Nexus
    #[command(disable_version_flag = true)]
    #[command(long_about = "Upload build artifacts to a Nexus Repository Manager")]
    NexusUpload(NexusUploadArgs),
}

/// Settings shared by the Maven commands
#[derive(Args, Debug, Default, Clone)]
pub struct MavenArgs {
    #[arg(long, env = "PIPER_pomPath", help = "Path to the pom file")]
    pub pom_path: Option<String>,

    #[arg(long, env = "PIPER_projectSettingsFile", help = "Maven settings file, local path or URL")]
    pub project_settings_file: Option<String>,

    #[arg(long, env = "PIPER_globalSettingsFile", help = "Maven global settings file, local path or URL")]
    pub global_settings_file: Option<String>,

    #[arg(long, env = "PIPER_m2Path", help = "Path to the local Maven repository")]
    pub m2_path: Option<String>,
}

impl MavenArgs {
    /// Values given on the command line or via environment, keyed by parameter name
    pub fn explicit_values(&self) -> BTreeMap<String, String> {
        collect([
            ("pomPath", &self.pom_path),
            ("projectSettingsFile", &self.project_settings_file),
            ("globalSettingsFile", &self.global_settings_file),
            ("m2Path", &self.m2_path),
        ])
    }
}

#[derive(Args, Debug, Default, Clone)]
pub struct NexusUploadArgs {
    #[arg(long, env = "PIPER_version", help = "The Nexus Repository Manager version. Currently supported are 'nexus2' and 'nexus3'.")]
    pub version: Option<String>,

    #[arg(long, env = "PIPER_url", help = "URL of the nexus. The scheme part of the URL will not be considered, because only http is supported.")]
    pub url: Option<String>,

    #[arg(long, env = "PIPER_repository", help = "Name of the nexus repository.")]
    pub repository: Option<String>,

    #[arg(long = "groupId", env = "PIPER_groupId", help = "Group ID of the artifacts. Only used in MTA projects, ignored for Maven.")]
    pub group_id: Option<String>,

    #[arg(long = "artifactId", env = "PIPER_artifactId", help = "The artifact ID used for both the .mtar and mta.yaml files deployed for MTA projects, ignored for Maven.")]
    pub artifact_id: Option<String>,

    #[arg(long = "globalSettingsFile", env = "PIPER_globalSettingsFile", help = "Path to the mvn settings file that should be used as global settings file.")]
    pub global_settings_file: Option<String>,

    #[arg(long = "m2Path", env = "PIPER_m2Path", help = "The path to the local .m2 directory, only used for Maven projects.")]
    pub m2_path: Option<String>,

    #[arg(long = "additionalClassifiers", env = "PIPER_additionalClassifiers", help = "List of additional classifiers that should be deployed to nexus. Each item is a map of a type and a classifier name.")]
    pub additional_classifiers: Option<String>,

    #[arg(long, env = "PIPER_user", help = "User")]
    pub user: Option<String>,

    #[arg(long, env = "PIPER_password", hide_env_values = true, help = "Password")]
    pub password: Option<String>,
}

impl NexusUploadArgs {
    /// Values given on the command line or via environment, keyed by parameter name
    pub fn explicit_values(&self) -> BTreeMap<String, String> {
        collect([
            ("version", &self.version),
            ("url", &self.url),
            ("repository", &self.repository),
            ("groupId", &self.group_id),
            ("artifactId", &self.artifact_id),
            ("globalSettingsFile", &self.global_settings_file),
            ("m2Path", &self.m2_path),
            ("additionalClassifiers", &self.additional_classifiers),
            ("user", &self.user),
            ("password", &self.password),
        ])
    }
}

fn collect<'a, I>(values: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (&'a str, &'a Option<String>)>,
{
    values
        .into_iter()
        .filter_map(|(name, value)| value.as_ref().map(|v| (name.to_string(), v.clone())))
        .collect()
}
