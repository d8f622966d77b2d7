// file: src/main.rs
// version: 2.0.0
// guid: 85f2d6b0-c94e-4a13-b7d8-2e60a3f1c9d7

//! Maven Steps - Main entry point

use clap::Parser;
use maven_steps::{
    cli::{args::Cli, args::Commands, commands::*},
    logging::logger,
    Result,
};
use tokio::signal;
use tracing::{error, warn};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let logger_result = if cli.json_logs {
        logger::init_json_logger(cli.verbose, cli.quiet)
    } else {
        logger::init_logger(cli.verbose, cli.quiet)
    };
    if let Err(e) = logger_result {
        eprintln!("{}", e);
    }

    let shutdown_signal = async {
        if signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl+C, stopping");
        }
    };

    // the losing branch is dropped here, which kills a running mvn child
    let exit_code = tokio::select! {
        result = run(cli) => match result {
            Ok(()) => 0,
            Err(e) => {
                error!("{}", e);
                1
            }
        },
        _ = shutdown_signal => {
            warn!("Step interrupted by user");
            130
        }
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let ctx = StepContext {
        config_path: cli.config,
        no_telemetry: cli.no_telemetry,
        dry_run: cli.dry_run,
    };

    match cli.command {
        Commands::Execute {
            maven,
            goals,
            defines,
            flags,
            log_successful_maven_transfers,
            return_stdout,
        } => {
            execute_command(
                &ctx,
                &maven,
                goals,
                defines,
                flags,
                log_successful_maven_transfers,
                return_stdout,
            )
            .await
        }
        Commands::Evaluate { maven, expression } => {
            evaluate_command(&ctx, &maven, &expression).await
        }
        Commands::InstallFile {
            file,
            pom_file,
            m2_path,
        } => install_file_command(&ctx, &file, &pom_file, m2_path.as_deref()).await,
        Commands::InstallArtifacts { maven } => install_artifacts_command(&ctx, &maven).await,
        Commands::TestModuleExcludes => test_module_excludes_command(&ctx).await,
        Commands::NexusUpload(args) => nexus_upload_command(&ctx, &args).await,
    }
}
