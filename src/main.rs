// ABOUTME: Entry point for the gke-deploy CLI application.
// ABOUTME: Parses arguments, runs the pipeline, and handles Ctrl-C.

mod cli;

use clap::Parser;
use cli::Cli;
use gke_deploy::command::SystemRunner;
use gke_deploy::config::{CliOverrides, EffectiveConfig, Workspace};
use gke_deploy::deploy::{self, PollSettings};
use gke_deploy::error::Result;
use gke_deploy::output::{Output, OutputMode};
use gke_deploy::types::ServiceEndpoint;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let mut output = Output::new(mode);
    output.start_timer();

    tokio::select! {
        result = run(cli, &output) => match result {
            Ok(endpoint) => output.endpoint(&endpoint),
            Err(e) => {
                output.error(&e.to_string());
                std::process::exit(1);
            }
        },
        _ = tokio::signal::ctrl_c() => {
            output.info("Deployment process cancelled by user");
        }
    }
}

async fn run(cli: Cli, output: &Output) -> Result<ServiceEndpoint> {
    let config = EffectiveConfig::resolve(CliOverrides {
        project: Some(cli.project),
        user: cli.user,
        branch: cli.branch,
        create_cluster: cli.new,
    })?;

    let workspace = Workspace::new(cli.work_dir);
    let poll = PollSettings {
        interval: cli.poll_interval,
        timeout: cli.poll_timeout,
    };

    let endpoint = deploy::run(config, workspace, poll, &SystemRunner, output).await?;
    Ok(endpoint)
}
