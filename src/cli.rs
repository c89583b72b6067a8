// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Mirrors the flags of the original deploy script plus polling and output options.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

#[derive(Parser)]
#[command(name = "gke-deploy")]
#[command(about = "Build the loklak server image and deploy it to a Kubernetes Engine cluster")]
#[command(version)]
pub struct Cli {
    /// GCP project ID
    #[arg(short, long)]
    pub project: String,

    /// Username of the GitHub repository owner [default: loklak]
    #[arg(short, long)]
    pub user: Option<String>,

    /// Branch to deploy [default: development]
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Create a new cluster instead of reusing an existing one
    #[arg(short, long)]
    pub new: bool,

    /// Quiet mode: only print the public IP and errors
    #[arg(short, long, visible_alias = "quite")]
    pub quiet: bool,

    /// Emit JSON lines instead of text
    #[arg(long, conflicts_with = "quiet")]
    pub json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Directory that receives the source checkout
    #[arg(short = 'C', long, default_value = ".")]
    pub work_dir: PathBuf,

    /// Delay between service polls
    #[arg(long, default_value = "10s", value_parser = humantime::parse_duration)]
    pub poll_interval: Duration,

    /// Give up waiting for a public IP after this long [default: wait forever]
    #[arg(long, value_parser = humantime::parse_duration)]
    pub poll_timeout: Option<Duration>,
}
