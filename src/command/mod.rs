// ABOUTME: Thin command-execution layer for the external tools the pipeline drives.
// ABOUTME: Stages depend on the CommandRunner trait so tests can script tool behavior.

mod error;
mod runner;

pub use error::CommandError;
pub use runner::{CommandOutput, CommandRunner, ExternalCommand, SystemRunner};
