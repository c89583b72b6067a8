// ABOUTME: Error types for pipeline stages.
// ABOUTME: DeployError per transition, PipelineError attaches the failing state.

use std::path::PathBuf;

use snafu::Snafu;

use super::endpoint::EndpointError;
use super::state::PipelineState;
use crate::command::CommandError;
use crate::config::ConfigError;

/// Errors that can occur during a single state transition.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}

impl DeployError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DeployError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

/// A failed run: the state the pipeline was in and what went wrong.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PipelineError {
    #[snafu(display("{} failed: {source}", state.operation()))]
    Stage {
        state: PipelineState,
        source: DeployError,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid or missing configuration.
    Config,
    /// An external tool exited non-zero or could not be started.
    ExternalCommand,
    /// The service listing has no entry for the deployment.
    ServiceNotFound,
    /// No public IP was assigned within the poll timeout.
    Timeout,
    /// Local filesystem operation failed.
    Io,
}

impl PipelineError {
    /// State in which the run failed.
    pub fn state(&self) -> PipelineState {
        match self {
            PipelineError::Stage { state, .. } => *state,
        }
    }

    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Stage { source, .. } => match source {
                DeployError::Command(_) => ErrorKind::ExternalCommand,
                DeployError::Config(_) => ErrorKind::Config,
                DeployError::Io { .. } => ErrorKind::Io,
                DeployError::Endpoint(EndpointError::ServiceNotFound(_)) => {
                    ErrorKind::ServiceNotFound
                }
                DeployError::Endpoint(EndpointError::Timeout { .. }) => ErrorKind::Timeout,
                DeployError::Endpoint(EndpointError::Command(_)) => ErrorKind::ExternalCommand,
            },
        }
    }
}
