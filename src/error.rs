// ABOUTME: Application-wide error types for gke-deploy.
// ABOUTME: Uses thiserror for ergonomic error handling.

use thiserror::Error;

use crate::config::ConfigError;
use crate::deploy::PipelineError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

pub type Result<T> = std::result::Result<T, Error>;
