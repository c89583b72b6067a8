// ABOUTME: Errors raised while resolving the effective configuration.
// ABOUTME: Only an unreadable repository document is recoverable.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("a project id is required (--project)")]
    MissingProject,

    #[error("unable to open file \"{}\": {source}", path.display())]
    RepoConfigUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid repository configuration \"{}\": {source}", path.display())]
    InvalidRepoConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Whether the pipeline must stop. A missing repository document only
    /// means the defaults are used.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ConfigError::RepoConfigUnreadable { .. })
    }
}
