// ABOUTME: Filesystem layout of the source checkout.
// ABOUTME: Fixed relative paths for the repository config and the properties file.

use std::path::{Path, PathBuf};

/// Name of the source repository and of its local checkout directory.
pub const SOURCE_REPOSITORY: &str = "loklak_server";

/// Repository-provided deployment settings, relative to the checkout.
pub const REPO_CONFIG_PATH: &str = "google-cloud-kubernetes/config.json";

/// Properties file rewritten by config-changes, relative to the checkout.
pub const PROPERTIES_PATH: &str = "conf/config.properties";

/// Directory that receives the checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn checkout_dir(&self) -> PathBuf {
        self.root.join(SOURCE_REPOSITORY)
    }

    pub fn repo_config_path(&self) -> PathBuf {
        self.checkout_dir().join(REPO_CONFIG_PATH)
    }

    pub fn properties_path(&self) -> PathBuf {
        self.checkout_dir().join(PROPERTIES_PATH)
    }

    /// Clone URL of the repository owned by `user`.
    pub fn repository_url(user: &str) -> String {
        format!("https://github.com/{user}/{SOURCE_REPOSITORY}.git")
    }
}
