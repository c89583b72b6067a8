// ABOUTME: Effective deployment configuration and how it is resolved.
// ABOUTME: Command-line input first, then the repository document after checkout.

mod deserialize;
mod error;
mod repo;
mod workspace;

pub use error::ConfigError;
pub use repo::RepoConfig;
pub use workspace::{PROPERTIES_PATH, REPO_CONFIG_PATH, SOURCE_REPOSITORY, Workspace};

use std::num::NonZeroU32;

use indexmap::IndexMap;

use crate::types::{ImageTag, ImageTarget, ResourceName};

pub const DEFAULT_USER: &str = "loklak";
pub const DEFAULT_BRANCH: &str = "development";
pub const DEFAULT_VERSION: &str = "v1";
pub const DEFAULT_CLUSTER: &str = "loklak-cluster";
pub const DEFAULT_NUM_NODES: u32 = 2;
pub const DEFAULT_NODE_TYPE: &str = "n1-standard-4";
pub const DEFAULT_ZONE: &str = "us-central1-a";
pub const DEFAULT_DEPLOYMENT: &str = "loklak";

/// Values supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub project: Option<String>,
    pub user: Option<String>,
    pub branch: Option<String>,
    pub create_cluster: bool,
}

/// The configuration threaded through every pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveConfig {
    pub project: String,
    pub user: String,
    pub branch: String,
    pub version: ImageTag,
    pub cluster: ResourceName,
    pub num_nodes: NonZeroU32,
    pub node_type: String,
    pub zone: String,
    pub deployment: ResourceName,
    pub create_cluster: bool,
    pub config_changes: IndexMap<String, String>,
}

impl EffectiveConfig {
    /// Build the initial configuration from command-line input.
    ///
    /// Blank `user` or `branch` values fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingProject` if no non-blank project id was given.
    pub fn resolve(cli: CliOverrides) -> Result<Self, ConfigError> {
        let project = non_blank(cli.project).ok_or(ConfigError::MissingProject)?;

        Ok(Self {
            project,
            user: non_blank(cli.user).unwrap_or_else(|| DEFAULT_USER.to_string()),
            branch: non_blank(cli.branch).unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            version: default_version(),
            cluster: default_cluster(),
            num_nodes: default_num_nodes(),
            node_type: DEFAULT_NODE_TYPE.to_string(),
            zone: DEFAULT_ZONE.to_string(),
            deployment: default_deployment(),
            create_cluster: cli.create_cluster,
            config_changes: IndexMap::new(),
        })
    }

    /// Apply the repository document. Keys present in the document win over
    /// the current values.
    #[must_use]
    pub fn merge_repo(mut self, repo: RepoConfig) -> Self {
        if let Some(version) = repo.version {
            self.version = version;
        }
        if let Some(cluster) = repo.cluster {
            self.cluster = cluster;
        }
        if let Some(num_nodes) = repo.num_nodes {
            self.num_nodes = num_nodes;
        }
        if let Some(node_type) = repo.node_type {
            self.node_type = node_type;
        }
        if let Some(zone) = repo.zone {
            self.zone = zone;
        }
        if let Some(deployment) = repo.deployment {
            self.deployment = deployment;
        }
        if let Some(config_changes) = repo.config_changes {
            self.config_changes = config_changes;
        }
        self
    }

    /// Registry path of the image for this configuration.
    pub fn image_target(&self) -> ImageTarget {
        ImageTarget::new(self.project.clone(), self.version.clone())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn default_version() -> ImageTag {
    ImageTag::new(DEFAULT_VERSION).expect("default version is a valid image tag")
}

fn default_cluster() -> ResourceName {
    ResourceName::new(DEFAULT_CLUSTER).expect("default cluster is a valid resource name")
}

fn default_deployment() -> ResourceName {
    ResourceName::new(DEFAULT_DEPLOYMENT).expect("default deployment is a valid resource name")
}

fn default_num_nodes() -> NonZeroU32 {
    NonZeroU32::new(DEFAULT_NUM_NODES).expect("default node count is non-zero")
}
