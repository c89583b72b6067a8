// ABOUTME: Optional deployment settings shipped inside the source repository.
// ABOUTME: Parsed from google-cloud-kubernetes/config.json after checkout.

use std::num::NonZeroU32;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use super::deserialize::{
    deserialize_config_changes, deserialize_image_tag, deserialize_node_count,
    deserialize_resource_name,
};
use super::error::ConfigError;
use crate::types::{ImageTag, ResourceName};

/// Keys recognized in the repository document. Every key that is present
/// overrides the corresponding field of the effective configuration; any
/// other key is ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RepoConfig {
    #[serde(default, deserialize_with = "deserialize_image_tag")]
    pub version: Option<ImageTag>,

    #[serde(default, deserialize_with = "deserialize_resource_name")]
    pub cluster: Option<ResourceName>,

    #[serde(default, deserialize_with = "deserialize_node_count")]
    pub num_nodes: Option<NonZeroU32>,

    #[serde(default)]
    pub node_type: Option<String>,

    #[serde(default)]
    pub zone: Option<String>,

    #[serde(default, deserialize_with = "deserialize_resource_name")]
    pub deployment: Option<ResourceName>,

    #[serde(default, deserialize_with = "deserialize_config_changes")]
    pub config_changes: Option<IndexMap<String, String>>,
}

impl RepoConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read and parse the document at `path`.
    ///
    /// # Errors
    ///
    /// `ConfigError::RepoConfigUnreadable` when the file cannot be read (not
    /// fatal, see [`ConfigError::is_fatal`]) and
    /// `ConfigError::InvalidRepoConfig` when it is not a valid document.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|source| {
            ConfigError::RepoConfigUnreadable {
                path: path.to_path_buf(),
                source,
            }
        })?;

        Self::from_json(&content).map_err(|source| ConfigError::InvalidRepoConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    /// One-line description of the keys that were set.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(ref version) = self.version {
            parts.push(format!("version={version}"));
        }
        if let Some(ref cluster) = self.cluster {
            parts.push(format!("cluster={cluster}"));
        }
        if let Some(num_nodes) = self.num_nodes {
            parts.push(format!("num-nodes={num_nodes}"));
        }
        if let Some(ref node_type) = self.node_type {
            parts.push(format!("node-type={node_type}"));
        }
        if let Some(ref zone) = self.zone {
            parts.push(format!("zone={zone}"));
        }
        if let Some(ref deployment) = self.deployment {
            parts.push(format!("deployment={deployment}"));
        }
        if let Some(ref changes) = self.config_changes {
            let keys: Vec<&str> = changes.keys().map(String::as_str).collect();
            parts.push(format!("config-changes=[{}]", keys.join(", ")));
        }

        if parts.is_empty() {
            "no overrides".to_string()
        } else {
            parts.join(", ")
        }
    }
}
