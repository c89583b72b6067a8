// ABOUTME: Cluster provisioning action selection.
// ABOUTME: Either create a new cluster or fetch credentials for an existing one.

use crate::command::ExternalCommand;
use crate::config::EffectiveConfig;

/// How the target cluster is made available. Exactly one action runs per
/// deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterAction {
    /// Create a new cluster with the configured size and machine type.
    Create {
        cluster: String,
        num_nodes: u32,
        machine_type: String,
        zone: String,
        project: String,
    },

    /// Point `kubectl` at an already existing cluster.
    FetchCredentials {
        cluster: String,
        zone: String,
        project: String,
    },
}

impl ClusterAction {
    /// Choose the action from the create-cluster flag.
    pub fn for_config(config: &EffectiveConfig) -> Self {
        if config.create_cluster {
            ClusterAction::Create {
                cluster: config.cluster.to_string(),
                num_nodes: config.num_nodes.get(),
                machine_type: config.node_type.clone(),
                zone: config.zone.clone(),
                project: config.project.clone(),
            }
        } else {
            ClusterAction::FetchCredentials {
                cluster: config.cluster.to_string(),
                zone: config.zone.clone(),
                project: config.project.clone(),
            }
        }
    }

    pub fn cluster(&self) -> &str {
        match self {
            ClusterAction::Create { cluster, .. } | ClusterAction::FetchCredentials { cluster, .. } => {
                cluster
            }
        }
    }

    /// The `gcloud` invocation performing this action.
    pub fn command(&self) -> ExternalCommand {
        match self {
            ClusterAction::Create {
                cluster,
                num_nodes,
                machine_type,
                zone,
                project,
            } => ExternalCommand::new("gcloud")
                .args(["container", "clusters", "create"])
                .arg(cluster.as_str())
                .arg("--num-nodes")
                .arg(num_nodes.to_string())
                .arg("--machine-type")
                .arg(machine_type.as_str())
                .arg("--zone")
                .arg(zone.as_str())
                .arg("--project")
                .arg(project.as_str()),
            ClusterAction::FetchCredentials {
                cluster,
                zone,
                project,
            } => ExternalCommand::new("gcloud")
                .args(["container", "clusters", "get-credentials"])
                .arg(cluster.as_str())
                .arg("--zone")
                .arg(zone.as_str())
                .arg("--project")
                .arg(project.as_str()),
        }
    }
}
