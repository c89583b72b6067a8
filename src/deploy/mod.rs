// ABOUTME: Deployment pipeline using the type state pattern.
// ABOUTME: Exports state markers, the Pipeline struct, stage helpers, and the runner.

mod cluster;
mod endpoint;
mod error;
mod patch;
mod pipeline;
mod run;
mod state;
mod transitions;

pub use cluster::ClusterAction;
pub use endpoint::{
    DEFAULT_POLL_INTERVAL, EndpointError, PollSettings, ServiceListing, ServiceStatus,
    list_services_command, wait_for_endpoint,
};
pub use error::{DeployError, ErrorKind, PipelineError};
pub use patch::{PatchReport, patch_file, patch_properties};
pub use pipeline::Pipeline;
pub use run::run;
pub use state::{
    ClusterReady, ConfigPatched, Exposed, ImageBuilt, ImagePublished, Initialized, PipelineState,
    Resolved, SourceReady, Stage, WorkloadRunning,
};
pub use transitions::CONTAINER_PORT;
