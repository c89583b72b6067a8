// ABOUTME: Pipeline state marker types for the type state pattern.
// ABOUTME: Zero-sized types enforce the stage order at compile time.

use std::fmt;

/// Observable state of a deployment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    Configuring,
    Preparing,
    Provisioning,
    Patching,
    Building,
    Deploying,
    Exposing,
    Polling,
    Done,
    Failed,
}

impl PipelineState {
    /// Human-readable name of the operation performed in this state.
    pub fn operation(&self) -> &'static str {
        match self {
            PipelineState::Configuring => "configuration",
            PipelineState::Preparing => "source checkout",
            PipelineState::Provisioning => "cluster provisioning",
            PipelineState::Patching => "config patching",
            PipelineState::Building => "image build",
            PipelineState::Deploying => "deployment",
            PipelineState::Exposing => "service exposure",
            PipelineState::Polling => "endpoint polling",
            PipelineState::Done => "deployment pipeline",
            PipelineState::Failed => "deployment pipeline",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Implemented by every state marker. `NEXT` is the state the pipeline
/// enters when the marker's transition runs.
pub trait Stage: sealed::Sealed {
    const NEXT: PipelineState;
}

macro_rules! stage {
    ($(#[$doc:meta])* $marker:ident => $next:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $marker;

        impl sealed::Sealed for $marker {}

        impl Stage for $marker {
            const NEXT: PipelineState = PipelineState::$next;
        }
    };
}

stage! {
    /// Command-line configuration resolved.
    /// Available actions: `prepare_source()`
    Initialized => Preparing
}

stage! {
    /// Fresh checkout of the configured branch.
    /// Available actions: `apply_repo_config()`
    SourceReady => Configuring
}

stage! {
    /// Repository document merged; configuration is final.
    /// Available actions: `provision_cluster()`
    Resolved => Provisioning
}

stage! {
    /// Cluster created, or credentials fetched for an existing one.
    /// Available actions: `patch_config()`
    ClusterReady => Patching
}

stage! {
    /// Property overrides written into the checkout.
    /// Available actions: `build_image()`
    ConfigPatched => Building
}

stage! {
    /// Image built locally.
    /// Available actions: `push_image()`
    ImageBuilt => Building
}

stage! {
    /// Image available in the registry.
    /// Available actions: `run_workload()`
    ImagePublished => Deploying
}

stage! {
    /// Workload started from the published image.
    /// Available actions: `expose()`
    WorkloadRunning => Exposing
}

stage! {
    /// Load-balanced service created.
    /// Available actions: `wait_for_endpoint()`
    Exposed => Polling
}
