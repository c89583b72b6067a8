// ABOUTME: Tests for pipeline state markers and the Pipeline<S> struct.
// ABOUTME: Verifies marker sizes, stage mapping, and transition signatures.

use gke_deploy::config::{CliOverrides, EffectiveConfig, Workspace};
use gke_deploy::deploy::{
    ClusterReady, ConfigPatched, Exposed, ImageBuilt, ImagePublished, Initialized, Pipeline,
    PipelineState, Resolved, SourceReady, Stage, WorkloadRunning,
};
use std::mem::size_of;

fn pipeline() -> Pipeline<Initialized> {
    let config = EffectiveConfig::resolve(CliOverrides {
        project: Some("acme".to_string()),
        ..Default::default()
    })
    .unwrap();
    Pipeline::new(config, Workspace::new("/tmp/gke-deploy-test"))
}

// =============================================================================
// State Marker Type Tests
// =============================================================================

#[test]
fn state_markers_are_zero_sized() {
    assert_eq!(size_of::<Initialized>(), 0);
    assert_eq!(size_of::<SourceReady>(), 0);
    assert_eq!(size_of::<Resolved>(), 0);
    assert_eq!(size_of::<ClusterReady>(), 0);
    assert_eq!(size_of::<ConfigPatched>(), 0);
    assert_eq!(size_of::<ImageBuilt>(), 0);
    assert_eq!(size_of::<ImagePublished>(), 0);
    assert_eq!(size_of::<WorkloadRunning>(), 0);
    assert_eq!(size_of::<Exposed>(), 0);
}

#[test]
fn pipeline_size_does_not_depend_on_state() {
    assert_eq!(
        size_of::<Pipeline<Initialized>>(),
        size_of::<Pipeline<Exposed>>()
    );
}

#[test]
fn markers_map_to_observable_states() {
    assert_eq!(Initialized::NEXT, PipelineState::Preparing);
    assert_eq!(SourceReady::NEXT, PipelineState::Configuring);
    assert_eq!(Resolved::NEXT, PipelineState::Provisioning);
    assert_eq!(ClusterReady::NEXT, PipelineState::Patching);
    assert_eq!(ConfigPatched::NEXT, PipelineState::Building);
    assert_eq!(ImageBuilt::NEXT, PipelineState::Building);
    assert_eq!(ImagePublished::NEXT, PipelineState::Deploying);
    assert_eq!(WorkloadRunning::NEXT, PipelineState::Exposing);
    assert_eq!(Exposed::NEXT, PipelineState::Polling);
}

#[test]
fn only_done_and_failed_are_terminal() {
    let terminal: Vec<PipelineState> = [
        PipelineState::Configuring,
        PipelineState::Preparing,
        PipelineState::Provisioning,
        PipelineState::Patching,
        PipelineState::Building,
        PipelineState::Deploying,
        PipelineState::Exposing,
        PipelineState::Polling,
        PipelineState::Done,
        PipelineState::Failed,
    ]
    .into_iter()
    .filter(PipelineState::is_terminal)
    .collect();

    assert_eq!(terminal, vec![PipelineState::Done, PipelineState::Failed]);
}

// =============================================================================
// Pipeline<S> Tests
// =============================================================================

#[test]
fn new_pipeline_starts_initialized() {
    let pipeline = pipeline();

    assert_eq!(pipeline.next_state(), PipelineState::Preparing);
    assert_eq!(pipeline.config().project, "acme");
    assert_eq!(
        pipeline.workspace().checkout_dir(),
        std::path::PathBuf::from("/tmp/gke-deploy-test/loklak_server")
    );
    assert_eq!(
        pipeline.image_target().to_string(),
        "gcr.io/acme/loklak:v1"
    );
}

#[test]
fn pipeline_implements_debug() {
    let debug = format!("{:?}", pipeline());
    assert!(debug.contains("Initialized"));
}

// =============================================================================
// Transition Signature Tests
// =============================================================================
// These verify the transitions exist with the expected signatures. The
// bodies are never run; they only need to type-check.

#[allow(dead_code)]
async fn transition_chain_type_checks(
    runner: &gke_deploy::command::SystemRunner,
    output: &gke_deploy::output::Output,
) -> Result<gke_deploy::types::ServiceEndpoint, gke_deploy::deploy::DeployError> {
    let p: Pipeline<SourceReady> = pipeline().prepare_source(runner, output).await?;
    let p: Pipeline<Resolved> = p.apply_repo_config(output).await?;
    let p: Pipeline<ClusterReady> = p.provision_cluster(runner, output).await?;
    let p: Pipeline<ConfigPatched> = p.patch_config(output).await?;
    let p: Pipeline<ImageBuilt> = p.build_image(runner, output).await?;
    let p: Pipeline<ImagePublished> = p.push_image(runner, output).await?;
    let p: Pipeline<WorkloadRunning> = p.run_workload(runner, output).await?;
    let p: Pipeline<Exposed> = p.expose(runner, output).await?;
    p.wait_for_endpoint(runner, Default::default(), output).await
}
