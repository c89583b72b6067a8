// ABOUTME: Drives a deployment through every stage in order.
// ABOUTME: Attaches the failing state to any stage error.

use snafu::ResultExt;

use crate::command::CommandRunner;
use crate::config::{EffectiveConfig, Workspace};
use crate::output::Output;
use crate::types::ServiceEndpoint;

use super::endpoint::PollSettings;
use super::error::{PipelineError, StageSnafu};
use super::pipeline::Pipeline;
use super::state::PipelineState;

/// Run the full pipeline and return the public endpoint.
///
/// Stages run strictly in sequence; the first failure stops the run and no
/// later stage executes. Nothing created before the failure is cleaned up.
pub async fn run<R: CommandRunner + ?Sized>(
    config: EffectiveConfig,
    workspace: Workspace,
    poll: PollSettings,
    runner: &R,
    output: &Output,
) -> Result<ServiceEndpoint, PipelineError> {
    let result = run_stages(config, workspace, poll, runner, output).await;

    match &result {
        Ok(endpoint) => {
            tracing::debug!(state = %PipelineState::Done, %endpoint, "pipeline finished");
        }
        Err(e) => {
            tracing::debug!(state = %PipelineState::Failed, failed_in = %e.state(), "pipeline failed");
        }
    }

    result
}

async fn run_stages<R: CommandRunner + ?Sized>(
    config: EffectiveConfig,
    workspace: Workspace,
    poll: PollSettings,
    runner: &R,
    output: &Output,
) -> Result<ServiceEndpoint, PipelineError> {
    let pipeline = Pipeline::new(config, workspace);

    let state = enter(pipeline.next_state());
    let pipeline = pipeline
        .prepare_source(runner, output)
        .await
        .context(StageSnafu { state })?;

    let state = enter(pipeline.next_state());
    let pipeline = pipeline
        .apply_repo_config(output)
        .await
        .context(StageSnafu { state })?;

    let state = enter(pipeline.next_state());
    let pipeline = pipeline
        .provision_cluster(runner, output)
        .await
        .context(StageSnafu { state })?;

    let state = enter(pipeline.next_state());
    let pipeline = pipeline
        .patch_config(output)
        .await
        .context(StageSnafu { state })?;

    let state = enter(pipeline.next_state());
    let pipeline = pipeline
        .build_image(runner, output)
        .await
        .context(StageSnafu { state })?;
    let pipeline = pipeline
        .push_image(runner, output)
        .await
        .context(StageSnafu { state })?;

    let state = enter(pipeline.next_state());
    let pipeline = pipeline
        .run_workload(runner, output)
        .await
        .context(StageSnafu { state })?;

    let state = enter(pipeline.next_state());
    let pipeline = pipeline
        .expose(runner, output)
        .await
        .context(StageSnafu { state })?;

    let state = enter(pipeline.next_state());
    pipeline
        .wait_for_endpoint(runner, poll, output)
        .await
        .context(StageSnafu { state })
}

fn enter(state: PipelineState) -> PipelineState {
    tracing::debug!(%state, "entering stage");
    state
}
