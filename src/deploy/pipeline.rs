// ABOUTME: Generic pipeline struct parameterized by state marker.
// ABOUTME: Carries the effective configuration and workspace between stages.

use crate::config::{EffectiveConfig, Workspace};
use crate::types::ImageTarget;

use super::state::{Initialized, PipelineState, Stage};

/// A deployment run in progress, parameterized by its last completed stage.
#[derive(Debug)]
pub struct Pipeline<S> {
    pub(crate) config: EffectiveConfig,
    pub(crate) workspace: Workspace,
    pub(crate) state: S,
}

impl Pipeline<Initialized> {
    /// Start a run from a configuration resolved from the command line.
    pub fn new(config: EffectiveConfig, workspace: Workspace) -> Self {
        Pipeline {
            config,
            workspace,
            state: Initialized,
        }
    }
}

impl<S> Pipeline<S> {
    pub fn config(&self) -> &EffectiveConfig {
        &self.config
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn image_target(&self) -> ImageTarget {
        self.config.image_target()
    }

    pub(crate) fn transition<T: Default>(self) -> Pipeline<T> {
        Pipeline {
            config: self.config,
            workspace: self.workspace,
            state: T::default(),
        }
    }
}

impl<S: Stage> Pipeline<S> {
    /// The state entered by the next transition.
    pub fn next_state(&self) -> PipelineState {
        S::NEXT
    }
}
