// ABOUTME: State transition methods for the deployment pipeline.
// ABOUTME: Each method consumes self, runs one stage, and returns the next state on success.

use std::io::ErrorKind;

use crate::command::{CommandRunner, ExternalCommand};
use crate::config::{RepoConfig, SOURCE_REPOSITORY, Workspace};
use crate::output::Output;
use crate::types::ServiceEndpoint;

use super::cluster::ClusterAction;
use super::endpoint::{PollSettings, wait_for_endpoint};
use super::error::DeployError;
use super::patch::patch_file;
use super::pipeline::Pipeline;
use super::state::{
    ClusterReady, ConfigPatched, Exposed, ImageBuilt, ImagePublished, Initialized, Resolved,
    SourceReady, WorkloadRunning,
};

/// Port the loklak server listens on inside the container.
pub const CONTAINER_PORT: u16 = 80;

// =============================================================================
// Initialized -> SourceReady
// =============================================================================

impl Pipeline<Initialized> {
    /// Replace any previous checkout with a fresh clone of the configured
    /// user's repository at `origin/<branch>`.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Command` if clone or checkout fails, and
    /// `DeployError::Io` if the old checkout cannot be removed.
    #[must_use = "pipeline state must be used"]
    pub async fn prepare_source<R: CommandRunner + ?Sized>(
        self,
        runner: &R,
        output: &Output,
    ) -> Result<Pipeline<SourceReady>, DeployError> {
        let root = self.workspace.root();
        let checkout = self.workspace.checkout_dir();

        tokio::fs::create_dir_all(root)
            .await
            .map_err(|e| DeployError::io("create workspace", root, e))?;

        match tokio::fs::remove_dir_all(&checkout).await {
            Ok(()) => tracing::debug!(path = %checkout.display(), "removed previous checkout"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(DeployError::io("remove previous checkout", &checkout, e)),
        }

        let url = Workspace::repository_url(&self.config.user);
        output.info(&format!("Cloning {url}..."));
        let clone = ExternalCommand::new("git")
            .args(["clone", "-q", url.as_str(), SOURCE_REPOSITORY])
            .current_dir(root);
        runner.check(&clone).await?;
        output.info(&format!("Successfully cloned {url}"));

        let reference = format!("origin/{}", self.config.branch);
        let checkout_branch = ExternalCommand::new("git")
            .args(["checkout", reference.as_str()])
            .current_dir(&checkout);
        runner.check(&checkout_branch).await?;
        output.info(&format!("Checked out {reference}"));

        Ok(self.transition())
    }
}

// =============================================================================
// SourceReady -> Resolved
// =============================================================================

impl Pipeline<SourceReady> {
    /// Merge the repository's deployment document into the configuration.
    ///
    /// A missing or unreadable document is reported as a warning and the
    /// current values are kept.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Config` if the document exists but is invalid.
    #[must_use = "pipeline state must be used"]
    pub async fn apply_repo_config(
        self,
        output: &Output,
    ) -> Result<Pipeline<Resolved>, DeployError> {
        let path = self.workspace.repo_config_path();

        match RepoConfig::load(&path).await {
            Ok(repo) => {
                output.info(&format!("Loaded configuration: {}", repo.summary()));
                let Pipeline {
                    config,
                    workspace,
                    state: _,
                } = self;
                Ok(Pipeline {
                    config: config.merge_repo(repo),
                    workspace,
                    state: Resolved,
                })
            }
            Err(e) if !e.is_fatal() => {
                output.warn(&format!("{e}"));
                Ok(self.transition())
            }
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Resolved -> ClusterReady
// =============================================================================

impl Pipeline<Resolved> {
    /// Create the cluster or fetch credentials for it, depending on the
    /// create-cluster flag.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Command` if `gcloud` fails.
    #[must_use = "pipeline state must be used"]
    pub async fn provision_cluster<R: CommandRunner + ?Sized>(
        self,
        runner: &R,
        output: &Output,
    ) -> Result<Pipeline<ClusterReady>, DeployError> {
        let action = ClusterAction::for_config(&self.config);
        let cluster = action.cluster();

        let (starting, done) = match action {
            ClusterAction::Create { .. } => (
                format!("Creating cluster {cluster}..."),
                format!("Cluster {cluster} created successfully"),
            ),
            ClusterAction::FetchCredentials { .. } => (
                format!("Fetching credentials for cluster {cluster}..."),
                format!("Fetched credentials for {cluster}"),
            ),
        };

        output.info(&starting);
        runner.check(&action.command()).await?;
        output.info(&done);

        Ok(self.transition())
    }
}

// =============================================================================
// ClusterReady -> ConfigPatched
// =============================================================================

impl Pipeline<ClusterReady> {
    /// Write the configured property overrides into the checkout's
    /// properties file. No-op when there are none.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Io` if the properties file cannot be read or written.
    #[must_use = "pipeline state must be used"]
    pub async fn patch_config(self, output: &Output) -> Result<Pipeline<ConfigPatched>, DeployError> {
        let changes = &self.config.config_changes;
        if changes.is_empty() {
            tracing::debug!("no config changes to apply");
            return Ok(self.transition());
        }

        for (key, value) in changes {
            output.info(&format!("Changing property {key} to {value}"));
        }

        let path = self.workspace.properties_path();
        let report = patch_file(&path, changes)
            .await
            .map_err(|e| DeployError::io("patch", &path, e))?;

        for key in &report.unmatched_keys {
            output.warn(&format!(
                "Property {key} not found in {}, left unchanged",
                path.display()
            ));
        }

        Ok(self.transition())
    }
}

// =============================================================================
// ConfigPatched -> ImageBuilt -> ImagePublished
// =============================================================================

impl Pipeline<ConfigPatched> {
    /// Build the image from the checkout, tagged with the registry path.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Command` if `docker build` fails.
    #[must_use = "pipeline state must be used"]
    pub async fn build_image<R: CommandRunner + ?Sized>(
        self,
        runner: &R,
        output: &Output,
    ) -> Result<Pipeline<ImageBuilt>, DeployError> {
        let tag = self.image_target().to_string();
        output.info(&format!("Building image with TAG {tag}"));

        let build = ExternalCommand::new("docker")
            .args(["build", "-t", tag.as_str(), "."])
            .current_dir(self.workspace.checkout_dir());
        runner.check(&build).await?;
        output.info("Docker build complete");

        Ok(self.transition())
    }
}

impl Pipeline<ImageBuilt> {
    /// Push the built image to the registry.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Command` if the push fails.
    #[must_use = "pipeline state must be used"]
    pub async fn push_image<R: CommandRunner + ?Sized>(
        self,
        runner: &R,
        output: &Output,
    ) -> Result<Pipeline<ImagePublished>, DeployError> {
        let tag = self.image_target().to_string();
        output.info("Pushing docker image to GCR...");

        let push = ExternalCommand::new("gcloud").args(["docker", "--", "push", tag.as_str()]);
        runner.check(&push).await?;
        output.info(&format!("Pushed {tag} to GCR"));

        Ok(self.transition())
    }
}

// =============================================================================
// ImagePublished -> WorkloadRunning -> Exposed
// =============================================================================

impl Pipeline<ImagePublished> {
    /// Start the workload from the published image.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Command` if `kubectl run` fails.
    #[must_use = "pipeline state must be used"]
    pub async fn run_workload<R: CommandRunner + ?Sized>(
        self,
        runner: &R,
        output: &Output,
    ) -> Result<Pipeline<WorkloadRunning>, DeployError> {
        let deployment = &self.config.deployment;
        let tag = self.image_target().to_string();
        output.info(&format!("Running deployment {deployment} using tag {tag}"));

        let run = ExternalCommand::new("kubectl")
            .args(["run", deployment.as_str()])
            .arg(format!("--image={tag}"))
            .arg(format!("--port={CONTAINER_PORT}"));
        runner.check(&run).await?;

        Ok(self.transition())
    }
}

impl Pipeline<WorkloadRunning> {
    /// Expose the workload through a load-balanced service of the same name.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Command` if `kubectl expose` fails.
    #[must_use = "pipeline state must be used"]
    pub async fn expose<R: CommandRunner + ?Sized>(
        self,
        runner: &R,
        output: &Output,
    ) -> Result<Pipeline<Exposed>, DeployError> {
        let deployment = &self.config.deployment;
        output.info(&format!("Exposing deployment {deployment}"));

        let expose = ExternalCommand::new("kubectl").args([
            "expose",
            "deployment",
            deployment.as_str(),
            "--type=LoadBalancer",
        ]);
        runner.check(&expose).await?;

        Ok(self.transition())
    }
}

// =============================================================================
// Exposed - Terminal transition
// =============================================================================

impl Pipeline<Exposed> {
    /// Wait for the service's public IP.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Endpoint` if the service disappears, the timeout
    /// elapses, or listing services fails.
    pub async fn wait_for_endpoint<R: CommandRunner + ?Sized>(
        self,
        runner: &R,
        settings: PollSettings,
        output: &Output,
    ) -> Result<ServiceEndpoint, DeployError> {
        let endpoint =
            wait_for_endpoint(runner, &self.config.deployment, settings, output).await?;
        Ok(endpoint)
    }
}
