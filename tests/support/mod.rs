// ABOUTME: Test support utilities.
// ABOUTME: Provides a scripted CommandRunner that records invocations instead of running tools.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Once;

use async_trait::async_trait;
use gke_deploy::command::{CommandError, CommandOutput, CommandRunner, ExternalCommand};
use gke_deploy::config::SOURCE_REPOSITORY;
use parking_lot::Mutex;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter =
            EnvFilter::from_default_env().add_directive("gke_deploy=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Listing in which `loklak` has the given external IP.
#[allow(dead_code)]
pub fn assigned_listing(address: &str) -> String {
    format!(
        "NAME         CLUSTER-IP   EXTERNAL-IP   PORT(S)   AGE\n\
         kubernetes   10.3.240.1   <none>        443/TCP   9m\n\
         loklak       10.3.245.7   {address}     80/TCP    1m\n"
    )
}

/// Records every command and answers from per-prefix scripts.
///
/// Commands are matched by the start of their command line. The last
/// scripted output for a prefix repeats once the others are used up;
/// unscripted commands succeed with empty output. A successful `git clone`
/// also materializes the configured checkout files in its working directory.
#[derive(Default)]
pub struct ScriptedRunner {
    calls: Mutex<Vec<ExternalCommand>>,
    scripts: Mutex<Vec<(String, VecDeque<CommandOutput>)>>,
    checkout_files: Vec<(String, String)>,
    watched: Vec<(String, String)>,
    snapshots: Mutex<Vec<(String, Option<String>)>>,
}

#[allow(dead_code)]
impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands starting with `prefix` with `outputs`, in order.
    pub fn respond<I>(self, prefix: &str, outputs: I) -> Self
    where
        I: IntoIterator<Item = CommandOutput>,
    {
        self.scripts
            .lock()
            .push((prefix.to_string(), outputs.into_iter().collect()));
        self
    }

    /// Make commands starting with `prefix` exit with `code`.
    pub fn fail(self, prefix: &str, code: i32, stderr: &str) -> Self {
        self.respond(prefix, [CommandOutput::failure(code, stderr)])
    }

    /// Answer `kubectl get services` with a listing where `loklak` has `address`.
    pub fn with_endpoint(self, address: &str) -> Self {
        self.respond(
            "kubectl get services",
            [CommandOutput::success_with(assigned_listing(address))],
        )
    }

    /// File created inside the checkout when the repository is cloned.
    pub fn with_checkout_file(mut self, relative: &str, content: &str) -> Self {
        self.checkout_files
            .push((relative.to_string(), content.to_string()));
        self
    }

    /// Read `relative` (from the command's working directory) whenever a
    /// command starting with `prefix` runs.
    pub fn with_snapshot(mut self, prefix: &str, relative: &str) -> Self {
        self.watched.push((prefix.to_string(), relative.to_string()));
        self
    }

    /// Content captured for `prefix`, `None` if the file did not exist then.
    pub fn snapshot(&self, prefix: &str) -> Option<String> {
        self.snapshots
            .lock()
            .iter()
            .find(|(p, _)| p == prefix)
            .and_then(|(_, content)| content.clone())
    }

    /// Command lines run so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().iter().map(ToString::to_string).collect()
    }

    /// Recorded commands, including their working directories.
    pub fn commands(&self) -> Vec<ExternalCommand> {
        self.calls.lock().clone()
    }

    /// How many command lines started with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|line| line.starts_with(prefix))
            .count()
    }

    fn materialize_checkout(&self, dir: &Path) {
        let checkout = dir.join(SOURCE_REPOSITORY);
        std::fs::create_dir_all(&checkout).unwrap();
        for (relative, content) in &self.checkout_files {
            let path = checkout.join(relative);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, command: &ExternalCommand) -> Result<CommandOutput, CommandError> {
        self.calls.lock().push(command.clone());
        let line = command.to_string();

        for (prefix, relative) in &self.watched {
            if line.starts_with(prefix.as_str()) {
                let content = command
                    .get_current_dir()
                    .and_then(|dir| std::fs::read_to_string(dir.join(relative)).ok());
                self.snapshots.lock().push((prefix.clone(), content));
            }
        }

        let scripted = {
            let mut scripts = self.scripts.lock();
            scripts
                .iter_mut()
                .find(|(prefix, _)| line.starts_with(prefix.as_str()))
                .and_then(|(_, queue)| {
                    if queue.len() > 1 {
                        queue.pop_front()
                    } else {
                        queue.front().cloned()
                    }
                })
        };

        let output = scripted.unwrap_or_else(|| CommandOutput::success_with(""));

        if output.success()
            && line.starts_with("git clone")
            && let Some(dir) = command.get_current_dir()
        {
            self.materialize_checkout(dir);
        }

        Ok(output)
    }
}
