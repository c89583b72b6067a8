// ABOUTME: Polls the service listing until the load balancer assigns a public IP.
// ABOUTME: A pending entry keeps polling; a missing entry fails immediately.

use std::net::Ipv4Addr;
use std::time::Duration;

use regex::Regex;
use tokio::time::Instant;

use crate::command::{CommandError, CommandRunner, ExternalCommand};
use crate::output::Output;
use crate::types::{ResourceName, ServiceEndpoint};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Errors from waiting on a service endpoint.
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("no service named \"{0}\" found")]
    ServiceNotFound(ResourceName),

    #[error(
        "service \"{deployment}\" has no public IP after {} ({attempts} polls)",
        humantime::format_duration(*.waited)
    )]
    Timeout {
        deployment: ResourceName,
        waited: Duration,
        attempts: u32,
    },

    #[error(transparent)]
    Command(#[from] CommandError),
}

/// How often to poll, and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    /// `None` waits until an address appears or the service disappears.
    pub timeout: Option<Duration>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
        }
    }
}

/// State of one service as seen in a single listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    /// No row for the service.
    Missing,
    /// Row present, external address not assigned yet.
    Pending,
    /// External address assigned.
    Assigned(Ipv4Addr),
}

/// Matches a service's row in `kubectl get services` output.
///
/// Both the legacy `NAME CLUSTER-IP EXTERNAL-IP ...` layout and the current
/// `NAME TYPE CLUSTER-IP EXTERNAL-IP ...` layout are recognized.
/// When EXTERNAL-IP lists several comma-separated addresses the first one is
/// taken.
#[derive(Debug, Clone)]
pub struct ServiceListing {
    name: ResourceName,
    row: Regex,
}

impl ServiceListing {
    pub fn for_service(name: &ResourceName) -> Self {
        let ip = r"[0-9]{1,3}(?:\.[0-9]{1,3}){3}";
        let pattern = format!(
            r"^{}[\t ]+(?:[A-Za-z][A-Za-z0-9-]*[\t ]+)?{ip}[\t ]+({ip})(?:[\t ,]|$)",
            regex::escape(name.as_str()),
        );
        let row = Regex::new(&pattern).expect("service row pattern is valid");

        Self {
            name: name.clone(),
            row,
        }
    }

    /// Classify the service in one listing.
    pub fn status(&self, listing: &str) -> ServiceStatus {
        let mut found = false;

        for line in listing.lines() {
            if line.split_whitespace().next() != Some(self.name.as_str()) {
                continue;
            }
            found = true;

            let address = self
                .row
                .captures(line)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<Ipv4Addr>().ok());

            if let Some(address) = address {
                return ServiceStatus::Assigned(address);
            }
        }

        if found {
            ServiceStatus::Pending
        } else {
            ServiceStatus::Missing
        }
    }
}

/// The command listing exposed services.
pub fn list_services_command() -> ExternalCommand {
    ExternalCommand::new("kubectl").args(["get", "services"])
}

/// Poll until the service has a public IP.
///
/// # Errors
///
/// - `EndpointError::ServiceNotFound` as soon as a listing has no row for the service.
/// - `EndpointError::Timeout` if `settings.timeout` elapses first.
/// - `EndpointError::Command` if listing services fails.
pub async fn wait_for_endpoint<R: CommandRunner + ?Sized>(
    runner: &R,
    deployment: &ResourceName,
    settings: PollSettings,
    output: &Output,
) -> Result<ServiceEndpoint, EndpointError> {
    output.info(&format!("Polling to get public IP for {deployment}"));

    let listing = ServiceListing::for_service(deployment);
    let command = list_services_command();
    let start = Instant::now();
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        let stdout = runner.check(&command).await?;

        match listing.status(&stdout) {
            ServiceStatus::Assigned(address) => {
                tracing::debug!(%deployment, %address, attempts, "public IP assigned");
                return Ok(ServiceEndpoint::new(address));
            }
            ServiceStatus::Missing => {
                return Err(EndpointError::ServiceNotFound(deployment.clone()));
            }
            ServiceStatus::Pending => {
                tracing::debug!(%deployment, attempts, "public IP not assigned yet");
            }
        }

        let mut delay = settings.interval;
        if let Some(timeout) = settings.timeout {
            let waited = start.elapsed();
            let Some(remaining) = timeout.checked_sub(waited).filter(|r| !r.is_zero()) else {
                return Err(EndpointError::Timeout {
                    deployment: deployment.clone(),
                    waited,
                    attempts,
                });
            };
            delay = delay.min(remaining);
        }

        tokio::time::sleep(delay).await;
    }
}
