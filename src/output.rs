// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet, and JSON output modes; handed to every pipeline stage.

use serde::Serialize;
use std::time::Instant;

use crate::types::ServiceEndpoint;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// `INFO:`/`WARN:` progress lines followed by the result
    Normal,
    /// Only the result and errors
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
#[derive(Debug)]
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    /// Start timing the deployment.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Print an informational progress line (suppressed in quiet mode).
    pub fn info(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => println!("INFO: {message}"),
            OutputMode::Quiet => {}
            OutputMode::Json => self.emit_stdout("info", message, None),
        }
    }

    /// Print a non-fatal warning (suppressed in quiet mode).
    pub fn warn(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => println!("WARN: {message}"),
            OutputMode::Quiet => {}
            OutputMode::Json => self.emit_stdout("warning", message, None),
        }
    }

    /// Print the discovered endpoint. Shown in every mode.
    pub fn endpoint(&self, endpoint: &ServiceEndpoint) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("INFO: Deployment finished in {elapsed:.1}s");
                }
                println!("{endpoint}");
            }
            OutputMode::Quiet => println!("{endpoint}"),
            OutputMode::Json => {
                let address = endpoint.to_string();
                self.emit_stdout("endpoint", "public IP assigned", Some(&address));
            }
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => {
                if let Some(json) = self.event_json("error", message, None) {
                    eprintln!("{json}");
                }
            }
        }
    }

    fn emit_stdout(&self, event: &str, message: &str, address: Option<&str>) {
        if let Some(json) = self.event_json(event, message, address) {
            println!("{json}");
        }
    }

    fn event_json(&self, event: &str, message: &str, address: Option<&str>) -> Option<String> {
        let event = JsonEvent {
            event,
            message,
            address,
            duration_secs: self.start_time.map(|_| self.elapsed_secs()),
        };
        serde_json::to_string(&event).ok()
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}
