// ABOUTME: Library root for gke-deploy - exposes the pipeline for the binary and tests.
// ABOUTME: The main binary is in main.rs.

pub mod command;
pub mod config;
pub mod deploy;
pub mod error;
pub mod output;
pub mod types;
