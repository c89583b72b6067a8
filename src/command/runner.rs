// ABOUTME: CommandRunner trait, command description, and the tokio-backed runner.
// ABOUTME: Each call runs one program to completion and captures its output.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use super::error::CommandError;

/// A program invocation: executable, arguments, and optional working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
}

impl ExternalCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Output of a command that exited 0 and printed `stdout`.
    pub fn success_with(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Output of a command that exited with `code` and printed `stderr`.
    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Capability to run external programs.
///
/// `run` only fails when the program cannot be started; a non-zero exit is
/// reported through [`CommandOutput::exit_code`]. Use [`CommandRunner::check`]
/// to turn a non-zero exit into an error.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &ExternalCommand) -> Result<CommandOutput, CommandError>;

    /// Run the command and fail unless it exits 0. Returns stdout.
    async fn check(&self, command: &ExternalCommand) -> Result<String, CommandError> {
        tracing::debug!(command = %command, "running external command");
        let output = self.run(command).await?;

        if output.success() {
            Ok(output.stdout)
        } else {
            tracing::debug!(
                command = %command,
                exit_code = ?output.exit_code,
                "external command failed"
            );
            Err(CommandError::Failed {
                command: command.to_string(),
                code: output.exit_code,
                stderr: output.stderr,
            })
        }
    }
}

/// Runs commands as local child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, command: &ExternalCommand) -> Result<CommandOutput, CommandError> {
        let mut process = Command::new(command.program());
        process
            .args(command.get_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(dir) = command.get_current_dir() {
            process.current_dir(dir);
        }

        let output = process.output().await.map_err(|source| CommandError::Spawn {
            command: command.to_string(),
            source,
        })?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
