//! External commands as retryable operations

use holdfast_robustness::{Classify, ErrorKind};
use serde::Serialize;
use std::fmt;
use std::io;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::trace;

/// A program and its arguments, run afresh on every attempt
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

/// Captured output of a successful run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Error)]
pub enum CommandError {
    /// The program could not be started
    #[error("Cannot launch `{program}`")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The program ran but reported failure
    #[error("`{program}` failed with {status}{}", stderr_note(.stderr))]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
}

fn stderr_note(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

impl Classify for CommandError {
    fn error_kind(&self) -> ErrorKind {
        match self {
            // a missing or non-executable program will not appear by retrying
            CommandError::Launch { source, .. } => match source.kind() {
                io::ErrorKind::NotFound
                | io::ErrorKind::PermissionDenied
                | io::ErrorKind::Unsupported => ErrorKind::Fatal,
                _ => ErrorKind::Transient,
            },
            CommandError::Failed { .. } => ErrorKind::Transient,
        }
    }
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Split an argv-style list; `None` when empty
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }

    /// Run once; a non-zero exit status is an error
    pub async fn run(&self) -> Result<CommandOutput, CommandError> {
        trace!(command = %self, "running command");
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| CommandError::Launch {
                program: self.program.clone(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            return Err(CommandError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr,
            });
        }

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr,
        })
    }

    /// Run once and return stdout with surrounding whitespace removed
    pub async fn observe(&self) -> Result<String, CommandError> {
        let output = self.run().await?;
        Ok(output.stdout.trim().to_string())
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
