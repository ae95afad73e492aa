//! Local classifier command provider
//!
//! Runs an installed classifier executable as a subprocess. The text is fed on
//! stdin and the command prints a single `{"label": ..., "score": ...}` object.

use async_trait::async_trait;
use log::debug;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::{OracleError, Result};
use crate::oracle::{Classification, SentimentOracle};

/// Executable looked up on `PATH` when no explicit path is configured
pub const DEFAULT_COMMAND: &str = "preprod-classify";

/// Provider that shells out to a local classifier
pub struct CommandOracle {
    model: String,
    command_path: PathBuf,
}

impl CommandOracle {
    /// Create a new command provider
    ///
    /// Returns an error if the classifier executable is not found.
    pub fn new(model: &str, command_path: Option<PathBuf>) -> Result<Self> {
        let command_path = match command_path {
            Some(path) => {
                if !path.exists() {
                    return Err(OracleError::Unavailable(format!(
                        "Classifier command not found at specified path: {}",
                        path.display()
                    )));
                }
                path
            }
            None => which::which(DEFAULT_COMMAND).map_err(|_| {
                OracleError::Unavailable(format!(
                    "Classifier command '{}' not found in PATH",
                    DEFAULT_COMMAND
                ))
            })?,
        };

        Ok(Self {
            model: model.to_string(),
            command_path,
        })
    }
}

/// Parse the classifier's stdout
fn parse_output(stdout: &str) -> Result<Classification> {
    let line = stdout
        .lines()
        .map(str::trim)
        .rfind(|l| !l.is_empty())
        .ok_or_else(|| OracleError::InvalidResponse("Classifier printed nothing".into()))?;

    serde_json::from_str(line)
        .map_err(|e| OracleError::InvalidResponse(format!("{}: {}", e, line)))
}

#[async_trait]
impl SentimentOracle for CommandOracle {
    async fn classify(&self, text: &str) -> Result<Classification> {
        debug!(
            "Running {} --model {}",
            self.command_path.display(),
            self.model
        );

        let mut child = Command::new(&self.command_path)
            .args(["--model", &self.model])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| OracleError::CommandError(format!("Failed to execute: {}", e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
            // Dropping stdin closes the pipe so the classifier sees EOF
        }

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OracleError::CommandError(format!(
                "Command failed: {}",
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| OracleError::CommandError(format!("Invalid UTF-8: {}", e)))?;

        parse_output(&stdout)
    }

    fn name(&self) -> &'static str {
        "Classifier command"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn is_available(&self) -> Result<()> {
        // Existence was checked in constructor
        Ok(())
    }
}
