//! Probing the Python interpreter whose environment is being reported on

use crate::error::{Result, VersionInfoError};
use crate::types::InterpreterInfo;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Prints the interpreter version and module search path as one JSON object
const QUERY_SCRIPT: &str =
    "import json, sys; print(json.dumps({'version': list(sys.version_info[:3]), 'path': sys.path}))";

#[derive(Debug, Deserialize)]
struct QueryReply {
    version: Vec<u64>,
    path: Vec<String>,
}

/// A Python interpreter reachable as an executable
#[derive(Debug, Clone)]
pub struct Interpreter {
    program: String,
    timeout: Duration,
}

impl Interpreter {
    pub fn new<S: Into<String>>(program: S, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the interpreter once and collect its version and `sys.path`
    pub async fn query(&self) -> Result<InterpreterInfo> {
        debug!("Querying interpreter: {}", self.program);

        let mut command = Command::new(&self.program);
        command.arg("-c").arg(QUERY_SCRIPT).kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                VersionInfoError::interpreter(
                    &self.program,
                    format!("no answer within {}s", self.timeout.as_secs()),
                )
            })?
            .map_err(|e| VersionInfoError::interpreter(&self.program, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VersionInfoError::interpreter(
                &self.program,
                format!("exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        parse_reply(&output.stdout)
            .map_err(|e| VersionInfoError::interpreter(&self.program, e.to_string()))
    }
}

fn parse_reply(stdout: &[u8]) -> std::result::Result<InterpreterInfo, serde_json::Error> {
    let reply: QueryReply = serde_json::from_slice(stdout)?;

    let version = reply
        .version
        .iter()
        .map(|part| part.to_string())
        .collect::<Vec<_>>()
        .join(".");

    // An empty entry stands for the working directory
    let path = reply
        .path
        .into_iter()
        .map(|entry| {
            if entry.is_empty() {
                PathBuf::from(".")
            } else {
                PathBuf::from(entry)
            }
        })
        .collect();

    Ok(InterpreterInfo { version, path })
}
