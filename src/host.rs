//! Handing the report to a host editor instead of stdout

use crate::error::{Result, VersionInfoError};
use std::process::Command;
use tracing::debug;

/// Something that can receive the report as an editor variable
pub trait HostBridge {
    /// Assign `value` to the variable `name` inside the host
    fn set_variable(&self, name: &str, value: &serde_json::Value) -> Result<()>;
}

impl<T: HostBridge + ?Sized> HostBridge for &T {
    fn set_variable(&self, name: &str, value: &serde_json::Value) -> Result<()> {
        (**self).set_variable(name, value)
    }
}

/// Sends the assignment to a running Neovim through its RPC server address.
///
/// The variable lands in the global scope (`g:`), since an external process
/// cannot reach the local scope of the calling function.
#[derive(Debug, Clone)]
pub struct NvimBridge {
    program: String,
    server: Option<String>,
}

impl NvimBridge {
    pub fn new<S: Into<String>>(program: S, server: Option<String>) -> Self {
        Self {
            program: program.into(),
            server,
        }
    }

    /// Build a bridge for the current process, falling back to the server
    /// address Neovim exports to its children.
    pub fn from_env<S: Into<String>>(program: S, configured: Option<String>) -> Self {
        let server = configured
            .or_else(|| std::env::var("NVIM").ok())
            .or_else(|| std::env::var("NVIM_LISTEN_ADDRESS").ok())
            .filter(|address| !address.is_empty());
        Self::new(program, server)
    }

    pub fn server(&self) -> Option<&str> {
        self.server.as_deref()
    }
}

/// The Vim expression that performs the assignment
pub fn assignment_expr(name: &str, value: &serde_json::Value) -> String {
    let command = format!("let g:{} = {}", name, value);
    format!("execute('{}')", command.replace('\'', "''"))
}

impl HostBridge for NvimBridge {
    fn set_variable(&self, name: &str, value: &serde_json::Value) -> Result<()> {
        let server = self
            .server
            .as_deref()
            .ok_or_else(|| VersionInfoError::host("no Neovim server address in environment"))?;

        let expr = assignment_expr(name, value);
        debug!("Sending to {}: {}", server, expr);

        let output = Command::new(&self.program)
            .arg("--server")
            .arg(server)
            .arg("--remote-expr")
            .arg(&expr)
            .output()
            .map_err(|e| VersionInfoError::host(format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(VersionInfoError::host(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(())
    }
}
