//! Gathering the versions, classifying them, and emitting the report

use crate::client::IndexClient;
use crate::error::{Result, VersionInfoError};
use crate::host::HostBridge;
use crate::interpreter::Interpreter;
use crate::local::LocalResolver;
use crate::types::{OutputFormat, ReportOptions, Status, VersionReport, UNKNOWN};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

/// Where the report ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emitted {
    /// The host editor received the report
    Host,
    /// The report was written to the output stream
    Output,
}

/// Either pass a resolver failure on (debug) or degrade it to "unknown"
pub fn settle(result: Result<String>, debug: bool, what: &str) -> Result<String> {
    match result {
        Ok(version) => Ok(version),
        Err(e) if debug => Err(e),
        Err(e) => {
            debug!("Could not determine {} version: {}", what, e);
            Ok(UNKNOWN.to_string())
        }
    }
}

/// Runs one report: local resolve, remote resolve, compare, emit
pub struct Reporter<B: HostBridge> {
    package: String,
    module: String,
    search_paths: Vec<PathBuf>,
    interpreter: Interpreter,
    client: IndexClient,
    bridge: B,
    variable: String,
}

impl<B: HostBridge> Reporter<B> {
    pub fn new(
        package: impl Into<String>,
        module: impl Into<String>,
        interpreter: Interpreter,
        client: IndexClient,
        bridge: B,
    ) -> Self {
        Self {
            package: package.into(),
            module: module.into(),
            search_paths: Vec::new(),
            interpreter,
            client,
            bridge,
            variable: crate::DEFAULT_HOST_VARIABLE.to_string(),
        }
    }

    /// Use these directories instead of asking the interpreter for `sys.path`
    pub fn with_search_paths(mut self, search_paths: Vec<PathBuf>) -> Self {
        self.search_paths = search_paths;
        self
    }

    /// Name of the host variable receiving the report
    pub fn with_variable(mut self, variable: impl Into<String>) -> Self {
        self.variable = variable.into();
        self
    }

    /// Resolve both versions and classify them.
    ///
    /// With `options.debug` the first resolver failure is returned and
    /// nothing after it runs.
    pub async fn gather(&self, options: &ReportOptions) -> Result<VersionReport> {
        let queried = self.interpreter.query().await;
        let runtime = match &queried {
            Ok(info) => info.version.clone(),
            Err(e) => {
                debug!("Could not determine runtime version: {}", e);
                UNKNOWN.to_string()
            }
        };

        let local = if !self.search_paths.is_empty() {
            LocalResolver::new(&self.module, self.search_paths.clone()).resolve()
        } else {
            match queried {
                Ok(info) => LocalResolver::new(&self.module, info.path).resolve(),
                Err(e) => Err(e),
            }
        };
        let installed = settle(local, options.debug, "installed")?;

        let latest = settle(
            self.client.latest_version(&self.package).await,
            options.debug,
            "latest",
        )?;

        let status = Status::classify(&installed, &latest);
        info!(
            "{}: installed {}, latest {}, {}",
            self.package, installed, latest, status
        );

        Ok(VersionReport {
            runtime,
            installed,
            latest,
            status,
        })
    }

    /// Hand the report to the host when embedded, otherwise write it to `out`.
    ///
    /// A host that cannot be reached is not an error; the report goes to
    /// `out` instead.
    pub fn emit<W: Write>(
        &self,
        report: &VersionReport,
        options: &ReportOptions,
        out: &mut W,
    ) -> Result<Emitted> {
        if options.embedded {
            match self
                .bridge
                .set_variable(&self.variable, &report.to_json_array())
            {
                Ok(()) => {
                    debug!("Report delivered to host variable {}", self.variable);
                    return Ok(Emitted::Host);
                }
                Err(e) => debug!("Host delivery failed, printing instead: {}", e),
            }
        }

        write_report(report, options.format, out)?;
        Ok(Emitted::Output)
    }

    /// Gather and emit in one go
    pub async fn run<W: Write>(&self, options: &ReportOptions, out: &mut W) -> Result<Emitted> {
        let report = self.gather(options).await?;
        self.emit(&report, options, out)
    }
}

/// Write the report in the requested format
pub fn write_report<W: Write>(
    report: &VersionReport,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Lines => {
            writeln!(out, "{}", report.lines().join("\n"))?;
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
        }
        OutputFormat::Yaml => {
            write!(out, "{}", serde_yaml::to_string(report)?)?;
        }
    }
    out.flush().map_err(VersionInfoError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VersionReport {
        VersionReport {
            runtime: "3.11.4".to_string(),
            installed: "0.4.3".to_string(),
            latest: "0.4.3".to_string(),
            status: Status::UpToDate,
        }
    }

    #[test]
    fn test_settle_degrades_without_debug() {
        let err = VersionInfoError::PackageNotPublished("neovim".to_string());
        assert_eq!(settle(Err(err), false, "latest").unwrap(), UNKNOWN);
    }

    #[test]
    fn test_settle_propagates_with_debug() {
        let err = VersionInfoError::PackageNotInstalled {
            module: "neovim".to_string(),
            searched: 2,
        };
        assert!(matches!(
            settle(Err(err), true, "installed"),
            Err(VersionInfoError::PackageNotInstalled { .. })
        ));
        assert_eq!(settle(Ok("1.0".to_string()), true, "x").unwrap(), "1.0");
    }

    #[test]
    fn test_write_lines() {
        let mut out = Vec::new();
        write_report(&sample(), OutputFormat::Lines, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "3.11.4\n0.4.3\n0.4.3\nup to date\n"
        );
    }

    #[test]
    fn test_write_json() {
        let mut out = Vec::new();
        write_report(&sample(), OutputFormat::Json, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["installed"], "0.4.3");
        assert_eq!(value["status"], "up to date");
    }

    #[test]
    fn test_write_yaml() {
        let mut out = Vec::new();
        write_report(&sample(), OutputFormat::Yaml, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("runtime:"));
        assert!(text.contains("up to date"));
    }
}
