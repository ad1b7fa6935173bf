//! Data types shared by the resolvers and the reporter

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Sentinel used wherever a version could not be determined
pub const UNKNOWN: &str = "unknown";

/// Whether the installed copy is current
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "up to date")]
    UpToDate,
    #[serde(rename = "outdated")]
    Outdated,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::UpToDate => "up to date",
            Status::Outdated => "outdated",
            Status::Unknown => UNKNOWN,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four values a run produces
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VersionReport {
    /// Version of the Python interpreter (major.minor.patch)
    pub runtime: String,

    /// Version found in the installed distribution metadata
    pub installed: String,

    /// Version advertised by the package index
    pub latest: String,

    /// Comparison outcome
    pub status: Status,
}

impl VersionReport {
    /// Report lines in their fixed order: runtime, installed, latest, status
    pub fn lines(&self) -> [String; 4] {
        [
            self.runtime.clone(),
            self.installed.clone(),
            self.latest.clone(),
            self.status.to_string(),
        ]
    }

    /// The report as the JSON array handed to the host editor
    pub fn to_json_array(&self) -> serde_json::Value {
        serde_json::Value::from(self.lines().to_vec())
    }
}

/// What the interpreter reports about the Python environment
#[derive(Debug, Clone, PartialEq)]
pub struct InterpreterInfo {
    /// major.minor.patch
    pub version: String,

    /// Module search path in import order
    pub path: Vec<PathBuf>,
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Four plain lines: runtime, installed, latest, status
    #[default]
    Lines,
    /// JSON object
    Json,
    /// YAML object
    Yaml,
}

/// Explicit mode switches for a single run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// Propagate resolver failures instead of reporting "unknown"
    pub debug: bool,

    /// Running inside the host editor; try to hand the report over there
    pub embedded: bool,

    /// Format used when the report goes to stdout
    pub format: OutputFormat,
}
