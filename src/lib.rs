//! # nvim-version-info
//!
//! Reports the installed and latest published versions of the Neovim Python
//! client, and whether the installed copy is current.
//!
//! A run does four things in order:
//!
//! - **Local version** - locate the module on the interpreter's search path
//!   and read `Version:` from the sibling `.dist-info`/`.egg-info` metadata
//! - **Latest version** - read `info.version` from the package index JSON API
//! - **Compare** - lenient ordering, see [`version::compare_versions`]
//! - **Emit** - four lines on stdout, or `g:version_info` when run inside
//!   Neovim
//!
//! Failures in either resolver are reported as `"unknown"` unless debug mode
//! is on, in which case the first failure aborts the run.
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use nvim_version_info::{IndexClient, Interpreter, NvimBridge, ReportOptions, Reporter, Result};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = IndexClient::builder().build()?;
//!     let interpreter = Interpreter::new("python3", Duration::from_secs(30));
//!     let bridge = NvimBridge::from_env("nvim", None);
//!
//!     let reporter = Reporter::new("neovim", "neovim", interpreter, client, bridge);
//!     let report = reporter.gather(&ReportOptions::default()).await?;
//!     println!("{} -> {} ({})", report.installed, report.latest, report.status);
//!     Ok(())
//! }
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # Four-line report
//! nvim-version-info
//!
//! # Fail loudly instead of printing "unknown"
//! nvim-version-info --debug
//!
//! # Another interpreter, JSON output
//! nvim-version-info --python python3.12 --format json
//! ```
//!
//! ## Configuration
//!
//! Configure via file (`--config nvim-version-info.toml`) or environment
//! variables `NVIM_VERSION_INFO__SECTION__KEY`:
//!
//! ```toml
//! [package]
//! name = "pynvim"
//! timeout_seconds = 10
//!
//! [interpreter]
//! program = "python3"
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod host;
pub mod interpreter;
pub mod local;
pub mod report;
pub mod types;
pub mod utils;
pub mod version;

// Re-export commonly used items at the crate root for convenience
pub use client::{IndexClient, IndexClientBuilder};
pub use error::{FailureClass, Result, VersionInfoError};
pub use host::{HostBridge, NvimBridge};
pub use interpreter::Interpreter;
pub use local::LocalResolver;
pub use report::{Emitted, Reporter};
pub use types::{InterpreterInfo, OutputFormat, ReportOptions, Status, VersionReport, UNKNOWN};
pub use version::{compare_versions, LooseVersion};

pub use config::{AppConfig, EnvironmentConfig};

/// Default package index base URL
pub const DEFAULT_INDEX_URL: &str = "https://pypi.org";

/// Default distribution to report on
pub const DEFAULT_PACKAGE: &str = "neovim";

/// Default Python interpreter
pub const DEFAULT_PYTHON: &str = "python3";

/// Default editor executable for host delivery
pub const DEFAULT_HOST_PROGRAM: &str = "nvim";

/// Host variable receiving the report
pub const DEFAULT_HOST_VARIABLE: &str = "version_info";

/// Default user agent for requests
pub const DEFAULT_USER_AGENT: &str = concat!("nvim-version-info/", env!("CARGO_PKG_VERSION"));

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
