//! Command-line interface for the version reporter

use crate::client::IndexClient;
use crate::config::{AppConfig, EnvironmentConfig};
use crate::error::{Result, VersionInfoError};
use crate::host::NvimBridge;
use crate::interpreter::Interpreter;
use crate::report::Reporter;
use crate::types::{OutputFormat, ReportOptions};
use crate::utils::{is_embedded, parse_timeout};
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Neovim Python client version report
#[derive(Parser)]
#[command(
    name = "nvim-version-info",
    version,
    about = "Report installed and latest versions of the Neovim Python client",
    long_about = "Prints four lines: the Python version, the installed client version,
the latest version on the package index, and whether the installed copy is up to date.
When started from inside Neovim the result is stored in g:version_info instead."
)]
pub struct Cli {
    /// Let resolver failures abort the run instead of reporting "unknown"
    #[arg(long, global = true)]
    pub debug: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "lines")]
    pub format: OutputFormat,

    /// Enable verbose logging on stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Distribution name on the package index
    #[arg(long, global = true)]
    pub package: Option<String>,

    /// Import name, if it differs from the distribution name
    #[arg(long, global = true)]
    pub module: Option<String>,

    /// Custom package index URL
    #[arg(long, global = true)]
    pub index_url: Option<String>,

    /// Timeout for the index request (e.g. 30s, 2m)
    #[arg(long, global = true)]
    pub timeout: Option<String>,

    /// Python interpreter to report on
    #[arg(long, global = true)]
    pub python: Option<String>,

    /// Search this directory for the module instead of the interpreter's path
    #[arg(long = "search-path", global = true)]
    pub search_paths: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Print the version report (default)
    Report,

    /// Generate sample configuration file
    Config {
        /// Output file (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Run the CLI application
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = if let Some(config_path) = &cli.config {
        AppConfig::load_from_file(Some(config_path))?
    } else {
        AppConfig::load()?
    };

    let mut final_config = config;
    EnvironmentConfig::detect().apply_overrides(&mut final_config);
    apply_cli_overrides(&cli, &mut final_config);
    final_config.validate().map_err(VersionInfoError::validation)?;

    init_logging(cli.verbose, cli.quiet, &final_config.logging.level);

    match cli.command {
        Some(Commands::Config { output }) => handle_config(output.as_deref()),
        Some(Commands::Report) | None => {
            let options = ReportOptions {
                debug: cli.debug,
                embedded: is_embedded(),
                format: cli.format,
            };
            let timeout = match &cli.timeout {
                Some(timeout) => parse_timeout(timeout)?,
                None => Duration::from_secs(final_config.package.timeout_seconds),
            };
            handle_report(&final_config, timeout, &options).await
        }
    }
}

/// Fold command-line flags into the loaded configuration
fn apply_cli_overrides(cli: &Cli, config: &mut AppConfig) {
    if let Some(package) = &cli.package {
        config.package.name = package.clone();
    }
    if let Some(module) = &cli.module {
        config.package.module = Some(module.clone());
    }
    if let Some(url) = &cli.index_url {
        config.package.index_url = url.clone();
    }
    if let Some(python) = &cli.python {
        config.interpreter.program = python.clone();
    }
    if !cli.search_paths.is_empty() {
        config.interpreter.search_paths = cli.search_paths.clone();
    }
}

/// Handle the report command
async fn handle_report(config: &AppConfig, timeout: Duration, options: &ReportOptions) -> Result<()> {
    debug!("Report options: {:?}", options);

    let client = IndexClient::builder()
        .base_url(&config.package.index_url)
        .user_agent(&config.package.user_agent)
        .timeout(timeout)
        .build()?;

    let bridge = NvimBridge::from_env(&config.host.program, config.host.server.clone());
    let interpreter = Interpreter::new(&config.interpreter.program, timeout);

    let reporter = Reporter::new(
        &config.package.name,
        config.package.module_name(),
        interpreter,
        client,
        bridge,
    )
    .with_search_paths(config.interpreter.search_paths.clone())
    .with_variable(&config.host.variable);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let emitted = reporter.run(options, &mut out).await?;
    debug!("Report emitted to {:?}", emitted);

    Ok(())
}

/// Handle the config command
fn handle_config(output: Option<&Path>) -> Result<()> {
    let sample_config = AppConfig::create_sample_config();

    if let Some(output_path) = output {
        std::fs::write(output_path, &sample_config)?;
        info!("Sample configuration written to: {}", output_path.display());
    } else {
        println!("{}", sample_config);
    }

    Ok(())
}

/// Initialize logging based on verbosity settings
fn init_logging(verbose: bool, quiet: bool, configured: &str) {
    let level = if quiet {
        tracing::Level::ERROR
    } else if verbose {
        tracing::Level::DEBUG
    } else {
        configured.parse().unwrap_or(tracing::Level::WARN)
    };

    // Logs go to stderr; stdout carries only the report
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_flag_anywhere() {
        let cli = Cli::try_parse_from(["nvim-version-info", "report", "--debug"]).unwrap();
        assert!(cli.debug);
        assert!(matches!(cli.command, Some(Commands::Report)));

        let cli = Cli::try_parse_from(["nvim-version-info", "--debug"]).unwrap();
        assert!(cli.debug);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "nvim-version-info",
            "--package",
            "pynvim",
            "--python",
            "python3.12",
            "--search-path",
            "/a",
            "--search-path",
            "/b",
        ])
        .unwrap();

        let mut config = AppConfig::default();
        apply_cli_overrides(&cli, &mut config);

        assert_eq!(config.package.name, "pynvim");
        assert_eq!(config.interpreter.program, "python3.12");
        assert_eq!(
            config.interpreter.search_paths,
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
