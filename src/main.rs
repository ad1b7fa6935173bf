//! Main entry point for the version reporter

use nvim_version_info::cli::run;
use nvim_version_info::error::Result;
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        error!("Application error: {}", e);
        eprintln!("Error: {}", e.user_message());
        process::exit(1);
    }
}

async fn run_app() -> Result<()> {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {}", panic_info);
        process::exit(1);
    }));

    run().await
}
