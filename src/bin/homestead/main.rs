//! Operator tool for the homestead dashboard backend.
//!
//! Usage:
//!
//! ```text
//! homestead [--config <path>] [--verbose] <workers|tasks|supplies|dev|feedback> ...
//! ```
//!
//! Settings come from `homestead.toml` (or `--config`) and `HOMESTEAD_*`
//! environment variables. Log output is filtered by `HOMESTEAD_LOG`.
//!
//! ```text
//! homestead dev list --view implement
//! homestead dev fail 6f1c... --note "500 on submit" --collab
//! homestead feedback review 0b9e... approve --priority high
//! homestead feedback watch --interval-secs 30
//! ```

mod cli;
mod commands;

use clap::Parser;
use homestead::config::HomesteadConfig;
use homestead::telemetry::init_tracing;
use std::io;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose)?;
    let config = HomesteadConfig::load_from(cli.config.as_deref())?;
    let app = commands::App::connect(&config, io::stdout())?;
    app.dispatch(cli.command).await?;
    Ok(())
}
