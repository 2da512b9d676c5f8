//! Parley entry point.
//!
//! # Usage
//!
//! ```bash
//! # Default 500ms reply latency, no logging
//! parley
//!
//! # Faster replies, debug logs to a file
//! parley --latency-ms 100 --log-level debug --log-file parley.log
//! ```

use std::{fs::OpenOptions, sync::Mutex};

use clap::Parser;
use parley_tui::{Args, Runtime, Session, SystemEnv, TerminalDriver};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    tracing::info!(latency_ms = args.latency_ms, telemetry = !args.no_telemetry, "Parley starting");

    let session = Session::new(SystemEnv::new(), args.session_config(), args.telemetry());
    let driver = TerminalDriver::with_tick(args.tick())?;
    let summary = Runtime::new(driver, session).run().await?;

    tracing::info!(delivered = summary.delivered, events = summary.telemetry.total_events, "Parley exiting");
    Ok(())
}

/// Install the file logger if `--log-file` was given.
fn init_logging(args: &Args) -> Result<(), std::io::Error> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(filter)
        .init();
    Ok(())
}
