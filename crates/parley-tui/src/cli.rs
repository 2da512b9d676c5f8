//! Command-line configuration.
//!
//! [`Args`] is parsed with clap and mapped onto [`SessionConfig`] and the
//! telemetry sink, the only knobs a session has.

use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use parley_app::{EventCounter, NoTelemetry, SessionConfig, Telemetry, config::DEFAULT_REPLY_LATENCY};

use crate::terminal::DEFAULT_TICK;

/// Parley terminal chat client
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "parley")]
#[command(about = "Terminal chat client with a simulated assistant")]
#[command(version)]
pub struct Args {
    /// Delay before each simulated reply, in milliseconds
    #[arg(long, default_value_t = DEFAULT_REPLY_LATENCY.as_millis() as u64)]
    pub latency_ms: u64,

    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Write logs to this file. Without it nothing is logged, since the
    /// terminal owns stdout
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Disable usage telemetry
    #[arg(long)]
    pub no_telemetry: bool,

    /// Idle tick interval in milliseconds
    #[arg(long, default_value_t = DEFAULT_TICK.as_millis() as u64)]
    pub tick_ms: u64,
}

impl Args {
    /// Session configuration for these arguments.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::default().with_reply_latency(Duration::from_millis(self.latency_ms))
    }

    /// Telemetry sink for these arguments.
    pub fn telemetry(&self) -> Arc<dyn Telemetry> {
        if self.no_telemetry { Arc::new(NoTelemetry) } else { Arc::new(EventCounter::new()) }
    }

    /// Idle tick interval.
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["parley"]).unwrap();

        assert_eq!(args.session_config(), SessionConfig::default());
        assert_eq!(args.log_level, "info");
        assert_eq!(args.log_file, None);
        assert!(!args.no_telemetry);
        assert_eq!(args.tick(), DEFAULT_TICK);
    }

    #[test]
    fn latency_is_configurable() {
        let args = Args::try_parse_from(["parley", "--latency-ms", "50"]).unwrap();
        assert_eq!(args.session_config().reply_latency, Duration::from_millis(50));
    }

    #[test]
    fn no_telemetry_rejects_events() {
        let args = Args::try_parse_from(["parley", "--no-telemetry"]).unwrap();
        let telemetry = args.telemetry();

        assert!(telemetry.record("key", &[]).is_err());
        assert_eq!(telemetry.summary().total_events, 0);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Args::try_parse_from(["parley", "--server", "x"]).is_err());
    }
}
