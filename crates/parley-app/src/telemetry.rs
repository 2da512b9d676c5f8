//! Usage telemetry.
//!
//! The session reports every handled keystroke and every submission to a
//! [`Telemetry`] sink. Recording is fire-and-forget: the session logs and
//! discards sink errors so telemetry can never break editing or messaging.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::TelemetryError;

/// Aggregate view of recorded events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TelemetrySummary {
    /// Events accepted since startup.
    pub total_events: u64,
}

/// Destination for usage events.
pub trait Telemetry: Send + Sync {
    /// Record one event with its attributes.
    fn record(&self, event: &str, attributes: &[(&str, &str)]) -> Result<(), TelemetryError>;

    /// Aggregate of everything recorded so far.
    fn summary(&self) -> TelemetrySummary;
}

/// In-process sink that counts events and traces them.
#[derive(Debug, Default)]
pub struct EventCounter {
    total: AtomicU64,
}

impl EventCounter {
    /// Create a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Telemetry for EventCounter {
    fn record(&self, event: &str, attributes: &[(&str, &str)]) -> Result<(), TelemetryError> {
        if event.is_empty() {
            return Err(TelemetryError::Rejected {
                event: event.to_owned(),
                reason: "event name is empty".to_owned(),
            });
        }

        let total = self.total.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::trace!(event, ?attributes, total, "telemetry event");
        Ok(())
    }

    fn summary(&self) -> TelemetrySummary {
        TelemetrySummary { total_events: self.total.load(Ordering::Relaxed) }
    }
}

/// Sink that drops every event. Useful when telemetry is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTelemetry;

impl Telemetry for NoTelemetry {
    fn record(&self, _event: &str, _attributes: &[(&str, &str)]) -> Result<(), TelemetryError> {
        Err(TelemetryError::Unavailable)
    }

    fn summary(&self) -> TelemetrySummary {
        TelemetrySummary::default()
    }
}
