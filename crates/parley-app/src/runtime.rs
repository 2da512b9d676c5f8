//! Generic runtime for session orchestration.
//!
//! The Runtime drives the event loop, coordinating between:
//! - [`Session`]: editing, dispatch and message delivery
//! - [`Driver`]: platform-specific input and rendering
//!
//! Driver input and transcript changes are multiplexed with
//! `tokio::select!`, so replies show up while the user is idle.

use thiserror::Error;
use tokio::sync::watch;

use crate::{Action, ChatError, Driver, Environment, InputEvent, Session, TelemetrySummary, View};

/// Runtime errors.
#[derive(Debug, Error)]
pub enum RuntimeError<E: std::error::Error + 'static> {
    /// Driver I/O failed.
    #[error("driver error: {0}")]
    Driver(#[source] E),

    /// Session state is corrupted.
    #[error("session error: {0}")]
    Session(#[from] ChatError),
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Messages delivered to the transcript.
    pub delivered: usize,
    /// Telemetry aggregate at exit.
    pub telemetry: TelemetrySummary,
}

/// Generic runtime that orchestrates a [`Session`] and a [`Driver`].
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `E`: Environment for time and randomness
pub struct Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    driver: D,
    session: Session<E>,
}

impl<D, E> Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    /// Create a runtime over an already started session.
    pub fn new(driver: D, session: Session<E>) -> Self {
        Self { driver, session }
    }

    /// Run the main event loop.
    ///
    /// Returns when the user exits or the driver runs out of input. The
    /// session is closed and the driver stopped on every path.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails or the session reports a fatal
    /// error.
    pub async fn run(mut self) -> Result<RunSummary, RuntimeError<D::Error>> {
        let result = self.event_loop().await;

        let Self { mut driver, session } = self;
        let telemetry = session.telemetry();
        let delivered = session.close().await;
        driver.stop();

        result?;
        tracing::info!(delivered, events = telemetry.total_events, "session ended");
        Ok(RunSummary { delivered, telemetry })
    }

    async fn event_loop(&mut self) -> Result<(), RuntimeError<D::Error>> {
        let mut changes: watch::Receiver<usize> = self.session.transcript().watch();
        let mut watching = true;

        self.render()?;

        loop {
            tokio::select! {
                event = self.driver.poll_event() => {
                    let Some(event) = event.map_err(RuntimeError::Driver)? else {
                        tracing::debug!("input closed");
                        return Ok(());
                    };
                    if self.handle_event(event)? {
                        return Ok(());
                    }
                }

                changed = changes.changed(), if watching => {
                    if changed.is_ok() {
                        self.render()?;
                    } else {
                        watching = false;
                    }
                }
            }
        }
    }

    /// Handle one driver event. Returns `true` if the session should end.
    fn handle_event(&mut self, event: InputEvent) -> Result<bool, RuntimeError<D::Error>> {
        match event {
            InputEvent::Key(key) => match self.session.handle_key(&key) {
                Ok(Action::Exit) => return Ok(true),
                Ok(_) => {},
                Err(err) if err.is_fatal() => return Err(err.into()),
                Err(err) => tracing::warn!(%err, "key not applied"),
            },
            InputEvent::Resize(cols, rows) => tracing::debug!(cols, rows, "terminal resized"),
            InputEvent::Tick => return Ok(false),
        }

        self.render()?;
        Ok(false)
    }

    fn render(&mut self) -> Result<(), RuntimeError<D::Error>> {
        let replies_in_flight = self.session.replies_in_flight();
        let messages = self.session.transcript().snapshot();
        let view = View {
            buffer: self.session.buffer(),
            mode: self.session.mode(),
            transcript: &messages,
            replies_in_flight,
            telemetry: self.session.telemetry(),
        };

        self.driver.render(&view).map_err(RuntimeError::Driver)
    }

    /// Get a reference to the session.
    pub fn session(&self) -> &Session<E> {
        &self.session
    }
}
