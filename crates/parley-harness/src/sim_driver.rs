//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as `TerminalDriver` but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`parley_app::Runtime`] orchestration code runs in both production and
//! simulation.
//!
//! Input is a script of [`SimStep`]s. A [`SimStep::Wait`] parks the driver on
//! the tokio clock, which lets scheduled replies arrive in between keystrokes.
//! Every render is captured as a [`RenderedFrame`] and, when a registry is
//! attached, checked against the invariants.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use parley_app::{Cursor, Driver, InputEvent, KeyEvent, Message, Mode, View};
use tokio::time::Instant;

use crate::invariants::{InvariantRegistry, SessionSnapshot, Violation};

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl SimDriverError {
    fn from_violations(context: &str, violations: &[Violation]) -> Self {
        let messages: Vec<_> = violations.iter().map(ToString::to_string).collect();
        Self(format!("invariant violation {context}: {}", messages.join("; ")))
    }
}

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// One scripted input step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimStep {
    /// Deliver a keystroke.
    Key(KeyEvent),
    /// Let virtual time pass without input.
    Wait(Duration),
    /// Deliver a resize event.
    Resize(u16, u16),
}

/// Everything the runtime asked the driver to draw, captured by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFrame {
    /// Buffer content joined with newlines.
    pub text: String,
    /// Buffer cursor.
    pub cursor: Cursor,
    /// Input mode.
    pub mode: Mode,
    /// Delivered messages.
    pub transcript: Vec<Message>,
    /// Replies still scheduled.
    pub replies_in_flight: usize,
}

impl RenderedFrame {
    fn capture(view: &View<'_>) -> Self {
        Self {
            text: view.buffer.to_text(),
            cursor: view.buffer.cursor(),
            mode: view.mode,
            transcript: view.transcript.to_vec(),
            replies_in_flight: view.replies_in_flight,
        }
    }
}

/// Shared state for script injection.
///
/// This allows injection and inspection from outside the runtime while the
/// driver itself is owned by it.
#[derive(Default)]
struct SharedState {
    script: VecDeque<SimStep>,
    wait_until: Option<Instant>,
    frames: Vec<RenderedFrame>,
    stopped: bool,
}

/// Simulation driver for deterministic testing.
///
/// Cloning yields another handle onto the same script and captured frames, so
/// a test keeps one clone for inspection after moving the other into the
/// runtime.
#[derive(Clone, Default)]
pub struct SimDriver {
    state: Arc<Mutex<SharedState>>,
    invariants: Option<Arc<InvariantRegistry>>,
}

impl SimDriver {
    /// Create a driver with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable invariant checking on every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(Arc::new(registry));
        self
    }

    /// Append a step to the script.
    pub fn push(&self, step: SimStep) {
        self.lock().script.push_back(step);
    }

    /// Append a keystroke.
    pub fn inject_key(&self, key: KeyEvent) {
        self.push(SimStep::Key(key));
    }

    /// Append one keystroke per character of `text`.
    ///
    /// A `'\n'` becomes a line feed, the key that breaks a line without
    /// submitting.
    pub fn type_text(&self, text: &str) {
        let mut state = self.lock();
        for ch in text.chars() {
            let key = if ch == '\n' { KeyEvent::line_feed() } else { KeyEvent::char(ch) };
            state.script.push_back(SimStep::Key(key));
        }
    }

    /// Append a pause of `duration` virtual time.
    pub fn inject_wait(&self, duration: Duration) {
        self.push(SimStep::Wait(duration));
    }

    /// Append a resize.
    pub fn inject_resize(&self, cols: u16, rows: u16) {
        self.push(SimStep::Resize(cols, rows));
    }

    /// Steps not yet consumed.
    pub fn pending_steps(&self) -> usize {
        self.lock().script.len()
    }

    /// All captured frames, oldest first.
    pub fn frames(&self) -> Vec<RenderedFrame> {
        self.lock().frames.clone()
    }

    /// The most recent frame.
    pub fn last_frame(&self) -> Option<RenderedFrame> {
        self.lock().frames.last().cloned()
    }

    /// Number of renders so far.
    pub fn render_count(&self) -> usize {
        self.lock().frames.len()
    }

    /// `true` once the runtime has called [`Driver::stop`].
    pub fn was_stopped(&self) -> bool {
        self.lock().stopped
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Next step to act on, or the deadline to sleep until first.
    ///
    /// A pending wait stays recorded until it has fully elapsed, so dropping
    /// the poll future mid-sleep resumes the same wait on the next poll.
    fn next_step(&self) -> Result<Option<SimStep>, Instant> {
        let mut state = self.lock();
        if let Some(deadline) = state.wait_until {
            if Instant::now() < deadline {
                return Err(deadline);
            }
            state.wait_until = None;
        }
        Ok(state.script.pop_front())
    }

    fn begin_wait(&self, duration: Duration) {
        self.lock().wait_until = Some(Instant::now() + duration);
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn poll_event(&mut self) -> Result<Option<InputEvent>, Self::Error> {
        loop {
            match self.next_step() {
                Err(deadline) => tokio::time::sleep_until(deadline).await,
                Ok(None) => return Ok(None),
                Ok(Some(SimStep::Key(key))) => return Ok(Some(InputEvent::Key(key))),
                Ok(Some(SimStep::Resize(cols, rows))) => {
                    return Ok(Some(InputEvent::Resize(cols, rows)));
                },
                Ok(Some(SimStep::Wait(duration))) => {
                    tracing::trace!(?duration, "simulated pause");
                    self.begin_wait(duration);
                },
            }
        }
    }

    fn render(&mut self, view: &View<'_>) -> Result<(), Self::Error> {
        let frame = RenderedFrame::capture(view);
        let index = {
            let mut state = self.lock();
            state.frames.push(frame);
            state.frames.len() - 1
        };

        if let Some(registry) = &self.invariants {
            let snapshot = SessionSnapshot::from_view(view);
            registry
                .check_all(&snapshot)
                .map_err(|violations| SimDriverError::from_violations(&format!("at frame {index}"), &violations))?;
        }
        Ok(())
    }

    fn stop(&mut self) {
        self.lock().stopped = true;
    }
}

#[cfg(test)]
mod tests {
    use parley_app::TextBuffer;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn script_is_replayed_in_order() {
        let mut driver = SimDriver::new();
        driver.type_text("a\nb");
        driver.inject_resize(80, 24);

        let mut events = Vec::new();
        while let Some(event) = driver.poll_event().await.ok().flatten() {
            events.push(event);
        }

        assert_eq!(events, vec![
            InputEvent::Key(KeyEvent::char('a')),
            InputEvent::Key(KeyEvent::line_feed()),
            InputEvent::Key(KeyEvent::char('b')),
            InputEvent::Resize(80, 24),
        ]);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_consumes_virtual_time() {
        let mut driver = SimDriver::new();
        driver.inject_wait(Duration::from_secs(3));
        driver.inject_key(KeyEvent::enter());

        let start = Instant::now();
        let event = driver.poll_event().await.ok().flatten();

        assert_eq!(event, Some(InputEvent::Key(KeyEvent::enter())));
        assert!(start.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_wait_resumes_where_it_left_off() {
        let mut driver = SimDriver::new();
        driver.inject_wait(Duration::from_secs(2));
        driver.inject_key(KeyEvent::enter());

        let start = Instant::now();
        let cut_short =
            tokio::time::timeout(Duration::from_secs(1), driver.poll_event()).await.is_err();
        assert!(cut_short);

        let event = driver.poll_event().await.ok().flatten();
        assert_eq!(event, Some(InputEvent::Key(KeyEvent::enter())));
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[test]
    fn render_captures_frame_and_checks_invariants() {
        let mut driver = SimDriver::new().with_invariants(InvariantRegistry::standard());
        let inspector = driver.clone();

        let mut buffer = TextBuffer::new();
        buffer.insert('h');
        let view = View {
            buffer: &buffer,
            mode: Mode::Normal,
            transcript: &[],
            replies_in_flight: 0,
            telemetry: Default::default(),
        };

        assert!(driver.render(&view).is_ok());
        assert_eq!(inspector.render_count(), 1);
        assert_eq!(inspector.last_frame().map(|frame| frame.text), Some("h".to_owned()));
    }

    #[test]
    fn stop_is_observable_from_clones() {
        let mut driver = SimDriver::new();
        let inspector = driver.clone();
        driver.stop();
        assert!(inspector.was_stopped());
    }
}
