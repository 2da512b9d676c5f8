//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering.

use std::{
    collections::VecDeque,
    io::{self, Stdout, stdout},
    time::Duration,
};

use crossterm::{
    ExecutableCommand,
    event::{DisableBracketedPaste, EnableBracketedPaste, Event, EventStream},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use parley_app::{Driver, InputEvent, KeyEvent, View};
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;

use crate::{input, ui};

/// Interval between ticks while no input arrives.
pub const DEFAULT_TICK: Duration = Duration::from_millis(100);

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Owns the terminal for its whole lifetime: raw mode, the alternate screen
/// and bracketed paste are enabled on construction and restored on
/// [`Driver::stop`] or drop, whichever comes first.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    pending: VecDeque<KeyEvent>,
    tick: Duration,
    restored: bool,
}

impl TerminalDriver {
    /// Take over the terminal, ticking every `tick` while idle.
    pub fn with_tick(tick: Duration) -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        let terminal = undo_on_error(enter_screen, leave_screen)?;

        Ok(Self {
            terminal,
            event_stream: EventStream::new(),
            pending: VecDeque::new(),
            tick,
            restored: false,
        })
    }

    fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;

        leave_screen();
        let _ = self.terminal.show_cursor();
    }

    /// Translate one terminal event. `None` means nothing to report.
    fn translate(&mut self, event: Event) -> Option<InputEvent> {
        match event {
            Event::Key(key) => input::convert_key(&key).map(InputEvent::Key),
            Event::Paste(text) => {
                self.pending.extend(input::paste_keys(&text));
                self.pending.pop_front().map(InputEvent::Key)
            },
            Event::Resize(cols, rows) => Some(InputEvent::Resize(cols, rows)),
            _ => None,
        }
    }
}

fn enter_screen() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut out = stdout();
    out.execute(EnterAlternateScreen)?;
    out.execute(EnableBracketedPaste)?;
    Terminal::new(CrosstermBackend::new(out))
}

/// Best-effort teardown of everything [`enter_screen`] and raw mode set up.
fn leave_screen() {
    if let Err(err) = disable_raw_mode() {
        tracing::warn!(%err, "failed to leave raw mode");
    }
    let mut out = stdout();
    let _ = out.execute(DisableBracketedPaste);
    let _ = out.execute(LeaveAlternateScreen);
}

/// Run `setup`, calling `undo` before returning its error.
fn undo_on_error<T>(setup: impl FnOnce() -> io::Result<T>, undo: impl FnOnce()) -> io::Result<T> {
    setup().inspect_err(|err| {
        tracing::warn!(%err, "terminal setup failed, restoring");
        undo();
    })
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_event(&mut self) -> Result<Option<InputEvent>, Self::Error> {
        if let Some(key) = self.pending.pop_front() {
            return Ok(Some(InputEvent::Key(key)));
        }

        loop {
            tokio::select! {
                biased;

                maybe_event = self.event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => {
                            if let Some(event) = self.translate(event) {
                                return Ok(Some(event));
                            }
                        },
                        Some(Err(err)) => return Err(TerminalError::Io(err)),
                        None => return Ok(None),
                    }
                }

                () = tokio::time::sleep(self.tick) => return Ok(Some(InputEvent::Tick)),
            }
        }
    }

    fn render(&mut self, view: &View<'_>) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| ui::render(frame, view))?;
        Ok(())
    }

    fn stop(&mut self) {
        self.restore();
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.restore();
    }
}
