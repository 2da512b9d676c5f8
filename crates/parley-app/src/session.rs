//! Chat session.
//!
//! [`Session`] is the explicit context object that owns all per-session
//! state: the edit buffer, the input mode, the message channel, the
//! conversation engine, the transcript, and the telemetry sink.
//!
//! # Concurrency
//!
//! Keystrokes are applied through `&mut self`, so the buffer and mode have a
//! single writer and keys are handled strictly in arrival order. The
//! transcript is written only by the projector task started in
//! [`Session::new`]; everything else reads snapshots.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::{
    Action, ChatError, ConversationEngine, Environment, KeyEvent, MessageChannel, MessageId, Mode,
    SessionConfig, Subscription, Telemetry, TelemetrySummary, TextBuffer, Transcript,
    TranscriptProjector, dispatch,
};

/// A single interactive chat session.
pub struct Session<E: Environment> {
    buffer: TextBuffer,
    mode: Mode,
    channel: MessageChannel,
    engine: ConversationEngine<E>,
    transcript: Transcript,
    projector: Option<JoinHandle<usize>>,
    telemetry: Arc<dyn Telemetry>,
}

impl<E: Environment> Session<E> {
    /// Start a session.
    ///
    /// Spawns the transcript projector, so this must be called from within a
    /// tokio runtime.
    pub fn new(env: E, config: SessionConfig, telemetry: Arc<dyn Telemetry>) -> Self {
        let channel = MessageChannel::new();
        let transcript = Transcript::new();
        let projector = TranscriptProjector::new(channel.subscribe(), transcript.clone()).spawn();
        let engine =
            ConversationEngine::new(env, channel.clone(), config.reply_latency, config.replies);

        tracing::debug!(latency = ?engine.latency(), "session started");

        Self {
            buffer: TextBuffer::new(),
            mode: Mode::Normal,
            channel,
            engine,
            transcript,
            projector: Some(projector),
            telemetry,
        }
    }

    /// Action the key would produce in the current state. Does not apply it.
    pub fn dispatch(&self, key: &KeyEvent) -> Action {
        dispatch(key, self.mode, self.buffer.is_empty())
    }

    /// Dispatch a key and apply the resulting action.
    ///
    /// A `return` on a blank buffer is ignored rather than reported.
    ///
    /// # Errors
    ///
    /// - [`ChatError::ChannelClosed`] if a submit happens after shutdown
    /// - [`ChatError::OutOfBounds`] if the buffer invariant is broken (fatal)
    pub fn handle_key(&mut self, key: &KeyEvent) -> Result<Action, ChatError> {
        let action = self.dispatch(key);
        self.record("key", &[("action", action.name()), ("mode", mode_name(self.mode))]);
        self.apply(action)?;
        Ok(action)
    }

    /// Apply an action to the session.
    ///
    /// # Errors
    ///
    /// See [`handle_key`](Self::handle_key).
    pub fn apply(&mut self, action: Action) -> Result<(), ChatError> {
        match action {
            Action::Exit => self.shutdown(),
            Action::ToggleMode => {
                self.mode = self.mode.toggled();
                tracing::debug!(mode = mode_name(self.mode), "mode toggled");
            },
            Action::Submit => match self.submit_buffer() {
                Err(ChatError::EmptyInput) => tracing::debug!("ignoring submit of blank buffer"),
                other => other?,
            },
            Action::DeleteBackward => self.buffer.delete_backward(),
            Action::ClearBuffer => self.buffer.clear(),
            Action::MoveCursor(direction) => self.buffer.move_cursor(direction),
            Action::InsertChar(ch) => self.buffer.insert(ch),
            Action::Noop => {},
        }

        if let Err(err) = self.buffer.check_bounds() {
            tracing::error!(%err, ?action, "buffer invariant violated");
            return Err(err);
        }
        Ok(())
    }

    /// Submit `text` as a user message. The buffer is not touched.
    ///
    /// # Errors
    ///
    /// - [`ChatError::EmptyInput`] if `text` is blank
    /// - [`ChatError::ChannelClosed`] after shutdown
    pub fn submit(&mut self, text: &str) -> Result<MessageId, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyInput);
        }

        let id = self.engine.submit(text.to_owned())?;
        let chars = text.chars().count().to_string();
        self.record("message_submitted", &[("chars", &chars)]);
        Ok(id)
    }

    /// Attach a new consumer to the live message stream.
    pub fn subscribe(&self) -> Subscription {
        self.channel.subscribe()
    }

    /// Stop the session. Idempotent.
    ///
    /// Pending replies are abandoned and the channel is closed; the projector
    /// finishes once it has drained what was already delivered.
    pub fn shutdown(&mut self) {
        if self.channel.is_closed() {
            return;
        }
        self.engine.abandon();
        self.channel.shutdown();
        tracing::debug!(delivered = self.channel.offered(), "session shut down");
    }

    /// Shut down and wait for the projector to drain.
    ///
    /// Returns the number of messages the projector appended.
    pub async fn close(mut self) -> usize {
        self.shutdown();
        let Some(projector) = self.projector.take() else {
            return 0;
        };

        match projector.await {
            Ok(appended) => appended,
            Err(err) => {
                tracing::warn!(%err, "transcript projector failed");
                self.transcript.len()
            },
        }
    }

    /// `true` once [`shutdown`](Self::shutdown) has run.
    pub fn is_closed(&self) -> bool {
        self.channel.is_closed()
    }

    /// The edit buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Current input mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Handle to the transcript.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Replies scheduled but not yet delivered.
    pub fn replies_in_flight(&mut self) -> usize {
        self.engine.in_flight()
    }

    /// Telemetry aggregate.
    pub fn telemetry(&self) -> TelemetrySummary {
        self.telemetry.summary()
    }

    fn submit_buffer(&mut self) -> Result<(), ChatError> {
        let text = self.buffer.to_text();
        self.submit(&text)?;
        self.buffer.clear();
        Ok(())
    }

    fn record(&self, event: &str, attributes: &[(&str, &str)]) {
        if let Err(err) = self.telemetry.record(event, attributes) {
            tracing::debug!(%err, event, "telemetry event dropped");
        }
    }
}

impl<E: Environment> Drop for Session<E> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn mode_name(mode: Mode) -> &'static str {
    match mode {
        Mode::Normal => "normal",
        Mode::Help => "help",
    }
}
