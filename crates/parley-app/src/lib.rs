//! Application core for Parley
//!
//! Pure editing and dispatch state machines plus the asynchronous message
//! plumbing behind the chat transcript, with a generic runtime so the same
//! code runs in the terminal and in deterministic simulation.
//!
//! # Components
//!
//! - [`TextBuffer`]: multi-line edit buffer with a cursor
//! - [`dispatch`]: ordered keystroke to [`Action`] rules
//! - [`MessageChannel`]: ordered broadcast hand-off for [`Message`]s
//! - [`ConversationEngine`]: user message plus delayed canned reply
//! - [`TranscriptProjector`]: drains the channel into the [`Transcript`]
//! - [`Session`]: owns all of the above for one interactive session
//! - [`Driver`] / [`Runtime`]: platform I/O abstraction and the event loop

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod buffer;
mod channel;
pub mod config;
mod dispatch;
mod driver;
mod engine;
mod env;
mod error;
mod event;
mod input;
mod runtime;
mod session;
mod state;
mod telemetry;
mod transcript;

pub use action::Action;
pub use buffer::{Cursor, Direction, TextBuffer};
pub use channel::{MessageChannel, Subscription, TryRecvError};
pub use config::SessionConfig;
pub use dispatch::{dispatch, matching_rule};
pub use driver::{Driver, View};
pub use engine::ConversationEngine;
pub use env::Environment;
pub use error::{ChatError, TelemetryError};
pub use event::InputEvent;
pub use input::KeyEvent;
pub use runtime::{RunSummary, Runtime, RuntimeError};
pub use session::Session;
pub use state::{Message, MessageId, Mode, Role};
pub use telemetry::{EventCounter, NoTelemetry, Telemetry, TelemetrySummary};
pub use transcript::{Transcript, TranscriptProjector};
