//! Terminal UI for Parley
//!
//! A thin shell over [`parley_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`parley_app::Runtime`].
//!
//! This crate only handles key normalization, rendering and process setup.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cli;
pub mod input;
pub mod system_env;
pub mod terminal;
pub mod ui;

pub use cli::Args;
pub use parley_app::{Driver, Runtime, Session};
pub use system_env::SystemEnv;
pub use terminal::{TerminalDriver, TerminalError};
