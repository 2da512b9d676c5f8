//! Deterministic simulation harness for Parley testing.
//!
//! Simulated implementations of the [`parley_app::Environment`] and
//! [`parley_app::Driver`] traits for deterministic, reproducible tests of the
//! full session: scripted keystrokes, virtual time for reply latency, and a
//! seeded RNG for reply choice and message ids.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all execution paths, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the buffer
//! and transcript invariants.
//!
//! # Virtual Time
//!
//! [`SimEnv`] sleeps on the tokio clock. Run tests with
//! `#[tokio::test(start_paused = true)]` and reply latency elapses instantly
//! whenever the runtime is otherwise idle.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod invariants;
pub mod sim_driver;
pub mod sim_env;

pub use invariants::{
    BufferNotEmpty, CursorInBounds, Invariant, InvariantKind, InvariantRegistry, InvariantResult,
    RepliesFollowUsers, SessionSnapshot, UniqueMessageIds, Violation,
};
pub use sim_driver::{RenderedFrame, SimDriver, SimDriverError, SimStep};
pub use sim_env::SimEnv;
