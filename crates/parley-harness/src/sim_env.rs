//! Simulated environment for deterministic testing.
//!
//! `SimEnv` is the simulation implementation of the Environment trait.
//!
//! # Capabilities
//!
//! - Time comes from the tokio clock, so a paused test runtime controls it
//! - Seeded `ChaCha8` RNG: the same seed always yields the same reply choices and
//!   message ids
//! - Wall clock derived from a fixed epoch plus elapsed virtual time, so
//!   message timestamps are reproducible too

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use parley_app::Environment;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::time::Instant;

/// Wall clock reading at simulation start: 2023-11-14T22:13:20Z.
pub const SIM_EPOCH_MILLIS: u64 = 1_700_000_000_000;

/// Deterministic environment backed by the tokio clock and a seeded RNG.
///
/// Clones share one RNG stream, so the order of draws across the engine and
/// its reply tasks decides the values, exactly as in production.
#[derive(Clone)]
pub struct SimEnv {
    rng: Arc<Mutex<ChaCha8Rng>>,
    started: Instant,
    epoch_millis: u64,
}

impl SimEnv {
    /// Create an environment seeded with `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))),
            started: Instant::now(),
            epoch_millis: SIM_EPOCH_MILLIS,
        }
    }

    /// Start the wall clock at `epoch_millis` instead of [`SIM_EPOCH_MILLIS`].
    #[must_use]
    pub fn with_epoch_millis(mut self, epoch_millis: u64) -> Self {
        self.epoch_millis = epoch_millis;
        self
    }

    /// Virtual time elapsed since this environment was created.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Default for SimEnv {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl Environment for SimEnv {
    type Instant = Instant;

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner).fill_bytes(buffer);
    }

    fn wall_clock_millis(&self) -> u64 {
        let elapsed = u64::try_from(self.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.epoch_millis.saturating_add(elapsed)
    }
}
