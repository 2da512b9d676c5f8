//! Environment abstraction for deterministic testing.
//!
//! Decouples the conversation engine from system resources (time,
//! randomness). Production uses the real clock and OS entropy; simulation uses
//! a paused tokio clock and a seeded RNG, so reply timing and reply choice are
//! reproducible.

use std::time::Duration;

/// Abstract environment providing time, randomness, and async sleep.
///
/// Implementations MUST guarantee:
///
/// - `now()` never goes backwards
/// - `wall_clock_millis()` is suitable for ordering messages created by one
///   session (it may jump with the system clock, but not in simulation)
pub trait Environment: Clone + Send + Sync + 'static {
    /// The instant type used by this environment.
    type Instant: Copy + Ord + Send + Sync + std::ops::Sub<Output = Duration>;

    /// Current time (monotonic).
    fn now(&self) -> Self::Instant;

    /// Sleeps for the specified duration.
    ///
    /// This is the ONLY async method in the trait. It backs the simulated
    /// reply latency and nothing else.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;

    /// Fills the provided buffer with random bytes.
    ///
    /// Given the same seed, a simulated environment produces the same bytes.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Milliseconds since the Unix epoch, used for message timestamps.
    fn wall_clock_millis(&self) -> u64;

    /// Generates a random `u64`.
    fn random_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        self.random_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }

    /// Generates a random `u128`. Used for message ids.
    fn random_u128(&self) -> u128 {
        let mut bytes = [0u8; 16];
        self.random_bytes(&mut bytes);
        u128::from_be_bytes(bytes)
    }

    /// Picks an index in `0..len` uniformly at random.
    ///
    /// Returns 0 when `len` is 0 or 1.
    fn random_index(&self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        // Rejection sampling keeps the choice uniform for any `len`.
        let len = len as u64;
        let zone = u64::MAX - (u64::MAX % len);
        loop {
            let value = self.random_u64();
            if value < zone {
                return (value % len) as usize;
            }
        }
    }
}
