//! Session configuration.

use std::time::Duration;

/// Simulated delay between a user message and its reply.
pub const DEFAULT_REPLY_LATENCY: Duration = Duration::from_millis(500);

/// Canned assistant replies.
pub const DEFAULT_REPLIES: &[&str] = &[
    "That's interesting, tell me more.",
    "I see what you mean.",
    "Could you elaborate on that?",
    "Thanks for sharing!",
    "Hmm, let me think about that.",
];

/// Configuration for a [`crate::Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Delay before each reply is delivered.
    pub reply_latency: Duration,
    /// Candidate replies, chosen uniformly at random. Must not be empty; an
    /// empty set falls back to [`DEFAULT_REPLIES`].
    pub replies: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reply_latency: DEFAULT_REPLY_LATENCY,
            replies: DEFAULT_REPLIES.iter().map(|&reply| reply.to_owned()).collect(),
        }
    }
}

impl SessionConfig {
    /// Override the reply latency.
    #[must_use]
    pub fn with_reply_latency(mut self, latency: Duration) -> Self {
        self.reply_latency = latency;
        self
    }

    /// Override the canned replies.
    #[must_use]
    pub fn with_replies<I, S>(mut self, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.replies = replies.into_iter().map(Into::into).collect();
        self
    }
}
