//! Conversation engine.
//!
//! Turns a submitted text into a user [`Message`] and, after a simulated
//! latency, a canned assistant reply. Both go through the
//! [`MessageChannel`]; the engine never touches the transcript.
//!
//! Each submission gets its own reply task, so submissions never wait on each
//! other. A user message is always offered before its reply task starts, so
//! it precedes its reply in every subscription. Replies to different
//! submissions may interleave freely.

use std::{sync::Arc, time::Duration};

use tokio::task::JoinSet;

use crate::{ChatError, Environment, Message, MessageChannel, MessageId, config::DEFAULT_REPLIES};

/// Publishes user messages and schedules their replies.
pub struct ConversationEngine<E: Environment> {
    env: E,
    channel: MessageChannel,
    replies: Arc<[String]>,
    latency: Duration,
    in_flight: JoinSet<()>,
}

impl<E: Environment> ConversationEngine<E> {
    /// Create an engine publishing onto `channel`.
    ///
    /// An empty `replies` set is replaced by the default replies.
    pub fn new(env: E, channel: MessageChannel, latency: Duration, replies: Vec<String>) -> Self {
        let replies: Arc<[String]> = if replies.is_empty() {
            tracing::warn!("empty reply set configured, using default replies");
            DEFAULT_REPLIES.iter().map(|&reply| reply.to_owned()).collect()
        } else {
            replies.into()
        };

        Self { env, channel, replies, latency, in_flight: JoinSet::new() }
    }

    /// Publish `content` as a user message and schedule a reply.
    ///
    /// Does not check for blank content; callers do. Must be called from
    /// within a tokio runtime.
    ///
    /// # Errors
    ///
    /// [`ChatError::ChannelClosed`] if the channel was shut down. Nothing is
    /// scheduled in that case.
    pub fn submit(&mut self, content: String) -> Result<MessageId, ChatError> {
        self.reap();

        let id = MessageId::new(self.env.random_u128());
        let message = Message::user(id, content, self.env.wall_clock_millis());
        self.channel.offer(message)?;

        let env = self.env.clone();
        let channel = self.channel.clone();
        let replies = Arc::clone(&self.replies);
        let latency = self.latency;
        self.in_flight.spawn(deliver_reply(env, channel, replies, latency, id));

        tracing::debug!(%id, in_flight = self.in_flight.len(), "user message submitted");
        Ok(id)
    }

    /// Replies scheduled but not yet delivered.
    pub fn in_flight(&mut self) -> usize {
        self.reap();
        self.in_flight.len()
    }

    /// Cancel every pending reply.
    pub fn abandon(&mut self) {
        self.reap();
        let pending = self.in_flight.len();
        self.in_flight.abort_all();
        if pending > 0 {
            tracing::debug!(pending, "abandoned pending replies");
        }
    }

    /// Configured reply latency.
    pub fn latency(&self) -> Duration {
        self.latency
    }

    fn reap(&mut self) {
        while let Some(result) = self.in_flight.try_join_next() {
            if let Err(err) = result
                && err.is_panic()
            {
                tracing::error!(%err, "reply task panicked");
            }
        }
    }
}

async fn deliver_reply<E: Environment>(
    env: E,
    channel: MessageChannel,
    replies: Arc<[String]>,
    latency: Duration,
    in_reply_to: MessageId,
) {
    let started = env.now();
    env.sleep(latency).await;

    let content = replies.get(env.random_index(replies.len())).cloned().unwrap_or_default();
    let reply = Message::assistant(MessageId::new(env.random_u128()), content, env.wall_clock_millis());
    let id = reply.id;

    match channel.offer(reply) {
        Ok(()) => {
            let elapsed = env.now() - started;
            tracing::debug!(%id, %in_reply_to, ?elapsed, "reply delivered");
        },
        Err(err) => tracing::debug!(%in_reply_to, %err, "reply dropped"),
    }
}
