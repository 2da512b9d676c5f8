//! Transcript state and the projector that fills it.
//!
//! The [`Transcript`] is the append-only log of delivered messages that the
//! renderer draws. Exactly one writer exists: the [`TranscriptProjector`]
//! task draining a channel [`Subscription`]. Readers take snapshots and can
//! watch a change counter to know when to redraw.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::{sync::watch, task::JoinHandle};

use crate::{Message, Subscription};

#[derive(Debug)]
struct Inner {
    messages: RwLock<Vec<Message>>,
    changes: watch::Sender<usize>,
}

/// Shared, append-only message log.
///
/// Cloning yields another handle to the same log.
#[derive(Debug, Clone)]
pub struct Transcript {
    inner: Arc<Inner>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        let (changes, _) = watch::channel(0);
        Self { inner: Arc::new(Inner { messages: RwLock::new(Vec::new()), changes }) }
    }

    pub(crate) fn append(&self, message: Message) {
        let len = {
            let mut messages =
                self.inner.messages.write().unwrap_or_else(PoisonError::into_inner);
            messages.push(message);
            messages.len()
        };
        self.inner.changes.send_replace(len);
    }

    /// Copy of every message delivered so far, oldest first.
    pub fn snapshot(&self) -> Vec<Message> {
        self.inner.messages.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of delivered messages.
    pub fn len(&self) -> usize {
        self.inner.messages.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// `true` if nothing has been delivered yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Most recently delivered message.
    pub fn last(&self) -> Option<Message> {
        self.inner.messages.read().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }

    /// Receiver that observes the transcript length after every append.
    pub fn watch(&self) -> watch::Receiver<usize> {
        self.inner.changes.subscribe()
    }
}

/// Drains a [`Subscription`] into a [`Transcript`].
///
/// Performs no transformation beyond appending; arrival order is preserved.
#[derive(Debug)]
pub struct TranscriptProjector {
    subscription: Subscription,
    transcript: Transcript,
}

impl TranscriptProjector {
    /// Create a projector. The subscription should be taken before any
    /// message is offered so nothing is missed.
    pub fn new(subscription: Subscription, transcript: Transcript) -> Self {
        Self { subscription, transcript }
    }

    /// Run until the channel is closed and drained.
    ///
    /// Returns the number of messages appended.
    pub async fn run(mut self) -> usize {
        let mut appended = 0;
        while let Some(message) = self.subscription.recv().await {
            tracing::debug!(id = %message.id, role = %message.role, "projecting message");
            self.transcript.append(message);
            appended += 1;
        }

        tracing::debug!(appended, "transcript projector finished");
        appended
    }

    /// Run on a new tokio task.
    pub fn spawn(self) -> JoinHandle<usize> {
        tokio::spawn(self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MessageChannel, MessageId, Role};

    #[tokio::test]
    async fn projector_appends_in_arrival_order() {
        let channel = MessageChannel::new();
        let transcript = Transcript::new();
        let handle = TranscriptProjector::new(channel.subscribe(), transcript.clone()).spawn();

        channel.offer(Message::user(MessageId::new(1), "hi", 10)).ok();
        channel.offer(Message::assistant(MessageId::new(2), "hello", 20)).ok();
        channel.shutdown();

        assert_eq!(handle.await.ok(), Some(2));
        let roles: Vec<_> = transcript.snapshot().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant]);
        assert_eq!(transcript.last().map(|m| m.content), Some("hello".to_string()));
    }

    #[tokio::test]
    async fn watch_observes_appends() {
        let transcript = Transcript::new();
        let mut changes = transcript.watch();

        transcript.append(Message::system(MessageId::new(1), "welcome", 0));

        assert!(changes.changed().await.is_ok());
        assert_eq!(*changes.borrow_and_update(), 1);
        assert_eq!(transcript.len(), 1);
    }
}
