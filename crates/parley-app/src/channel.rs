//! Ordered in-memory message channel.
//!
//! [`MessageChannel`] is the hand-off between message producers (the
//! conversation engine's submit path and its reply tasks) and consumers (the
//! transcript projector, renderers, tests).
//!
//! # Semantics
//!
//! - Unbounded: [`MessageChannel::offer`] never blocks.
//! - Ordered: every subscription yields messages in offer order, with no
//!   duplicates and no loss while the channel is open.
//! - Broadcast: each [`Subscription`] receives every message offered after it
//!   was created.
//! - Closing is explicit: after [`MessageChannel::shutdown`] offers fail with
//!   [`ChatError::ChannelClosed`], and each subscription ends once it has
//!   drained what was buffered before the shutdown.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use futures::Stream;
use tokio::sync::Notify;

use crate::{ChatError, Message};

#[derive(Debug, Default)]
struct State {
    queues: HashMap<u64, VecDeque<Message>>,
    next_subscriber: u64,
    offered: u64,
    closed: bool,
}

#[derive(Debug, Default)]
struct Shared {
    state: Mutex<State>,
    notify: Notify,
}

impl Shared {
    /// Lock the state. Critical sections never panic, so a poisoned lock
    /// still holds consistent queues.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Multi-producer broadcast channel of [`Message`]s.
///
/// Cloning yields another handle to the same channel.
#[derive(Debug, Clone, Default)]
pub struct MessageChannel {
    shared: Arc<Shared>,
}

impl MessageChannel {
    /// Create an open channel with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message for every subscriber.
    ///
    /// Atomic with respect to other offers: all subscribers observe the same
    /// order.
    ///
    /// # Errors
    ///
    /// [`ChatError::ChannelClosed`] after [`shutdown`](Self::shutdown).
    pub fn offer(&self, message: Message) -> Result<(), ChatError> {
        {
            let mut state = self.shared.lock();
            if state.closed {
                return Err(ChatError::ChannelClosed);
            }

            state.offered += 1;
            tracing::debug!(
                id = %message.id,
                role = %message.role,
                seq = state.offered,
                subscribers = state.queues.len(),
                "offered message"
            );

            for queue in state.queues.values_mut() {
                queue.push_back(message.clone());
            }
        }

        self.shared.notify.notify_waiters();
        Ok(())
    }

    /// Attach a new subscriber.
    ///
    /// A subscription created after shutdown is already finished.
    pub fn subscribe(&self) -> Subscription {
        let id = {
            let mut state = self.shared.lock();
            let id = state.next_subscriber;
            state.next_subscriber += 1;
            if !state.closed {
                state.queues.insert(id, VecDeque::new());
            }
            id
        };

        Subscription { id, shared: Arc::clone(&self.shared) }
    }

    /// Close the channel. Idempotent.
    pub fn shutdown(&self) {
        let newly_closed = {
            let mut state = self.shared.lock();
            !std::mem::replace(&mut state.closed, true)
        };

        if newly_closed {
            tracing::debug!("message channel shut down");
        }
        self.shared.notify.notify_waiters();
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    pub fn is_closed(&self) -> bool {
        self.shared.lock().closed
    }

    /// Total messages accepted so far.
    pub fn offered(&self) -> u64 {
        self.shared.lock().offered
    }

    /// Number of attached subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.shared.lock().queues.len()
    }
}

/// One consumer's view of a [`MessageChannel`].
///
/// Not restartable: every message is yielded once. Dropping the subscription
/// detaches it.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    shared: Arc<Shared>,
}

impl Subscription {
    /// Wait for the next message.
    ///
    /// Returns `None` once the channel is closed and this subscription has
    /// drained everything buffered before the shutdown.
    ///
    /// Cancel safe: dropping the future never loses a message.
    pub async fn recv(&mut self) -> Option<Message> {
        let shared = Arc::clone(&self.shared);
        loop {
            let notified = shared.notify.notified();
            tokio::pin!(notified);
            // Register before checking state so a concurrent offer cannot
            // slip between the check and the wait.
            notified.as_mut().enable();

            match self.try_recv() {
                Ok(message) => return Some(message),
                Err(TryRecvError::Closed) => return None,
                Err(TryRecvError::Empty) => {},
            }

            notified.await;
        }
    }

    /// Take the next buffered message without waiting.
    pub fn try_recv(&mut self) -> Result<Message, TryRecvError> {
        let mut state = self.shared.lock();
        let closed = state.closed;
        match state.queues.get_mut(&self.id).and_then(VecDeque::pop_front) {
            Some(message) => Ok(message),
            None if closed => Err(TryRecvError::Closed),
            None => Err(TryRecvError::Empty),
        }
    }

    /// Messages buffered for this subscription.
    pub fn pending(&self) -> usize {
        self.shared.lock().queues.get(&self.id).map_or(0, VecDeque::len)
    }

    /// Consume the subscription as a stream that ends with the channel.
    pub fn into_stream(self) -> impl Stream<Item = Message> + Send {
        futures::stream::unfold(self, |mut subscription| async move {
            subscription.recv().await.map(|message| (message, subscription))
        })
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.shared.lock().queues.remove(&self.id);
    }
}

/// Why [`Subscription::try_recv`] returned no message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryRecvError {
    /// Nothing buffered; more may arrive.
    Empty,
    /// Channel closed and drained.
    Closed,
}
