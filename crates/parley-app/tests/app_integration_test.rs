//! Integration tests for the conversation engine, channel and session.
//!
//! All tests run on a paused tokio clock, so reply latency is virtual and
//! exact.
//!
//! # Oracle Pattern
//!
//! Tests end with oracle checks that verify:
//! - Each subscriber sees a user message before its reply
//! - Replies arrive exactly after the configured latency
//! - Nothing is delivered once the channel is shut down

use std::{sync::Arc, time::Duration};

use futures::StreamExt;
use parley_app::{
    ChatError, ConversationEngine, Environment, EventCounter, KeyEvent, Message, MessageChannel,
    MessageId, Role, Session, SessionConfig, Telemetry, TelemetryError, TelemetrySummary,
    TryRecvError, config::DEFAULT_REPLIES,
};
use parley_harness::{SimEnv, sim_env::SIM_EPOCH_MILLIS};
use tokio::time::Instant;

const LATENCY: Duration = Duration::from_millis(500);

fn engine(channel: &MessageChannel, replies: Vec<String>) -> ConversationEngine<SimEnv> {
    ConversationEngine::new(SimEnv::with_seed(42), channel.clone(), LATENCY, replies)
}

fn default_replies() -> Vec<String> {
    DEFAULT_REPLIES.iter().map(|&reply| reply.to_owned()).collect()
}

fn session() -> Session<SimEnv> {
    Session::new(SimEnv::with_seed(42), SessionConfig::default(), Arc::new(EventCounter::new()))
}

#[tokio::test(start_paused = true)]
async fn reply_arrives_exactly_after_latency() {
    let channel = MessageChannel::new();
    let mut sub = channel.subscribe();
    let mut engine = engine(&channel, default_replies());
    let start = Instant::now();

    let id = engine.submit("hi".into());
    assert!(id.is_ok());

    // Oracle: user message is available immediately
    let user = sub.try_recv();
    assert!(matches!(&user, Ok(Message { role: Role::User, content, .. }) if content == "hi"));
    assert_eq!(user.ok().map(|m| m.id), id.ok());

    tokio::time::sleep(LATENCY - Duration::from_millis(1)).await;
    tokio::task::yield_now().await;
    assert_eq!(sub.try_recv().err(), Some(TryRecvError::Empty));

    // Oracle: reply lands at exactly the latency
    let reply = sub.recv().await;
    assert_eq!(start.elapsed(), LATENCY);
    assert_eq!(reply.as_ref().map(|m| m.role), Some(Role::Assistant));
    assert!(reply.is_some_and(|m| DEFAULT_REPLIES.contains(&m.content.as_str())));
}

#[tokio::test(start_paused = true)]
async fn timestamps_follow_the_environment_clock() {
    let channel = MessageChannel::new();
    let mut sub = channel.subscribe();
    let mut engine = engine(&channel, default_replies());

    assert!(engine.submit("time".into()).is_ok());
    let user = sub.recv().await.map(|m| m.timestamp);
    let reply = sub.recv().await.map(|m| m.timestamp);

    assert_eq!(user, Some(SIM_EPOCH_MILLIS));
    assert_eq!(reply, Some(SIM_EPOCH_MILLIS + 500));
}

#[tokio::test(start_paused = true)]
async fn configured_reply_is_used() {
    let channel = MessageChannel::new();
    let mut sub = channel.subscribe();
    let mut engine = engine(&channel, vec!["pong".to_owned()]);

    assert!(engine.submit("ping".into()).is_ok());
    let _user = sub.recv().await;
    assert_eq!(sub.recv().await.map(|m| m.content), Some("pong".to_owned()));
}

#[tokio::test(start_paused = true)]
async fn empty_reply_set_falls_back_to_defaults() {
    let channel = MessageChannel::new();
    let mut sub = channel.subscribe();
    let mut engine = engine(&channel, Vec::new());

    assert!(engine.submit("anyone?".into()).is_ok());
    let _user = sub.recv().await;
    let reply = sub.recv().await;
    assert!(reply.is_some_and(|m| DEFAULT_REPLIES.contains(&m.content.as_str())));
}

#[tokio::test(start_paused = true)]
async fn in_flight_tracks_pending_replies() {
    let channel = MessageChannel::new();
    let _sub = channel.subscribe();
    let mut engine = engine(&channel, default_replies());

    assert!(engine.submit("a".into()).is_ok());
    assert!(engine.submit("b".into()).is_ok());
    assert_eq!(engine.in_flight(), 2);

    tokio::time::sleep(LATENCY * 2).await;
    assert_eq!(engine.in_flight(), 0);
    assert_eq!(channel.offered(), 4);
}

#[tokio::test(start_paused = true)]
async fn replies_follow_their_own_user_message() {
    let channel = MessageChannel::new();
    let sub = channel.subscribe();
    let mut engine = engine(&channel, default_replies());

    assert!(engine.submit("first".into()).is_ok());
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(engine.submit("second".into()).is_ok());
    tokio::time::sleep(LATENCY * 2).await;
    channel.shutdown();

    let roles: Vec<_> = sub.into_stream().map(|m| (m.role, m.content)).collect().await;
    assert_eq!(roles.len(), 4);
    assert_eq!(roles[0], (Role::User, "first".to_owned()));
    assert_eq!(roles[1], (Role::User, "second".to_owned()));
    assert_eq!(roles[2].0, Role::Assistant);
    assert_eq!(roles[3].0, Role::Assistant);
}

#[tokio::test(start_paused = true)]
async fn abandon_cancels_pending_replies() {
    let channel = MessageChannel::new();
    let sub = channel.subscribe();
    let mut engine = engine(&channel, default_replies());

    assert!(engine.submit("never answered".into()).is_ok());
    engine.abandon();
    tokio::time::sleep(LATENCY * 2).await;

    assert_eq!(engine.in_flight(), 0);
    assert_eq!(sub.pending(), 1);
    assert!(!channel.is_closed());
}

#[tokio::test(start_paused = true)]
async fn reply_after_shutdown_is_dropped() {
    let channel = MessageChannel::new();
    let mut sub = channel.subscribe();
    let mut engine = engine(&channel, default_replies());

    assert!(engine.submit("late".into()).is_ok());
    channel.shutdown();
    tokio::time::sleep(LATENCY * 2).await;

    assert_eq!(sub.recv().await.map(|m| m.role), Some(Role::User));
    assert_eq!(sub.recv().await, None);
    assert_eq!(channel.offered(), 1);
}

#[tokio::test(start_paused = true)]
async fn submit_after_shutdown_fails() {
    let channel = MessageChannel::new();
    let mut engine = engine(&channel, default_replies());
    channel.shutdown();

    assert_eq!(engine.submit("too late".into()).err(), Some(ChatError::ChannelClosed));
    assert_eq!(engine.in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn recv_wakes_on_offer_from_another_task() {
    let channel = MessageChannel::new();
    let mut sub = channel.subscribe();
    let env = SimEnv::with_seed(0);

    let sender = channel.clone();
    let handle = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        sender.offer(Message::system(MessageId::new(env.random_u128()), "wake", 0))
    });

    let message = sub.recv().await;
    assert_eq!(message.map(|m| m.content), Some("wake".to_owned()));
    assert!(matches!(handle.await, Ok(Ok(()))));
}

#[tokio::test(start_paused = true)]
async fn dropped_subscription_detaches() {
    let channel = MessageChannel::new();
    let sub = channel.subscribe();
    assert_eq!(channel.subscriber_count(), 1);

    drop(sub);
    assert_eq!(channel.subscriber_count(), 0);
    assert!(channel.offer(Message::system(MessageId::new(1), "nobody", 0)).is_ok());
}

#[tokio::test(start_paused = true)]
async fn session_submit_rejects_blank_text() {
    let mut session = session();

    assert_eq!(session.submit("").err(), Some(ChatError::EmptyInput));
    assert_eq!(session.submit(" \n\t").err(), Some(ChatError::EmptyInput));
    assert_eq!(session.replies_in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn session_typing_and_return_publishes() {
    let mut session = session();
    let mut sub = session.subscribe();

    for key in [KeyEvent::char('h'), KeyEvent::char('i'), KeyEvent::enter()] {
        assert!(session.handle_key(&key).is_ok());
    }

    // Oracle: buffer cleared, user message published, reply pending
    assert!(session.buffer().is_empty());
    assert_eq!(session.buffer().cursor().column, 0);
    assert_eq!(sub.try_recv().ok().map(|m| m.content), Some("hi".to_owned()));
    assert_eq!(session.replies_in_flight(), 1);

    tokio::time::sleep(LATENCY).await;
    let reply = sub.recv().await;
    assert_eq!(reply.map(|m| m.role), Some(Role::Assistant));

    let transcript = session.transcript().clone();
    assert_eq!(session.close().await, 2);
    assert_eq!(transcript.len(), 2);
}

/// Sink that refuses every event.
struct RejectingSink;

impl Telemetry for RejectingSink {
    fn record(&self, event: &str, _attributes: &[(&str, &str)]) -> Result<(), TelemetryError> {
        Err(TelemetryError::Rejected { event: event.to_owned(), reason: "full".to_owned() })
    }

    fn summary(&self) -> TelemetrySummary {
        TelemetrySummary::default()
    }
}

#[tokio::test(start_paused = true)]
async fn rejected_telemetry_never_breaks_the_session() {
    let mut session =
        Session::new(SimEnv::with_seed(42), SessionConfig::default(), Arc::new(RejectingSink));
    let mut sub = session.subscribe();

    for key in [KeyEvent::char('o'), KeyEvent::char('k'), KeyEvent::enter()] {
        assert!(session.handle_key(&key).is_ok());
    }

    assert_eq!(sub.try_recv().ok().map(|m| m.content), Some("ok".to_owned()));
    assert_eq!(session.telemetry().total_events, 0);
    assert_eq!(session.close().await, 1);
}

#[tokio::test(start_paused = true)]
async fn session_shutdown_is_idempotent() {
    let mut session = session();
    assert!(session.submit("hello").is_ok());

    session.shutdown();
    session.shutdown();

    assert!(session.is_closed());
    assert_eq!(session.replies_in_flight(), 0);
    assert_eq!(session.submit("again").err(), Some(ChatError::ChannelClosed));
    assert_eq!(session.close().await, 1);
}

#[tokio::test(start_paused = true)]
async fn transcript_watch_sees_every_append() {
    let mut session = session();
    let mut changes = session.transcript().watch();

    assert!(session.submit("watch me").is_ok());
    assert!(changes.changed().await.is_ok());
    assert_eq!(*changes.borrow_and_update(), 1);

    assert!(changes.changed().await.is_ok());
    assert_eq!(*changes.borrow_and_update(), 2);
    assert_eq!(session.transcript().last().map(|m| m.role), Some(Role::Assistant));
}
