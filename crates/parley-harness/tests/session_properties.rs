//! Property-based tests for the session state machine.
//!
//! Tests verify that invariants hold under arbitrary keystroke sequences,
//! including control chords, help mode toggles and exits at any point.

use std::{sync::Arc, time::Duration};

use parley_app::{
    Action, ChatError, EventCounter, KeyEvent, Role, Session, SessionConfig, Transcript,
};
use parley_harness::{InvariantKind, InvariantRegistry, SessionSnapshot, SimEnv};
use proptest::prelude::*;

/// Random keystrokes, weighted towards typing. Never Ctrl+C.
fn typing_key() -> impl Strategy<Value = KeyEvent> {
    prop_oneof![
        10 => prop::char::range('a', 'z').prop_map(KeyEvent::char),
        2 => Just(KeyEvent::char(' ')),
        1 => Just(KeyEvent::line_feed()),
        3 => Just(KeyEvent::enter()),
        2 => Just(KeyEvent::backspace()),
        1 => Just(KeyEvent::left()),
        1 => Just(KeyEvent::right()),
        1 => Just(KeyEvent::ctrl('u')),
        1 => Just(KeyEvent::ctrl('a')),
        1 => Just(KeyEvent::char('x').with_meta()),
        1 => Just(KeyEvent::named("tab", "\t")),
    ]
}

/// Typing plus the occasional Ctrl+C.
fn any_key() -> impl Strategy<Value = KeyEvent> {
    prop_oneof![
        24 => typing_key(),
        1 => Just(KeyEvent::ctrl('c')),
    ]
}

fn paused_runtime() -> tokio::runtime::Runtime {
    match tokio::runtime::Builder::new_current_thread().enable_time().start_paused(true).build() {
        Ok(runtime) => runtime,
        Err(err) => panic!("failed to build runtime: {err}"),
    }
}

fn new_session(seed: u64) -> Session<SimEnv> {
    Session::new(SimEnv::with_seed(seed), SessionConfig::default(), Arc::new(EventCounter::new()))
}

/// Close the session and return the drained transcript.
async fn finish(session: Session<SimEnv>) -> Transcript {
    let transcript = session.transcript().clone();
    session.close().await;
    transcript
}

proptest! {
    #[test]
    fn prop_session_invariants_hold(
        keys in prop::collection::vec(any_key(), 0..80),
        seed in any::<u64>(),
    ) {
        let runtime = paused_runtime();
        let result: Result<(), TestCaseError> = runtime.block_on(async {
            let invariants = InvariantRegistry::standard();
            let mut session = new_session(seed);

            for key in &keys {
                match session.handle_key(key) {
                    Ok(_) | Err(ChatError::ChannelClosed) => {},
                    Err(err) => prop_assert!(false, "unexpected error {err} for {key:?}"),
                }
                let snapshot = SessionSnapshot::from_session(&session);
                prop_assert!(invariants.check_all(&snapshot).is_ok(), "after {:?}", key);
            }

            tokio::time::sleep(Duration::from_secs(1)).await;
            let snapshot = SessionSnapshot::from_session(&session);
            prop_assert!(invariants.check_all(&snapshot).is_ok());
            Ok(())
        });
        result?;
    }

    #[test]
    fn prop_every_submission_gets_one_reply(
        keys in prop::collection::vec(typing_key(), 0..80),
        seed in any::<u64>(),
    ) {
        let runtime = paused_runtime();
        let result: Result<(), TestCaseError> = runtime.block_on(async {
            let mut session = new_session(seed);
            let mut submitted = Vec::new();

            for key in &keys {
                let pending = session.buffer().to_text();
                let was_blank = session.buffer().is_empty();
                let action = session.handle_key(key);
                prop_assert!(action.is_ok());
                if matches!(action, Ok(Action::Submit)) && !was_blank {
                    submitted.push(pending);
                    prop_assert!(session.buffer().is_empty());
                }
            }

            tokio::time::sleep(Duration::from_secs(1)).await;
            let transcript = finish(session).await.snapshot();

            let users: Vec<_> = transcript
                .iter()
                .filter(|m| m.role == Role::User)
                .map(|m| m.content.clone())
                .collect();
            let replies = transcript.iter().filter(|m| m.role == Role::Assistant).count();

            prop_assert_eq!(users, submitted.clone());
            prop_assert_eq!(replies, submitted.len());

            let snapshot = SessionSnapshot::empty().with_transcript(transcript);
            let violations = InvariantRegistry::standard().check_all(&snapshot).err().unwrap_or_default();
            prop_assert!(
                !violations.iter().any(|v| v.invariant == InvariantKind::RepliesFollowUsers),
                "{:?}", violations
            );
            Ok(())
        });
        result?;
    }

    #[test]
    fn prop_exit_abandons_pending_replies(
        before in prop::collection::vec(typing_key(), 0..20),
        after in prop::collection::vec(typing_key(), 0..20),
    ) {
        let runtime = paused_runtime();
        let result: Result<(), TestCaseError> = runtime.block_on(async {
            let mut session = new_session(0);
            let mut submitted = 0usize;
            for key in &before {
                let was_blank = session.buffer().is_empty();
                let action = session.handle_key(key);
                prop_assert!(action.is_ok());
                if matches!(action, Ok(Action::Submit)) && !was_blank {
                    submitted += 1;
                }
            }
            prop_assert_eq!(session.handle_key(&KeyEvent::ctrl('c')).ok(), Some(Action::Exit));
            prop_assert!(session.is_closed());
            prop_assert_eq!(session.subscribe().pending(), 0, "late subscribers see nothing");

            for key in &after {
                match session.handle_key(key) {
                    Ok(_) | Err(ChatError::ChannelClosed) => {},
                    Err(err) => prop_assert!(false, "unexpected error {err}"),
                }
            }

            tokio::time::sleep(Duration::from_secs(1)).await;
            let transcript = finish(session).await.snapshot();

            prop_assert_eq!(transcript.len(), submitted);
            prop_assert!(transcript.iter().all(|m| m.role == Role::User));
            Ok(())
        });
        result?;
    }
}
