//! Property-based tests for the session state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::{MAX_HISTORY, TICK_INTERVAL};
use super::*;
use crate::message::{Message, Role};
use proptest::prelude::*;
use std::time::Duration;
use uuid::Uuid;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::User), Just(Role::Assistant), Just(Role::System)]
}

fn arb_message() -> impl Strategy<Value = Message> {
    (arb_role(), "[a-zA-Z0-9 .,!?]{0,40}").prop_map(|(role, content)| Message { role, content })
}

fn arb_history(max: usize) -> impl Strategy<Value = Vec<Message>> {
    proptest::collection::vec(arb_message(), 0..max)
}

fn arb_state() -> impl Strategy<Value = SessionState> {
    prop_oneof![
        Just(SessionState::Idle),
        Just(SessionState::HistoryFull),
        any::<u128>().prop_map(|n| SessionState::Awaiting {
            turn: Uuid::from_u128(n)
        }),
    ]
}

fn arb_session() -> impl Strategy<Value = Session> {
    (
        arb_history(MAX_HISTORY + 5),
        "[a-z ]{0,20}",
        arb_state(),
        0u64..10_000,
        proptest::option::of("[a-z ]{1,20}"),
    )
        .prop_map(|(history, input, state, millis, last_error)| Session {
            history,
            input,
            state,
            waiting_time: Duration::from_millis(millis),
            last_error,
        })
}

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z .,!?]{0,40}"
}

fn idle_with(history: Vec<Message>) -> Session {
    Session {
        history,
        ..Session::default()
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #[test]
    fn prop_submit_below_ceiling_appends_one_user_message(
        history in arb_history(MAX_HISTORY),
        text in arb_text(),
    ) {
        let session = idle_with(history.clone());
        let turn = Uuid::new_v4();

        let result = transition(&session, Event::Submit { text: text.clone(), turn }).unwrap();

        prop_assert_eq!(result.session.history.len(), history.len() + 1);
        prop_assert_eq!(result.session.history.last(), Some(&Message::user(text)));
        prop_assert_eq!(result.session.state, SessionState::Awaiting { turn });
        prop_assert_eq!(result.effects.len(), 1);
        let is_send = matches!(result.effects[0], Effect::SendChat { .. });
        prop_assert!(is_send);
    }

    #[test]
    fn prop_submit_at_or_over_ceiling_never_sends(
        extra in 0usize..10,
        text in arb_text(),
    ) {
        let session = idle_with(vec![Message::user("line"); MAX_HISTORY + extra]);

        let result = transition(&session, Event::submit(text)).unwrap();

        prop_assert!(result.effects.is_empty());
        prop_assert_eq!(result.session.history.len(), MAX_HISTORY + extra);
        prop_assert_eq!(result.session.state, SessionState::HistoryFull);
    }

    #[test]
    fn prop_reset_always_yields_initial_state(session in arb_session()) {
        let result = transition(&session, Event::Reset).unwrap();
        prop_assert_eq!(&result.session, &Session::default());
        prop_assert!(!result.session.processing());
        prop_assert_eq!(result.session.waiting_time, Duration::ZERO);
    }

    #[test]
    fn prop_response_appends_exactly_one_message(
        history in arb_history(MAX_HISTORY),
        content in ".{0,60}",
    ) {
        let turn = Uuid::new_v4();
        let session = Session {
            history: history.clone(),
            state: SessionState::Awaiting { turn },
            ..Session::default()
        };
        let message = Message::assistant(content);

        let result = transition(&session, Event::Response { turn, message: message.clone() }).unwrap();

        prop_assert_eq!(result.session.state, SessionState::Idle);
        prop_assert_eq!(result.session.history.len(), history.len() + 1);
        prop_assert_eq!(result.session.history.last(), Some(&message));
    }

    #[test]
    fn prop_rejected_events_leave_no_effects(session in arb_session(), text in arb_text()) {
        // A submit is either accepted with at most one call, or refused outright
        match transition(&session, Event::submit(text)) {
            Ok(result) => {
                prop_assert!(result.effects.len() <= 1);
                prop_assert!(result.session.processing());
            }
            Err(err) => {
                prop_assert_eq!(err, TransitionError::Busy);
                prop_assert!(session.processing());
            }
        }
    }

    #[test]
    fn prop_at_most_one_request_in_flight(
        texts in proptest::collection::vec(arb_text(), 1..10),
    ) {
        let mut session = Session::default();
        let mut sends = 0;
        for text in texts {
            if let Ok(result) = transition(&session, Event::submit(text)) {
                sends += result
                    .effects
                    .iter()
                    .filter(|e| matches!(e, Effect::SendChat { .. }))
                    .count();
                session = result.session;
            }
        }
        prop_assert_eq!(sends, 1);
    }

    #[test]
    fn prop_tick_never_touches_history(session in arb_session()) {
        let result = transition(&session, Event::Tick).unwrap();
        prop_assert_eq!(&result.session.history, &session.history);
        prop_assert_eq!(result.session.state, session.state);
        let expected = if session.processing() {
            session.waiting_time + TICK_INTERVAL
        } else {
            session.waiting_time
        };
        prop_assert_eq!(result.session.waiting_time, expected);
    }

    #[test]
    fn prop_export_is_idempotent(history in arb_history(20)) {
        prop_assert_eq!(export_transcript(&history), export_transcript(&history));
    }
}
