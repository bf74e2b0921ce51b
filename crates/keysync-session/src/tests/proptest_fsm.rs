//! Property-based tests for the session state machine.
//!
//! Generates random host-event sequences via proptest and verifies that the
//! structural invariants hold after every event, including partial echo
//! delivery, over-echoing, and resets arriving mid-transaction.

use proptest::prelude::*;

use keysync_core::context::MAX_CONTEXT;
use keysync_core::keycode::vk;

use super::{make_session, MockHost};
use crate::InputSession;

#[derive(Debug, Clone)]
enum Action {
    KeyDown(u16),
    KeyUp(u16),
    /// Deliver the oldest queued synthetic key back to the session.
    DeliverEcho,
    /// Echo a backspace the session never injected.
    SpuriousBackspace(u16),
    SpuriousAck,
    BeginCorrection(u8, String),
    SelectionChanged(String),
    FocusChanged,
    ContextPushed,
    ContextPopped,
    ToggleKeyboard,
    Navigation(u16),
}

fn arb_action() -> impl Strategy<Value = Action> {
    let letters = prop::sample::select((0x41u16..=0x5A).collect::<Vec<_>>());
    let digits = prop::sample::select((0x30u16..=0x39).collect::<Vec<_>>());
    let nav = prop::sample::select(vec![
        vk::HOME,
        vk::END,
        vk::LEFT,
        vk::UP,
        vk::RIGHT,
        vk::DOWN,
        vk::RETURN,
    ]);
    let small_text = prop::collection::vec(prop::char::range('a', 'z'), 0..6)
        .prop_map(|cs| cs.into_iter().collect::<String>());

    prop_oneof![
        20 => letters.clone().prop_map(Action::KeyDown),
        5 => digits.prop_map(Action::KeyDown),
        5 => letters.prop_map(Action::KeyUp),
        3 => Just(Action::KeyDown(vk::SHIFT)),
        3 => Just(Action::KeyUp(vk::SHIFT)),
        2 => Just(Action::KeyDown(vk::CONTROL)),
        2 => Just(Action::KeyUp(vk::CONTROL)),
        15 => Just(Action::DeliverEcho),
        4 => (1u16..4).prop_map(Action::SpuriousBackspace),
        3 => Just(Action::SpuriousAck),
        8 => (0u8..4, small_text.clone()).prop_map(|(n, t)| Action::BeginCorrection(n, t)),
        8 => small_text.prop_map(Action::SelectionChanged),
        2 => Just(Action::FocusChanged),
        1 => Just(Action::ContextPushed),
        1 => Just(Action::ContextPopped),
        2 => Just(Action::ToggleKeyboard),
        3 => nav.prop_map(Action::Navigation),
    ]
}

fn execute(session: &mut InputSession, host: &mut MockHost, action: &Action) {
    match action {
        Action::KeyDown(key) => {
            session.on_key_down(host, *key, 1);
        }
        Action::KeyUp(key) => {
            session.on_key_up(host, *key, 1);
        }
        Action::DeliverEcho => {
            if let Some((key, repeat)) = host.injected.pop_front() {
                let consumed = session.on_key_down(host, key, repeat);
                if !consumed && key == vk::BACK {
                    for _ in 0..repeat {
                        host.document.pop();
                    }
                }
            }
        }
        Action::SpuriousBackspace(repeat) => {
            let consumed = session.on_key_down(host, vk::BACK, *repeat);
            if !consumed {
                for _ in 0..*repeat {
                    host.document.pop();
                }
            }
        }
        Action::SpuriousAck => {
            session.on_key_down(host, vk::ACK, 1);
        }
        Action::BeginCorrection(n, text) => {
            session.begin_correction(host, *n as u32, text);
        }
        Action::SelectionChanged(text) => {
            session.on_selection_changed(text);
        }
        Action::FocusChanged => session.on_focus_changed(),
        Action::ContextPushed => session.on_context_pushed(),
        Action::ContextPopped => session.on_context_popped(),
        Action::ToggleKeyboard => {
            let open = session.is_keyboard_open();
            session.set_keyboard_open(!open);
        }
        Action::Navigation(key) => {
            session.on_test_key_down(*key);
            session.on_key_down(host, *key, 1);
        }
    }
}

fn assert_invariants(session: &InputSession, host: &MockHost, action: &Action) {
    // 1. Context never exceeds its bound.
    assert!(
        session.context_text().chars().count() <= MAX_CONTEXT,
        "context over bound after {:?}",
        action,
    );

    // 2. Starting a correction always leaves a drain mechanism for the
    //    queued insert: deletes still pending or an ack in flight. (An
    //    intervening ordinary key may later drop the ack expectation; the
    //    insert then waits for a full-state reset or the next correction's
    //    ack, so the check is only valid at establishment.)
    if matches!(action, Action::BeginCorrection(n, _) if *n > 0) {
        assert!(
            session.txn.pending_delete > 0 || session.txn.expect_ack,
            "correction started with no drain mechanism after {:?}",
            action,
        );
    }

    // 3. Only protocol keys are ever injected.
    for (key, _) in &host.injected {
        assert!(
            *key == vk::BACK || *key == vk::ACK,
            "unexpected injected key {key:#x} after {:?}",
            action,
        );
    }

    // 4. Committed text is never empty.
    for commit in &host.commits {
        assert!(!commit.is_empty(), "empty commit after {:?}", action);
    }

    // 5. Full resets leave no transaction residue.
    if matches!(
        action,
        Action::FocusChanged | Action::ContextPushed | Action::ContextPopped
    ) {
        assert!(session.txn.is_idle() && session.context_text().is_empty());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn session_invariants_hold(actions in prop::collection::vec(arb_action(), 1..120)) {
        let mut session = make_session();
        let mut host = MockHost::new();
        host.document = "seed text".to_string();

        for action in &actions {
            execute(&mut session, &mut host, action);
            assert_invariants(&session, &host, action);
        }
    }

    #[test]
    fn every_drained_correction_commits_exactly_once(
        n in 1u32..6,
        text in "[a-z]{1,5}",
    ) {
        let mut session = make_session();
        let mut host = MockHost::new();
        host.document = "0123456789".to_string();

        session.begin_correction(&mut host, n, &text);
        super::pump(&mut session, &mut host);

        prop_assert_eq!(host.commits.len(), 1);
        prop_assert_eq!(host.commits[0].clone(), text);
        prop_assert!(session.txn.is_idle());
        prop_assert!(!session.txn.expect_ack);
    }
}
