// Unit tests for directive application on completed user turns

use battle_agent::prompt::frame_directive;
use battle_agent::{TurnAugmentor, TurnDecision};

#[test]
fn test_directive_applied_once() {
    let mut augmentor = TurnAugmentor::new();
    augmentor.arm("bring the heat");

    let first = augmentor.on_user_turn_completed("hello");
    match &first {
        TurnDecision::Reply(record) => {
            assert_eq!(record.raw_text, "hello");
            assert_eq!(record.effective_text, frame_directive("bring the heat", "hello"));
            assert!(record.effective_text.contains("bring the heat"));
            assert!(record.effective_text.contains("hello"));
        }
        other => panic!("Expected reply, got {:?}", other),
    }
    assert!(augmentor.pending_directive().is_none(), "Directive should be consumed");

    let second = augmentor.on_user_turn_completed("hi again");
    assert_eq!(second.record().effective_text, "hi again");
    assert!(!second.is_skip());
}

#[test]
fn test_framing_format() {
    assert_eq!(
        frame_directive("bring the heat", "hello"),
        "[Defensive Strategy: bring the heat] User said: hello"
    );
}

#[test]
fn test_no_directive_passes_text_through() {
    let mut augmentor = TurnAugmentor::new();

    let decision = augmentor.on_user_turn_completed("you rhyme like a sunrise");

    assert_eq!(
        decision,
        TurnDecision::Reply(battle_agent::UtteranceRecord {
            raw_text: "you rhyme like a sunrise".to_string(),
            effective_text: "you rhyme like a sunrise".to_string(),
        })
    );
}

#[test]
fn test_empty_turn_skipped() {
    let mut augmentor = TurnAugmentor::new();

    assert!(augmentor.on_user_turn_completed("").is_skip());
}

#[test]
fn test_blank_turns_skipped_even_with_directive() {
    for raw in ["", " ", "\t", "  \n "] {
        let mut augmentor = TurnAugmentor::new();
        augmentor.arm("stay humble");

        let decision = augmentor.on_user_turn_completed(raw);
        assert!(decision.is_skip(), "{:?} should be skipped", raw);
    }
}

#[test]
fn test_blank_turn_consumes_directive() {
    let mut augmentor = TurnAugmentor::new();
    augmentor.arm("stay humble");

    assert!(augmentor.on_user_turn_completed("   ").is_skip());

    let next = augmentor.on_user_turn_completed("hello");
    assert_eq!(next.record().effective_text, "hello");
}

#[test]
fn test_last_directive_wins() {
    let mut augmentor = TurnAugmentor::new();
    augmentor.arm("x");
    augmentor.arm("y");

    let decision = augmentor.on_user_turn_completed("hello");
    assert_eq!(decision.record().effective_text, frame_directive("y", "hello"));
    assert!(!decision.record().effective_text.contains("[Defensive Strategy: x]"));
}

#[test]
fn test_empty_directive_is_ignored() {
    let mut augmentor = TurnAugmentor::new();
    augmentor.arm("keep it sweet");
    augmentor.arm("");

    assert_eq!(augmentor.pending_directive(), Some("keep it sweet"));
}
