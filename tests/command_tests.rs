// Tests for attack/protect dispatch against the session controller

mod common;

use anyhow::Result;
use battle_agent::prompt::{frame_directive, DEFAULT_ATTACK_PROMPT};
use battle_agent::{
    CommandHandler, CommandName, ListeningState, ReplySource, SessionController, TurnAugmentor,
    TurnDetection, TurnMode,
};
use common::CountingDetector;
use std::sync::Arc;

struct Fixture {
    handler: CommandHandler,
    controller: SessionController,
    augmentor: TurnAugmentor,
    detector: Arc<CountingDetector>,
}

fn fixture() -> Fixture {
    let detector = Arc::new(CountingDetector::default());
    Fixture {
        handler: CommandHandler::new(detector.clone(), 3.0),
        controller: SessionController::new(),
        augmentor: TurnAugmentor::new(),
        detector,
    }
}

impl Fixture {
    async fn run(&mut self, command: CommandName, caller: &str, payload: &str) -> Result<battle_agent::CommandEffects> {
        self.handler
            .dispatch(command, caller, payload, &mut self.controller, &mut self.augmentor)
            .await
    }
}

#[test]
fn test_command_table() {
    assert_eq!(CommandName::parse("attack"), Some(CommandName::Attack));
    assert_eq!(CommandName::parse("protect"), Some(CommandName::Protect));
    assert_eq!(CommandName::parse("retreat"), None);
    assert_eq!(CommandName::parse("Attack"), None);
    assert_eq!(CommandName::Protect.to_string(), "protect");
}

#[tokio::test]
async fn test_attack_without_payload_uses_default_prompt() -> Result<()> {
    let mut f = fixture();

    let effects = f.run(CommandName::Attack, "alice", "").await?;

    let reply = effects.reply.expect("attack must request a reply");
    assert_eq!(reply.user_input, DEFAULT_ATTACK_PROMPT);
    assert_eq!(reply.source, ReplySource::Attack);
    Ok(())
}

#[tokio::test]
async fn test_attack_with_payload() -> Result<()> {
    let mut f = fixture();

    let effects = f.run(CommandName::Attack, "alice", "praise their beat").await?;

    let reply = effects.reply.expect("attack must request a reply");
    assert_eq!(reply.user_input, "Share your compliments! praise their beat");
    Ok(())
}

#[tokio::test]
async fn test_attack_never_enables_audio() -> Result<()> {
    let mut f = fixture();

    let effects = f.run(CommandName::Attack, "alice", "").await?;

    assert_eq!(f.controller.listening_state(), ListeningState::ManualListening);
    assert!(!f.controller.state().audio_input_enabled);
    let input = effects.input.expect("first attack leaves idle");
    assert!(!input.audio_enabled);
    assert_eq!(input.turn_detection, TurnDetection::Manual);

    let again = f.run(CommandName::Attack, "alice", "").await?;
    assert!(again.input.is_none(), "Repeated attack changes nothing");
    assert!(again.reply.is_some());
    assert_eq!(f.detector.loads(), 0);
    Ok(())
}

#[tokio::test]
async fn test_attack_keeps_automatic_mode() -> Result<()> {
    let mut f = fixture();
    f.run(CommandName::Protect, "bob", "").await?;

    let effects = f.run(CommandName::Attack, "alice", "").await?;

    assert!(effects.input.is_none());
    assert_eq!(f.controller.state().mode, Some(TurnMode::Automatic));
    assert_eq!(f.controller.state().active_participant.as_deref(), Some("bob"));
    Ok(())
}

#[tokio::test]
async fn test_protect_arms_automatic_listening() -> Result<()> {
    let mut f = fixture();

    let effects = f.run(CommandName::Protect, "bob", "bring the heat").await?;

    assert!(effects.reply.is_none(), "protect waits for the opponent");
    let input = effects.input.expect("protect reconfigures input");
    assert!(input.audio_enabled);
    assert_eq!(input.participant.as_deref(), Some("bob"));
    assert_eq!(
        input.turn_detection,
        TurnDetection::Vad {
            detector: "silero".to_string(),
            min_endpointing_delay: 3.0,
        }
    );
    assert_eq!(f.controller.listening_state(), ListeningState::AutomaticListening);
    assert_eq!(f.augmentor.pending_directive(), Some("bring the heat"));
    Ok(())
}

#[tokio::test]
async fn test_protect_empty_is_idempotent() -> Result<()> {
    let mut f = fixture();

    f.run(CommandName::Protect, "bob", "").await?;
    let first = f.controller.state().clone();
    f.run(CommandName::Protect, "bob", "").await?;

    assert_eq!(f.controller.state(), &first);
    assert_eq!(f.controller.state().mode, Some(TurnMode::Automatic));
    assert!(f.augmentor.pending_directive().is_none());
    assert_eq!(f.detector.loads(), 1, "Detector is resolved once");
    Ok(())
}

#[tokio::test]
async fn test_protect_last_write_wins() -> Result<()> {
    let mut f = fixture();

    f.run(CommandName::Protect, "bob", "x").await?;
    f.run(CommandName::Protect, "bob", "y").await?;

    let decision = f.augmentor.on_user_turn_completed("hello");
    assert_eq!(decision.record().effective_text, frame_directive("y", "hello"));
    Ok(())
}

#[tokio::test]
async fn test_protect_rebinds_to_latest_caller() -> Result<()> {
    let mut f = fixture();

    f.run(CommandName::Protect, "bob", "").await?;
    f.run(CommandName::Protect, "carol", "").await?;

    assert_eq!(f.controller.state().active_participant.as_deref(), Some("carol"));
    assert_eq!(f.detector.loads(), 1);
    Ok(())
}

#[tokio::test]
async fn test_protect_with_invalid_configured_threshold() -> Result<()> {
    let mut f = fixture();
    f.handler = CommandHandler::new(f.detector.clone(), -2.0);

    let effects = f.run(CommandName::Protect, "bob", "").await?;

    assert_eq!(f.controller.state().silence_threshold_secs, Some(3.0));
    assert_eq!(
        effects.input.map(|input| input.turn_detection),
        Some(TurnDetection::Vad {
            detector: "silero".to_string(),
            min_endpointing_delay: 3.0,
        })
    );
    Ok(())
}
