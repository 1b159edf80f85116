use battle_agent::nats::messages::{
    AgentAnnouncement, InputSettingsMessage, ReplyRequestMessage, UtteranceMessage,
};
use battle_agent::{InputSettings, ReplySource, TurnDetection};

#[test]
fn test_reply_request_serialization() {
    let msg = ReplyRequestMessage {
        session_id: "battle-1".to_string(),
        request_id: "req-1".to_string(),
        user_input: "Share your kind words and compliments now!".to_string(),
        source: ReplySource::Attack,
        timestamp: "2025-10-27T14:30:00Z".to_string(),
    };

    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("\"source\":\"attack\""));
    assert!(json.contains("battle-1"));

    let deserialized: ReplyRequestMessage = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized.request_id, "req-1");
    assert_eq!(deserialized.source, ReplySource::Attack);
}

#[test]
fn test_input_settings_flattened() {
    let msg = InputSettingsMessage {
        session_id: "battle-1".to_string(),
        settings: InputSettings {
            audio_enabled: true,
            participant: Some("bob".to_string()),
            turn_detection: TurnDetection::Vad {
                detector: "silero".to_string(),
                min_endpointing_delay: 3.0,
            },
        },
        timestamp: "2025-10-27T14:30:00Z".to_string(),
    };

    let value = serde_json::to_value(&msg).unwrap();
    assert_eq!(value["audio_enabled"], true);
    assert_eq!(value["participant"], "bob");
    assert_eq!(value["turn_detection"]["kind"], "vad");
    assert_eq!(value["turn_detection"]["min_endpointing_delay"], 3.0);
}

#[test]
fn test_manual_turn_detection_serialization() {
    let json = serde_json::to_string(&TurnDetection::Manual).unwrap();
    assert_eq!(json, r#"{"kind":"manual"}"#);
}

#[test]
fn test_push_to_talk_announcement() {
    let msg = AgentAnnouncement::push_to_talk(
        "battle-1".to_string(),
        "ptt-agent".to_string(),
        "be kind".to_string(),
    );

    let value = serde_json::to_value(&msg).unwrap();
    assert_eq!(value["identity"], "ptt-agent");
    assert_eq!(value["attributes"]["push-to-talk"], "1");
}

#[test]
fn test_utterance_message_defaults() {
    let msg: UtteranceMessage = serde_json::from_str("{}").unwrap();
    assert!(msg.participant.is_none());
    assert_eq!(msg.text, "");

    let msg: UtteranceMessage =
        serde_json::from_str(r#"{"participant":"bob","text":"hello"}"#).unwrap();
    assert_eq!(msg.participant.as_deref(), Some("bob"));
    assert_eq!(msg.text, "hello");
}
