use crate::pipeline::ReplySource;
use crate::session::InputSettings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reply request published to the voice worker
#[derive(Debug, Serialize, Deserialize)]
pub struct ReplyRequestMessage {
    pub session_id: String,
    pub request_id: String,
    pub user_input: String,
    pub source: ReplySource,
    pub timestamp: String, // RFC3339 timestamp
}

/// Capture settings published to the voice worker
#[derive(Debug, Serialize, Deserialize)]
pub struct InputSettingsMessage {
    pub session_id: String,
    #[serde(flatten)]
    pub settings: InputSettings,
    pub timestamp: String,
}

/// Announces the agent's identity and persona to the room
#[derive(Debug, Serialize, Deserialize)]
pub struct AgentAnnouncement {
    pub session_id: String,
    pub identity: String,
    pub attributes: BTreeMap<String, String>,
    pub instructions: String,
}

impl AgentAnnouncement {
    /// Announcement advertising push-to-talk support
    pub fn push_to_talk(session_id: String, identity: String, instructions: String) -> Self {
        let mut attributes = BTreeMap::new();
        attributes.insert("push-to-talk".to_string(), "1".to_string());

        Self {
            session_id,
            identity,
            attributes,
            instructions,
        }
    }
}

/// Completed user utterance received from the recognizer
#[derive(Debug, Serialize, Deserialize)]
pub struct UtteranceMessage {
    #[serde(default)]
    pub participant: Option<String>,
    #[serde(default)]
    pub text: String,
}
