use serde::{Deserialize, Serialize};

/// Turn-taking mode of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnMode {
    /// No reply until explicitly triggered (push-to-talk)
    Manual,
    /// Reply triggered by silence detection after a delay
    Automatic,
}

/// Listening state derived from the session's mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListeningState {
    Idle,
    ManualListening,
    AutomaticListening,
}

/// Handle to the voice-activity detector resource used in automatic mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorHandle {
    /// Detector model name (e.g., "silero")
    pub model: String,
}

/// Mutable per-session turn-taking state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Current turn mode, `None` until a command sets one
    pub mode: Option<TurnMode>,

    /// Whether captured audio is forwarded to recognition
    pub audio_input_enabled: bool,

    /// Participant whose audio is sourced
    pub active_participant: Option<String>,

    /// Silence before a reply fires; only set in automatic mode
    pub silence_threshold_secs: Option<f64>,

    /// Detector bound once protect mode has been armed
    pub detector: Option<DetectorHandle>,
}

impl SessionState {
    pub fn listening_state(&self) -> ListeningState {
        match self.mode {
            None => ListeningState::Idle,
            Some(TurnMode::Manual) => ListeningState::ManualListening,
            Some(TurnMode::Automatic) => ListeningState::AutomaticListening,
        }
    }
}
