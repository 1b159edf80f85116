use super::state::{DetectorHandle, ListeningState, SessionState, TurnMode};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Silence threshold used when automatic mode is requested without one
pub const DEFAULT_SILENCE_THRESHOLD_SECS: f64 = 3.0;

/// How the capture layer decides a user turn is over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnDetection {
    /// Turns are committed explicitly
    Manual,
    /// Turns are committed by the detector after the endpointing delay
    Vad {
        detector: String,
        min_endpointing_delay: f64,
    },
}

/// Input configuration handed to the capture layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSettings {
    pub audio_enabled: bool,
    pub participant: Option<String>,
    pub turn_detection: TurnDetection,
}

/// Owns the session's turn-mode state
///
/// All mutations take `&mut self`, so a whole transition is applied before any
/// other reader can observe the state.
#[derive(Debug, Default)]
pub struct SessionController {
    state: SessionState,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn listening_state(&self) -> ListeningState {
        self.state.listening_state()
    }

    /// Whether the capture layer should be producing utterances
    pub fn is_capturing(&self) -> bool {
        self.state.audio_input_enabled
    }

    /// Toggle audio capture
    pub fn set_audio_enabled(&mut self, enabled: bool) {
        if self.state.audio_input_enabled != enabled {
            info!("Audio input {}", if enabled { "enabled" } else { "disabled" });
        }
        self.state.audio_input_enabled = enabled;
    }

    /// Switch turn mode
    ///
    /// Automatic mode takes a non-negative threshold; a missing or invalid one
    /// falls back to [`DEFAULT_SILENCE_THRESHOLD_SECS`]. Manual mode clears it.
    pub fn set_mode(&mut self, mode: TurnMode, silence_threshold_secs: Option<f64>) {
        match mode {
            TurnMode::Manual => {
                self.state.mode = Some(TurnMode::Manual);
                self.state.silence_threshold_secs = None;
            }
            TurnMode::Automatic => {
                let threshold = match silence_threshold_secs {
                    Some(secs) if secs.is_finite() && secs >= 0.0 => secs,
                    Some(secs) => {
                        warn!(
                            "Invalid silence threshold {}, using {}s",
                            secs, DEFAULT_SILENCE_THRESHOLD_SECS
                        );
                        DEFAULT_SILENCE_THRESHOLD_SECS
                    }
                    None => DEFAULT_SILENCE_THRESHOLD_SECS,
                };
                self.state.mode = Some(TurnMode::Automatic);
                self.state.silence_threshold_secs = Some(threshold);
            }
        }
    }

    /// Rebind which participant's audio is sourced
    pub fn set_active_participant(&mut self, id: impl Into<String>) {
        let id = id.into();
        if self.state.active_participant.as_deref() != Some(id.as_str()) {
            info!("Active participant: {}", id);
        }
        self.state.active_participant = Some(id);
    }

    pub fn bind_detector(&mut self, detector: DetectorHandle) {
        self.state.detector = Some(detector);
    }

    /// Enter manual listening if no mode has been chosen yet
    ///
    /// Returns true when the state changed. Audio stays as it was.
    pub fn ensure_manual(&mut self) -> bool {
        if self.state.mode.is_some() {
            return false;
        }
        self.set_mode(TurnMode::Manual, None);
        info!("Manual listening (push-to-talk)");
        true
    }

    /// Arm automatic listening on `participant` in one step
    pub fn arm_automatic(
        &mut self,
        participant: &str,
        detector: DetectorHandle,
        silence_threshold_secs: f64,
    ) {
        self.bind_detector(detector);
        self.set_mode(TurnMode::Automatic, Some(silence_threshold_secs));
        self.set_active_participant(participant);
        self.set_audio_enabled(true);
    }

    /// Snapshot of what the capture layer should be doing right now
    pub fn input_settings(&self) -> InputSettings {
        let turn_detection = match (self.state.mode, &self.state.detector) {
            (Some(TurnMode::Automatic), Some(detector)) => TurnDetection::Vad {
                detector: detector.model.clone(),
                min_endpointing_delay: self
                    .state
                    .silence_threshold_secs
                    .unwrap_or(DEFAULT_SILENCE_THRESHOLD_SECS),
            },
            _ => TurnDetection::Manual,
        };

        InputSettings {
            audio_enabled: self.state.audio_input_enabled,
            participant: self.state.active_participant.clone(),
            turn_detection,
        }
    }
}
