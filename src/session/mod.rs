//! Turn-taking session state
//!
//! This module provides:
//! - `SessionState` and the `TurnMode`/`ListeningState` state machine
//! - `SessionController`, the only owner of mode and capture settings
//! - `DirectiveSlot`, a one-shot directive mailbox
//! - `TurnAugmentor`, which applies the directive to the next user turn

mod augmentor;
mod controller;
mod directive;
mod state;

pub use augmentor::{TurnAugmentor, TurnDecision, UtteranceRecord};
pub use controller::{InputSettings, SessionController, TurnDetection, DEFAULT_SILENCE_THRESHOLD_SECS};
pub use directive::DirectiveSlot;
pub use state::{DetectorHandle, ListeningState, SessionState, TurnMode};
