use super::directive::DirectiveSlot;
use crate::prompt;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A completed user utterance and the text the reply is generated from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtteranceRecord {
    pub raw_text: String,
    pub effective_text: String,
}

/// What to do with a completed user turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnDecision {
    /// Generate a reply from `effective_text`
    Reply(UtteranceRecord),
    /// Suppress reply generation for this turn
    Skip(UtteranceRecord),
}

impl TurnDecision {
    pub fn record(&self) -> &UtteranceRecord {
        match self {
            TurnDecision::Reply(record) | TurnDecision::Skip(record) => record,
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, TurnDecision::Skip(_))
    }
}

/// Applies the pending directive to the next completed utterance
#[derive(Debug, Default)]
pub struct TurnAugmentor {
    directive: DirectiveSlot,
}

impl TurnAugmentor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a directive for the next utterance (last write wins)
    pub fn arm(&mut self, directive: &str) {
        self.directive.arm(directive);
    }

    pub fn pending_directive(&self) -> Option<&str> {
        self.directive.peek()
    }

    /// Process one completed utterance
    ///
    /// The pending directive is consumed by this call whatever the outcome.
    /// Blank speech is always skipped, framed or not.
    pub fn on_user_turn_completed(&mut self, raw_text: &str) -> TurnDecision {
        let effective_text = match self.directive.take() {
            Some(directive) => {
                info!("Applying protect instructions: {}", directive);
                prompt::frame_directive(&directive, raw_text)
            }
            None => raw_text.to_string(),
        };

        let record = UtteranceRecord {
            raw_text: raw_text.to_string(),
            effective_text,
        };

        if record.raw_text.trim().is_empty() || record.effective_text.trim().is_empty() {
            info!("ignore empty user turn");
            return TurnDecision::Skip(record);
        }

        TurnDecision::Reply(record)
    }
}
