//! Seams to the external voice pipeline
//!
//! Recognition, inference, synthesis and voice-activity detection live outside
//! this crate. The session only asks the pipeline to:
//! - generate a reply from a piece of user input
//! - reconfigure audio capture (enablement, participant, turn detection)
//! - hand over a detector resource for automatic turn detection

mod detector;
mod nats;

pub use detector::PrewarmedDetector;
pub use nats::NatsPipeline;

use crate::session::{DetectorHandle, InputSettings};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Why a reply is being requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    /// Synthetic input from an attack command
    Attack,
    /// A completed (possibly framed) user utterance
    UserTurn,
}

/// A single reply-generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRequest {
    pub user_input: String,
    pub source: ReplySource,
}

/// Reply generation and capture control
#[async_trait::async_trait]
pub trait ReplyPipeline: Send + Sync {
    /// Ask the pipeline to generate and speak a reply
    async fn generate_reply(&self, request: ReplyRequest) -> Result<()>;

    /// Apply new capture settings
    async fn configure_input(&self, settings: InputSettings) -> Result<()>;

    /// Get pipeline name for logging
    fn name(&self) -> &str;
}

/// Source of the detector used in automatic mode
#[async_trait::async_trait]
pub trait DetectorProvider: Send + Sync {
    async fn load(&self) -> Result<DetectorHandle>;
}
