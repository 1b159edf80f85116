//! Remote command dispatch
//!
//! Commands are looked up in a fixed table and handled by typed functions that
//! mutate the session and return the effects the caller must apply.

use crate::pipeline::{DetectorProvider, ReplyRequest, ReplySource};
use crate::prompt;
use crate::session::{
    DetectorHandle, InputSettings, SessionController, TurnAugmentor, DEFAULT_SILENCE_THRESHOLD_SECS,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Remotely invocable commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandName {
    Attack,
    Protect,
}

impl CommandName {
    pub const ALL: [CommandName; 2] = [CommandName::Attack, CommandName::Protect];

    /// Look up a command by its wire name
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandName::Attack => "attack",
            CommandName::Protect => "protect",
        }
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side effects a command asks the pipeline to perform
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandEffects {
    /// New capture settings, applied before any reply
    pub input: Option<InputSettings>,
    /// Reply to generate immediately
    pub reply: Option<ReplyRequest>,
}

/// Handles attack/protect against the session
pub struct CommandHandler {
    detectors: Arc<dyn DetectorProvider>,
    detector: Option<DetectorHandle>,
    protect_silence_secs: f64,
}

impl CommandHandler {
    pub fn new(detectors: Arc<dyn DetectorProvider>, protect_silence_secs: f64) -> Self {
        Self {
            detectors,
            detector: None,
            protect_silence_secs,
        }
    }

    /// Run `command` on behalf of `caller_identity`
    pub async fn dispatch(
        &mut self,
        command: CommandName,
        caller_identity: &str,
        payload: &str,
        controller: &mut SessionController,
        augmentor: &mut TurnAugmentor,
    ) -> Result<CommandEffects> {
        info!(
            "{} called by {} with instructions: {}",
            command, caller_identity, payload
        );

        match command {
            CommandName::Attack => Ok(self.attack(payload, controller)),
            CommandName::Protect => {
                self.protect(caller_identity, payload, controller, augmentor)
                    .await
            }
        }
    }

    /// Reply immediately from a synthetic user input, bypassing capture
    pub fn attack(&self, payload: &str, controller: &mut SessionController) -> CommandEffects {
        let input = controller
            .ensure_manual()
            .then(|| controller.input_settings());

        CommandEffects {
            input,
            reply: Some(ReplyRequest {
                user_input: prompt::attack_prompt(payload),
                source: ReplySource::Attack,
            }),
        }
    }

    /// Arm the directive and listen to the caller with silence detection
    pub async fn protect(
        &mut self,
        caller_identity: &str,
        payload: &str,
        controller: &mut SessionController,
        augmentor: &mut TurnAugmentor,
    ) -> Result<CommandEffects> {
        augmentor.arm(payload);

        let detector = self.resolve_detector().await?;
        controller.arm_automatic(caller_identity, detector, self.protect_silence_secs);

        let threshold = controller
            .state()
            .silence_threshold_secs
            .unwrap_or(DEFAULT_SILENCE_THRESHOLD_SECS);
        info!(
            "Protect mode: VAD enabled with {}-second silence threshold",
            threshold
        );

        Ok(CommandEffects {
            input: Some(controller.input_settings()),
            reply: None,
        })
    }

    async fn resolve_detector(&mut self) -> Result<DetectorHandle> {
        if let Some(detector) = &self.detector {
            return Ok(detector.clone());
        }

        let detector = self
            .detectors
            .load()
            .await
            .context("Failed to load VAD")?;
        self.detector = Some(detector.clone());
        Ok(detector)
    }
}
