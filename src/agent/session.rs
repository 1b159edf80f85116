use super::handle::{SessionEvent, SessionHandle, SessionSnapshot};
use crate::commands::{CommandEffects, CommandHandler, CommandName};
use crate::config::AgentConfig;
use crate::metrics::MetricsSink;
use crate::pipeline::{DetectorProvider, ReplyPipeline, ReplyRequest, ReplySource};
use crate::session::{SessionController, TurnAugmentor, TurnDecision};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, info_span, warn, Instrument};

/// A battle session: turn-taking state plus the pipeline it drives
///
/// The session runs as a single task. Commands, utterances and metrics are
/// events on one queue, each handled to completion before the next starts.
pub struct BattleSession {
    session_id: String,
    room: String,
    controller: SessionController,
    augmentor: TurnAugmentor,
    commands: CommandHandler,
    metrics: MetricsSink,
    pipeline: Arc<dyn ReplyPipeline>,
}

impl BattleSession {
    pub fn new(
        session_id: String,
        room: String,
        pipeline: Arc<dyn ReplyPipeline>,
        detectors: Arc<dyn DetectorProvider>,
        protect_silence_secs: f64,
    ) -> Self {
        info!("Creating battle session: {}", session_id);

        Self {
            session_id,
            room,
            controller: SessionController::new(),
            augmentor: TurnAugmentor::new(),
            commands: CommandHandler::new(detectors, protect_silence_secs),
            metrics: MetricsSink::new(),
            pipeline,
        }
    }

    pub fn from_config(
        session_id: String,
        config: &AgentConfig,
        pipeline: Arc<dyn ReplyPipeline>,
        detectors: Arc<dyn DetectorProvider>,
    ) -> Self {
        Self::new(
            session_id,
            config.room.clone(),
            pipeline,
            detectors,
            config.protect_silence_secs,
        )
    }

    /// Start the session loop
    pub fn spawn(self, buffer: usize) -> (SessionHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let span = info_span!("session", room = %self.room, session_id = %self.session_id);
        let task = tokio::spawn(self.run(rx).instrument(span));

        (SessionHandle::new(tx), task)
    }

    async fn run(mut self, mut rx: mpsc::Receiver<SessionEvent>) {
        info!("Battle session started with {} pipeline", self.pipeline.name());

        // Push-to-talk until a command says otherwise
        self.controller.set_audio_enabled(false);
        if let Err(e) = self
            .pipeline
            .configure_input(self.controller.input_settings())
            .await
        {
            error!("Failed to disable input audio: {:#}", e);
        }

        while let Some(event) = rx.recv().await {
            match event {
                SessionEvent::Command {
                    command,
                    caller_identity,
                    payload,
                    respond,
                } => {
                    let result = self.handle_command(command, &caller_identity, &payload).await;
                    if let Err(e) = &result {
                        error!("{} failed: {:#}", command, e);
                    }
                    let _ = respond.send(result);
                }
                SessionEvent::UtteranceCompleted {
                    participant,
                    text,
                    respond,
                } => {
                    let decision = self.handle_utterance(participant.as_deref(), &text).await;
                    let _ = respond.send(decision);
                }
                SessionEvent::Metrics(event) => {
                    event.log();
                    self.metrics.collect(&event);
                }
                SessionEvent::Snapshot(respond) => {
                    let _ = respond.send(self.snapshot());
                }
                SessionEvent::Usage(respond) => {
                    let _ = respond.send(self.metrics.snapshot());
                }
                SessionEvent::Shutdown(respond) => {
                    let summary = self.metrics.summarize();
                    info!("Usage: {}", summary);
                    let _ = respond.send(summary);
                    break;
                }
            }
        }

        if !self.metrics.is_closed() {
            let summary = self.metrics.summarize();
            info!("Usage: {}", summary);
        }

        info!("Battle session stopped");
    }

    async fn handle_command(
        &mut self,
        command: CommandName,
        caller_identity: &str,
        payload: &str,
    ) -> Result<()> {
        let effects = self
            .commands
            .dispatch(
                command,
                caller_identity,
                payload,
                &mut self.controller,
                &mut self.augmentor,
            )
            .await?;

        self.apply(effects).await
    }

    async fn handle_utterance(&mut self, participant: Option<&str>, text: &str) -> TurnDecision {
        info!(
            "User turn completed ({}): {}",
            participant.unwrap_or("unknown"),
            text
        );

        if !self.controller.is_capturing() {
            warn!(
                "Utterance arrived while audio input is disabled ({:?})",
                self.controller.listening_state()
            );
        }

        let decision = self.augmentor.on_user_turn_completed(text);

        if let TurnDecision::Reply(record) = &decision {
            let request = ReplyRequest {
                user_input: record.effective_text.clone(),
                source: ReplySource::UserTurn,
            };
            if let Err(e) = self.pipeline.generate_reply(request).await {
                error!("Failed to generate reply: {:#}", e);
            }
        }

        decision
    }

    /// Apply input settings first, then request the reply
    async fn apply(&self, effects: CommandEffects) -> Result<()> {
        let mut result = Ok(());

        if let Some(settings) = effects.input {
            if let Err(e) = self.pipeline.configure_input(settings).await {
                error!("Failed to configure input: {:#}", e);
                result = Err(e);
            }
        }

        if let Some(reply) = effects.reply {
            if let Err(e) = self.pipeline.generate_reply(reply).await {
                error!("Failed to generate reply: {:#}", e);
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }

        result
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id.clone(),
            room: self.room.clone(),
            listening_state: self.controller.listening_state(),
            state: self.controller.state().clone(),
            directive_pending: self.augmentor.pending_directive().is_some(),
        }
    }
}
