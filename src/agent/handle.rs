use crate::commands::CommandName;
use crate::metrics::{PipelineMetrics, UsageSummary};
use crate::session::{ListeningState, SessionState, TurnDecision};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

/// Events processed by the session loop, one at a time
#[derive(Debug)]
pub enum SessionEvent {
    Command {
        command: CommandName,
        caller_identity: String,
        payload: String,
        respond: oneshot::Sender<Result<()>>,
    },
    UtteranceCompleted {
        participant: Option<String>,
        text: String,
        respond: oneshot::Sender<TurnDecision>,
    },
    Metrics(PipelineMetrics),
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Usage(oneshot::Sender<UsageSummary>),
    Shutdown(oneshot::Sender<UsageSummary>),
}

/// Point-in-time view of the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub room: String,
    pub listening_state: ListeningState,
    pub state: SessionState,
    pub directive_pending: bool,
}

/// Cloneable sender side of the session loop
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionEvent>,
}

impl SessionHandle {
    pub(crate) fn new(tx: mpsc::Sender<SessionEvent>) -> Self {
        Self { tx }
    }

    /// Invoke a remote command and wait until it has been applied
    pub async fn command(
        &self,
        command: CommandName,
        caller_identity: impl Into<String>,
        payload: impl Into<String>,
    ) -> Result<()> {
        let (respond, rx) = oneshot::channel();
        self.send(SessionEvent::Command {
            command,
            caller_identity: caller_identity.into(),
            payload: payload.into(),
            respond,
        })
        .await?;

        rx.await.context("Session dropped command")?
    }

    /// Report a completed user utterance
    pub async fn utterance_completed(
        &self,
        participant: Option<String>,
        text: impl Into<String>,
    ) -> Result<TurnDecision> {
        let (respond, rx) = oneshot::channel();
        self.send(SessionEvent::UtteranceCompleted {
            participant,
            text: text.into(),
            respond,
        })
        .await?;

        rx.await.context("Session dropped utterance")
    }

    /// Forward a metrics event; after shutdown it is logged and dropped
    pub async fn record_metrics(&self, event: PipelineMetrics) {
        let stage = event.stage();
        if self.tx.send(SessionEvent::Metrics(event)).await.is_err() {
            warn!("Dropping late {} metrics: session has shut down", stage);
        }
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        let (respond, rx) = oneshot::channel();
        self.send(SessionEvent::Snapshot(respond)).await?;
        rx.await.context("Session dropped snapshot request")
    }

    /// Current usage totals without flushing
    pub async fn usage(&self) -> Result<UsageSummary> {
        let (respond, rx) = oneshot::channel();
        self.send(SessionEvent::Usage(respond)).await?;
        rx.await.context("Session dropped usage request")
    }

    /// Stop the loop and return the final usage summary
    pub async fn shutdown(&self) -> Result<UsageSummary> {
        let (respond, rx) = oneshot::channel();
        self.send(SessionEvent::Shutdown(respond)).await?;
        rx.await.context("Session dropped shutdown request")
    }

    async fn send(&self, event: SessionEvent) -> Result<()> {
        self.tx
            .send(event)
            .await
            .map_err(|_| anyhow!("Session is not running"))
    }
}
