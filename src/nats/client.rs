use super::messages::{AgentAnnouncement, InputSettingsMessage, ReplyRequestMessage};
use crate::pipeline::ReplyRequest;
use crate::session::InputSettings;
use anyhow::{Context, Result};
use async_nats::Client;
use serde::Serialize;
use tracing::{debug, info};

pub struct NatsClient {
    client: Client,
    room: String,
    session_id: String,
}

impl NatsClient {
    /// Connect to NATS server
    pub async fn connect(url: &str, room: String, session_id: String) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self {
            client,
            room,
            session_id,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Subject under this room, e.g. `battle.<room>.reply`
    pub fn subject(&self, leaf: &str) -> String {
        format!("battle.{}.{}", self.room, leaf)
    }

    /// Publish a reply-generation request
    pub async fn publish_reply_request(&self, request: &ReplyRequest) -> Result<()> {
        let message = ReplyRequestMessage {
            session_id: self.session_id.clone(),
            request_id: uuid::Uuid::new_v4().to_string(),
            user_input: request.user_input.clone(),
            source: request.source,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        self.publish_json("reply", &message).await
    }

    /// Publish new capture settings
    pub async fn publish_input_settings(&self, settings: &InputSettings) -> Result<()> {
        let message = InputSettingsMessage {
            session_id: self.session_id.clone(),
            settings: settings.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        self.publish_json("input", &message).await
    }

    /// Announce the agent to the room
    pub async fn announce(&self, announcement: &AgentAnnouncement) -> Result<()> {
        self.publish_json("announce", announcement).await
    }

    /// Subscribe to completed user utterances
    pub async fn subscribe_utterances(&self) -> Result<async_nats::Subscriber> {
        self.subscribe("utterance").await
    }

    /// Subscribe to pipeline metrics events
    pub async fn subscribe_metrics(&self) -> Result<async_nats::Subscriber> {
        self.subscribe("metrics").await
    }

    async fn publish_json<T: Serialize>(&self, leaf: &str, message: &T) -> Result<()> {
        let subject = self.subject(leaf);
        let payload = serde_json::to_vec(message)?;

        self.client
            .publish(subject.clone(), payload.into())
            .await
            .with_context(|| format!("Failed to publish to {}", subject))?;

        debug!("Published to {}", subject);

        Ok(())
    }

    async fn subscribe(&self, leaf: &str) -> Result<async_nats::Subscriber> {
        let subject = self.subject(leaf);

        info!("Subscribing to {}", subject);

        let subscriber = self
            .client
            .subscribe(subject.clone())
            .await
            .with_context(|| format!("Failed to subscribe to {}", subject))?;

        Ok(subscriber)
    }
}
