use super::{ReplyPipeline, ReplyRequest};
use crate::nats::NatsClient;
use crate::session::InputSettings;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Pipeline that forwards requests to the voice worker over NATS
pub struct NatsPipeline {
    client: Arc<NatsClient>,
}

impl NatsPipeline {
    pub fn new(client: Arc<NatsClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ReplyPipeline for NatsPipeline {
    async fn generate_reply(&self, request: ReplyRequest) -> Result<()> {
        self.client
            .publish_reply_request(&request)
            .await
            .context("Failed to request reply")
    }

    async fn configure_input(&self, settings: InputSettings) -> Result<()> {
        self.client
            .publish_input_settings(&settings)
            .await
            .context("Failed to configure input")
    }

    fn name(&self) -> &str {
        "nats"
    }
}
