use super::client::NatsClient;
use super::messages::UtteranceMessage;
use crate::agent::SessionHandle;
use crate::metrics::PipelineMetrics;
use anyhow::Result;
use futures::stream::StreamExt;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Forward pipeline events from NATS into the session loop
///
/// Returns the utterance and metrics forwarding tasks.
pub async fn spawn_ingress(
    client: &NatsClient,
    handle: SessionHandle,
) -> Result<Vec<JoinHandle<()>>> {
    let mut utterances = client.subscribe_utterances().await?;
    let mut metrics = client.subscribe_metrics().await?;

    let utterance_handle = handle.clone();
    let utterance_task = tokio::spawn(async move {
        info!("Utterance forwarding task started");

        while let Some(msg) = utterances.next().await {
            let utterance = match serde_json::from_slice::<UtteranceMessage>(&msg.payload) {
                Ok(utterance) => utterance,
                Err(e) => {
                    warn!("Failed to parse utterance message: {}", e);
                    continue;
                }
            };

            if let Err(e) = utterance_handle
                .utterance_completed(utterance.participant, utterance.text)
                .await
            {
                error!("Failed to deliver utterance: {}", e);
                break;
            }
        }

        info!("Utterance forwarding task stopped");
    });

    let metrics_task = tokio::spawn(async move {
        info!("Metrics forwarding task started");

        while let Some(msg) = metrics.next().await {
            match serde_json::from_slice::<PipelineMetrics>(&msg.payload) {
                Ok(event) => handle.record_metrics(event).await,
                Err(e) => warn!("Failed to parse metrics message: {}", e),
            }
        }

        info!("Metrics forwarding task stopped");
    });

    Ok(vec![utterance_task, metrics_task])
}
