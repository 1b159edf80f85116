use super::DetectorProvider;
use crate::session::DetectorHandle;
use anyhow::Result;
use tracing::info;

/// Detector loaded by the pipeline at worker start, looked up by model name
pub struct PrewarmedDetector {
    model: String,
}

impl PrewarmedDetector {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }
}

#[async_trait::async_trait]
impl DetectorProvider for PrewarmedDetector {
    async fn load(&self) -> Result<DetectorHandle> {
        if self.model.trim().is_empty() {
            anyhow::bail!("No VAD model configured");
        }

        info!("Using prewarmed VAD: {}", self.model);

        Ok(DetectorHandle {
            model: self.model.clone(),
        })
    }
}
