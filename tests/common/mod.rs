// Shared test doubles for the voice pipeline

#![allow(dead_code)]

use anyhow::Result;
use battle_agent::{
    BattleSession, DetectorHandle, DetectorProvider, InputSettings, ReplyPipeline, ReplyRequest,
    SessionHandle,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineCall {
    Reply(ReplyRequest),
    Input(InputSettings),
}

/// Pipeline that records every call instead of talking to a worker
#[derive(Default)]
pub struct RecordingPipeline {
    calls: Mutex<Vec<PipelineCall>>,
}

impl RecordingPipeline {
    pub fn calls(&self) -> Vec<PipelineCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn replies(&self) -> Vec<ReplyRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PipelineCall::Reply(reply) => Some(reply),
                _ => None,
            })
            .collect()
    }

    pub fn inputs(&self) -> Vec<InputSettings> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PipelineCall::Input(settings) => Some(settings),
                _ => None,
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl ReplyPipeline for RecordingPipeline {
    async fn generate_reply(&self, request: ReplyRequest) -> Result<()> {
        self.calls.lock().unwrap().push(PipelineCall::Reply(request));
        Ok(())
    }

    async fn configure_input(&self, settings: InputSettings) -> Result<()> {
        self.calls.lock().unwrap().push(PipelineCall::Input(settings));
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Detector provider that counts how often it is asked to load
#[derive(Default)]
pub struct CountingDetector {
    loads: AtomicUsize,
}

impl CountingDetector {
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DetectorProvider for CountingDetector {
    async fn load(&self) -> Result<DetectorHandle> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(DetectorHandle {
            model: "silero".to_string(),
        })
    }
}

pub struct TestSession {
    pub handle: SessionHandle,
    pub task: JoinHandle<()>,
    pub pipeline: Arc<RecordingPipeline>,
    pub detector: Arc<CountingDetector>,
}

pub fn spawn_session() -> TestSession {
    let pipeline = Arc::new(RecordingPipeline::default());
    let detector = Arc::new(CountingDetector::default());

    let session = BattleSession::new(
        "test-session".to_string(),
        "test-room".to_string(),
        pipeline.clone(),
        detector.clone(),
        3.0,
    );
    let (handle, task) = session.spawn(16);

    TestSession {
        handle,
        task,
        pipeline,
        detector,
    }
}
