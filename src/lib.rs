pub mod agent;
pub mod commands;
pub mod config;
pub mod http;
pub mod metrics;
pub mod nats;
pub mod pipeline;
pub mod prompt;
pub mod session;

pub use agent::{BattleSession, SessionHandle, SessionSnapshot};
pub use commands::{CommandEffects, CommandHandler, CommandName};
pub use config::Config;
pub use http::{create_router, AppState};
pub use metrics::{MetricsSink, PipelineMetrics, UsageSummary};
pub use nats::{AgentAnnouncement, NatsClient};
pub use pipeline::{DetectorProvider, NatsPipeline, PrewarmedDetector, ReplyPipeline, ReplyRequest, ReplySource};
pub use session::{
    DetectorHandle, InputSettings, ListeningState, SessionController, SessionState, TurnAugmentor,
    TurnDecision, TurnDetection, TurnMode, UtteranceRecord,
};
