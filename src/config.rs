use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub nats: NatsConfig,
    pub agent: AgentConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NatsConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Room the agent joins; scopes all NATS subjects
    pub room: String,

    /// Participant identity announced to the room
    pub identity: String,

    /// Overrides the default persona when non-empty
    #[serde(default)]
    pub instructions: Option<String>,

    /// Endpointing delay used while protecting
    pub protect_silence_secs: f64,

    /// Prewarmed VAD model resolved on the first protect
    pub vad_model: String,

    /// Capacity of the session event queue
    pub event_buffer: usize,
}

impl Config {
    /// Load defaults, then `path` (TOML, extension optional), then `BATTLE__*` env vars
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("service.name", "battle-agent")?
            .set_default("service.http.bind", "0.0.0.0")?
            .set_default("service.http.port", 8089_i64)?
            .set_default("nats.url", "nats://localhost:4222")?
            .set_default("agent.room", "battle")?
            .set_default("agent.identity", "ptt-agent")?
            .set_default("agent.protect_silence_secs", 3.0)?
            .set_default("agent.vad_model", "silero")?
            .set_default("agent.event_buffer", 64_i64)?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix("BATTLE").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        Ok(settings.try_deserialize()?)
    }
}
