use anyhow::{Context, Result};
use battle_agent::{
    create_router, nats, prompt, AgentAnnouncement, AppState, BattleSession, Config, NatsClient,
    NatsPipeline, PrewarmedDetector,
};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "battle-agent", about = "Turn-taking agent for compliment battles")]
struct Args {
    /// Config file (TOML, extension optional)
    #[arg(short, long)]
    config: Option<String>,

    /// Room to join, overrides config
    #[arg(long)]
    room: Option<String>,

    /// HTTP port, overrides config
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut cfg = Config::load(args.config.as_deref())?;
    if let Some(room) = args.room {
        cfg.agent.room = room;
    }
    if let Some(port) = args.port {
        cfg.service.http.port = port;
    }

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Room: {}", cfg.agent.room);

    let session_id = format!("battle-{}", uuid::Uuid::new_v4());

    let nats_client = Arc::new(
        NatsClient::connect(&cfg.nats.url, cfg.agent.room.clone(), session_id.clone())
            .await
            .context("Failed to connect to NATS")?,
    );

    let instructions = prompt::instructions(cfg.agent.instructions.as_deref()).to_string();
    nats_client
        .announce(&AgentAnnouncement::push_to_talk(
            session_id.clone(),
            cfg.agent.identity.clone(),
            instructions,
        ))
        .await
        .context("Failed to announce agent")?;

    let pipeline = Arc::new(NatsPipeline::new(Arc::clone(&nats_client)));
    let detectors = Arc::new(PrewarmedDetector::new(cfg.agent.vad_model.clone()));
    let session = BattleSession::from_config(session_id, &cfg.agent, pipeline, detectors);
    let (handle, session_task) = session.spawn(cfg.agent.event_buffer);

    let ingress = nats::spawn_ingress(&nats_client, handle.clone())
        .await
        .context("Failed to subscribe to pipeline events")?;

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(AppState::new(handle.clone())))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Shutting down");

    if let Err(e) = handle.shutdown().await {
        error!("Failed to flush session: {:#}", e);
    }
    for task in ingress {
        task.abort();
    }
    if let Err(e) = session_task.await {
        error!("Session task panicked: {}", e);
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
