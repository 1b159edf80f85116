//! HTTP API for the battle frontend
//!
//! This module exposes the remote command surface and session queries:
//! - POST /rpc/:method - Invoke `attack` or `protect`
//! - GET /session - Current turn-taking state
//! - GET /metrics/summary - Usage accumulated so far
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::{RpcRequest, RpcResponse};
pub use routes::create_router;
pub use state::AppState;
