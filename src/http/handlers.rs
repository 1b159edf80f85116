use super::state::AppState;
use crate::commands::CommandName;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{error, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    /// Identity of the participant invoking the command
    pub caller_identity: String,

    /// Optional instructions; missing or non-string means empty
    #[serde(default, deserialize_with = "lenient_payload")]
    pub payload: String,
}

fn lenient_payload<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(payload)) => Ok(payload),
        Some(other) => {
            warn!("Ignoring non-string payload: {}", other);
            Ok(String::new())
        }
        None => Ok(String::new()),
    }
}

#[derive(Debug, Serialize)]
pub struct RpcResponse {
    pub method: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: String) -> axum::response::Response {
    (status, Json(ErrorResponse { error })).into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /rpc/:method
/// Invoke a remote command on the session
///
/// The body is read as JSON whatever the content type; only a missing caller
/// identity rejects the call.
pub async fn invoke_rpc(
    State(state): State<AppState>,
    Path(method): Path<String>,
    body: Bytes,
) -> impl IntoResponse {
    let Some(command) = CommandName::parse(&method) else {
        warn!("Rejected unknown method {}", method);
        return error_response(
            StatusCode::NOT_FOUND,
            format!("Unknown method: {}", method),
        );
    };

    let req = match serde_json::from_slice::<RpcRequest>(&body) {
        Ok(req) => req,
        Err(e) => {
            warn!("Rejected {} without caller identity: {}", command, e);
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Invalid {} request: {}", command, e),
            );
        }
    };

    match state
        .session
        .command(command, req.caller_identity, req.payload)
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(RpcResponse {
                method: command.to_string(),
                status: "ok".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to run {}: {:#}", command, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to run {}: {}", command, e),
            )
        }
    }
}

/// GET /session
/// Current turn-taking state
pub async fn get_session(State(state): State<AppState>) -> impl IntoResponse {
    match state.session.snapshot().await {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => error_response(StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
    }
}

/// GET /metrics/summary
/// Usage accumulated so far
pub async fn get_usage(State(state): State<AppState>) -> impl IntoResponse {
    match state.session.usage().await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => error_response(StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
