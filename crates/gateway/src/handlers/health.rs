//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub status: String,
    pub checks: HealthChecks,
}

#[derive(Serialize)]
pub struct HealthChecks {
    pub knowledge_service: CheckResult,
}

#[derive(Serialize)]
pub struct CheckResult {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Liveness probe - always returns healthy if server is running
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: scripture_chat_common::VERSION.to_string(),
    })
}

/// Readiness probe - the relay cannot serve anything without an upstream
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let knowledge_check = if state.knowledge.is_configured() {
        CheckResult {
            status: "configured".to_string(),
            error: None,
        }
    } else {
        CheckResult {
            status: "missing".to_string(),
            error: Some("KNOWLEDGE_SERVICE_URL is not configured".to_string()),
        }
    };

    let all_ready = knowledge_check.error.is_none();
    let status = if all_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadyResponse {
            status: if all_ready { "ready" } else { "not_ready" }.to_string(),
            checks: HealthChecks {
                knowledge_service: knowledge_check,
            },
        }),
    )
}
