use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::warn;

use crate::llm_client::MODEL;
use crate::state::AppState;

/// GET /health
/// Makes a minimal model call; reports `unhealthy` with the error when it fails.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    match state.analyzer.check_connection().await {
        Ok(()) => Json(json!({
            "status": "healthy",
            "llm_connection": "active",
            "model": MODEL,
            "version": env!("CARGO_PKG_VERSION"),
            "service": "resume-ats-api"
        })),
        Err(e) => {
            warn!("Health check failed: {e}");
            Json(json!({
                "status": "unhealthy",
                "error": e.to_string(),
                "version": env!("CARGO_PKG_VERSION"),
                "service": "resume-ats-api"
            }))
        }
    }
}

/// GET /api
pub async fn api_root_handler() -> Json<Value> {
    Json(json!({
        "message": "Resume Optimizer & ATS Checker API",
        "status": "active",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
