use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "fingenius-api",
        "version": state.config.version,
        "timestamp": Utc::now().timestamp_millis() as f64 / 1000.0,
    }))
}

/// GET /version
pub async fn version(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "app_name": state.config.app_name,
        "version": state.config.version,
        "git_hash": env!("GIT_HASH"),
        "git_branch": env!("GIT_BRANCH"),
        "git_tag": env!("GIT_TAG"),
        "build_time": env!("BUILD_TIME"),
    }))
}
