use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus the sizes of the loaded job table and skill vocabulary.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME"),
        "job_count": state.matcher.len(),
        "skill_count": state.parser.pipeline().vocabulary_len()
    }))
}
