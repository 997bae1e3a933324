use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and active renderer.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let storyboard = if state.llm.is_some() {
        "llm"
    } else {
        "sentence_split"
    };
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "comic-api",
        "renderer": state.renderer.name(),
        "storyboard": storyboard,
    }))
}
