pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers as comics;
use crate::layout::handlers as layout;
use crate::state::AppState;
use crate::style::handlers as presets;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Style catalog
        .route("/api/v1/presets", get(presets::handle_list_presets))
        .route("/api/v1/presets/:name", get(presets::handle_get_preset))
        // Layout engine
        .route("/api/v1/layout", post(layout::handle_compute_layout))
        // Comics
        .route("/api/v1/comics", post(comics::handle_generate))
        .route("/api/v1/comics/:id", get(comics::handle_get_comic))
        .with_state(state)
}
