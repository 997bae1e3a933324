use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::render::PanelRenderer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no API key is configured; stories are then split on sentences.
    pub llm: Option<LlmClient>,
    /// Image model handle. Shut down explicitly when the server stops.
    pub renderer: Arc<dyn PanelRenderer>,
    pub config: Config,
}
