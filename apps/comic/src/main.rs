mod compose;
mod config;
mod errors;
mod generation;
mod layout;
mod llm_client;
mod render;
mod retry;
mod routes;
mod scenes;
mod state;
mod style;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::render::{HttpPanelRenderer, PanelRenderer, PlaceholderRenderer};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Comic API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client (optional — sentence splitting without it)
    let llm = match &config.anthropic_api_key {
        Some(key) => {
            let client = LlmClient::new(key.clone())?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(client)
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; stories will be split on sentences");
            None
        }
    };

    // Initialize the image model handle
    let renderer = build_renderer(&config)?;
    info!("Panel renderer initialized ({})", renderer.name());

    tokio::fs::create_dir_all(&config.output_dir).await?;
    info!("Writing comics to {}", config.output_dir.display());

    let state = AppState {
        llm,
        renderer: Arc::clone(&renderer),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    renderer.shutdown().await?;
    info!("Panel renderer shut down");

    Ok(())
}

fn build_renderer(config: &Config) -> Result<Arc<dyn PanelRenderer>> {
    let renderer: Arc<dyn PanelRenderer> = match &config.image_api_url {
        Some(url) => Arc::new(HttpPanelRenderer::new(
            url.clone(),
            config.image_api_key.clone(),
        )?),
        None => {
            warn!("IMAGE_API_URL not set; using placeholder panels");
            Arc::new(PlaceholderRenderer::new())
        }
    };
    Ok(renderer)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
