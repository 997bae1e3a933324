//! Panel rendering — the boundary to the text-to-image model.
//!
//! Renderers are explicit handles: built at startup, carried in `AppState` as
//! `Arc<dyn PanelRenderer>`, and shut down when the server stops. Nothing in
//! the layout or compose path touches them.

pub mod http;
pub mod placeholder;

use async_trait::async_trait;
use image::RgbaImage;
use thiserror::Error;

use crate::layout::Dimension2D;
use crate::style::ArtStyle;

pub use http::HttpPanelRenderer;
pub use placeholder::PlaceholderRenderer;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Could not decode panel image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Image API returned an empty body")]
    EmptyImage,

    #[error("Renderer has been shut down")]
    Closed,

    #[error("Image API still failing after {retries} retries")]
    RetriesExhausted { retries: u32 },
}

/// A text-to-image backend.
#[async_trait]
pub trait PanelRenderer: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Renders one panel. The result may differ from `size`; the composer resizes.
    async fn render(&self, prompt: &str, size: Dimension2D) -> Result<RgbaImage, RenderError>;

    /// Releases backend resources. Later `render` calls fail with `Closed`.
    async fn shutdown(&self) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Prompt for one panel: the scene, the art style fragment, then the shared
/// character description when one is given. Every panel of a strip gets the
/// same character suffix so the model keeps the cast looking alike.
pub fn panel_prompt(
    scene_description: &str,
    art_style: ArtStyle,
    character: Option<&str>,
) -> String {
    let base = format!("{}, {}", scene_description.trim(), art_style.prompt());
    match character.map(str::trim).filter(|c| !c.is_empty()) {
        Some(character) => format!("{base}, consistent character appearance, {character}"),
        None => base,
    }
}
