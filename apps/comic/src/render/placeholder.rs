//! Offline renderer: flat panels whose colors are derived from the prompt.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use image::{Rgba, RgbaImage};

use crate::layout::Dimension2D;
use crate::render::{PanelRenderer, RenderError};

/// Deterministic stand-in for an image model. Same prompt, same pixels.
#[derive(Debug, Default)]
pub struct PlaceholderRenderer {
    closed: AtomicBool,
}

impl PlaceholderRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PanelRenderer for PlaceholderRenderer {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    async fn render(&self, prompt: &str, size: Dimension2D) -> Result<RgbaImage, RenderError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(RenderError::Closed);
        }
        Ok(paint_placeholder(prompt, size))
    }

    async fn shutdown(&self) -> Result<(), RenderError> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}

/// Sky over ground: the top two thirds take one prompt-derived color, the rest a darker shade.
pub fn paint_placeholder(prompt: &str, size: Dimension2D) -> RgbaImage {
    let [r, g, b, ..] = fnv1a(prompt).to_le_bytes();
    // Keep the sky light enough for dark bubble text to stay legible.
    let sky = Rgba([r / 2 + 96, g / 2 + 96, b / 2 + 96, 255]);
    let ground = Rgba([sky[0] / 2, sky[1] / 2, sky[2] / 2, 255]);
    let horizon = size.height * 2 / 3;

    RgbaImage::from_fn(size.width, size.height, |_, y| {
        if y < horizon {
            sky
        } else {
            ground
        }
    })
}

fn fnv1a(s: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for b in s.as_bytes() {
        hash ^= u64::from(*b);
        hash = hash.wrapping_mul(0x0000_0100_0000_01B3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_render_matches_requested_size() {
        let renderer = PlaceholderRenderer::new();
        let image = renderer
            .render("A cat chases a mouse", Dimension2D::new(64, 48))
            .await
            .unwrap();
        assert_eq!(image.dimensions(), (64, 48));
    }

    #[tokio::test]
    async fn test_render_is_deterministic_per_prompt() {
        let renderer = PlaceholderRenderer::new();
        let size = Dimension2D::new(16, 16);
        let a = renderer.render("kitchen", size).await.unwrap();
        let b = renderer.render("kitchen", size).await.unwrap();
        let c = renderer.render("cookie jar", size).await.unwrap();
        assert_eq!(a, b);
        assert_ne!(a.get_pixel(0, 0), c.get_pixel(0, 0));
    }

    #[tokio::test]
    async fn test_render_after_shutdown_fails() {
        let renderer = PlaceholderRenderer::new();
        renderer.shutdown().await.unwrap();
        let err = renderer
            .render("anything", Dimension2D::new(8, 8))
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::Closed));
    }

    #[test]
    fn test_ground_is_darker_than_sky() {
        let image = paint_placeholder("park", Dimension2D::new(9, 9));
        let sky = image.get_pixel(0, 0);
        let ground = image.get_pixel(0, 8);
        assert!(ground[0] < sky[0] && ground[1] < sky[1] && ground[2] < sky[2]);
    }
}
