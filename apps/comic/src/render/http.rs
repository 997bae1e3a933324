//! HTTP text-to-image backend.
//!
//! Protocol: `POST {endpoint}` with JSON `{"prompt", "width", "height"}`; the
//! response body is the encoded image (PNG or JPEG). 429 and 5xx responses
//! are retried with exponential backoff.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use image::RgbaImage;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use crate::layout::Dimension2D;
use crate::render::{PanelRenderer, RenderError};
use crate::retry::{backoff, is_retryable, MAX_ATTEMPTS};

/// Diffusion models are slow; allow several minutes per panel.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    prompt: &'a str,
    width: u32,
    height: u32,
}

pub struct HttpPanelRenderer {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    closed: AtomicBool,
}

impl HttpPanelRenderer {
    pub fn new(endpoint: String, api_key: Option<String>) -> Result<Self, RenderError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
            closed: AtomicBool::new(false),
        })
    }
}

#[async_trait]
impl PanelRenderer for HttpPanelRenderer {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn render(&self, prompt: &str, size: Dimension2D) -> Result<RgbaImage, RenderError> {
        let request_body = ImageRequest {
            prompt,
            width: size.width,
            height: size.height,
        };

        let mut last_error: Option<RenderError> = None;

        for attempt in 0..MAX_ATTEMPTS {
            if self.closed.load(Ordering::Acquire) {
                return Err(RenderError::Closed);
            }
            if let Some(delay) = backoff(attempt) {
                warn!(
                    "Image API attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let mut request = self.client.post(&self.endpoint).json(&request_body);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }

            let response = match request.send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(RenderError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if is_retryable(status) {
                let body = response.text().await.unwrap_or_default();
                warn!("Image API returned {}: {}", status, body);
                last_error = Some(RenderError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(RenderError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let bytes = response.bytes().await?;
            let image = decode_panel(&bytes)?;
            debug!(
                width = image.width(),
                height = image.height(),
                "Image API returned panel"
            );
            return Ok(image);
        }

        Err(last_error.unwrap_or(RenderError::RetriesExhausted {
            retries: MAX_ATTEMPTS,
        }))
    }

    async fn shutdown(&self) -> Result<(), RenderError> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}

/// Decodes an encoded panel image into RGBA.
pub(crate) fn decode_panel(bytes: &[u8]) -> Result<RgbaImage, RenderError> {
    if bytes.is_empty() {
        return Err(RenderError::EmptyImage);
    }
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use image::{ImageFormat, Rgba};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_decode_panel_png() {
        let image = decode_panel(&png_bytes(12, 7)).unwrap();
        assert_eq!(image.dimensions(), (12, 7));
        assert_eq!(image.get_pixel(0, 0), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_decode_panel_empty_body() {
        assert!(matches!(decode_panel(&[]), Err(RenderError::EmptyImage)));
    }

    #[test]
    fn test_decode_panel_garbage() {
        assert!(matches!(
            decode_panel(b"definitely not an image"),
            Err(RenderError::Decode(_))
        ));
    }

    #[test]
    fn test_image_request_wire_shape() {
        let body = ImageRequest {
            prompt: "a cat",
            width: 512,
            height: 256,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["prompt"], "a cat");
        assert_eq!(json["width"], 512);
        assert_eq!(json["height"], 256);
    }

    #[tokio::test]
    async fn test_render_after_shutdown_fails_without_request() {
        let renderer =
            HttpPanelRenderer::new("http://127.0.0.1:9/generate".to_string(), None).unwrap();
        renderer.shutdown().await.unwrap();
        let err = renderer
            .render("a cat", Dimension2D::new(8, 8))
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::Closed));
    }
}
