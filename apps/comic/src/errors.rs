use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::compose::ComposeError;
use crate::layout::LayoutError;
use crate::render::RenderError;
use crate::style::StyleError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Received {images} panel images for {placements} placements")]
    PanelCountMismatch { images: usize, placements: usize },

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LayoutError> for AppError {
    fn from(err: LayoutError) -> Self {
        match err {
            LayoutError::InvalidArgument(msg) => AppError::InvalidArgument(msg),
        }
    }
}

impl From<StyleError> for AppError {
    fn from(err: StyleError) -> Self {
        match err {
            StyleError::UnknownPreset(name) => AppError::UnknownPreset(name),
            other => AppError::Validation(other.to_string()),
        }
    }
}

impl From<ComposeError> for AppError {
    fn from(err: ComposeError) -> Self {
        match err {
            ComposeError::PanelCountMismatch { images, placements } => {
                AppError::PanelCountMismatch { images, placements }
            }
            ComposeError::Layout(e) => e.into(),
            ComposeError::Style(e) => e.into(),
            ComposeError::EmptyCanvas | ComposeError::OutOfRange { .. } => {
                AppError::InvalidArgument(err.to_string())
            }
            ComposeError::Image(e) => AppError::Image(e.to_string()),
            ComposeError::Io(e) => AppError::Internal(e.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidArgument(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT", msg.clone())
            }
            AppError::UnknownPreset(name) => (
                StatusCode::NOT_FOUND,
                "UNKNOWN_PRESET",
                format!("No style preset named '{name}'"),
            ),
            AppError::PanelCountMismatch { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "PANEL_COUNT_MISMATCH",
                self.to_string(),
            ),
            AppError::Render(e) => {
                tracing::error!("Render error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RENDER_ERROR",
                    "The image model failed to render a panel".to_string(),
                )
            }
            AppError::Image(msg) => {
                tracing::error!("Image error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "IMAGE_ERROR",
                    "Failed to encode the comic strip".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_error_maps_to_bad_request() {
        let err: AppError = LayoutError::InvalidArgument("negative".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unknown_preset_maps_to_not_found() {
        let err: AppError = StyleError::UnknownPreset("noir".to_string()).into();
        assert!(matches!(err, AppError::UnknownPreset(ref n) if n == "noir"));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_panel_count_mismatch_maps_to_unprocessable() {
        let err: AppError = ComposeError::PanelCountMismatch {
            images: 3,
            placements: 4,
        }
        .into();
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_render_error_is_internal() {
        let err = AppError::Render(RenderError::EmptyImage);
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
