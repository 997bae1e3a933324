//! Axum route handler for standalone layout computation.

use axum::Json;
use serde::Serialize;

use crate::errors::AppError;
use crate::layout::{canvas_size, Dimension2D, LayoutRequest, PanelPlacement};

/// Largest layout the endpoint computes in one request.
pub const MAX_LAYOUT_PANELS: i64 = 1024;

#[derive(Debug, Serialize)]
pub struct LayoutResponse {
    pub placements: Vec<PanelPlacement>,
    pub canvas: Dimension2D,
}

/// POST /api/v1/layout
///
/// Pure computation; no panels are rendered.
pub async fn handle_compute_layout(
    Json(request): Json<LayoutRequest>,
) -> Result<Json<LayoutResponse>, AppError> {
    if request.panel_count > MAX_LAYOUT_PANELS {
        return Err(AppError::InvalidArgument(format!(
            "panel_count must be at most {MAX_LAYOUT_PANELS}, got {}",
            request.panel_count
        )));
    }
    let placements = request.compute()?;
    let canvas = canvas_size(&placements)?;
    Ok(Json(LayoutResponse { placements, canvas }))
}
