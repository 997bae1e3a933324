//! Axum route handlers for the style catalog.

use axum::{extract::Path, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::style::{get_preset, list_presets, PresetName, StyleConfig};

#[derive(Debug, Serialize)]
pub struct PresetListResponse {
    pub presets: Vec<PresetName>,
}

/// GET /api/v1/presets
pub async fn handle_list_presets() -> Json<PresetListResponse> {
    Json(PresetListResponse {
        presets: list_presets(),
    })
}

/// GET /api/v1/presets/:name
pub async fn handle_get_preset(Path(name): Path<String>) -> Result<Json<StyleConfig>, AppError> {
    Ok(Json(get_preset(&name)?))
}
