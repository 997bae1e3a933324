//! Axum route handlers for the Comic API.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::generator::{generate_comic, GenerateRequest, GenerateResponse};
use crate::state::AppState;

/// POST /api/v1/comics
///
/// Full pipeline: story split → layout → render → letter → compose → write PNG.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let response = generate_comic(
        state.llm.as_ref(),
        state.renderer.as_ref(),
        &state.config.output_dir,
        request,
    )
    .await?;

    Ok(Json(response))
}

/// GET /api/v1/comics/:id
///
/// Returns the composed strip as `image/png`.
pub async fn handle_get_comic(
    State(state): State<AppState>,
    Path(comic_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let path = state.config.output_dir.join(format!("{comic_id}.png"));
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!("Comic {comic_id} not found")));
        }
        Err(e) => return Err(AppError::Internal(e.into())),
    };

    Ok(([(header::CONTENT_TYPE, "image/png")], Bytes::from(bytes)))
}
