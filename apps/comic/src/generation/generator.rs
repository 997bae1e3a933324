//! Comic generation — orchestrates the full pipeline for one request.
//!
//! Flow: resolve preset → apply overrides → split story → compute layout →
//!       render panels → letter dialogue → compose → write PNG.
//!
//! The layout is computed once, before any panel is rendered, and reused for
//! both rendering sizes and composition.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::compose::{compose, letter_panel, save_png};
use crate::errors::AppError;
use crate::layout::{canvas_size, Dimension2D, LayoutKind, LayoutRequest, PanelPlacement};
use crate::llm_client::LlmClient;
use crate::render::{panel_prompt, PanelRenderer};
use crate::scenes::{split_story, Scene, SceneSource};
use crate::style::{get_preset, ArtStyle, PresetName, StyleConfig};

/// Most panels a single strip may request.
pub const MAX_PANELS: usize = 12;
const DEFAULT_PANELS: usize = 4;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Request body for comic generation. Overrides apply to a copy of the preset.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub story: String,
    #[serde(default = "default_preset")]
    pub preset: String,
    #[serde(default = "default_panel_count")]
    pub panel_count: usize,
    pub layout: Option<LayoutKind>,
    pub panel_size: Option<Dimension2D>,
    pub panel_spacing: Option<u32>,
    pub art_style: Option<ArtStyle>,
    /// Appearance kept consistent across every panel.
    pub character: Option<String>,
}

fn default_preset() -> String {
    PresetName::Cartoon.as_str().to_string()
}

fn default_panel_count() -> usize {
    DEFAULT_PANELS
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub comic_id: Uuid,
    pub path: PathBuf,
    pub style: StyleConfig,
    pub scene_source: SceneSource,
    pub scenes: Vec<Scene>,
    pub placements: Vec<PanelPlacement>,
    pub canvas: Dimension2D,
    pub renderer: String,
    pub created_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full generation pipeline and writes the strip to `output_dir/<comic_id>.png`.
pub async fn generate_comic(
    llm: Option<&LlmClient>,
    renderer: &dyn PanelRenderer,
    output_dir: &Path,
    request: GenerateRequest,
) -> Result<GenerateResponse, AppError> {
    // Step 1: Validate request and resolve style
    if request.story.trim().is_empty() {
        return Err(AppError::Validation("story cannot be empty".to_string()));
    }
    if request.panel_count == 0 || request.panel_count > MAX_PANELS {
        return Err(AppError::Validation(format!(
            "panel_count must be between 1 and {MAX_PANELS}, got {}",
            request.panel_count
        )));
    }
    let style = resolve_style(&request)?;

    // Step 2: Story → scenes
    let (scenes, scene_source) = split_story(&request.story, request.panel_count, llm).await;
    if scenes.is_empty() {
        return Err(AppError::Validation(
            "story did not contain any scenes".to_string(),
        ));
    }
    info!(
        "Split story into {} scenes ({:?}), layout={}",
        scenes.len(),
        scene_source,
        style.layout_kind
    );

    // Step 3: Layout
    let placements = layout_for(&style, scenes.len())?;
    let canvas = canvas_size(&placements)?;

    // Step 4: Render panels, one at a time, at their placement size
    let mut panels: Vec<RgbaImage> = Vec::with_capacity(scenes.len());
    for (i, (scene, placement)) in scenes.iter().zip(&placements).enumerate() {
        let prompt = panel_prompt(
            &scene.description,
            style.art_style,
            request.character.as_deref(),
        );
        let panel = renderer.render(&prompt, placement.size).await?;
        info!(
            "Rendered panel {}/{} via {}",
            i + 1,
            scenes.len(),
            renderer.name()
        );
        panels.push(panel);
    }

    // Step 5: Letter, compose, and persist (CPU-bound)
    let comic_id = Uuid::new_v4();
    let path = output_dir.join(format!("{comic_id}.png"));
    {
        let style = style.clone();
        let scenes = scenes.clone();
        let placements = placements.clone();
        let path = path.clone();
        tokio::task::spawn_blocking(move || {
            assemble_strip(panels, &scenes, &placements, &style, &path)
        })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in compose: {e}")))??;
    }

    info!(
        "Wrote comic {} ({}x{}, {} panels) to {}",
        comic_id,
        canvas.width,
        canvas.height,
        placements.len(),
        path.display()
    );

    Ok(GenerateResponse {
        comic_id,
        path,
        style,
        scene_source,
        scenes,
        placements,
        canvas,
        renderer: renderer.name().to_string(),
        created_at: Utc::now(),
    })
}

/// Preset lookup plus request overrides, validated.
pub(crate) fn resolve_style(request: &GenerateRequest) -> Result<StyleConfig, AppError> {
    let mut style = get_preset(&request.preset)?;
    if let Some(layout) = request.layout {
        style = style.with_layout(layout);
    }
    if let Some(size) = request.panel_size {
        style = style.with_panel_size(size);
    }
    if let Some(spacing) = request.panel_spacing {
        style = style.with_spacing(spacing);
    }
    if let Some(art_style) = request.art_style {
        style = style.with_art_style(art_style);
    }
    style.validate()?;
    Ok(style)
}

pub(crate) fn layout_for(
    style: &StyleConfig,
    panel_count: usize,
) -> Result<Vec<PanelPlacement>, AppError> {
    let request = LayoutRequest {
        panel_count: i64::try_from(panel_count)
            .map_err(|_| AppError::InvalidArgument("too many panels".to_string()))?,
        base_size: style.panel_size,
        spacing: i64::from(style.panel_spacing),
        kind: style.layout_kind,
    };
    Ok(request.compute()?)
}

/// Letters every panel, composes the strip, and writes it to `path`.
fn assemble_strip(
    panels: Vec<RgbaImage>,
    scenes: &[Scene],
    placements: &[PanelPlacement],
    style: &StyleConfig,
    path: &Path,
) -> Result<(), AppError> {
    let lettered = panels
        .into_iter()
        .zip(scenes.iter().zip(placements))
        .map(|(panel, (scene, placement))| {
            letter_panel(panel, placement.size, scene.dialogue.as_deref(), &style.font)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let strip = compose(&lettered, placements, style)?;
    save_png(&strip, path)?;
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
