//! Style catalog — art styles, bubble/font configuration, and named presets.
//!
//! Presets are value templates: `get_preset` returns a fresh `StyleConfig`
//! every call, and the `with_*` builders return modified copies.

pub mod handlers;
pub mod presets;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::{Dimension2D, LayoutKind};

pub use presets::{get_preset, list_presets, PresetName};

/// Largest panel width or height a style may request, in pixels.
pub const MAX_PANEL_EXTENT: u32 = 2048;
/// Largest gutter between panels, in pixels.
pub const MAX_PANEL_SPACING: u32 = 256;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Invalid color '{value}': {reason}")]
    InvalidColor { value: String, reason: String },

    #[error("Invalid style: {0}")]
    Invalid(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Art style
// ────────────────────────────────────────────────────────────────────────────

/// Visual style appended to every panel prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtStyle {
    Manga,
    Western,
    Cartoon,
    Realistic,
}

impl ArtStyle {
    /// Prompt fragment sent to the image model.
    pub fn prompt(&self) -> &'static str {
        match self {
            ArtStyle::Manga => "manga style, black and white, detailed linework",
            ArtStyle::Western => "western comic book style, vibrant colors, bold outlines",
            ArtStyle::Cartoon => "cartoon style, simple shapes, bright colors",
            ArtStyle::Realistic => "realistic style, detailed shading, natural colors",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font / bubble
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BubbleStyle {
    #[default]
    Round,
    Square,
    Thought,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontConfig {
    pub family_name: String,
    pub size_pt: u32,
    pub color: String,
    #[serde(default)]
    pub bubble_style: BubbleStyle,
}

// ────────────────────────────────────────────────────────────────────────────
// Style config
// ────────────────────────────────────────────────────────────────────────────

/// Everything needed to render and lay out one comic. Built once per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleConfig {
    pub art_style: ArtStyle,
    pub layout_kind: LayoutKind,
    pub panel_size: Dimension2D,
    pub panel_spacing: u32,
    pub background_color: String,
    pub border_color: String,
    pub border_width_px: u32,
    pub font: FontConfig,
}

impl StyleConfig {
    pub fn with_layout(mut self, layout_kind: LayoutKind) -> Self {
        self.layout_kind = layout_kind;
        self
    }

    pub fn with_panel_size(mut self, panel_size: Dimension2D) -> Self {
        self.panel_size = panel_size;
        self
    }

    pub fn with_spacing(mut self, panel_spacing: u32) -> Self {
        self.panel_spacing = panel_spacing;
        self
    }

    pub fn with_art_style(mut self, art_style: ArtStyle) -> Self {
        self.art_style = art_style;
        self
    }

    /// Checks panel size and spacing bounds and that every color parses.
    pub fn validate(&self) -> Result<(), StyleError> {
        let Dimension2D { width, height } = self.panel_size;
        if self.panel_size.is_empty() {
            return Err(StyleError::Invalid(format!(
                "panel size must be positive, got {width}x{height}"
            )));
        }
        if width > MAX_PANEL_EXTENT || height > MAX_PANEL_EXTENT {
            return Err(StyleError::Invalid(format!(
                "panel size must be at most {MAX_PANEL_EXTENT}x{MAX_PANEL_EXTENT}, got {width}x{height}"
            )));
        }
        if self.panel_spacing > MAX_PANEL_SPACING {
            return Err(StyleError::Invalid(format!(
                "panel spacing must be at most {MAX_PANEL_SPACING}, got {}",
                self.panel_spacing
            )));
        }
        if self.font.size_pt == 0 {
            return Err(StyleError::Invalid("font size must be positive".to_string()));
        }
        parse_color(&self.background_color)?;
        parse_color(&self.border_color)?;
        parse_color(&self.font.color)?;
        Ok(())
    }
}

/// Parses a CSS color string (`"white"`, `"#ffcc00"`, `"rgb(0,0,0)"`) into RGBA bytes.
pub fn parse_color(value: &str) -> Result<[u8; 4], StyleError> {
    csscolorparser::parse(value)
        .map(|c| c.to_rgba8())
        .map_err(|e| StyleError::InvalidColor {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_and_hex_colors() {
        assert_eq!(parse_color("white").unwrap(), [255, 255, 255, 255]);
        assert_eq!(parse_color("black").unwrap(), [0, 0, 0, 255]);
        assert_eq!(parse_color("#ff0000").unwrap(), [255, 0, 0, 255]);
    }

    #[test]
    fn test_parse_color_rejects_garbage() {
        let err = parse_color("not-a-color").unwrap_err();
        assert!(matches!(err, StyleError::InvalidColor { .. }));
    }

    #[test]
    fn test_art_style_prompts_are_distinct() {
        let prompts = [
            ArtStyle::Manga.prompt(),
            ArtStyle::Western.prompt(),
            ArtStyle::Cartoon.prompt(),
            ArtStyle::Realistic.prompt(),
        ];
        for (i, a) in prompts.iter().enumerate() {
            for b in &prompts[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_bubble_style_defaults_to_round() {
        let json = r#"{"family_name": "Arial", "size_pt": 12, "color": "black"}"#;
        let font: FontConfig = serde_json::from_str(json).unwrap();
        assert_eq!(font.bubble_style, BubbleStyle::Round);
    }

    #[test]
    fn test_validate_rejects_zero_panel_size() {
        let style = get_preset("manga")
            .unwrap()
            .with_panel_size(Dimension2D::new(0, 512));
        assert!(matches!(style.validate(), Err(StyleError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_oversized_panel() {
        for size in [
            Dimension2D::new(4_000_000_000, 4_000_000_000),
            Dimension2D::new(MAX_PANEL_EXTENT + 1, 100),
            Dimension2D::new(100, MAX_PANEL_EXTENT + 1),
        ] {
            let style = get_preset("cartoon").unwrap().with_panel_size(size);
            assert!(matches!(style.validate(), Err(StyleError::Invalid(_))));
        }
    }

    #[test]
    fn test_validate_accepts_largest_panel() {
        let style = get_preset("cartoon")
            .unwrap()
            .with_panel_size(Dimension2D::new(MAX_PANEL_EXTENT, MAX_PANEL_EXTENT))
            .with_spacing(MAX_PANEL_SPACING);
        assert!(style.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_huge_spacing() {
        let style = get_preset("manga").unwrap().with_spacing(u32::MAX);
        assert!(matches!(style.validate(), Err(StyleError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_bad_border_color() {
        let mut style = get_preset("cartoon").unwrap();
        style.border_color = "blurple-ish".to_string();
        assert!(matches!(
            style.validate(),
            Err(StyleError::InvalidColor { .. })
        ));
    }
}
