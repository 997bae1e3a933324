//! Named style presets: "manga", "western", "cartoon".

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::layout::{Dimension2D, LayoutKind};
use crate::style::{ArtStyle, BubbleStyle, FontConfig, StyleConfig, StyleError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetName {
    Manga,
    Western,
    Cartoon,
}

impl PresetName {
    pub const ALL: [PresetName; 3] = [PresetName::Manga, PresetName::Western, PresetName::Cartoon];

    pub fn as_str(&self) -> &'static str {
        match self {
            PresetName::Manga => "manga",
            PresetName::Western => "western",
            PresetName::Cartoon => "cartoon",
        }
    }

    /// Builds a fresh copy of this preset's style.
    pub fn style(&self) -> StyleConfig {
        match self {
            PresetName::Manga => StyleConfig {
                art_style: ArtStyle::Manga,
                layout_kind: LayoutKind::Grid,
                panel_size: Dimension2D::new(512, 512),
                panel_spacing: 10,
                background_color: "white".to_string(),
                border_color: "black".to_string(),
                border_width_px: 2,
                font: FontConfig {
                    family_name: "CC Wild Words".to_string(),
                    size_pt: 14,
                    color: "black".to_string(),
                    bubble_style: BubbleStyle::Round,
                },
            },
            PresetName::Western => StyleConfig {
                art_style: ArtStyle::Western,
                layout_kind: LayoutKind::Dynamic,
                panel_size: Dimension2D::new(600, 400),
                panel_spacing: 15,
                background_color: "white".to_string(),
                border_color: "black".to_string(),
                border_width_px: 3,
                font: FontConfig {
                    family_name: "Comic Sans MS".to_string(),
                    size_pt: 16,
                    color: "black".to_string(),
                    bubble_style: BubbleStyle::Square,
                },
            },
            PresetName::Cartoon => StyleConfig {
                art_style: ArtStyle::Cartoon,
                layout_kind: LayoutKind::Grid,
                panel_size: Dimension2D::new(400, 400),
                panel_spacing: 12,
                background_color: "white".to_string(),
                border_color: "black".to_string(),
                border_width_px: 2,
                font: FontConfig {
                    family_name: "Arial Rounded MT Bold".to_string(),
                    size_pt: 14,
                    color: "black".to_string(),
                    bubble_style: BubbleStyle::Round,
                },
            },
        }
    }
}

impl std::fmt::Display for PresetName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetName {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manga" => Ok(PresetName::Manga),
            "western" => Ok(PresetName::Western),
            "cartoon" => Ok(PresetName::Cartoon),
            _ => Err(StyleError::UnknownPreset(s.to_string())),
        }
    }
}

/// All preset names, in catalog order.
pub fn list_presets() -> Vec<PresetName> {
    PresetName::ALL.to_vec()
}

/// Looks up a preset by name (case-insensitive).
pub fn get_preset(name: &str) -> Result<StyleConfig, StyleError> {
    name.parse::<PresetName>().map(|preset| preset.style())
}
