//! Panel composer — pastes rendered panels onto one strip canvas at the
//! placements computed by the layout engine.
//!
//! CPU-bound: callers on the async runtime run `compose` inside
//! `tokio::task::spawn_blocking`.

pub mod bubble;
pub mod canvas;

use std::path::Path;

use embedded_graphics::{
    prelude::*,
    primitives::{PrimitiveStyleBuilder, Rectangle, StrokeAlignment},
};
use image::{imageops, imageops::FilterType, ImageFormat, Rgba, RgbaImage};
use thiserror::Error;

use crate::compose::canvas::{rgb, CanvasTarget};
use crate::layout::{canvas_size, Dimension2D, LayoutError, PanelPlacement};
use crate::style::{parse_color, FontConfig, StyleConfig, StyleError};

pub use bubble::{draw_speech_bubble, DEFAULT_ANCHOR};

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("Received {images} panel images for {placements} placements")]
    PanelCountMismatch { images: usize, placements: usize },

    #[error("Layout has no panels to compose")]
    EmptyCanvas,

    #[error("Placement at ({x}, {y}) is outside the drawable range")]
    OutOfRange { x: i64, y: i64 },

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("Style error: {0}")]
    Style(#[from] StyleError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Composes `panels` onto a background-filled canvas sized to the layout's bounding box.
///
/// Panel `i` is resized to `placements[i].size` when needed, pasted at
/// `placements[i].position` in input order, then framed with the style border.
/// Nothing is drawn when the counts disagree.
pub fn compose(
    panels: &[RgbaImage],
    placements: &[PanelPlacement],
    style: &StyleConfig,
) -> Result<RgbaImage, ComposeError> {
    if panels.len() != placements.len() {
        return Err(ComposeError::PanelCountMismatch {
            images: panels.len(),
            placements: placements.len(),
        });
    }
    let size = canvas_size(placements)?;
    if size.is_empty() {
        return Err(ComposeError::EmptyCanvas);
    }

    let background = parse_color(&style.background_color)?;
    let border = rgb(parse_color(&style.border_color)?);
    let mut strip = RgbaImage::from_pixel(size.width, size.height, Rgba(background));

    for (panel, placement) in panels.iter().zip(placements) {
        let (x, y) = (placement.position.x, placement.position.y);
        if fits(panel, placement.size) {
            imageops::replace(&mut strip, panel, x, y);
        } else {
            imageops::replace(&mut strip, &resize_to(panel, placement.size), x, y);
        }
    }

    if style.border_width_px > 0 {
        let frame_style = PrimitiveStyleBuilder::new()
            .stroke_color(border)
            .stroke_width(style.border_width_px)
            .stroke_alignment(StrokeAlignment::Inside)
            .build();
        let mut target = CanvasTarget::new(&mut strip);
        for placement in placements {
            let (x, y) = (placement.position.x, placement.position.y);
            let top_left = match (i32::try_from(x), i32::try_from(y)) {
                (Ok(x), Ok(y)) => Point::new(x, y),
                _ => return Err(ComposeError::OutOfRange { x, y }),
            };
            let frame = Rectangle::new(
                top_left,
                Size::new(placement.size.width, placement.size.height),
            );
            if let Err(never) = frame.into_styled(frame_style).draw(&mut target) {
                match never {}
            }
        }
    }

    Ok(strip)
}

/// Fits a rendered panel to its placement and letters its dialogue, if any.
pub fn letter_panel(
    panel: RgbaImage,
    size: Dimension2D,
    dialogue: Option<&str>,
    font: &FontConfig,
) -> Result<RgbaImage, ComposeError> {
    let mut panel = if fits(&panel, size) {
        panel
    } else {
        resize_to(&panel, size)
    };
    if let Some(text) = dialogue {
        draw_speech_bubble(&mut panel, text, DEFAULT_ANCHOR, font)?;
    }
    Ok(panel)
}

fn fits(panel: &RgbaImage, size: Dimension2D) -> bool {
    panel.dimensions() == (size.width, size.height)
}

fn resize_to(panel: &RgbaImage, size: Dimension2D) -> RgbaImage {
    imageops::resize(panel, size.width, size.height, FilterType::Lanczos3)
}

/// Writes the strip as PNG, creating missing parent directories.
pub fn save_png(strip: &RgbaImage, path: &Path) -> Result<(), ComposeError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    strip.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::engine::compute_layout;
    use crate::layout::LayoutKind;
    use crate::style::get_preset;

    const RED: Rgba<u8> = Rgba([200, 30, 30, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn solid(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, RED)
    }

    fn test_style() -> StyleConfig {
        get_preset("cartoon")
            .unwrap()
            .with_panel_size(Dimension2D::new(40, 40))
            .with_spacing(10)
    }

    #[test]
    fn test_mismatched_counts_fail() {
        let placements = compute_layout(4, Dimension2D::new(40, 40), 10, LayoutKind::Grid).unwrap();
        let panels = vec![solid(40, 40), solid(40, 40), solid(40, 40)];
        let err = compose(&panels, &placements, &test_style()).unwrap_err();
        assert!(matches!(
            err,
            ComposeError::PanelCountMismatch {
                images: 3,
                placements: 4
            }
        ));
    }

    #[test]
    fn test_empty_layout_fails() {
        let err = compose(&[], &[], &test_style()).unwrap_err();
        assert!(matches!(err, ComposeError::EmptyCanvas));
    }

    #[test]
    fn test_canvas_is_layout_bounding_box() {
        let placements = compute_layout(4, Dimension2D::new(40, 40), 10, LayoutKind::Grid).unwrap();
        let panels: Vec<RgbaImage> = (0..4).map(|_| solid(40, 40)).collect();
        let strip = compose(&panels, &placements, &test_style()).unwrap();
        assert_eq!(strip.dimensions(), (140, 90));
    }

    #[test]
    fn test_panels_pasted_with_border_and_gutter() {
        let placements = compute_layout(2, Dimension2D::new(40, 40), 10, LayoutKind::Grid).unwrap();
        let panels = vec![solid(40, 40), solid(40, 40)];
        let strip = compose(&panels, &placements, &test_style()).unwrap();

        // Panel interior, border pixel, and gutter background.
        assert_eq!(strip.get_pixel(20, 20), &RED);
        assert_eq!(strip.get_pixel(0, 0), &BLACK);
        assert_eq!(strip.get_pixel(45, 20), &WHITE);
        assert_eq!(strip.get_pixel(70, 20), &RED);
    }

    #[test]
    fn test_panels_resized_to_placement() {
        let placements = compute_layout(3, Dimension2D::new(40, 40), 10, LayoutKind::Dynamic).unwrap();
        let panels = vec![solid(80, 80), solid(80, 80), solid(80, 80)];
        let strip = compose(&panels, &placements, &test_style()).unwrap();

        assert_eq!(strip.dimensions(), (90, 50));
        // Second panel is 40x20 at (50, 0); the gutter below it is background.
        assert_eq!(strip.get_pixel(70, 10), &RED);
        assert_eq!(strip.get_pixel(70, 25), &WHITE);
        assert_eq!(strip.get_pixel(70, 35), &RED);
    }

    #[test]
    fn test_zero_border_leaves_edges_unframed() {
        let mut style = test_style();
        style.border_width_px = 0;
        let placements = compute_layout(1, Dimension2D::new(40, 40), 10, LayoutKind::Grid).unwrap();
        let strip = compose(&[solid(40, 40)], &placements, &style).unwrap();
        assert_eq!(strip.get_pixel(0, 0), &RED);
    }

    #[test]
    fn test_letter_panel_resizes_and_draws_bubble() {
        let font = test_style().font;
        let panel = letter_panel(solid(400, 400), Dimension2D::new(200, 100), Some("Hi!"), &font)
            .unwrap();
        assert_eq!(panel.dimensions(), (200, 100));
        assert_eq!(panel.get_pixel(45, 45), &WHITE);
        assert_eq!(panel.get_pixel(150, 90), &RED);
    }

    #[test]
    fn test_letter_panel_without_dialogue_only_fits() {
        let font = test_style().font;
        let panel = letter_panel(solid(40, 40), Dimension2D::new(40, 40), None, &font).unwrap();
        assert_eq!(panel, solid(40, 40));
    }

    #[test]
    fn test_save_png_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("strip.png");
        save_png(&solid(8, 8), &path).unwrap();

        let reloaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(reloaded.dimensions(), (8, 8));
        assert_eq!(reloaded.get_pixel(3, 3), &RED);
    }
}
