//! Speech bubbles — dialogue text wrapped into a bubble drawn over a panel.
//!
//! Text is set in a monospace bitmap font picked from the configured point
//! size; the configured family name is not rasterized.

use std::convert::Infallible;

use embedded_graphics::{
    mono_font::{
        ascii::{FONT_10X20, FONT_6X10, FONT_8X13, FONT_9X15},
        MonoFont, MonoTextStyle,
    },
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Circle, Ellipse, PrimitiveStyleBuilder, Rectangle, RoundedRectangle},
    text::{Baseline, Text},
};
use image::RgbaImage;

use crate::compose::canvas::{rgb, CanvasTarget};
use crate::style::{parse_color, BubbleStyle, FontConfig, StyleError};

/// Space between the text block and the bubble outline.
pub const BUBBLE_PADDING: i32 = 10;
/// Default text origin inside a panel.
pub const DEFAULT_ANCHOR: Point = Point::new(50, 50);

const OUTLINE_WIDTH: u32 = 2;
const CORNER_RADIUS: u32 = 12;

/// Resolved placement of a bubble and its wrapped text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BubbleGeometry {
    /// Outer box of the bubble (text block plus padding).
    pub bounds: Rectangle,
    pub lines: Vec<String>,
    pub text_origin: Point,
    pub line_height: u32,
}

/// Picks the bitmap font closest to the requested point size.
pub fn font_for_size(size_pt: u32) -> &'static MonoFont<'static> {
    match size_pt {
        0..=10 => &FONT_6X10,
        11..=14 => &FONT_8X13,
        15..=18 => &FONT_9X15,
        _ => &FONT_10X20,
    }
}

/// Greedy word wrap at `max_chars` columns. Words longer than a line are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        if word.is_empty() {
            continue;
        }

        let current_len = current.chars().count();
        if current_len > 0 && current_len + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Measures the bubble for `text` anchored at `anchor` on a panel `panel_width` wide.
///
/// The text block may use the panel width minus the anchor margin on both
/// sides. Returns `None` for blank dialogue.
pub fn layout_bubble(
    text: &str,
    anchor: Point,
    font: &MonoFont<'_>,
    panel_width: u32,
) -> Option<BubbleGeometry> {
    let char_width = font.character_size.width + font.character_spacing;
    let line_height = font.character_size.height;
    let available = i64::from(panel_width) - 2 * i64::from(anchor.x.max(0));
    let max_chars = usize::try_from(available / i64::from(char_width.max(1)))
        .unwrap_or(0)
        .max(1);

    let lines = wrap_text(text, max_chars);
    let longest = lines.iter().map(|l| l.chars().count()).max()?;

    let text_width = u32::try_from(longest).unwrap_or(u32::MAX).saturating_mul(char_width);
    let text_height = u32::try_from(lines.len())
        .unwrap_or(u32::MAX)
        .saturating_mul(line_height);
    let padding = BUBBLE_PADDING as u32;

    Some(BubbleGeometry {
        bounds: Rectangle::new(
            anchor - Point::new(BUBBLE_PADDING, BUBBLE_PADDING),
            Size::new(text_width + 2 * padding, text_height + 2 * padding),
        ),
        lines,
        text_origin: anchor,
        line_height,
    })
}

/// Draws `text` in a bubble on `image`. Blank text leaves the image untouched.
pub fn draw_speech_bubble(
    image: &mut RgbaImage,
    text: &str,
    anchor: Point,
    font: &FontConfig,
) -> Result<(), StyleError> {
    let mono = font_for_size(font.size_pt);
    let Some(geometry) = layout_bubble(text, anchor, mono, image.width()) else {
        return Ok(());
    };
    let ink = rgb(parse_color(&font.color)?);

    let mut target = CanvasTarget::new(image);
    if let Err(never) = paint(&mut target, &geometry, mono, ink, font.bubble_style) {
        match never {}
    }
    Ok(())
}

fn paint(
    target: &mut CanvasTarget<'_>,
    geometry: &BubbleGeometry,
    font: &MonoFont<'_>,
    ink: Rgb888,
    bubble_style: BubbleStyle,
) -> Result<(), Infallible> {
    let shape_style = PrimitiveStyleBuilder::new()
        .fill_color(Rgb888::WHITE)
        .stroke_color(ink)
        .stroke_width(OUTLINE_WIDTH)
        .build();
    let bounds = geometry.bounds;

    match bubble_style {
        BubbleStyle::Square => {
            bounds.into_styled(shape_style).draw(target)?;
        }
        BubbleStyle::Round => {
            let radius = CORNER_RADIUS.min(bounds.size.height / 2);
            RoundedRectangle::with_equal_corners(bounds, Size::new(radius, radius))
                .into_styled(shape_style)
                .draw(target)?;
        }
        BubbleStyle::Thought => {
            // Grow the box so its corners stay inside the ellipse.
            let grow = Size::new(bounds.size.width / 2, bounds.size.height / 2);
            let cloud = Rectangle::new(
                bounds.top_left - Point::new(grow.width as i32 / 2, grow.height as i32 / 2),
                bounds.size + grow,
            );
            Ellipse::new(cloud.top_left, cloud.size)
                .into_styled(shape_style)
                .draw(target)?;

            let tail = cloud.top_left
                + Point::new(cloud.size.width as i32 / 4, cloud.size.height as i32);
            Circle::new(tail, 10).into_styled(shape_style).draw(target)?;
            Circle::new(tail + Point::new(-10, 12), 6)
                .into_styled(shape_style)
                .draw(target)?;
        }
    }

    let text_style = MonoTextStyle::new(font, ink);
    let mut origin = geometry.text_origin;
    for line in &geometry.lines {
        Text::with_baseline(line, origin, text_style, Baseline::Top).draw(target)?;
        origin.y += geometry.line_height as i32;
    }
    Ok(())
}
