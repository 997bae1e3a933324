//! Panel placement engine — maps (panel count, base size, spacing, layout kind)
//! to one placement per panel, in panel order.
//!
//! Pure and deterministic: no I/O, no shared state. Output for a given
//! `LayoutRequest` never changes, so callers may compute it once and reuse it
//! across rendering retries.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Maximum panels per grid row.
pub const MAX_GRID_COLUMNS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("Invalid layout argument: {0}")]
    InvalidArgument(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Geometry
// ────────────────────────────────────────────────────────────────────────────

/// Pixel extents of a panel or canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension2D {
    pub width: u32,
    pub height: u32,
}

impl Dimension2D {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Top-left anchor of a panel, measured from the strip origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position2D {
    pub x: i64,
    pub y: i64,
}

impl Position2D {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Where panel `i` lands in the strip. `placements[i]` always belongs to panel `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PanelPlacement {
    pub position: Position2D,
    pub size: Dimension2D,
}

impl PanelPlacement {
    pub const fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            position: Position2D::new(x, y),
            size: Dimension2D::new(width, height),
        }
    }

    /// Right edge (exclusive); `None` if it does not fit in `i64`.
    pub fn right(&self) -> Option<i64> {
        self.position.x.checked_add(i64::from(self.size.width))
    }

    /// Bottom edge (exclusive); `None` if it does not fit in `i64`.
    pub fn bottom(&self) -> Option<i64> {
        self.position.y.checked_add(i64::from(self.size.height))
    }

    pub fn overlaps(&self, other: &PanelPlacement) -> bool {
        // i128 keeps edges exact for any i64 position.
        let edges = |p: &PanelPlacement| {
            let (x, y) = (i128::from(p.position.x), i128::from(p.position.y));
            (x, y, x + i128::from(p.size.width), y + i128::from(p.size.height))
        };
        let (ax, ay, ar, ab) = edges(self);
        let (bx, by, br, bb) = edges(other);
        ax < br && bx < ar && ay < bb && by < ab
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Layout kind
// ────────────────────────────────────────────────────────────────────────────

/// Placement algorithm selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    /// Row-major fill, at most three columns, uniform cell size.
    #[default]
    Grid,
    /// Provisional: currently places panels exactly like `Grid`.
    Diagonal,
    /// One to three panels get bespoke sizing; more fall back to `Grid`.
    Dynamic,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 3] = [LayoutKind::Grid, LayoutKind::Diagonal, LayoutKind::Dynamic];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutKind::Grid => "grid",
            LayoutKind::Diagonal => "diagonal",
            LayoutKind::Dynamic => "dynamic",
        }
    }
}

impl std::fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LayoutKind {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(LayoutKind::Grid),
            "diagonal" => Ok(LayoutKind::Diagonal),
            "dynamic" => Ok(LayoutKind::Dynamic),
            other => Err(LayoutError::InvalidArgument(format!(
                "unknown layout kind '{other}'"
            ))),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Request key
// ────────────────────────────────────────────────────────────────────────────

/// The full input tuple of `compute_layout`. Hashable so callers can cache results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutRequest {
    pub panel_count: i64,
    pub base_size: Dimension2D,
    pub spacing: i64,
    #[serde(default)]
    pub kind: LayoutKind,
}

impl LayoutRequest {
    pub fn compute(&self) -> Result<Vec<PanelPlacement>, LayoutError> {
        compute_layout(self.panel_count, self.base_size, self.spacing, self.kind)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry point
// ────────────────────────────────────────────────────────────────────────────

/// Computes one placement per panel, in panel order.
///
/// Arguments are validated before anything else, so a zero `panel_count` with
/// a valid base size and spacing yields an empty layout.
///
/// Errors with `InvalidArgument` for a negative count or spacing, a zero-area
/// base size, a Dynamic three-panel layout whose half-height would be zero,
/// or coordinates that overflow `i64`.
pub fn compute_layout(
    panel_count: i64,
    base_size: Dimension2D,
    spacing: i64,
    kind: LayoutKind,
) -> Result<Vec<PanelPlacement>, LayoutError> {
    if panel_count < 0 {
        return Err(LayoutError::InvalidArgument(format!(
            "panel_count must be non-negative, got {panel_count}"
        )));
    }
    if base_size.is_empty() {
        return Err(LayoutError::InvalidArgument(format!(
            "base size must have positive width and height, got {}x{}",
            base_size.width, base_size.height
        )));
    }
    if spacing < 0 {
        return Err(LayoutError::InvalidArgument(format!(
            "spacing must be non-negative, got {spacing}"
        )));
    }

    let count = usize::try_from(panel_count).map_err(|_| {
        LayoutError::InvalidArgument(format!("panel_count {panel_count} is too large"))
    })?;
    if count == 0 {
        return Ok(Vec::new());
    }

    match kind {
        LayoutKind::Grid => grid_layout(count, base_size, spacing),
        LayoutKind::Diagonal => {
            debug!(panels = count, "diagonal layout requested; placing as grid");
            grid_layout(count, base_size, spacing)
        }
        LayoutKind::Dynamic => dynamic_layout(count, base_size, spacing),
    }
}

/// Returns `(columns, rows)` of the grid used for `panel_count` panels.
pub fn grid_dimensions(panel_count: usize) -> (usize, usize) {
    if panel_count == 0 {
        return (0, 0);
    }
    let columns = panel_count.min(MAX_GRID_COLUMNS);
    (columns, panel_count.div_ceil(columns))
}

/// Bounding box enclosing every placement; `0x0` for an empty layout.
///
/// Errors with `InvalidArgument` when the box does not fit in `u32` pixels.
pub fn canvas_size(placements: &[PanelPlacement]) -> Result<Dimension2D, LayoutError> {
    let mut width = 0i64;
    let mut height = 0i64;
    for p in placements {
        width = width.max(p.right().ok_or_else(overflow)?);
        height = height.max(p.bottom().ok_or_else(overflow)?);
    }
    Ok(Dimension2D::new(extent(width)?, extent(height)?))
}

// ────────────────────────────────────────────────────────────────────────────
// Algorithms
// ────────────────────────────────────────────────────────────────────────────

fn grid_layout(
    count: usize,
    base_size: Dimension2D,
    spacing: i64,
) -> Result<Vec<PanelPlacement>, LayoutError> {
    let (columns, _) = grid_dimensions(count);
    let step_x = checked_sum(base_size.width, spacing)?;
    let step_y = checked_sum(base_size.height, spacing)?;

    (0..count)
        .map(|i| -> Result<PanelPlacement, LayoutError> {
            let row = i / columns;
            let col = i % columns;
            let x = offset(col, step_x)?;
            let y = offset(row, step_y)?;
            bounded(PanelPlacement {
                position: Position2D::new(x, y),
                size: base_size,
            })
        })
        .collect()
}

fn dynamic_layout(
    count: usize,
    base_size: Dimension2D,
    spacing: i64,
) -> Result<Vec<PanelPlacement>, LayoutError> {
    let Dimension2D { width, height } = base_size;
    let right_x = checked_sum(width, spacing)?;

    match count {
        1 => Ok(vec![PanelPlacement::new(0, 0, width, height)]),
        2 => Ok(vec![
            PanelPlacement::new(0, 0, width, height),
            bounded(PanelPlacement::new(right_x, 0, width, height))?,
        ]),
        3 => {
            let half = height / 2;
            if half == 0 {
                return Err(LayoutError::InvalidArgument(format!(
                    "base height {height} is too small to stack two panels"
                )));
            }
            let lower_y = checked_sum(half, spacing)?;
            Ok(vec![
                PanelPlacement::new(0, 0, width, height),
                bounded(PanelPlacement::new(right_x, 0, width, half))?,
                bounded(PanelPlacement::new(right_x, lower_y, width, half))?,
            ])
        }
        _ => grid_layout(count, base_size, spacing),
    }
}

fn overflow() -> LayoutError {
    LayoutError::InvalidArgument("layout extent overflows".to_string())
}

fn offset(index: usize, step: i64) -> Result<i64, LayoutError> {
    i64::try_from(index)
        .ok()
        .and_then(|i| i.checked_mul(step))
        .ok_or_else(overflow)
}

fn checked_sum(length: u32, spacing: i64) -> Result<i64, LayoutError> {
    i64::from(length).checked_add(spacing).ok_or_else(overflow)
}

/// Rejects a placement whose far edges leave the `i64` range.
fn bounded(placement: PanelPlacement) -> Result<PanelPlacement, LayoutError> {
    placement.right().ok_or_else(overflow)?;
    placement.bottom().ok_or_else(overflow)?;
    Ok(placement)
}

fn extent(value: i64) -> Result<u32, LayoutError> {
    u32::try_from(value).map_err(|_| {
        LayoutError::InvalidArgument(format!("canvas extent {value} exceeds u32 pixels"))
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
