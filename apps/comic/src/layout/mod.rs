// Panel layout: pure placement computation plus its HTTP handler.
// No I/O in `engine`; safe to call from any thread without synchronization.

pub mod engine;
pub mod handlers;

// Re-export the public API consumed by other modules (style, compose, generation).
pub use engine::{
    canvas_size, Dimension2D, LayoutError, LayoutKind, LayoutRequest, PanelPlacement,
};
