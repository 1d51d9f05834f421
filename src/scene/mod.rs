//! Editing-state model consumed by the renderer.

/// Color string parsing.
pub mod color;
/// Slide, element, and output types.
pub mod model;
