//! Letterbox placement of media inside a frame.

pub mod fit;

pub use fit::{FitRect, get_fit_dimensions};
