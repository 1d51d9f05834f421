//! Frame-wide post-processing: blur, vignette, grain, and tilt-shift.

pub mod blur;
pub mod grain;
pub mod pipeline;
pub mod tilt_shift;
pub mod vignette;

pub use pipeline::{apply_post_effects, combine_filters, effect_blur_filter, has_post_effects};
