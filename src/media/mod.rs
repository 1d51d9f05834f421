//! Media loading and decoding.

/// Still image and SVG decoding.
pub mod decode;
/// `ffmpeg`-backed video playback.
pub mod ffmpeg;
/// Locator resolution.
pub mod loader;
/// Video playback abstraction.
pub mod video;
