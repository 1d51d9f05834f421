//! Still-image encoding and video recording sinks.

/// System `ffmpeg` recorder.
pub mod ffmpeg;
/// JPEG encoding and alpha flattening.
pub mod image;
/// Recording sink contract and in-memory recorder.
pub mod sink;
