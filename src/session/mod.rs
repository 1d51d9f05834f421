//! Story render orchestration.

/// Cooperative cancellation.
pub mod cancel;
/// Render options and defaults.
pub mod opts;
pub mod renderer;
/// Frame loop driving.
pub mod scheduler;
/// Video render state machine.
pub mod video_job;
