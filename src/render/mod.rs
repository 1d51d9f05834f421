//! CPU rendering: surfaces, compositing, and the per-layer renderers.

pub mod composer;
/// Porter-Duff and separable blend kernels.
pub mod composite;
pub mod drawing;
/// Reusable vector rasterizer.
pub mod raster;
pub mod sticker;
/// Premultiplied RGBA8 pixel buffers.
pub mod surface;
pub mod text;
pub mod thumbnail;
