use std::sync::Arc;

use crate::foundation::core::{Canvas, Rgba8Premul};
use crate::foundation::error::{StoryError, StoryResult};
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};

/// An owned premultiplied RGBA8 drawing surface.
///
/// A render invocation allocates its surfaces, draws into them, and drops them at the end; surfaces
/// are never shared between concurrent renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Allocate a transparent surface.
    pub fn new(width: u32, height: u32) -> StoryResult<Self> {
        let canvas = Canvas::new(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; canvas.byte_len()],
        })
    }

    /// Allocate a transparent surface matching `canvas`.
    pub fn for_canvas(canvas: Canvas) -> StoryResult<Self> {
        Self::new(canvas.width, canvas.height)
    }

    /// Wrap premultiplied RGBA8 bytes.
    pub fn from_premul(width: u32, height: u32, data: Vec<u8>) -> StoryResult<Self> {
        let canvas = Canvas::new(width, height)?;
        if data.len() != canvas.byte_len() {
            return Err(StoryError::evaluation(format!(
                "surface data is {} bytes, expected {} for {width}x{height}",
                data.len(),
                canvas.byte_len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wrap straight-alpha RGBA8 bytes, premultiplying them.
    pub fn from_straight_rgba8(width: u32, height: u32, mut data: Vec<u8>) -> StoryResult<Self> {
        premultiply_rgba8_in_place(&mut data);
        Self::from_premul(width, height, data)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions as a canvas.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Premultiplied bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable premultiplied bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume into premultiplied bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Premultiplied pixel at `(x, y)`, or `None` out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Overwrite every pixel with `color`.
    pub fn fill(&mut self, color: Rgba8Premul) {
        let px = color.to_array();
        for d in self.data.chunks_exact_mut(4) {
            d.copy_from_slice(&px);
        }
    }

    /// Make every pixel transparent.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Straight-alpha copy of the pixels.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }

    /// Check that `other` has the same dimensions.
    pub(crate) fn ensure_same_size(&self, other: &Surface, what: &str) -> StoryResult<()> {
        if self.width != other.width || self.height != other.height {
            return Err(StoryError::evaluation(format!(
                "{what}: surface size mismatch {}x{} vs {}x{}",
                self.width, self.height, other.width, other.height
            )));
        }
        Ok(())
    }

    pub(crate) fn to_pixmap(&self) -> StoryResult<vello_cpu::Pixmap> {
        pixmap_from_premul_bytes(&self.data, self.width, self.height)
    }

    /// Build an image paint sampling this surface.
    pub(crate) fn to_image_paint(&self) -> StoryResult<vello_cpu::Image> {
        Ok(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(self.to_pixmap()?)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        })
    }

    pub(crate) fn from_pixmap(pixmap: &vello_cpu::Pixmap) -> StoryResult<Self> {
        Self::from_premul(
            u32::from(pixmap.width()),
            u32::from(pixmap.height()),
            pixmap.data_as_u8_slice().to_vec(),
        )
    }
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> StoryResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| StoryError::evaluation("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| StoryError::evaluation("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(StoryError::evaluation("pixmap byte len mismatch"));
    }
    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity((width as usize) * (height as usize));
    for px in bytes.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
