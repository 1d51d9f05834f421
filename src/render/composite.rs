use crate::foundation::error::{StoryError, StoryResult};
use crate::foundation::math::{add_sat_u8, mul_div255_u8, opacity_to_u8};
use crate::render::surface::Surface;

pub type PremulRgba8 = [u8; 4];

/// How a source layer combines with the destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositeOp {
    /// Porter-Duff source-over.
    SourceOver,
    /// Keep the destination where the source is absent.
    DestinationOut,
    /// Keep the destination where the source is present.
    DestinationIn,
    /// Separable multiply blend, then source-over.
    Multiply,
    /// Separable overlay blend, then source-over.
    Overlay,
}

pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let op = opacity_to_u8(opacity);
    if op == 0 || src[3] == 0 {
        return dst;
    }

    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

pub fn destination_out(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let sa = mul_div255_u8(u16::from(src[3]), opacity_to_u8(opacity));
    let keep = 255u16 - u16::from(sa);
    dst.map(|c| mul_div255_u8(u16::from(c), keep))
}

pub fn destination_in(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let sa = u16::from(mul_div255_u8(u16::from(src[3]), opacity_to_u8(opacity)));
    dst.map(|c| mul_div255_u8(u16::from(c), sa))
}

/// Separable blend in premultiplied space:
/// `co = cs*(1-ab) + cd*(1-as) + as*ab*B(cb, cs)`.
fn blend_separable(
    dst: PremulRgba8,
    src: PremulRgba8,
    opacity: f32,
    blend: impl Fn(f32, f32) -> f32,
) -> PremulRgba8 {
    let op = opacity.clamp(0.0, 1.0);
    if op <= 0.0 || src[3] == 0 {
        return dst;
    }
    let sa = f32::from(src[3]) / 255.0 * op;
    let da = f32::from(dst[3]) / 255.0;

    let mut out = [0u8; 4];
    for i in 0..3 {
        let sc = f32::from(src[i]) / 255.0 * op;
        let dc = f32::from(dst[i]) / 255.0;
        let s_straight = if sa > 0.0 { (sc / sa).min(1.0) } else { 0.0 };
        let d_straight = if da > 0.0 { (dc / da).min(1.0) } else { 0.0 };
        let mixed = sc * (1.0 - da) + dc * (1.0 - sa) + sa * da * blend(d_straight, s_straight);
        out[i] = unit_to_u8(mixed);
    }
    out[3] = unit_to_u8(sa + da - sa * da);
    out
}

pub fn multiply(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    blend_separable(dst, src, opacity, |d, s| d * s)
}

pub fn overlay(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    blend_separable(dst, src, opacity, |d, s| {
        if d <= 0.5 {
            2.0 * s * d
        } else {
            1.0 - 2.0 * (1.0 - s) * (1.0 - d)
        }
    })
}

fn unit_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Composite `src` onto `dst` with `op`, scaling the source by `opacity`.
pub fn composite_in_place(
    dst: &mut [u8],
    src: &[u8],
    opacity: f32,
    op: CompositeOp,
) -> StoryResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(StoryError::evaluation(
            "composite_in_place expects equal-length rgba8 buffers",
        ));
    }
    let f: fn(PremulRgba8, PremulRgba8, f32) -> PremulRgba8 = match op {
        CompositeOp::SourceOver => over,
        CompositeOp::DestinationOut => destination_out,
        CompositeOp::DestinationIn => destination_in,
        CompositeOp::Multiply => multiply,
        CompositeOp::Overlay => overlay,
    };
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = f([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Surface-level wrapper over [`composite_in_place`].
pub fn composite_surface(
    dst: &mut Surface,
    src: &Surface,
    opacity: f32,
    op: CompositeOp,
) -> StoryResult<()> {
    dst.ensure_same_size(src, "composite")?;
    composite_in_place(dst.data_mut(), src.data(), opacity, op)
}

/// Per-pixel linear mix `a*(1-m) + b*m`, `m` taken from `mask` in `[0, 1]`.
pub fn mix_by_mask_in_place(dst: &mut [u8], other: &[u8], mask: &[f32]) -> StoryResult<()> {
    if dst.len() != other.len() || dst.len() != mask.len() * 4 {
        return Err(StoryError::evaluation(
            "mix_by_mask_in_place expects matching buffers",
        ));
    }
    for ((d, o), &m) in dst
        .chunks_exact_mut(4)
        .zip(other.chunks_exact(4))
        .zip(mask.iter())
    {
        let t = opacity_to_u8(m);
        let it = 255u16 - t;
        for i in 0..4 {
            d[i] = add_sat_u8(
                mul_div255_u8(u16::from(d[i]), it),
                mul_div255_u8(u16::from(o[i]), t),
            );
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
