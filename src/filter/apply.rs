use crate::effects::blur::gaussian_blur_surface;
use crate::filter::parse::{FilterFn, FilterOp, parse_filter};
use crate::foundation::error::StoryResult;
use crate::render::surface::Surface;

type Mat3 = [[f32; 3]; 3];

/// Apply a CSS-style filter descriptor to `surface`.
///
/// Unknown functions are ignored, the same way [`crate::interpolate_filter`] drops them.
#[tracing::instrument(skip(surface), fields(w = surface.width(), h = surface.height()))]
pub fn apply_filter(surface: &mut Surface, descriptor: &str) -> StoryResult<()> {
    let ops = parse_filter(descriptor);
    apply_filter_ops(surface, &ops)
}

/// Apply parsed filter operations in order.
///
/// Consecutive color operations are fused into a single pass over straight-alpha pixels.
pub fn apply_filter_ops(surface: &mut Surface, ops: &[FilterOp]) -> StoryResult<()> {
    let mut pending: Vec<FilterOp> = Vec::new();
    for &op in ops {
        if op.func == FilterFn::Blur {
            flush_color_ops(surface, &pending);
            pending.clear();
            if op.value > 0.0 {
                *surface = gaussian_blur_surface(surface, op.value as f32)?;
            }
        } else {
            pending.push(op);
        }
    }
    flush_color_ops(surface, &pending);
    Ok(())
}

fn flush_color_ops(surface: &mut Surface, ops: &[FilterOp]) {
    if ops.is_empty() {
        return;
    }
    for px in surface.data_mut().chunks_exact_mut(4) {
        if px[3] == 0 {
            continue;
        }
        let a = f32::from(px[3]) / 255.0;
        let mut rgb = [
            f32::from(px[0]) / 255.0 / a,
            f32::from(px[1]) / 255.0 / a,
            f32::from(px[2]) / 255.0 / a,
        ];
        let mut alpha = a;
        for op in ops {
            apply_color_op(*op, &mut rgb, &mut alpha);
        }
        let alpha = alpha.clamp(0.0, 1.0);
        for c in 0..3 {
            px[c] = (rgb[c].clamp(0.0, 1.0) * alpha * 255.0).round() as u8;
        }
        px[3] = (alpha * 255.0).round() as u8;
    }
}

fn apply_color_op(op: FilterOp, rgb: &mut [f32; 3], alpha: &mut f32) {
    let v = op.value as f32;
    match op.func {
        FilterFn::Grayscale => *rgb = mul(&grayscale_matrix(v), *rgb),
        FilterFn::Sepia => *rgb = mul(&sepia_matrix(v), *rgb),
        FilterFn::Saturate => *rgb = mul(&saturate_matrix(v.max(0.0)), *rgb),
        FilterFn::HueRotate => *rgb = mul(&hue_rotate_matrix(v), *rgb),
        FilterFn::Brightness => {
            for c in rgb.iter_mut() {
                *c = (*c * v.max(0.0)).clamp(0.0, 1.0);
            }
        }
        FilterFn::Contrast => {
            for c in rgb.iter_mut() {
                *c = ((*c - 0.5) * v.max(0.0) + 0.5).clamp(0.0, 1.0);
            }
        }
        FilterFn::Opacity => *alpha *= v.clamp(0.0, 1.0),
        FilterFn::Blur => {}
    }
}

fn mul(m: &Mat3, v: [f32; 3]) -> [f32; 3] {
    let mut out = [0.0f32; 3];
    for (o, row) in out.iter_mut().zip(m.iter()) {
        *o = (row[0] * v[0] + row[1] * v[1] + row[2] * v[2]).clamp(0.0, 1.0);
    }
    out
}

fn grayscale_matrix(amount: f32) -> Mat3 {
    let s = 1.0 - amount.clamp(0.0, 1.0);
    [
        [0.2126 + 0.7874 * s, 0.7152 - 0.7152 * s, 0.0722 - 0.0722 * s],
        [0.2126 - 0.2126 * s, 0.7152 + 0.2848 * s, 0.0722 - 0.0722 * s],
        [0.2126 - 0.2126 * s, 0.7152 - 0.7152 * s, 0.0722 + 0.9278 * s],
    ]
}

fn sepia_matrix(amount: f32) -> Mat3 {
    let s = 1.0 - amount.clamp(0.0, 1.0);
    [
        [0.393 + 0.607 * s, 0.769 - 0.769 * s, 0.189 - 0.189 * s],
        [0.349 - 0.349 * s, 0.686 + 0.314 * s, 0.168 - 0.168 * s],
        [0.272 - 0.272 * s, 0.534 - 0.534 * s, 0.131 + 0.869 * s],
    ]
}

fn saturate_matrix(s: f32) -> Mat3 {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

fn hue_rotate_matrix(deg: f32) -> Mat3 {
    let (sin, cos) = deg.to_radians().sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/filter/apply.rs"]
mod tests;
