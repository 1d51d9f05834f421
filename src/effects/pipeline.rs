use crate::effects::grain::apply_grain;
use crate::effects::tilt_shift::apply_tilt_shift;
use crate::effects::vignette::apply_vignette;
use crate::filter::interpolate::format_op;
use crate::filter::parse::{FilterFn, FilterOp};
use crate::foundation::error::StoryResult;
use crate::render::surface::Surface;
use crate::scene::model::StoryEffects;

/// Blur length contributed by `glow` at intensity 1.
pub const GLOW_BLUR_PX: f64 = 10.0;
/// Blur length contributed by `blur` at intensity 1.
pub const BLUR_BLUR_PX: f64 = 15.0;

/// Blur terms contributed by the glow and blur effects, e.g. `"blur(5px) blur(7.5px)"`.
///
/// Returns `None` when neither effect is active.
pub fn effect_blur_filter(effects: &StoryEffects) -> Option<String> {
    let e = effects.clamped();
    let mut terms = Vec::new();
    if e.glow > 0.0 {
        terms.push(format_op(FilterOp {
            func: FilterFn::Blur,
            value: e.glow * GLOW_BLUR_PX,
        }));
    }
    if e.blur > 0.0 {
        terms.push(format_op(FilterOp {
            func: FilterFn::Blur,
            value: e.blur * BLUR_BLUR_PX,
        }));
    }
    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" "))
    }
}

/// Join the slide filter and the effect blur terms into one descriptor.
pub fn combine_filters(slide_filter: Option<&str>, effects: &StoryEffects) -> Option<String> {
    let slide = slide_filter
        .map(str::trim)
        .filter(|f| !f.is_empty() && *f != "none");
    match (slide, effect_blur_filter(effects)) {
        (None, None) => None,
        (Some(f), None) => Some(f.to_owned()),
        (None, Some(b)) => Some(b),
        (Some(f), Some(b)) => Some(format!("{f} {b}")),
    }
}

/// Frame-wide passes in fixed order: vignette, grain, tilt-shift.
///
/// Each pass is gated on its own intensity and composites into `surface` without leaving any
/// state behind for the next one.
pub fn apply_post_effects(
    surface: &mut Surface,
    effects: &StoryEffects,
    grain_seed: u64,
) -> StoryResult<()> {
    let e = effects.clamped();
    apply_vignette(surface, e.vignette)?;
    apply_grain(surface, e.grain, grain_seed)?;
    apply_tilt_shift(surface, e.tilt_shift)?;
    Ok(())
}

/// Return `true` when any frame-wide pass would change pixels.
pub fn has_post_effects(effects: &StoryEffects) -> bool {
    let e = effects.clamped();
    e.vignette > 0.0
        || e.grain > 0.0
        || (e.tilt_shift.mode != crate::scene::model::TiltShiftMode::None
            && e.tilt_shift.intensity > 0.0)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/pipeline.rs"]
mod tests;
