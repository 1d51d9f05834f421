use crate::filter::parse::{FilterFn, FilterOp, InterpolationMode, parse_arg, tokenize};
use crate::foundation::core::clamp01;

/// Terms closer than this to their identity value are dropped from the output.
pub const IDENTITY_EPSILON: f64 = 0.001;

const NONE: &str = "none";

/// Scale a full-strength filter descriptor toward identity.
///
/// `intensity` is clamped into `[0, 1]`. At `0` (or for `"none"`) the result is exactly `"none"`;
/// at `1` the input is returned unchanged. In between, known functions are interpolated toward
/// their identity, unknown or malformed tokens are dropped, near-identity terms are omitted, and
/// the surviving terms keep their input order.
pub fn interpolate_filter(full_filter: &str, intensity: f64) -> String {
    let t = clamp01(intensity);
    if t == 0.0 || full_filter.trim() == NONE {
        return NONE.to_owned();
    }
    if t == 1.0 {
        return full_filter.to_owned();
    }

    let terms: Vec<String> = tokenize(full_filter)
        .into_iter()
        .filter_map(|tok| {
            let func = FilterFn::from_name(tok.name.trim())?;
            let value = parse_arg(func, tok.args)?;
            let op = interpolate_op(FilterOp { func, value }, t);
            if (op.value - func.identity()).abs() < IDENTITY_EPSILON {
                return None;
            }
            Some(format_op(op))
        })
        .collect();

    if terms.is_empty() {
        NONE.to_owned()
    } else {
        terms.join(" ")
    }
}

/// Interpolate a single operation toward identity by `t` (not clamped).
pub fn interpolate_op(op: FilterOp, t: f64) -> FilterOp {
    let value = match op.func.mode() {
        InterpolationMode::Normal => 1.0 + (op.value - 1.0) * t,
        InterpolationMode::Direct => op.value * t,
    };
    FilterOp { func: op.func, value }
}

/// Format `name(value<unit>)` with at most three decimals and no trailing zeros.
pub fn format_op(op: FilterOp) -> String {
    format!("{}({}{})", op.func.name(), format_number(op.value), op.func.unit())
}

// Rounds to the nearest thousandth rather than truncating: 0.96667 prints as 0.967.
fn format_number(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s.as_str()
    };
    if s == "-0" { "0".to_owned() } else { s.to_owned() }
}

#[cfg(test)]
#[path = "../../tests/unit/filter/interpolate.rs"]
mod tests;
