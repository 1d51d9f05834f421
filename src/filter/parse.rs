/// How a filter function approaches its identity as intensity drops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterpolationMode {
    /// Multiplicative functions: identity is `1`, value is `1 + (v - 1) * t`.
    Normal,
    /// Additive functions: identity is `0`, value is `v * t`.
    Direct,
}

/// Filter functions understood by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterFn {
    /// `brightness(x)`
    Brightness,
    /// `contrast(x)`
    Contrast,
    /// `saturate(x)`
    Saturate,
    /// `opacity(x)`
    Opacity,
    /// `sepia(x)`
    Sepia,
    /// `grayscale(x)`
    Grayscale,
    /// `blur(Npx)`
    Blur,
    /// `hue-rotate(Ndeg)`
    HueRotate,
}

impl FilterFn {
    const ALL: [FilterFn; 8] = [
        FilterFn::Brightness,
        FilterFn::Contrast,
        FilterFn::Saturate,
        FilterFn::Opacity,
        FilterFn::Sepia,
        FilterFn::Grayscale,
        FilterFn::Blur,
        FilterFn::HueRotate,
    ];

    /// Look up a function by its CSS name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }

    /// CSS function name.
    pub fn name(self) -> &'static str {
        match self {
            FilterFn::Brightness => "brightness",
            FilterFn::Contrast => "contrast",
            FilterFn::Saturate => "saturate",
            FilterFn::Opacity => "opacity",
            FilterFn::Sepia => "sepia",
            FilterFn::Grayscale => "grayscale",
            FilterFn::Blur => "blur",
            FilterFn::HueRotate => "hue-rotate",
        }
    }

    /// Interpolation mode toward identity.
    pub fn mode(self) -> InterpolationMode {
        match self {
            FilterFn::Brightness | FilterFn::Contrast | FilterFn::Saturate | FilterFn::Opacity => {
                InterpolationMode::Normal
            }
            FilterFn::Sepia | FilterFn::Grayscale | FilterFn::Blur | FilterFn::HueRotate => {
                InterpolationMode::Direct
            }
        }
    }

    /// Value that leaves pixels unchanged.
    pub fn identity(self) -> f64 {
        match self.mode() {
            InterpolationMode::Normal => 1.0,
            InterpolationMode::Direct => 0.0,
        }
    }

    /// Unit suffix used when formatting.
    pub fn unit(self) -> &'static str {
        match self {
            FilterFn::Blur => "px",
            FilterFn::HueRotate => "deg",
            _ => "",
        }
    }
}

/// One parsed filter function with its numeric argument in canonical units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterOp {
    /// Function.
    pub func: FilterFn,
    /// Argument: plain factor, pixels for blur, degrees for hue-rotate.
    pub value: f64,
}

/// Raw `name(args)` token, before the name is resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RawToken<'a> {
    pub(crate) name: &'a str,
    pub(crate) args: &'a str,
}

/// Split a descriptor into `name(args)` tokens.
///
/// Arguments may contain spaces and nested parentheses (`drop-shadow(2px 4px rgba(0,0,0,.5))`).
/// Scanning stops at the first malformed token.
pub(crate) fn tokenize(desc: &str) -> Vec<RawToken<'_>> {
    let bytes = desc.as_bytes();
    let mut out = Vec::new();
    let mut i = 0usize;
    while i < bytes.len() {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }
        let name_start = i;
        while i < bytes.len() && bytes[i] != b'(' && !bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() || bytes[i] != b'(' {
            // Bare word ("none") or trailing garbage: skip it.
            continue;
        }
        let name = &desc[name_start..i];
        i += 1;
        let args_start = i;
        let mut depth = 1u32;
        while i < bytes.len() {
            match bytes[i] {
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            i += 1;
        }
        if depth != 0 {
            break;
        }
        out.push(RawToken {
            name,
            args: &desc[args_start..i],
        });
        i += 1;
    }
    out
}

/// Length of the CSS `<number>` at the start of `s`: optional sign, digits with an optional
/// fraction, then an optional `e`/`E` exponent. Zero when no number starts there.
fn number_prefix_len(s: &str) -> usize {
    let b = s.as_bytes();
    let digits = |mut i: usize| {
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        i
    };
    let mut i = 0usize;
    if matches!(b.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_end = digits(i);
    let mut end = int_end;
    if end < b.len() && b[end] == b'.' {
        let frac_end = digits(end + 1);
        if frac_end > end + 1 {
            end = frac_end;
        }
    }
    let has_mantissa = end > i && (int_end > i || end > int_end + 1);
    if !has_mantissa {
        return 0;
    }
    if end < b.len() && matches!(b[end], b'e' | b'E') {
        let mut j = end + 1;
        if j < b.len() && matches!(b[j], b'+' | b'-') {
            j += 1;
        }
        let exp_end = digits(j);
        if exp_end > j {
            end = exp_end;
        }
    }
    end
}

/// Parse the numeric argument of a known function.
///
/// Takes the leading number and interprets a trailing `%` as a fraction for unitless functions,
/// `rad`/`turn` as angles for `hue-rotate`. Returns `None` when no number is present or the unit
/// does not belong to the function.
pub(crate) fn parse_arg(func: FilterFn, args: &str) -> Option<f64> {
    let s = args.trim();
    let num_len = number_prefix_len(s);
    if num_len == 0 {
        return None;
    }
    let (num, suffix) = s.split_at(num_len);
    let mut v: f64 = num.parse().ok()?;
    if !v.is_finite() {
        return None;
    }
    match (func, suffix.trim()) {
        (_, "") => {}
        (FilterFn::HueRotate, "deg") => {}
        (FilterFn::HueRotate, "rad") => v = v.to_degrees(),
        (FilterFn::HueRotate, "turn") => v *= 360.0,
        (FilterFn::Blur, "px") => {}
        (f, "%") if f.unit().is_empty() => v /= 100.0,
        _ => return None,
    }
    Some(v)
}

/// Parse a descriptor into known filter operations, dropping unknown or malformed tokens.
pub fn parse_filter(desc: &str) -> Vec<FilterOp> {
    tokenize(desc)
        .into_iter()
        .filter_map(|t| {
            let func = FilterFn::from_name(t.name.trim())?;
            let value = parse_arg(func, t.args)?;
            Some(FilterOp { func, value })
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/filter/parse.rs"]
mod tests;
