//! Filter descriptors: parsing, intensity interpolation, and pixel application.

pub mod apply;
pub mod interpolate;
pub mod parse;

pub use apply::{apply_filter, apply_filter_ops};
pub use interpolate::{IDENTITY_EPSILON, interpolate_filter, interpolate_op};
pub use parse::{FilterFn, FilterOp, InterpolationMode, parse_filter};
