//! String to number coercion.
//!
//! Two contracts live side by side:
//!
//! - [`parse_int`] / [`parse_double`] return a sentinel (`-1` / `-1.0`) when
//!   the input is malformed. Callers must re-check the sentinel against the
//!   legal domain of the value they are reading.
//! - [`try_parse_int`] / [`try_parse_double`] return `None` on malformed
//!   input, so `-1` always means the literal `-1`.
//!
//! The option validators in [`crate::Configuration`] only use the explicit
//! contract.
//!
//! # Examples
//!
//! ```
//! use supconv_core::coerce::{parse_int, try_parse_int};
//!
//! assert_eq!(parse_int(" 42 "), 42);
//! assert_eq!(parse_int("abc"), -1);
//!
//! assert_eq!(try_parse_int("-1"), Some(-1));
//! assert_eq!(try_parse_int("abc"), None);
//! ```

/// Value returned by [`parse_int`] when the input is not an integer.
pub const INT_SENTINEL: i32 = -1;

/// Value returned by [`parse_double`] when the input is not a number.
pub const DOUBLE_SENTINEL: f64 = -1.0;

/// Parses a trimmed integer, returning [`INT_SENTINEL`] on malformed input.
pub fn parse_int(s: &str) -> i32 {
    s.trim().parse::<i32>().unwrap_or(INT_SENTINEL)
}

/// Parses a trimmed real number, returning [`DOUBLE_SENTINEL`] on malformed
/// input.
pub fn parse_double(s: &str) -> f64 {
    try_parse_double(s).unwrap_or(DOUBLE_SENTINEL)
}

/// Parses a trimmed integer.
///
/// A leading `+` is accepted. Values that do not fit an `i64` are treated
/// as malformed.
pub fn try_parse_int(s: &str) -> Option<i64> {
    s.trim().parse::<i64>().ok()
}

/// Parses a trimmed, finite real number.
///
/// `NaN` and the infinities are rejected even though the standard parser
/// accepts their spellings.
pub fn try_parse_double(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
