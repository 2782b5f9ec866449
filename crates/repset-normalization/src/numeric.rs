//! Numeric normalization utilities.

use repset_model::{DEFAULT_RPE, MAX_RPE};

/// Parses a string as f64, returning None for invalid, empty or non-finite input.
///
/// A lone `,` is accepted as the decimal separator (`"12,5"` -> `12.5`).
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed = if trimmed.contains(',') && !trimmed.contains('.') {
        trimmed.replacen(',', ".", 1).parse::<f64>().ok()
    } else {
        trimmed.parse::<f64>().ok()
    };
    parsed.filter(|v| v.is_finite())
}

/// Parses a string as i64, returning None for invalid or empty strings.
pub fn parse_i64(value: &str) -> Option<i64> {
    if value.trim().is_empty() {
        return None;
    }
    value.trim().parse::<i64>().ok()
}

/// Parsed value when it is a non-negative number, `0` otherwise.
pub fn non_negative(value: Option<&str>) -> f64 {
    match value.and_then(parse_f64) {
        Some(v) if v > 0.0 => v,
        _ => 0.0,
    }
}

/// Whether the text parses to a strictly positive number.
pub fn is_positive(value: Option<&str>) -> bool {
    value.and_then(parse_f64).is_some_and(|v| v > 0.0)
}

/// Repetition count: non-negative, fractional part dropped.
pub fn parse_reps(value: Option<&str>) -> u32 {
    // `as` saturates, so absurdly large counts clamp to u32::MAX
    non_negative(value).floor() as u32
}

/// RPE on the 0..=10 scale.
///
/// The value is read as an integer; a decimal is truncated toward zero.
/// Anything unparsable or outside the scale becomes [`DEFAULT_RPE`].
pub fn parse_rpe(value: Option<&str>) -> u8 {
    let Some(text) = value else {
        return DEFAULT_RPE;
    };
    let parsed = parse_i64(text).or_else(|| parse_f64(text).map(|v| v.trunc() as i64));
    match parsed {
        Some(v) if (0..=i64::from(MAX_RPE)).contains(&v) => v as u8,
        _ => DEFAULT_RPE,
    }
}

/// Formats a floating-point number as a string without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
