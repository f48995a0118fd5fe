//! Attribute normalization
//!
//! A single normalization policy applied to all four categorical attributes
//! (material, transport, recyclability, origin): trim, title-case, and
//! substitute a caller-supplied default for missing, empty, or "unknown"
//! values. Normalization never fails and is idempotent on canonical values.

/// Weight substituted when a product weight is missing or non-numeric, in kg
pub const DEFAULT_WEIGHT_KG: f64 = 0.5;

/// Normalize a raw attribute value against a default.
///
/// Missing or empty input becomes `default`; otherwise the value is trimmed
/// and title-cased, and a case-insensitive "unknown" also becomes `default`.
/// Always returns a non-empty string.
pub fn normalize_feature(value: Option<&str>, default: &str) -> String {
    let clean = title_case(value.unwrap_or(default).trim());
    if clean.is_empty() || clean.eq_ignore_ascii_case("unknown") {
        default.to_string()
    } else {
        clean
    }
}

/// Coerce an optional weight to a positive value in kg.
///
/// Missing, non-finite, or non-positive weights degrade to
/// [`DEFAULT_WEIGHT_KG`].
pub fn weight_or_default(value: Option<f64>) -> f64 {
    match value {
        Some(w) if w.is_finite() && w > 0.0 => w,
        _ => DEFAULT_WEIGHT_KG,
    }
}

/// Title-case a string: uppercase the first letter of each alphabetic run,
/// lowercase the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
