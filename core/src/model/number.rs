//! JSON has a single number type; clients send `10` and expect `10` back.

use serde::Serializer;

// Largest integer an f64 (and a JS number) represents exactly.
const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

/// Writes integral values without a fractional part.
pub fn compact<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
