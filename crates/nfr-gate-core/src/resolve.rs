//! Candidate-path resolution and total numeric coercion.
//!
//! Upstream tools disagree about where they put the same number. A field is
//! therefore described by an ordered list of candidate paths, and the first
//! path that fully resolves wins. Whatever is found is then coerced to a
//! number under fixed fallback rules; nothing in this module ever fails.

use serde_json::Value;

/// One plausible location of a field: an ordered sequence of mapping keys.
pub type CandidatePath = &'static [&'static str];

/// Return the value at the first candidate path that fully resolves.
///
/// A path resolves only when every key exists in the mapping at that step.
/// Sequences are never indexed, and a `doc` that is not a mapping resolves
/// nothing.
pub fn resolve<'a>(doc: &'a Value, paths: &[CandidatePath]) -> Option<&'a Value> {
    for (rank, path) in paths.iter().enumerate() {
        if let Some(value) = resolve_path(doc, path) {
            if rank > 0 {
                tracing::trace!(path = %path.join("."), rank, "resolved via fallback path");
            }
            return Some(value);
        }
    }
    None
}

/// Walk a single path. Any missing intermediate key fails the whole path.
pub fn resolve_path<'a>(doc: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(doc, |current, key| current.as_object()?.get(*key))
}

/// Strict variant used when re-reading persisted documents: the first
/// candidate path holding a JSON number or boolean wins. Paths that resolve
/// to any other type are skipped.
pub fn resolve_numeric<'a>(doc: &'a Value, paths: &[CandidatePath]) -> Option<&'a Value> {
    paths
        .iter()
        .filter_map(|path| resolve_path(doc, path))
        .find(|value| value.is_number() || value.is_boolean())
}

/// Coerce to an integer, or `None` when the value is not numeric-like.
///
/// Booleans map to 0/1, floats truncate toward zero, and strings are trimmed
/// and parsed (a float string such as `"12.7"` yields 12).
pub fn try_int(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Bool(flag) => Some(i64::from(*flag)),
        Value::Number(number) => number.as_i64().or_else(|| number.as_f64().and_then(truncate)),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| parse_finite(text).and_then(truncate))
        }
        _ => None,
    }
}

/// Coerce to a float, or `None` when the value is not numeric-like.
pub fn try_float(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_finite(text.trim()),
        _ => None,
    }
}

/// Total integer coercion: anything unusable becomes `default`.
pub fn coerce_int(value: Option<&Value>, default: i64) -> i64 {
    try_int(value).unwrap_or(default)
}

/// Total float coercion: anything unusable becomes `default`.
pub fn coerce_float(value: Option<&Value>, default: f64) -> f64 {
    try_float(value).unwrap_or(default)
}

// NaN and infinities cannot be written back out as JSON numbers.
fn parse_finite(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|parsed| parsed.is_finite())
}

fn truncate(value: f64) -> Option<i64> {
    value.is_finite().then(|| value.trunc() as i64)
}
