//! Fingerprint Module
//!
//! Deterministic normalization of criteria and SHA-256 fingerprinting of the
//! canonical encoding. Two criteria that differ only in field order or in the
//! order of array elements produce the same fingerprint.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::cache::{Criteria, CriteriaValue};

// == Non-Finite Policy ==
/// How keys containing NaN or infinite floats are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NonFinitePolicy {
    /// Encode the number as an opaque scalar token (`NaN`, `inf`, `-inf`).
    #[default]
    Opaque,
    /// Refuse to fingerprint: lookups miss and writes are skipped.
    Skip,
}

// == Fingerprint ==
/// Hex-encoded SHA-256 digest of a canonical cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Hashes an already canonical string.
    pub fn of_canonical(canonical: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        Fingerprint(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix for log lines.
    pub fn short(&self) -> &str {
        &self.0[..12.min(self.0.len())]
    }

    /// Length of the physical key in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// == Normalization ==
/// Returns a copy of `criteria` with every array (at any depth) sorted.
///
/// Map keys are already ordered by `CriteriaMap`, so nested maps only need
/// their values normalized.
pub fn normalize(criteria: &Criteria) -> Criteria {
    criteria
        .iter()
        .map(|(field, value)| (field.clone(), normalize_value(value)))
        .collect()
}

/// Normalizes a single value. Scalars pass through unchanged.
pub fn normalize_value(value: &CriteriaValue) -> CriteriaValue {
    match value {
        CriteriaValue::List(items) => {
            let mut keyed: Vec<(String, String, CriteriaValue)> = items
                .iter()
                .map(|item| {
                    let normalized = normalize_value(item);
                    let canonical = encode_value(&normalized);
                    (sort_key(&normalized, &canonical), canonical, normalized)
                })
                .collect();
            keyed.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));
            CriteriaValue::List(keyed.into_iter().map(|(_, _, v)| v).collect())
        }
        CriteriaValue::Map(map) => CriteriaValue::Map(
            map.iter()
                .map(|(k, v)| (k.clone(), normalize_value(v)))
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}

/// Primary ordering for array elements: text compares by its raw content,
/// everything else by its canonical encoding. The canonical encoding breaks
/// ties, which makes the order total.
fn sort_key(value: &CriteriaValue, canonical: &str) -> String {
    match value {
        CriteriaValue::Text(s) => s.clone(),
        _ => canonical.to_string(),
    }
}

// == Canonical Encoding ==
/// Builds the canonical string for a `{kind, criteria}` pair.
///
/// Returns `None` only under `NonFinitePolicy::Skip` when the criteria holds a
/// non-finite number.
pub fn canonical_string(kind: &str, criteria: &Criteria, policy: NonFinitePolicy) -> Option<String> {
    if policy == NonFinitePolicy::Skip && criteria.contains_non_finite() {
        return None;
    }

    let normalized = normalize(criteria);
    let mut out = String::from("{\"criteria\":{");
    for (i, (field, value)) in normalized.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&quote(field));
        out.push(':');
        out.push_str(&encode_value(value));
    }
    out.push_str("},\"kind\":");
    out.push_str(&quote(kind));
    out.push('}');
    Some(out)
}

/// Encodes an already normalized value. Object keys come out sorted because
/// `CriteriaMap` iterates in key order.
fn encode_value(value: &CriteriaValue) -> String {
    match value {
        CriteriaValue::Null => "null".to_string(),
        CriteriaValue::Bool(b) => b.to_string(),
        CriteriaValue::Int(i) => i.to_string(),
        CriteriaValue::UInt(u) => u.to_string(),
        CriteriaValue::Float(f) => encode_float(*f),
        CriteriaValue::Text(s) => quote(s),
        CriteriaValue::List(items) => {
            let parts: Vec<String> = items.iter().map(encode_value).collect();
            format!("[{}]", parts.join(","))
        }
        CriteriaValue::Map(map) => {
            let parts: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}:{}", quote(k), encode_value(v)))
                .collect();
            format!("{{{}}}", parts.join(","))
        }
    }
}

/// Whole floats encode like integers (`3.0` == `3`) and `-0.0` like `0`.
/// Non-finite values become bare tokens, which cannot collide with quoted text.
fn encode_float(f: f64) -> String {
    if f == 0.0 {
        "0".to_string()
    } else {
        f.to_string()
    }
}

fn quote(s: &str) -> String {
    Value::from(s).to_string()
}
