//! Criteria Value Module
//!
//! Closed, recursively-defined value type used to describe request criteria
//! (genre lists, mood, tempo, year ranges, ...).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Mapping of criteria field names to values. Keys are kept sorted.
pub type CriteriaMap = BTreeMap<String, CriteriaValue>;

// == Criteria Value ==
/// A single criteria value: scalar, ordered sequence, or nested mapping.
///
/// Converts to and from `serde_json::Value`. Non-finite floats have no JSON
/// representation and serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum CriteriaValue {
    Null,
    Bool(bool),
    Int(i64),
    /// Integers above `i64::MAX`; smaller unsigned values are stored as `Int`
    UInt(u64),
    Float(f64),
    Text(String),
    List(Vec<CriteriaValue>),
    Map(CriteriaMap),
}

impl CriteriaValue {
    /// Returns true if this value (or anything nested in it) is NaN or infinite.
    pub fn contains_non_finite(&self) -> bool {
        match self {
            CriteriaValue::Float(f) => !f.is_finite(),
            CriteriaValue::List(items) => items.iter().any(CriteriaValue::contains_non_finite),
            CriteriaValue::Map(map) => map.values().any(CriteriaValue::contains_non_finite),
            _ => false,
        }
    }
}

impl From<Value> for CriteriaValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => CriteriaValue::Null,
            Value::Bool(b) => CriteriaValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    CriteriaValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    CriteriaValue::UInt(u)
                } else {
                    CriteriaValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => CriteriaValue::Text(s),
            Value::Array(items) => {
                CriteriaValue::List(items.into_iter().map(CriteriaValue::from).collect())
            }
            Value::Object(map) => CriteriaValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, CriteriaValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<CriteriaValue> for Value {
    fn from(value: CriteriaValue) -> Self {
        match value {
            CriteriaValue::Null => Value::Null,
            CriteriaValue::Bool(b) => Value::Bool(b),
            CriteriaValue::Int(i) => Value::Number(i.into()),
            CriteriaValue::UInt(u) => Value::Number(u.into()),
            CriteriaValue::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
            CriteriaValue::Text(s) => Value::String(s),
            CriteriaValue::List(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            CriteriaValue::Map(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<bool> for CriteriaValue {
    fn from(b: bool) -> Self {
        CriteriaValue::Bool(b)
    }
}

impl From<i64> for CriteriaValue {
    fn from(i: i64) -> Self {
        CriteriaValue::Int(i)
    }
}

impl From<i32> for CriteriaValue {
    fn from(i: i32) -> Self {
        CriteriaValue::Int(i64::from(i))
    }
}

impl From<u32> for CriteriaValue {
    fn from(i: u32) -> Self {
        CriteriaValue::Int(i64::from(i))
    }
}

impl From<u64> for CriteriaValue {
    fn from(u: u64) -> Self {
        match i64::try_from(u) {
            Ok(i) => CriteriaValue::Int(i),
            Err(_) => CriteriaValue::UInt(u),
        }
    }
}

impl From<f64> for CriteriaValue {
    fn from(f: f64) -> Self {
        CriteriaValue::Float(f)
    }
}

impl From<&str> for CriteriaValue {
    fn from(s: &str) -> Self {
        CriteriaValue::Text(s.to_string())
    }
}

impl From<String> for CriteriaValue {
    fn from(s: String) -> Self {
        CriteriaValue::Text(s)
    }
}

impl<T: Into<CriteriaValue>> From<Vec<T>> for CriteriaValue {
    fn from(items: Vec<T>) -> Self {
        CriteriaValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<CriteriaValue>> From<Option<T>> for CriteriaValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CriteriaValue::Null, Into::into)
    }
}

impl From<CriteriaMap> for CriteriaValue {
    fn from(map: CriteriaMap) -> Self {
        CriteriaValue::Map(map)
    }
}

impl From<Criteria> for CriteriaValue {
    fn from(criteria: Criteria) -> Self {
        CriteriaValue::Map(criteria.0)
    }
}

// == Criteria ==
/// The semantic parameters of a request, independent of field or array order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Criteria(CriteriaMap);

impl Criteria {
    /// Creates an empty criteria mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    ///
    /// ```
    /// use playlist_cache::cache::Criteria;
    ///
    /// let criteria = Criteria::new()
    ///     .with("genres", vec!["rock", "indie"])
    ///     .with("mood", "energetic");
    /// assert_eq!(criteria.len(), 2);
    /// ```
    pub fn with(mut self, field: impl Into<String>, value: impl Into<CriteriaValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<CriteriaValue>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&CriteriaValue> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CriteriaValue)> {
        self.0.iter()
    }

    pub fn contains_non_finite(&self) -> bool {
        self.0.values().any(CriteriaValue::contains_non_finite)
    }
}

impl From<CriteriaMap> for Criteria {
    fn from(map: CriteriaMap) -> Self {
        Criteria(map)
    }
}

impl FromIterator<(String, CriteriaValue)> for Criteria {
    fn from_iter<I: IntoIterator<Item = (String, CriteriaValue)>>(iter: I) -> Self {
        Criteria(iter.into_iter().collect())
    }
}
