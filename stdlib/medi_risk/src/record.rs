//! Input records before and after validation.

use crate::schema::FEATURE_COUNT;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value as JsonValue};

/// Loosely typed field values as received from a boundary.
///
/// Keys outside the schema are carried along and ignored by validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: Map<String, JsonValue>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Objects become records; any other JSON value yields an empty record.
    pub fn from_json(value: JsonValue) -> Self {
        match value {
            JsonValue::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<JsonValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Store a parsed number.
    ///
    /// Infinities saturate to the largest finite value of the same sign, so
    /// they fail every range check as they would unsaturated. NaN is kept as
    /// text and reports as non-numeric.
    pub fn insert_number(&mut self, name: impl Into<String>, x: f64) {
        let x = if x.is_infinite() { f64::MAX.copysign(x) } else { x };
        let value = Number::from_f64(x)
            .map_or_else(|| JsonValue::String(x.to_string()), JsonValue::Number);
        self.fields.insert(name.into(), value);
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<JsonValue> {
        self.fields.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, JsonValue>> for RawRecord {
    fn from(fields: Map<String, JsonValue>) -> Self {
        Self { fields }
    }
}

/// A record that passed validation, values held in schema order.
///
/// Only [`crate::Validator`] constructs these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedRecord {
    values: [f64; FEATURE_COUNT],
}

impl ValidatedRecord {
    pub(crate) fn from_ordered(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// The single model row.
    pub fn row(&self) -> &[f64] {
        &self.values
    }
}
