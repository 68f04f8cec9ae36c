//! Metric points flowing through the pipeline.
//!
//! The enrichment core only needs to read one field and add others, so it is
//! written against the [`MetricPoint`] trait. [`Metric`] is the concrete point
//! used by the bundled pipeline host (newline-delimited JSON).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A typed field value.
///
/// Deserialization is untagged, so JSON `true`, `42`, `1.5` and `"x"` map to
/// the obvious variants. Integers that do not fit in `i64` land in
/// `UnsignedInteger`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Integer(i64),
    UnsignedInteger(u64),
    Float(f64),
    String(String),
}

impl FieldValue {
    /// Returns the textual value, or `None` for every non-string variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        FieldValue::UnsignedInteger(u64::from(v))
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Boolean(v)
    }
}

/// Field access the enrichment stage needs from a point.
///
/// Points are owned by the pipeline host; the stage only reads and adds
/// fields on points it is handed and never keeps a reference past the call.
pub trait MetricPoint {
    /// Returns the field value if the point carries `name`.
    fn get_field(&self, name: &str) -> Option<&FieldValue>;

    /// Adds a field, replacing any existing value stored under `name`.
    fn add_field(&mut self, name: &str, value: FieldValue);
}

/// A single metric record: measurement name, tags, fields and an optional
/// timestamp (nanoseconds since the epoch).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl Metric {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style helper used by hosts and tests.
    pub fn with_field(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }
}

impl MetricPoint for Metric {
    fn get_field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    fn add_field(&mut self, name: &str, value: FieldValue) {
        self.fields.insert(name.to_string(), value);
    }
}
