use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::TypeError;
use crate::fields::Fields;

/// A decoded row, or any value nested inside one.
///
/// Records are produced by a record source and never mutated by the diff
/// engines. Equality is structural: two mappings are equal when they hold the
/// same fields with equal values, regardless of field order. Numbers compare
/// by their JSON representation, so `1` and `1.0` are different values, and
/// so are `0.0` and `-0.0`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Record {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Record>),
    Mapping(Fields),
}

impl Record {
    /// Parse a record from JSON text.
    pub fn from_json_str(s: &str) -> Result<Self, TypeError> {
        let value: Value =
            serde_json::from_str(s).map_err(|e| TypeError::Parse(e.to_string()))?;
        Ok(Self::from(value))
    }

    /// Returns `true` for [`Record::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Record::Null)
    }

    /// Look up a top-level field. Returns `None` for non-mapping records.
    pub fn get(&self, field: &str) -> Option<&Record> {
        match self {
            Record::Mapping(fields) => fields.get(field),
            _ => None,
        }
    }

    /// Borrow the fields of a mapping record.
    pub fn as_fields(&self) -> Option<&Fields> {
        match self {
            Record::Mapping(fields) => Some(fields),
            _ => None,
        }
    }

    /// Take the fields of a mapping record.
    pub fn into_fields(self) -> Result<Fields, TypeError> {
        match self {
            Record::Mapping(fields) => Ok(fields),
            other => Err(TypeError::NotAMapping(other.type_name())),
        }
    }

    /// Short name of the variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Record::Null => "null",
            Record::Bool(_) => "boolean",
            Record::Number(_) => "number",
            Record::String(_) => "string",
            Record::Sequence(_) => "sequence",
            Record::Mapping(_) => "mapping",
        }
    }

    /// Convert to a `serde_json::Value`, keeping field insertion order.
    pub fn to_value(&self) -> Value {
        match self {
            Record::Null => Value::Null,
            Record::Bool(b) => Value::Bool(*b),
            Record::Number(n) => Value::Number(n.clone()),
            Record::String(s) => Value::String(s.clone()),
            Record::Sequence(items) => Value::Array(items.iter().map(Record::to_value).collect()),
            Record::Mapping(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_value()))
                    .collect(),
            ),
        }
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Record::Null, Record::Null) => true,
            (Record::Bool(a), Record::Bool(b)) => a == b,
            (Record::Number(a), Record::Number(b)) => same_number(a, b),
            (Record::String(a), Record::String(b)) => a == b,
            (Record::Sequence(a), Record::Sequence(b)) => a == b,
            (Record::Mapping(a), Record::Mapping(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Record {}

// `Number` equality treats `-0.0` and `0.0` as equal even though they print
// differently. Finite floats print the same exactly when their bits match.
fn same_number(a: &Number, b: &Number) -> bool {
    match (a.is_f64(), b.is_f64()) {
        (true, true) => a.as_f64().map(f64::to_bits) == b.as_f64().map(f64::to_bits),
        _ => a == b,
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Record::Null,
            Value::Bool(b) => Record::Bool(b),
            Value::Number(n) => Record::Number(n),
            Value::String(s) => Record::String(s),
            Value::Array(items) => Record::Sequence(items.into_iter().map(Record::from).collect()),
            Value::Object(map) => Record::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, Record::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        match record {
            Record::Null => Value::Null,
            Record::Bool(b) => Value::Bool(b),
            Record::Number(n) => Value::Number(n),
            Record::String(s) => Value::String(s),
            Record::Sequence(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Record::Mapping(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Record {
    fn from(b: bool) -> Self {
        Record::Bool(b)
    }
}

impl From<i64> for Record {
    fn from(n: i64) -> Self {
        Record::Number(n.into())
    }
}

impl From<u64> for Record {
    fn from(n: u64) -> Self {
        Record::Number(n.into())
    }
}

impl From<i32> for Record {
    fn from(n: i32) -> Self {
        Record::Number(n.into())
    }
}

/// Non-finite floats have no JSON representation and become `Null`.
impl From<f64> for Record {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Record::Null, Record::Number)
    }
}

impl From<&str> for Record {
    fn from(s: &str) -> Self {
        Record::String(s.to_string())
    }
}

impl From<String> for Record {
    fn from(s: String) -> Self {
        Record::String(s)
    }
}

impl From<Vec<Record>> for Record {
    fn from(items: Vec<Record>) -> Self {
        Record::Sequence(items)
    }
}

impl From<Fields> for Record {
    fn from(fields: Fields) -> Self {
        Record::Mapping(fields)
    }
}
