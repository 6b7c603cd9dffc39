//! Composite keys: extraction from records and their total order.
//!
//! A composite key is the ordered tuple of stringified key-field values of a
//! record. The comparator defined here is the only ordering used by the
//! merge-join, both for sorting and for the lockstep walk.

use std::cmp::Ordering;
use std::fmt;

use rowdiff_types::Record;
use serde::Serialize;

use crate::canonical::canonical_string;
use crate::error::{DiffError, DiffResult};

/// String form of a key field that the record does not have.
///
/// Distinct from a present `null` value, which stringifies to `"null"`.
pub const MISSING_FIELD: &str = "undefined";

/// Ordered tuple of stringified key-field values.
///
/// Ordered element-wise by byte-wise string comparison; when one key is a
/// prefix of the other, the shorter key sorts first.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CompositeKey(Vec<String>);

impl Ord for CompositeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            match a.cmp(b) {
                Ordering::Equal => continue,
                decided => return decided,
            }
        }
        self.0.len().cmp(&other.0.len())
    }
}

impl PartialOrd for CompositeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}

impl<S: Into<String>> FromIterator<S> for CompositeKey {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// A validated, non-empty list of key field names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyFields(Vec<String>);

impl KeyFields {
    /// Validate a key specification.
    ///
    /// Fails with [`DiffError::EmptyKeySpec`] for an empty list and
    /// [`DiffError::InvalidKeyField`] for a blank field name.
    pub fn new<I, S>(fields: I) -> DiffResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if fields.is_empty() {
            return Err(DiffError::EmptyKeySpec);
        }
        if let Some(index) = fields.iter().position(|f| f.trim().is_empty()) {
            return Err(DiffError::InvalidKeyField { index });
        }
        Ok(Self(fields))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Build the composite key of a record.
    ///
    /// Non-mapping records have no fields, so every component is
    /// [`MISSING_FIELD`].
    pub fn extract(&self, record: &Record) -> CompositeKey {
        self.0
            .iter()
            .map(|field| key_component(record.get(field)))
            .collect()
    }
}

/// Composite key of an optional record; `None` is the end-of-sequence
/// sentinel and yields no key.
pub fn composite_key(record: Option<&Record>, fields: &KeyFields) -> Option<CompositeKey> {
    record.map(|r| fields.extract(r))
}

/// String form of one key field value.
///
/// Strings are used verbatim, scalars by their JSON text, and nested values
/// by their canonical form.
pub fn key_component(value: Option<&Record>) -> String {
    match value {
        None => MISSING_FIELD.to_string(),
        Some(Record::Null) => "null".to_string(),
        Some(Record::Bool(b)) => b.to_string(),
        Some(Record::Number(n)) => n.to_string(),
        Some(Record::String(s)) => s.clone(),
        Some(nested @ (Record::Sequence(_) | Record::Mapping(_))) => canonical_string(nested),
    }
}

/// Total order over keys and the end-of-sequence sentinel.
///
/// `None` equals `None` and sorts after every key.
pub fn compare_keys(a: Option<&CompositeKey>, b: Option<&CompositeKey>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.cmp(b),
    }
}
