use indexmap::IndexMap;
use serde::Serialize;

use crate::record::Record;

/// An insertion-ordered mapping from field name to [`Record`].
///
/// Field names are unique: inserting an existing name replaces its value in
/// place. Iteration follows insertion order, which is kept for display only;
/// equality ignores it, as `IndexMap` equality does.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Fields {
    entries: IndexMap<String, Record>,
}

impl Fields {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no fields.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&Record> {
        self.entries.get(name)
    }

    /// Returns `true` if the field exists.
    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Insert a field, returning the previous value if the name was taken.
    ///
    /// A replaced field keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: Record) -> Option<Record> {
        self.entries.insert(name.into(), value)
    }

    /// Remove a field, preserving the order of the remaining ones.
    pub fn remove(&mut self, name: &str) -> Option<Record> {
        self.entries.shift_remove(name)
    }

    /// Keep only the fields for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &Record) -> bool) {
        self.entries.retain(|k, v| keep(k, v));
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, Record)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, Record)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl IntoIterator for Fields {
    type Item = (String, Record);
    type IntoIter = indexmap::map::IntoIter<String, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
