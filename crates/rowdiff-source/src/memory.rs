use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use rowdiff_types::Record;

use crate::error::{SourceError, SourceResult};
use crate::selection::FieldSelection;
use crate::traits::RecordSource;

/// In-memory record source keyed by path.
///
/// Intended for tests and embedding. Records are cloned on every load.
pub struct InMemoryRecordSource {
    inputs: RwLock<HashMap<PathBuf, Vec<Record>>>,
}

impl InMemoryRecordSource {
    /// Create a new empty source.
    pub fn new() -> Self {
        Self {
            inputs: RwLock::new(HashMap::new()),
        }
    }

    /// Register (or replace) the records served for `path`.
    pub fn insert(&self, path: impl Into<PathBuf>, records: Vec<Record>) {
        self.inputs
            .write()
            .expect("lock poisoned")
            .insert(path.into(), records);
    }

    /// Number of registered inputs.
    pub fn len(&self) -> usize {
        self.inputs.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no inputs are registered.
    pub fn is_empty(&self) -> bool {
        self.inputs.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryRecordSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordSource for InMemoryRecordSource {
    fn load(&self, path: &Path, selection: &FieldSelection) -> SourceResult<Vec<Record>> {
        let inputs = self.inputs.read().expect("lock poisoned");
        let records = inputs
            .get(path)
            .ok_or_else(|| SourceError::NotFound(path.to_path_buf()))?;
        Ok(records.iter().cloned().map(|r| selection.apply(r)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn load_registered_records() {
        let source = InMemoryRecordSource::new();
        source.insert("old", vec![Record::from(json!({"id": 1, "v": 2}))]);
        assert_eq!(source.len(), 1);

        let records = source
            .load(Path::new("old"), &FieldSelection::Keep(vec!["id".into()]))
            .unwrap();
        assert_eq!(records, vec![Record::from(json!({"id": 1}))]);
    }

    #[test]
    fn unknown_path_not_found() {
        let source = InMemoryRecordSource::default();
        assert!(source.is_empty());
        let err = source.load(Path::new("nope"), &FieldSelection::All).unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }
}
