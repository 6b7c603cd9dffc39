//! Field-level diff: compare two records that share a composite key.
//!
//! Fields present only in the new record are `added`, fields present only in
//! the old record are `deleted`, and fields present in both with different
//! values are `updated`. When both sides of a field are mappings (or both are
//! sequences) the comparison recurses, and the nested changes are recorded as
//! partial mappings under that field. Sequence elements are keyed by their
//! decimal index.
//!
//! `updated` holds only the new value. The old value of an updated field is
//! not retained.

use rowdiff_types::{Fields, Record};
use serde::Serialize;

/// Field name used when two non-container records differ as a whole.
pub const WHOLE_RECORD: &str = "";

/// How one record differs structurally from another.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FieldDiff {
    /// Fields only present in the new record, with their new values.
    pub added: Fields,
    /// Fields only present in the old record, with their old values.
    pub deleted: Fields,
    /// Fields present on both sides with different values, with their new values.
    pub updated: Fields,
}

impl FieldDiff {
    /// Create an empty field diff.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the records are structurally equal.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.updated.is_empty()
    }

    /// Number of top-level entries across all three categories.
    pub fn len(&self) -> usize {
        self.added.len() + self.deleted.len() + self.updated.len()
    }

    fn absorb(&mut self, name: &str, nested: FieldDiff) {
        if !nested.added.is_empty() {
            self.added.insert(name, Record::Mapping(nested.added));
        }
        if !nested.deleted.is_empty() {
            self.deleted.insert(name, Record::Mapping(nested.deleted));
        }
        if !nested.updated.is_empty() {
            self.updated.insert(name, Record::Mapping(nested.updated));
        }
    }
}

/// Compute the structural diff from `old` to `new`.
///
/// The result is empty exactly when `old == new`.
pub fn diff_records(old: &Record, new: &Record) -> FieldDiff {
    let mut diff = FieldDiff::new();
    match (old, new) {
        (Record::Mapping(o), Record::Mapping(n)) => diff_mappings(o, n, &mut diff),
        (Record::Sequence(o), Record::Sequence(n)) => diff_sequences(o, n, &mut diff),
        (o, n) if o != n => {
            diff.updated.insert(WHOLE_RECORD, n.clone());
        }
        _ => {}
    }
    diff
}

fn diff_mappings(old: &Fields, new: &Fields, diff: &mut FieldDiff) {
    for (name, old_val) in old.iter() {
        match new.get(name) {
            Some(new_val) => diff_field(name, old_val, new_val, diff),
            None => {
                diff.deleted.insert(name, old_val.clone());
            }
        }
    }

    for (name, new_val) in new.iter() {
        if !old.contains_key(name) {
            diff.added.insert(name, new_val.clone());
        }
    }
}

fn diff_sequences(old: &[Record], new: &[Record], diff: &mut FieldDiff) {
    for (index, old_val) in old.iter().enumerate() {
        match new.get(index) {
            Some(new_val) => diff_field(&index.to_string(), old_val, new_val, diff),
            None => {
                diff.deleted.insert(index.to_string(), old_val.clone());
            }
        }
    }

    for (index, new_val) in new.iter().enumerate().skip(old.len()) {
        diff.added.insert(index.to_string(), new_val.clone());
    }
}

fn diff_field(name: &str, old: &Record, new: &Record, diff: &mut FieldDiff) {
    if old == new {
        return;
    }
    match (old, new) {
        (Record::Mapping(_), Record::Mapping(_)) | (Record::Sequence(_), Record::Sequence(_)) => {
            diff.absorb(name, diff_records(old, new));
        }
        _ => {
            diff.updated.insert(name, new.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn rec(value: Value) -> Record {
        Record::from(value)
    }

    fn fields(value: Value) -> Fields {
        rec(value).into_fields().unwrap()
    }

    #[test]
    fn identical_records_no_diff() {
        let record = rec(json!({"a": 1, "b": "hello"}));
        assert!(diff_records(&record, &record).is_empty());
    }

    #[test]
    fn field_order_is_not_a_change() {
        let old = rec(json!({"a": 1, "b": {"x": 1, "y": 2}}));
        let new = rec(json!({"b": {"y": 2, "x": 1}, "a": 1}));
        assert!(diff_records(&old, &new).is_empty());
    }

    #[test]
    fn single_field_update_keeps_new_value() {
        let diff = diff_records(&rec(json!({"id": 1, "v": "x"})), &rec(json!({"id": 1, "v": "y"})));
        assert!(diff.added.is_empty());
        assert!(diff.deleted.is_empty());
        assert_eq!(diff.updated, fields(json!({"v": "y"})));
    }

    #[test]
    fn mixed_changes() {
        let old = rec(json!({"keep": true, "modify": "old", "remove": 42}));
        let new = rec(json!({"keep": true, "modify": "new", "added": [1, 2, 3]}));

        let diff = diff_records(&old, &new);
        assert_eq!(diff.len(), 3);
        assert_eq!(diff.added, fields(json!({"added": [1, 2, 3]})));
        assert_eq!(diff.deleted, fields(json!({"remove": 42})));
        assert_eq!(diff.updated, fields(json!({"modify": "new"})));
    }

    #[test]
    fn nested_mapping_changes_recurse() {
        let old = rec(json!({"config": {"debug": false, "port": 8080, "host": "a"}}));
        let new = rec(json!({"config": {"debug": true, "port": 8080, "tls": true}}));

        let diff = diff_records(&old, &new);
        assert_eq!(diff.updated, fields(json!({"config": {"debug": true}})));
        assert_eq!(diff.added, fields(json!({"config": {"tls": true}})));
        assert_eq!(diff.deleted, fields(json!({"config": {"host": "a"}})));
    }

    #[test]
    fn sequences_diff_by_index() {
        let old = rec(json!({"tags": ["a", "b", "c"]}));
        let new = rec(json!({"tags": ["a", "x"]}));

        let diff = diff_records(&old, &new);
        assert_eq!(diff.updated, fields(json!({"tags": {"1": "x"}})));
        assert_eq!(diff.deleted, fields(json!({"tags": {"2": "c"}})));
        assert!(diff.added.is_empty());
    }

    #[test]
    fn sequence_growth_is_added() {
        let diff = diff_records(&rec(json!({"xs": [1]})), &rec(json!({"xs": [1, 2]})));
        assert_eq!(diff.added, fields(json!({"xs": {"1": 2}})));
    }

    #[test]
    fn type_change_is_update() {
        let diff = diff_records(&rec(json!({"v": 42})), &rec(json!({"v": {"n": 42}})));
        assert_eq!(diff.updated, fields(json!({"v": {"n": 42}})));
        assert!(diff.added.is_empty());
    }

    #[test]
    fn null_value_handling() {
        let diff = diff_records(&rec(json!({"n": null})), &rec(json!({"n": "not null"})));
        assert_eq!(diff.updated, fields(json!({"n": "not null"})));
    }

    #[test]
    fn whole_record_scalar_change() {
        let diff = diff_records(&rec(json!(1)), &rec(json!("one")));
        assert_eq!(diff.updated.get(WHOLE_RECORD), Some(&rec(json!("one"))));
        assert!(diff_records(&rec(json!(1)), &rec(json!(1))).is_empty());
    }

    #[test]
    fn serializes_as_three_mappings() {
        let diff = diff_records(&rec(json!({"v": "x"})), &rec(json!({"v": "y"})));
        assert_eq!(
            serde_json::to_value(&diff).unwrap(),
            json!({"added": {}, "deleted": {}, "updated": {"v": "y"}})
        );
    }
}
