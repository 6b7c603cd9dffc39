use rowdiff_types::Record;
use serde::{Deserialize, Serialize};

use crate::error::{SourceError, SourceResult};

/// Which top-level fields of each record to load.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldSelection {
    /// Keep every field.
    #[default]
    All,
    /// Keep only the listed fields.
    Keep(Vec<String>),
    /// Drop the listed fields.
    Ignore(Vec<String>),
}

impl FieldSelection {
    /// Build a selection from optional keep and ignore lists.
    ///
    /// Empty lists count as absent. Giving both is an error.
    pub fn from_lists(keep: Vec<String>, ignore: Vec<String>) -> SourceResult<Self> {
        match (keep.is_empty(), ignore.is_empty()) {
            (true, true) => Ok(FieldSelection::All),
            (false, true) => Ok(FieldSelection::Keep(keep)),
            (true, false) => Ok(FieldSelection::Ignore(ignore)),
            (false, false) => Err(SourceError::ConflictingSelection),
        }
    }

    /// Make sure `required` fields survive the selection.
    ///
    /// Key fields must stay on the records for a key diff to match them, so
    /// they are appended to a keep-list and removed from an ignore-list.
    pub fn with_required<'a>(self, required: impl IntoIterator<Item = &'a str>) -> Self {
        match self {
            FieldSelection::All => FieldSelection::All,
            FieldSelection::Keep(mut keep) => {
                for field in required {
                    if !keep.iter().any(|k| k == field) {
                        keep.push(field.to_string());
                    }
                }
                FieldSelection::Keep(keep)
            }
            FieldSelection::Ignore(ignore) => {
                let required: Vec<&str> = required.into_iter().collect();
                FieldSelection::Ignore(
                    ignore
                        .into_iter()
                        .filter(|f| !required.contains(&f.as_str()))
                        .collect(),
                )
            }
        }
    }

    /// Returns `true` if the selection keeps every field.
    pub fn is_all(&self) -> bool {
        matches!(self, FieldSelection::All)
    }

    /// Whether a top-level field survives the selection.
    pub fn keeps(&self, field: &str) -> bool {
        match self {
            FieldSelection::All => true,
            FieldSelection::Keep(keep) => keep.iter().any(|k| k == field),
            FieldSelection::Ignore(ignore) => !ignore.iter().any(|i| i == field),
        }
    }

    /// Project a record. Non-mapping records pass through unchanged.
    pub fn apply(&self, record: Record) -> Record {
        match record {
            Record::Mapping(mut fields) if !self.is_all() => {
                fields.retain(|name, _| self.keeps(name));
                Record::Mapping(fields)
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn from_lists_variants() {
        assert_eq!(FieldSelection::from_lists(vec![], vec![]).unwrap(), FieldSelection::All);
        assert_eq!(
            FieldSelection::from_lists(names(&["a"]), vec![]).unwrap(),
            FieldSelection::Keep(names(&["a"]))
        );
        assert_eq!(
            FieldSelection::from_lists(vec![], names(&["b"])).unwrap(),
            FieldSelection::Ignore(names(&["b"]))
        );
        assert!(matches!(
            FieldSelection::from_lists(names(&["a"]), names(&["b"])),
            Err(SourceError::ConflictingSelection)
        ));
    }

    #[test]
    fn keep_projects_fields_in_record_order() {
        let selection = FieldSelection::Keep(names(&["c", "a"]));
        let record = selection.apply(Record::from(json!({"a": 1, "b": 2, "c": 3})));
        let keys: Vec<_> = record.as_fields().unwrap().keys().collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn ignore_drops_fields() {
        let selection = FieldSelection::Ignore(names(&["b"]));
        let record = selection.apply(Record::from(json!({"a": 1, "b": 2})));
        assert_eq!(record, Record::from(json!({"a": 1})));
    }

    #[test]
    fn selection_only_touches_top_level() {
        let selection = FieldSelection::Ignore(names(&["x"]));
        let record = selection.apply(Record::from(json!({"n": {"x": 1}})));
        assert_eq!(record, Record::from(json!({"n": {"x": 1}})));
    }

    #[test]
    fn scalars_pass_through() {
        let selection = FieldSelection::Keep(names(&["a"]));
        assert_eq!(selection.apply(Record::from(5)), Record::from(5));
    }

    #[test]
    fn required_fields_survive() {
        let keep = FieldSelection::Keep(names(&["v"])).with_required(["id", "v"]);
        assert_eq!(keep, FieldSelection::Keep(names(&["v", "id"])));

        let ignore = FieldSelection::Ignore(names(&["id", "noise"])).with_required(["id"]);
        assert_eq!(ignore, FieldSelection::Ignore(names(&["noise"])));
    }
}
