//! Canonical serialization: an order-independent string identity for records.
//!
//! The canonical form is JSON text with mapping keys sorted lexicographically
//! at every depth. Strings use JSON escaping and numbers their JSON text, so
//! the encoding is injective: structurally equal records produce the same
//! string and unequal records never do.

use rowdiff_types::Record;
use serde_json::{Map, Value};

/// Deterministic string form of a record, independent of field order.
pub fn canonical_string(record: &Record) -> String {
    canonical_value(record).to_string()
}

/// Short BLAKE3 digest of a canonical string, for labelling values in output.
pub fn digest(canonical: &str) -> String {
    let hash = blake3::hash(canonical.as_bytes());
    hex::encode(&hash.as_bytes()[..4])
}

fn canonical_value(record: &Record) -> Value {
    match record {
        Record::Mapping(fields) => {
            let mut entries: Vec<_> = fields.iter().collect();
            entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
            let mut map = Map::with_capacity(entries.len());
            for (name, value) in entries {
                map.insert(name.to_string(), canonical_value(value));
            }
            Value::Object(map)
        }
        Record::Sequence(items) => Value::Array(items.iter().map(canonical_value).collect()),
        scalar => scalar.to_value(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rowdiff_types::Fields;
    use serde_json::json;

    fn canon(value: Value) -> String {
        canonical_string(&Record::from(value))
    }

    #[test]
    fn field_order_does_not_matter() {
        assert_eq!(
            canon(json!({"b": 1, "a": {"d": [1, {"y": 1, "x": 2}], "c": null}})),
            canon(json!({"a": {"c": null, "d": [1, {"x": 2, "y": 1}]}, "b": 1}))
        );
    }

    #[test]
    fn keys_sorted_at_every_depth() {
        assert_eq!(
            canon(json!({"z": {"b": 1, "a": 2}, "m": true})),
            r#"{"m":true,"z":{"a":2,"b":1}}"#
        );
    }

    #[test]
    fn sequence_order_matters() {
        assert_ne!(canon(json!([1, 2])), canon(json!([2, 1])));
    }

    #[test]
    fn scalar_types_do_not_collide() {
        let forms = [
            canon(json!(1)),
            canon(json!("1")),
            canon(json!(1.0)),
            canon(json!(true)),
            canon(json!("true")),
            canon(json!(null)),
            canon(json!("null")),
        ];
        for (i, a) in forms.iter().enumerate() {
            for b in &forms[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn signed_zero_follows_record_equality() {
        let neg = Record::from(json!({"id": 1, "x": -0.0}));
        let pos = Record::from(json!({"id": 1, "x": 0.0}));
        assert_ne!(neg, pos);
        assert_ne!(canonical_string(&neg), canonical_string(&pos));
        assert_eq!(canonical_string(&neg), r#"{"id":1,"x":-0.0}"#);
    }

    #[test]
    fn strings_are_escaped() {
        // A field name containing quote characters must not be confusable
        // with two separate fields.
        assert_ne!(
            canon(json!({"a\":1,\"b": 2})),
            canon(json!({"a": 1, "b": 2}))
        );
    }

    #[test]
    fn digest_is_stable_and_short() {
        let c = canon(json!({"a": 1}));
        assert_eq!(digest(&c), digest(&c));
        assert_eq!(digest(&c).len(), 8);
        assert_ne!(digest(&c), digest(&canon(json!({"a": 2}))));
    }

    // Small value domains so that generated pairs collide often.
    fn arb_record() -> impl Strategy<Value = Record> {
        let leaf = prop_oneof![
            Just(Record::Null),
            any::<bool>().prop_map(Record::from),
            (0i64..3).prop_map(Record::from),
            prop::sample::select(vec![0.0, -0.0, 1.0, 1.5]).prop_map(Record::from),
            prop::sample::select(vec!["a", "b", "1"]).prop_map(Record::from),
        ];
        leaf.prop_recursive(3, 24, 3, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..3).prop_map(Record::from),
                (
                    prop::collection::btree_map(prop::sample::select(vec!["x", "y", "z"]), inner, 0..3),
                    any::<bool>(),
                )
                    .prop_map(|(map, reversed)| {
                        let fields: Fields = if reversed {
                            map.into_iter().rev().collect()
                        } else {
                            map.into_iter().collect()
                        };
                        Record::Mapping(fields)
                    }),
            ]
        })
    }

    proptest! {
        #[test]
        fn equality_matches_canonical_form(a in arb_record(), b in arb_record()) {
            prop_assert_eq!(a == b, canonical_string(&a) == canonical_string(&b));
        }

        #[test]
        fn field_order_never_changes_canonical_form(a in arb_record()) {
            let reordered = reverse_fields(&a);
            prop_assert_eq!(&a, &reordered);
            prop_assert_eq!(canonical_string(&a), canonical_string(&reordered));
        }
    }

    fn reverse_fields(record: &Record) -> Record {
        match record {
            Record::Mapping(fields) => {
                let mut entries: Vec<_> = fields.iter().collect();
                entries.reverse();
                Record::Mapping(entries.into_iter().map(|(k, v)| (k, reverse_fields(v))).collect())
            }
            Record::Sequence(items) => Record::from(items.iter().map(reverse_fields).collect::<Vec<_>>()),
            scalar => scalar.clone(),
        }
    }
}
