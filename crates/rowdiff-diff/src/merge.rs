//! Key-based diff: sort both datasets by composite key and merge-join them.
//!
//! Each record lands in exactly one of `removed` (key only in old), `added`
//! (key only in new), `changed` (key on both sides, non-empty field diff) or
//! `unchanged`. All four lists come out in ascending key order.

use std::fmt;
use std::iter::Peekable;

use rowdiff_types::Record;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{DiffError, DiffResult};
use crate::field_diff::{diff_records, FieldDiff};
use crate::key::{compare_keys, CompositeKey, KeyFields};

/// Which input a record came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Old,
    New,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Old => f.write_str("old"),
            Side::New => f.write_str("new"),
        }
    }
}

/// What to do when several records on one side share a composite key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateKeys {
    /// Keep the first record in input order; later ones are shadowed and
    /// left out of the classification.
    #[default]
    FirstWins,
    /// Fail with [`DiffError::DuplicateKey`].
    Reject,
}

/// One classified record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiffEntry<T> {
    pub id: CompositeKey,
    pub data: T,
}

/// The result of a key diff.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct KeyDiff {
    /// Records whose key only exists in the new dataset.
    pub added: Vec<DiffEntry<Record>>,
    /// Records whose key only exists in the old dataset.
    pub removed: Vec<DiffEntry<Record>>,
    /// Keys on both sides whose records differ, with the field diff.
    pub changed: Vec<DiffEntry<FieldDiff>>,
    /// Keys on both sides whose records are equal, with the new record.
    pub unchanged: Vec<DiffEntry<Record>>,
    /// Records dropped because an earlier record on the same side had the
    /// same key.
    pub shadowed: usize,
}

impl KeyDiff {
    /// Create an empty key diff.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if nothing was added, removed or changed.
    pub fn is_identical(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }

    pub fn summary(&self) -> KeyDiffSummary {
        KeyDiffSummary {
            added: self.added.len(),
            removed: self.removed.len(),
            changed: self.changed.len(),
            unchanged: self.unchanged.len(),
            shadowed: self.shadowed,
        }
    }
}

/// Per-category record counts of a [`KeyDiff`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct KeyDiffSummary {
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
    pub unchanged: usize,
    pub shadowed: usize,
}

/// Compare two datasets by the given key fields.
///
/// Fails with [`DiffError::EmptyKeySpec`] if `key_fields` is empty. Duplicate
/// keys follow [`DuplicateKeys::FirstWins`].
pub fn key_diff<S: AsRef<str>>(
    old: Vec<Record>,
    new: Vec<Record>,
    key_fields: &[S],
) -> DiffResult<KeyDiff> {
    let keys = KeyFields::new(key_fields.iter().map(|f| f.as_ref()))?;
    key_diff_with(old, new, &keys, DuplicateKeys::default())
}

/// Compare two datasets with a pre-validated key and an explicit duplicate
/// key policy.
pub fn key_diff_with(
    old: Vec<Record>,
    new: Vec<Record>,
    keys: &KeyFields,
    duplicates: DuplicateKeys,
) -> DiffResult<KeyDiff> {
    debug!(
        old = old.len(),
        new = new.len(),
        keys = ?keys.as_slice(),
        "starting key diff"
    );

    let (old_sorted, old_shadowed) = sort_side(old, keys, Side::Old, duplicates)?;
    let (new_sorted, new_shadowed) = sort_side(new, keys, Side::New, duplicates)?;

    let mut diff = merge_sorted(old_sorted.into_iter().peekable(), new_sorted.into_iter().peekable());
    diff.shadowed = old_shadowed + new_shadowed;

    debug!(
        added = diff.added.len(),
        removed = diff.removed.len(),
        changed = diff.changed.len(),
        unchanged = diff.unchanged.len(),
        "key diff complete"
    );
    Ok(diff)
}

type Keyed = (CompositeKey, Record);

/// Compute keys once, stable-sort by them, then apply the duplicate policy.
///
/// Stability means equal keys keep input order, so the first record of each
/// run is the first occurrence in the input.
fn sort_side(
    records: Vec<Record>,
    keys: &KeyFields,
    side: Side,
    duplicates: DuplicateKeys,
) -> DiffResult<(Vec<Keyed>, usize)> {
    let mut keyed: Vec<Keyed> = records
        .into_iter()
        .map(|record| (keys.extract(&record), record))
        .collect();
    keyed.sort_by(|a, b| compare_keys(Some(&a.0), Some(&b.0)));

    let before = keyed.len();
    match duplicates {
        DuplicateKeys::Reject => {
            if let Some(pair) = keyed.windows(2).find(|w| w[0].0 == w[1].0) {
                return Err(DiffError::DuplicateKey {
                    side,
                    key: pair[0].0.clone(),
                });
            }
        }
        DuplicateKeys::FirstWins => keyed.dedup_by(|later, earlier| later.0 == earlier.0),
    }

    let shadowed = before - keyed.len();
    if shadowed > 0 {
        warn!(%side, shadowed, "duplicate keys: later records shadowed by the first occurrence");
    }
    Ok((keyed, shadowed))
}

/// Walk both sorted sides in lockstep. An exhausted side presents the `None`
/// sentinel, which sorts after every key; the walk ends when both do.
fn merge_sorted<O, N>(mut olds: Peekable<O>, mut news: Peekable<N>) -> KeyDiff
where
    O: Iterator<Item = Keyed>,
    N: Iterator<Item = Keyed>,
{
    let mut diff = KeyDiff::new();

    loop {
        let order = compare_keys(
            olds.peek().map(|(k, _)| k),
            news.peek().map(|(k, _)| k),
        );
        match order {
            std::cmp::Ordering::Less => {
                if let Some((id, data)) = olds.next() {
                    diff.removed.push(DiffEntry { id, data });
                }
            }
            std::cmp::Ordering::Greater => {
                if let Some((id, data)) = news.next() {
                    diff.added.push(DiffEntry { id, data });
                }
            }
            std::cmp::Ordering::Equal => match (olds.next(), news.next()) {
                (Some((_, old_record)), Some((id, new_record))) => {
                    let fields = diff_records(&old_record, &new_record);
                    if fields.is_empty() {
                        diff.unchanged.push(DiffEntry { id, data: new_record });
                    } else {
                        diff.changed.push(DiffEntry { id, data: fields });
                    }
                }
                _ => break,
            },
        }
    }

    diff
}
