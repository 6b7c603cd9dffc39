//! Multiset ("venn") diff: compare datasets as bags of whole records.
//!
//! Records are identified by their canonical form. Old records are counted
//! first; each new record then either consumes one matching old occurrence
//! (moving it to the intersection) or counts as added. Whatever remains on
//! the old side is removed.
//!
//! The old side must be fully counted before the first new record is seen.
//! [`VennCounter`] and [`VennNewPhase`] enforce that order in the types.

use std::collections::BTreeMap;

use rowdiff_types::Record;
use serde::Serialize;
use tracing::debug;

use crate::canonical::canonical_string;

/// A distinct value and how many times it occurs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VennBucket {
    /// The first record that produced this bucket.
    pub record: Record,
    /// Occurrences; always positive.
    pub count: usize,
}

/// Buckets keyed by canonical form.
pub type Multiset = BTreeMap<String, VennBucket>;

/// The result of a venn diff.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VennDiff {
    /// Occurrences only in the old dataset.
    pub removed: Multiset,
    /// Occurrences only in the new dataset.
    pub added: Multiset,
    /// Occurrences present on both sides.
    pub intersection: Multiset,
}

impl VennDiff {
    /// Returns `true` if both datasets hold the same multiset of records.
    pub fn is_identical(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }

    pub fn summary(&self) -> VennSummary {
        VennSummary {
            removed: BucketCounts::of(&self.removed),
            added: BucketCounts::of(&self.added),
            intersection: BucketCounts::of(&self.intersection),
        }
    }
}

/// Distinct values and total occurrences of one multiset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BucketCounts {
    pub values: usize,
    pub records: usize,
}

impl BucketCounts {
    fn of(set: &Multiset) -> Self {
        Self {
            values: set.len(),
            records: set.values().map(|b| b.count).sum(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VennSummary {
    pub removed: BucketCounts,
    pub added: BucketCounts,
    pub intersection: BucketCounts,
}

/// First phase of a venn diff: counts old records.
#[derive(Debug, Default)]
pub struct VennCounter {
    removed: Multiset,
    old_records: usize,
}

impl VennCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one old record.
    pub fn observe_old(&mut self, record: Record) {
        self.old_records += 1;
        let canonical = canonical_string(&record);
        bump(&mut self.removed, canonical, record);
    }

    /// Finish the old side and start matching new records.
    pub fn into_new_phase(self) -> VennNewPhase {
        debug!(
            records = self.old_records,
            distinct = self.removed.len(),
            "venn: old side counted"
        );
        VennNewPhase {
            removed: self.removed,
            added: Multiset::new(),
            intersection: Multiset::new(),
            new_records: 0,
        }
    }
}

/// Second phase of a venn diff: matches new records against the old counts.
#[derive(Debug)]
pub struct VennNewPhase {
    removed: Multiset,
    added: Multiset,
    intersection: Multiset,
    new_records: usize,
}

impl VennNewPhase {
    /// Classify one new record.
    pub fn observe_new(&mut self, record: Record) {
        self.new_records += 1;
        let canonical = canonical_string(&record);
        match self.removed.get_mut(&canonical) {
            Some(bucket) => {
                bucket.count -= 1;
                if bucket.count == 0 {
                    self.removed.remove(&canonical);
                }
                bump(&mut self.intersection, canonical, record);
            }
            None => bump(&mut self.added, canonical, record),
        }
    }

    pub fn finish(self) -> VennDiff {
        debug!(
            records = self.new_records,
            added = self.added.len(),
            intersection = self.intersection.len(),
            removed = self.removed.len(),
            "venn diff complete"
        );
        VennDiff {
            removed: self.removed,
            added: self.added,
            intersection: self.intersection,
        }
    }
}

fn bump(set: &mut Multiset, canonical: String, record: Record) {
    set.entry(canonical)
        .and_modify(|bucket| bucket.count += 1)
        .or_insert(VennBucket { record, count: 1 });
}

/// Compare two datasets as multisets of whole records.
///
/// `old` is drained completely before `new` is read, so either side may be a
/// lazy record stream.
pub fn venn_diff<O, N>(old: O, new: N) -> VennDiff
where
    O: IntoIterator<Item = Record>,
    N: IntoIterator<Item = Record>,
{
    let mut counter = VennCounter::new();
    for record in old {
        counter.observe_old(record);
    }
    let mut matcher = counter.into_new_phase();
    for record in new {
        matcher.observe_new(record);
    }
    matcher.finish()
}
