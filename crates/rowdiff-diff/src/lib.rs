//! Diff engines for rowdiff.
//!
//! Compares two datasets of decoded records, either by a caller-supplied
//! composite key or as multisets of whole records. Both engines are
//! synchronous and pure: they take fully materialized inputs, keep no state
//! between calls, and never perform I/O.
//!
//! # Key Types
//!
//! - [`KeyDiff`] / [`DiffEntry`] -- Merge-join result (added/removed/changed/unchanged)
//! - [`FieldDiff`] -- Structural diff between two records with the same key
//! - [`VennDiff`] / [`VennBucket`] -- Multiset result (removed/added/intersection)
//! - [`CompositeKey`] / [`KeyFields`] -- Key extraction and ordering

pub mod canonical;
pub mod error;
pub mod field_diff;
pub mod key;
pub mod merge;
pub mod venn;

pub use canonical::{canonical_string, digest};
pub use error::{DiffError, DiffResult};
pub use field_diff::{diff_records, FieldDiff};
pub use key::{compare_keys, composite_key, CompositeKey, KeyFields, MISSING_FIELD};
pub use merge::{
    key_diff, key_diff_with, DiffEntry, DuplicateKeys, KeyDiff, KeyDiffSummary, Side,
};
pub use venn::{
    venn_diff, BucketCounts, Multiset, VennBucket, VennCounter, VennDiff, VennNewPhase,
    VennSummary,
};
