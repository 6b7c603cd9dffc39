//! Record model for rowdiff.
//!
//! Every other rowdiff crate depends on `rowdiff-types`. A [`Record`] is the
//! generic shape of one decoded row: a recursive value that is either a
//! scalar, a sequence, or a mapping of named fields.
//!
//! # Key Types
//!
//! - [`Record`] — Recursive value (null, boolean, number, string, sequence, mapping)
//! - [`Fields`] — Insertion-ordered field mapping with order-insensitive equality
//! - [`TypeError`] — Parse and shape errors

pub mod error;
pub mod fields;
pub mod record;

pub use error::TypeError;
pub use fields::Fields;
pub use record::Record;
