//! Record sources for rowdiff.
//!
//! A record source turns an input file into the ordered sequence of
//! [`Record`](rowdiff_types::Record)s the diff engines consume, applying the
//! caller's [`FieldSelection`] on the way. The diff engines never see files,
//! formats or decode errors; everything that can fail on input is reported
//! here.
//!
//! # Sources
//!
//! All sources implement the [`RecordSource`] trait:
//!
//! - [`JsonRecordSource`] -- JSON Lines or JSON array files
//! - [`InMemoryRecordSource`] -- `HashMap`-based source for tests and embedding

pub mod error;
pub mod json;
pub mod memory;
pub mod selection;
pub mod traits;

pub use error::{SourceError, SourceResult};
pub use json::{InputFormat, JsonRecordSource};
pub use memory::InMemoryRecordSource;
pub use selection::FieldSelection;
pub use traits::RecordSource;
