use std::path::Path;

use rowdiff_types::Record;

use crate::error::SourceResult;
use crate::selection::FieldSelection;

/// Produces the ordered records of one input.
///
/// Implementations own decoding entirely: the diff engines only see the
/// resulting records, already projected through `selection`.
/// - Records are returned in input order.
/// - Decode and I/O failures are reported as errors, never as partial output.
/// - Loading is read-only, so concurrent loads of different inputs are safe.
pub trait RecordSource: Send + Sync {
    /// Load every record of `path`, projected through `selection`.
    fn load(&self, path: &Path, selection: &FieldSelection) -> SourceResult<Vec<Record>>;
}
