//! JSON record source: JSON Lines files or JSON documents holding an array.

use std::path::Path;

use rowdiff_types::{Record, TypeError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{SourceError, SourceResult};
use crate::selection::FieldSelection;
use crate::traits::RecordSource;

/// On-disk layout of a JSON input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputFormat {
    /// One record per line; blank lines are skipped.
    JsonLines,
    /// A single JSON array of records.
    JsonArray,
}

impl InputFormat {
    /// Pick a format from the file extension: `.json` is an array, anything
    /// else (`.jsonl`, `.ndjson`, no extension) is JSON Lines.
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => InputFormat::JsonArray,
            _ => InputFormat::JsonLines,
        }
    }
}

/// Reads records from JSON files on the local file system.
#[derive(Clone, Debug, Default)]
pub struct JsonRecordSource {
    format: Option<InputFormat>,
}

impl JsonRecordSource {
    /// A source that detects the format of each file from its extension.
    pub fn new() -> Self {
        Self::default()
    }

    /// A source that reads every file in `format`.
    pub fn with_format(format: InputFormat) -> Self {
        Self {
            format: Some(format),
        }
    }

    /// Decode already-read text. `path` is only used in error messages.
    pub fn decode(
        &self,
        path: &Path,
        text: &str,
        selection: &FieldSelection,
    ) -> SourceResult<Vec<Record>> {
        match self.format.unwrap_or_else(|| InputFormat::detect(path)) {
            InputFormat::JsonLines => decode_lines(path, text, selection),
            InputFormat::JsonArray => decode_array(path, text, selection),
        }
    }
}

impl RecordSource for JsonRecordSource {
    fn load(&self, path: &Path, selection: &FieldSelection) -> SourceResult<Vec<Record>> {
        let text = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records = self.decode(path, &text, selection)?;
        debug!(path = %path.display(), records = records.len(), "loaded records");
        Ok(records)
    }
}

fn decode_lines(path: &Path, text: &str, selection: &FieldSelection) -> SourceResult<Vec<Record>> {
    let mut records = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record = Record::from_json_str(line).map_err(|source| SourceError::Parse {
            path: path.to_path_buf(),
            line: index + 1,
            source,
        })?;
        records.push(selection.apply(record));
    }
    Ok(records)
}

fn decode_array(path: &Path, text: &str, selection: &FieldSelection) -> SourceResult<Vec<Record>> {
    let value: Value = serde_json::from_str(text).map_err(|e| SourceError::Parse {
        path: path.to_path_buf(),
        line: e.line(),
        source: TypeError::Parse(e.to_string()),
    })?;
    match Record::from(value) {
        Record::Sequence(items) => Ok(items.into_iter().map(|r| selection.apply(r)).collect()),
        other => Err(SourceError::NotAnArray {
            path: path.to_path_buf(),
            actual: other.type_name(),
        }),
    }
}
