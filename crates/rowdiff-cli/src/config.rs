use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Defaults read from a TOML file. Command-line values take precedence.
///
/// ```toml
/// keys = ["region", "id"]
/// ignore = ["updated_at"]
/// strict_keys = true
/// color = false
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Key fields for `rowdiff keys`.
    pub keys: Vec<String>,
    /// Only load these top-level fields.
    pub keep: Vec<String>,
    /// Drop these top-level fields.
    pub ignore: Vec<String>,
    /// Fail on duplicate keys.
    pub strict_keys: bool,
    /// List unchanged (or common) records.
    pub show_unchanged: bool,
    /// Colorize text output; unset means colorize.
    pub color: Option<bool>,
}

impl CliConfig {
    /// Read a config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read the file at `path`, or return defaults when no path was given.
    pub fn load_optional(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
