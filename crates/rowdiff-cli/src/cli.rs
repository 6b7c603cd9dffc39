use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rowdiff_source::InputFormat;

#[derive(Parser)]
#[command(
    name = "rowdiff",
    about = "Compare two record datasets by key or as multisets",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with default options
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum InputFormatArg {
    Jsonl,
    Json,
}

impl From<InputFormatArg> for InputFormat {
    fn from(arg: InputFormatArg) -> Self {
        match arg {
            InputFormatArg::Jsonl => InputFormat::JsonLines,
            InputFormatArg::Json => InputFormat::JsonArray,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Match records by key and report added, removed and changed records
    Keys(KeysArgs),
    /// Compare datasets as multisets of whole records
    Venn(VennArgs),
}

#[derive(Args)]
pub struct InputArgs {
    /// Old dataset
    pub old: PathBuf,
    /// New dataset
    pub new: PathBuf,
    /// Only load these top-level fields
    #[arg(long, value_delimiter = ',')]
    pub keep: Vec<String>,
    /// Drop these top-level fields
    #[arg(long, value_delimiter = ',')]
    pub ignore: Vec<String>,
    /// Input layout; detected from the file extension by default
    #[arg(long, value_enum)]
    pub input_format: Option<InputFormatArg>,
    /// Print counts only
    #[arg(long)]
    pub summary: bool,
}

#[derive(Args)]
pub struct KeysArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Key field; repeat or comma-separate for a composite key
    #[arg(short = 'k', long = "key", value_delimiter = ',')]
    pub keys: Vec<String>,
    /// Fail on duplicate keys instead of keeping the first occurrence
    #[arg(long)]
    pub strict_keys: bool,
    /// Also list unchanged records
    #[arg(long)]
    pub show_unchanged: bool,
}

#[derive(Args)]
pub struct VennArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Also list records present on both sides
    #[arg(long)]
    pub show_common: bool,
}
