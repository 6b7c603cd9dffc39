use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use rowdiff_diff::{key_diff_with, venn_diff, DuplicateKeys, KeyFields};
use rowdiff_source::{FieldSelection, JsonRecordSource, RecordSource};
use rowdiff_types::Record;

use crate::cli::*;
use crate::config::CliConfig;
use crate::render;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::load_optional(cli.config.as_deref())?;
    if cli.no_color || config.color == Some(false) {
        colored::control::set_override(false);
    }
    match cli.command {
        Command::Keys(args) => cmd_keys(args, &config, cli.format).await,
        Command::Venn(args) => cmd_venn(args, &config, cli.format).await,
    }
}

/// Options for a key diff after merging command-line values over the config.
#[derive(Debug)]
pub struct KeysPlan {
    pub keys: KeyFields,
    pub selection: FieldSelection,
    pub duplicates: DuplicateKeys,
    pub show_unchanged: bool,
}

pub fn plan_keys(args: &KeysArgs, config: &CliConfig) -> anyhow::Result<KeysPlan> {
    let key_list = if args.keys.is_empty() {
        config.keys.clone()
    } else {
        args.keys.clone()
    };
    let keys = KeyFields::new(key_list)
        .context("pass --key or set `keys` in the config file")?;
    let selection = plan_selection(&args.input, config)?
        .with_required(keys.as_slice().iter().map(String::as_str));
    let duplicates = if args.strict_keys || config.strict_keys {
        DuplicateKeys::Reject
    } else {
        DuplicateKeys::FirstWins
    };
    Ok(KeysPlan {
        keys,
        selection,
        duplicates,
        show_unchanged: args.show_unchanged || config.show_unchanged,
    })
}

/// Field lists given on the command line replace the config's lists as a
/// pair, so a `--keep` never collides with a configured `ignore`.
pub fn plan_selection(input: &InputArgs, config: &CliConfig) -> anyhow::Result<FieldSelection> {
    let (keep, ignore) = if input.keep.is_empty() && input.ignore.is_empty() {
        (config.keep.clone(), config.ignore.clone())
    } else {
        (input.keep.clone(), input.ignore.clone())
    };
    Ok(FieldSelection::from_lists(keep, ignore)?)
}

fn source_for(input: &InputArgs) -> JsonRecordSource {
    match input.input_format {
        Some(format) => JsonRecordSource::with_format(format.into()),
        None => JsonRecordSource::new(),
    }
}

/// Load both inputs concurrently on the blocking pool.
pub async fn load_pair<S>(
    source: Arc<S>,
    old: PathBuf,
    new: PathBuf,
    selection: FieldSelection,
) -> anyhow::Result<(Vec<Record>, Vec<Record>)>
where
    S: RecordSource + 'static,
{
    let selection = Arc::new(selection);
    let old_task = spawn_load(Arc::clone(&source), old, Arc::clone(&selection));
    let new_task = spawn_load(source, new, selection);
    let (old_records, new_records) = tokio::try_join!(old_task, new_task)?;
    Ok((old_records?, new_records?))
}

fn spawn_load<S>(
    source: Arc<S>,
    path: PathBuf,
    selection: Arc<FieldSelection>,
) -> tokio::task::JoinHandle<anyhow::Result<Vec<Record>>>
where
    S: RecordSource + 'static,
{
    tokio::task::spawn_blocking(move || {
        source
            .load(&path, &selection)
            .with_context(|| format!("loading {}", path.display()))
    })
}

async fn cmd_keys(args: KeysArgs, config: &CliConfig, format: OutputFormat) -> anyhow::Result<()> {
    let plan = plan_keys(&args, config)?;
    let source = Arc::new(source_for(&args.input));
    let (old, new) = load_pair(
        source,
        args.input.old.clone(),
        args.input.new.clone(),
        plan.selection.clone(),
    )
    .await?;

    tracing::info!(old = old.len(), new = new.len(), keys = ?plan.keys.as_slice(), "comparing by key");
    let diff = key_diff_with(old, new, &plan.keys, plan.duplicates)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match (format, args.input.summary) {
        (OutputFormat::Json, true) => render::render_json(&mut out, &diff.summary())?,
        (OutputFormat::Json, false) => render::render_json(&mut out, &diff)?,
        (OutputFormat::Text, true) => render::render_key_summary(&mut out, &diff.summary())?,
        (OutputFormat::Text, false) => render::render_key_diff(&mut out, &diff, plan.show_unchanged)?,
    }
    Ok(())
}

async fn cmd_venn(args: VennArgs, config: &CliConfig, format: OutputFormat) -> anyhow::Result<()> {
    let selection = plan_selection(&args.input, config)?;
    let source = Arc::new(source_for(&args.input));
    let (old, new) = load_pair(source, args.input.old.clone(), args.input.new.clone(), selection).await?;

    tracing::info!(old = old.len(), new = new.len(), "comparing as multisets");
    let diff = venn_diff(old, new);

    let show_common = args.show_common || config.show_unchanged;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match (format, args.input.summary) {
        (OutputFormat::Json, true) => render::render_json(&mut out, &diff.summary())?,
        (OutputFormat::Json, false) => render::render_json(&mut out, &diff)?,
        (OutputFormat::Text, true) => render::render_venn_summary(&mut out, &diff.summary())?,
        (OutputFormat::Text, false) => render::render_venn_diff(&mut out, &diff, show_common)?,
    }
    Ok(())
}
