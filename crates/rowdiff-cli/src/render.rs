use std::io::Write;

use colored::Colorize;
use rowdiff_diff::{
    digest, BucketCounts, FieldDiff, KeyDiff, KeyDiffSummary, Multiset, VennDiff, VennSummary,
};
use rowdiff_types::Fields;
use serde::Serialize;

pub fn render_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub fn render_key_diff<W: Write>(
    out: &mut W,
    diff: &KeyDiff,
    show_unchanged: bool,
) -> std::io::Result<()> {
    for entry in &diff.removed {
        writeln!(out, "{} {}  {}", "-".red().bold(), entry.id, entry.data)?;
    }
    for entry in &diff.added {
        writeln!(out, "{} {}  {}", "+".green().bold(), entry.id, entry.data)?;
    }
    for entry in &diff.changed {
        writeln!(out, "{} {}", "~".yellow().bold(), entry.id)?;
        render_field_diff(out, &entry.data)?;
    }
    if show_unchanged {
        for entry in &diff.unchanged {
            writeln!(out, "{}", format!("= {}  {}", entry.id, entry.data).dimmed())?;
        }
    }
    if !diff.is_identical() || show_unchanged {
        writeln!(out)?;
    }
    render_key_summary(out, &diff.summary())
}

fn render_field_diff<W: Write>(out: &mut W, diff: &FieldDiff) -> std::io::Result<()> {
    render_fields(out, &"updated".yellow().to_string(), &diff.updated)?;
    render_fields(out, &"added".green().to_string(), &diff.added)?;
    render_fields(out, &"deleted".red().to_string(), &diff.deleted)
}

fn render_fields<W: Write>(out: &mut W, label: &str, fields: &Fields) -> std::io::Result<()> {
    for (name, value) in fields.iter() {
        writeln!(out, "    {label} {name}: {value}")?;
    }
    Ok(())
}

pub fn render_key_summary<W: Write>(out: &mut W, summary: &KeyDiffSummary) -> std::io::Result<()> {
    write!(
        out,
        "{} added, {} removed, {} changed, {} unchanged",
        summary.added, summary.removed, summary.changed, summary.unchanged
    )?;
    if summary.shadowed > 0 {
        write!(out, " ({} duplicate-key records skipped)", summary.shadowed)?;
    }
    writeln!(out)
}

pub fn render_venn_diff<W: Write>(
    out: &mut W,
    diff: &VennDiff,
    show_common: bool,
) -> std::io::Result<()> {
    render_buckets(out, &"-".red().bold().to_string(), &diff.removed)?;
    render_buckets(out, &"+".green().bold().to_string(), &diff.added)?;
    if show_common {
        render_buckets(out, &"=".dimmed().to_string(), &diff.intersection)?;
    }
    if !diff.is_identical() || show_common {
        writeln!(out)?;
    }
    render_venn_summary(out, &diff.summary())
}

fn render_buckets<W: Write>(out: &mut W, marker: &str, set: &Multiset) -> std::io::Result<()> {
    for (canonical, bucket) in set {
        writeln!(
            out,
            "{marker} [{}] x{}  {}",
            digest(canonical).cyan(),
            bucket.count,
            bucket.record
        )?;
    }
    Ok(())
}

pub fn render_venn_summary<W: Write>(out: &mut W, summary: &VennSummary) -> std::io::Result<()> {
    fn part(counts: &BucketCounts) -> String {
        format!("{} ({} distinct)", counts.records, counts.values)
    }
    writeln!(
        out,
        "removed {}, added {}, common {}",
        part(&summary.removed),
        part(&summary.added),
        part(&summary.intersection)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowdiff_diff::{key_diff, venn_diff};
    use rowdiff_types::Record;
    use serde_json::json;

    fn recs(values: serde_json::Value) -> Vec<Record> {
        match Record::from(values) {
            Record::Sequence(items) => items,
            _ => panic!("expected array fixture"),
        }
    }

    // The colored override is process-wide; every rendering test sets it.
    fn plain() {
        colored::control::set_override(false);
    }

    fn render<F: FnOnce(&mut Vec<u8>) -> std::io::Result<()>>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn key_diff_text() {
        plain();
        let old = recs(json!([{"id": 1, "v": "x"}, {"id": 2}]));
        let new = recs(json!([{"id": 1, "v": "y"}, {"id": 3}]));
        let diff = key_diff(old, new, &["id"]).unwrap();

        let text = render(|out| render_key_diff(out, &diff, false));
        assert!(text.contains("- (2)  {\"id\":2}"), "{text}");
        assert!(text.contains("+ (3)  {\"id\":3}"), "{text}");
        assert!(text.contains("~ (1)"), "{text}");
        assert!(text.contains("updated v: \"y\""), "{text}");
        assert!(text.contains("1 added, 1 removed, 1 changed, 0 unchanged"), "{text}");
    }

    #[test]
    fn unchanged_listed_on_request() {
        plain();
        let records = recs(json!([{"id": 1}]));
        let diff = key_diff(records.clone(), records, &["id"]).unwrap();

        assert!(!render(|out| render_key_diff(out, &diff, false)).contains("= (1)"));
        assert!(render(|out| render_key_diff(out, &diff, true)).contains("= (1)"));
    }

    #[test]
    fn shadowed_records_reported() {
        plain();
        let summary = KeyDiffSummary { shadowed: 2, ..Default::default() };
        let text = render(|out| render_key_summary(out, &summary));
        assert!(text.contains("2 duplicate-key records skipped"));
    }

    #[test]
    fn venn_text() {
        plain();
        let diff = venn_diff(recs(json!([{"a": 1}, {"a": 1}])), recs(json!([{"a": 1}])));
        let text = render(|out| render_venn_diff(out, &diff, true));

        assert!(text.contains("x1  {\"a\":1}"), "{text}");
        assert!(text.contains("removed 1 (1 distinct), added 0 (0 distinct), common 1 (1 distinct)"), "{text}");
    }

    #[test]
    fn json_output_is_parseable() {
        plain();
        let diff = key_diff(recs(json!([{"id": 1}])), vec![], &["id"]).unwrap();
        let mut buf = Vec::new();
        render_json(&mut buf, &diff).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["removed"][0]["id"], json!(["1"]));
    }
}
