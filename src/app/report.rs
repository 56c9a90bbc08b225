use crate::app::models::Collection;
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Local, Utc};
use std::fs;
use std::path::Path;

const RULE_WIDTH: usize = 80;
const SUBRULE_WIDTH: usize = 40;

/// Source of the report's "Generated at" block.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

pub struct ReportWriter<C: Clock> {
    clock: C,
}

impl<C: Clock> ReportWriter<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Full report document. Everything before the "Generated at" block is
    /// deterministic for a given collection and tree.
    pub fn render(&self, collection: &Collection, tree_lines: &[String]) -> String {
        let blocks: Vec<String> = collection
            .records
            .iter()
            .map(|r| format!("--- {} ---\n{}\n", r.relative_path, r.content))
            .collect();

        let mut out = blocks.join("\n");

        let rule = "=".repeat(RULE_WIDTH);
        let subrule = "-".repeat(SUBRULE_WIDTH);

        out.push_str(&format!("\n{}\nMETADATA\n{}\n\n", rule, rule));
        out.push_str(&format!("Files Parsed: {}\n", collection.len()));
        out.push_str(&format!("Total Characters: {}\n\n", collection.total_chars()));

        out.push_str("File List:\n");
        out.push_str(&subrule);
        out.push('\n');
        let mut sorted = collection.stats();
        sorted.sort();
        for (path, count) in sorted {
            out.push_str(&format!("{}: {} characters\n", path, count));
        }

        out.push_str("\nDirectory Structure:\n");
        out.push_str(&subrule);
        out.push('\n');
        for line in tree_lines {
            out.push_str(line);
            out.push('\n');
        }

        out.push_str(&timestamp_block(self.clock.now()));
        out
    }

    /// Renders and writes the report in one pass, creating the parent directory if needed.
    pub fn write(&self, path: &Path, collection: &Collection, tree_lines: &[String]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory {:?}", parent))?;
        }

        let document = self.render(collection, tree_lines);
        fs::write(path, document).with_context(|| format!("Failed to write report to {:?}", path))
    }
}

/// Statistics and tree echoed to the console, in walk order.
pub fn console_summary(collection: &Collection, tree_lines: &[String]) -> String {
    let mut out = String::from("\nFile Character Counts:\n");
    for (path, count) in collection.stats() {
        out.push_str(&format!("{}: {} characters\n", path, count));
    }

    out.push_str("\nDirectory Structure:\n");
    out.push_str(&"-".repeat(SUBRULE_WIDTH));
    out.push('\n');
    for line in tree_lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}

fn timestamp_block(now: DateTime<FixedOffset>) -> String {
    let utc = now.with_timezone(&Utc);
    format!(
        "\nGenerated at:\nLocal: {}\nUTC:   {}\nTimestamp: {}\n",
        now.format("%Y-%m-%d %H:%M:%S %Z"),
        utc.format("%Y-%m-%d %H:%M:%S UTC"),
        now.timestamp()
    )
}
