//! List command implementation

use anyhow::Result;
use bangs_core::{Entry, Registry};

use crate::cli::OutputFormat;

/// Print the loaded bangs sorted by name, optionally limited to a category.
pub fn execute(registry: &Registry, category: Option<&str>, format: OutputFormat) -> Result<()> {
    let entries = select(registry, category);

    match format {
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("No bangs found.");
            }
            for entry in &entries {
                println!("{}", format_entry(entry));
            }
        },
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
    }
    Ok(())
}

fn select<'r>(registry: &'r Registry, category: Option<&str>) -> Vec<&'r Entry> {
    registry
        .bangs()
        .iter()
        .filter(|entry| category.is_none_or(|c| entry.category.eq_ignore_ascii_case(c)))
        .collect()
}

fn format_entry(entry: &Entry) -> String {
    let mut line = format!("!{:<8} {} - {}", entry.bang, entry.name, entry.url);
    if !entry.category.is_empty() {
        line.push_str(&format!(" [{}]", entry.category));
    }
    if !entry.description.is_empty() {
        line.push_str(&format!("\n          {}", entry.description));
    }
    line
}
