use std::path::Path;

use anyhow::{Context, Result};

use gamefeed_core::parse_feed;

pub fn run(path: &Path, json: bool) -> Result<()> {
    let content = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let parsed = parse_feed(&content);

    if let Some(error) = &parsed.error {
        eprintln!("Parsing stopped early: {}", error);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&parsed.entries)?);
        return Ok(());
    }

    println!("{} entries in {}:\n", parsed.entries.len(), path.display());
    for entry in &parsed.entries {
        super::print_entry(entry);
    }

    Ok(())
}
