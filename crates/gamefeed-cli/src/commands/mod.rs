pub mod classify;
pub mod config;
pub mod news;
pub mod parse;
pub mod sources;

use gamefeed_core::NewsEntry;

/// Two-line listing used by `news` and `parse`
pub fn print_entry(entry: &NewsEntry) {
    println!("  [{}] {}", entry.kind.label(), entry.title);

    let published = entry
        .published
        .map(|p| p.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "undated".to_string());
    match &entry.link {
        Some(link) => println!("    {} | {} | {}", entry.source, published, link),
        None => println!("    {} | {}", entry.source, published),
    }
}
