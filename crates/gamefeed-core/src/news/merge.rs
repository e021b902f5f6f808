use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Duration, Utc};

use crate::feed::NewsEntry;

/// Oldest publication time that survives a reload started at `now`
///
/// A window reaching past the earliest representable time keeps everything.
pub fn recency_cutoff(now: DateTime<Utc>, recency_days: u32) -> DateTime<Utc> {
    Duration::try_days(i64::from(recency_days))
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Merge entries from all sources into one diversified list
///
/// Entries published before `cutoff` are dropped; undated entries are kept.
/// The rest are sorted newest first (undated last), grouped by source, and
/// the groups are drained round-robin in order of each group's newest entry
/// until they run dry or `cap` entries have been taken.
pub fn merge_sources(
    entries: Vec<NewsEntry>,
    cutoff: DateTime<Utc>,
    cap: usize,
) -> Vec<NewsEntry> {
    let mut recent: Vec<NewsEntry> = entries
        .into_iter()
        .filter(|entry| entry.published.map_or(true, |published| published >= cutoff))
        .collect();

    // Option orders None first, so reversing puts undated entries last
    recent.sort_by(|a, b| b.published.cmp(&a.published));

    let mut groups = group_by_source(recent);
    groups.sort_by(|a, b| b.newest.cmp(&a.newest));

    interleave(groups, cap)
}

struct SourceGroup {
    newest: Option<DateTime<Utc>>,
    entries: VecDeque<NewsEntry>,
}

/// Groups in first-appearance order; input is already newest first
fn group_by_source(sorted: Vec<NewsEntry>) -> Vec<SourceGroup> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<SourceGroup> = Vec::new();

    for entry in sorted {
        let slot = *index.entry(entry.source.clone()).or_insert_with(|| {
            groups.push(SourceGroup {
                newest: entry.published,
                entries: VecDeque::new(),
            });
            groups.len() - 1
        });
        groups[slot].entries.push_back(entry);
    }

    groups
}

fn interleave(mut groups: Vec<SourceGroup>, cap: usize) -> Vec<NewsEntry> {
    let total: usize = groups.iter().map(|group| group.entries.len()).sum();
    let mut merged = Vec::with_capacity(total.min(cap));

    'rounds: loop {
        let mut took_any = false;
        for group in groups.iter_mut() {
            if merged.len() >= cap {
                break 'rounds;
            }
            if let Some(entry) = group.entries.pop_front() {
                merged.push(entry);
                took_any = true;
            }
        }
        if !took_any {
            break;
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::NewsKind;

    fn entry(title: &str, source: &str, hours_ago: Option<i64>, now: DateTime<Utc>) -> NewsEntry {
        NewsEntry::new(title, source, NewsKind::News)
            .with_published(hours_ago.map(|hours| now - Duration::hours(hours)))
    }

    fn titles(entries: &[NewsEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.title.as_str()).collect()
    }

    #[test]
    fn test_round_robin_by_group_recency() {
        let now = Utc::now();
        let entries = vec![
            entry("A1", "a", Some(1), now),
            entry("A2", "a", Some(5), now),
            entry("A3", "a", Some(6), now),
            entry("B1", "b", Some(3), now),
            entry("C1", "c", Some(2), now),
            entry("C2", "c", Some(4), now),
            entry("C3", "c", Some(7), now),
            entry("C4", "c", Some(8), now),
            entry("C5", "c", Some(9), now),
        ];

        let merged = merge_sources(entries, recency_cutoff(now, 120), 250);
        assert_eq!(
            titles(&merged),
            vec!["A1", "C1", "B1", "A2", "C2", "A3", "C3", "C4", "C5"]
        );
    }

    #[test]
    fn test_input_order_does_not_change_result() {
        let now = Utc::now();
        let build = || {
            vec![
                entry("A1", "a", Some(1), now),
                entry("B1", "b", Some(2), now),
                entry("A2", "a", Some(3), now),
                entry("B2", "b", Some(4), now),
            ]
        };
        let forward = merge_sources(build(), recency_cutoff(now, 120), 250);
        let mut reversed_input = build();
        reversed_input.reverse();
        let backward = merge_sources(reversed_input, recency_cutoff(now, 120), 250);

        assert_eq!(titles(&forward), titles(&backward));
        assert_eq!(titles(&forward), vec!["A1", "B1", "A2", "B2"]);
    }

    #[test]
    fn test_recency_cutoff_drops_old_keeps_undated() {
        let now = Utc::now();
        let entries = vec![
            entry("fresh", "a", Some(24), now),
            entry("stale", "a", Some(24 * 200), now),
            entry("undated", "b", None, now),
        ];

        let merged = merge_sources(entries, recency_cutoff(now, 120), 250);
        assert_eq!(titles(&merged), vec!["fresh", "undated"]);
    }

    #[test]
    fn test_huge_recency_window_keeps_everything() {
        let now = Utc::now();
        assert_eq!(recency_cutoff(now, u32::MAX), DateTime::<Utc>::MIN_UTC);

        let config = crate::AppConfig::from_toml("[news]\nrecency_days = 100000000").unwrap();
        let cutoff = recency_cutoff(now, config.news.recency_days);
        let entries = vec![
            entry("today", "a", Some(1), now),
            entry("decades ago", "a", Some(24 * 365 * 40), now),
        ];

        let merged = merge_sources(entries, cutoff, 250);
        assert_eq!(titles(&merged), vec!["today", "decades ago"]);
    }

    #[test]
    fn test_undated_entries_sort_last_within_source() {
        let now = Utc::now();
        let entries = vec![
            entry("undated", "a", None, now),
            entry("dated", "a", Some(2), now),
        ];

        let merged = merge_sources(entries, recency_cutoff(now, 120), 250);
        assert_eq!(titles(&merged), vec!["dated", "undated"]);
    }

    #[test]
    fn test_cap_is_exact() {
        let now = Utc::now();
        let entries: Vec<NewsEntry> = (0..10)
            .map(|i| entry(&format!("item {}", i), if i % 2 == 0 { "a" } else { "b" }, Some(i), now))
            .collect();

        let merged = merge_sources(entries, recency_cutoff(now, 120), 3);
        assert_eq!(merged.len(), 3);
        assert_eq!(titles(&merged), vec!["item 0", "item 1", "item 2"]);
    }

    #[test]
    fn test_empty_input() {
        let now = Utc::now();
        assert!(merge_sources(Vec::new(), recency_cutoff(now, 120), 250).is_empty());
    }
}
