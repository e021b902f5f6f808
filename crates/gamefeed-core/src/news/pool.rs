use crate::feed::{NewsEntry, NewsKind};

/// One page window over the filtered pool
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSlice {
    pub items: Vec<NewsEntry>,
    pub can_load_more: bool,
}

/// Merged entries plus the filter and paging state applied on top of them
///
/// Every view is recomputed from `entries` so repeated recomputation with
/// unchanged state yields the same page.
#[derive(Debug, Clone)]
pub struct FetchPool {
    entries: Vec<NewsEntry>,
    keywords: Vec<String>,
    kind: Option<NewsKind>,
    page_size: usize,
    current_page: usize,
}

impl FetchPool {
    pub fn new(page_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            keywords: Vec::new(),
            kind: None,
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries and start over at page one
    pub fn clear(&mut self) {
        self.entries.clear();
        self.current_page = 1;
    }

    /// Swap in a freshly merged list; filters survive, paging restarts
    pub fn replace_entries(&mut self, entries: Vec<NewsEntry>) {
        self.entries = entries;
        self.current_page = 1;
    }

    /// Replace the title keywords and kind filter and return to page one
    pub fn set_filters<S: AsRef<str>>(&mut self, keywords: &[S], kind: Option<NewsKind>) {
        self.keywords = keywords
            .iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        self.kind = kind;
        self.current_page = 1;
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn kind(&self) -> Option<NewsKind> {
        self.kind
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn reset_paging(&mut self) {
        self.current_page = 1;
    }

    pub fn advance_page(&mut self) {
        self.current_page += 1;
    }

    fn matches(&self, entry: &NewsEntry) -> bool {
        if let Some(kind) = self.kind {
            if entry.kind != kind {
                return false;
            }
        }
        self.keywords.is_empty() || entry.title_matches_any(&self.keywords)
    }

    /// Entries passing the current filters, in pool order
    pub fn filtered(&self) -> impl Iterator<Item = &NewsEntry> + '_ {
        self.entries.iter().filter(move |entry| self.matches(entry))
    }

    /// The first `page_size * current_page` filtered entries
    pub fn page(&self) -> PageSlice {
        let limit = self.page_size.saturating_mul(self.current_page);
        let mut filtered = self.filtered();
        let items: Vec<NewsEntry> = filtered.by_ref().take(limit).cloned().collect();
        let can_load_more = filtered.next().is_some();

        PageSlice {
            items,
            can_load_more,
        }
    }
}
