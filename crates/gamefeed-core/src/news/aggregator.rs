use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinSet;

use super::merge::{merge_sources, recency_cutoff};
use super::platform::PlatformFilter;
use super::pool::FetchPool;
use crate::feed::{parse_feed, FeedSource, NewsEntry, NewsKind};
use crate::{Error, Result};

/// Parameters for one reload pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadOptions {
    /// Feed URLs, fetched concurrently
    pub sources: Vec<String>,
    pub recency_days: u32,
    pub merge_cap: usize,
}

/// Snapshot published to observers after every state change
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewsView {
    pub items: Vec<NewsEntry>,
    pub can_load_more: bool,
    pub is_loading: bool,
    pub is_loading_more: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReloadSummary {
    pub sources: usize,
    pub failed_sources: usize,
    /// Entries parsed across all sources before merging
    pub fetched: usize,
    /// Entries kept in the pool after merging
    pub kept: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadOutcome {
    Committed(ReloadSummary),
    /// A newer reload started first; this result was thrown away
    Superseded,
}

/// Result of fetching and parsing one source
struct SourceOutcome {
    url: String,
    result: Result<Vec<NewsEntry>>,
}

struct AggregatorState {
    pool: FetchPool,
    is_loading: bool,
    is_loading_more: bool,
    can_load_more: bool,
}

/// Owns the merged pool and serves filtered, paginated views of it
pub struct NewsAggregator {
    source: Arc<dyn FeedSource>,
    state: RwLock<AggregatorState>,
    generation: AtomicU64,
    view_tx: watch::Sender<NewsView>,
}

impl NewsAggregator {
    /// `page_size` is how many entries each page adds to the view
    pub fn new(source: Arc<dyn FeedSource>, page_size: usize) -> Self {
        let (view_tx, _) = watch::channel(NewsView::default());

        Self {
            source,
            state: RwLock::new(AggregatorState {
                pool: FetchPool::new(page_size),
                is_loading: false,
                is_loading_more: false,
                can_load_more: false,
            }),
            generation: AtomicU64::new(0),
            view_tx,
        }
    }

    /// Receive every published view
    pub fn subscribe(&self) -> watch::Receiver<NewsView> {
        self.view_tx.subscribe()
    }

    /// Latest published view
    pub fn view(&self) -> NewsView {
        self.view_tx.borrow().clone()
    }

    /// Fetch every source, merge, and replace the pool
    ///
    /// The pool is cleared up front. When another reload starts before this
    /// one finishes, this result is discarded and `Superseded` is returned.
    pub async fn reload(&self, options: ReloadOptions) -> ReloadOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let started = Utc::now();

        {
            let mut state = self.state.write().await;
            state.pool.clear();
            state.is_loading = true;
            state.is_loading_more = false;
            self.publish(&mut state);
        }

        tracing::info!("Reloading news from {} sources", options.sources.len());
        let outcomes = fetch_all(Arc::clone(&self.source), &options.sources).await;

        let mut fetched = 0;
        let mut failed_sources = 0;
        let mut collected = Vec::new();
        for outcome in outcomes {
            match outcome.result {
                Ok(entries) => {
                    tracing::debug!("{} entries from {}", entries.len(), outcome.url);
                    fetched += entries.len();
                    collected.extend(entries);
                }
                Err(e) => {
                    tracing::warn!("Skipping source {}: {}", outcome.url, e);
                    failed_sources += 1;
                }
            }
        }

        let merged = merge_sources(
            collected,
            recency_cutoff(started, options.recency_days),
            options.merge_cap,
        );

        let mut state = self.state.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("Discarding superseded reload #{}", generation);
            return ReloadOutcome::Superseded;
        }

        let summary = ReloadSummary {
            sources: options.sources.len(),
            failed_sources,
            fetched,
            kept: merged.len(),
        };
        state.pool.replace_entries(merged);
        state.is_loading = false;
        self.publish(&mut state);

        tracing::info!(
            "Reload finished: kept {} of {} entries ({} sources failed)",
            summary.kept,
            summary.fetched,
            summary.failed_sources
        );
        ReloadOutcome::Committed(summary)
    }

    /// Replace the title keywords and kind filter, back to page one
    ///
    /// Allowed during a reload; the filters then apply once it commits.
    pub async fn set_filters<S: AsRef<str>>(&self, keywords: &[S], kind: Option<NewsKind>) {
        let mut state = self.state.write().await;
        state.pool.set_filters(keywords, kind);
        self.publish(&mut state);
    }

    pub async fn set_platform(&self, platform: PlatformFilter, kind: Option<NewsKind>) {
        self.set_filters(platform.keywords(), kind).await;
    }

    /// Grow the view by one page; no-op while loading or when nothing is left
    ///
    /// Observers see one snapshot with `is_loading_more` set before the
    /// grown page is published.
    pub async fn load_more(&self) -> bool {
        let mut state = self.state.write().await;
        if state.is_loading || state.is_loading_more || !state.can_load_more {
            return false;
        }

        state.is_loading_more = true;
        self.publish(&mut state);
        tokio::task::yield_now().await;

        state.pool.advance_page();
        state.is_loading_more = false;
        self.publish(&mut state);
        true
    }

    /// Back to page one with the current filters
    pub async fn reset_paging(&self) {
        let mut state = self.state.write().await;
        state.pool.reset_paging();
        self.publish(&mut state);
    }

    /// Recompute and republish the view from current state
    pub async fn refresh_view(&self) {
        let mut state = self.state.write().await;
        self.publish(&mut state);
    }

    pub async fn pool_len(&self) -> usize {
        self.state.read().await.pool.len()
    }

    fn publish(&self, state: &mut AggregatorState) {
        let page = state.pool.page();
        state.can_load_more = page.can_load_more;
        self.view_tx.send_replace(NewsView {
            items: page.items,
            can_load_more: page.can_load_more,
            is_loading: state.is_loading,
            is_loading_more: state.is_loading_more,
        });
    }
}

/// Fetch and parse all sources concurrently, results in source order
async fn fetch_all(source: Arc<dyn FeedSource>, urls: &[String]) -> Vec<SourceOutcome> {
    let mut join_set: JoinSet<(usize, SourceOutcome)> = JoinSet::new();

    for (index, url) in urls.iter().enumerate() {
        let source = Arc::clone(&source);
        let url = url.clone();
        join_set.spawn(async move {
            let result = source.fetch(&url).await.map(|body| {
                let parsed = parse_feed(&body);
                if let Some(error) = &parsed.error {
                    tracing::warn!(
                        "Feed {} parsed partially ({} entries): {}",
                        url,
                        parsed.entries.len(),
                        error
                    );
                }
                parsed.entries
            });
            (index, SourceOutcome { url, result })
        });
    }

    let mut slots: Vec<Option<SourceOutcome>> = urls.iter().map(|_| None).collect();
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, outcome)) => slots[index] = Some(outcome),
            Err(e) => tracing::error!("Feed task join error: {}", e),
        }
    }

    // A slot left empty belongs to a task that panicked or was cancelled
    slots
        .into_iter()
        .zip(urls)
        .map(|(slot, url)| {
            slot.unwrap_or_else(|| SourceOutcome {
                url: url.clone(),
                result: Err(Error::Other("Feed task did not complete".to_string())),
            })
        })
        .collect()
}
