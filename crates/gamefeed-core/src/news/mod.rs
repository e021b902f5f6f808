mod aggregator;
mod merge;
mod platform;
mod pool;

pub use aggregator::{NewsAggregator, NewsView, ReloadOptions, ReloadOutcome, ReloadSummary};
pub use merge::{merge_sources, recency_cutoff};
pub use platform::PlatformFilter;
pub use pool::{FetchPool, PageSlice};
