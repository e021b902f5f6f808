pub mod config;
pub mod error;
pub mod feed;
pub mod news;

pub use config::{AppConfig, NewsConfig};
pub use error::{Error, Result};
pub use feed::{classify, parse_feed, FeedFetcher, FeedSource, KindSignals, NewsEntry, NewsKind};
pub use news::{
    NewsAggregator, NewsView, PlatformFilter, ReloadOptions, ReloadOutcome, ReloadSummary,
};
