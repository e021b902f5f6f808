mod classifier;
mod fetcher;
mod models;
mod parser;

pub use classifier::{classify, KindSignals};
pub use fetcher::{FeedFetcher, FeedSource};
pub use models::{NewsEntry, NewsKind};
pub use parser::{parse_date, parse_feed, ParsedFeed};
