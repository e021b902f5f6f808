use std::sync::Arc;

use anyhow::Result;

use gamefeed_core::{
    AppConfig, FeedFetcher, NewsAggregator, NewsKind, PlatformFilter, ReloadOutcome,
};

pub struct NewsRequest {
    pub platform: PlatformFilter,
    pub kind: Option<NewsKind>,
    pub keywords: Vec<String>,
    pub pages: usize,
    pub json: bool,
}

pub async fn run(config: &AppConfig, request: NewsRequest) -> Result<()> {
    let fetcher = FeedFetcher::new(&config.sync)?;
    let aggregator = NewsAggregator::new(Arc::new(fetcher), config.news.page_size);

    let mut keywords: Vec<String> = request
        .platform
        .keywords()
        .iter()
        .map(|k| k.to_string())
        .collect();
    keywords.extend(request.keywords);
    aggregator.set_filters(&keywords, request.kind).await;

    if !request.json {
        println!("Fetching {} sources...\n", config.news.sources.len());
    }

    match aggregator.reload(config.news.reload_options()).await {
        ReloadOutcome::Committed(summary) => {
            if summary.failed_sources > 0 {
                tracing::warn!(
                    "{} of {} sources could not be loaded",
                    summary.failed_sources,
                    summary.sources
                );
            }
        }
        ReloadOutcome::Superseded => anyhow::bail!("Reload was superseded"),
    }

    for _ in 1..request.pages.max(1) {
        if !aggregator.load_more().await {
            break;
        }
    }

    let view = aggregator.view();

    if request.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    if view.items.is_empty() {
        println!("No news matches the current filters.");
        return Ok(());
    }

    let filter = match request.kind {
        Some(kind) => format!("{} / {}", request.platform, kind.label()),
        None => request.platform.to_string(),
    };
    println!("News ({}, {} shown):\n", filter, view.items.len());

    for entry in &view.items {
        super::print_entry(entry);
    }

    if view.can_load_more {
        println!("\nMore available: pass --pages {}", request.pages.max(1) + 1);
    }

    Ok(())
}
