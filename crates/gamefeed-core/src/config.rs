use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::feed::NewsKind;
use crate::news::{PlatformFilter, ReloadOptions};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub news: NewsConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    /// Entries published longer ago than this are dropped on reload
    #[serde(default = "default_recency_days")]
    pub recency_days: u32,
    /// Entries exposed per page of the filtered view; fixed for the aggregator's lifetime
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Upper bound on the merged pool
    #[serde(default = "default_merge_cap")]
    pub merge_cap: usize,
    /// Feed URLs fetched on every reload, in order
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,
    /// Platform preset applied to titles
    #[serde(default)]
    pub platform: PlatformFilter,
    /// Only show entries of this kind
    #[serde(default)]
    pub kind: Option<NewsKind>,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            recency_days: default_recency_days(),
            page_size: default_page_size(),
            merge_cap: default_merge_cap(),
            sources: default_sources(),
            platform: PlatformFilter::default(),
            kind: None,
        }
    }
}

impl NewsConfig {
    /// Options handed to each reload call
    pub fn reload_options(&self) -> ReloadOptions {
        ReloadOptions {
            sources: self.sources.clone(),
            recency_days: self.recency_days,
            merge_cap: self.merge_cap,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// HTTP proxy URL for feed fetching (e.g., "http://127.0.0.1:7890" or "socks5://127.0.0.1:1080")
    #[serde(default)]
    pub proxy_url: Option<String>,
    /// Largest feed body accepted, in bytes
    #[serde(default = "default_max_feed_bytes")]
    pub max_feed_bytes: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_timeout(),
            proxy_url: None,
            max_feed_bytes: default_max_feed_bytes(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_recency_days() -> u32 {
    120
}

fn default_page_size() -> usize {
    20
}

fn default_merge_cap() -> usize {
    250
}

fn default_timeout() -> u64 {
    30
}

fn default_max_feed_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_sources() -> Vec<String> {
    [
        // General multi-platform outlets
        "https://www.ign.com/rss",
        "https://www.eurogamer.net/api/frontpage.rss",
        "https://www.pcgamer.com/rss/",
        "https://www.polygon.com/rss/index.xml",
        "https://www.theverge.com/games/rss/index.xml",
        "https://kotaku.com/rss",
        "https://www.gamespot.com/feeds/mashup/",
        "https://www.videogameschronicle.com/feed/",
        "https://www.gamesradar.com/rss/",
        "https://www.rockpapershotgun.com/feed",
        "https://www.pcgamesn.com/feed",
        "https://www.destructoid.com/feed/",
        "https://www.gematsu.com/feed",
        "https://www.gameinformer.com/news.xml",
        // Platform-focused blogs
        "https://blog.playstation.com/feed/",
        "https://news.xbox.com/en-us/feed/",
        "https://www.nintendolife.com/feeds/latest",
        "https://www.pushsquare.com/feeds/latest",
        "https://www.purexbox.com/feeds/latest",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text; absent keys take their defaults
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/gamefeed/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("gamefeed")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.news.recency_days, 120);
        assert_eq!(config.news.page_size, 20);
        assert_eq!(config.news.merge_cap, 250);
        assert_eq!(config.news.sources.len(), 19);
        assert_eq!(config.news.platform, PlatformFilter::All);
        assert!(config.news.kind.is_none());
        assert_eq!(config.sync.request_timeout_secs, 30);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [news]
            page_size = 5
            platform = "nintendo"
            kind = "review"
            sources = ["https://example.com/feed.xml"]
            "#,
        )
        .unwrap();

        assert_eq!(config.news.page_size, 5);
        assert_eq!(config.news.recency_days, 120);
        assert_eq!(config.news.platform, PlatformFilter::Nintendo);
        assert_eq!(config.news.kind, Some(NewsKind::Review));
        assert_eq!(config.news.sources, vec!["https://example.com/feed.xml".to_string()]);
        assert_eq!(config.sync.max_feed_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = AppConfig::default();
        config.news.kind = Some(NewsKind::Deal);
        config.sync.proxy_url = Some("http://127.0.0.1:7890".to_string());

        let text = config.to_toml().unwrap();
        let back = AppConfig::from_toml(&text).unwrap();
        assert_eq!(back.news.kind, Some(NewsKind::Deal));
        assert_eq!(back.sync.proxy_url.as_deref(), Some("http://127.0.0.1:7890"));
        assert_eq!(back.news.sources, config.news.sources);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = AppConfig::from_toml("[news]\npage_size = \"many\"");
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_reload_options_mirror_config() {
        let news = NewsConfig::default();
        let options = news.reload_options();
        assert_eq!(options.sources, news.sources);
        assert_eq!(options.recency_days, 120);
        assert_eq!(options.merge_cap, 250);
    }
}
