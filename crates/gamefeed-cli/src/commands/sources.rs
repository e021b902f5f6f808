use gamefeed_core::AppConfig;

pub fn run(config: &AppConfig) {
    if config.news.sources.is_empty() {
        println!("No sources configured.");
        println!("\nAdd feed URLs under [news] sources in:");
        println!("  {}", AppConfig::config_path().display());
        return;
    }

    println!("Sources ({}):\n", config.news.sources.len());
    for url in &config.news.sources {
        println!("  {}", url);
    }
}
