use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gamefeed_core::{AppConfig, NewsKind, PlatformFilter};

mod commands;

#[derive(Parser)]
#[command(name = "gamefeed")]
#[command(author, version, about = "Game news from many outlets in one feed")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch all configured sources and print the merged feed
    News {
        /// Platform preset (all, playstation, xbox, nintendo, pc, mobile)
        #[arg(short, long)]
        platform: Option<PlatformFilter>,
        /// Only show entries of this kind (review, preview, guide, ...)
        #[arg(short, long)]
        kind: Option<NewsKind>,
        /// Extra title keyword; repeat for more
        #[arg(short = 'w', long = "keyword")]
        keywords: Vec<String>,
        /// Number of pages to show
        #[arg(long, default_value_t = 1)]
        pages: usize,
        /// Print JSON instead of a list
        #[arg(long)]
        json: bool,
    },
    /// Parse a local feed document
    Parse {
        /// Path to an RSS or Atom file
        file: std::path::PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Show the kind assigned to a headline
    Classify {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        link: Option<String>,
        /// Feed category; repeat for more
        #[arg(short = 'c', long = "category")]
        categories: Vec<String>,
        /// Body text or HTML
        #[arg(long)]
        content: Option<String>,
        /// Source label, e.g. nintendolife.com
        #[arg(short, long)]
        source: Option<String>,
    },
    /// List configured feed sources
    Sources,
    /// Show the configuration file path and effective settings
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::News {
            platform,
            kind,
            keywords,
            pages,
            json,
        } => {
            let request = commands::news::NewsRequest {
                platform: platform.unwrap_or(config.news.platform),
                kind: kind.or(config.news.kind),
                keywords,
                pages,
                json,
            };
            commands::news::run(&config, request).await
        }
        Commands::Parse { file, json } => commands::parse::run(&file, json),
        Commands::Classify {
            title,
            link,
            categories,
            content,
            source,
        } => {
            commands::classify::run(
                &title,
                link.as_deref().unwrap_or_default(),
                &categories,
                content.as_deref().unwrap_or_default(),
                source.as_deref().unwrap_or_default(),
            );
            Ok(())
        }
        Commands::Sources => {
            commands::sources::run(&config);
            Ok(())
        }
        Commands::Config => commands::config::run(&config),
    }
}
