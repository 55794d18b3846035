use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use reviewfeed::application::{FeedState, ReviewFeed};
use reviewfeed::domain::ports::ReviewsPort;
use reviewfeed::infrastructure::{
    AppConfig, CliArgs, ConfigStore, FileReviewsProvider, HttpImageTransfer, HttpReviewsProvider,
    ImageLoader, ImageLoaderConfig, PixelDecoder,
};
use reviewfeed::presentation::{ListingOptions, run_listing};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config() -> Result<AppConfig> {
    let args = CliArgs::parse();
    let store = ConfigStore::new()?;
    let mut config = store.load(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

fn create_provider(source: &str, timeout: Duration) -> Result<Arc<dyn ReviewsPort>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        Ok(Arc::new(HttpReviewsProvider::new(source, timeout)?))
    } else {
        Ok(Arc::new(FileReviewsProvider::new(source)))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = load_config()?;
    init_logging(&config)?;

    info!(version = reviewfeed::VERSION, "Starting {}", reviewfeed::NAME);

    let source = config
        .source
        .as_deref()
        .ok_or_else(|| eyre!("no reviews source: pass a URL or a JSON file path"))?;
    let timeout = Duration::from_secs(config.images.timeout_secs);

    let loader = Arc::new(ImageLoader::new(
        ImageLoaderConfig {
            cost_limit: config.images.cost_limit_bytes(),
        },
        Arc::new(HttpImageTransfer::new(timeout)?),
        Arc::new(PixelDecoder),
    ));

    let provider = create_provider(source, timeout)?;
    let mut feed = ReviewFeed::new(provider, FeedState::with_page_size(config.feed.page_size));

    let options = ListingOptions {
        visible_rows: config.feed.visible_rows,
        max_pages: config.feed.max_pages,
        preload_screens: config.feed.preload_screens,
    };

    let mut stdout = std::io::stdout().lock();
    let summary = run_listing(&mut feed, loader.clone(), &options, &mut stdout).await?;

    let stats = loader.stats();
    info!(pages = summary.pages, rows = summary.rows, %stats, "Listing finished");
    writeln!(stdout, "image cache: {stats}")?;

    Ok(())
}
