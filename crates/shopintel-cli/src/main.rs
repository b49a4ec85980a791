mod store;

use std::path::PathBuf;

use clap::Parser;
use shopintel_extractor::collab::{self, InsightsStore};
use shopintel_extractor::StoreAnalyzer;
use tracing_subscriber::EnvFilter;

use crate::store::JsonFileStore;

/// Extract brand and product intelligence from a Shopify storefront.
#[derive(Debug, Parser)]
#[command(name = "shopintel", version)]
struct Cli {
    /// Storefront URL to analyze, e.g. https://colourpop.com
    url: String,

    /// Persist the finished record as JSON into this directory, keyed by
    /// URL and timestamp.
    #[arg(long, env = "SHOPINTEL_STORE_DIR")]
    store_dir: Option<PathBuf>,

    /// Emit compact JSON instead of pretty-printed.
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = shopintel_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let analyzer = StoreAnalyzer::new(config)?;
    let record = analyzer.analyze(&cli.url).await?;
    tracing::info!(
        url = %record.website_url,
        products = record.total_products,
        "analysis complete"
    );

    if let Some(dir) = cli.store_dir {
        let key = collab::record_key(&record.website_url, &record.analysis_timestamp);
        let store = JsonFileStore::new(dir);
        store
            .store(&key, &record)
            .await
            .map_err(|e| anyhow::anyhow!("failed to persist record: {e}"))?;
        tracing::info!(key, "record persisted");
    }

    let json = if cli.compact {
        serde_json::to_string(&record)?
    } else {
        serde_json::to_string_pretty(&record)?
    };
    println!("{json}");
    Ok(())
}
