use anyhow::Result;
use chrono::Local;
use std::sync::Arc;
use tracing::info;

use champion_scraper::browser::{ChromeDriver, HttpDriver};
use champion_scraper::storage::CsvStore;
use champion_scraper::{Config, DriverKind, ProductScraper};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("champion_scraper=info".parse()?),
        )
        .init();

    info!(
        "--- Starting product scrape at {} ---",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    // Load configuration
    let config = Arc::new(Config::load()?);
    let store = CsvStore::new(&config.input_path, &config.output_path);
    let scraper = ProductScraper::new(config.clone());

    let report = match config.driver {
        DriverKind::Chrome => scraper.run(&ChromeDriver::from_config(&config), &store).await?,
        DriverKind::Http => scraper.run(&HttpDriver::from_config(&config)?, &store).await?,
    };

    info!(
        "--- Finished at {}: {} ({} rows written to {}) ---",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        report.tally,
        report.sheet.len(),
        config.output_path.display()
    );

    Ok(())
}
