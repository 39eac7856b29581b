use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Optional settings file looked up in the working directory (any format the
/// `config` crate understands, e.g. `champion_scraper.toml`).
pub const CONFIG_FILE_STEM: &str = "champion_scraper";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    Chrome,
    Http,
}

/// Run settings. Every field has a default, so the settings file is optional.
///
/// The sheet is read and written as UTF-8 CSV. A workbook such as
/// `Champion Manufacturing Content.xlsx` must first have its product sheet
/// (`Grainger`) exported with "Save As > CSV UTF-8" to `input_path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Search endpoint prefix; the part number is appended verbatim after encoding.
    pub base_url: String,
    pub headless: bool,
    pub driver: DriverKind,
    pub element_timeout_ms: u64,
    pub navigation_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("Champion Manufacturing Content.csv"),
            output_path: PathBuf::from("Champion-manufacturing-output.csv"),
            base_url: "https://championchair.com?s=".to_string(),
            headless: false,
            driver: DriverKind::Chrome,
            element_timeout_ms: 5000,
            navigation_timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE_STEM).required(false))
            .build()
            .context("Failed to read scraper settings")?;

        settings
            .try_deserialize::<Config>()
            .context("Invalid scraper settings")
    }

    pub fn element_timeout(&self) -> Duration {
        Duration::from_millis(self.element_timeout_ms)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }
}
