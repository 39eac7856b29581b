pub mod browser;
pub mod config;
pub mod error;
pub mod models;
pub mod parsers;
pub mod scrapers;
pub mod storage;

pub use config::{Config, DriverKind};
pub use error::{ScrapeError, ScrapeResult};
pub use scrapers::{ProductScraper, RunReport};
