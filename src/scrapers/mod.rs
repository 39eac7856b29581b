pub mod champion;
mod product_scraper;

pub use product_scraper::{ProductScraper, RunReport};
