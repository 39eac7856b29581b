//! Browser seam: a driver launches a session, a session hands out pages.
//!
//! The scraper only ever talks to these traits, so the Chromium driver and
//! the plain HTTP driver are interchangeable.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::ScrapeResult;

mod chrome;
mod http;

pub use chrome::{ChromeDriver, ChromePage, ChromeSession};
pub use http::{create_client, HttpDriver, HttpPage, HttpSession};

#[async_trait]
pub trait BrowserDriver: Send + Sync {
    type Session: BrowserSession;

    /// Acquire the browser process, one browsing context and the primary page.
    async fn launch(&self) -> ScrapeResult<Self::Session>;
}

#[async_trait]
pub trait BrowserSession: Send + Sync {
    type Page: BrowserPage;

    /// Long-lived page used for catalog searches.
    fn primary(&self) -> &Self::Page;

    /// Open a fresh page in the same browsing context.
    async fn new_page(&self) -> ScrapeResult<Self::Page>;

    /// Release the browsing context, then the browser process.
    async fn close(self) -> ScrapeResult<()>;
}

#[async_trait]
pub trait BrowserPage: Send + Sync {
    async fn goto(&self, url: &str) -> ScrapeResult<()>;

    /// Resolve once an element matching `selector` is visible, or fail after `timeout`.
    async fn wait_for_visible(&self, selector: &str, timeout: Duration) -> ScrapeResult<()>;

    /// Serialized DOM of the current document.
    async fn content(&self) -> ScrapeResult<String>;

    async fn close(self) -> ScrapeResult<()>;
}
