use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
};
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use super::{BrowserDriver, BrowserPage, BrowserSession};
use crate::config::Config;
use crate::error::{ScrapeError, ScrapeResult};

const VISIBILITY_POLL: Duration = Duration::from_millis(100);

/// Launches a local Chromium through the DevTools protocol.
pub struct ChromeDriver {
    headless: bool,
    request_timeout: Duration,
    user_agent: String,
}

impl ChromeDriver {
    pub fn from_config(config: &Config) -> Self {
        Self {
            headless: config.headless,
            request_timeout: config.navigation_timeout(),
            user_agent: config.user_agent.clone(),
        }
    }

    fn browser_config(&self) -> ScrapeResult<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .request_timeout(self.request_timeout)
            .arg(format!("--user-agent={}", self.user_agent))
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--no-first-run")
            .arg("--no-default-browser-check");

        if !self.headless {
            builder = builder.with_head();
        }

        builder.build().map_err(ScrapeError::Launch)
    }
}

#[async_trait]
impl BrowserDriver for ChromeDriver {
    type Session = ChromeSession;

    async fn launch(&self) -> ScrapeResult<ChromeSession> {
        let (mut browser, mut handler) = Browser::launch(self.browser_config()?)
            .await
            .map_err(|e| ScrapeError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser event error: {}", e);
                }
            }
        });

        match open_context(&browser).await {
            Ok((context_id, page)) => {
                info!(
                    "Browser launched ({})",
                    if self.headless { "headless" } else { "headed" }
                );
                Ok(ChromeSession {
                    browser,
                    context_id,
                    primary: ChromePage { page },
                    handler,
                })
            }
            Err(e) => {
                // The process is already running; do not leak it.
                if let Err(close_err) = browser.close().await {
                    warn!("Failed to close browser after launch error: {}", close_err);
                }
                let _ = browser.wait().await;
                handler.abort();
                Err(e)
            }
        }
    }
}

async fn open_context(browser: &Browser) -> ScrapeResult<(BrowserContextId, Page)> {
    let context_id = browser
        .execute(CreateBrowserContextParams::default())
        .await?
        .result
        .browser_context_id;

    let page = browser
        .new_page(blank_target(&context_id)?)
        .await?;

    Ok((context_id, page))
}

fn blank_target(context_id: &BrowserContextId) -> ScrapeResult<CreateTargetParams> {
    CreateTargetParams::builder()
        .url("about:blank")
        .browser_context_id(context_id.clone())
        .build()
        .map_err(ScrapeError::Browser)
}

pub struct ChromeSession {
    browser: Browser,
    context_id: BrowserContextId,
    primary: ChromePage,
    handler: JoinHandle<()>,
}

#[async_trait]
impl BrowserSession for ChromeSession {
    type Page = ChromePage;

    fn primary(&self) -> &ChromePage {
        &self.primary
    }

    async fn new_page(&self) -> ScrapeResult<ChromePage> {
        let page = self.browser.new_page(blank_target(&self.context_id)?).await?;
        Ok(ChromePage { page })
    }

    async fn close(mut self) -> ScrapeResult<()> {
        let context = self
            .browser
            .execute(DisposeBrowserContextParams::new(self.context_id.clone()))
            .await;

        let process = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            warn!("Browser process did not exit cleanly: {}", e);
        }
        self.handler.abort();
        info!("Browser closed");

        context?;
        process?;
        Ok(())
    }
}

pub struct ChromePage {
    page: Page,
}

/// JS expression that is `true` once `selector` matches a rendered, visible element.
fn visibility_script(selector: &str) -> String {
    format!(
        "(() => {{ const el = document.querySelector({selector:?}); \
         if (!el) return false; \
         const style = window.getComputedStyle(el); \
         return style.visibility !== 'hidden' && style.display !== 'none' \
             && el.getClientRects().length > 0; }})()"
    )
}

#[async_trait]
impl BrowserPage for ChromePage {
    async fn goto(&self, url: &str) -> ScrapeResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| ScrapeError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    async fn wait_for_visible(&self, selector: &str, wait: Duration) -> ScrapeResult<()> {
        let script = visibility_script(selector);

        let poll = async {
            loop {
                match self.page.evaluate(script.as_str()).await {
                    Ok(result) => {
                        if result.into_value::<bool>().unwrap_or(false) {
                            return;
                        }
                    }
                    // The document may be mid-navigation; keep polling until the deadline.
                    Err(e) => debug!("Visibility check for '{}' failed: {}", selector, e),
                }
                sleep(VISIBILITY_POLL).await;
            }
        };

        timeout(wait, poll).await.map_err(|_| ScrapeError::Timeout {
            selector: selector.to_string(),
            timeout: wait,
        })
    }

    async fn content(&self) -> ScrapeResult<String> {
        self.page
            .content()
            .await
            .map_err(|e| ScrapeError::Content(e.to_string()))
    }

    async fn close(self) -> ScrapeResult<()> {
        self.page.close().await?;
        Ok(())
    }
}
