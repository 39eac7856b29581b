use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use scraper::{Html, Selector};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{BrowserDriver, BrowserPage, BrowserSession};
use crate::config::Config;
use crate::error::{ScrapeError, ScrapeResult};

pub fn create_client(user_agent: &str, request_timeout: Duration) -> ScrapeResult<Client> {
    let client = ClientBuilder::new()
        .user_agent(user_agent)
        .timeout(request_timeout)
        .cookie_store(true)
        .build()
        .map_err(|e| ScrapeError::Launch(e.to_string()))?;

    Ok(client)
}

/// Fetches server-rendered HTML without running scripts. Waits succeed as soon
/// as the selector is present in the fetched document.
pub struct HttpDriver {
    client: Client,
}

impl HttpDriver {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &Config) -> ScrapeResult<Self> {
        Ok(Self::new(create_client(
            &config.user_agent,
            config.navigation_timeout(),
        )?))
    }
}

#[async_trait]
impl BrowserDriver for HttpDriver {
    type Session = HttpSession;

    async fn launch(&self) -> ScrapeResult<HttpSession> {
        Ok(HttpSession {
            primary: HttpPage::new(self.client.clone()),
            client: self.client.clone(),
        })
    }
}

pub struct HttpSession {
    client: Client,
    primary: HttpPage,
}

#[async_trait]
impl BrowserSession for HttpSession {
    type Page = HttpPage;

    fn primary(&self) -> &HttpPage {
        &self.primary
    }

    async fn new_page(&self) -> ScrapeResult<HttpPage> {
        Ok(HttpPage::new(self.client.clone()))
    }

    async fn close(self) -> ScrapeResult<()> {
        Ok(())
    }
}

pub struct HttpPage {
    client: Client,
    document: Mutex<Option<String>>,
}

impl HttpPage {
    fn new(client: Client) -> Self {
        Self {
            client,
            document: Mutex::new(None),
        }
    }
}

fn has_match(html: &str, selector: &str) -> ScrapeResult<bool> {
    let selector = Selector::parse(selector)
        .map_err(|_| ScrapeError::ElementNotFound(selector.to_string()))?;
    let document = Html::parse_document(html);
    let found = document.select(&selector).next().is_some();
    Ok(found)
}

#[async_trait]
impl BrowserPage for HttpPage {
    async fn goto(&self, url: &str) -> ScrapeResult<()> {
        let response = self.client.get(url).send().await?;

        // A browser renders error pages too; keep the body either way.
        let status = response.status();
        if !status.is_success() {
            warn!("HTTP {} for {}", status, url);
        }

        let body = response.text().await?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        *self.document.lock().await = Some(body);
        Ok(())
    }

    async fn wait_for_visible(&self, selector: &str, _timeout: Duration) -> ScrapeResult<()> {
        let document = self.document.lock().await;
        let html = document
            .as_deref()
            .ok_or_else(|| ScrapeError::ElementNotFound(selector.to_string()))?;

        if has_match(html, selector)? {
            Ok(())
        } else {
            Err(ScrapeError::ElementNotFound(selector.to_string()))
        }
    }

    async fn content(&self) -> ScrapeResult<String> {
        self.document
            .lock()
            .await
            .clone()
            .ok_or_else(|| ScrapeError::Content("no document loaded".to_string()))
    }

    async fn close(self) -> ScrapeResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> Client {
        create_client("champion-scraper-tests", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn page_serves_last_fetched_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<h1 class=\"t\">A</h1>"))
            .mount(&server)
            .await;

        let page = HttpPage::new(client());
        page.goto(&format!("{}/a", server.uri())).await.unwrap();

        assert_eq!(page.content().await.unwrap(), "<h1 class=\"t\">A</h1>");
        assert!(page.wait_for_visible("h1.t", Duration::from_millis(10)).await.is_ok());
        assert!(matches!(
            page.wait_for_visible("h2", Duration::from_millis(10)).await,
            Err(ScrapeError::ElementNotFound(_))
        ));
    }

    #[tokio::test]
    async fn error_status_still_renders_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("<h1>Gone</h1>"))
            .mount(&server)
            .await;

        let page = HttpPage::new(client());
        page.goto(&server.uri()).await.unwrap();

        assert!(page.content().await.unwrap().contains("Gone"));
    }

    #[tokio::test]
    async fn unloaded_page_has_no_content() {
        let page = HttpPage::new(client());
        assert!(page.content().await.is_err());
        assert!(page.wait_for_visible("body", Duration::from_millis(10)).await.is_err());
    }
}
