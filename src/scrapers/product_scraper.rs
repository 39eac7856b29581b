use anyhow::{Context, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use scraper::Html;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use url::Url;

use super::champion::{self, SearchPage};
use crate::browser::{BrowserDriver, BrowserPage, BrowserSession};
use crate::config::Config;
use crate::error::ScrapeResult;
use crate::models::{ExtractedProduct, ProductReference, RecordOutcome, RunTally};
use crate::storage::{ColumnMap, Sheet, SheetStore};

/// Characters left as-is when a part number is placed in the search query.
const KEY_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Independently extracted sections of a product page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldGroup {
    Image,
    Price,
    Description,
    Dimensions,
    Features,
}

impl FieldGroup {
    const ALL: [FieldGroup; 5] = [
        FieldGroup::Image,
        FieldGroup::Price,
        FieldGroup::Description,
        FieldGroup::Dimensions,
        FieldGroup::Features,
    ];

    fn selector(&self) -> &'static str {
        match self {
            FieldGroup::Image => champion::IMAGE,
            FieldGroup::Price => champion::PRICE,
            FieldGroup::Description => champion::DESCRIPTION,
            FieldGroup::Dimensions => champion::DIMENSIONS,
            FieldGroup::Features => champion::FEATURES,
        }
    }

    fn apply(&self, document: &Html, product: &mut ExtractedProduct) {
        match self {
            FieldGroup::Image => product.image = champion::parse_image(document).unwrap_or_default(),
            FieldGroup::Price => {
                product.price = champion::parse_price_text(document).unwrap_or_default()
            }
            FieldGroup::Description => {
                product.description = champion::parse_description(document).unwrap_or_default()
            }
            FieldGroup::Dimensions => product.dimensions = champion::parse_dimensions(document),
            FieldGroup::Features => product.standard_features = champion::parse_features(document),
        }
    }
}

impl fmt::Display for FieldGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldGroup::Image => "image",
            FieldGroup::Price => "price",
            FieldGroup::Description => "description",
            FieldGroup::Dimensions => "dimensions",
            FieldGroup::Features => "features",
        };
        f.write_str(name)
    }
}

/// Result of a completed run: the counters and the enriched table as saved.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub tally: RunTally,
    pub sheet: Sheet,
}

/// Looks part numbers up on the storefront and scrapes the matching product pages.
pub struct ProductScraper {
    config: Arc<Config>,
}

impl ProductScraper {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    pub fn search_url(&self, part_number: &str) -> String {
        format!(
            "{}{}",
            self.config.base_url,
            utf8_percent_encode(part_number, KEY_ENCODE)
        )
    }

    /// Absolute URL to navigate to for a result href. Relative hrefs are
    /// joined onto the storefront origin.
    fn navigation_url(&self, href: &str) -> String {
        if Url::parse(href).is_ok() {
            return href.to_string();
        }
        Url::parse(&self.config.base_url)
            .and_then(|base| base.join(href))
            .map(|url| url.to_string())
            .unwrap_or_else(|_| href.to_string())
    }

    /// Find the catalog URL for one part number. Never fails: any fault is
    /// logged and reported as not found.
    pub async fn search<P: BrowserPage>(&self, page: &P, part_number: &str) -> ProductReference {
        match self.search_page(page, part_number).await {
            Ok(SearchPage::Product(url)) => ProductReference::found(part_number, url),
            Ok(SearchPage::NothingFound) | Ok(SearchPage::NoResults) => {
                warn!("No products found for {}", part_number);
                ProductReference::missing(part_number)
            }
            Ok(SearchPage::NotAProduct(href)) => {
                warn!(
                    "No products found for {} (first result is not a product: '{}')",
                    part_number, href
                );
                ProductReference::missing(part_number)
            }
            Err(e) => {
                error!("Search for {} failed: {}", part_number, e);
                ProductReference::missing(part_number)
            }
        }
    }

    async fn search_page<P: BrowserPage>(&self, page: &P, part_number: &str) -> ScrapeResult<SearchPage> {
        page.goto(&self.search_url(part_number)).await?;
        let html = page.content().await?;
        Ok(champion::parse_search_page(&html))
    }

    /// Scrape one product page on a dedicated page that is closed before returning.
    pub async fn extract<S: BrowserSession>(&self, session: &S, url: &str) -> ExtractedProduct {
        info!("Scraping data from: {}", url);

        let page = match session.new_page().await {
            Ok(page) => page,
            Err(e) => {
                error!("Could not open a page for {}: {}", url, e);
                return ExtractedProduct::new(url);
            }
        };

        let product = self.extract_on(&page, url).await;

        if let Err(e) = page.close().await {
            warn!("Failed to close product page {}: {}", url, e);
        }

        product
    }

    async fn extract_on<P: BrowserPage>(&self, page: &P, url: &str) -> ExtractedProduct {
        let mut product = ExtractedProduct::new(url);

        let target = self.navigation_url(url);
        if let Err(e) = page.goto(&target).await {
            error!("Could not load product page {}: {}", target, e);
            return product;
        }

        let timeout = self.config.element_timeout();
        let mut ready = Vec::with_capacity(FieldGroup::ALL.len());
        for group in FieldGroup::ALL {
            match page.wait_for_visible(group.selector(), timeout).await {
                Ok(()) => ready.push(group),
                Err(e) => debug!("No {} on {}: {}", group, url, e),
            }
        }

        if ready.is_empty() {
            warn!("Nothing extractable on {}", url);
            return product;
        }

        let html = match page.content().await {
            Ok(html) => html,
            Err(e) => {
                error!("Could not read product page {}: {}", url, e);
                return product;
            }
        };

        let document = Html::parse_document(&html);
        for group in ready {
            group.apply(&document, &mut product);
        }

        for (key, value) in product.dimensions.iter() {
            debug!("{} {} = {}", url, key, value);
        }

        product
    }

    async fn process_record<S: BrowserSession>(&self, session: &S, part_number: &str) -> RecordOutcome {
        let reference = self.search(session.primary(), part_number).await;
        match reference.url {
            Some(url) => RecordOutcome::Done(self.extract(session, &url).await),
            None => RecordOutcome::NotFound,
        }
    }

    /// Walk every row in order, folding results into the sheet.
    pub async fn process_sheet<S: BrowserSession>(
        &self,
        session: &S,
        sheet: &mut Sheet,
        columns: &ColumnMap,
    ) -> Result<RunTally> {
        session
            .primary()
            .goto(&self.config.base_url)
            .await
            .context("Failed to open the storefront")?;

        let mut tally = RunTally::default();
        let total = sheet.len();

        for (index, record) in sheet.records_mut().iter_mut().enumerate() {
            let part_number = columns.part_number(record).to_string();
            let model_name = columns.model_name(record).to_string();
            info!("[{}/{}] {} {}", index + 1, total, part_number, model_name);

            if part_number.is_empty() {
                warn!("Row {} has no mfr number", index + 1);
                tally.record_missing();
                continue;
            }

            match self.process_record(session, &part_number).await {
                RecordOutcome::NotFound => {
                    tally.record_missing();
                    warn!("{} - Not found", part_number);
                }
                RecordOutcome::Done(product) => {
                    tally.record_found();
                    columns.apply(record, &product);
                    info!("{} - Data extracted successfully", part_number);
                }
            }
        }

        info!("Processed {} of {} rows", tally.total(), total);
        Ok(tally)
    }

    /// Load the sheet, scrape every row with one browser session, save the
    /// sheet. The session is closed on every path once launched.
    pub async fn run<D, S>(&self, driver: &D, store: &S) -> Result<RunReport>
    where
        D: BrowserDriver,
        S: SheetStore,
    {
        let mut sheet = store.load().await?;

        info!("Sheet Headers:");
        for header in sheet.headers() {
            info!("  {}", header);
        }

        let columns = ColumnMap::resolve(&mut sheet).context("Input sheet is not usable")?;

        let session = driver.launch().await.context("Failed to launch browser")?;

        let outcome = async {
            let tally = self.process_sheet(&session, &mut sheet, &columns).await?;
            info!("{}", tally);
            store.save(&sheet).await?;
            Ok::<RunTally, anyhow::Error>(tally)
        }
        .await;

        if let Err(e) = session.close().await {
            error!("Failed to close browser session: {}", e);
        }

        let tally = outcome?;
        Ok(RunReport { tally, sheet })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scraper() -> ProductScraper {
        ProductScraper::new(Arc::new(Config::default()))
    }

    #[test]
    fn search_url_appends_encoded_key() {
        let scraper = scraper();
        assert_eq!(scraper.search_url("4800-AS"), "https://championchair.com?s=4800-AS");
        assert_eq!(scraper.search_url("A 1/2#"), "https://championchair.com?s=A%201%2F2%23");
    }

    #[test]
    fn relative_hrefs_navigate_on_the_storefront() {
        let scraper = scraper();
        assert_eq!(
            scraper.navigation_url("/product/x-1/"),
            "https://championchair.com/product/x-1/"
        );
        assert_eq!(
            scraper.navigation_url("https://championchair.com/product/x-1/"),
            "https://championchair.com/product/x-1/"
        );
    }

    #[test]
    fn every_group_has_a_distinct_selector() {
        let mut selectors: Vec<_> = FieldGroup::ALL.iter().map(|g| g.selector()).collect();
        selectors.sort();
        selectors.dedup();
        assert_eq!(selectors.len(), FieldGroup::ALL.len());
    }
}
