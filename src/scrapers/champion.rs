//! Markup knowledge for championchair.com.
//!
//! Every selector here mirrors the storefront's current theme and will need
//! re-deriving when the site is redesigned.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::models::Dimensions;
use crate::parsers::{element_text, label_value_rows, parse_dimension_rows, parse_price};

pub const NOTHING_FOUND_HEADING: &str = "h1.pt-4.pb-3";
pub const NOTHING_FOUND_MARKER: &str = "Nothing Found";
pub const RESULT_TILE: &str = "a.post-wrapper--block.col-lg-4.mb-4.position-relative";
pub const PRODUCT_PATH: &str = "/product/";

pub const IMAGE: &str = "div#swiper-pdp-gallery > div > div > a > img";
pub const PRICE: &str = "span.text-red > span.pdp-price__price";
pub const DESCRIPTION: &str = "div.pdp-main__short-desc > p";
pub const DIMENSIONS: &str = "details#dimensions";
pub const FEATURES: &str = "details#features";
pub const FEATURE_ITEM: &str = "details#features li";

static HEADING_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(NOTHING_FOUND_HEADING).expect("Invalid heading selector"));
static TILE_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(RESULT_TILE).expect("Invalid result tile selector"));
static IMAGE_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(IMAGE).expect("Invalid image selector"));
static PRICE_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(PRICE).expect("Invalid price selector"));
static DESCRIPTION_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(DESCRIPTION).expect("Invalid description selector"));
static DIMENSIONS_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(DIMENSIONS).expect("Invalid dimensions selector"));
static FEATURE_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(FEATURE_ITEM).expect("Invalid feature selector"));

/// What a search results page says about a part number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPage {
    /// The "Nothing Found" heading is shown; result tiles are ignored.
    NothingFound,
    /// No result tiles at all.
    NoResults,
    /// The first tile links somewhere other than a product page.
    NotAProduct(String),
    /// The first tile's href, exactly as written in the page.
    Product(String),
}

pub fn parse_search_page(html: &str) -> SearchPage {
    let document = Html::parse_document(html);

    let nothing_found = document
        .select(&HEADING_SEL)
        .any(|heading| element_text(&heading).contains(NOTHING_FOUND_MARKER));
    if nothing_found {
        return SearchPage::NothingFound;
    }

    let Some(first) = document.select(&TILE_SEL).next() else {
        return SearchPage::NoResults;
    };

    let href = first.value().attr("href").unwrap_or_default();
    if href.contains(PRODUCT_PATH) {
        SearchPage::Product(href.to_string())
    } else {
        SearchPage::NotAProduct(href.to_string())
    }
}

/// Main gallery image, from `src` or the lazy-load `data-src`.
pub fn parse_image(document: &Html) -> Option<String> {
    let img = document.select(&IMAGE_SEL).next()?;
    img.value()
        .attr("src")
        .filter(|src| !src.trim().is_empty())
        .or_else(|| img.value().attr("data-src"))
        .map(|src| src.trim().to_string())
        .filter(|src| !src.is_empty())
}

pub fn parse_price_text(document: &Html) -> Option<String> {
    let price = document.select(&PRICE_SEL).next()?;
    let value = parse_price(&element_text(&price));
    (!value.is_empty()).then_some(value)
}

pub fn parse_description(document: &Html) -> Option<String> {
    let paragraph = document.select(&DESCRIPTION_SEL).next()?;
    let text = element_text(&paragraph);
    (!text.is_empty()).then_some(text)
}

pub fn parse_dimensions(document: &Html) -> Dimensions {
    document
        .select(&DIMENSIONS_SEL)
        .next()
        .map(|container| parse_dimension_rows(&label_value_rows(&container)))
        .unwrap_or_default()
}

/// Feature bullet texts in document order. Duplicates are kept.
pub fn parse_features(document: &Html) -> Vec<String> {
    document
        .select(&FEATURE_SEL)
        .map(|item| element_text(&item))
        .filter(|text| !text.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DimensionKey;
    use pretty_assertions::assert_eq;

    const SEARCH_PRODUCT: &str = include_str!("../../tests/fixtures/search_product.html");
    const SEARCH_NOTHING: &str = include_str!("../../tests/fixtures/search_nothing.html");
    const SEARCH_CATEGORY: &str = include_str!("../../tests/fixtures/search_category.html");
    const PRODUCT_FULL: &str = include_str!("../../tests/fixtures/product_full.html");
    const PRODUCT_NO_DIMENSIONS: &str =
        include_str!("../../tests/fixtures/product_no_dimensions.html");

    #[test]
    fn first_product_tile_is_returned_verbatim() {
        assert_eq!(
            parse_search_page(SEARCH_PRODUCT),
            SearchPage::Product(
                "https://championchair.com/product/4800-as-industrial-stool/".to_string()
            )
        );
    }

    #[test]
    fn nothing_found_beats_stale_tiles() {
        assert_eq!(parse_search_page(SEARCH_NOTHING), SearchPage::NothingFound);
    }

    #[test]
    fn category_first_result_is_rejected() {
        assert_eq!(
            parse_search_page(SEARCH_CATEGORY),
            SearchPage::NotAProduct("https://championchair.com/category/stools/".to_string())
        );
    }

    #[test]
    fn empty_results_page() {
        assert_eq!(
            parse_search_page("<html><body><h1 class=\"pt-4 pb-3\">Search Results</h1></body></html>"),
            SearchPage::NoResults
        );
    }

    #[test]
    fn relative_product_href_is_not_rewritten() {
        let html = r#"<a class="post-wrapper--block col-lg-4 mb-4 position-relative" href="/product/x-1/">X</a>"#;
        assert_eq!(parse_search_page(html), SearchPage::Product("/product/x-1/".to_string()));
    }

    #[test]
    fn full_product_page() {
        let document = Html::parse_document(PRODUCT_FULL);

        assert_eq!(
            parse_image(&document).as_deref(),
            Some("https://championchair.com/wp-content/uploads/4800-main.jpg")
        );
        assert_eq!(parse_price_text(&document).as_deref(), Some("1249.00"));
        assert_eq!(
            parse_description(&document).as_deref(),
            Some("Heavy-duty industrial stool with & steel frame.")
        );

        let dimensions = parse_dimensions(&document);
        assert_eq!(dimensions.get(DimensionKey::Width), Some("24"));
        assert_eq!(dimensions.get(DimensionKey::Depth), Some("26"));
        assert_eq!(dimensions.get(DimensionKey::Height), Some("29"));
        assert_eq!(dimensions.get(DimensionKey::Weight), Some("350"));

        assert_eq!(
            parse_features(&document),
            vec!["Steel frame", "Foot ring", "Foot ring"]
        );
    }

    #[test]
    fn groups_fail_independently() {
        let document = Html::parse_document(PRODUCT_NO_DIMENSIONS);

        assert!(parse_dimensions(&document).is_empty());
        assert_eq!(parse_price_text(&document), None);
        assert_eq!(
            parse_image(&document).as_deref(),
            Some("https://championchair.com/wp-content/uploads/1200-main.jpg")
        );
        assert_eq!(parse_description(&document).as_deref(), Some("Ergonomic task chair."));
        assert_eq!(parse_features(&document), vec!["Adjustable arms"]);
    }
}
