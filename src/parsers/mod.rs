pub mod dimensions;
pub mod price;

pub use dimensions::*;
pub use price::*;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

/// Collapse runs of whitespace to single spaces and trim the ends.
///
/// Input is already-decoded text (DOM text nodes, attribute values); entities
/// are not decoded a second time, so a literal `&lt;` survives as written.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whitespace-normalised text content of an element.
pub fn element_text(element: &ElementRef) -> String {
    clean_text(&element.text().collect::<String>())
}

static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr, li").expect("Invalid row selector"));
static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("th, td").expect("Invalid cell selector"));

/// Collect `(label, value)` pairs below `container` in document order.
///
/// Table rows contribute their first two cells (`th`/`td` or `td`/`td`);
/// list items contribute `label: value` text split at the first colon.
/// Rows with fewer than two cells and items without a colon are skipped.
pub fn label_value_rows(container: &ElementRef) -> Vec<(String, String)> {
    let mut rows = Vec::new();

    for row in container.select(&ROW_SELECTOR) {
        if row.value().name() == "tr" {
            let mut cells = row.select(&CELL_SELECTOR);
            if let (Some(label), Some(value)) = (cells.next(), cells.next()) {
                rows.push((element_text(&label), element_text(&value)));
            }
        } else if let Some((label, value)) = element_text(&row).split_once(':') {
            rows.push((label.trim().to_string(), value.trim().to_string()));
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scraper::Html;

    #[test]
    fn clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  Heavy\u{a0}duty \n\t stool  "), "Heavy duty stool");
        assert_eq!(clean_text("   "), "");
    }

    #[test]
    fn element_text_decodes_entities_once() {
        let html = Html::parse_fragment("<p>Use &amp;lt;M6&amp;gt; bolts &amp; washers</p>");
        let root = html.root_element();

        assert_eq!(element_text(&root), "Use &lt;M6&gt; bolts & washers");
    }

    #[test]
    fn mixed_tables_and_lists_keep_document_order() {
        let html = Html::parse_fragment(
            r#"<div>
                <ul><li>Overall Height: 34"</li></ul>
                <table><tr><td>Overall Height</td><td>29"</td></tr></table>
                <ul><li>Overall Depth: 26"</li></ul>
            </div>"#,
        );
        let root = html.root_element();

        assert_eq!(
            label_value_rows(&root),
            vec![
                ("Overall Height".to_string(), "34\"".to_string()),
                ("Overall Height".to_string(), "29\"".to_string()),
                ("Overall Depth".to_string(), "26\"".to_string()),
            ]
        );
    }

    #[test]
    fn rows_come_from_tables_and_lists() {
        let html = Html::parse_fragment(
            r#"<div>
                <table>
                  <tr><th>Overall Width</th><td>24"</td></tr>
                  <tr><td>Overall Depth</td><td> 26" </td></tr>
                  <tr><td>lonely cell</td></tr>
                </table>
                <ul><li>Weight Capacity: 350 lbs</li><li>no colon here</li></ul>
            </div>"#,
        );
        let root = html.root_element();

        assert_eq!(
            label_value_rows(&root),
            vec![
                ("Overall Width".to_string(), "24\"".to_string()),
                ("Overall Depth".to_string(), "26\"".to_string()),
                ("Weight Capacity".to_string(), "350 lbs".to_string()),
            ]
        );
    }
}
