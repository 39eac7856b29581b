use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use super::clean_text;
use crate::models::{DimensionKey, Dimensions};

/// Raw headings recognised on product pages. Matching is case-sensitive
/// substring containment, checked in this order.
pub const DIMENSION_LABELS: &[(&str, DimensionKey)] = &[
    ("Overall Width", DimensionKey::Width),
    ("Overall Height", DimensionKey::Height),
    ("Seat Height Range", DimensionKey::Height),
    ("Standard Height", DimensionKey::Height),
    ("Weight Capacity", DimensionKey::Weight),
    ("Overall Depth", DimensionKey::Depth),
];

const RANGE_SEPARATORS: &[&str] = &["–", "—", " - ", " to "];

static NUMERIC_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+(?:[.,]\d+)?(?:\s+\d+/\d+)?|\d+/\d+)")
        .expect("Invalid numeric prefix regex")
});

/// Map a raw row label to its canonical key.
pub fn match_dimension_label(label: &str) -> Option<DimensionKey> {
    DIMENSION_LABELS
        .iter()
        .find(|(heading, _)| label.contains(heading))
        .map(|&(_, key)| key)
}

/// Reduce a raw dimension value to its leading number.
///
/// The value is cut before any parenthetical, then before any range
/// separator; the leading numeric token of what remains is returned. Text
/// with no leading number is returned whitespace-normalised.
pub fn parse_dimension_value(raw: &str) -> String {
    let mut value = raw.split('(').next().unwrap_or_default();

    for separator in RANGE_SEPARATORS {
        if let Some((head, _)) = value.split_once(separator) {
            value = head;
        }
    }

    match NUMERIC_PREFIX.captures(value) {
        Some(captures) => captures[1].to_string(),
        None => clean_text(value),
    }
}

/// Fold label/value rows into canonical dimensions. Unrecognised labels are
/// ignored; a second row for an already-filled key is rejected with a warning.
pub fn parse_dimension_rows(rows: &[(String, String)]) -> Dimensions {
    let mut dimensions = Dimensions::default();

    for (label, raw_value) in rows {
        let Some(key) = match_dimension_label(label) else {
            continue;
        };

        let value = parse_dimension_value(raw_value);
        if value.is_empty() {
            continue;
        }

        if !dimensions.insert_first(key, value.clone()) {
            warn!(
                "Ignoring duplicate {} row '{}' = '{}' (keeping '{}')",
                key,
                label,
                value,
                dimensions.get(key).unwrap_or_default()
            );
        }
    }

    dimensions
}
