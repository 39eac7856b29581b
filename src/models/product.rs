use std::collections::BTreeMap;
use std::fmt;

/// Canonical name a raw dimension label is mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DimensionKey {
    Width,
    Height,
    Weight,
    Depth,
}

impl DimensionKey {
    pub const ALL: [DimensionKey; 4] = [
        DimensionKey::Width,
        DimensionKey::Height,
        DimensionKey::Weight,
        DimensionKey::Depth,
    ];

    /// Output column this key is written to.
    pub fn column(&self) -> &'static str {
        match self {
            DimensionKey::Width => "width",
            DimensionKey::Height => "height",
            DimensionKey::Weight => "weight",
            DimensionKey::Depth => "depth",
        }
    }
}

impl fmt::Display for DimensionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Dimension values keyed by canonical key. The first value stored for a key
/// is kept; later ones are refused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dimensions(BTreeMap<DimensionKey, String>);

impl Dimensions {
    /// Returns `false` when `key` already holds a value; the stored value is
    /// left untouched in that case.
    pub fn insert_first(&mut self, key: DimensionKey, value: String) -> bool {
        if self.0.contains_key(&key) {
            return false;
        }
        self.0.insert(key, value);
        true
    }

    pub fn get(&self, key: DimensionKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DimensionKey, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// Outcome of the search step for one part number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductReference {
    pub part_number: String,
    pub url: Option<String>,
}

impl ProductReference {
    pub fn found(part_number: &str, url: String) -> Self {
        Self {
            part_number: part_number.to_string(),
            url: Some(url),
        }
    }

    pub fn missing(part_number: &str) -> Self {
        Self {
            part_number: part_number.to_string(),
            url: None,
        }
    }

    pub fn is_found(&self) -> bool {
        self.url.is_some()
    }
}

/// Everything scraped from one product page. Every field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedProduct {
    pub url: String,
    pub image: String,
    pub price: String,
    pub description: String,
    pub dimensions: Dimensions,
    pub standard_features: Vec<String>,
}

impl ExtractedProduct {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Default::default()
        }
    }
}

/// Terminal state of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    NotFound,
    Done(ExtractedProduct),
}
