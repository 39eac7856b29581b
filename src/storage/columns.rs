use tracing::warn;

use super::{Record, Sheet};
use crate::error::{ScrapeError, ScrapeResult};
use crate::models::{DimensionKey, ExtractedProduct, FLAG_NO};

pub const PART_NUMBER: &str = "mfr number";
pub const MODEL_NAME: &str = "model name";
pub const PRODUCT_URL: &str = "Product URL";
pub const PRODUCT_IMAGE_JPG: &str = "Product Image (jpg)";
pub const PRODUCT_IMAGE: &str = "Product Image";
pub const DESCRIPTION: &str = "product description";
pub const GREEN_CERTIFICATION: &str = "green certification? (Y/N)";
pub const UNIT_COST: &str = "unit cost";
pub const STANDARD_FEATURES: &str = "standard features";

/// Headers with this suffix are Y/N flag columns.
pub const FLAG_SUFFIX: &str = "(Y/N)";

const FEATURE_SEPARATOR: &str = "; ";

/// Column indices resolved once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    part_number: usize,
    model_name: Option<usize>,
    url: usize,
    image_jpg: usize,
    image: usize,
    description: usize,
    dimensions: Vec<(DimensionKey, usize)>,
    unit_cost: Option<usize>,
    features: Option<usize>,
    flags: Vec<usize>,
}

impl ColumnMap {
    /// Resolve every column the run reads or writes. Required output columns
    /// missing from the sheet are appended.
    pub fn resolve(sheet: &mut Sheet) -> ScrapeResult<Self> {
        let part_number = sheet
            .column(PART_NUMBER)
            .ok_or_else(|| ScrapeError::MissingColumn(PART_NUMBER.to_string()))?;

        let model_name = sheet.column(MODEL_NAME);
        if model_name.is_none() {
            warn!("Input sheet has no '{}' column", MODEL_NAME);
        }

        let required = |sheet: &mut Sheet, name: &str| {
            if sheet.column(name).is_none() {
                warn!("Appending missing output column '{}'", name);
            }
            sheet.ensure_column(name)
        };

        let url = required(sheet, PRODUCT_URL);
        let image_jpg = required(sheet, PRODUCT_IMAGE_JPG);
        let image = required(sheet, PRODUCT_IMAGE);
        let description = required(sheet, DESCRIPTION);
        let dimensions = DimensionKey::ALL
            .iter()
            .map(|&key| (key, required(sheet, key.column())))
            .collect();
        required(sheet, GREEN_CERTIFICATION);

        let flags = sheet
            .headers()
            .iter()
            .enumerate()
            .filter(|(_, header)| header.ends_with(FLAG_SUFFIX))
            .map(|(index, _)| index)
            .collect();

        Ok(Self {
            part_number,
            model_name,
            url,
            image_jpg,
            image,
            description,
            dimensions,
            unit_cost: sheet.column(UNIT_COST),
            features: sheet.column(STANDARD_FEATURES),
            flags,
        })
    }

    pub fn part_number<'a>(&self, record: &'a Record) -> &'a str {
        record.get(self.part_number).trim()
    }

    pub fn model_name<'a>(&self, record: &'a Record) -> &'a str {
        self.model_name
            .map(|column| record.get(column).trim())
            .unwrap_or_default()
    }

    /// Copy a scraped product into the row's output columns.
    pub fn apply(&self, record: &mut Record, product: &ExtractedProduct) {
        record.set(self.url, product.url.as_str());
        record.set(self.image_jpg, product.image.as_str());
        record.set(self.image, product.image.as_str());
        record.set(self.description, product.description.as_str());

        for &(key, column) in &self.dimensions {
            record.set(column, product.dimensions.get(key).unwrap_or_default());
        }

        if let Some(column) = self.unit_cost {
            record.set(column, product.price.as_str());
        }

        if let Some(column) = self.features {
            record.set(column, product.standard_features.join(FEATURE_SEPARATOR));
        }

        for &column in &self.flags {
            record.set(column, FLAG_NO);
        }
    }
}
