use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

mod columns;
mod sheet;

pub use columns::*;
pub use sheet::{Record, Sheet};

#[async_trait]
pub trait SheetStore: Send + Sync {
    async fn load(&self) -> Result<Sheet>;
    async fn save(&self, sheet: &Sheet) -> Result<()>;
}

/// Reads the input table from one CSV file and writes the enriched table to another.
pub struct CsvStore {
    input: PathBuf,
    output: PathBuf,
}

impl CsvStore {
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl SheetStore for CsvStore {
    async fn load(&self) -> Result<Sheet> {
        let bytes = tokio::fs::read(&self.input)
            .await
            .with_context(|| format!("Failed to read input sheet {}", self.input.display()))?;

        let sheet = Sheet::from_reader(bytes.as_slice())
            .with_context(|| format!("Failed to parse input sheet {}", self.input.display()))?;

        info!("Loaded {} rows from {}", sheet.len(), self.input.display());
        Ok(sheet)
    }

    async fn save(&self, sheet: &Sheet) -> Result<()> {
        let mut buffer = Vec::new();
        sheet.to_writer(&mut buffer)?;

        tokio::fs::write(&self.output, buffer)
            .await
            .with_context(|| format!("Failed to write output sheet {}", self.output.display()))?;

        info!("Saved {} rows to {}", sheet.len(), self.output.display());
        Ok(())
    }
}
