use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("No element matches '{0}'")]
    ElementNotFound(String),

    #[error("Timed out after {timeout:?} waiting for '{selector}'")]
    Timeout { selector: String, timeout: Duration },

    #[error("Failed to read page content: {0}")]
    Content(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Spreadsheet error: {0}")]
    Sheet(#[from] csv::Error),

    #[error("Input sheet has no '{0}' column")]
    MissingColumn(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;

impl From<chromiumoxide::error::CdpError> for ScrapeError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        ScrapeError::Browser(err.to_string())
    }
}

impl From<reqwest::Error> for ScrapeError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string()).unwrap_or_default();
        ScrapeError::Navigation {
            url,
            reason: err.to_string(),
        }
    }
}
