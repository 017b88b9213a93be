//! Error types for the scraper.

use thiserror::Error;

/// Main error type for the scraper library.
#[derive(Debug, Error)]
pub enum ScraperError {
    /// Invalid register date token.
    #[error("Invalid date token: '{0}'. Expected DD-MON-YY (e.g., 20-FEB-26)")]
    InvalidDateToken(String),

    /// HTTP client construction or request failed outside a fetch.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream register source could not be reached, answered badly, or
    /// served an index page no publication dates could be read from.
    #[error("Upstream register source unavailable at {url}: {reason}")]
    UpstreamUnavailable {
        url: String,
        reason: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Upstream explicitly signals that no register exists for the date.
    #[error("Register not published for date {date}")]
    NotPublished { date: String },

    /// Record store operation failed outside the per-record insert loop.
    #[error("Record store error: {0}")]
    Store(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error from the file-backed store.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for scraper operations.
pub type Result<T> = std::result::Result<T, ScraperError>;
