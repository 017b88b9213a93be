//! Register document fetching.
//!
//! One register edition exists per publication date; its page is addressed
//! by the validated date token.

use reqwest::blocking::Client;

use crate::config::{register_url, FMCSA_BASE_URL};
use crate::error::{Result, ScraperError};
use crate::http::fetch_text_or_absent;
use crate::types::DateToken;

/// Source of raw register documents.
///
/// The reconciliation engine takes this as an injected dependency, so tests
/// can script document content without a network.
pub trait RegisterSource {
    /// Retrieve the raw register document for a date.
    fn fetch_register(&self, date: &DateToken) -> Result<String>;
}

/// Fetch the raw register document for a date from `base`.
///
/// # Errors
/// `UpstreamUnavailable` on transport failure; `NotPublished` when the
/// upstream answers 404 for the date. A successfully fetched page with no
/// entries is not an error here; it simply parses to zero records.
pub fn fetch_register(client: &Client, base: &str, date: &DateToken) -> Result<String> {
    let url = register_url(base, date.as_str());

    match fetch_text_or_absent(client, &url)? {
        Some(body) => Ok(body),
        None => Err(ScraperError::NotPublished {
            date: date.as_str().to_string(),
        }),
    }
}

/// [`RegisterSource`] backed by the upstream site over HTTP.
pub struct HttpRegisterSource {
    client: Client,
    base_url: String,
}

impl HttpRegisterSource {
    /// Build a source against the live FMCSA site.
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: crate::http::create_client()?,
            base_url: FMCSA_BASE_URL.to_string(),
        })
    }

    /// Build a source against an alternative base URL (e.g. a mock server).
    #[must_use]
    pub fn with_base(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

impl RegisterSource for HttpRegisterSource {
    fn fetch_register(&self, date: &DateToken) -> Result<String> {
        fetch_register(&self.client, &self.base_url, date)
    }
}
