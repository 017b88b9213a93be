//! HTTP client wrapper for the FMCSA Licensing & Insurance site.
//!
//! Transport failures are surfaced verbatim as `UpstreamUnavailable`; retry
//! policy belongs to the caller, not this layer.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::config::HTTP_TIMEOUT_SECS;
use crate::error::{Result, ScraperError};

/// User agent string identifying this scraper.
const USER_AGENT: &str = concat!("fmcsa-register/", env!("CARGO_PKG_VERSION"));

/// Create a configured HTTP client.
///
/// # Returns
/// A `reqwest::blocking::Client` configured with appropriate timeout and user agent.
pub fn create_client() -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Fetch a page body as text.
///
/// Any transport failure or non-success status maps to `UpstreamUnavailable`,
/// an absent resource included; callers that must distinguish 404 use
/// `fetch_text_or_absent` directly.
pub fn fetch_text(client: &Client, url: &str) -> Result<String> {
    match fetch_text_or_absent(client, url)? {
        Some(body) => Ok(body),
        None => Err(ScraperError::UpstreamUnavailable {
            url: url.to_string(),
            reason: "resource not found (HTTP 404)".to_string(),
            source: None,
        }),
    }
}

/// Fetch a page body as text, mapping HTTP 404 to `Ok(None)`.
///
/// Used where the upstream signals "no document for this date" with a 404
/// that callers must distinguish from transport failure.
pub fn fetch_text_or_absent(client: &Client, url: &str) -> Result<Option<String>> {
    let wrap = |source: reqwest::Error| ScraperError::UpstreamUnavailable {
        url: url.to_string(),
        reason: source.to_string(),
        source: Some(source),
    };

    let response = client.get(url).send().map_err(wrap)?;

    if response.status() == StatusCode::NOT_FOUND {
        tracing::debug!(url, "Upstream returned 404");
        return Ok(None);
    }

    let response = response.error_for_status().map_err(wrap)?;
    let body = response.text().map_err(wrap)?;
    Ok(Some(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client() {
        let client = create_client();
        assert!(client.is_ok());
    }
}
