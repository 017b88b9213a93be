//! Date discovery against the upstream register index.
//!
//! The index page links each published register edition by its date token
//! (`pd_date=DD-MON-YY`). Discovery extracts those tokens together with the
//! link text, preserving the upstream order (most recent first).

use std::sync::LazyLock;

use regex::Regex;
use reqwest::blocking::Client;

use crate::config::{index_url, FMCSA_BASE_URL};
use crate::error::{Result, ScraperError};
use crate::http::fetch_text;
use crate::types::{DateToken, RegisterDate};

/// Matches a register link: the `pd_date` query value and the link text.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DATE_LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"pd_date=(\d{2}-[A-Z]{3}-\d{2})[^>]*>\s*([^<]*?)\s*<"#).expect("valid regex")
});

/// List the register dates currently published upstream.
///
/// # Returns
/// `(token, label)` pairs in the order the index presents them. Repeated
/// calls may see new dates as the upstream publishes; no local state is
/// touched.
///
/// # Errors
/// `UpstreamUnavailable` if the index cannot be fetched or yields no
/// recognizable dates.
pub fn list_available_dates(client: &Client) -> Result<Vec<RegisterDate>> {
    list_available_dates_at(client, FMCSA_BASE_URL)
}

/// [`list_available_dates`] against an alternative base URL.
pub fn list_available_dates_at(client: &Client, base: &str) -> Result<Vec<RegisterDate>> {
    let url = index_url(base);
    let body = fetch_text(client, &url)?;

    let dates = extract_dates(&body);
    if dates.is_empty() {
        return Err(ScraperError::UpstreamUnavailable {
            url,
            reason: "index page contained no recognizable register dates".to_string(),
            source: None,
        });
    }

    tracing::debug!(count = dates.len(), "Discovered register dates");
    Ok(dates)
}

/// Extract register dates from index markup.
///
/// Duplicate tokens are collapsed to their first occurrence; tokens that do
/// not name a real calendar date are dropped. Link text becomes the label,
/// falling back to a formatted form of the token when the text is empty.
pub fn extract_dates(body: &str) -> Vec<RegisterDate> {
    let mut seen: Vec<RegisterDate> = Vec::new();

    for caps in DATE_LINK_PATTERN.captures_iter(body) {
        let raw_token = &caps[1];
        let Ok(token) = DateToken::parse(raw_token) else {
            tracing::warn!(token = raw_token, "Skipping malformed date token in index");
            continue;
        };

        if seen.iter().any(|d| d.token == token.as_str()) {
            continue;
        }

        let text = caps[2].trim();
        let label = if text.is_empty() {
            token.to_label()
        } else {
            text.to_string()
        };

        seen.push(RegisterDate {
            token: token.as_str().to_string(),
            label,
        });
    }

    seen
}
