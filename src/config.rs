//! Configuration constants and validation functions for the scraper.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Result, ScraperError};

/// Base URL for the FMCSA Licensing & Insurance public site.
pub const FMCSA_BASE_URL: &str = "https://li-public.fmcsa.dot.gov/LIVIEW";

/// HTTP timeout in seconds.
///
/// Register pages for busy publication dates run to several hundred entries;
/// 30 seconds accommodates them on slow connections.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Date token pattern: two-digit day, three-letter uppercase month, two-digit year.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DATE_TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}-[A-Z]{3}-\d{2}$").expect("valid regex"));

/// Validate a register date token (DD-MON-YY).
///
/// Checks both the shape and that the token names a real calendar date, so a
/// malformed token is rejected before any network call is made.
///
/// # Examples
/// ```
/// use fmcsa_register::config::validate_date_token;
///
/// assert!(validate_date_token("20-FEB-26").is_ok());
/// assert!(validate_date_token("2026-02-20").is_err());
/// assert!(validate_date_token("30-FEB-26").is_err()); // Not a real date
/// ```
pub fn validate_date_token(token: &str) -> Result<()> {
    if !DATE_TOKEN_PATTERN.is_match(token) {
        return Err(ScraperError::InvalidDateToken(token.to_string()));
    }

    // Parse to confirm it names a real calendar date
    chrono::NaiveDate::parse_from_str(token, "%d-%b-%y")
        .map_err(|_| ScraperError::InvalidDateToken(token.to_string()))?;

    Ok(())
}

/// Build the URL of the upstream index enumerating published register dates.
pub fn index_url(base: &str) -> String {
    format!("{base}/pkg_register.prc_reg_list")
}

/// Build the URL of the register document for a specific date.
///
/// # Panics
/// Debug builds panic if the token doesn't match the expected format.
pub fn register_url(base: &str, token: &str) -> String {
    debug_assert!(
        DATE_TOKEN_PATTERN.is_match(token),
        "token should be validated before calling register_url"
    );
    format!("{base}/pkg_register.prc_reg_detail?pd_date={token}")
}
