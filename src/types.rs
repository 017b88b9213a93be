//! Core data types for the scraper.
//!
//! These types represent FMCSA Register publications and their entries as
//! they move through the discover-fetch-parse-reconcile pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::validate_date_token;
use crate::error::Result;

/// A validated register date token in the upstream's fixed format
/// (two-digit day, three-letter month, two-digit year, e.g. `20-FEB-26`).
///
/// Construction goes through [`DateToken::parse`], so holding a `DateToken`
/// means the shape and calendar validity have already been checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateToken(String);

impl DateToken {
    /// Parse and validate a date token.
    ///
    /// # Errors
    /// `ScraperError::InvalidDateToken` if the token has the wrong shape or
    /// does not name a real calendar date.
    pub fn parse(token: &str) -> Result<Self> {
        validate_date_token(token)?;
        Ok(Self(token.to_string()))
    }

    /// The token as the upstream source spells it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable form of the token, e.g. `February 20, 2026`.
    ///
    /// Used as a fallback label when the upstream index carries none.
    #[must_use]
    pub fn to_label(&self) -> String {
        match chrono::NaiveDate::parse_from_str(&self.0, "%d-%b-%y") {
            Ok(date) => date.format("%B %-d, %Y").to_string(),
            // Unreachable for a parsed token; fall back to the raw form
            Err(_) => self.0.clone(),
        }
    }
}

impl fmt::Display for DateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DateToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One published register date as advertised by the upstream index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterDate {
    /// Machine-readable date token, used to address the register document.
    pub token: String,

    /// Human-readable label from the index (e.g. "February 20, 2026").
    pub label: String,
}

/// A parsed-but-not-yet-persisted register entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRecord {
    /// Docket number (e.g. "MC-903."). Not unique across dates.
    pub docket_number: String,

    /// Free-text carrier name and address block.
    pub carrier_info: String,

    /// Section heading the entry appeared under. Open vocabulary.
    pub category: String,

    /// Date printed inside the entry, distinct from the register date.
    pub published_date: Option<String>,
}

/// Fields handed to the store when creating a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub docket_number: String,
    pub carrier_info: String,
    pub category: String,
    pub published_date: Option<String>,

    /// The register date token the record was scraped under.
    pub register_date: String,

    /// RFC 3339 timestamp of the scrape that produced the record.
    pub scraped_at: String,
}

impl NewRecord {
    /// Build store fields from a candidate scraped under `register_date`.
    #[must_use]
    pub fn from_candidate(
        candidate: &CandidateRecord,
        register_date: &DateToken,
        scraped_at: &str,
    ) -> Self {
        Self {
            docket_number: candidate.docket_number.clone(),
            carrier_info: candidate.carrier_info.clone(),
            category: candidate.category.clone(),
            published_date: candidate.published_date.clone(),
            register_date: register_date.as_str().to_string(),
            scraped_at: scraped_at.to_string(),
        }
    }
}

/// A persisted register entry, as returned by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FmcsaRecord {
    /// Store-assigned identifier, unique within the store.
    pub id: i64,

    pub docket_number: String,
    pub carrier_info: String,
    pub category: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,

    pub register_date: String,
    pub scraped_at: String,
}

/// Result of parsing one raw register document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseOutcome {
    /// Entries in document order.
    pub records: Vec<CandidateRecord>,

    /// Entries dropped because a mandatory field could not be located.
    pub skipped: usize,
}

/// A candidate the store refused, paired with the store's reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertFailure {
    pub candidate: CandidateRecord,
    pub reason: String,
}

/// Result of one reconciliation run for a register date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeOutcome {
    /// Number of candidates the store accepted.
    pub saved_count: usize,

    /// Number of candidates the parser produced. A zero here means the
    /// register was empty or not yet published; a zero `saved_count` with a
    /// non-zero `total_parsed` means every insertion failed.
    pub total_parsed: usize,

    /// Candidates the store refused, with reasons.
    pub failures: Vec<InsertFailure>,
}

impl ScrapeOutcome {
    /// Outcome for a date with nothing to reconcile (empty or unpublished).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            saved_count: 0,
            total_parsed: 0,
            failures: Vec::new(),
        }
    }
}
