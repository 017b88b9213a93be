//! Reconciliation of scraped register entries against the record store.
//!
//! Re-scraping a date is idempotent in the eventual sense: any records
//! already stored under the date are deleted before the fresh batch is
//! inserted, so the last completed scrape wins. Deletion and insertion are
//! two separate phases, not one transaction; an abort between them leaves
//! the date partially reconciled, and two concurrent scrapes of the same
//! date race. Both are accepted behavior, and callers wanting exclusivity
//! must serialize scrapes per date themselves.

use crate::error::{Result, ScraperError};
use crate::parser::parse_register;
use crate::register::RegisterSource;
use crate::store::RecordStore;
use crate::types::{DateToken, InsertFailure, NewRecord, ScrapeOutcome};

/// Scrape the register for a date and reconcile it into the store.
///
/// Steps, strictly sequential:
/// 1. If records exist for the date, delete each one (no bulk statement, so
///    store-level lifecycle hooks see every record) before anything else.
/// 2. Fetch and parse the fresh document. `UpstreamUnavailable` propagates
///    untouched; no retry happens at this layer. A date the upstream has not
///    published, or a document that parses to nothing, is a zero-record
///    success, not an error.
/// 3. Insert candidates one by one. A refused candidate is logged, recorded
///    in the outcome, and never aborts or rolls back the batch.
///
/// Callers distinguish "zero because unpublished" from "zero because every
/// insert failed" via `total_parsed`.
pub fn scrape_and_store(
    store: &mut dyn RecordStore,
    source: &dyn RegisterSource,
    date: &DateToken,
) -> Result<ScrapeOutcome> {
    tracing::info!(date = date.as_str(), "Scraping register");

    let existing = store.count_by_register_date(date.as_str())?;
    if existing > 0 {
        let old = store.list_by_register_date(date.as_str())?;
        for record in &old {
            store.delete(record)?;
        }
        tracing::info!(
            date = date.as_str(),
            deleted = old.len(),
            "Deleted existing records before refresh"
        );
    }

    let raw = match source.fetch_register(date) {
        Ok(raw) => raw,
        Err(ScraperError::NotPublished { .. }) => {
            tracing::info!(date = date.as_str(), "Register not published yet");
            return Ok(ScrapeOutcome::empty());
        }
        Err(e) => return Err(e),
    };

    let parsed = parse_register(&raw);
    if parsed.skipped > 0 {
        tracing::warn!(
            date = date.as_str(),
            skipped = parsed.skipped,
            "Parser dropped entries missing mandatory fields"
        );
    }
    if parsed.records.is_empty() {
        tracing::info!(date = date.as_str(), "Register parsed to zero entries");
        return Ok(ScrapeOutcome::empty());
    }

    let scraped_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let total_parsed = parsed.records.len();
    let mut saved_count = 0;
    let mut failures: Vec<InsertFailure> = Vec::new();

    for candidate in parsed.records {
        let fields = NewRecord::from_candidate(&candidate, date, &scraped_at);
        match store.create(fields) {
            Ok(_) => saved_count += 1,
            Err(e) => {
                tracing::warn!(
                    date = date.as_str(),
                    docket = %candidate.docket_number,
                    error = %e,
                    "Skipping record that failed insertion"
                );
                failures.push(InsertFailure {
                    candidate,
                    reason: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        date = date.as_str(),
        saved = saved_count,
        total = total_parsed,
        "Scrape complete"
    );

    Ok(ScrapeOutcome {
        saved_count,
        total_parsed,
        failures,
    })
}
