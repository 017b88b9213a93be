//! Reconciliation engine tests against scripted store and source doubles.
//!
//! The store double records every delete and create call in order, so the
//! delete-before-insert discipline and per-record fault isolation are
//! asserted directly rather than inferred from final state.

use std::collections::HashSet;

use pretty_assertions::assert_eq;

use fmcsa_register::engine::scrape_and_store;
use fmcsa_register::error::{Result, ScraperError};
use fmcsa_register::register::RegisterSource;
use fmcsa_register::store::{RecordFilter, RecordPage, RecordStore};
use fmcsa_register::types::{DateToken, FmcsaRecord, NewRecord};

/// Store operation, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Op {
    Delete(i64),
    Create(String),
}

/// In-memory store that journals every mutation.
#[derive(Default)]
struct ScriptedStore {
    records: Vec<FmcsaRecord>,
    next_id: i64,
    reject_dockets: HashSet<String>,
    ops: Vec<Op>,
}

impl ScriptedStore {
    fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    /// Preload `count` records under `date`, bypassing the journal.
    fn preload(&mut self, date: &str, count: usize) {
        for i in 0..count {
            let id = self.next_id;
            self.next_id += 1;
            self.records.push(FmcsaRecord {
                id,
                docket_number: format!("MC-OLD-{i}"),
                carrier_info: format!("OLD CARRIER {i}"),
                category: "PERMITS".to_string(),
                published_date: None,
                register_date: date.to_string(),
                scraped_at: "2026-02-01T00:00:00Z".to_string(),
            });
        }
    }

    fn dockets_for(&self, date: &str) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| r.register_date == date)
            .map(|r| r.docket_number.clone())
            .collect()
    }

    fn first_create_position(&self) -> Option<usize> {
        self.ops.iter().position(|op| matches!(op, Op::Create(_)))
    }

    fn delete_count(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, Op::Delete(_))).count()
    }
}

impl RecordStore for ScriptedStore {
    fn count_by_register_date(&self, token: &str) -> Result<usize> {
        Ok(self.records.iter().filter(|r| r.register_date == token).count())
    }

    fn list_by_register_date(&self, token: &str) -> Result<Vec<FmcsaRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.register_date == token)
            .cloned()
            .collect())
    }

    fn delete(&mut self, record: &FmcsaRecord) -> Result<()> {
        self.ops.push(Op::Delete(record.id));
        self.records.retain(|r| r.id != record.id);
        Ok(())
    }

    fn create(&mut self, fields: NewRecord) -> Result<FmcsaRecord> {
        self.ops.push(Op::Create(fields.docket_number.clone()));

        if self.reject_dockets.contains(&fields.docket_number) {
            return Err(ScraperError::Store(format!(
                "constraint violation on {}",
                fields.docket_number
            )));
        }

        let record = FmcsaRecord {
            id: self.next_id,
            docket_number: fields.docket_number,
            carrier_info: fields.carrier_info,
            category: fields.category,
            published_date: fields.published_date,
            register_date: fields.register_date,
            scraped_at: fields.scraped_at,
        };
        self.next_id += 1;
        self.records.push(record.clone());
        Ok(record)
    }

    fn list(&self, filter: &RecordFilter, skip: usize, limit: usize) -> Result<RecordPage> {
        let matching: Vec<&FmcsaRecord> = self
            .records
            .iter()
            .filter(|r| {
                filter
                    .register_date
                    .as_ref()
                    .is_none_or(|d| &r.register_date == d)
            })
            .collect();
        let total = matching.len();
        let items: Vec<FmcsaRecord> = matching.into_iter().skip(skip).take(limit).cloned().collect();
        Ok(RecordPage {
            items,
            total,
            categories: Vec::new(),
        })
    }

    fn stored_dates(&self) -> Result<Vec<String>> {
        let mut dates: Vec<String> =
            self.records.iter().map(|r| r.register_date.clone()).collect();
        dates.sort();
        dates.dedup();
        Ok(dates)
    }
}

/// Source that always serves the same document.
struct FixedSource(String);

impl RegisterSource for FixedSource {
    fn fetch_register(&self, _date: &DateToken) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Source for a date the upstream has not published.
struct UnpublishedSource;

impl RegisterSource for UnpublishedSource {
    fn fetch_register(&self, date: &DateToken) -> Result<String> {
        Err(ScraperError::NotPublished {
            date: date.as_str().to_string(),
        })
    }
}

/// Source that fails at the transport level, producing a real reqwest error
/// from a connection the OS refuses.
struct UnreachableSource;

impl RegisterSource for UnreachableSource {
    fn fetch_register(&self, date: &DateToken) -> Result<String> {
        let client = fmcsa_register::http::create_client()?;
        fmcsa_register::register::fetch_register(&client, "http://127.0.0.1:1", date)
    }
}

const THREE_ENTRY_REGISTER: &str = r#"
<h3>CERTIFICATES</h3>
<p>MC-903113 ACME TRUCKING LLC - SPRINGFIELD, IL</p>
<p>MC-445210 BLUE RIDGE CARRIERS INC - ASHEVILLE, NC</p>

<h3>PERMITS</h3>
<p>FF-12345 INTERSTATE FREIGHT FORWARDING CO - DALLAS, TX</p>
"#;

const TWO_ENTRY_REGISTER: &str = r#"
<h3>DISMISSALS</h3>
<p>MC-111111 FIRST CARRIER - TULSA, OK</p>
<p>MC-222222 SECOND CARRIER - EL PASO, TX</p>
"#;

fn token(s: &str) -> DateToken {
    DateToken::parse(s).expect("valid token")
}

#[test]
fn fresh_date_saves_all_parsed_records() {
    let mut store = ScriptedStore::new();
    let source = FixedSource(THREE_ENTRY_REGISTER.to_string());
    let date = token("20-FEB-26");

    let outcome = scrape_and_store(&mut store, &source, &date).unwrap();

    assert_eq!(outcome.saved_count, 3);
    assert_eq!(outcome.total_parsed, 3);
    assert!(outcome.failures.is_empty());
    assert_eq!(store.count_by_register_date("20-FEB-26").unwrap(), 3);
}

#[test]
fn no_deletes_for_unseen_date() {
    let mut store = ScriptedStore::new();
    store.preload("19-FEB-26", 4); // other date, must not be touched
    let source = FixedSource(THREE_ENTRY_REGISTER.to_string());

    scrape_and_store(&mut store, &source, &token("20-FEB-26")).unwrap();

    assert_eq!(store.delete_count(), 0);
    assert_eq!(store.count_by_register_date("19-FEB-26").unwrap(), 4);
}

#[test]
fn existing_records_deleted_before_any_insert() {
    let mut store = ScriptedStore::new();
    store.preload("20-FEB-26", 5);
    let source = FixedSource(TWO_ENTRY_REGISTER.to_string());

    let outcome = scrape_and_store(&mut store, &source, &token("20-FEB-26")).unwrap();

    assert_eq!(store.delete_count(), 5);
    let first_create = store.first_create_position().expect("creates happened");
    assert!(
        store.ops[..first_create]
            .iter()
            .all(|op| matches!(op, Op::Delete(_))),
        "all deletes must precede the first insert: {:?}",
        store.ops
    );

    assert_eq!(outcome.saved_count, 2);
    assert_eq!(outcome.total_parsed, 2);
    assert_eq!(store.count_by_register_date("20-FEB-26").unwrap(), 2);
}

#[test]
fn rescrape_is_idempotent_for_stable_document() {
    let mut store = ScriptedStore::new();
    let source = FixedSource(THREE_ENTRY_REGISTER.to_string());
    let date = token("20-FEB-26");

    let first = scrape_and_store(&mut store, &source, &date).unwrap();
    let after_first = store.dockets_for("20-FEB-26");

    let second = scrape_and_store(&mut store, &source, &date).unwrap();
    let after_second = store.dockets_for("20-FEB-26");

    assert_eq!(first.saved_count, second.saved_count);
    assert_eq!(after_first, after_second);
    assert_eq!(store.count_by_register_date("20-FEB-26").unwrap(), 3);
}

#[test]
fn empty_document_is_zero_record_success() {
    let mut store = ScriptedStore::new();
    let source = FixedSource("<h2>FMCSA REGISTER</h2>".to_string());

    let outcome = scrape_and_store(&mut store, &source, &token("20-FEB-26")).unwrap();

    assert_eq!(outcome.saved_count, 0);
    assert_eq!(outcome.total_parsed, 0);
}

#[test]
fn unpublished_date_is_zero_record_success() {
    let mut store = ScriptedStore::new();

    let outcome = scrape_and_store(&mut store, &UnpublishedSource, &token("20-FEB-26")).unwrap();

    assert_eq!(outcome.saved_count, 0);
    assert_eq!(outcome.total_parsed, 0);
}

#[test]
fn insert_failures_are_isolated_and_reported() {
    let mut store = ScriptedStore::new();
    store.reject_dockets.insert("MC-445210".to_string());
    let source = FixedSource(THREE_ENTRY_REGISTER.to_string());

    let outcome = scrape_and_store(&mut store, &source, &token("20-FEB-26")).unwrap();

    assert_eq!(outcome.saved_count, 2);
    assert_eq!(outcome.total_parsed, 3);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].candidate.docket_number, "MC-445210");
    assert!(outcome.failures[0].reason.contains("constraint violation"));

    // Survivors are exactly the accepted candidates
    assert_eq!(
        store.dockets_for("20-FEB-26"),
        vec!["MC-903113".to_string(), "FF-12345".to_string()]
    );
}

#[test]
fn all_inserts_failing_still_reports_total_parsed() {
    let mut store = ScriptedStore::new();
    for docket in ["MC-111111", "MC-222222"] {
        store.reject_dockets.insert(docket.to_string());
    }
    let source = FixedSource(TWO_ENTRY_REGISTER.to_string());

    let outcome = scrape_and_store(&mut store, &source, &token("20-FEB-26")).unwrap();

    // Zero saved but non-zero total distinguishes this from "not published"
    assert_eq!(outcome.saved_count, 0);
    assert_eq!(outcome.total_parsed, 2);
    assert_eq!(outcome.failures.len(), 2);
}

#[test]
fn scripted_store_total_counts_all_matches_regardless_of_pagination() {
    let mut store = ScriptedStore::new();
    store.preload("20-FEB-26", 5);

    let page = store.list(&RecordFilter::default(), 2, 2).unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.items.len(), 2);
}

#[test]
fn transport_failure_propagates_as_upstream_unavailable() {
    let mut store = ScriptedStore::new();

    let err = scrape_and_store(&mut store, &UnreachableSource, &token("20-FEB-26")).unwrap_err();

    assert!(matches!(err, ScraperError::UpstreamUnavailable { .. }));
}

#[test]
fn fetch_failure_after_deletes_leaves_date_partially_reconciled() {
    // Deletion and insertion are separate phases. A fetch failure between
    // them leaves the date empty: old records gone, nothing inserted. This
    // is the documented abort hazard; the test pins the behavior down.
    let mut store = ScriptedStore::new();
    store.preload("20-FEB-26", 5);

    let err = scrape_and_store(&mut store, &UnreachableSource, &token("20-FEB-26"));

    assert!(err.is_err());
    assert_eq!(store.delete_count(), 5);
    assert_eq!(store.count_by_register_date("20-FEB-26").unwrap(), 0);
}
