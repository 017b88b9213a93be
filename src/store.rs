//! Record store boundary.
//!
//! The reconciliation engine consumes persistence through the [`RecordStore`]
//! trait; the storage engine behind it is deliberately out of scope. A
//! JSON-file-backed implementation is provided so the CLI works end to end
//! and so per-record create failure has a concrete source.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScraperError};
use crate::types::{FmcsaRecord, NewRecord};

/// Filters for the read-only listing path.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    /// Exact register date token.
    pub register_date: Option<String>,

    /// Exact category.
    pub category: Option<String>,

    /// Case-insensitive substring over docket number or carrier info.
    pub search: Option<String>,
}

/// One page of filtered records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPage {
    /// Records in id order, after `skip`/`limit`.
    pub items: Vec<FmcsaRecord>,

    /// Total matching records before pagination.
    pub total: usize,

    /// Sorted distinct categories under the register-date filter
    /// (category and search filters are not applied here, so the category
    /// picker stays stable while narrowing).
    pub categories: Vec<String>,
}

/// Persistence boundary consumed by the reconciliation engine.
pub trait RecordStore {
    /// Count records scraped under a register date.
    fn count_by_register_date(&self, token: &str) -> Result<usize>;

    /// All records scraped under a register date.
    fn list_by_register_date(&self, token: &str) -> Result<Vec<FmcsaRecord>>;

    /// Delete one record.
    fn delete(&mut self, record: &FmcsaRecord) -> Result<()>;

    /// Create one record. May fail per record; the engine isolates failures.
    fn create(&mut self, fields: NewRecord) -> Result<FmcsaRecord>;

    /// Filtered, paginated listing with distinct-category enumeration.
    fn list(&self, filter: &RecordFilter, skip: usize, limit: usize) -> Result<RecordPage>;

    /// Distinct register dates present, most recent first.
    fn stored_dates(&self) -> Result<Vec<String>>;
}

/// On-disk shape of the JSON store file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    next_id: i64,
    records: Vec<FmcsaRecord>,
}

/// Record store persisted as a single JSON file.
///
/// The whole file is loaded on open and rewritten after each mutation;
/// register batches are small (hundreds of entries), so simplicity wins
/// over incremental writes.
pub struct JsonFileStore {
    path: PathBuf,
    next_id: i64,
    records: Vec<FmcsaRecord>,
}

impl JsonFileStore {
    /// Open a store file, creating an empty store if the file is absent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let file = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str::<StoreFile>(&raw)?
        } else {
            StoreFile {
                next_id: 1,
                records: Vec::new(),
            }
        };

        Ok(Self {
            path,
            next_id: file.next_id,
            records: file.records,
        })
    }

    fn persist(&self) -> Result<()> {
        let file = StoreFile {
            next_id: self.next_id,
            records: self.records.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn matches(record: &FmcsaRecord, filter: &RecordFilter) -> bool {
        if let Some(date) = &filter.register_date {
            if &record.register_date != date {
                return false;
            }
        }
        if let Some(category) = &filter.category {
            if &record.category != category {
                return false;
            }
        }
        if let Some(search) = &filter.search {
            let needle = search.to_lowercase();
            let in_docket = record.docket_number.to_lowercase().contains(&needle);
            let in_carrier = record.carrier_info.to_lowercase().contains(&needle);
            if !in_docket && !in_carrier {
                return false;
            }
        }
        true
    }
}

impl RecordStore for JsonFileStore {
    fn count_by_register_date(&self, token: &str) -> Result<usize> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.register_date == token)
            .count())
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
        let before = self.records.len();
        self.records.retain(|r| r.id != record.id);
        if self.records.len() == before {
            return Err(ScraperError::Store(format!(
                "No record with id {} to delete",
                record.id
            )));
        }
        self.persist()
    }

    fn create(&mut self, fields: NewRecord) -> Result<FmcsaRecord> {
        if fields.docket_number.trim().is_empty() {
            return Err(ScraperError::Store("docket_number must not be empty".to_string()));
        }
        if fields.carrier_info.trim().is_empty() {
            return Err(ScraperError::Store("carrier_info must not be empty".to_string()));
        }
        if self.records.iter().any(|r| {
            r.docket_number == fields.docket_number && r.register_date == fields.register_date
        }) {
            return Err(ScraperError::Store(format!(
                "Duplicate docket {} for register date {}",
                fields.docket_number, fields.register_date
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
        self.persist()?;
        Ok(record)
    }

    fn list(&self, filter: &RecordFilter, skip: usize, limit: usize) -> Result<RecordPage> {
        let mut matching: Vec<&FmcsaRecord> = self
            .records
            .iter()
            .filter(|r| Self::matches(r, filter))
            .collect();
        matching.sort_by_key(|r| r.id);
        let total = matching.len();

        let items: Vec<FmcsaRecord> = matching
            .into_iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect();

        let date_only = RecordFilter {
            register_date: filter.register_date.clone(),
            ..RecordFilter::default()
        };
        let mut categories: Vec<String> = self
            .records
            .iter()
            .filter(|r| Self::matches(r, &date_only))
            .map(|r| r.category.clone())
            .collect();
        categories.sort();
        categories.dedup();

        Ok(RecordPage {
            items,
            total,
            categories,
        })
    }

    fn stored_dates(&self) -> Result<Vec<String>> {
        let mut dates: Vec<String> = self
            .records
            .iter()
            .map(|r| r.register_date.clone())
            .collect();
        dates.sort();
        dates.dedup();

        // Tokens in the store came through DateToken validation, so they
        // parse; sort chronologically, most recent first.
        dates.sort_by_key(|d| {
            std::cmp::Reverse(chrono::NaiveDate::parse_from_str(d, "%d-%b-%y").ok())
        });
        Ok(dates)
    }
}
