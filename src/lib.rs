//! FMCSA Register scraper.
//!
//! This crate discovers which FMCSA Register publication dates exist
//! upstream, fetches and parses a given date's register into typed records,
//! and reconciles those records against a local store with idempotent
//! delete-then-reinsert refresh semantics per date.
//!
//! # Example
//!
//! ```
//! use fmcsa_register::types::DateToken;
//!
//! // Date tokens are validated before any network call
//! assert!(DateToken::parse("20-FEB-26").is_ok());
//! assert!(DateToken::parse("2026-02-20").is_err());
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Constants, URL builders, date-token validation
//! - [`types`]: Core data types (DateToken, FmcsaRecord, ScrapeOutcome, ...)
//! - [`error`]: Error types and Result alias
//! - [`http`]: HTTP client for the upstream site
//! - [`dates`]: Date discovery against the upstream index
//! - [`register`]: Per-date register document fetching
//! - [`parser`]: Pure register-document parsing
//! - [`store`]: Record store boundary and the JSON-file-backed store
//! - [`engine`]: The scrape-and-reconcile pipeline
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod dates;
pub mod engine;
pub mod error;
pub mod http;
pub mod parser;
pub mod register;
pub mod store;
pub mod types;

// Re-export main operations
pub use dates::list_available_dates;
pub use engine::scrape_and_store;

// Re-export commonly used items
pub use config::validate_date_token;
pub use error::{Result, ScraperError};
pub use types::{CandidateRecord, DateToken, FmcsaRecord, RegisterDate, ScrapeOutcome};
