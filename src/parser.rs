//! Register document parsing.
//!
//! A register page is semi-structured: all-caps section headings name the
//! category, and each entry under a heading starts with a docket number
//! followed by a free-text carrier block, optionally carrying a published
//! date. The parser is a pure function over the fetched markup; it performs
//! no I/O and never fails the whole document for a bad entry.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::validate_date_token;
use crate::types::{CandidateRecord, ParseOutcome};

/// Docket number at the start of a line, e.g. `MC-903113`, `FF-12345-C`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DOCKET_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^((?:MC|FF|MX|FM)-\d+(?:-[A-Z])?)\b").expect("valid regex"));

/// Section heading: all-caps words, no digits, at least four characters.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static HEADING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z &/,'\-]{3,}$").expect("valid regex"));

/// A `DD-MON-YY` token anywhere in an entry body.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static EMBEDDED_DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{2}-[A-Z]{3}-\d{2})\b").expect("valid regex"));

/// Collapses runs of whitespace when joining entry lines.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Parse a raw register document into candidate records.
///
/// Entries are emitted in document order. An entry missing only its optional
/// published date is still emitted; an entry where a mandatory field (docket
/// number, carrier info, category) cannot be located increments `skipped`
/// and is dropped without aborting the parse.
#[must_use]
pub fn parse_register(raw: &str) -> ParseOutcome {
    let text = strip_markup(raw);

    let mut outcome = ParseOutcome::default();
    let mut category: Option<String> = None;
    let mut entry: Option<EntryBuilder> = None;

    for line in text.lines() {
        let line = line.trim();

        if line.is_empty() {
            finish_entry(entry.take(), &mut outcome);
            continue;
        }

        if let Some(caps) = DOCKET_PATTERN.captures(line) {
            finish_entry(entry.take(), &mut outcome);

            let docket = caps[1].to_string();
            let rest = line[caps[0].len()..].trim_start_matches([' ', '-', ':']);
            entry = Some(EntryBuilder::new(docket, rest, category.clone()));
            continue;
        }

        match entry.as_mut() {
            // Inside an entry every line is carrier text, headings included;
            // only a blank line or a new docket closes the entry.
            Some(builder) => builder.push_line(line),
            None => {
                if HEADING_PATTERN.is_match(line) {
                    category = Some(line.to_string());
                }
                // Anything else between entries is page chrome; ignore it.
            }
        }
    }

    finish_entry(entry.take(), &mut outcome);
    outcome
}

/// Partial entry being accumulated while scanning.
struct EntryBuilder {
    docket_number: String,
    body: String,
    category: Option<String>,
}

impl EntryBuilder {
    fn new(docket_number: String, first_line: &str, category: Option<String>) -> Self {
        Self {
            docket_number,
            body: first_line.trim().to_string(),
            category,
        }
    }

    fn push_line(&mut self, line: &str) {
        if !self.body.is_empty() {
            self.body.push(' ');
        }
        self.body.push_str(line);
    }

    /// Close the entry, splitting out the optional published date.
    ///
    /// Returns `None` when a mandatory field is missing.
    fn build(self) -> Option<CandidateRecord> {
        let category = self.category?;

        let (carrier_info, published_date) = split_published_date(&self.body);
        if carrier_info.is_empty() {
            return None;
        }

        Some(CandidateRecord {
            docket_number: self.docket_number,
            carrier_info,
            category,
            published_date,
        })
    }
}

fn finish_entry(entry: Option<EntryBuilder>, outcome: &mut ParseOutcome) {
    let Some(builder) = entry else { return };

    match builder.build() {
        Some(record) => outcome.records.push(record),
        None => {
            outcome.skipped += 1;
            tracing::debug!(skipped = outcome.skipped, "Dropped entry missing mandatory fields");
        }
    }
}

/// Pull the first valid embedded date token out of an entry body.
///
/// The token (plus an immediately preceding `PUBLISHED`/`SERVED`/`DECIDED`
/// label, if any) is removed from the carrier text.
fn split_published_date(body: &str) -> (String, Option<String>) {
    let mut published: Option<String> = None;
    let mut remainder = body.to_string();

    for caps in EMBEDDED_DATE_PATTERN.captures_iter(body) {
        let token = &caps[1];
        if validate_date_token(token).is_err() {
            continue;
        }
        published = Some(token.to_string());

        // Strip the token and a label directly before it
        let with_label = format!(r"(?:PUBLISHED|SERVED|DECIDED)[:\s]*{token}");
        #[allow(clippy::expect_used)] // Token shape is fixed by the pattern above
        let label_re = Regex::new(&with_label).expect("valid regex");
        remainder = if label_re.is_match(&remainder) {
            label_re.replace(&remainder, "").into_owned()
        } else {
            remainder.replacen(token, "", 1)
        };
        break;
    }

    let cleaned = WHITESPACE_RUN.replace_all(remainder.trim(), " ").into_owned();
    let cleaned = cleaned.trim_matches([' ', '-', ',', ':']).to_string();
    (cleaned, published)
}

/// Reduce register markup to plain text lines.
///
/// Closing a block-level container ends the current line AND inserts a
/// blank line, so an entry is closed at its block boundary even when the
/// markup is compact (`</p><h3>PERMITS</h3>` with no source newline).
/// `<br>` and cell closers produce a single line break: lines within one
/// paragraph or table row belong to the same entry. The handful of
/// entities the register pages actually use are decoded.
fn strip_markup(raw: &str) -> String {
    #[allow(clippy::expect_used)] // Static regexes that are guaranteed to be valid
    static BLOCK_END_TAGS: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)</(?:p|div|tr|li|h[1-6]|table)>").expect("valid regex")
    });
    #[allow(clippy::expect_used)]
    static LINE_BREAK_TAGS: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>|</(?:td|th)>").expect("valid regex"));
    #[allow(clippy::expect_used)]
    static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

    let text = BLOCK_END_TAGS.replace_all(raw, "\n\n");
    let text = LINE_BREAK_TAGS.replace_all(&text, "\n");
    let text = ANY_TAG.replace_all(&text, " ");

    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}
