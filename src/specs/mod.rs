// src/specs/mod.rs
//! # Scraping “specs” module
//!
//! Page-specific scraping rules. Each submodule covers one page of the
//! pool dashboard and records *where the data lives in the HTML* and *how to
//! read it*.
//!
//! ## What lives here
//! - **Pure HTML parsing** of an already fetched document. No networking.
//! - **Column rules**: which attribute of which nested element carries the
//!   value of each column.
//! - **Strict failure**: a page that does not match its column rules is
//!   an error. The dashboard layout is assumed stable, so a mismatch means it
//!   changed and guessing would corrupt the books.
//!
//! ## What does **not** live here
//! - **Fetching, pacing, retrying, pagination.** Those belong to `scrape`.
//! - **Output formatting.** See `csv` / `file`.
//!
//! ## Typical call chain
//! ```text
//! cli → scrape::sync → PageFetcher::fetch → specs::transactions::scan_page
//!                    ↘ yields TransactionRecord → csv::write_record
//! ```
//!
//! ## Testing notes
//! - Specs are testable **offline** against hand-written HTML fixtures.
pub mod transactions;
