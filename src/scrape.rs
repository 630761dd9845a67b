// src/scrape.rs
//! Incremental pull of the transaction history.
//!
//! The dashboard paginates by row offset, so the cursor is simply the number
//! of rows consumed so far. A run stops at the caller's last recorded id, or
//! when a page comes back with no rows. Pages are fetched lazily: the next one
//! is only requested once the consumer has drained the previous one.

use std::collections::VecDeque;
use std::iter::FusedIterator;
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    config::options::SyncOptions,
    core::net::{FetchError, PageFetcher},
    record::TransactionRecord,
    specs::transactions::{scan_page, PageEnd, PageScan, ParseError},
};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The page no longer looks like the history page we know.
    #[error("unexpected page layout at {url}: {source}")]
    Structure {
        url: String,
        #[source]
        source: ParseError,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// Met the caller's last recorded id.
    BoundaryReached,
    /// A page came back empty.
    Exhausted,
}

/// Start a run for `coin`, stopping at `last_id` (`None` = fetch everything).
///
/// Nothing is fetched until the returned iterator is polled.
pub fn sync<'f, F>(
    fetcher: &'f mut F,
    coin: &str,
    last_id: Option<&str>,
    options: SyncOptions,
) -> Synchronizer<'f, F>
where
    F: PageFetcher + ?Sized,
{
    Synchronizer {
        fetcher,
        coin: s!(coin),
        boundary: last_id.map(|id| s!(id.trim())),
        options,
        start: 0,
        pages: 0,
        buffer: VecDeque::new(),
        pending: None,
        headers: None,
        outcome: None,
        done: false,
    }
}

/// Lazy, single-use sequence of newly seen records, newest first.
pub struct Synchronizer<'f, F: PageFetcher + ?Sized> {
    fetcher: &'f mut F,
    coin: String,
    boundary: Option<String>,
    options: SyncOptions,
    start: usize,
    pages: usize,
    buffer: VecDeque<TransactionRecord>,
    pending: Option<SyncError>,
    headers: Option<Vec<String>>,
    outcome: Option<StopReason>,
    done: bool,
}

impl<F: PageFetcher + ?Sized> Synchronizer<'_, F> {
    /// Why the run ended; `None` while running or after an error.
    pub fn outcome(&self) -> Option<StopReason> {
        self.outcome
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    /// Offset cursor: rows consumed so far.
    pub fn offset(&self) -> usize {
        self.start
    }

    /// Column names from the first page's `<thead>`, once it has been fetched.
    pub fn headers(&self) -> Option<&[String]> {
        self.headers.as_deref()
    }

    fn next_page(&mut self) {
        let url = self.options.history_url(&self.coin, self.start);

        let doc = match fetch_paced(&mut *self.fetcher, &url, &self.options) {
            Ok(doc) => doc,
            Err(e) => {
                self.pending = Some(e.into());
                return;
            }
        };
        self.pages += 1;

        let scan = match scan_page(&doc, self.boundary.as_deref()) {
            Ok(scan) => scan,
            Err(source) => {
                self.pending = Some(SyncError::Structure { url, source });
                return;
            }
        };
        let num = scan.processed();
        let PageScan { headers, records, end } = scan;
        if self.pages == 1 {
            self.headers = headers;
        }

        self.start += num;
        debug!(url = %url, rows = num, offset = self.start, "page read");
        self.buffer.extend(records);

        match end {
            PageEnd::Boundary => self.finish(StopReason::BoundaryReached),
            PageEnd::Malformed(source) => self.pending = Some(SyncError::Structure { url, source }),
            PageEnd::EndOfTable if num == 0 => self.finish(StopReason::Exhausted),
            PageEnd::EndOfTable => {}
        }
    }

    fn finish(&mut self, reason: StopReason) {
        info!(
            coin = %self.coin,
            pages = self.pages,
            records = self.start,
            ?reason,
            "sync finished"
        );
        self.outcome = Some(reason);
        self.done = true;
    }
}

impl<F: PageFetcher + ?Sized> Iterator for Synchronizer<'_, F> {
    type Item = Result<TransactionRecord, SyncError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(rec) = self.buffer.pop_front() {
                return Some(Ok(rec));
            }
            // buffered records from before a failure go out first
            if let Some(err) = self.pending.take() {
                self.done = true;
                return Some(Err(err));
            }
            if self.done {
                return None;
            }
            self.next_page();
        }
    }
}

impl<F: PageFetcher + ?Sized> FusedIterator for Synchronizer<'_, F> {}

/// Fetch `url` after the pacing delay, re-issuing the same request on
/// transient failures for as long as the retry policy allows.
fn fetch_paced<F>(fetcher: &mut F, url: &str, options: &SyncOptions) -> Result<String, FetchError>
where
    F: PageFetcher + ?Sized,
{
    let mut failures = 0u32;
    loop {
        pause(options.pace + options.retry.backoff_for(failures));
        match fetcher.fetch(url) {
            Ok(body) => return Ok(body),
            Err(e) if e.is_transient() => {
                failures = failures.saturating_add(1);
                if !options.retry.allows(failures) {
                    warn!(url, attempts = failures, error = %e, "giving up");
                    return Err(e);
                }
                warn!(url, attempt = failures, error = %e, "fetch failed, retrying");
            }
            Err(e) => return Err(e),
        }
    }
}

fn pause(d: Duration) {
    if !d.is_zero() {
        thread::sleep(d);
    }
}
