// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;

/// Knobs for one synchronization run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncOptions {
    /// Base host; each coin lives on `<coin>.<host>`.
    pub host: String,
    /// Fixed pause before every page request.
    pub pace: Duration,
    pub retry: RetryPolicy,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            host: s!(POOL_HOST),
            pace: Duration::from_millis(REQUEST_PAUSE_MS),
            retry: RetryPolicy::default(),
        }
    }
}

impl SyncOptions {
    /// URL of the history page starting at row `start`.
    pub fn history_url(&self, coin: &str, start: usize) -> String {
        format!(
            "https://{coin}.{}/index.php?page=account&action=transactions&start={start}",
            self.host
        )
    }

    /// Front page used to check that the session cookie is accepted.
    pub fn front_page_url(&self) -> String {
        format!("https://{}/index.php", self.host)
    }
}

/// How transient fetch failures are retried.
///
/// The default retries forever with no backoff: the request is simply
/// re-issued after the usual pacing delay.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct RetryPolicy {
    /// `None` = unbounded.
    pub max_retries: Option<u32>,
    /// Extra delay per consecutive failure (linear).
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Whether another attempt is allowed after `failures` consecutive failures.
    pub fn allows(&self, failures: u32) -> bool {
        self.max_retries.is_none_or(|max| failures <= max)
    }

    pub fn backoff_for(&self, failures: u32) -> Duration {
        self.backoff.saturating_mul(failures)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn delim(&self) -> char {
        match self { ExportFormat::Csv => ',', ExportFormat::Tsv => '\t' }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub include_headers: bool,
    /// `None` → stdout.
    pub out: Option<PathBuf>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            include_headers: true,
            out: None,
        }
    }
}
