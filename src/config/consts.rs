// src/config/consts.rs

// Net config
pub const POOL_HOST: &str = "miningpoolhub.com";
pub const USER_AGENT: &str = concat!("mph_sync/", env!("CARGO_PKG_VERSION"));
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// Pacing
pub const REQUEST_PAUSE_MS: u64 = 2_000; // pool rate-limits account pages

// Page layout
pub const HISTORY_HEADING: &str = "Transaction History";
pub const SHRUNK_CREDIT_PREFIX: &str = "(Shrunk accumulated Credit";
pub const HISTORY_COLUMNS: usize = 8;

/// Column names the dashboard renders, used when a page has no `<thead>`.
pub const HISTORY_HEADERS: [&str; HISTORY_COLUMNS] = [
    "ID", "Date", "TX Type", "Status", "Payment Address", "TX #", "Block #", "Amount",
];

// CLI
pub const NO_BOUNDARY: &str = "-";
pub const LOG_ENV: &str = "MPH_SYNC_LOG";
