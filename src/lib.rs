// src/lib.rs

#[macro_use]
pub mod macros;

pub mod config;
pub mod core;
pub mod specs;

pub mod csv;
pub mod file;
pub mod log;
pub mod record;
pub mod scrape;

#[cfg(feature = "cli")]
pub mod cli;

pub use crate::core::net::{FetchError, PageFetcher, PoolSession};
pub use record::TransactionRecord;
pub use scrape::{sync, StopReason, SyncError, Synchronizer};
