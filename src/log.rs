// src/log.rs
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::consts::LOG_ENV;

/// Default filter for a given `-v` count.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "mph_sync=info",
        1 => "mph_sync=debug",
        _ => "mph_sync=trace,reqwest=debug",
    }
}

/// Install the global subscriber.
///
/// `MPH_SYNC_LOG` (or `RUST_LOG`) wins over the verbosity default. Logs go to
/// stderr, or are appended to `log_file`, so stdout stays pure CSV.
pub fn init(verbosity: u8, log_file: Option<&Path>) -> io::Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    // try_init: a second call (tests) keeps the first subscriber
    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let _ = builder.with_ansi(false).with_writer(Mutex::new(file)).try_init();
        }
        None => {
            let _ = builder.with_writer(io::stderr).try_init();
        }
    }
    Ok(())
}
