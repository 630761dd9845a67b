// src/cli.rs
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

use crate::config::consts::{NO_BOUNDARY, POOL_HOST, REQUEST_PAUSE_MS};
use crate::config::options::{ExportFormat, ExportOptions, RetryPolicy, SyncOptions};
use crate::core::net::PoolSession;
use crate::file::RecordWriter;
use crate::{log, scrape};

const COOKIE_HELP: &str = "\
The pool login is behind a captcha, so this tool cannot log in by itself.
Log in with a browser, open the developer tools, and copy the value of the
Cookie request header (everything after 'Cookie:'), e.g.
    '__cfduid=...; PHPSESSID=...; cf_clearance=...'
Pass it quoted as the third argument.";

#[derive(Parser, Debug)]
#[command(
    name = "mph_sync",
    version,
    about = "Print MiningPoolHub transactions newer than the last recorded id as CSV",
    after_help = COOKIE_HELP
)]
pub struct Args {
    /// Coin subdomain, e.g. `litecoin`, `ethereum`
    pub coin: String,

    /// Last transaction id already recorded; `-` fetches the whole history
    pub last_id: String,

    /// Value of the browser's `Cookie:` header for a logged-in session
    pub cookie: String,

    /// Pause before every page request, in milliseconds
    #[arg(long, default_value_t = REQUEST_PAUSE_MS)]
    pub delay_ms: u64,

    /// Give up after this many consecutive network failures (default: never)
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Extra pause per consecutive failure, in milliseconds
    #[arg(long, default_value_t = 0)]
    pub backoff_ms: u64,

    #[arg(long, default_value = POOL_HOST)]
    pub host: String,

    #[arg(long, value_enum, default_value_t = Format::Csv)]
    pub format: Format,

    /// Do not print the header line
    #[arg(long)]
    pub no_headers: bool,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Csv,
    Tsv,
}

impl From<Format> for ExportFormat {
    fn from(f: Format) -> Self {
        match f { Format::Csv => ExportFormat::Csv, Format::Tsv => ExportFormat::Tsv }
    }
}

impl Args {
    pub fn boundary(&self) -> Option<&str> {
        let id = self.last_id.trim();
        if id == NO_BOUNDARY { None } else { Some(id) }
    }

    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            host: self.host.clone(),
            pace: Duration::from_millis(self.delay_ms),
            retry: RetryPolicy {
                max_retries: self.max_retries,
                backoff: Duration::from_millis(self.backoff_ms),
            },
        }
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            format: self.format.into(),
            include_headers: !self.no_headers,
            out: self.out.clone(),
        }
    }
}

/// Parse argv. Usage errors print clap's message plus the cookie
/// instructions and exit 1; `--help` and `--version` exit 0.
pub fn parse() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            eprint!("{}", usage_message(&e));
            std::process::exit(1);
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(0);
        }
    }
}

/// What a usage error prints: clap's diagnostic, then how to get the cookie.
pub fn usage_message(e: &clap::Error) -> String {
    format!("{}\n{COOKIE_HELP}\n", e.render())
}

pub fn run(args: Args) -> Result<()> {
    log::init(args.verbose, args.log_file.as_deref()).wrap_err("cannot open log file")?;

    let options = args.sync_options();
    let mut session = PoolSession::from_cookie(&args.cookie).wrap_err("authentication failed")?;
    session
        .check(&options.front_page_url())
        .wrap_err("authentication failed")?;
    info!(coin = %args.coin, boundary = ?args.boundary(), "session accepted");

    let mut writer = RecordWriter::open(&args.export_options()).wrap_err("cannot open output")?;
    let mut run = scrape::sync(&mut session, &args.coin, args.boundary(), options);

    // headers are known once the first page is in
    let first = run.next();
    if !matches!(first, Some(Err(_))) {
        writer.write_header(run.headers())?;
    }

    for item in first.into_iter().chain(run.by_ref()) {
        match item {
            Ok(rec) => writer.write(&rec)?,
            Err(e) => {
                // keep what was already printed
                writer.into_inner()?;
                return Err(e).wrap_err(format!("sync of {} stopped", args.coin));
            }
        }
    }

    let rows = writer.rows_written();
    writer.into_inner()?;
    info!(rows, pages = run.pages_fetched(), offset = run.offset(), outcome = ?run.outcome(), "done");
    Ok(())
}
