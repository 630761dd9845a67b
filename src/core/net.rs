// src/core/net.rs
// HTTP side of the scraper: the `PageFetcher` seam plus its reqwest-backed
// implementation carrying the browser session cookie.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use thiserror::Error;
use tracing::debug;

use crate::config::consts::{REQUEST_TIMEOUT_SECS, USER_AGENT};

/// Anything that can turn a URL into a page body, already authenticated.
pub trait PageFetcher {
    fn fetch(&mut self, url: &str) -> Result<String, FetchError>;
}

impl<F: PageFetcher + ?Sized> PageFetcher for &mut F {
    fn fetch(&mut self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Connection, timeout or body-read failure. Worth re-issuing.
    #[error("network failure fetching {url}: {reason}")]
    Transient { url: String, reason: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// The request itself is unusable (bad URL, redirect loop, …).
    #[error("cannot request {url}: {reason}")]
    Request { url: String, reason: String },
}

impl FetchError {
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Transient { .. })
    }

    fn from_reqwest(url: &str, e: &reqwest::Error) -> Self {
        let url = s!(url);
        let reason = e.to_string();
        if e.is_builder() || e.is_redirect() {
            FetchError::Request { url, reason }
        } else {
            FetchError::Transient { url, reason }
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cookie contains no name=value pairs")]
    InvalidCookie,

    #[error("pool rejected the session (HTTP {status}); copy a fresh cookie from the browser")]
    Rejected { status: u16 },

    #[error("pool unreachable while checking the session: {0}")]
    Unreachable(FetchError),

    #[error("HTTP client setup failed: {0}")]
    Client(#[from] reqwest::Error),
}

/// Split the value of a browser `Cookie:` header (`a=1; b=2`) into pairs.
/// Pairs without `=` or with an empty name are dropped.
pub fn cookie_pairs(raw: &str) -> Vec<(String, String)> {
    raw.split(';')
        .filter_map(|part| {
            let (name, value) = part.split_once('=')?;
            let name = name.trim();
            if name.is_empty() { return None; }
            let value = value.trim().trim_matches('"');
            Some((s!(name), s!(value)))
        })
        .collect()
}

/// Blocking HTTP session authenticated by a cookie copied out of a browser.
/// The pool's login sits behind a captcha, so there is no way to log in here.
pub struct PoolSession {
    client: Client,
}

impl PoolSession {
    pub fn from_cookie(raw_cookie: &str) -> Result<Self, SessionError> {
        let pairs = cookie_pairs(raw_cookie);
        if pairs.is_empty() {
            return Err(SessionError::InvalidCookie);
        }
        let joined = pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("; ");

        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&joined).map_err(|_| SessionError::InvalidCookie)?;
        headers.insert(COOKIE, value);

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        debug!(cookies = pairs.len(), "session client ready");
        Ok(Self { client })
    }

    /// One request to `url` (normally the pool front page) to make sure the
    /// cookie is still accepted before any history page is touched.
    pub fn check(&mut self, url: &str) -> Result<(), SessionError> {
        match self.fetch(url) {
            Ok(_) => Ok(()),
            Err(FetchError::Status { status, .. }) => Err(SessionError::Rejected { status }),
            Err(e) => Err(SessionError::Unreachable(e)),
        }
    }
}

impl PageFetcher for PoolSession {
    fn fetch(&mut self, url: &str) -> Result<String, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::from_reqwest(url, &e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: s!(url), status: status.as_u16() });
        }
        let body = resp.text().map_err(|e| FetchError::from_reqwest(url, &e))?;
        debug!(url, bytes = body.len(), "fetched");
        Ok(body)
    }
}
