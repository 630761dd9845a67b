// tests/common/mod.rs
//
// Offline pool: serves hand-built history pages by `start=` offset and
// records every URL it was asked for.
//
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use mph_sync::config::options::SyncOptions;
use mph_sync::{FetchError, PageFetcher};

#[derive(Clone)]
pub struct Row {
    pub id: String,
    pub address: String,
    pub txn: String,
    pub amount: String,
}

impl Row {
    pub fn credit(id: &str) -> Self {
        Row {
            id: id.into(),
            address: String::new(),
            txn: String::new(),
            amount: r#"<font color="green">0.01</font>"#.into(),
        }
    }

    pub fn payment(id: &str, addr: &str, hash: &str) -> Self {
        Row {
            id: id.into(),
            address: format!(r##"<a href="#" onclick="alert('{addr}')">{}…</a>"##, &addr[..4]),
            txn: format!(r##"<a href="#" title="{hash}">{}…</a>"##, &hash[..4]),
            amount: r#"<font color="red">1.5</font>"#.into(),
        }
    }

    pub fn marker(id: &str) -> Self {
        Row {
            id: id.into(),
            address: "(Shrunk accumulated Credit)".into(),
            txn: String::new(),
            amount: r#"<font color="green">3.25</font>"#.into(),
        }
    }

    fn html(&self) -> String {
        format!(
            "<tr><td>{}</td><td>2018-04-22 10:11:12</td><td>Credit</td><td>\n Confirmed \n</td>\
             <td>{}</td><td>{}</td><td>1234</td><td>{}</td></tr>\n",
            self.id, self.address, self.txn, self.amount
        )
    }
}

pub fn history_page(rows: &[Row]) -> String {
    let body: String = rows.iter().map(Row::html).collect();
    format!(
        r#"<!DOCTYPE html><html><head><title>MiningPoolHub</title></head><body>
<article class="module width_full"><header><h3>Account Information</h3></header>
<table><tbody><tr><td>nothing</td></tr></tbody></table></article>
<article class="module width_full">
  <header><h3>Transaction History</h3></header>
  <table class="tablesorter" cellspacing="0">
    <thead><tr><th>ID</th><th>Date</th><th>TX Type</th><th>Status</th><th>Payment Address</th><th>TX #</th><th>Block #</th><th>Amount</th></tr></thead>
    <tbody>
{body}    </tbody>
  </table>
</article></body></html>"#
    )
}

pub struct FakePool {
    pub rows: Vec<Row>,
    pub page_size: usize,
    /// Pages served verbatim for a given offset, ahead of `rows`.
    pub raw: HashMap<usize, String>,
    /// Failures returned (in order) before any page is served.
    pub failures: VecDeque<FetchError>,
    /// Transient failures still to be returned for a given offset.
    pub flaky: HashMap<usize, u32>,
    pub requests: Vec<String>,
}

impl FakePool {
    pub fn new(rows: Vec<Row>, page_size: usize) -> Self {
        FakePool {
            rows,
            page_size,
            raw: HashMap::new(),
            failures: VecDeque::new(),
            flaky: HashMap::new(),
            requests: Vec::new(),
        }
    }

    /// History whose ids count down from `n` to 1, newest first.
    pub fn countdown(n: usize, page_size: usize) -> Self {
        let rows = (1..=n).rev().map(|i| Row::credit(&i.to_string())).collect();
        Self::new(rows, page_size)
    }

    pub fn offsets(&self) -> Vec<usize> {
        self.requests.iter().map(|u| offset_of(u)).collect()
    }
}

pub fn offset_of(url: &str) -> usize {
    url.rsplit("start=").next().and_then(|s| s.parse().ok()).expect("offset in url")
}

impl PageFetcher for FakePool {
    fn fetch(&mut self, url: &str) -> Result<String, FetchError> {
        self.requests.push(url.to_string());
        if let Some(e) = self.failures.pop_front() {
            return Err(e);
        }
        let start = offset_of(url);
        if let Some(left) = self.flaky.get_mut(&start).filter(|n| **n > 0) {
            *left -= 1;
            return Err(transient(url));
        }
        if let Some(doc) = self.raw.get(&start) {
            return Ok(doc.clone());
        }
        let from = start.min(self.rows.len());
        let to = (start + self.page_size).min(self.rows.len());
        Ok(history_page(&self.rows[from..to]))
    }
}

pub fn transient(url: &str) -> FetchError {
    FetchError::Transient { url: url.into(), reason: "connection reset by peer".into() }
}

pub fn fast() -> SyncOptions {
    SyncOptions { pace: Duration::ZERO, ..SyncOptions::default() }
}

pub fn url(coin: &str, start: usize) -> String {
    fast().history_url(coin, start)
}
