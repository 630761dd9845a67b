// src/specs/transactions.rs
//! Scraping rules for the account "Transaction History" page.
//!
//! Layout this module relies on:
//! ```text
//! <article>
//!   <header><h3>Transaction History</h3></header>
//!   <table>
//!     <thead><tr><th>ID</th> … <th>Amount</th></tr></thead>
//!     <tbody>
//!       <tr><td>id</td><td>date</td><td>type</td><td>status</td>
//!           <td>address | <a onclick="alert('ADDR')">…</a></td>
//!           <td><a title="TXHASH">…</a></td><td>block</td>
//!           <td><font color="red|green">amount</font></td></tr>
//!     </tbody>
//!   </table>
//! </article>
//! ```
//! Rows come newest first.

use thiserror::Error;

use crate::config::consts::{HISTORY_COLUMNS, HISTORY_HEADING, SHRUNK_CREDIT_PREFIX};
use crate::core::html::{
    attr_ci, first_block_ci, first_open_tag_ci, inner_after_open_tag, sibling_blocks_ci,
    tag_blocks_ci, visible_text,
};
use crate::record::TransactionRecord;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("no \"Transaction History\" section on the page")]
    MissingSection,

    #[error("\"Transaction History\" section has no <{0}>")]
    MissingTable(&'static str),

    #[error("row {row}: expected 8 cells, found {found}")]
    CellCount { row: usize, found: usize },

    #[error("row {row}: {column} cell has text but no <{tag} {attr}=…>")]
    MissingLink { row: usize, column: &'static str, tag: &'static str, attr: &'static str },

    #[error("row {row}: {column} link action {action:?} has no quoted argument")]
    MalformedAction { row: usize, column: &'static str, action: String },
}

/// How one cell turns into a field value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellRule {
    /// Visible text, whitespace collapsed.
    Text,
    /// Marker text, or the quoted argument of the link's `onclick`, or text.
    Address,
    /// Empty, or the `title` of the cell's link.
    LinkTitle,
    /// Text, `-` prefixed when rendered in red.
    SignedAmount,
}

/// Decoding rule for each column, in page order.
pub const COLUMN_RULES: [(&str, CellRule); HISTORY_COLUMNS] = [
    ("id", CellRule::Text),
    ("date", CellRule::Text),
    ("type", CellRule::Text),
    ("confirmations", CellRule::Text),
    ("address", CellRule::Address),
    ("txn_reference", CellRule::LinkTitle),
    ("block", CellRule::Text),
    ("amount", CellRule::SignedAmount),
];

/// The located history table of one page.
pub struct HistoryTable<'a> {
    /// `<thead>` column names, if the page has them.
    pub headers: Option<Vec<String>>,
    body: &'a str,
}

impl<'a> HistoryTable<'a> {
    pub fn rows(&self) -> impl Iterator<Item = HistoryRow<'a>> {
        sibling_blocks_ci(self.body, "tr").enumerate().map(|(index, tr)| HistoryRow {
            index,
            cells: sibling_blocks_ci(inner_after_open_tag(tr), "td").collect(),
        })
    }
}

/// One `<tr>` of the table body, cells still raw.
pub struct HistoryRow<'a> {
    index: usize,
    cells: Vec<&'a str>,
}

impl HistoryRow<'_> {
    /// Id column as text, if the row has any cell at all.
    pub fn id(&self) -> Option<String> {
        self.cells.first().map(|td| visible_text(inner_after_open_tag(td)))
    }

    pub fn decode(&self) -> Result<TransactionRecord, ParseError> {
        if self.cells.len() != HISTORY_COLUMNS {
            return Err(ParseError::CellCount { row: self.index, found: self.cells.len() });
        }
        let mut out: [String; HISTORY_COLUMNS] = Default::default();
        for (i, &(column, rule)) in COLUMN_RULES.iter().enumerate() {
            out[i] = decode_cell(rule, self.cells[i], self.index, column)?;
        }
        Ok(TransactionRecord::from(out))
    }
}

/// Find the "Transaction History" article and its table.
pub fn locate_history(doc: &str) -> Result<HistoryTable<'_>, ParseError> {
    for article in tag_blocks_ci(doc, "article") {
        let title = first_block_ci(article, "header")
            .and_then(|header| first_block_ci(header, "h3"))
            .map(visible_text);
        if title.as_deref() != Some(HISTORY_HEADING) {
            continue;
        }

        let table = first_block_ci(article, "table").ok_or(ParseError::MissingTable("table"))?;
        let sections = inner_after_open_tag(table);
        let headers = sibling_blocks_ci(sections, "thead")
            .next()
            .and_then(|thead| sibling_blocks_ci(inner_after_open_tag(thead), "tr").next())
            .map(|tr| {
                sibling_blocks_ci(inner_after_open_tag(tr), "th")
                    .map(|th| visible_text(inner_after_open_tag(th)))
                    .collect::<Vec<_>>()
            })
            .filter(|h| !h.is_empty());
        let body = sibling_blocks_ci(sections, "tbody")
            .next()
            .ok_or(ParseError::MissingTable("tbody"))?;

        return Ok(HistoryTable { headers, body: inner_after_open_tag(body) });
    }
    Err(ParseError::MissingSection)
}

fn decode_cell(
    rule: CellRule,
    td: &str,
    row: usize,
    column: &'static str,
) -> Result<String, ParseError> {
    let inner = inner_after_open_tag(td);
    let text = visible_text(inner);

    match rule {
        CellRule::Text => Ok(text),

        CellRule::Address => {
            if text.is_empty() || text.starts_with(SHRUNK_CREDIT_PREFIX) {
                return Ok(text);
            }
            let Some(link) = first_open_tag_ci(inner, "a") else { return Ok(text) };
            let action = attr_ci(link, "onclick")
                .ok_or(ParseError::MissingLink { row, column, tag: "a", attr: "onclick" })?;
            match action.split('\'').nth(1) {
                Some(addr) => Ok(s!(addr)),
                None => Err(ParseError::MalformedAction { row, column, action }),
            }
        }

        CellRule::LinkTitle => {
            if text.is_empty() {
                return Ok(text);
            }
            first_open_tag_ci(inner, "a")
                .and_then(|link| attr_ci(link, "title"))
                .ok_or(ParseError::MissingLink { row, column, tag: "a", attr: "title" })
        }

        CellRule::SignedAmount => {
            let red = first_open_tag_ci(inner, "font")
                .and_then(|font| attr_ci(font, "color"))
                .is_some_and(|c| c.trim().eq_ignore_ascii_case("red"));
            if red && !text.starts_with('-') {
                Ok(format!("-{text}"))
            } else {
                Ok(text)
            }
        }
    }
}

/// How reading a page stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageEnd {
    /// Every row was read; no boundary on this page.
    EndOfTable,
    /// The boundary id was met; it and everything after it were discarded.
    Boundary,
    /// A row could not be decoded. Rows before it are still in `records`.
    Malformed(ParseError),
}

/// Result of reading one page up to the boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageScan {
    pub headers: Option<Vec<String>>,
    pub records: Vec<TransactionRecord>,
    pub end: PageEnd,
}

impl PageScan {
    /// Rows consumed on this page: every decoded row, marker rows included,
    /// the boundary row excluded.
    pub fn processed(&self) -> usize {
        self.records.len()
    }
}

/// Read one fetched page, stopping at `boundary` if given.
///
/// A missing table is an `Err`; a bad row mid-page is reported through
/// `PageEnd::Malformed` so the rows read before it are not lost.
pub fn scan_page(doc: &str, boundary: Option<&str>) -> Result<PageScan, ParseError> {
    let table = locate_history(doc)?;
    let mut records = Vec::new();
    let mut end = PageEnd::EndOfTable;

    for row in table.rows() {
        if boundary.is_some() && row.id().as_deref() == boundary {
            end = PageEnd::Boundary;
            break;
        }
        match row.decode() {
            Ok(rec) => records.push(rec),
            Err(e) => {
                end = PageEnd::Malformed(e);
                break;
            }
        }
    }

    Ok(PageScan { headers: table.headers, records, end })
}
