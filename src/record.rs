// src/record.rs
use crate::config::consts::{HISTORY_COLUMNS, HISTORY_HEADERS, SHRUNK_CREDIT_PREFIX};

/// One row of the pool's transaction history table.
///
/// All fields stay as the page renders them; nothing is parsed into numbers or
/// dates here. That is left to whoever imports the CSV into a ledger.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionRecord {
    /// Opaque, unique per transaction. Only ever compared for equality.
    pub id: String,
    pub date: String,
    /// `Credit`, `Debit_MP`, `TXFee`, …
    pub kind: String,
    pub confirmations: String,
    pub address: String,
    pub txn_reference: String,
    pub block: String,
    /// Numeric text; `-` prefixed for debits.
    pub amount: String,
}

impl TransactionRecord {
    pub const HEADERS: [&'static str; HISTORY_COLUMNS] = HISTORY_HEADERS;

    /// Field values in output column order.
    pub fn fields(&self) -> [&str; HISTORY_COLUMNS] {
        [
            &self.id,
            &self.date,
            &self.kind,
            &self.confirmations,
            &self.address,
            &self.txn_reference,
            &self.block,
            &self.amount,
        ]
    }

    /// Synthetic "shrunk accumulated credit" row rather than a real transfer.
    pub fn is_marker(&self) -> bool {
        self.address.starts_with(SHRUNK_CREDIT_PREFIX)
    }

    pub fn is_debit(&self) -> bool {
        self.amount.starts_with('-')
    }
}

impl From<[String; HISTORY_COLUMNS]> for TransactionRecord {
    fn from(cols: [String; HISTORY_COLUMNS]) -> Self {
        let [id, date, kind, confirmations, address, txn_reference, block, amount] = cols;
        Self { id, date, kind, confirmations, address, txn_reference, block, amount }
    }
}
