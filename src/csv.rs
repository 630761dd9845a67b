// src/csv.rs
use std::io::{self, Write};

use crate::record::TransactionRecord;

/* ---------------- Writing ---------------- */

/// Write a single row to any writer, fields joined by `sep`.
///
/// Fields are written as-is: no quoting or escaping. Values from the
/// dashboard (ids, hashes, addresses, amounts, dates) never contain the
/// separator, and the ledger importer downstream reads the rows verbatim.
pub fn write_row<W: Write, S: AsRef<str>>(mut w: W, row: &[S], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first { write!(w, "{}", sep)?; } else { first = false; }
        write!(w, "{}", cell.as_ref())?;
    }
    writeln!(w)
}

pub fn write_record<W: Write>(w: W, rec: &TransactionRecord, sep: char) -> io::Result<()> {
    write_row(w, &rec.fields(), sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, amount: &str) -> TransactionRecord {
        TransactionRecord {
            id: s!(id),
            date: s!("2018-04-22 10:11:12"),
            kind: s!("Debit_MP"),
            confirmations: s!("Confirmed"),
            address: s!("Laddr"),
            txn_reference: s!("ab12"),
            block: s!(""),
            amount: s!(amount),
        }
    }

    #[test]
    fn record_line_in_column_order() {
        let mut buf = Vec::new();
        write_record(&mut buf, &rec("42", "-1.5"), ',').unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "42,2018-04-22 10:11:12,Debit_MP,Confirmed,Laddr,ab12,,-1.5\n"
        );
    }

    #[test]
    fn no_quoting_even_with_separator() {
        let mut buf = Vec::new();
        write_row(&mut buf, &["a,b", "\"c\""], ',').unwrap();
        assert_eq!(buf, b"a,b,\"c\"\n");
    }

    #[test]
    fn header_then_rows_tsv() {
        let mut buf = Vec::new();
        write_row(&mut buf, &["ID", "Amount"], '\t').unwrap();
        write_record(&mut buf, &rec("1", "2"), '\t').unwrap();
        let s = String::from_utf8(buf).unwrap();
        let mut lines = s.lines();
        assert_eq!(lines.next(), Some("ID\tAmount"));
        assert!(lines.next().unwrap().starts_with("1\t2018-04-22"));
        assert_eq!(lines.next(), None);
    }
}
