// src/file.rs

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
};

use crate::config::options::ExportOptions;
use crate::csv::{write_record, write_row};
use crate::record::TransactionRecord;

/// Streams records to stdout or a file as they arrive, header first.
pub struct RecordWriter<W: Write> {
    out: W,
    sep: char,
    include_headers: bool,
    wrote_header: bool,
    rows: usize,
}

impl RecordWriter<Box<dyn Write>> {
    /// Open the destination named by `export.out` (stdout when unset).
    /// Creates/truncates the file and any missing parent directories.
    pub fn open(export: &ExportOptions) -> io::Result<Self> {
        let out: Box<dyn Write> = match &export.out {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        ensure_directory(parent)?;
                    }
                }
                Box::new(BufWriter::new(File::create(path)?))
            }
            None => Box::new(BufWriter::new(io::stdout().lock())),
        };
        Ok(Self::new(out, export))
    }
}

impl<W: Write> RecordWriter<W> {
    pub fn new(out: W, export: &ExportOptions) -> Self {
        Self {
            out,
            sep: export.format.delim(),
            include_headers: export.include_headers,
            wrote_header: false,
            rows: 0,
        }
    }

    /// Write the header line once. Falls back to the canonical column names
    /// when the page had no `<thead>`.
    pub fn write_header(&mut self, headers: Option<&[String]>) -> io::Result<()> {
        if self.wrote_header {
            return Ok(());
        }
        self.wrote_header = true;
        if !self.include_headers {
            return Ok(());
        }
        match headers {
            Some(h) => write_row(&mut self.out, h, self.sep),
            None => write_row(&mut self.out, &TransactionRecord::HEADERS, self.sep),
        }
    }

    pub fn write(&mut self, rec: &TransactionRecord) -> io::Result<()> {
        self.write_header(None)?;
        write_record(&mut self.out, rec, self.sep)?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", dir.display()),
        ));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}
