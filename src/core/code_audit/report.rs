//! Append-only discrepancy report (`different_namespaces.txt`).
//!
//! One writer per audit: opened in append mode when the audit starts and
//! closed when it is dropped, on success and on every error path alike.
//! Earlier audits' lines are never truncated.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::findings::Discrepancy;
use crate::error::{Error, Result};

pub struct ReportWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    lines_written: usize,
}

impl ReportWriter {
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                Error::internal_io(e.to_string(), Some(format!("open report {}", path.display())))
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            lines_written: 0,
        })
    }

    pub fn append(&mut self, discrepancy: &Discrepancy) -> Result<()> {
        writeln!(self.writer, "{}", discrepancy.report_line()).map_err(|e| {
            Error::internal_io(
                e.to_string(),
                Some(format!("append to report {}", self.path.display())),
            )
        })?;
        self.lines_written += 1;
        Ok(())
    }

    /// Flush and close, returning the number of lines appended.
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush().map_err(|e| {
            Error::internal_io(
                e.to_string(),
                Some(format!("flush report {}", self.path.display())),
            )
        })?;
        Ok(self.lines_written)
    }
}
