use std::io::Write;

use crate::error::AuditError;
use crate::row::{ReportRow, HEADER};

/// Destination of report rows.
pub trait ReportSink {
    fn write_row(&mut self, row: &ReportRow) -> Result<(), AuditError>;

    fn write_all(&mut self, rows: &[ReportRow]) -> Result<(), AuditError> {
        rows.iter().try_for_each(|row| self.write_row(row))
    }

    fn finish(&mut self) -> Result<(), AuditError> {
        Ok(())
    }
}

impl ReportSink for Vec<ReportRow> {
    fn write_row(&mut self, row: &ReportRow) -> Result<(), AuditError> {
        self.push(row.clone());
        Ok(())
    }
}

/// Writes the header row on creation, then one record per report row.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl<W: Write> CsvSink<W> {
    pub fn new(inner: W) -> Result<Self, AuditError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(HEADER)?;
        Ok(Self { writer, rows: 0 })
    }

    /// Number of rows written, header excluded.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn into_inner(self) -> Result<W, AuditError> {
        self.writer
            .into_inner()
            .map_err(|err| AuditError::Io(err.into_error()))
    }
}

impl<W: Write> ReportSink for CsvSink<W> {
    fn write_row(&mut self, row: &ReportRow) -> Result<(), AuditError> {
        self.writer.serialize(row)?;
        self.rows += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), AuditError> {
        self.writer.flush()?;
        Ok(())
    }
}
