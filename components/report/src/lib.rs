//! Audit of archival object titles and notes for malformed markup.
//!
//! Records are loaded from JSON lines ([`read_records`]), each text field is
//! checked with a [`FragmentValidator`](xmlaudit_fragment::FragmentValidator)
//! and every defect becomes a [`ReportRow`] written to a [`ReportSink`].

pub mod audit;
pub mod config;
pub mod error;
pub mod note;
pub mod record;
pub mod row;
pub mod sink;

pub use audit::{Audit, AuditSummary, Auditor};
pub use config::AuditConfig;
pub use error::{AuditError, DecodeError};
pub use note::{NotePayload, StructuredNote, Subnote};
pub use record::{context_url, read_records, Record};
pub use row::{FieldKind, ReportRow, HEADER};
pub use sink::{CsvSink, ReportSink};

