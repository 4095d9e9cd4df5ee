use log::{debug, info, warn};
use rayon::prelude::*;
use xmlaudit_fragment::{FragmentValidator, ValidationOutcome};

use crate::config::AuditConfig;
use crate::error::AuditError;
use crate::note::NotePayload;
use crate::record::{context_url, Record};
use crate::row::{FieldKind, ReportRow};

/// Counters of one audit run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AuditSummary {
    pub records: usize,
    /// Text values handed to the validator.
    pub fields: usize,
    pub defects: usize,
    pub decode_failures: usize,
}

impl AuditSummary {
    fn merge(self, other: AuditSummary) -> AuditSummary {
        AuditSummary {
            records: self.records + other.records,
            fields: self.fields + other.fields,
            defects: self.defects + other.defects,
            decode_failures: self.decode_failures + other.decode_failures,
        }
    }
}

/// Rows in record order plus counters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Audit {
    pub rows: Vec<ReportRow>,
    pub summary: AuditSummary,
}

impl Audit {
    fn append(mut self, other: Audit) -> Audit {
        self.rows.extend(other.rows);
        self.summary = self.summary.merge(other.summary);
        self
    }
}

/// Checks the text fields of records and turns defects into report rows.
pub struct Auditor {
    validator: FragmentValidator,
    base_url: String,
}

impl Auditor {
    pub fn new(validator: FragmentValidator, base_url: impl Into<String>) -> Self {
        Self {
            validator,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &AuditConfig) -> Result<Self, AuditError> {
        Ok(Self::new(config.validator()?, config.base_url.clone()))
    }

    pub fn validator(&self) -> &FragmentValidator {
        &self.validator
    }

    /// Rows for the title, then every note content and subnote content.
    pub fn audit_record(&self, record: &Record) -> Vec<ReportRow> {
        self.scan(record).rows
    }

    pub fn audit_all(&self, records: &[Record]) -> Audit {
        let audit = records
            .iter()
            .map(|record| self.scan(record))
            .fold(Audit::default(), Audit::append);
        log_summary(&audit.summary);
        audit
    }

    /// Same result as [`Auditor::audit_all`], computed on the rayon pool.
    pub fn audit_all_parallel(&self, records: &[Record]) -> Audit {
        let audits: Vec<Audit> = records.par_iter().map(|record| self.scan(record)).collect();
        let audit = audits.into_iter().fold(Audit::default(), Audit::append);
        log_summary(&audit.summary);
        audit
    }

    fn scan(&self, record: &Record) -> Audit {
        let mut scan = RecordScan {
            validator: &self.validator,
            url: context_url(&self.base_url, record),
            audit: Audit::default(),
        };
        scan.audit.summary.records = 1;

        if let Some(title) = &record.title {
            scan.check(title, FieldKind::Title, "", "");
        }

        if let Some(raw) = &record.note_json {
            match NotePayload::decode(raw) {
                Ok(NotePayload::PlainText(text)) => {
                    scan.check(&text, FieldKind::NoteContent, "", "");
                }
                Ok(NotePayload::Structured(notes)) => {
                    for note in &notes {
                        for content in &note.content {
                            scan.check(content, FieldKind::NoteContent, &note.note_type, "");
                        }
                        for subnote in &note.subnotes {
                            scan.check(
                                &subnote.content,
                                FieldKind::Subnote,
                                &note.note_type,
                                &subnote.subnote_type,
                            );
                        }
                    }
                }
                Err(err) => {
                    warn!("cannot decode notes of archival object {}: {}", record.id, err);
                    let mut row = ReportRow::new(FieldKind::Note, scan.url.clone());
                    row.error_message = format!("cannot decode note payload: {}", err);
                    scan.audit.rows.push(row);
                    scan.audit.summary.decode_failures += 1;
                }
            }
        }

        scan.audit
    }
}

fn log_summary(summary: &AuditSummary) {
    info!(
        "checked {} fields of {} records: {} defects, {} undecodable notes",
        summary.fields, summary.records, summary.defects, summary.decode_failures
    );
}

struct RecordScan<'a> {
    validator: &'a FragmentValidator,
    url: String,
    audit: Audit,
}

impl RecordScan<'_> {
    fn check(&mut self, text: &str, kind: FieldKind, note_type: &str, subnote_type: &str) {
        self.audit.summary.fields += 1;
        if let ValidationOutcome::Invalid {
            message,
            highlighted,
        } = self.validator.validate(text)
        {
            debug!("{} at {}: {}", kind.label(), self.url, message);
            let mut row = ReportRow::new(kind, self.url.clone());
            row.note_type = note_type.to_string();
            row.subnote_type = subnote_type.to_string();
            row.highlighted_text = highlighted;
            row.error_message = message;
            self.audit.rows.push(row);
            self.audit.summary.defects += 1;
        }
    }
}
