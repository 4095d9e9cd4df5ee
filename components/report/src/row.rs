use serde::Serialize;

/// Which field of a record a report row refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Title,
    NoteContent,
    Subnote,
    /// The note payload as a whole, used when it cannot be decoded.
    Note,
}

impl FieldKind {
    pub fn label(self) -> &'static str {
        match self {
            FieldKind::Title => "archival_object.title",
            FieldKind::NoteContent => "note.content",
            FieldKind::Subnote => "note.subnote",
            FieldKind::Note => "note",
        }
    }
}

/// Column names of the report, in order.
pub const HEADER: [&str; 6] = [
    "record_type",
    "context_url",
    "note_type",
    "subnote_type",
    "highlighted_text",
    "error_message",
];

/// One reported defect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub record_type: &'static str,
    pub context_url: String,
    pub note_type: String,
    pub subnote_type: String,
    pub highlighted_text: String,
    pub error_message: String,
}

impl ReportRow {
    pub fn new(kind: FieldKind, context_url: impl Into<String>) -> Self {
        Self {
            record_type: kind.label(),
            context_url: context_url.into(),
            note_type: String::new(),
            subnote_type: String::new(),
            highlighted_text: String::new(),
            error_message: String::new(),
        }
    }
}
