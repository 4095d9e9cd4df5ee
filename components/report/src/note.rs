//! Note payloads as stored in the `note.notes` column.
//!
//! The column holds JSON whose shape varies between records: a bare string,
//! a single note object or a list of note objects. [`NotePayload::decode`]
//! turns all of them into one tagged union so the rest of the audit only
//! deals with plain strings.

use serde_json::{Map, Value};

use crate::error::DecodeError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotePayload {
    PlainText(String),
    Structured(Vec<StructuredNote>),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StructuredNote {
    pub note_type: String,
    pub content: Vec<String>,
    pub subnotes: Vec<Subnote>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Subnote {
    pub subnote_type: String,
    pub content: String,
}

impl NotePayload {
    pub fn decode(raw: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::String(text) => Ok(NotePayload::PlainText(text)),
            Value::Object(note) => Ok(NotePayload::Structured(vec![StructuredNote::from_map(
                note,
            )])),
            Value::Array(notes) => notes
                .into_iter()
                .map(|note| match note {
                    Value::Object(note) => Ok(StructuredNote::from_map(note)),
                    other => Err(DecodeError::Shape(kind(&other))),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(NotePayload::Structured),
            other => Err(DecodeError::Shape(kind(&other))),
        }
    }
}

impl StructuredNote {
    /// Reads `type` (or `jsonmodel_type`), `content` and `subnotes`.
    /// Anything that is not text is skipped.
    fn from_map(mut note: Map<String, Value>) -> Self {
        let note_type = string_field(&note, "type")
            .or_else(|| string_field(&note, "jsonmodel_type"))
            .unwrap_or_default();
        let content = note.remove("content").map(strings).unwrap_or_default();

        let subnotes = match note.remove("subnotes") {
            Some(Value::Array(subnotes)) => subnotes
                .into_iter()
                .filter_map(|subnote| match subnote {
                    Value::Object(subnote) => Some(subnote),
                    _ => None,
                })
                .flat_map(|mut subnote| {
                    let subnote_type = string_field(&subnote, "jsonmodel_type").unwrap_or_default();
                    let content = subnote.remove("content").map(strings).unwrap_or_default();
                    content.into_iter().map(move |content| Subnote {
                        subnote_type: subnote_type.clone(),
                        content,
                    })
                })
                .collect(),
            _ => vec![],
        };

        Self {
            note_type,
            content,
            subnotes,
        }
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

fn strings(value: Value) -> Vec<String> {
    match value {
        Value::String(text) => vec![text],
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text),
                _ => None,
            })
            .collect(),
        _ => vec![],
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
