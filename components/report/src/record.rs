use std::io::BufRead;

use serde::Deserialize;

use crate::error::AuditError;

/// One archival object row of the extraction query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Record {
    #[serde(alias = "ao_id")]
    pub id: u64,
    #[serde(default)]
    pub root_record_id: Option<u64>,
    #[serde(default, alias = "ao_title")]
    pub title: Option<String>,
    /// Raw JSON text of the note column.
    #[serde(default)]
    pub note_json: Option<String>,
}

/// Staff interface link to `record` inside its resource tree.
pub fn context_url(base_url: &str, record: &Record) -> String {
    let root = record
        .root_record_id
        .map(|id| id.to_string())
        .unwrap_or_default();
    format!("{}{}#tree::archival_object_{}", base_url, root, record.id)
}

/// Reads records from JSON lines. Blank lines are skipped.
pub fn read_records<R: BufRead>(reader: R) -> Result<Vec<Record>, AuditError> {
    let mut records = vec![];
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| AuditError::Record {
            line: index + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}
