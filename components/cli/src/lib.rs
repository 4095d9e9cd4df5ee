//! CLI logic for the fragment audit.

mod args;

pub use args::{Args, Command};

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::info;

use xmlaudit_fragment::{FragmentValidator, ValidationOutcome};
use xmlaudit_report::{read_records, AuditConfig, AuditError, Auditor, CsvSink, ReportSink};

/// Run the command in `args`.
///
/// Returns `false` when `check` found a defect.
///
/// # Errors
///
/// Returns `AuditError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed record lines
/// - CSV writing errors
pub fn run(args: &Args) -> Result<bool, AuditError> {
    match &args.command {
        Command::Scan {
            records,
            config,
            output,
            parallel,
        } => {
            let config = AuditConfig::from_path(config)?;
            let output = output
                .as_ref()
                .or(config.output_csv.as_ref())
                .ok_or(AuditError::MissingOutput)?;
            scan(&config, records, output, *parallel)?;
            Ok(true)
        }
        Command::Check { text, config } => {
            let validator = match config {
                Some(path) => AuditConfig::from_path(path)?.validator()?,
                None => FragmentValidator::default(),
            };
            let text = match text {
                Some(text) => text.clone(),
                None => read_stdin()?,
            };
            let outcome = validator.validate(&text);
            print_outcome(&mut io::stdout().lock(), &outcome)?;
            Ok(outcome.is_valid())
        }
    }
}

fn scan(config: &AuditConfig, records: &Path, output: &Path, parallel: bool) -> Result<(), AuditError> {
    info!(records:? = records, parallel; "Loading records");
    let records = read_records(BufReader::new(File::open(records)?))?;

    let auditor = Auditor::from_config(config)?;
    let audit = if parallel {
        auditor.audit_all_parallel(&records)
    } else {
        auditor.audit_all(&records)
    };

    let mut sink = CsvSink::new(BufWriter::new(File::create(output)?))?;
    sink.write_all(&audit.rows)?;
    sink.finish()?;

    info!(
        output:? = output,
        records = audit.summary.records,
        fields = audit.summary.fields,
        rows = sink.rows();
        "Report written"
    );
    Ok(())
}

fn read_stdin() -> Result<String, AuditError> {
    let mut text = String::new();
    io::stdin().read_to_string(&mut text)?;
    let trimmed = text.trim_end_matches(['\n', '\r']).len();
    text.truncate(trimmed);
    Ok(text)
}

fn print_outcome(out: &mut impl Write, outcome: &ValidationOutcome) -> io::Result<()> {
    match outcome {
        ValidationOutcome::Valid => writeln!(out, "valid"),
        ValidationOutcome::Invalid {
            message,
            highlighted,
        } => {
            writeln!(out, "invalid: {}", message)?;
            writeln!(out, "{}", highlighted)
        }
    }
}
