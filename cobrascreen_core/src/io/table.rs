//! Comma separated tables of screen results and timings
//!
//! Knockout tables have the columns `gene,growth,status`. `growth` is empty unless the
//! knockout model was solved, `status` is `optimal`, `not_applicable`, or the status the
//! solver stopped with. Tables with only the first two columns are read as well, with `NaN`
//! standing for a gene that was not applicable.
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::essentiality::{KnockoutOutcome, KnockoutResults};
use crate::optimize::OptimizationStatus;
use crate::timing::TimingLog;

const NOT_APPLICABLE: &str = "not_applicable";

/// Write the outcome of every gene, in result order
pub fn write_knockout_table<P: AsRef<Path>>(
    path: P,
    results: &KnockoutResults,
) -> Result<(), TableError> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    writeln!(writer, "gene,growth,status")?;
    for (gene_id, outcome) in results.iter() {
        match outcome {
            KnockoutOutcome::Growth(value) => {
                writeln!(writer, "{},{},{}", gene_id, value, OptimizationStatus::Optimal)?
            }
            KnockoutOutcome::NotApplicable => writeln!(writer, "{},,{}", gene_id, NOT_APPLICABLE)?,
            KnockoutOutcome::SolveFailed(status) => writeln!(writer, "{},,{}", gene_id, status)?,
        }
    }
    writer.flush()?;
    debug!(
        "Wrote {} knockout results to {}",
        results.len(),
        path.as_ref().display()
    );
    Ok(())
}

/// Read a table written by [`write_knockout_table`]
pub fn read_knockout_table<P: AsRef<Path>>(path: P) -> Result<KnockoutResults, TableError> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut results = KnockoutResults::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        if index == 0 || line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let (gene_id, outcome) = match fields.as_slice() {
            [gene_id, growth] => (*gene_id, parse_outcome(growth, None, line_number)?),
            [gene_id, growth, status] => {
                (*gene_id, parse_outcome(growth, Some(*status), line_number)?)
            }
            _ => {
                return Err(TableError::Malformed {
                    line: line_number,
                    reason: format!("expected 2 or 3 fields, found {}", fields.len()),
                })
            }
        };
        results.insert(gene_id.to_string(), outcome);
    }
    Ok(results)
}

fn parse_outcome(
    growth: &str,
    status: Option<&str>,
    line: usize,
) -> Result<KnockoutOutcome, TableError> {
    let value = match growth {
        "" => None,
        text if text.eq_ignore_ascii_case("nan") => None,
        text => Some(text.parse::<f64>().map_err(|err| TableError::Malformed {
            line,
            reason: format!("invalid growth {}: {}", text, err),
        })?),
    };
    match (value, status) {
        (_, Some(NOT_APPLICABLE)) | (None, None) => Ok(KnockoutOutcome::NotApplicable),
        (Some(value), _) => Ok(KnockoutOutcome::Growth(value)),
        (None, Some(status)) => {
            let status = status
                .parse::<OptimizationStatus>()
                .map_err(|reason| TableError::Malformed { line, reason })?;
            Ok(KnockoutOutcome::SolveFailed(status))
        }
    }
}

/// Write every timed operation as `operation,seconds`
pub fn write_timing_log<P: AsRef<Path>>(path: P, log: &TimingLog) -> Result<(), TableError> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    writeln!(writer, "operation,seconds")?;
    for (name, seconds) in log.entries() {
        writeln!(writer, "{},{}", name, seconds)?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Unable to access table: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed table at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn results() -> KnockoutResults {
        vec![
            ("g1".to_string(), KnockoutOutcome::Growth(0.25)),
            ("g2".to_string(), KnockoutOutcome::NotApplicable),
            (
                "g3".to_string(),
                KnockoutOutcome::SolveFailed(OptimizationStatus::Infeasible),
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn knockout_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gene_essentiality_transcription.csv");
        write_knockout_table(&path, &results()).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "gene,growth,status\ng1,0.25,optimal\ng2,,not_applicable\ng3,,infeasible\n"
        );
        assert_eq!(read_knockout_table(&path).unwrap(), results());
    }

    #[test]
    fn two_column_table_with_nan() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.csv");
        fs::write(&path, "gene,growth\nb0001,0.87\nb0002,NaN\nb0003,nan\n\n").unwrap();
        let results = read_knockout_table(&path).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results.get("b0001"), Some(&KnockoutOutcome::Growth(0.87)));
        assert_eq!(results.get("b0002"), Some(&KnockoutOutcome::NotApplicable));
        assert_eq!(results.get("b0003"), Some(&KnockoutOutcome::NotApplicable));
    }

    #[test]
    fn malformed_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "gene,growth,status\ng1,fast,optimal\n").unwrap();
        assert!(matches!(
            read_knockout_table(&path),
            Err(TableError::Malformed { line: 2, .. })
        ));
        fs::write(&path, "gene,growth,status\ng1,,exploded\n").unwrap();
        assert!(matches!(
            read_knockout_table(&path),
            Err(TableError::Malformed { line: 2, .. })
        ));
        assert!(matches!(
            read_knockout_table(dir.path().join("missing.csv")),
            Err(TableError::Io(_))
        ));
    }

    #[test]
    fn timing_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timings.csv");
        let mut log = TimingLog::new();
        log.record("transcription", 1.5);
        log.record("gene_deletion", 0.25);
        write_timing_log(&path, &log).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "operation,seconds\ntranscription,1.5\ngene_deletion,0.25\n"
        );
    }
}
