//! Reading nucleotide sequences, plain or FASTA
use std::fs;
use std::path::Path;

use thiserror::Error;

/// Read a nucleotide sequence from a file
///
/// See [`parse_sequence`] for the accepted format.
pub fn read_sequence<P: AsRef<Path>>(path: P) -> Result<String, SequenceError> {
    let text = fs::read_to_string(path.as_ref()).map_err(|err| {
        SequenceError::UnableToRead(format!("{}: {}", path.as_ref().display(), err))
    })?;
    parse_sequence(&text)
}

/// Parse a nucleotide sequence
///
/// Header (`>`) and comment (`;`) lines are dropped, as is all whitespace, and the result is
/// upper-cased. Only `A`, `C`, `G`, `T` and `N` are accepted.
///
/// # Examples
/// ```rust
/// use cobrascreen_core::io::sequence::parse_sequence;
/// let sequence = parse_sequence(">als\natgaaa\nTTG\n").unwrap();
/// assert_eq!(sequence, "ATGAAATTG");
/// ```
pub fn parse_sequence(text: &str) -> Result<String, SequenceError> {
    let mut sequence = String::with_capacity(text.len());
    for (line_index, line) in text.lines().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('>') || trimmed.starts_with(';') {
            continue;
        }
        for (column, character) in line.char_indices() {
            if character.is_whitespace() {
                continue;
            }
            match character.to_ascii_uppercase() {
                base @ ('A' | 'C' | 'G' | 'T' | 'N') => sequence.push(base),
                _ => {
                    return Err(SequenceError::InvalidBase {
                        base: character,
                        line: line_index + 1,
                        column: column + 1,
                    })
                }
            }
        }
    }
    if sequence.is_empty() {
        return Err(SequenceError::Empty);
    }
    Ok(sequence)
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SequenceError {
    #[error("Unable to read sequence file {0}")]
    UnableToRead(String),
    #[error("Invalid base '{base}' at line {line}, column {column}")]
    InvalidBase {
        base: char,
        line: usize,
        column: usize,
    },
    #[error("Sequence is empty")]
    Empty,
}
