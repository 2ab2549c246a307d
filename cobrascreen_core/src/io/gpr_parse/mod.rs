//! Module for parsing Gene Protein Reaction strings into AST values
use indexmap::IndexMap;
use thiserror::Error;

use crate::io::gpr_parse::lexer::LexerError;
use crate::io::gpr_parse::parser::ParseError;
use crate::metabolic_model::gene::Gene;
use crate::metabolic_model::model::Gpr;

mod lexer;
pub mod parser;
mod token;

/// Parse a Gene Protein Reaction string into a GPR Tree
///
/// # Parameters
/// - `input`: &str representing the gene protein reaction rule
/// - `gene_map`: map of gene id strings to genes, genes named in the rule but missing
///   from the map are inserted as active genes
///
/// # Returns
/// - `Ok`: the root node of the GPR tree
/// - `Err`: the GprParseError describing the issue with the rule
///
/// # Examples
/// ```rust
/// use indexmap::IndexMap;
/// use cobrascreen_core::io::gpr_parse::parse_gpr;
/// let mut gene_map = IndexMap::new();
/// let gpr_tree = parse_gpr("Rv0001 and Rv0002", &mut gene_map).unwrap();
/// assert_eq!(gpr_tree.to_string_id(), "(Rv0001 and Rv0002)");
/// assert_eq!(gene_map.len(), 2);
/// ```
pub fn parse_gpr(input: &str, gene_map: &mut IndexMap<String, Gene>) -> Result<Gpr, GprParseError> {
    let tokens = lexer::Lexer::new(input).lex()?;
    let gpr = parser::GprParser::new(tokens, gene_map).parse()?;
    Ok(gpr)
}

/// Parse an optional rule as found in model files, where an empty or blank rule means the
/// reaction has no GPR
pub fn parse_optional_gpr(
    input: &str,
    gene_map: &mut IndexMap<String, Gene>,
) -> Result<Option<Gpr>, GprParseError> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_gpr(input, gene_map).map(Some)
}

/// Enum representing possible lex and parse errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GprParseError {
    /// Lexing Error
    #[error("Error occurred during lexing (conversion of GPR string to tokens): {0}")]
    LexingError(#[from] LexerError),
    /// Parsing Error
    #[error("Error occurred during parsing (conversion of tokens to GPR tree): {0}")]
    ParsingError(#[from] ParseError),
}
