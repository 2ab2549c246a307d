//! Tokens produced by the GPR lexer

/// Represents Tokens in GPR
#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub enum Token {
    /// A gene id
    Identifier(String),
    And,
    Or,
    Not,
    LeftParen,
    RightParen,
    Eof,
}
