//! Lex a GPR string into a series of tokens for later parsing
use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

use crate::io::gpr_parse::token::Token;

pub struct Lexer<'s> {
    source: &'s str,
    chars: Peekable<CharIndices<'s>>,
    tokens: Vec<Token>,
}

impl<'s> Lexer<'s> {
    pub fn new(source: &'s str) -> Self {
        Lexer {
            source,
            chars: source.char_indices().peekable(),
            tokens: Vec::new(),
        }
    }

    /// Consume the source, producing a token vector terminated by [`Token::Eof`]
    pub fn lex(mut self) -> Result<Vec<Token>, LexerError> {
        while let Some((position, c)) = self.chars.next() {
            match c {
                '(' => self.tokens.push(Token::LeftParen),
                ')' => self.tokens.push(Token::RightParen),
                c if c.is_whitespace() => {}
                c if Self::is_identifier_char(c) => self.read_identifier(position),
                other => {
                    return Err(LexerError::InvalidCharacter {
                        character: other,
                        position,
                    })
                }
            }
        }
        self.tokens.push(Token::Eof);
        Ok(self.tokens)
    }

    fn read_identifier(&mut self, start: usize) {
        let mut end = self.source.len();
        while let Some(&(position, c)) = self.chars.peek() {
            if !Self::is_identifier_char(c) {
                end = position;
                break;
            }
            self.chars.next();
        }
        let text = &self.source[start..end];
        let token = match text.to_ascii_lowercase().as_str() {
            "and" => Token::And,
            "or" => Token::Or,
            "not" => Token::Not,
            _ => Token::Identifier(text.to_string()),
        };
        self.tokens.push(token);
    }

    /// Gene ids in the wild contain dots (b0001.1), dashes and colons besides word characters
    fn is_identifier_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | ':')
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexerError {
    #[error("Invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_gene() {
        let tokens = Lexer::new("Rv0023").lex().unwrap();
        assert_eq!(
            tokens,
            vec![Token::Identifier(String::from("Rv0023")), Token::Eof]
        );
    }

    #[test]
    fn grouping_and_operator_case() {
        let tokens = Lexer::new("(Rv0023 OR Rv0123) And NOT b0001.1").lex().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::LeftParen,
                Token::Identifier(String::from("Rv0023")),
                Token::Or,
                Token::Identifier(String::from("Rv0123")),
                Token::RightParen,
                Token::And,
                Token::Not,
                Token::Identifier(String::from("b0001.1")),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn operator_prefixes_are_identifiers() {
        let tokens = Lexer::new("orf1 andA").lex().unwrap();
        assert_eq!(tokens[0], Token::Identifier(String::from("orf1")));
        assert_eq!(tokens[1], Token::Identifier(String::from("andA")));
    }

    #[test]
    fn invalid_character() {
        assert_eq!(
            Lexer::new("g1 & g2").lex(),
            Err(LexerError::InvalidCharacter {
                character: '&',
                position: 3
            })
        );
    }
}
