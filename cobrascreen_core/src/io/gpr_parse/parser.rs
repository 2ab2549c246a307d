//! Recursive descent parser turning GPR tokens into a [`Gpr`] tree
use indexmap::IndexMap;
use thiserror::Error;

use crate::io::gpr_parse::token::Token;
use crate::metabolic_model::gene::Gene;
use crate::metabolic_model::model::{Gpr, GprOperatorType};

/*
GPR Grammar:
expression -> binary
binary -> unary (("AND" | "OR") unary )*;
unary -> "NOT" unary | primary  ;
primary -> GENE | "(" expression ")" ;

`and` and `or` share a precedence level and associate to the left, so
`a or b and c` reads as `(a or b) and c`.
 */

/// GPR Parser
pub struct GprParser<'gm> {
    /// Tokens from the GPR string, terminated by [`Token::Eof`]
    tokens: Vec<Token>,
    /// Index of the current token
    current: usize,
    /// Genes of the model, unknown genes are added as they are encountered
    gene_map: &'gm mut IndexMap<String, Gene>,
}

impl<'gm> GprParser<'gm> {
    pub fn new(tokens: Vec<Token>, gene_map: &'gm mut IndexMap<String, Gene>) -> Self {
        GprParser {
            tokens,
            current: 0,
            gene_map,
        }
    }

    /// Parse the token vector into a GPR AST
    pub fn parse(&mut self) -> Result<Gpr, ParseError> {
        let gpr = self.binary()?;
        if !self.is_at_end() {
            return Err(ParseError::EarlyTermination(self.current));
        }
        Ok(gpr)
    }

    fn binary(&mut self) -> Result<Gpr, ParseError> {
        let mut expr = self.unary()?;
        loop {
            let operator = match self.peek() {
                Token::And => GprOperatorType::And,
                Token::Or => GprOperatorType::Or,
                _ => break,
            };
            self.advance();
            let right = self.unary()?;
            expr = Gpr::new_binary_operation(expr, operator, right)
                .map_err(|_| ParseError::InvalidBinaryOperator)?;
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Gpr, ParseError> {
        if self.peek() == &Token::Not {
            self.advance();
            let operand = self.unary()?;
            return Gpr::new_unary_operation(GprOperatorType::Not, operand)
                .map_err(|_| ParseError::InvalidUnaryOperator);
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Gpr, ParseError> {
        match self.peek().clone() {
            Token::Identifier(gene_id) => {
                self.advance();
                self.insert_if_needed(&gene_id);
                Ok(Gpr::new_gene_node(&gene_id))
            }
            Token::LeftParen => {
                self.advance();
                let expr = self.binary()?;
                if self.peek() != &Token::RightParen {
                    return Err(ParseError::MissingToken(
                        "Expect ')' after expression.".to_string(),
                    ));
                }
                self.advance();
                Ok(expr)
            }
            _ => Err(ParseError::ExpectedExpression(self.current)),
        }
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.current).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.current += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        self.peek() == &Token::Eof
    }

    /// Genes named by a rule but missing from the gene list are added as active genes
    fn insert_if_needed(&mut self, gene_id: &str) {
        if !self.gene_map.contains_key(gene_id) {
            self.gene_map
                .insert(gene_id.to_string(), Gene::new_active(gene_id));
        }
    }
}

/// Enum representing possible parse errors
#[derive(Debug, Error, PartialEq, Clone)]
pub enum ParseError {
    /// Token was expected to be a binary operator but was not
    #[error("Invalid binary operator encountered, expected only `and` and `or`")]
    InvalidBinaryOperator,
    /// Token was expected to be a unary operator but was not
    #[error("Invalid unary operator encountered, expected only `not`")]
    InvalidUnaryOperator,
    /// Missing expected token (e.g. a right parenthesis)
    #[error("Missing expected token: {0}")]
    MissingToken(String),
    /// No expression found when one was expected
    #[error("Expected a gene or grouped expression at token {0}")]
    ExpectedExpression(usize),
    /// Expression was not completed when parsing terminated
    #[error("Parsing terminated early at token {0}, check for a `not` between two gene identifiers/grouped expressions")]
    EarlyTermination(usize),
}
