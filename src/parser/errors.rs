use thiserror::Error;

use super::token::{Token, TokenKind};


#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexingError {
    #[error("{} lexical error(s) in scanner: {}", .0.len(), describe_unrecognized(.0))]
    UnrecognizedTokens(Vec<Token>)
}


fn describe_unrecognized(tokens: &[Token]) -> String {
    tokens.iter()
        .map(|t| format!("{:?} at ({}, {})", t.lexeme, t.line, t.column))
        .collect::<Vec<String>>()
        .join(", ")
}


#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParsingError {
    #[error("Expected text '{expected}', found '{}' at ({}, {})", .found.lexeme, .found.line, .found.column)]
    ExpectedText { expected: String, found: Token },

    #[error("Expected token of kind {expected}, found {} '{}' at ({}, {})", .found.kind, .found.lexeme, .found.line, .found.column)]
    ExpectedKind { expected: TokenKind, found: Token },

    #[error("Expected {expected}, found {} '{}' at ({}, {})", .found.kind, .found.lexeme, .found.line, .found.column)]
    ExpectedConstruct { expected: &'static str, found: Token },

    #[error("Expected {expected}, found end of input at ({line}, {column})")]
    UnexpectedEndOfInput { expected: String, line: usize, column: usize },

    #[error("Unexpected '{}' after the end of the program at ({}, {})", .0.lexeme, .0.line, .0.column)]
    TrailingInput(Token),
}
