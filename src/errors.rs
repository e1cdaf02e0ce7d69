//! The single error type of the compilation pipeline. Each stage has its own error enum and they
//! all convert into [`CompileError`] with `?`.
use thiserror::Error;

use crate::parser::errors::{LexingError, ParsingError};
use crate::semantics::errors::{NameError, TypeError};


#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("LexicalError: {0}")]
    Lexing(#[from] LexingError),

    #[error("SyntaxError: {0}")]
    Parsing(#[from] ParsingError),

    #[error("NameError: {0}")]
    Name(#[from] NameError),

    #[error("TypeError: {0}")]
    Type(#[from] TypeError),
}
