//! The front end of the compiler for the C-Mamuth programming language.
//!
//! Compilation runs in three stages, each of which can be used on its own:
//!
//! 1. [`scan`] turns source text into a list of [`Token`]s.
//! 2. [`parse`] turns the tokens into a [`SyntaxTree`].
//! 3. [`verify`] checks scopes and types, decorating every node of the tree with a type and
//!    returning the [`SymbolTable`] as it stands once every block is closed.
//!
//! [`compile`] runs all three. Every stage stops at its first error, except the scanner which
//! reports every unrecognized piece of text at once.
//!
//! ```rust
//! use cmamuth::parser::types::Type;
//!
//! let compilation = cmamuth::compile("x anotado 5.\nmaracuya() xD\nmessirve x.\nv:").unwrap();
//! assert_eq!(compilation.program.data_type, Some(Type::None));
//! assert!(compilation.symbols.get("x").is_some());
//! ```

pub mod cli;
pub mod errors;
pub mod parser;
pub mod semantics;

use crate::errors::CompileError;
use crate::parser::lexing::Scanner;
use crate::parser::parsing::Parser;
use crate::parser::token::Token;
use crate::parser::tree::SyntaxTree;
use crate::semantics::symbol_table::SymbolTable;
use crate::semantics::typechecking::Verifier;


/// Everything produced by running the whole front end over a program.
#[derive(Debug)]
pub struct Compilation {
    /// The tokens of the program in source order.
    pub tokens: Vec<Token>,
    /// The decorated syntax tree.
    pub program: SyntaxTree,
    /// The symbol table left after verification, holding the global declarations.
    pub symbols: SymbolTable,
}


/// Scans the source text into tokens.
///
/// # Errors
///
/// Fails with a lexical error listing every unrecognized piece of text.
pub fn scan(source: &str) -> Result<Vec<Token>, CompileError> {
    Ok(Scanner::new(source).scan()?)
}


/// Parses a token stream into a `Program` tree.
///
/// # Errors
///
/// Fails with the first syntax error found.
pub fn parse(tokens: Vec<Token>) -> Result<SyntaxTree, CompileError> {
    Ok(Parser::new(tokens).parse()?)
}


/// Verifies and decorates a parsed program in place.
///
/// # Errors
///
/// Fails with the first name or type error found. The tree may be partially decorated.
pub fn verify(program: &mut SyntaxTree) -> Result<SymbolTable, CompileError> {
    Verifier::new().verify(program)
}


/// Runs the scanner, the parser and the verifier over the source text.
///
/// # Errors
///
/// Fails with the error of the first stage that fails.
pub fn compile(source: &str) -> Result<Compilation, CompileError> {
    let tokens = scan(source)?;
    let mut program = parse(tokens.clone())?;
    let symbols = verify(&mut program)?;

    Ok(Compilation { tokens, program, symbols })
}
