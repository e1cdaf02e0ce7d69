//! This module contains everything necessary to go from the text of a C-Mamuth program to an
//! abstract syntax tree (AST) of that program: the scanner, the tokens it produces, the recursive
//! descent parser and the tree itself. The AST can then be handed to the verifier.

pub mod lexing;
pub mod token;
pub mod errors;
pub mod parsing;
pub mod tree;
pub mod types;
