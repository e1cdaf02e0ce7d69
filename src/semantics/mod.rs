//! Semantic analysis of a parsed program: the symbol table, the standard environment every
//! program starts with, and the verifier that checks scopes and types while decorating the AST.

pub mod errors;
pub mod prelude;
pub mod symbol_table;
pub mod typechecking;
