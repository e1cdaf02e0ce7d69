use thiserror::Error;

use crate::parser::types::Type;


#[derive(Debug, Clone, PartialEq, Error)]
pub enum NameError {
    #[error("Identifier '{name}' has not been declared (line {line}, column {column})")]
    Undeclared { name: String, line: usize, column: usize },
}


#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypeError {
    /// An operand of a math expression is neither a number nor of unknown type.
    #[error("'{operand}' is of type {found} and cannot be used in a math expression (line {line}, column {column})")]
    NotNumeric { operand: String, found: String, line: usize, column: usize },

    /// A variable was used as the target of an invocation.
    #[error("Variable '{name}' cannot be invoked as a function (line {line}, column {column})")]
    NotCallable { name: String, line: usize, column: usize },

    #[error("Function '{name}' cannot be passed as an argument (line {line}, column {column})")]
    FunctionAsArgument { name: String, line: usize, column: usize },

    #[error("Comparison with '{comparator}' cannot be made between types {left} and {right} (line {line}, column {column})")]
    IncompatibleComparison { comparator: String, left: Type, right: Type, line: usize, column: usize },
}
