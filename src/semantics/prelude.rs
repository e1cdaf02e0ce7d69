//! The standard environment of C-Mamuth: functions every program may call without declaring
//! them, covering input/output, conversions and termination.
use crate::parser::types::Type;

use super::symbol_table::{Declaration, SymbolTable, SymbolType};


/// Name and return type of every built-in function.
pub const STANDARD_FUNCTIONS: [(&str, Type); 10] = [
    ("curcuma", Type::Text),
    ("nel", Type::Number),
    ("intnt", Type::Boolean),
    ("me_perdonas", Type::None),
    ("aber", Type::None),
    ("duren", Type::Text),
    ("corona", Type::Text),
    ("amimir", Type::None),
    ("f_en_el_chat", Type::None),
    ("lolazo", Type::Integer),
];


/// Registers the standard functions at the table's current depth, which is expected to be 0.
pub fn load_standard_environment(table: &mut SymbolTable) {
    for (name, return_type) in STANDARD_FUNCTIONS {
        table.insert(name, SymbolType::Function, Declaration::Builtin(return_type));
    }
}
