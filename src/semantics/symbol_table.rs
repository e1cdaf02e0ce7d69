//! # Symbol Table Module
//!
//! A flat, insertion-ordered symbol table where each entry remembers the scope depth at which it
//! was declared.
//!
//! Opening a block increases the current depth and closing it drops every entry declared at that
//! depth. A lookup returns the most recently declared entry whose depth is not deeper than the
//! current one, which gives lexical shadowing: a parameter hides an outer variable of the same
//! name for as long as the function body is open.
//!
//! Blocks never interleave at one depth (a block is always closed before a sibling is opened), so
//! purging by depth removes exactly the entries of the block being closed.
//!
//! Example:
//!
//! ```rust
//! use cmamuth::parser::tree::NodeId;
//! use cmamuth::semantics::symbol_table::{Declaration, SymbolTable, SymbolType};
//!
//! let mut table = SymbolTable::new();
//! table.insert("x", SymbolType::Variable, Declaration::Node(NodeId(0)));
//!
//! table.open_block();
//! table.insert("x", SymbolType::Parameter, Declaration::Node(NodeId(7)));
//! assert_eq!(table.get("x").unwrap().category, SymbolType::Parameter);
//!
//! table.close_block();
//! assert_eq!(table.get("x").unwrap().category, SymbolType::Variable);
//! ```
use std::fmt;

use crate::parser::tree::NodeId;
use crate::parser::types::Type;


/// What kind of declaration introduced a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolType {
    Variable,
    Parameter,
    Function,
}


/// Where the type of a symbol comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Declaration {
    /// The node that declared the symbol. The symbol's type is whatever type that node is
    /// decorated with; the table does not own the node.
    Node(NodeId),
    /// A function of the standard environment with a fixed return type.
    Builtin(Type),
}


/// Represents a symbol in the symbol table with the depth it was declared at.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub depth: usize,
    pub category: SymbolType,
    pub declaration: Declaration,
}


impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let origin = match self.declaration {
            Declaration::Node(id) => format!("node {}", id.0),
            Declaration::Builtin(t) => format!("builtin returning {}", t),
        };
        write!(f, "{:<20} depth: {}, {:?}, {}", self.name, self.depth, self.category, origin)
    }
}


#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    depth: usize,
}


impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }


    /// The depth of the innermost open block, 0 at the top level.
    pub fn depth(&self) -> usize {
        self.depth
    }


    pub fn open_block(&mut self) {
        self.depth += 1;
    }


    /// Drops every symbol declared at the current depth and returns to the enclosing block.
    pub fn close_block(&mut self) {
        let depth = self.depth;
        self.symbols.retain(|s| s.depth != depth);
        self.depth = self.depth.saturating_sub(1);
    }


    /// Declares a new symbol at the current depth.
    pub fn insert(&mut self, name: impl Into<String>, category: SymbolType, declaration: Declaration) {
        self.symbols.push(Symbol {
            name: name.into(),
            depth: self.depth,
            category,
            declaration,
        });
    }


    /// Retrieves the visible symbol with the given name.
    ///
    /// When several are visible the most recently declared one wins.
    pub fn get(&self, name: &str) -> Option<Symbol> {
        self.symbols.iter()
            .rev()
            .find(|s| s.name == name && s.depth <= self.depth)
            .cloned()
    }


    /// Like [`SymbolTable::get`], but only considers symbols accepted by `predicate`.
    pub fn find(&self, name: &str, predicate: impl Fn(&Symbol) -> bool) -> Option<Symbol> {
        self.symbols.iter()
            .rev()
            .find(|s| s.name == name && s.depth <= self.depth && predicate(s))
            .cloned()
    }


    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }
}


impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "SYMBOL TABLE")?;
        for symbol in &self.symbols {
            writeln!(f, "{}|__{}", "   ".repeat(symbol.depth), symbol)?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;


    #[test]
    fn test_lookup_of_missing_name() {
        let table = SymbolTable::new();
        assert!(table.get("nothing").is_none());
    }


    #[test]
    fn test_most_recent_declaration_wins() {
        let mut table = SymbolTable::new();
        table.insert("x", SymbolType::Variable, Declaration::Node(NodeId(1)));
        table.insert("x", SymbolType::Variable, Declaration::Node(NodeId(2)));
        assert_eq!(table.get("x").unwrap().declaration, Declaration::Node(NodeId(2)));
    }


    #[test]
    fn test_find_skips_rejected_symbols() {
        let mut table = SymbolTable::new();
        table.insert("x", SymbolType::Variable, Declaration::Node(NodeId(1)));
        table.insert("x", SymbolType::Variable, Declaration::Node(NodeId(2)));
        let found = table.find("x", |s| s.declaration != Declaration::Node(NodeId(2)));
        assert_eq!(found.unwrap().declaration, Declaration::Node(NodeId(1)));
        assert!(table.find("x", |_| false).is_none());
    }


    #[test]
    fn test_closing_a_block_drops_its_symbols() {
        let mut table = SymbolTable::new();
        table.insert("outer", SymbolType::Variable, Declaration::Node(NodeId(0)));
        table.open_block();
        table.insert("inner", SymbolType::Variable, Declaration::Node(NodeId(1)));
        assert_eq!(table.get("inner").unwrap().depth, 1);
        assert!(table.get("outer").is_some());

        table.close_block();
        assert_eq!(table.depth(), 0);
        assert!(table.get("inner").is_none());
        assert!(table.get("outer").is_some());
        assert_eq!(table.symbols().len(), 1);
    }


    #[test]
    fn test_nested_blocks() {
        let mut table = SymbolTable::new();
        table.open_block();
        table.insert("a", SymbolType::Parameter, Declaration::Node(NodeId(0)));
        table.open_block();
        table.insert("b", SymbolType::Variable, Declaration::Node(NodeId(1)));
        assert!(table.get("a").is_some());
        table.close_block();
        assert!(table.get("b").is_none());
        assert!(table.get("a").is_some());
        table.close_block();
        assert!(table.get("a").is_none());
    }


    #[test]
    fn test_display_lists_every_symbol() {
        let mut table = SymbolTable::new();
        table.insert("nel", SymbolType::Function, Declaration::Builtin(Type::Number));
        table.open_block();
        table.insert("y", SymbolType::Variable, Declaration::Node(NodeId(3)));
        let shown = table.to_string();
        assert!(shown.starts_with("SYMBOL TABLE"));
        assert!(shown.contains("builtin returning Number"));
        assert!(shown.contains("   |__y"));
    }
}
