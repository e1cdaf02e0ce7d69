//! The abstract syntax tree produced by the parser and decorated by the verifier.
//!
//! Every grammar production maps to one [`NodeKind`] and the order of a node's children mirrors
//! the order of the production's symbols, so the shape of the tree is exactly the grammar
//! derivation of the program.
use std::fmt;

use super::types::Type;


/// Identifies a node within one parse. Ids are handed out in creation order and never reused,
/// which makes them suitable as back-references from the symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    Assignment,
    Function,
    Main,
    Invocation,
    FunctionParameters,
    InvocationArguments,
    Instruction,
    InstructionBlock,
    Loop,
    Conditional,
    IfBranch,
    ElseBranch,
    ConditionalExpression,
    Comparison,
    Return,
    Text,
    Integer,
    Float,
    Boolean,
    MathExpression,
    Operator,
    LogicalOperator,
    Comparator,
    Identifier
}


#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    pub id: NodeId,
    pub kind: NodeKind,
    /// The lexeme of a leaf, or the name of a function or callee.
    pub content: Option<String>,
    pub children: Vec<SyntaxTree>,
    pub start_line: usize,
    pub start_column: usize,
    /// Filled in by the verifier.
    pub data_type: Option<Type>
}


impl SyntaxTree {
    pub fn new(id: NodeId, kind: NodeKind, start_line: usize, start_column: usize) -> Self {
        Self {
            id,
            kind,
            content: None,
            children: vec![],
            start_line,
            start_column,
            data_type: None
        }
    }


    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }


    pub fn with_children(mut self, children: Vec<SyntaxTree>) -> Self {
        self.children = children;
        self
    }


    /// The node kinds of the tree in preorder.
    pub fn preorder_kinds(&self) -> Vec<NodeKind> {
        let mut kinds = vec![self.kind];
        for child in &self.children {
            kinds.extend(child.preorder_kinds());
        }
        kinds
    }


    /// Finds the first node in preorder satisfying the predicate.
    pub fn find(&self, predicate: &impl Fn(&SyntaxTree) -> bool) -> Option<&SyntaxTree> {
        if predicate(self) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(predicate))
    }


    fn write_indented(&self, f: &mut fmt::Formatter, level: usize) -> fmt::Result {
        if level > 0 {
            write!(f, "{}|__", "   ".repeat(level - 1))?;
        }

        write!(f, "{:?}", self.kind)?;
        if let Some(content) = &self.content {
            write!(f, " {:?}", content)?;
        }
        write!(f, " (line {}, column {})", self.start_line, self.start_column)?;
        if let Some(t) = self.data_type {
            write!(f, " : {}", t)?;
        }
        writeln!(f)?;

        for child in &self.children {
            child.write_indented(f, level + 1)?;
        }
        Ok(())
    }
}


impl fmt::Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
