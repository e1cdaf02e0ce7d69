//! Scope and type checking of a parsed program.
//!
//! The [`Verifier`] walks the tree depth first, registering declarations in a [`SymbolTable`] as
//! it meets them, checking that every identifier use refers to a visible declaration, and
//! decorating every node with a [`Type`].
//!
//! Types of declarations are looked up through the id of the declaring node: the verifier keeps
//! the type it gave every node it has visited, so the symbol table never needs to point into the
//! tree.
use indexmap::IndexMap;

use crate::errors::CompileError;
use crate::parser::tree::{NodeId, NodeKind, SyntaxTree};
use crate::parser::types::Type;

use super::errors::{NameError, TypeError};
use super::prelude::load_standard_environment;
use super::symbol_table::{Declaration, Symbol, SymbolTable, SymbolType};


pub struct Verifier {
    table: SymbolTable,
    resolved: IndexMap<NodeId, Type>,
}


impl Verifier {
    /// Creates a verifier whose symbol table already holds the standard environment.
    pub fn new() -> Self {
        let mut table = SymbolTable::new();
        load_standard_environment(&mut table);

        Self {
            table,
            resolved: IndexMap::new(),
        }
    }


    /// Verifies and decorates the program in place, returning the symbol table as it stands once
    /// every block has been closed.
    ///
    /// # Errors
    ///
    /// Returns the first [`NameError`] or [`TypeError`] found, wrapped in a [`CompileError`].
    pub fn verify(mut self, program: &mut SyntaxTree) -> Result<SymbolTable, CompileError> {
        self.visit(program)?;
        tracing::debug!("verified {} nodes", self.resolved.len());
        Ok(self.table)
    }


    fn visit(&mut self, node: &mut SyntaxTree) -> Result<(), CompileError> {
        match node.kind {
            NodeKind::Program => {
                self.visit_children(node)?;
                self.decorate(node, Type::None);
            }

            NodeKind::Assignment => self.visit_assignment(node)?,
            NodeKind::Function => self.visit_function(node)?,
            NodeKind::Invocation => self.visit_invocation(node)?,
            NodeKind::FunctionParameters => self.visit_parameters(node)?,
            NodeKind::InvocationArguments => self.visit_arguments(node)?,
            NodeKind::MathExpression => self.visit_math_expression(node)?,
            NodeKind::Comparison => self.visit_comparison(node)?,
            NodeKind::Return => self.visit_return(node)?,

            NodeKind::Main
            | NodeKind::Loop
            | NodeKind::IfBranch
            | NodeKind::ElseBranch => self.visit_scoped(node)?,

            NodeKind::Instruction => {
                self.visit_children(node)?;
                let t = node.children.first().map_or(Type::None, type_of);
                self.decorate(node, t);
            }

            NodeKind::InstructionBlock => {
                self.visit_children(node)?;
                let t = block_type(&node.children);
                self.decorate(node, t);
            }

            NodeKind::Conditional => {
                self.visit_children(node)?;
                self.decorate(node, Type::Any);
            }

            NodeKind::ConditionalExpression => {
                self.visit_children(node)?;
                self.decorate(node, Type::Boolean);
            }

            NodeKind::Text => self.decorate(node, Type::Text),
            NodeKind::Integer => self.decorate(node, Type::Number),
            NodeKind::Float => self.decorate(node, Type::Float),
            NodeKind::Boolean => self.decorate(node, Type::Boolean),
            NodeKind::Identifier => self.decorate(node, Type::Any),
            NodeKind::Operator => self.decorate(node, Type::Number),
            NodeKind::LogicalOperator => self.decorate(node, Type::LogicalComparator),

            NodeKind::Comparator => {
                let t = comparator_type(node.content.as_deref().unwrap_or_default());
                self.decorate(node, t);
            }
        }

        Ok(())
    }


    fn visit_children(&mut self, node: &mut SyntaxTree) -> Result<(), CompileError> {
        for child in node.children.iter_mut() {
            self.visit(child)?;
        }
        Ok(())
    }


    /// `Assignment ::= Identifier 'anotado' (MathExpr | Invocation | Value) '.'`
    ///
    /// A bare identifier on the right must already exist before the target is declared, so a
    /// variable cannot be declared from itself.
    fn visit_assignment(&mut self, node: &mut SyntaxTree) -> Result<(), CompileError> {
        let [target, value] = node.children.as_mut_slice() else {
            unreachable!("assignments always have a target and a value");
        };

        if value.kind == NodeKind::Identifier {
            self.resolve(value)?;
        }

        self.table.insert(name_of(target), SymbolType::Variable, Declaration::Node(target.id));
        self.visit(value)?;

        let t = type_of(value);
        self.decorate(target, t);
        self.decorate(node, t);
        Ok(())
    }


    /// `Function ::= 'POV' Identifier '(' Params? ')' 'xD' Block 'v:'`
    ///
    /// The function is declared before its body is checked so that it can call itself; until the
    /// body is done its return type is unknown and calls to it are typed `Any`.
    fn visit_function(&mut self, node: &mut SyntaxTree) -> Result<(), CompileError> {
        self.table.insert(name_of(node), SymbolType::Function, Declaration::Node(node.id));
        self.visit_scoped(node)
    }


    /// Visits a node whose children live in a block of their own. The node takes the type of its
    /// instruction block.
    fn visit_scoped(&mut self, node: &mut SyntaxTree) -> Result<(), CompileError> {
        self.table.open_block();
        tracing::trace!("opened block at depth {} for {:?}", self.table.depth(), node.kind);

        self.visit_children(node)?;

        self.table.close_block();
        tracing::trace!("closed block, back to depth {}", self.table.depth());

        let t = node.children.iter()
            .find(|c| c.kind == NodeKind::InstructionBlock)
            .map_or(Type::None, type_of);
        self.decorate(node, t);
        Ok(())
    }


    /// `Params ::= Identifier (',' Identifier)*`
    fn visit_parameters(&mut self, node: &mut SyntaxTree) -> Result<(), CompileError> {
        for param in node.children.iter_mut() {
            self.table.insert(name_of(param), SymbolType::Parameter, Declaration::Node(param.id));
            self.visit(param)?;
        }

        self.decorate(node, Type::None);
        Ok(())
    }


    /// `Invocation ::= 'jutsu' Identifier '(' Args? ')'`
    fn visit_invocation(&mut self, node: &mut SyntaxTree) -> Result<(), CompileError> {
        let Some(callee) = node.children.first() else {
            unreachable!("invocations always name a callee");
        };

        let symbol = self.resolve(callee)?;
        if symbol.category != SymbolType::Function {
            return Err(TypeError::NotCallable {
                name: symbol.name,
                line: callee.start_line,
                column: callee.start_column,
            }.into());
        }

        self.visit_children(node)?;

        let t = self.declared_type(&symbol).unwrap_or(Type::Any);
        self.decorate(node, t);
        Ok(())
    }


    /// `Args ::= Value (',' Value)*`
    fn visit_arguments(&mut self, node: &mut SyntaxTree) -> Result<(), CompileError> {
        for arg in node.children.iter_mut() {
            if arg.kind == NodeKind::Identifier {
                let symbol = self.resolve(arg)?;
                if symbol.category == SymbolType::Function {
                    return Err(TypeError::FunctionAsArgument {
                        name: symbol.name,
                        line: arg.start_line,
                        column: arg.start_column,
                    }.into());
                }
            }
            self.visit(arg)?;
        }

        self.decorate(node, Type::None);
        Ok(())
    }


    /// `MathExpr ::= '#' Value (Operator Value)* '#'`
    ///
    /// Identifiers must be declared as numbers (or be of unknown type) and literals must be
    /// integers.
    fn visit_math_expression(&mut self, node: &mut SyntaxTree) -> Result<(), CompileError> {
        for operand in node.children.iter_mut() {
            self.visit(operand)?;

            let found = match operand.kind {
                NodeKind::Identifier => {
                    let symbol = self.resolve(operand)?;
                    match self.declared_type(&symbol) {
                        Some(t) if t.is_numeric() => continue,
                        Some(t) => t,
                        None => Type::Any,
                    }
                }
                NodeKind::Integer | NodeKind::Operator => continue,
                _ => type_of(operand),
            };

            return Err(TypeError::NotNumeric {
                operand: name_of(operand),
                found: found.to_string(),
                line: operand.start_line,
                column: operand.start_column,
            }.into());
        }

        self.decorate(node, Type::Number);
        Ok(())
    }


    /// `Comparison ::= Value Comparator Value`
    fn visit_comparison(&mut self, node: &mut SyntaxTree) -> Result<(), CompileError> {
        let (line, column) = (node.start_line, node.start_column);
        let [left, comparator, right] = node.children.as_mut_slice() else {
            unreachable!("comparisons always have two operands and a comparator");
        };

        for operand in [&mut *left, &mut *right] {
            if operand.kind == NodeKind::Identifier {
                self.resolve(operand)?;
            }
            self.visit(operand)?;
        }

        let (left_type, right_type) = (type_of(left), type_of(right));
        let Some(common) = comparison_type(left_type, right_type) else {
            return Err(TypeError::IncompatibleComparison {
                comparator: name_of(comparator),
                left: left_type,
                right: right_type,
                line,
                column,
            }.into());
        };

        self.decorate(comparator, common);
        self.decorate(node, Type::Boolean);
        Ok(())
    }


    /// `Return ::= 'messirve' (MathExpr | Invocation | Value)? '.'`
    ///
    /// Returning an identifier gives the type of its declaration rather than `Any`.
    fn visit_return(&mut self, node: &mut SyntaxTree) -> Result<(), CompileError> {
        let t = match node.children.first_mut() {
            None => Type::None,
            Some(value) if value.kind == NodeKind::Identifier => {
                let symbol = self.resolve(value)?;
                self.visit(value)?;
                self.declared_type(&symbol).unwrap_or(Type::Any)
            }
            Some(value) => {
                self.visit(value)?;
                type_of(value)
            }
        };

        self.decorate(node, t);
        Ok(())
    }


    /// Finds the declaration an identifier refers to.
    ///
    /// Variables whose declaring assignment is still being checked are skipped, which makes a
    /// variable invisible inside its own first declaration while still letting `x anotado #x bobMar
    /// 1#.` refer to an earlier `x`.
    fn resolve(&self, identifier: &SyntaxTree) -> Result<Symbol, NameError> {
        let name = name_of(identifier);
        self.table
            .find(&name, |s| s.category != SymbolType::Variable || self.declared_type(s).is_some())
            .ok_or(NameError::Undeclared {
                name,
                line: identifier.start_line,
                column: identifier.start_column,
            })
    }


    /// The type of a symbol's declaration, or `None` if its declaring node is not yet decorated.
    fn declared_type(&self, symbol: &Symbol) -> Option<Type> {
        match symbol.declaration {
            Declaration::Builtin(t) => Some(t),
            Declaration::Node(id) => self.resolved.get(&id).copied(),
        }
    }


    fn decorate(&mut self, node: &mut SyntaxTree, t: Type) {
        node.data_type = Some(t);
        self.resolved.insert(node.id, t);
    }
}


impl Default for Verifier {
    fn default() -> Self {
        Self::new()
    }
}


/// The type of a block is the type of its last instruction that produces a value.
pub fn block_type(instructions: &[SyntaxTree]) -> Type {
    instructions.iter()
        .map(type_of)
        .filter(|t| *t != Type::None)
        .last()
        .unwrap_or(Type::None)
}


/// The type a comparator takes when comparing operands of the given types, or `None` if they
/// cannot be compared.
pub fn comparison_type(left: Type, right: Type) -> Option<Type> {
    if !left.is_compatible_with(&right) {
        None
    } else if left == Type::Any || right == Type::Any {
        Some(Type::Any)
    } else {
        Some(left)
    }
}


/// The type of a comparator seen on its own: ordering comparators work on numbers, equality
/// comparators on anything.
pub fn comparator_type(comparator: &str) -> Type {
    match comparator {
        "panas" | "nolocrick" => Type::Any,
        _ => Type::Number,
    }
}


fn type_of(node: &SyntaxTree) -> Type {
    node.data_type.unwrap_or(Type::None)
}


fn name_of(node: &SyntaxTree) -> String {
    node.content.clone().unwrap_or_default()
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexing::Scanner;
    use crate::parser::parsing::Parser;


    fn verify(source: &str) -> Result<(SyntaxTree, SymbolTable), CompileError> {
        let tokens = Scanner::new(source).scan()?;
        let mut ast = Parser::new(tokens).parse()?;
        let table = Verifier::new().verify(&mut ast)?;
        Ok((ast, table))
    }


    fn find<'a>(ast: &'a SyntaxTree, kind: NodeKind) -> &'a SyntaxTree {
        ast.find(&|n| n.kind == kind).unwrap()
    }


    fn assert_undeclared(result: Result<(SyntaxTree, SymbolTable), CompileError>, expected: &str) {
        match result {
            Err(CompileError::Name(NameError::Undeclared { name, .. })) => assert_eq!(name, expected),
            other => panic!("expected NameError for {}, got {:?}", expected, other),
        }
    }


    #[test]
    fn test_returning_a_global_number() {
        let (ast, table) = verify("x anotado 5.\nmaracuya() xD\nmessirve x.\nv:").unwrap();
        let assignment = &ast.children[0];
        assert_eq!(assignment.data_type, Some(Type::Number));
        assert_eq!(assignment.children[0].data_type, Some(Type::Number));
        assert_eq!(find(&ast, NodeKind::Return).data_type, Some(Type::Number));
        assert_eq!(find(&ast, NodeKind::Main).data_type, Some(Type::Number));
        assert!(table.get("x").is_some());
    }


    #[test]
    fn test_undeclared_return_value() {
        assert_undeclared(verify("maracuya() xD\nmessirve y.\nv:"), "y");
    }


    #[test]
    fn test_function_call_takes_function_type() {
        let source = "POV suma(a,b) xD\nmessirve #a bobMar b#.\nv:\nmaracuya() xD\nz anotado jutsu suma(1,2).\nv:";
        let (ast, table) = verify(source).unwrap();
        assert_eq!(find(&ast, NodeKind::Function).data_type, Some(Type::Number));
        assert_eq!(find(&ast, NodeKind::Invocation).data_type, Some(Type::Number));
        assert_eq!(find(&ast, NodeKind::MathExpression).data_type, Some(Type::Number));
        assert_eq!(table.get("suma").unwrap().category, SymbolType::Function);
        assert!(table.get("a").is_none());
    }


    #[test]
    fn test_text_in_math_expression() {
        let err = verify("x anotado ツholaツ.\nmaracuya() xD\nmessirve #x bobMar 1#.\nv:").unwrap_err();
        assert_eq!(err, CompileError::Type(TypeError::NotNumeric {
            operand: "x".to_owned(),
            found: "Text".to_owned(),
            line: 3,
            column: 11,
        }));
    }


    #[test]
    fn test_conditional_expression_types() {
        let (ast, _) = verify("maracuya() xD\nsiuuu (1 tapotente 2) xD\nmessirve SIUA.\nv:\nv:").unwrap();
        assert_eq!(find(&ast, NodeKind::ConditionalExpression).data_type, Some(Type::Boolean));
        assert_eq!(find(&ast, NodeKind::Comparison).data_type, Some(Type::Boolean));
        assert_eq!(find(&ast, NodeKind::Comparator).data_type, Some(Type::Number));
        assert_eq!(find(&ast, NodeKind::IfBranch).data_type, Some(Type::Boolean));
        assert_eq!(find(&ast, NodeKind::Conditional).data_type, Some(Type::Any));
    }


    #[test]
    fn test_every_node_is_decorated() {
        let source = "g anotado 1.\nPOV f(a) xD\nwhenCuando xD\nb anotado #a bobStar 2#.\nbut (b chikito 10 ayno a panas 3)\nv:\nmessirve a.\nv:\nmaracuya() xD\nsiuuu (g panas 1) xD\nr anotado jutsu f(g).\nv:\nnimodo xD\nmessirve ツnoツ.\nv:\nv:";
        let (ast, _) = verify(source).unwrap();
        fn check(node: &SyntaxTree) {
            assert!(node.data_type.is_some(), "{:?} was not decorated", node.kind);
            node.children.iter().for_each(check);
        }
        check(&ast);
        assert_eq!(find(&ast, NodeKind::LogicalOperator).data_type, Some(Type::LogicalComparator));
        assert_eq!(find(&ast, NodeKind::Loop).data_type, Some(Type::Number));
    }


    #[test]
    fn test_names_declared_in_blocks_are_dropped() {
        assert_undeclared(verify("maracuya() xD\nsiuuu (1 chikito 2) xD\ny anotado 1.\nv:\nmessirve y.\nv:"), "y");
        assert_undeclared(verify("maracuya() xD\nsiuuu (1 chikito 2) xD\nmessirve.\nv:\nnimodo xD\ny anotado 1.\nv:\nmessirve y.\nv:"), "y");
        assert_undeclared(verify("maracuya() xD\nwhenCuando xD\ni anotado 1.\nbut (i chikito 10)\nv:\nmessirve i.\nv:"), "i");
        assert_undeclared(verify("POV f() xD\nt anotado 1.\nmessirve t.\nv:\nmaracuya() xD\nmessirve t.\nv:"), "t");
        assert_undeclared(verify("POV f(p) xD\nmessirve p.\nv:\nmaracuya() xD\nmessirve p.\nv:"), "p");
    }


    #[test]
    fn test_parameters_shadow_globals() {
        // a Text global would be rejected in the math expression if the parameter did not hide it
        let source = "x anotado ツtextoツ.\nPOV f(x) xD\nmessirve #x bobMar 1#.\nv:\nmaracuya() xD\nmessirve x.\nv:";
        let (ast, _) = verify(source).unwrap();
        assert_eq!(find(&ast, NodeKind::Function).data_type, Some(Type::Number));
        assert_eq!(find(&ast, NodeKind::Main).data_type, Some(Type::Text));
    }


    #[test]
    fn test_self_reference_on_first_declaration() {
        assert_undeclared(verify("maracuya() xD\nx anotado x.\nv:"), "x");
        assert_undeclared(verify("maracuya() xD\nx anotado #x bobMar 1#.\nv:"), "x");
        assert_undeclared(verify("maracuya() xD\nx anotado jutsu nel(x).\nv:"), "x");
    }


    #[test]
    fn test_increment_of_existing_variable() {
        let source = "maracuya() xD\ni anotado 0.\nwhenCuando xD\ni anotado #i bobMar 1#.\nbut (i chikito 10)\nv:\nmessirve i.\nv:";
        let (ast, _) = verify(source).unwrap();
        assert_eq!(find(&ast, NodeKind::Main).data_type, Some(Type::Number));
    }


    #[test]
    fn test_non_integer_literals_in_math_expression() {
        for literal in ["1;5", "ツaツ", "SIUA"] {
            let source = format!("maracuya() xD\nmessirve #1 bobMar {}#.\nv:", literal);
            match verify(&source) {
                Err(CompileError::Type(TypeError::NotNumeric { operand, .. })) => assert_eq!(operand, literal),
                other => panic!("expected a type error for {}, got {:?}", literal, other),
            }
        }
    }


    #[test]
    fn test_builtin_with_non_number_type_in_math_expression() {
        let err = verify("maracuya() xD\nt anotado jutsu curcuma().\nmessirve #t bobMar 1#.\nv:").unwrap_err();
        assert!(matches!(err, CompileError::Type(TypeError::NotNumeric { found, .. }) if found == "Text"));
    }


    #[test]
    fn test_incompatible_comparison() {
        let err = verify("maracuya() xD\nsiuuu (ツaツ panas 1) xD\nmessirve.\nv:\nv:").unwrap_err();
        assert_eq!(err, CompileError::Type(TypeError::IncompatibleComparison {
            comparator: "panas".to_owned(),
            left: Type::Text,
            right: Type::Number,
            line: 2,
            column: 8,
        }));
    }


    #[test]
    fn test_comparison_with_identifier_is_permissive() {
        let (ast, _) = verify("t anotado ツaツ.\nmaracuya() xD\nsiuuu (t panas 1) xD\nmessirve.\nv:\nv:").unwrap();
        assert_eq!(find(&ast, NodeKind::Comparator).data_type, Some(Type::Any));
        assert_eq!(find(&ast, NodeKind::Comparison).data_type, Some(Type::Boolean));
    }


    #[test]
    fn test_comparison_operands_must_be_declared() {
        assert_undeclared(verify("maracuya() xD\nsiuuu (1 panas q) xD\nmessirve.\nv:\nv:"), "q");
    }


    #[test]
    fn test_invoking_a_variable() {
        let err = verify("x anotado 1.\nmaracuya() xD\ny anotado jutsu x().\nv:").unwrap_err();
        assert!(matches!(err, CompileError::Type(TypeError::NotCallable { name, .. }) if name == "x"));
    }


    #[test]
    fn test_invoking_an_undeclared_function() {
        assert_undeclared(verify("maracuya() xD\ny anotado jutsu nada().\nv:"), "nada");
    }


    #[test]
    fn test_function_as_argument() {
        let err = verify("POV f() xD\nmessirve 1.\nv:\nmaracuya() xD\ny anotado jutsu nel(f).\nv:").unwrap_err();
        assert!(matches!(err, CompileError::Type(TypeError::FunctionAsArgument { name, .. }) if name == "f"));
    }


    #[test]
    fn test_builtins_are_callable() {
        let (ast, _) = verify("maracuya() xD\nn anotado jutsu lolazo().\nmessirve n.\nv:").unwrap();
        assert_eq!(find(&ast, NodeKind::Invocation).data_type, Some(Type::Integer));
        assert_eq!(find(&ast, NodeKind::Main).data_type, Some(Type::Integer));
    }


    #[test]
    fn test_recursive_call_is_typed_any() {
        let source = "POV f(n) xD\nr anotado jutsu f(n).\nmessirve r.\nv:\nmaracuya() xD\nmessirve.\nv:";
        let (ast, _) = verify(source).unwrap();
        assert_eq!(find(&ast, NodeKind::Invocation).data_type, Some(Type::Any));
        assert_eq!(find(&ast, NodeKind::Function).data_type, Some(Type::Any));
    }


    #[test]
    fn test_block_type_ignores_statements_without_value() {
        let (ast, _) = verify("maracuya() xD\nmessirve 1.\nmessirve.\nv:").unwrap();
        assert_eq!(find(&ast, NodeKind::InstructionBlock).data_type, Some(Type::Number));
    }


    #[test]
    fn test_type_rules_are_idempotent() {
        let (ast, _) = verify("maracuya() xD\nmessirve ツaツ.\nmessirve 2.\nmessirve.\nv:").unwrap();
        let block = find(&ast, NodeKind::InstructionBlock);
        assert_eq!(block_type(&block.children), block.data_type.unwrap());
        assert_eq!(block_type(&block.children), block_type(&block.children));
        assert_eq!(comparison_type(Type::Float, Type::Float), comparison_type(Type::Float, Type::Float));

        let mut twice = ast.clone();
        Verifier::new().verify(&mut twice).unwrap();
        assert_eq!(twice, ast);
    }


    #[test]
    fn test_comparison_type_rule() {
        assert_eq!(comparison_type(Type::Number, Type::Number), Some(Type::Number));
        assert_eq!(comparison_type(Type::Any, Type::Text), Some(Type::Any));
        assert_eq!(comparison_type(Type::Boolean, Type::Any), Some(Type::Any));
        assert_eq!(comparison_type(Type::Boolean, Type::Text), None);
    }


    #[test]
    fn test_standalone_comparator_type() {
        assert_eq!(comparator_type("chikito"), Type::Number);
        assert_eq!(comparator_type("panas"), Type::Any);
        assert_eq!(comparator_type("nolocrick"), Type::Any);
    }
}
