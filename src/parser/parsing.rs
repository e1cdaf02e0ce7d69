//! A recursive descent parser turning a stream of tokens into a [`SyntaxTree`].
//!
//! There is one `parse_*` method per production of the grammar below and every decision is made
//! by looking at the current token only.
//!
//! ```text
//! Program        ::= (Assignment)* (Function)* Main
//! Assignment     ::= Identifier 'anotado' (MathExpr | Invocation | Value) '.'
//! Invocation     ::= 'jutsu' Identifier '(' Args? ')'
//! Function       ::= 'POV' Identifier '(' Params? ')' 'xD' Block 'v:'
//! Main           ::= 'maracuya' '(' ')' 'xD' Block 'v:'
//! Params         ::= Identifier (',' Identifier)*
//! Args           ::= Value (',' Value)*
//! Block          ::= Instruction+
//! Instruction    ::= Loop | Assignment | Conditional | Return
//! Loop           ::= 'whenCuando' 'xD' Block 'but' '(' CondExpr ')' 'v:'
//! Conditional    ::= If Else?
//! If             ::= 'siuuu' '(' CondExpr ')' 'xD' Block 'v:'
//! Else           ::= 'nimodo' 'xD' Block 'v:'
//! CondExpr       ::= Comparison (LogicalOp Comparison)?
//! Comparison     ::= Value Comparator Value
//! Return         ::= 'messirve' (MathExpr | Invocation | Value)? '.'
//! Value          ::= Identifier | Literal
//! Literal        ::= Text | Integer | Float | Boolean
//! MathExpr       ::= '#' Value (Operator Value)* '#'
//! ```
use super::errors::ParsingError;
use super::token::*;
use super::tree::{NodeId, NodeKind, SyntaxTree};


/// Holds the token stream, the position of the current token within it, and the id to give the
/// next node created.
///
/// Once every token has been consumed, any further expectation fails with
/// [`ParsingError::UnexpectedEndOfInput`] positioned at the last token.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    next_id: usize
}


impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            position: 0,
            next_id: 0
        }
    }


    /// Parses the whole token stream into a `Program` node.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParsingError`] encountered; there is no recovery. A program without a
    /// `maracuya` entry point always fails with an error naming `maracuya`.
    pub fn parse(&mut self) -> Result<SyntaxTree, ParsingError> {
        let (line, column) = self.position_of_current();
        let mut top_level_constructs: Vec<SyntaxTree> = vec![];

        while self.current_kind() == Some(TokenKind::Identifier) {
            top_level_constructs.push(self.parse_assignment()?);
        }

        while self.current_is("POV") {
            top_level_constructs.push(self.parse_function()?);
        }

        top_level_constructs.push(self.parse_main()?);

        if let Some(token) = self.current() {
            return Err(ParsingError::TrailingInput(token.clone()));
        }

        tracing::debug!("parsed {} top level constructs", top_level_constructs.len());
        Ok(self.node(NodeKind::Program, line, column).with_children(top_level_constructs))
    }


    /// `Assignment ::= Identifier 'anotado' (MathExpr | Invocation | Value) '.'`
    fn parse_assignment(&mut self) -> Result<SyntaxTree, ParsingError> {
        let (line, column) = self.position_of_current();
        let target = self.parse_identifier()?;
        self.expect_text("anotado")?;

        let value = match self.current() {
            Some(token) if token.lexeme == "#" => self.parse_math_expression()?,
            Some(token) if token.kind == TokenKind::Invocation => self.parse_invocation()?,
            Some(token) if token.kind.is_value() => self.parse_value()?,
            Some(token) => return Err(ParsingError::ExpectedConstruct {
                expected: "a math expression, invocation or value",
                found: token.clone()
            }),
            None => return Err(self.end_of_input("a math expression, invocation or value"))
        };

        self.expect_text(".")?;
        Ok(self.node(NodeKind::Assignment, line, column).with_children(vec![target, value]))
    }


    /// `Invocation ::= 'jutsu' Identifier '(' Args? ')'`
    fn parse_invocation(&mut self) -> Result<SyntaxTree, ParsingError> {
        let keyword = self.expect_text("jutsu")?;
        let callee = self.parse_identifier()?;
        let name = callee.content.clone().unwrap_or_default();
        let mut children = vec![callee];

        self.expect_text("(")?;
        if self.current().is_some() && !self.current_is(")") {
            children.push(self.parse_arguments()?);
        }
        self.expect_text(")")?;

        Ok(self.node(NodeKind::Invocation, keyword.line, keyword.column)
            .with_content(name)
            .with_children(children))
    }


    /// `Function ::= 'POV' Identifier '(' Params? ')' 'xD' Block 'v:'`
    fn parse_function(&mut self) -> Result<SyntaxTree, ParsingError> {
        let keyword = self.expect_text("POV")?;
        let name_node = self.parse_identifier()?;
        let name = name_node.content.clone().unwrap_or_default();
        let mut children = vec![name_node];

        self.expect_text("(")?;
        if self.current().is_some() && !self.current_is(")") {
            children.push(self.parse_parameters()?);
        }
        self.expect_text(")")?;

        self.expect_text("xD")?;
        children.push(self.parse_block()?);
        self.expect_text("v:")?;

        Ok(self.node(NodeKind::Function, keyword.line, keyword.column)
            .with_content(name)
            .with_children(children))
    }


    /// `Main ::= 'maracuya' '(' ')' 'xD' Block 'v:'`
    fn parse_main(&mut self) -> Result<SyntaxTree, ParsingError> {
        let keyword = self.expect_text("maracuya")?;
        self.expect_text("(")?;
        self.expect_text(")")?;
        self.expect_text("xD")?;
        let body = self.parse_block()?;
        self.expect_text("v:")?;

        Ok(self.node(NodeKind::Main, keyword.line, keyword.column).with_children(vec![body]))
    }


    /// `Params ::= Identifier (',' Identifier)*`
    fn parse_parameters(&mut self) -> Result<SyntaxTree, ParsingError> {
        let (line, column) = self.position_of_current();
        let mut params = vec![self.parse_identifier()?];
        while self.current_is(",") {
            self.expect_text(",")?;
            params.push(self.parse_identifier()?);
        }

        Ok(self.node(NodeKind::FunctionParameters, line, column).with_children(params))
    }


    /// `Args ::= Value (',' Value)*`
    fn parse_arguments(&mut self) -> Result<SyntaxTree, ParsingError> {
        let (line, column) = self.position_of_current();
        let mut args = vec![self.parse_value()?];
        while self.current_is(",") {
            self.expect_text(",")?;
            args.push(self.parse_value()?);
        }

        Ok(self.node(NodeKind::InvocationArguments, line, column).with_children(args))
    }


    /// `Block ::= Instruction+`
    fn parse_block(&mut self) -> Result<SyntaxTree, ParsingError> {
        let (line, column) = self.position_of_current();
        let mut instructions = vec![self.parse_instruction()?];
        while self.current().is_some_and(starts_instruction) {
            instructions.push(self.parse_instruction()?);
        }

        Ok(self.node(NodeKind::InstructionBlock, line, column).with_children(instructions))
    }


    /// `Instruction ::= Loop | Assignment | Conditional | Return`
    fn parse_instruction(&mut self) -> Result<SyntaxTree, ParsingError> {
        let (line, column) = self.position_of_current();
        let instruction = match self.current() {
            Some(token) if token.kind == TokenKind::Identifier => self.parse_assignment()?,
            Some(token) if token.lexeme == "whenCuando" => self.parse_loop()?,
            Some(token) if token.lexeme == "siuuu" => self.parse_conditional()?,
            Some(token) if token.lexeme == "messirve" => self.parse_return()?,
            Some(token) => return Err(ParsingError::ExpectedConstruct {
                expected: "an instruction",
                found: token.clone()
            }),
            None => return Err(self.end_of_input("an instruction"))
        };

        Ok(self.node(NodeKind::Instruction, line, column).with_children(vec![instruction]))
    }


    /// `Loop ::= 'whenCuando' 'xD' Block 'but' '(' CondExpr ')' 'v:'`
    fn parse_loop(&mut self) -> Result<SyntaxTree, ParsingError> {
        let keyword = self.expect_text("whenCuando")?;
        self.expect_text("xD")?;
        let body = self.parse_block()?;
        self.expect_text("but")?;
        self.expect_text("(")?;
        let condition = self.parse_conditional_expression()?;
        self.expect_text(")")?;
        self.expect_text("v:")?;

        Ok(self.node(NodeKind::Loop, keyword.line, keyword.column).with_children(vec![body, condition]))
    }


    /// `Conditional ::= If Else?`
    fn parse_conditional(&mut self) -> Result<SyntaxTree, ParsingError> {
        let (line, column) = self.position_of_current();
        let mut branches = vec![self.parse_if()?];
        if self.current_is("nimodo") {
            branches.push(self.parse_else()?);
        }

        Ok(self.node(NodeKind::Conditional, line, column).with_children(branches))
    }


    /// `If ::= 'siuuu' '(' CondExpr ')' 'xD' Block 'v:'`
    fn parse_if(&mut self) -> Result<SyntaxTree, ParsingError> {
        let keyword = self.expect_text("siuuu")?;
        self.expect_text("(")?;
        let condition = self.parse_conditional_expression()?;
        self.expect_text(")")?;
        self.expect_text("xD")?;
        let body = self.parse_block()?;
        self.expect_text("v:")?;

        Ok(self.node(NodeKind::IfBranch, keyword.line, keyword.column).with_children(vec![condition, body]))
    }


    /// `Else ::= 'nimodo' 'xD' Block 'v:'`
    fn parse_else(&mut self) -> Result<SyntaxTree, ParsingError> {
        let keyword = self.expect_text("nimodo")?;
        self.expect_text("xD")?;
        let body = self.parse_block()?;
        self.expect_text("v:")?;

        Ok(self.node(NodeKind::ElseBranch, keyword.line, keyword.column).with_children(vec![body]))
    }


    /// `CondExpr ::= Comparison (LogicalOp Comparison)?`
    fn parse_conditional_expression(&mut self) -> Result<SyntaxTree, ParsingError> {
        let (line, column) = self.position_of_current();
        let mut children = vec![self.parse_comparison()?];
        if self.current_kind() == Some(TokenKind::LogicalOperator) {
            children.push(self.parse_leaf(TokenKind::LogicalOperator, NodeKind::LogicalOperator)?);
            children.push(self.parse_comparison()?);
        }

        Ok(self.node(NodeKind::ConditionalExpression, line, column).with_children(children))
    }


    /// `Comparison ::= Value Comparator Value`
    fn parse_comparison(&mut self) -> Result<SyntaxTree, ParsingError> {
        let (line, column) = self.position_of_current();
        let left = self.parse_value()?;
        let comparator = self.parse_leaf(TokenKind::Comparator, NodeKind::Comparator)?;
        let right = self.parse_value()?;

        Ok(self.node(NodeKind::Comparison, line, column).with_children(vec![left, comparator, right]))
    }


    /// `Return ::= 'messirve' (MathExpr | Invocation | Value)? '.'`
    fn parse_return(&mut self) -> Result<SyntaxTree, ParsingError> {
        let keyword = self.expect_text("messirve")?;

        let value = match self.current() {
            Some(token) if token.lexeme == "#" => Some(self.parse_math_expression()?),
            Some(token) if token.kind == TokenKind::Invocation => Some(self.parse_invocation()?),
            Some(token) if token.kind.is_value() => Some(self.parse_value()?),
            _ => None
        };

        self.expect_text(".")?;
        Ok(self.node(NodeKind::Return, keyword.line, keyword.column).with_children(value.into_iter().collect()))
    }


    /// `MathExpr ::= '#' Value (Operator Value)* '#'`
    fn parse_math_expression(&mut self) -> Result<SyntaxTree, ParsingError> {
        let open = self.expect_text("#")?;
        let mut children = vec![self.parse_value()?];
        while self.current_kind() == Some(TokenKind::Operator) {
            children.push(self.parse_leaf(TokenKind::Operator, NodeKind::Operator)?);
            children.push(self.parse_value()?);
        }
        self.expect_text("#")?;

        Ok(self.node(NodeKind::MathExpression, open.line, open.column).with_children(children))
    }


    /// `Value ::= Identifier | Literal`
    fn parse_value(&mut self) -> Result<SyntaxTree, ParsingError> {
        match self.current_kind() {
            Some(TokenKind::Identifier) => self.parse_identifier(),
            _ => self.parse_literal()
        }
    }


    /// `Literal ::= Text | Integer | Float | Boolean`
    fn parse_literal(&mut self) -> Result<SyntaxTree, ParsingError> {
        match self.current_kind() {
            Some(TokenKind::Integer) => self.parse_leaf(TokenKind::Integer, NodeKind::Integer),
            Some(TokenKind::Float) => self.parse_leaf(TokenKind::Float, NodeKind::Float),
            Some(TokenKind::Boolean) => self.parse_leaf(TokenKind::Boolean, NodeKind::Boolean),
            Some(TokenKind::Text) => self.parse_leaf(TokenKind::Text, NodeKind::Text),
            Some(_) => Err(ParsingError::ExpectedConstruct {
                expected: "an identifier or literal",
                found: self.tokens[self.position].clone()
            }),
            None => Err(self.end_of_input("an identifier or literal"))
        }
    }


    fn parse_identifier(&mut self) -> Result<SyntaxTree, ParsingError> {
        self.parse_leaf(TokenKind::Identifier, NodeKind::Identifier)
    }


    /// Consumes a token of the given kind and turns it into a leaf holding its lexeme.
    fn parse_leaf(&mut self, token_kind: TokenKind, node_kind: NodeKind) -> Result<SyntaxTree, ParsingError> {
        let token = self.expect_kind(token_kind)?;
        Ok(self.node(node_kind, token.line, token.column).with_content(token.lexeme))
    }


    /// Advances past the current token if its text is `expected`.
    fn expect_text(&mut self, expected: &str) -> Result<Token, ParsingError> {
        match self.current() {
            Some(token) if token.lexeme == expected => Ok(self.advance()),
            Some(token) => Err(ParsingError::ExpectedText {
                expected: expected.to_owned(),
                found: token.clone()
            }),
            None => Err(self.end_of_input(&format!("'{}'", expected)))
        }
    }


    /// Advances past the current token if it is of the `expected` kind.
    fn expect_kind(&mut self, expected: TokenKind) -> Result<Token, ParsingError> {
        match self.current() {
            Some(token) if token.kind == expected => Ok(self.advance()),
            Some(token) => Err(ParsingError::ExpectedKind {
                expected,
                found: token.clone()
            }),
            None => Err(self.end_of_input(&format!("a token of kind {}", expected)))
        }
    }


    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }


    fn current_kind(&self) -> Option<TokenKind> {
        self.current().map(|t| t.kind)
    }


    fn current_is(&self, text: &str) -> bool {
        self.current().is_some_and(|t| t.lexeme == text)
    }


    /// Returns the current token and moves past it. Must only be called when a token exists.
    fn advance(&mut self) -> Token {
        let token = self.tokens[self.position].clone();
        self.position += 1;
        token
    }


    /// The position of the current token, clamped to the last token once the stream is exhausted.
    fn position_of_current(&self) -> (usize, usize) {
        self.current()
            .or(self.tokens.last())
            .map_or((1, 1), |t| (t.line, t.column))
    }


    fn end_of_input(&self, expected: &str) -> ParsingError {
        let (line, column) = self.position_of_current();
        ParsingError::UnexpectedEndOfInput { expected: expected.to_owned(), line, column }
    }


    fn node(&mut self, kind: NodeKind, line: usize, column: usize) -> SyntaxTree {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        SyntaxTree::new(id, kind, line, column)
    }
}


fn starts_instruction(token: &Token) -> bool {
    token.kind == TokenKind::Identifier || matches!(token.lexeme.as_str(), "whenCuando" | "siuuu" | "messirve")
}
