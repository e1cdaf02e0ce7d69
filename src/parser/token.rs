//! Provides a representation of the tokens of the language which include debugging information
//! which can be used to display useful error messages, and the data needed to produce the abstract
//! syntax tree.
use std::fmt;


/// All the categories a token may take in C-Mamuth.
///
/// Reserved words are scanned as identifiers first and then re-tagged with one of the reserved
/// categories via [`TokenKind::from_reserved`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    Integer,
    Float,
    Boolean,
    Text,
    Punctuation,
    Operator,
    LogicalOperator,
    Comparator,
    Keyword,
    Conditional,
    Loop,
    Assignment,
    Invocation,
    /// Only produced for lexical diagnostics, never part of a valid token stream.
    Unrecognized
}


impl TokenKind {
    /// Returns the reserved category for the given identifier text, or `None` if the text is an
    /// ordinary identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmamuth::parser::token::TokenKind;
    ///
    /// assert_eq!(TokenKind::from_reserved("anotado"), Some(TokenKind::Assignment));
    /// assert_eq!(TokenKind::from_reserved("anotadoo"), None);
    /// ```
    pub fn from_reserved(word: &str) -> Option<Self> {
        Some(match word {
            "POV" | "maracuya" | "messirve" => Self::Keyword,
            "bobMar" | "bobStar" | "bobiDir" | "bobTiplicar" => Self::Operator,
            "chikito" | "tapotente" | "panachikito" | "panapotente" | "nolocrick" | "panas" => Self::Comparator,
            "aja" | "ayno" => Self::LogicalOperator,
            "siuuu" | "nimodo" => Self::Conditional,
            "whenCuando" | "but" => Self::Loop,
            "anotado" => Self::Assignment,
            "jutsu" => Self::Invocation,
            "SIUA" | "NOUA" => Self::Boolean,
            _ => return None
        })
    }


    /// True for the kinds that can start a `Value`, i.e. an identifier or a literal.
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Identifier | Self::Integer | Self::Float | Self::Boolean | Self::Text)
    }
}


impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(&format!("{:?}", self))
    }
}


/// Metadata for tokens required for parsing and debugging/error messages.
///
/// Both `line` and `column` are 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize
}


impl Token {
    /// Creates a new token from the information passed as arguments.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmamuth::parser::token::{Token, TokenKind};
    ///
    /// let token = Token::new(TokenKind::Identifier, "my_id", 5, 20);
    /// assert_eq!(token.lexeme, "my_id");
    /// ```
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind, lexeme: lexeme.into(), line, column
        }
    }
}


impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:<16} --> {:<12} (line {}, column {})", self.kind, self.lexeme, self.line, self.column)
    }
}
