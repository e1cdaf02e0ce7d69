//! Provides a struct `Scanner` for lexical analysis of C-Mamuth source text into a
//! `Vec<Token>`.
//!
//! Scanning is driven by a single regular expression made of named alternatives which are tried
//! in a fixed priority order at every position, so that for example a float literal is preferred
//! over the integer that prefixes it. Identifiers are re-tagged afterwards if their text is a
//! reserved word.
//!
//! # Examples
//!
//! ```
//! use cmamuth::parser::lexing::Scanner;
//!
//! let tokens = Scanner::new("x anotado 5.").scan().unwrap();
//! assert_eq!(tokens.len(), 4);
//! ```
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::errors::LexingError;
use super::token::*;


/// The token patterns in the order they are tried. The order is significant.
const PATTERNS: [(&str, &str); 10] = [
    ("malformed", r"[0-9;]+[_A-Za-z]+"),
    ("comment", r"muchoTexto:.*"),
    ("text", r"ツ.*ツ"),
    ("punctuation", r"xD|v:|\(|\)|\.|,|#"),
    ("float", r"-?[0-9]+;[0-9]+"),
    ("integer", r"-?[0-9]+"),
    ("identifier", r"[A-Za-z_][A-Za-z_0-9]*"),
    ("newline", r"\n"),
    ("whitespace", r"[ \t\r]+"),
    ("error", r"."),
];


static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives: Vec<String> = PATTERNS.iter()
        .map(|(name, pattern)| format!("(?P<{}>{})", name, pattern))
        .collect();

    Regex::new(&alternatives.join("|")).expect("token patterns are valid regular expressions")
});


/// Contains the data required to lexically analyse a piece of source code.
///
/// The scanner walks the source once. `line` is the current 1-indexed line and `line_start` is
/// the byte offset at which that line begins, which together give each token its position.
/// Unrecognized input does not stop the scan; it is collected in `errors` and reported once the
/// whole source has been processed.
pub struct Scanner<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    errors: Vec<Token>,
    line: usize,
    line_start: usize
}


impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            errors: Vec::new(),
            line: 1,
            line_start: 0
        }
    }


    /// Scans the entire source and returns its tokens.
    ///
    /// Whitespace, newlines and comments are consumed but produce no tokens.
    ///
    /// # Errors
    ///
    /// Returns [`LexingError::UnrecognizedTokens`] carrying every offending piece of input if any
    /// part of the source does not match a valid token.
    pub fn scan(mut self) -> Result<Vec<Token>, LexingError> {
        for captures in TOKEN_PATTERN.captures_iter(self.source) {
            self.categorize_match(&captures);
        }

        if !self.errors.is_empty() {
            return Err(LexingError::UnrecognizedTokens(self.errors));
        }

        tracing::debug!("scanned {} tokens over {} lines", self.tokens.len(), self.line);
        Ok(self.tokens)
    }


    /// Works out which alternative produced the match and acts on it.
    fn categorize_match(&mut self, captures: &Captures) {
        let Some((name, matched)) = PATTERNS.iter()
            .find_map(|(name, _)| captures.name(name).map(|m| (*name, m)))
        else {
            return;
        };

        let column = self.source[self.line_start..matched.start()].chars().count() + 1;
        let lexeme = matched.as_str();

        let kind = match name {
            "newline" => {
                self.line += 1;
                self.line_start = matched.end();
                return;
            }

            "whitespace" | "comment" => return,

            "malformed" | "error" => {
                tracing::warn!("unrecognized token {:?} at line {}, column {}", lexeme, self.line, column);
                self.errors.push(Token::new(TokenKind::Unrecognized, lexeme, self.line, column));
                return;
            }

            "text" => TokenKind::Text,
            "punctuation" => TokenKind::Punctuation,
            "float" => TokenKind::Float,
            "integer" => TokenKind::Integer,
            _ => TokenKind::from_reserved(lexeme).unwrap_or(TokenKind::Identifier)
        };

        self.tokens.push(Token::new(kind, lexeme, self.line, column));
    }
}


#[cfg(test)]
mod tests {
    use super::*;


    fn kinds(source: &str) -> Vec<TokenKind> {
        Scanner::new(source).scan().unwrap().into_iter().map(|t| t.kind).collect()
    }


    #[test]
    fn test_assignment_tokens() {
        let tokens = Scanner::new("x anotado 5.").scan().unwrap();
        assert_eq!(tokens, vec![
            Token::new(TokenKind::Identifier, "x", 1, 1),
            Token::new(TokenKind::Assignment, "anotado", 1, 3),
            Token::new(TokenKind::Integer, "5", 1, 11),
            Token::new(TokenKind::Punctuation, ".", 1, 12),
        ]);
    }


    #[test]
    fn test_float_preferred_over_integer() {
        let tokens = Scanner::new("-3;14").scan().unwrap();
        assert_eq!(tokens, vec![Token::new(TokenKind::Float, "-3;14", 1, 1)]);
    }


    #[test]
    fn test_negative_integer() {
        assert_eq!(kinds("-42"), vec![TokenKind::Integer]);
    }


    #[test]
    fn test_reserved_words_retagged() {
        assert_eq!(kinds("POV whenCuando but siuuu nimodo jutsu SIUA aja chikito bobMar ident"), vec![
            TokenKind::Keyword,
            TokenKind::Loop,
            TokenKind::Loop,
            TokenKind::Conditional,
            TokenKind::Conditional,
            TokenKind::Invocation,
            TokenKind::Boolean,
            TokenKind::LogicalOperator,
            TokenKind::Comparator,
            TokenKind::Operator,
            TokenKind::Identifier,
        ]);
    }


    #[test]
    fn test_punctuation_groups() {
        let tokens = Scanner::new("maracuya() xD v: #,").scan().unwrap();
        let lexemes: Vec<&str> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(lexemes, vec!["maracuya", "(", ")", "xD", "v:", "#", ","]);
    }


    #[test]
    fn test_lines_and_columns_tracked() {
        let tokens = Scanner::new("maracuya() xD\n  messirve.\nv:").scan().unwrap();
        let messirve = &tokens[4];
        assert_eq!((messirve.lexeme.as_str(), messirve.line, messirve.column), ("messirve", 2, 3));
        let close = tokens.last().unwrap();
        assert_eq!((close.line, close.column), (3, 1));
    }


    #[test]
    fn test_columns_count_characters() {
        let tokens = Scanner::new("x anotado ツholaツ.").scan().unwrap();
        assert_eq!(tokens[2].kind, TokenKind::Text);
        assert_eq!(tokens[2].lexeme, "ツholaツ");
        assert_eq!(tokens[3].column, 17);
    }


    #[test]
    fn test_comments_skipped() {
        let tokens = Scanner::new("muchoTexto: anything goes here $$\nx anotado 1.").scan().unwrap();
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].line, 2);
    }


    #[test]
    fn test_unrecognized_characters_are_all_reported() {
        let err = Scanner::new("x anotado $.\ny anotado @.").scan().unwrap_err();
        let LexingError::UnrecognizedTokens(bad) = err;
        assert_eq!(bad.len(), 2);
        assert_eq!((bad[0].lexeme.as_str(), bad[0].line, bad[0].column), ("$", 1, 11));
        assert_eq!((bad[1].lexeme.as_str(), bad[1].line, bad[1].column), ("@", 2, 11));
    }


    #[test]
    fn test_number_prefixed_identifier_is_an_error() {
        let err = Scanner::new("9lives anotado 1.").scan().unwrap_err();
        let LexingError::UnrecognizedTokens(bad) = err;
        assert_eq!(bad[0].lexeme, "9lives");
    }
}
