//! Raku Lexer
//!
//! Tokenizes Raku source text into classified tokens: literal values,
//! punctuation, statement terminators (`nl`, `;`), the three delimiter
//! pairs, comments and trivia. Tokens are pulled one at a time, so the
//! parser never holds more than its single lookahead.
//!
//! # Example
//!
//! ```
//! use raku_lexer::{Scanner, TokenKind};
//!
//! let mut scanner = Scanner::new("z 1\n");
//! let skip = [TokenKind::Whitespace, TokenKind::EscapedNewline];
//! assert_eq!(scanner.lex_skip(&skip).kind, TokenKind::Symbol);
//! assert_eq!(scanner.lex_skip(&skip).kind, TokenKind::Integer);
//! assert_eq!(scanner.lex_skip(&skip).kind, TokenKind::Nl);
//! assert_eq!(scanner.lex_skip(&skip).kind, TokenKind::Eof);
//! ```

pub mod scanner;
pub mod token;

pub use scanner::Scanner;
pub use token::{is_value_kind, Span, Token, TokenKind, Value, VALUE_KINDS};

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Lexer error at line {line}, column {column}: {message}")]
pub struct LexerError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

/// A pull-based supply of tokens.
///
/// The parser only ever asks for "the next token not in this skip set".
/// [`Scanner`] is the usual source; hosts with their own tokenizer can
/// plug in here.
pub trait TokenSource {
    fn lex_skip(&mut self, skip: &[TokenKind]) -> Token;
}

impl TokenSource for Scanner {
    fn lex_skip(&mut self, skip: &[TokenKind]) -> Token {
        Scanner::lex_skip(self, skip)
    }
}

impl LexerError {
    /// Build an error from a `Fail` token.
    pub fn from_token(token: &Token) -> Self {
        Self {
            message: token.fail_message().unwrap_or("Lex error").to_string(),
            line: token.span.line,
            column: token.span.column,
        }
    }
}
