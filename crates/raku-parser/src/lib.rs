//! Raku Parser
//!
//! Parses Raku source into a generic parse tree. Raku's grammar is LL(1):
//! every rule picks its alternative from the kind of the single lookahead
//! token, so the parser is a predictive recursive-descent parser that runs
//! in linear time without backtracking.
//!
//! ```text
//! PROGRAM    -> STATEMENT PROGRAM | .
//! STATEMENT  -> EXPRESSION | BLOCK | EMPTY_LINE | comment .
//! EXPRESSION -> VALUE PARAMLIST NL .
//! PARAMLIST  -> PARAMETER PARAMLIST | .
//! PARAMETER  -> BLOCK | VALUE .
//! EMPTY_LINE -> NL .
//! BLOCK      -> lcurly PROGRAM rcurly | lparen PROGRAM rparen | lbracket PROGRAM rbracket .
//! NL         -> nl | semicolon .
//! VALUE      -> integer | float | string | symbol | operator | colon | comma | period .
//! ```
//!
//! # Example
//!
//! ```
//! use raku_parser::{NodeKind, Parser};
//!
//! let tree = Parser::parse("map test {\n  name \"world\"\n}\n").unwrap();
//! let program = tree.program().unwrap();
//! assert_eq!(tree.children(program).len(), 1);
//! assert_eq!(tree.get(tree.children(program)[0]).kind, NodeKind::Expression);
//! ```
//!
//! Nesting is handled by recursion, so block depth is bounded by the
//! call stack.

pub mod parser;
pub mod tree;


pub use parser::Parser;
pub use tree::{Delimiter, Draft, Node, NodeId, NodeKind, Tree, Walk};

use raku_lexer::{LexerError, Token, TokenKind};

/// A failed parse. Both variants abort the whole parse.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// The lexer could not classify the input.
    #[error("Lex error at line {line}, column {column}: {message}")]
    Lex {
        message: String,
        line: usize,
        column: usize,
    },

    /// No grammar alternative matched the lookahead token.
    #[error("Parse error in {found} at line {line}, column {column}: {message}")]
    Syntax {
        message: String,
        found: TokenKind,
        /// Kinds that would have been accepted. Empty when the rule has no
        /// single required token (e.g. "parameter expected").
        expected: Vec<TokenKind>,
        line: usize,
        column: usize,
    },
}

impl ParseError {
    pub(crate) fn lex(token: &Token) -> Self {
        LexerError::from_token(token).into()
    }

    pub fn message(&self) -> &str {
        match self {
            ParseError::Lex { message, .. } | ParseError::Syntax { message, .. } => message,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            ParseError::Lex { line, .. } | ParseError::Syntax { line, .. } => *line,
        }
    }

    pub fn column(&self) -> usize {
        match self {
            ParseError::Lex { column, .. } | ParseError::Syntax { column, .. } => *column,
        }
    }

    pub fn is_lex(&self) -> bool {
        matches!(self, ParseError::Lex { .. })
    }
}

impl From<LexerError> for ParseError {
    fn from(e: LexerError) -> Self {
        ParseError::Lex {
            message: e.message,
            line: e.line,
            column: e.column,
        }
    }
}
