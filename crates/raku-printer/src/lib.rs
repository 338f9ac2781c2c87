//! Raku Printers
//!
//! Consumers of the parse tree. None of them evaluate anything; they only
//! walk the tree and render it.
//!
//! ```text
//! Tree → sexpr::render()  → indented S-expression dump
//! Tree → source::render() → canonical Raku source
//! Tree → json::to_json()  → serde-serializable nested view
//! ```

pub mod json;
pub mod sexpr;
pub mod source;

use raku_lexer::{TokenKind, Value};
use raku_parser::{Node, NodeKind};

pub use json::{to_json, JsonNode};

/// Printing error. Only hand-built trees can trigger one; trees returned
/// by the parser always print.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Print error: {message}")]
pub struct PrintError {
    pub message: String,
}

impl PrintError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Layout settings for canonical source output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintOptions {
    /// Spaces per block level.
    pub indent: usize,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

/// Render a leaf exactly as it would be written in source.
pub(crate) fn leaf_text(node: &Node) -> Result<String, PrintError> {
    let NodeKind::Token(kind) = node.kind else {
        return Err(PrintError::new(format!("{} is not a leaf", node.kind)));
    };
    let text = match (kind, &node.value) {
        (TokenKind::Colon, _) => ":".to_string(),
        (TokenKind::Comma, _) => ",".to_string(),
        (TokenKind::Period, _) => ".".to_string(),
        (TokenKind::String, Some(Value::Text(text))) => quote(text),
        (TokenKind::Comment, Some(Value::Text(text))) if text.is_empty() => "#".to_string(),
        (TokenKind::Comment, Some(Value::Text(text))) => format!("# {text}"),
        (
            TokenKind::Integer | TokenKind::Float | TokenKind::Symbol | TokenKind::Operator,
            Some(value),
        ) => value.to_string(),
        (kind, _) => return Err(PrintError::new(format!("cannot print a {kind} leaf"))),
    };
    Ok(text)
}

/// Double-quote a string, escaping what the lexer unescapes.
pub(crate) fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
