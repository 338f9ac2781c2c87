use std::fmt;

/// A position in source text, tracking line and column for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

/// Token classification for Raku source.
///
/// The set is closed: the parser and every tree consumer switch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Values
    Integer,
    Float,
    String,
    Symbol,
    Operator,
    Colon,
    Comma,
    Period,

    // Statement terminators
    Nl,
    Semicolon,

    // Delimiters
    LCurly,
    RCurly,
    LParen,
    RParen,
    LBracket,
    RBracket,

    // Trivia
    Comment,
    Whitespace,
    EscapedNewline,

    // End of input
    Eof,

    /// Malformed input. The token's value holds the reason.
    Fail,
}

impl TokenKind {
    /// The lowercase name used in grammar rules and diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Integer => "integer",
            TokenKind::Float => "float",
            TokenKind::String => "string",
            TokenKind::Symbol => "symbol",
            TokenKind::Operator => "operator",
            TokenKind::Colon => "colon",
            TokenKind::Comma => "comma",
            TokenKind::Period => "period",
            TokenKind::Nl => "nl",
            TokenKind::Semicolon => "semicolon",
            TokenKind::LCurly => "lcurly",
            TokenKind::RCurly => "rcurly",
            TokenKind::LParen => "lparen",
            TokenKind::RParen => "rparen",
            TokenKind::LBracket => "lbracket",
            TokenKind::RBracket => "rbracket",
            TokenKind::Comment => "comment",
            TokenKind::Whitespace => "ws",
            TokenKind::EscapedNewline => "esc_nl",
            TokenKind::Eof => "eof",
            TokenKind::Fail => "fail",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Literal payload of a token, typed per kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            // Keep a decimal point so the text reads back as a float.
            Value::Float(n) if n.fract() == 0.0 && n.is_finite() => write!(f, "{n:.1}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Text(text) => f.write_str(text),
        }
    }
}

/// A token produced by the Raku lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: Option<Value>,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            value: None,
            span,
        }
    }

    pub fn with_value(kind: TokenKind, value: Value, span: Span) -> Self {
        Self {
            kind,
            value: Some(value),
            span,
        }
    }

    pub fn is_fail(&self) -> bool {
        self.kind == TokenKind::Fail
    }

    /// Failure reason carried by a `Fail` token.
    pub fn fail_message(&self) -> Option<&str> {
        if self.is_fail() {
            self.value.as_ref().and_then(Value::as_text)
        } else {
            None
        }
    }
}

/// Kinds that may start or make up a value in the grammar.
pub const VALUE_KINDS: &[TokenKind] = &[
    TokenKind::Integer,
    TokenKind::Float,
    TokenKind::String,
    TokenKind::Symbol,
    TokenKind::Operator,
    TokenKind::Colon,
    TokenKind::Comma,
    TokenKind::Period,
];

/// Check if a kind is a value kind.
pub fn is_value_kind(kind: TokenKind) -> bool {
    VALUE_KINDS.contains(&kind)
}
