//! Predictive recursive-descent parser for Raku.
//!
//! One method per grammar rule. A rule that does not own the lookahead
//! token returns `Ok(None)` without consuming anything, and the caller
//! tries its next alternative; a rule that must match returns an error.
//! Tokens become tree nodes in exactly one place, [`Parser::accept`].

use raku_lexer::{Scanner, Span, Token, TokenKind, TokenSource, VALUE_KINDS};
use tracing::{debug, trace};

use crate::tree::{Delimiter, Draft, NodeKind, Tree};
use crate::ParseError;

/// Trivia the parser never sees.
const IGNORE: &[TokenKind] = &[TokenKind::Whitespace, TokenKind::EscapedNewline];

/// Statement terminators. Interchangeable.
const TERMINATORS: &[TokenKind] = &[TokenKind::Nl, TokenKind::Semicolon];

/// Lookahead kinds that end a program.
const PROGRAM_END: &[TokenKind] = &[
    TokenKind::RCurly,
    TokenKind::RBracket,
    TokenKind::RParen,
    TokenKind::Eof,
];

/// Raku parser.
///
/// Wraps one token source and holds a single lookahead token. A parser
/// is good for one source text; build a new one per parse.
pub struct Parser<S = Scanner> {
    source: S,
    token: Token,
    /// Blocks currently open, innermost last. Only used for diagnostics.
    open: Vec<Delimiter>,
}

impl Parser<Scanner> {
    /// Parse source text into a tree whose root wraps one `program`.
    pub fn parse(source: &str) -> Result<Tree, ParseError> {
        let _span = tracing::debug_span!("parse", chars = source.len()).entered();
        let result = Parser::new(Scanner::new(source)).and_then(Parser::parse_raku);
        match &result {
            Ok(tree) => {
                let statements = tree.program().map_or(0, |p| tree.children(p).len());
                debug!(statements, nodes = tree.len(), "parsed");
            }
            Err(e) => debug!(error = %e, "parse failed"),
        }
        result
    }
}

impl<S: TokenSource> Parser<S> {
    /// Create a parser and pull the first lookahead token.
    pub fn new(source: S) -> Result<Self, ParseError> {
        let mut parser = Self {
            source,
            token: Token::new(TokenKind::Eof, Span::new(0, 0, 1, 1)),
            open: Vec::new(),
        };
        parser.advance()?;
        Ok(parser)
    }

    /// The current lookahead token.
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Parse a whole program followed by end of input.
    pub fn parse_raku(mut self) -> Result<Tree, ParseError> {
        let span = self.token.span;
        let program = self.parse_program()?;
        self.expect(&[TokenKind::Eof])?;

        let mut root = Draft::new(NodeKind::Root, None, span);
        root.push(program);
        Ok(Tree::from_draft(root))
    }

    // =========================================================================
    // Token handling
    // =========================================================================

    /// Pull the next significant token into the lookahead.
    fn advance(&mut self) -> Result<&Token, ParseError> {
        self.token = self.source.lex_skip(IGNORE);
        trace!(
            kind = %self.token.kind,
            line = self.token.span.line,
            column = self.token.span.column,
            "token"
        );
        if self.token.is_fail() {
            return Err(ParseError::lex(&self.token));
        }
        Ok(&self.token)
    }

    /// The lookahead, if its kind is one of `kinds`.
    fn have(&self, kinds: &[TokenKind]) -> Option<&Token> {
        kinds.contains(&self.token.kind).then_some(&self.token)
    }

    /// Turn the lookahead into a leaf node and advance, if its kind matches.
    fn accept(&mut self, kinds: &[TokenKind]) -> Result<Option<Draft>, ParseError> {
        if self.have(kinds).is_none() {
            return Ok(None);
        }
        let node = Draft::leaf(&self.token);
        self.advance()?;
        Ok(Some(node))
    }

    fn expect(&mut self, kinds: &[TokenKind]) -> Result<Draft, ParseError> {
        match self.accept(kinds)? {
            Some(node) => Ok(node),
            None => Err(self.error(expected_message(kinds), kinds.to_vec())),
        }
    }

    fn give_up(&self, message: &str) -> ParseError {
        self.error(message.to_string(), Vec::new())
    }

    fn error(&self, message: String, expected: Vec<TokenKind>) -> ParseError {
        ParseError::Syntax {
            message,
            found: self.token.kind,
            expected,
            line: self.token.span.line,
            column: self.token.span.column,
        }
    }

    // =========================================================================
    // Grammar rules
    // =========================================================================

    fn parse_value(&mut self) -> Result<Option<Draft>, ParseError> {
        self.accept(VALUE_KINDS)
    }

    fn parse_nl(&mut self) -> Result<Option<Draft>, ParseError> {
        self.accept(TERMINATORS)
    }

    /// A block in one delimiter style. The nested program's statements are
    /// spliced straight into the block; no program node is kept.
    fn parse_block_in(&mut self, delim: Delimiter) -> Result<Option<Draft>, ParseError> {
        let Some(open) = self.accept(&[delim.open_kind()])? else {
            return Ok(None);
        };
        let mut block = Draft::new(NodeKind::Block(delim), None, open.span);

        self.open.push(delim);
        let program = self.parse_program()?;
        self.open.pop();
        block.children.extend(program.children);

        let close = self.expect(&[delim.close_kind()])?;
        block.span.end = close.span.end;
        Ok(Some(block))
    }

    fn parse_block(&mut self) -> Result<Option<Draft>, ParseError> {
        for delim in Delimiter::ALL {
            if let Some(block) = self.parse_block_in(delim)? {
                return Ok(Some(block));
            }
        }
        Ok(None)
    }

    fn parse_parameter(&mut self) -> Result<Draft, ParseError> {
        if let Some(value) = self.parse_value()? {
            return Ok(value);
        }
        if let Some(block) = self.parse_block()? {
            return Ok(block);
        }
        Err(self.give_up("parameter expected"))
    }

    /// Parameters up to a terminator. End of input is not a terminator.
    fn parse_paramlist(&mut self) -> Result<Draft, ParseError> {
        let mut list = Draft::new(NodeKind::Paramlist, None, self.token.span);
        while self.have(TERMINATORS).is_none() {
            if self.have(&[TokenKind::Eof]).is_some() {
                return Err(self.unexpected_eof());
            }
            let param = self.parse_parameter()?;
            list.push(param);
        }
        Ok(list)
    }

    /// End of input inside a paramlist. Inside a block, the missing closer
    /// is reported alongside the missing terminator.
    fn unexpected_eof(&self) -> ParseError {
        let mut expected = TERMINATORS.to_vec();
        let message = match self.open.last() {
            Some(delim) => {
                expected.push(delim.close_kind());
                format!(
                    "Unexpected end of file, unclosed {} (expected {})",
                    delim.open_kind(),
                    delim.close_kind()
                )
            }
            None => "Unexpected end of file".to_string(),
        };
        self.error(message, expected)
    }

    fn parse_blank(&mut self) -> Result<Option<Draft>, ParseError> {
        Ok(self
            .parse_nl()?
            .map(|nl| Draft::new(NodeKind::Blank, None, nl.span)))
    }

    fn parse_expression(&mut self) -> Result<Option<Draft>, ParseError> {
        let Some(value) = self.parse_value()? else {
            return Ok(None);
        };
        let mut expression = Draft::new(NodeKind::Expression, None, value.span);
        expression.push(value);
        let params = self.parse_paramlist()?;
        expression.push(params);
        self.expect(TERMINATORS)?;
        Ok(Some(expression))
    }

    fn parse_statement(&mut self) -> Result<Draft, ParseError> {
        if let Some(expression) = self.parse_expression()? {
            return Ok(expression);
        }
        if let Some(block) = self.parse_block()? {
            return Ok(block);
        }
        if let Some(blank) = self.parse_blank()? {
            return Ok(blank);
        }
        if let Some(comment) = self.accept(&[TokenKind::Comment])? {
            return Ok(comment);
        }
        Err(self.give_up("could not parse statement"))
    }

    /// Statements up to a closing delimiter or end of input. Blank lines
    /// are consumed but not kept.
    fn parse_program(&mut self) -> Result<Draft, ParseError> {
        let mut program = Draft::new(NodeKind::Program, None, self.token.span);
        while self.have(PROGRAM_END).is_none() {
            let statement = self.parse_statement()?;
            if statement.kind != NodeKind::Blank {
                program.push(statement);
            }
        }
        Ok(program)
    }
}

fn expected_message(kinds: &[TokenKind]) -> String {
    let names: Vec<&str> = kinds.iter().map(|k| k.name()).collect();
    match names.as_slice() {
        [one] => format!("Expected {one}"),
        _ => format!("Expected one of {}", names.join(", ")),
    }
}
