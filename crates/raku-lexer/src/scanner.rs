use crate::token::{Span, Token, TokenKind, Value};
use crate::LexerError;

/// Raku source scanner.
///
/// Produces tokens lazily, one per call, so a parser can pull exactly as
/// much lookahead as it needs. Malformed input never aborts the scanner:
/// it is reported as a `Fail` token carrying the reason, and the caller
/// decides what to do with it.
///
/// - `Vec<char>` source for index-based navigation
/// - Position tracking on every token
/// - Skip sets so trivia can be filtered at the call site
pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    start: usize,
    start_line: usize,
    start_column: usize,
}

impl Scanner {
    /// Create a new scanner for the given source.
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            start: 0,
            start_line: 1,
            start_column: 1,
        }
    }

    /// Tokenize the entire source into a vector of tokens, trivia included.
    ///
    /// The last token is always `Eof`. The first `Fail` token is turned
    /// into a `LexerError`.
    pub fn tokenize(source: &str) -> Result<Vec<Token>, LexerError> {
        let mut scanner = Scanner::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = scanner.next_token();
            if token.is_fail() {
                return Err(LexerError::from_token(&token));
            }
            let at_end = token.kind == TokenKind::Eof;
            tokens.push(token);
            if at_end {
                return Ok(tokens);
            }
        }
    }

    /// Return the next token whose kind is not in `skip`.
    ///
    /// `Eof` and `Fail` are always returned, even if listed.
    pub fn lex_skip(&mut self, skip: &[TokenKind]) -> Token {
        loop {
            let token = self.next_token();
            if matches!(token.kind, TokenKind::Eof | TokenKind::Fail)
                || !skip.contains(&token.kind)
            {
                return token;
            }
        }
    }

    /// Scan the next token of any kind. Returns `Eof` forever once the
    /// input is exhausted.
    pub fn next_token(&mut self) -> Token {
        self.mark();

        if self.is_at_end() {
            return self.make(TokenKind::Eof);
        }

        let ch = self.peek();

        match ch {
            ' ' | '\t' => {
                while matches!(self.peek(), ' ' | '\t') {
                    self.advance();
                }
                self.make(TokenKind::Whitespace)
            }

            // Newlines (`\r\n` counts as one)
            '\n' => self.single(TokenKind::Nl),
            '\r' => {
                self.advance();
                if self.peek() == '\n' {
                    self.advance();
                }
                self.make(TokenKind::Nl)
            }

            '\\' => self.scan_escaped_newline(),

            // Punctuation
            ';' => self.single(TokenKind::Semicolon),
            ':' => self.single(TokenKind::Colon),
            ',' => self.single(TokenKind::Comma),
            '.' => self.single(TokenKind::Period),

            // Delimiters
            '{' => self.single(TokenKind::LCurly),
            '}' => self.single(TokenKind::RCurly),
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),

            '#' => self.scan_comment(),

            '"' | '\'' => self.scan_string(),

            '0'..='9' => self.scan_number(),
            '+' | '-' if self.peek_next().is_ascii_digit() => self.scan_number(),

            c if c.is_alphabetic() || c == '_' => self.scan_symbol(),

            c if is_operator_char(c) => {
                while is_operator_char(self.peek()) {
                    self.advance();
                }
                let text = self.lexeme();
                self.make_value(TokenKind::Operator, Value::Text(text))
            }

            _ => {
                self.advance();
                self.fail(format!("Unexpected character: '{ch}'"))
            }
        }
    }

    // --- Scanners ---

    /// A backslash is only meaningful as a line continuation.
    fn scan_escaped_newline(&mut self) -> Token {
        self.advance(); // consume backslash
        match self.peek() {
            '\n' => {
                self.advance();
                self.make(TokenKind::EscapedNewline)
            }
            '\r' => {
                self.advance();
                if self.peek() == '\n' {
                    self.advance();
                }
                self.make(TokenKind::EscapedNewline)
            }
            _ => self.fail("Stray backslash outside of a string".into()),
        }
    }

    /// Scan a `#` comment up to (not including) the end of the line.
    fn scan_comment(&mut self) -> Token {
        self.advance(); // consume `#`

        let mut content = String::new();
        while !self.is_at_end() && !matches!(self.peek(), '\n' | '\r') {
            content.push(self.peek());
            self.advance();
        }

        self.make_value(TokenKind::Comment, Value::Text(content.trim().to_string()))
    }

    /// Scan a string literal. Strings may span lines.
    fn scan_string(&mut self) -> Token {
        let quote = self.peek();
        self.advance(); // consume opening quote

        let mut value = String::new();

        while !self.is_at_end() && self.peek() != quote {
            if self.peek() == '\\' {
                let (line, column) = (self.line, self.column);
                self.advance(); // consume backslash
                if self.is_at_end() {
                    return self.fail_at("Unterminated escape sequence".into(), line, column);
                }
                match self.peek() {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    'r' => value.push('\r'),
                    '0' => value.push('\0'),
                    '\\' => value.push('\\'),
                    '"' => value.push('"'),
                    '\'' => value.push('\''),
                    c => {
                        self.advance();
                        return self.fail_at(format!("Unknown escape sequence: '\\{c}'"), line, column);
                    }
                }
                self.advance();
            } else {
                value.push(self.peek());
                self.advance();
            }
        }

        if self.is_at_end() {
            return self.fail("Unterminated string".into());
        }

        self.advance(); // consume closing quote

        self.make_value(TokenKind::String, Value::Text(value))
    }

    /// Scan a symbol. Hyphens are allowed when followed by an alphanumeric
    /// (`max-width`, `layer-2`), and `?` / `!` may appear after the first char.
    fn scan_symbol(&mut self) -> Token {
        self.advance();

        while self.peek().is_alphanumeric()
            || matches!(self.peek(), '_' | '?' | '!')
            || (self.peek() == '-' && self.peek_next().is_alphanumeric())
        {
            self.advance();
        }

        let text = self.lexeme();
        self.make_value(TokenKind::Symbol, Value::Text(text))
    }

    /// Scan a number literal: decimal or `0x` integer, or a float with a
    /// fraction and/or exponent. A leading sign is part of the literal.
    fn scan_number(&mut self) -> Token {
        let mut text = String::new();
        if matches!(self.peek(), '+' | '-') {
            text.push(self.peek());
            self.advance();
        }

        if self.peek() == '0' && matches!(self.peek_next(), 'x' | 'X') {
            self.advance();
            self.advance();
            let digits = self.take_while(|c| c.is_ascii_hexdigit());
            if digits.is_empty() || self.at_word_char() {
                return self.malformed_number();
            }
            text.push_str(&digits);
            return match i64::from_str_radix(&text, 16) {
                Ok(n) => self.make_value(TokenKind::Integer, Value::Integer(n)),
                Err(_) => self.fail(format!("Integer out of range: '{}'", self.lexeme())),
            };
        }

        text.push_str(&self.take_while(|c| c.is_ascii_digit()));
        let mut is_float = false;

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            is_float = true;
            text.push('.');
            self.advance();
            text.push_str(&self.take_while(|c| c.is_ascii_digit()));
        }

        if matches!(self.peek(), 'e' | 'E') {
            let signed = matches!(self.peek_next(), '+' | '-') && self.peek_at(2).is_ascii_digit();
            if self.peek_next().is_ascii_digit() || signed {
                is_float = true;
                text.push('e');
                self.advance();
                if signed {
                    text.push(self.peek());
                    self.advance();
                }
                text.push_str(&self.take_while(|c| c.is_ascii_digit()));
            }
        }

        if self.at_word_char() {
            return self.malformed_number();
        }

        if is_float {
            match text.parse::<f64>() {
                Ok(n) if n.is_finite() => self.make_value(TokenKind::Float, Value::Float(n)),
                _ => self.fail(format!("Float out of range: '{text}'")),
            }
        } else {
            match text.parse::<i64>() {
                Ok(n) => self.make_value(TokenKind::Integer, Value::Integer(n)),
                Err(_) => self.fail(format!("Integer out of range: '{text}'")),
            }
        }
    }

    /// Consume the rest of a word glued to a number and report it.
    fn malformed_number(&mut self) -> Token {
        while self.at_word_char() {
            self.advance();
        }
        self.fail(format!("Invalid number: '{}'", self.lexeme()))
    }

    // --- Helpers ---

    fn mark(&mut self) {
        self.start = self.pos;
        self.start_line = self.line;
        self.start_column = self.column;
    }

    fn span(&self) -> Span {
        Span::new(self.start, self.pos, self.start_line, self.start_column)
    }

    fn make(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.span())
    }

    fn make_value(&self, kind: TokenKind, value: Value) -> Token {
        Token::with_value(kind, value, self.span())
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        self.advance();
        self.make(kind)
    }

    fn fail(&self, message: String) -> Token {
        self.make_value(TokenKind::Fail, Value::Text(message))
    }

    fn fail_at(&self, message: String, line: usize, column: usize) -> Token {
        let span = Span::new(self.start, self.pos, line, column);
        Token::with_value(TokenKind::Fail, Value::Text(message), span)
    }

    fn lexeme(&self) -> String {
        self.chars[self.start..self.pos].iter().collect()
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while !self.is_at_end() && pred(self.peek()) {
            out.push(self.peek());
            self.advance();
        }
        out
    }

    fn at_word_char(&self) -> bool {
        self.peek().is_alphanumeric() || self.peek() == '_'
    }

    fn peek(&self) -> char {
        self.peek_at(0)
    }

    fn peek_next(&self) -> char {
        self.peek_at(1)
    }

    fn peek_at(&self, offset: usize) -> char {
        self.chars.get(self.pos + offset).copied().unwrap_or('\0')
    }

    /// Advance one char, keeping line/column in step. A lone `\r` counts as
    /// a line break; the `\r` of `\r\n` does not.
    fn advance(&mut self) {
        if self.is_at_end() {
            return;
        }
        let ch = self.chars[self.pos];
        self.pos += 1;
        if ch == '\n' || (ch == '\r' && self.peek() != '\n') {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }
}

fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        '+' | '-' | '*' | '/' | '%' | '=' | '<' | '>' | '!' | '&' | '|' | '^' | '~' | '@' | '$' | '?'
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Helper: scan everything except whitespace and return token kinds.
    fn kinds(source: &str) -> Vec<TokenKind> {
        tokens(source).into_iter().map(|t| t.kind).collect()
    }

    /// Helper: scan everything except whitespace, up to and including EOF or a failure.
    fn tokens(source: &str) -> Vec<Token> {
        let mut scanner = Scanner::new(source);
        let mut out = Vec::new();
        loop {
            let token = scanner.lex_skip(&[TokenKind::Whitespace]);
            let done = matches!(token.kind, TokenKind::Eof | TokenKind::Fail);
            out.push(token);
            if done {
                return out;
            }
        }
    }

    /// Helper: the single value token in `source`.
    fn value(source: &str) -> Value {
        let toks = tokens(source);
        assert_eq!(toks.len(), 2, "expected one token plus EOF in {toks:?}");
        toks[0].value.clone().unwrap()
    }

    fn fail_message(source: &str) -> String {
        let toks = tokens(source);
        let last = toks.last().unwrap();
        assert_eq!(last.kind, TokenKind::Fail, "no failure in {toks:?}");
        last.fail_message().unwrap().to_string()
    }

    // =========================================================================
    // Structure: empty, newlines, EOF
    // =========================================================================

    #[test]
    fn test_empty_source() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_eof_repeats() {
        let mut scanner = Scanner::new("a");
        assert_eq!(scanner.next_token().kind, TokenKind::Symbol);
        assert_eq!(scanner.next_token().kind, TokenKind::Eof);
        assert_eq!(scanner.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn test_multiple_newlines() {
        assert_eq!(
            kinds("\n\n\n"),
            vec![TokenKind::Nl, TokenKind::Nl, TokenKind::Nl, TokenKind::Eof]
        );
    }

    #[test]
    fn test_windows_line_endings() {
        assert_eq!(kinds("\r\n"), vec![TokenKind::Nl, TokenKind::Eof]);
    }

    #[test]
    fn test_carriage_return_only() {
        let toks = tokens("\ra");
        assert_eq!(toks[0].kind, TokenKind::Nl);
        assert_eq!(toks[1].span.line, 2);
        assert_eq!(toks[1].span.column, 1);
    }

    #[test]
    fn test_semicolon() {
        assert_eq!(
            kinds("a;b"),
            vec![
                TokenKind::Symbol,
                TokenKind::Semicolon,
                TokenKind::Symbol,
                TokenKind::Eof,
            ]
        );
    }

    // =========================================================================
    // Trivia and skip sets
    // =========================================================================

    #[test]
    fn test_whitespace_is_one_token() {
        let toks = Scanner::tokenize("a \t b").unwrap();
        let k: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            k,
            vec![
                TokenKind::Symbol,
                TokenKind::Whitespace,
                TokenKind::Symbol,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_escaped_newline() {
        let toks = Scanner::tokenize("a \\\n b").unwrap();
        let k: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            k,
            vec![
                TokenKind::Symbol,
                TokenKind::Whitespace,
                TokenKind::EscapedNewline,
                TokenKind::Whitespace,
                TokenKind::Symbol,
                TokenKind::Eof,
            ]
        );
        assert_eq!(toks[4].span.line, 2);
    }

    #[test]
    fn test_escaped_crlf() {
        assert_eq!(
            kinds("\\\r\n"),
            vec![TokenKind::EscapedNewline, TokenKind::Eof]
        );
    }

    #[test]
    fn test_lex_skip_filters_trivia() {
        let mut scanner = Scanner::new("a \\\n b\n");
        let skip = [TokenKind::Whitespace, TokenKind::EscapedNewline];
        assert_eq!(scanner.lex_skip(&skip).kind, TokenKind::Symbol);
        assert_eq!(scanner.lex_skip(&skip).kind, TokenKind::Symbol);
        assert_eq!(scanner.lex_skip(&skip).kind, TokenKind::Nl);
        assert_eq!(scanner.lex_skip(&skip).kind, TokenKind::Eof);
    }

    #[test]
    fn test_lex_skip_never_skips_eof() {
        let mut scanner = Scanner::new("  ");
        let token = scanner.lex_skip(&[TokenKind::Whitespace, TokenKind::Eof]);
        assert_eq!(token.kind, TokenKind::Eof);
    }

    #[test]
    fn test_stray_backslash() {
        assert!(fail_message("a \\ b").contains("Stray backslash"));
    }

    // =========================================================================
    // Comments
    // =========================================================================

    #[test]
    fn test_line_comment() {
        let toks = tokens("# a comment\nfoo");
        assert_eq!(toks[0].kind, TokenKind::Comment);
        assert_eq!(toks[0].value, Some(Value::Text("a comment".into())));
        assert_eq!(toks[1].kind, TokenKind::Nl);
        assert_eq!(toks[2].kind, TokenKind::Symbol);
    }

    #[test]
    fn test_empty_comment() {
        assert_eq!(value("#"), Value::Text(String::new()));
    }

    // =========================================================================
    // Symbols and operators
    // =========================================================================

    #[test]
    fn test_simple_symbol() {
        assert_eq!(value("map"), Value::Text("map".into()));
    }

    #[test]
    fn test_hyphenated_symbol() {
        assert_eq!(value("max-width"), Value::Text("max-width".into()));
    }

    #[test]
    fn test_symbol_with_suffixes() {
        assert_eq!(value("empty?"), Value::Text("empty?".into()));
        assert_eq!(value("save!"), Value::Text("save!".into()));
        assert_eq!(value("_layer2"), Value::Text("_layer2".into()));
    }

    #[test]
    fn test_trailing_hyphen_is_operator() {
        assert_eq!(
            kinds("a-"),
            vec![TokenKind::Symbol, TokenKind::Operator, TokenKind::Eof]
        );
    }

    #[test]
    fn test_operator_run() {
        assert_eq!(value("<="), Value::Text("<=".into()));
        assert_eq!(value("+"), Value::Text("+".into()));
    }

    #[test]
    fn test_minus_spaced_is_operator() {
        let toks = tokens("x - 5");
        assert_eq!(toks[1].kind, TokenKind::Operator);
        assert_eq!(toks[2].value, Some(Value::Integer(5)));
    }

    #[test]
    fn test_punctuation_values() {
        assert_eq!(
            kinds("a:b,c.d"),
            vec![
                TokenKind::Symbol,
                TokenKind::Colon,
                TokenKind::Symbol,
                TokenKind::Comma,
                TokenKind::Symbol,
                TokenKind::Period,
                TokenKind::Symbol,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(
            kinds("{}()[]"),
            vec![
                TokenKind::LCurly,
                TokenKind::RCurly,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::Eof,
            ]
        );
    }

    // =========================================================================
    // Numbers
    // =========================================================================

    #[test]
    fn test_integer() {
        assert_eq!(value("42"), Value::Integer(42));
    }

    #[test]
    fn test_signed_integers() {
        assert_eq!(value("-7"), Value::Integer(-7));
        assert_eq!(value("+7"), Value::Integer(7));
    }

    #[test]
    fn test_hex_integer() {
        assert_eq!(value("0x1F"), Value::Integer(31));
        assert_eq!(value("-0x10"), Value::Integer(-16));
    }

    #[test]
    fn test_float() {
        assert_eq!(value("3.25"), Value::Float(3.25));
        assert_eq!(value("1e3"), Value::Float(1000.0));
        assert_eq!(value("2.5E-1"), Value::Float(0.25));
    }

    #[test]
    fn test_integer_then_period() {
        assert_eq!(
            kinds("1."),
            vec![TokenKind::Integer, TokenKind::Period, TokenKind::Eof]
        );
    }

    #[test]
    fn test_number_glued_to_letters_fails() {
        assert_eq!(fail_message("12abc"), "Invalid number: '12abc'");
        assert!(fail_message("0xZZ").contains("Invalid number"));
    }

    #[test]
    fn test_integer_overflow_fails() {
        assert!(fail_message("99999999999999999999").contains("out of range"));
    }

    #[test]
    fn test_float_overflow_fails() {
        assert!(fail_message("1e999").contains("out of range"));
    }

    // =========================================================================
    // Strings
    // =========================================================================

    #[test]
    fn test_double_quoted_string() {
        assert_eq!(value("\"world map\""), Value::Text("world map".into()));
    }

    #[test]
    fn test_single_quoted_string() {
        assert_eq!(value("'hello'"), Value::Text("hello".into()));
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(value("\"\""), Value::Text(String::new()));
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            value("\"a\\nb\\t\\\"c\\\"\\\\\""),
            Value::Text("a\nb\t\"c\"\\".into())
        );
    }

    #[test]
    fn test_multiline_string_tracks_lines() {
        let toks = tokens("\"a\nb\" c");
        assert_eq!(toks[0].value, Some(Value::Text("a\nb".into())));
        assert_eq!(toks[1].span.line, 2);
        assert_eq!(toks[1].span.column, 4);
    }

    #[test]
    fn test_string_unterminated() {
        let toks = tokens("  \"hello");
        let fail = toks.last().unwrap();
        assert_eq!(fail.fail_message(), Some("Unterminated string"));
        assert_eq!(fail.span.column, 3);
    }

    #[test]
    fn test_unknown_escape_fails_at_backslash() {
        let toks = tokens("\"ab\\q\"");
        let fail = toks.last().unwrap();
        assert_eq!(fail.fail_message(), Some("Unknown escape sequence: '\\q'"));
        assert_eq!(fail.span.column, 4);
    }

    // =========================================================================
    // Failures and positions
    // =========================================================================

    #[test]
    fn test_unexpected_character() {
        assert_eq!(fail_message("a `"), "Unexpected character: '`'");
    }

    #[test]
    fn test_tokenize_reports_lexer_error() {
        let err = Scanner::tokenize("ok\n  `").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 3);
        assert!(err.message.contains("Unexpected character"));
    }

    #[test]
    fn test_span_line_column() {
        let toks = tokens("map test {\n  name \"world\"\n}");
        let name = &toks[4];
        assert_eq!(name.value, Some(Value::Text("name".into())));
        assert_eq!(name.span.line, 2);
        assert_eq!(name.span.column, 3);
        assert_eq!(name.span.start, 13);
        assert_eq!(name.span.end, 17);
    }

    #[test]
    fn test_map_example() {
        assert_eq!(
            kinds("layer {\n  z 1\n  data { 0 10 }\n}\n"),
            vec![
                TokenKind::Symbol,
                TokenKind::LCurly,
                TokenKind::Nl,
                TokenKind::Symbol,
                TokenKind::Integer,
                TokenKind::Nl,
                TokenKind::Symbol,
                TokenKind::LCurly,
                TokenKind::Integer,
                TokenKind::Integer,
                TokenKind::RCurly,
                TokenKind::Nl,
                TokenKind::RCurly,
                TokenKind::Nl,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_display_names() {
        assert_eq!(TokenKind::Nl.to_string(), "nl");
        assert_eq!(TokenKind::LCurly.to_string(), "lcurly");
        assert_eq!(TokenKind::EscapedNewline.to_string(), "esc_nl");
    }

    #[test]
    fn test_float_display_keeps_point() {
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
        assert_eq!(Value::Float(0.25).to_string(), "0.25");
    }
}
