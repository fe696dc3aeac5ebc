//! Line-buffered lexer built on winnow's stream primitives.
//!
//! The lexer pulls one line at a time from a [`LineFeeder`] and scans it with a
//! character-class dispatch on the leading character of each token. Triple-quoted
//! literals that run past the end of the line pull continuation lines on demand.
//!
//! Escape sequences are validated while scanning but only decoded when the token
//! is emitted, and only for tokens that contained one.

use std::io::Read;
use std::sync::Arc;

use winnow::stream::{Location, Stream};
use winnow::token::take_while;
use winnow::{LocatingSlice, ModalResult, Parser};

use super::chars::*;
use super::token::{Token, TokenKind};
use crate::error::{DecodeError, Result};
use crate::feeder::LineFeeder;
use crate::iri;

/// Input type for the scanner - tracks offsets into the line buffer.
pub type Input<'a> = LocatingSlice<&'a str>;

/// Grammar subset recognised by the lexer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dialect {
    /// Full Turtle token set.
    Turtle,
    /// N-Triples / N-Quads: IRIs, blank node labels, double-quoted literals,
    /// language tags, `^^` and `.` only.
    NTriples,
}

/// Last position handed out, so column counting resumes where it stopped.
#[derive(Clone, Copy, Debug)]
struct Mark {
    offset: usize,
    line: usize,
    column: usize,
}

impl Mark {
    fn start(line: usize) -> Self {
        Self {
            offset: 0,
            line,
            column: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LineState {
    NeedLine,
    Scanning,
    Exhausted,
}

/// Lexer over a byte stream.
pub struct Lexer<R> {
    feeder: LineFeeder<R>,
    dialect: Dialect,
    /// Current line, plus any continuation lines of an open long literal
    buffer: String,
    /// Byte offset of the next token in `buffer`
    pos: usize,
    /// Line number of the first line in `buffer`
    first_line: usize,
    mark: Mark,
    state: LineState,
    /// Whether the previous token was a string literal (`@` is then a language tag)
    after_literal: bool,
    pushed_back: Option<Token>,
    iter_done: bool,
}

impl<R: Read> Lexer<R> {
    /// Create a new lexer reading from `reader`.
    pub fn new(reader: R, dialect: Dialect) -> Self {
        Self {
            feeder: LineFeeder::new(reader),
            dialect,
            buffer: String::new(),
            pos: 0,
            first_line: 0,
            mark: Mark::start(0),
            state: LineState::NeedLine,
            after_literal: false,
            pushed_back: None,
            iter_done: false,
        }
    }

    /// Number of physical lines read so far.
    pub fn line(&self) -> usize {
        self.feeder.line()
    }

    /// Consume and return the next token.
    ///
    /// Every line yields its tokens followed by one `EndOfLine` token; the end of
    /// input yields `Eof`, and keeps yielding it. A lexical error abandons the
    /// rest of the line.
    pub fn next_token(&mut self) -> Result<Token> {
        if let Some(token) = self.pushed_back.take() {
            return Ok(token);
        }

        loop {
            match self.state {
                LineState::Exhausted => {
                    return Ok(Token::new(TokenKind::Eof, self.feeder.line() + 1, 1));
                }
                LineState::NeedLine => match self.feeder.next_line()? {
                    Some(line) => {
                        self.buffer = line.text;
                        self.first_line = line.number;
                        self.mark = Mark::start(line.number);
                        self.pos = 0;
                        self.state = LineState::Scanning;
                    }
                    None => self.state = LineState::Exhausted,
                },
                LineState::Scanning => return self.scan_next(),
            }
        }
    }

    /// Return a token to the lexer; the next call to `next_token` yields it again.
    pub fn push_back(&mut self, token: Token) {
        debug_assert!(self.pushed_back.is_none(), "push-back slot already used");
        self.pushed_back = Some(token);
    }

    /// Abandon the rest of the current line.
    pub fn skip_line(&mut self) {
        match self.pushed_back.take() {
            Some(token) if token.is_eof() => self.pushed_back = Some(token),
            _ => {}
        }
        if self.state == LineState::Scanning {
            self.state = LineState::NeedLine;
        }
        self.after_literal = false;
    }

    fn scan_next(&mut self) -> Result<Token> {
        loop {
            let mut scanner = Scanner::new(&self.buffer, self.pos, self.dialect, self.after_literal);
            scanner.skip_ws();
            let start = scanner.offset();

            if scanner.at_line_end() {
                let (line, column) = self.position_of(start);
                self.state = LineState::NeedLine;
                return Ok(Token::new(TokenKind::EndOfLine, line, column));
            }

            match scanner.scan_token() {
                Ok(kind) => {
                    let end = scanner.offset();
                    let (line, column) = self.position_of(start);
                    self.pos = end;
                    self.after_literal = matches!(kind, TokenKind::String(_));
                    return Ok(Token::new(kind, line, column));
                }
                Err(ScanError::Incomplete) => match self.feeder.next_continuation()? {
                    Some(next) => {
                        tracing::trace!(line = next.number, "continuing long literal");
                        self.buffer.push('\n');
                        self.buffer.push_str(&next.text);
                    }
                    None => {
                        let (line, column) = self.position_of(start);
                        self.state = LineState::NeedLine;
                        self.after_literal = false;
                        return Err(DecodeError::syntax(
                            line,
                            column,
                            "unterminated long literal",
                        ));
                    }
                },
                Err(ScanError::Invalid { offset, message }) => {
                    let (line, column) = self.position_of(offset);
                    self.state = LineState::NeedLine;
                    self.after_literal = false;
                    return Err(DecodeError::syntax(line, column, message));
                }
            }
        }
    }

    /// Convert a byte offset in the buffer to (line, column), 1-indexed.
    ///
    /// Offsets arrive in increasing order within a buffer, so counting picks up
    /// from the previous mark.
    fn position_of(&mut self, offset: usize) -> (usize, usize) {
        if offset < self.mark.offset {
            self.mark = Mark::start(self.first_line);
        }
        for c in self.buffer[self.mark.offset..offset].chars() {
            if c == '\n' {
                self.mark.line += 1;
                self.mark.column = 1;
            } else {
                self.mark.column += 1;
            }
        }
        self.mark.offset = offset;
        (self.mark.line, self.mark.column)
    }
}

impl<R: Read> Iterator for Lexer<R> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.iter_done {
            return None;
        }
        let token = self.next_token();
        if matches!(&token, Ok(t) if t.is_eof()) {
            self.iter_done = true;
        }
        Some(token)
    }
}

/// Tokenize a whole document held in memory.
///
/// Returns an error immediately on the first invalid token.
pub fn tokenize(input: &str, dialect: Dialect) -> Result<Vec<Token>> {
    Lexer::new(input.as_bytes(), dialect).collect()
}

// =============================================================================
// Scanner
// =============================================================================

enum ScanError {
    /// A long literal is still open at the end of the buffer.
    Incomplete,
    Invalid {
        offset: usize,
        message: String,
    },
}

type Scan<T> = std::result::Result<T, ScanError>;

fn invalid_at<T>(offset: usize, message: impl Into<String>) -> Scan<T> {
    Err(ScanError::Invalid {
        offset,
        message: message.into(),
    })
}

fn describe(c: char) -> String {
    if c.is_control() || c.is_whitespace() {
        format!("U+{:04X}", c as u32)
    } else {
        format!("'{}'", c)
    }
}

/// Cursor over one line buffer, starting at a token boundary.
struct Scanner<'a> {
    input: Input<'a>,
    src: &'a str,
    dialect: Dialect,
    after_literal: bool,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str, pos: usize, dialect: Dialect, after_literal: bool) -> Self {
        let mut input = LocatingSlice::new(src);
        let _ = input.next_slice(pos);
        Self {
            input,
            src,
            dialect,
            after_literal,
        }
    }

    fn offset(&self) -> usize {
        self.input.current_token_start()
    }

    fn peek(&self) -> Option<char> {
        self.input.chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.input.chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        self.input.next_token()
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let taken: ModalResult<&'a str> = take_while(0.., pred).parse_next(&mut self.input);
        taken.unwrap_or_default()
    }

    fn eat_hex(&mut self, max: usize) -> &'a str {
        let taken: ModalResult<&'a str> =
            take_while(0..=max, |c: char| c.is_ascii_hexdigit()).parse_next(&mut self.input);
        taken.unwrap_or_default()
    }

    fn invalid<T>(&self, message: impl Into<String>) -> Scan<T> {
        invalid_at(self.offset(), message)
    }

    fn skip_ws(&mut self) {
        self.eat_while(is_ws);
    }

    /// End of buffer, or a comment running to the end of the line.
    fn at_line_end(&self) -> bool {
        matches!(self.peek(), None | Some('#'))
    }

    fn is_turtle(&self) -> bool {
        self.dialect == Dialect::Turtle
    }

    fn punct(&mut self, kind: TokenKind) -> Scan<TokenKind> {
        self.bump();
        Ok(kind)
    }

    /// Dispatch on the leading character.
    fn scan_token(&mut self) -> Scan<TokenKind> {
        let Some(c) = self.peek() else {
            return self.invalid("unexpected end of line");
        };

        match c {
            '<' => self.iri(),
            '_' => self.blank_node_label(),
            '"' => self.literal('"'),
            '@' => self.at_word(),
            '^' => self.double_caret(),
            '.' if self.is_turtle() && self.peek_at(1).is_some_and(|n| n.is_ascii_digit()) => {
                self.number()
            }
            '.' => self.punct(TokenKind::Dot),
            _ if !self.is_turtle() => self.invalid(format!("unexpected character {}", describe(c))),
            '\'' => self.literal('\''),
            '0'..='9' | '+' | '-' => self.number(),
            ',' => self.punct(TokenKind::Comma),
            ';' => self.punct(TokenKind::Semicolon),
            '[' => self.open_bracket(),
            ']' => self.punct(TokenKind::RBracket),
            '(' => self.punct(TokenKind::LParen),
            ')' => self.punct(TokenKind::RParen),
            ':' => self.prefixed_name(self.offset(), ""),
            c if is_pn_chars_base(c) => self.name_or_keyword(),
            c => self.invalid(format!("unexpected character {}", describe(c))),
        }
    }

    // =========================================================================
    // IRIs
    // =========================================================================

    /// Scan an IRI reference: `<...>`
    fn iri(&mut self) -> Scan<TokenKind> {
        let token_start = self.offset();
        self.bump();
        let start = self.offset();
        let mut escaped = false;
        let mut absolute = None;

        loop {
            self.eat_while(is_iri_char);
            match self.peek() {
                Some('>') => break,
                Some('\\') => {
                    // A scheme must appear before the first escape.
                    if absolute.is_none() {
                        absolute = Some(iri::is_absolute(&self.src[start..self.offset()]));
                    }
                    let at = self.offset();
                    let decoded = self.escape(false)?;
                    if !is_iri_char(decoded) {
                        return invalid_at(
                            at,
                            format!("escaped character {} not allowed in IRI", describe(decoded)),
                        );
                    }
                    escaped = true;
                }
                Some(c) => {
                    return self.invalid(format!("character {} not allowed in IRI", describe(c)))
                }
                None => return invalid_at(token_start, "unterminated IRI"),
            }
        }

        let raw = &self.src[start..self.offset()];
        self.bump();
        let absolute = absolute.unwrap_or_else(|| iri::is_absolute(raw));
        Ok(TokenKind::Iri {
            iri: materialize(raw, escaped),
            absolute,
        })
    }

    // =========================================================================
    // Escapes
    // =========================================================================

    /// Validate one escape sequence at the cursor (which sits on the `\`).
    ///
    /// `\uXXXX` and `\UXXXXXXXX` are always allowed; the single-character
    /// escapes only inside literals.
    fn escape(&mut self, in_literal: bool) -> Scan<char> {
        let at = self.offset();
        self.bump();
        match self.bump() {
            Some('u') => self.hex_escape(at, 4),
            Some('U') => self.hex_escape(at, 8),
            Some(c) if in_literal => match echar(c) {
                Some(decoded) => Ok(decoded),
                None => invalid_at(at, format!("disallowed escape character {}", describe(c))),
            },
            Some(c) => invalid_at(
                at,
                format!("disallowed escape character {} in IRI", describe(c)),
            ),
            None => invalid_at(at, "incomplete escape sequence"),
        }
    }

    fn hex_escape(&mut self, at: usize, digits: usize) -> Scan<char> {
        let hex = self.eat_hex(digits);
        if hex.len() != digits {
            return invalid_at(
                at,
                format!("escape sequence requires {} hex digits", digits),
            );
        }
        match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
            Some(c) => Ok(c),
            None => invalid_at(at, format!("escape \\u{} is not a Unicode scalar value", hex)),
        }
    }

    // =========================================================================
    // Literals
    // =========================================================================

    fn starts_with_run(&self, quote: char, n: usize) -> bool {
        self.input.chars().take(n).filter(|&c| c == quote).count() == n
    }

    /// Scan a string literal, single- or triple-quoted.
    fn literal(&mut self, quote: char) -> Scan<TokenKind> {
        let token_start = self.offset();
        let long = self.is_turtle() && self.starts_with_run(quote, 3);
        let delimiter = if long { 3 } else { 1 };
        for _ in 0..delimiter {
            self.bump();
        }

        let start = self.offset();
        let mut escaped = false;

        let end = loop {
            match self.peek() {
                None if long => return Err(ScanError::Incomplete),
                None => return invalid_at(token_start, "unterminated literal"),
                Some('\\') => {
                    self.escape(true)?;
                    escaped = true;
                }
                Some(c) if c == quote => {
                    let end = self.offset();
                    if !long {
                        self.bump();
                        break end;
                    }
                    // Closing delimiter unless the run of quotes continues past it.
                    if self.starts_with_run(quote, 3) && self.peek_at(3) != Some(quote) {
                        for _ in 0..3 {
                            self.bump();
                        }
                        break end;
                    }
                    self.bump();
                }
                Some('\r' | '\n') if !long => {
                    return self.invalid("line break not allowed in short literal");
                }
                Some(_) => {
                    self.eat_while(|c| c != quote && c != '\\' && (long || (c != '\r' && c != '\n')));
                }
            }
        };

        Ok(TokenKind::String(materialize(&self.src[start..end], escaped)))
    }

    /// Scan `@prefix`, `@base`, or a language tag.
    fn at_word(&mut self) -> Scan<TokenKind> {
        let at = self.offset();
        self.bump();
        let word = self.eat_while(|c| c.is_ascii_alphanumeric() || c == '-');

        if self.after_literal {
            return if is_valid_lang_tag(word) {
                Ok(TokenKind::LangTag(Arc::from(word)))
            } else {
                invalid_at(at, format!("invalid language tag '@{}'", word))
            };
        }

        match word {
            "prefix" if self.is_turtle() => Ok(TokenKind::KwPrefix),
            "base" if self.is_turtle() => Ok(TokenKind::KwBase),
            "" => invalid_at(at, "expected a name after '@'"),
            _ if self.is_turtle() => invalid_at(at, format!("unknown directive '@{}'", word)),
            _ => invalid_at(at, "language tag must follow a literal"),
        }
    }

    fn double_caret(&mut self) -> Scan<TokenKind> {
        if self.input.starts_with("^^") {
            self.bump();
            self.bump();
            Ok(TokenKind::DoubleCaret)
        } else {
            self.invalid("expected '^^'")
        }
    }

    // =========================================================================
    // Numbers (Turtle only)
    // =========================================================================

    fn number(&mut self) -> Scan<TokenKind> {
        let start = self.offset();
        if matches!(self.peek(), Some('+' | '-')) {
            self.bump();
        }

        let whole = self.eat_while(|c| c.is_ascii_digit());
        let mut fraction = "";
        let mut kind = NumberKind::Integer;

        if self.peek() == Some('.') {
            match self.peek_at(1) {
                Some(d) if d.is_ascii_digit() => {
                    self.bump();
                    fraction = self.eat_while(|c| c.is_ascii_digit());
                    kind = NumberKind::Decimal;
                }
                // `1.e5` - a mantissa with an empty fraction, only valid before an exponent
                Some('e' | 'E') if !whole.is_empty() && self.has_exponent_at(2) => {
                    self.bump();
                    kind = NumberKind::Decimal;
                }
                _ => {}
            }
        }

        if whole.is_empty() && fraction.is_empty() {
            return invalid_at(start, "invalid numeric literal");
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            if self.eat_while(|c| c.is_ascii_digit()).is_empty() {
                return self.invalid("missing digits in exponent");
            }
            kind = NumberKind::Double;
        }

        match self.peek() {
            Some('.') if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => {
                return self.invalid("second decimal point in numeric literal");
            }
            Some(c) if !is_numeric_terminator(c) => {
                return self.invalid(format!(
                    "invalid character {} in numeric literal",
                    describe(c)
                ));
            }
            _ => {}
        }

        let lexical: Arc<str> = Arc::from(&self.src[start..self.offset()]);
        Ok(match kind {
            NumberKind::Integer => TokenKind::Integer(lexical),
            NumberKind::Decimal => TokenKind::Decimal(lexical),
            NumberKind::Double => TokenKind::Double(lexical),
        })
    }

    /// Whether an exponent (`e`, optional sign, digit) starts `n` chars ahead.
    fn has_exponent_at(&self, n: usize) -> bool {
        let mut rest = self.input.chars().skip(n);
        match rest.next() {
            Some('+' | '-') => rest.next().is_some_and(|c| c.is_ascii_digit()),
            Some(c) => c.is_ascii_digit(),
            None => false,
        }
    }

    // =========================================================================
    // Blank Nodes
    // =========================================================================

    /// Scan a blank node label: `_:name`
    fn blank_node_label(&mut self) -> Scan<TokenKind> {
        let at = self.offset();
        self.bump();
        if self.peek() != Some(':') {
            return invalid_at(at, "expected ':' after '_'");
        }
        self.bump();

        let start = self.offset();
        match self.peek() {
            Some(c) if is_blank_label_start(c) => {
                self.bump();
            }
            Some(c) => {
                return self.invalid(format!(
                    "character {} cannot start a blank node label",
                    describe(c)
                ))
            }
            None => return self.invalid("empty blank node label"),
        }
        self.name_tail(is_pn_chars);

        Ok(TokenKind::BlankNodeLabel(Arc::from(&self.src[start..self.offset()])))
    }

    /// `[` or, when only whitespace separates it from `]`, an anonymous node.
    fn open_bracket(&mut self) -> Scan<TokenKind> {
        self.bump();
        let checkpoint = self.input.checkpoint();
        self.skip_ws();
        if self.peek() == Some(']') {
            self.bump();
            Ok(TokenKind::Anon)
        } else {
            self.input.reset(&checkpoint);
            Ok(TokenKind::LBracket)
        }
    }

    /// Consume name characters; a `.` is taken only when more name follows it.
    fn name_tail(&mut self, is_name_char: fn(char) -> bool) {
        loop {
            self.eat_while(is_name_char);
            if self.peek() == Some('.') && self.peek_at(1).is_some_and(is_name_char) {
                self.bump();
                continue;
            }
            break;
        }
    }

    // =========================================================================
    // Prefixed Names and Keywords (Turtle only)
    // =========================================================================

    /// Scan a word starting with PN_CHARS_BASE: a prefixed name or a keyword.
    fn name_or_keyword(&mut self) -> Scan<TokenKind> {
        let src = self.src;
        let start = self.offset();
        self.bump();
        self.name_tail(is_pn_chars);
        let word = &src[start..self.offset()];

        if self.peek() == Some(':') {
            return self.prefixed_name(start, word);
        }

        match word {
            "a" => Ok(TokenKind::KwA),
            "true" => Ok(TokenKind::KwTrue),
            "false" => Ok(TokenKind::KwFalse),
            w if w.eq_ignore_ascii_case("PREFIX") => Ok(TokenKind::KwSparqlPrefix),
            w if w.eq_ignore_ascii_case("BASE") => Ok(TokenKind::KwSparqlBase),
            _ => invalid_at(start, format!("unknown keyword '{}' (missing ':'?)", word)),
        }
    }

    /// Scan the `:` and local part of a prefixed name whose prefix is `prefix`.
    fn prefixed_name(&mut self, start: usize, prefix: &'a str) -> Scan<TokenKind> {
        debug_assert_eq!(self.peek(), Some(':'));
        self.bump();

        let local_start = self.offset();
        let mut escaped = false;

        let starts_local = self
            .peek()
            .is_some_and(|c| is_pn_local_start(c) || c == '%' || c == '\\');
        if starts_local {
            loop {
                self.eat_while(is_pn_local_char);
                match self.peek() {
                    Some('%') => {
                        let at = self.offset();
                        self.bump();
                        if self.eat_hex(2).len() != 2 {
                            return invalid_at(at, "percent escape requires two hex digits");
                        }
                    }
                    Some('\\') => {
                        let at = self.offset();
                        self.bump();
                        match self.bump() {
                            Some(c) if is_local_escape(c) => escaped = true,
                            Some(c) => {
                                return invalid_at(
                                    at,
                                    format!(
                                        "disallowed escape character {} in local name",
                                        describe(c)
                                    ),
                                )
                            }
                            None => return invalid_at(at, "incomplete escape sequence"),
                        }
                    }
                    // A trailing '.' ends the statement, not the name.
                    Some('.')
                        if self
                            .peek_at(1)
                            .is_some_and(|c| is_pn_local_char(c) || c == '%' || c == '\\') =>
                    {
                        self.bump();
                    }
                    _ => break,
                }
            }
        }

        debug_assert!(local_start > start);
        let local = materialize(&self.src[local_start..self.offset()], escaped);
        Ok(TokenKind::PrefixedName {
            prefix: Arc::from(prefix),
            local,
        })
    }
}

enum NumberKind {
    Integer,
    Decimal,
    Double,
}

/// Decode a single-character escape (ECHAR).
fn echar(c: char) -> Option<char> {
    match c {
        't' => Some('\t'),
        'b' => Some('\x08'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        'f' => Some('\x0C'),
        '"' => Some('"'),
        '\'' => Some('\''),
        '\\' => Some('\\'),
        _ => None,
    }
}

/// ```text
/// LANGTAG ::= '@' [a-zA-Z]+ ('-' [a-zA-Z0-9]+)*
/// ```
fn is_valid_lang_tag(tag: &str) -> bool {
    let mut parts = tag.split('-');
    let primary_ok = parts
        .next()
        .is_some_and(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_alphabetic()));
    primary_ok && parts.all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Produce the token text, decoding escapes only when the scan saw one.
fn materialize(raw: &str, escaped: bool) -> Arc<str> {
    if escaped {
        Arc::from(unescape(raw))
    } else {
        Arc::from(raw)
    }
}

/// Decode already-validated escape sequences.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(u @ ('u' | 'U')) => {
                let digits = if u == 'u' { 4 } else { 8 };
                let hex: String = chars.by_ref().take(digits).collect();
                let decoded = u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                out.push(decoded);
            }
            // Local-name escapes decode to the escaped character itself.
            Some(e) => out.push(echar(e).unwrap_or(e)),
            None => out.push('\\'),
        }
    }
    out
}
