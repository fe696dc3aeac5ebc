//! Turtle decoder.
//!
//! A statement machine over the token stream. Each state reads tokens and
//! names the state to run next; `None` means the statement is complete.
//!
//! ```text
//! Start -> Subject -> Predicate -> Object -> End
//!                        ^           ^        |
//!                        |  ';'      |  ','   |
//!                        +-----------+--------+
//! ```
//!
//! Property lists `[ ... ]` and collections `( ... )` push a frame on the
//! context stack; `]` and `)` pop it. Triples go to a queue as soon as their
//! three terms are known, and [`TurtleDecoder::decode_triple`] hands them out
//! one at a time.

mod context;

use std::collections::{HashMap, VecDeque};
use std::io::Read;
use std::sync::Arc;

use strata_graph_ir::{Datatype, Term, Triple};
use strata_vocab::rdf;

use crate::error::{DecodeError, Result};
use crate::lex::{Dialect, Lexer, Token, TokenKind};
use crate::options::TurtleOptions;
use context::{Frame, FrameKind, ParseContext};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Start,
    Subject,
    Predicate,
    Object,
    End,
}

/// Streaming Turtle decoder.
///
/// ```
/// use strata_graph_text::TurtleDecoder;
///
/// let input = r#"
///     @prefix ex: <http://example.org/> .
///     ex:alice ex:name "Alice" ;
///              ex:knows [ ex:name "Bob" ] .
/// "#;
/// let triples: Vec<_> = TurtleDecoder::new(input.as_bytes())
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(triples.len(), 3);
/// ```
pub struct TurtleDecoder<R> {
    lexer: Lexer<R>,
    ctx: ParseContext,
    queue: VecDeque<Triple>,
    /// A `.` or `]` may stand where a predicate is expected (after `;`, or
    /// after a property list used as subject)
    predicate_optional: bool,
    /// The last token was `;`, so another `;` may follow
    after_semicolon: bool,
    finished: bool,
}

impl<R: Read> TurtleDecoder<R> {
    /// Create a decoder with default options.
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, TurtleOptions::default())
    }

    /// Create a decoder with an initial base IRI, prefixes, or blank node prefix.
    pub fn with_options(reader: R, options: TurtleOptions) -> Self {
        Self {
            lexer: Lexer::new(reader, Dialect::Turtle),
            ctx: ParseContext::new(&options),
            queue: VecDeque::new(),
            predicate_optional: false,
            after_semicolon: false,
            finished: false,
        }
    }

    /// Prefixes declared so far.
    pub fn prefixes(&self) -> &HashMap<String, String> {
        self.ctx.prefixes()
    }

    /// Base IRI currently in effect.
    pub fn base_iri(&self) -> Option<&str> {
        self.ctx.base()
    }

    /// Decode the next triple; `Ok(None)` once the document is exhausted.
    ///
    /// After an error the rest of the statement is discarded. Prefix and base
    /// declarations made before the error stay in effect.
    pub fn decode_triple(&mut self) -> Result<Option<Triple>> {
        loop {
            if let Some(triple) = self.queue.pop_front() {
                tracing::trace!(triple = %triple, "decoded triple");
                return Ok(Some(triple));
            }
            if self.finished {
                return Ok(None);
            }
            if let Err(e) = self.run_statement() {
                self.recover(&e);
                return Err(e);
            }
        }
    }

    fn recover(&mut self, error: &DecodeError) {
        tracing::debug!(error = %error, "rejected statement");
        self.queue.clear();
        self.ctx.clear_stack();
        self.predicate_optional = false;
        self.after_semicolon = false;
        if error.is_fatal() {
            self.finished = true;
        } else {
            self.lexer.skip_line();
        }
    }

    /// Drive the machine through one directive or statement.
    fn run_statement(&mut self) -> Result<()> {
        let mut state = State::Start;
        loop {
            let next = match state {
                State::Start => self.start()?,
                State::Subject => self.subject()?,
                State::Predicate => self.predicate()?,
                State::Object => self.object()?,
                State::End => self.end()?,
            };
            match next {
                Some(s) => state = s,
                None => return Ok(()),
            }
        }
    }

    /// Next significant token. End of input inside a nested frame is fatal.
    fn next(&mut self) -> Result<Token> {
        loop {
            let token = self.lexer.next_token()?;
            match token.kind {
                TokenKind::EndOfLine => continue,
                TokenKind::Eof if self.ctx.is_nested() => return Err(self.ctx.unterminated(&token)),
                _ => return Ok(token),
            }
        }
    }

    // =========================================================================
    // States
    // =========================================================================

    fn start(&mut self) -> Result<Option<State>> {
        let token = self.next()?;
        match token.kind {
            TokenKind::KwPrefix => self.prefix_directive(true)?,
            TokenKind::KwSparqlPrefix => self.prefix_directive(false)?,
            TokenKind::KwBase => self.base_directive(true)?,
            TokenKind::KwSparqlBase => self.base_directive(false)?,
            TokenKind::Eof => self.finished = true,
            _ => {
                self.lexer.push_back(token);
                self.ctx.begin_statement();
                return Ok(Some(State::Subject));
            }
        }
        Ok(None)
    }

    fn subject(&mut self) -> Result<Option<State>> {
        let token = self.next()?;
        let subject = match &token.kind {
            TokenKind::Iri { .. } | TokenKind::PrefixedName { .. } => self.named(&token)?,
            TokenKind::BlankNodeLabel(label) => self.ctx.labeled_blank(label),
            TokenKind::Anon => self.ctx.next_blank(),
            TokenKind::LBracket => {
                let node = self.ctx.next_blank();
                self.ctx.push(Frame::property_list(node));
                return Ok(Some(State::Predicate));
            }
            TokenKind::LParen => match self.open_collection()? {
                Some(cell) => {
                    self.ctx.top_mut(&token)?.subject = Some(cell.clone());
                    self.ctx.push(Frame::collection_cell(cell));
                    return Ok(Some(State::Object));
                }
                None => Term::iri(rdf::NIL),
            },
            _ => return Err(unexpected(&token, "subject")),
        };
        self.ctx.top_mut(&token)?.subject = Some(subject);
        Ok(Some(State::Predicate))
    }

    fn predicate(&mut self) -> Result<Option<State>> {
        let token = self.next()?;
        if self.predicate_optional {
            match token.kind {
                // `;;` is an empty predicate-object pair
                TokenKind::Semicolon if self.after_semicolon => return Ok(Some(State::Predicate)),
                TokenKind::Dot | TokenKind::RBracket => {
                    self.predicate_optional = false;
                    self.after_semicolon = false;
                    self.lexer.push_back(token);
                    return Ok(Some(State::End));
                }
                _ => {}
            }
        }

        let predicate = match &token.kind {
            TokenKind::KwA => Term::iri(rdf::TYPE),
            TokenKind::Iri { .. } | TokenKind::PrefixedName { .. } => self.named(&token)?,
            _ => return Err(unexpected(&token, "predicate")),
        };
        self.predicate_optional = false;
        self.after_semicolon = false;
        self.ctx.top_mut(&token)?.predicate = Some(predicate);
        Ok(Some(State::Object))
    }

    fn object(&mut self) -> Result<Option<State>> {
        let token = self.next()?;
        let object = match &token.kind {
            TokenKind::Iri { .. } | TokenKind::PrefixedName { .. } => self.named(&token)?,
            TokenKind::BlankNodeLabel(label) => self.ctx.labeled_blank(label),
            TokenKind::Anon => self.ctx.next_blank(),
            TokenKind::String(value) => self.literal(value.clone())?,
            TokenKind::Integer(lexical) => Term::typed(lexical, Datatype::xsd_integer()),
            TokenKind::Decimal(lexical) => Term::typed(lexical, Datatype::xsd_decimal()),
            TokenKind::Double(lexical) => Term::typed(lexical, Datatype::xsd_double()),
            TokenKind::KwTrue => Term::boolean(true),
            TokenKind::KwFalse => Term::boolean(false),
            TokenKind::LBracket => {
                let node = self.ctx.next_blank();
                self.emit(node.clone(), &token)?;
                self.ctx.push(Frame::property_list(node));
                return Ok(Some(State::Predicate));
            }
            TokenKind::LParen => match self.open_collection()? {
                Some(cell) => {
                    self.emit(cell.clone(), &token)?;
                    self.ctx.push(Frame::collection_cell(cell));
                    return Ok(Some(State::Object));
                }
                None => Term::iri(rdf::NIL),
            },
            _ => return Err(unexpected(&token, "object")),
        };
        self.emit(object, &token)?;
        Ok(Some(State::End))
    }

    fn end(&mut self) -> Result<Option<State>> {
        let token = self.next()?;
        let kind = self.ctx.top(&token)?.kind;

        if kind == FrameKind::CollectionCell {
            if token.kind == TokenKind::RParen {
                let cell = self.ctx.pop(&token)?;
                self.push_rest(cell.subject, Term::iri(rdf::NIL), &token)?;
                return self.after_close(&token, false);
            }
            // Any other token is the next item: chain a new cell.
            let next_cell = self.ctx.next_blank();
            let cell = self.ctx.top_mut(&token)?.subject.replace(next_cell.clone());
            self.push_rest(cell, next_cell, &token)?;
            self.lexer.push_back(token);
            return Ok(Some(State::Object));
        }

        match (kind, &token.kind) {
            (_, TokenKind::Comma) => Ok(Some(State::Object)),
            (_, TokenKind::Semicolon) => {
                self.predicate_optional = true;
                self.after_semicolon = true;
                Ok(Some(State::Predicate))
            }
            (FrameKind::PropertyList, TokenKind::RBracket) => {
                let frame = self.ctx.pop(&token)?;
                let outer = self.ctx.top_mut(&token)?;
                if outer.predicate.is_none() {
                    outer.subject = frame.subject;
                }
                self.after_close(&token, true)
            }
            (FrameKind::TopLevel, TokenKind::Dot) => Ok(None),
            (FrameKind::PropertyList, _) => Err(expected("']'", &token)),
            _ => Err(expected("'.'", &token)),
        }
    }

    /// State after `]` or `)`: a subject still needs its predicates, an
    /// object is followed by punctuation.
    fn after_close(&mut self, at: &Token, property_list: bool) -> Result<Option<State>> {
        if self.ctx.top(at)?.predicate.is_none() {
            self.predicate_optional = property_list;
            Ok(Some(State::Predicate))
        } else {
            Ok(Some(State::End))
        }
    }

    // =========================================================================
    // Directives
    // =========================================================================

    fn prefix_directive(&mut self, needs_dot: bool) -> Result<()> {
        let token = self.next()?;
        let prefix = match &token.kind {
            TokenKind::PrefixedName { prefix, local } if local.is_empty() => prefix.to_string(),
            TokenKind::PrefixedName { .. } => {
                return Err(DecodeError::syntax(
                    token.line,
                    token.column,
                    "prefix declaration must end with ':'",
                ))
            }
            _ => return Err(expected("prefix name", &token)),
        };

        let token = self.next()?;
        let namespace = match &token.kind {
            TokenKind::Iri { iri, absolute } => self.ctx.resolve(iri, *absolute, &token)?,
            _ => return Err(expected("IRI", &token)),
        };

        if needs_dot {
            self.expect_dot()?;
        }

        tracing::debug!(prefix = %prefix, namespace = %namespace, "prefix declared");
        self.ctx.set_prefix(prefix, namespace);
        Ok(())
    }

    fn base_directive(&mut self, needs_dot: bool) -> Result<()> {
        let token = self.next()?;
        let base = match &token.kind {
            TokenKind::Iri { iri, absolute } => self.ctx.resolve(iri, *absolute, &token)?,
            _ => return Err(expected("IRI", &token)),
        };

        if needs_dot {
            self.expect_dot()?;
        }

        tracing::debug!(base = %base, "base IRI set");
        self.ctx.set_base(base);
        Ok(())
    }

    fn expect_dot(&mut self) -> Result<()> {
        let token = self.next()?;
        if token.kind == TokenKind::Dot {
            Ok(())
        } else {
            Err(expected("'.'", &token))
        }
    }

    // =========================================================================
    // Terms
    // =========================================================================

    /// Resolve an IRI or prefixed name token to a full IRI.
    fn expand_iri(&self, token: &Token) -> Result<String> {
        match &token.kind {
            TokenKind::Iri { iri, absolute } => self.ctx.resolve(iri, *absolute, token),
            TokenKind::PrefixedName { prefix, local } => self.ctx.expand(prefix, local, token),
            _ => Err(expected("IRI", token)),
        }
    }

    fn named(&self, token: &Token) -> Result<Term> {
        Ok(Term::iri(self.expand_iri(token)?))
    }

    /// Attach the optional language tag or datatype following a string.
    fn literal(&mut self, value: Arc<str>) -> Result<Term> {
        let next = self.next()?;
        if let TokenKind::LangTag(tag) = &next.kind {
            return Ok(Term::lang_string(value, tag));
        }
        if next.kind != TokenKind::DoubleCaret {
            self.lexer.push_back(next);
            return Ok(Term::string(value));
        }

        let token = self.next()?;
        match &token.kind {
            TokenKind::Iri { .. } | TokenKind::PrefixedName { .. } => {
                let datatype = Datatype::from_iri(self.expand_iri(&token)?);
                if datatype.is_lang_string() {
                    return Err(DecodeError::untagged_lang_string(token.line, token.column));
                }
                Ok(Term::typed(value, datatype))
            }
            _ => Err(unexpected(&token, "datatype")),
        }
    }

    /// After `(`: `None` for the empty collection, else the first cell.
    fn open_collection(&mut self) -> Result<Option<Term>> {
        let next = self.next()?;
        if next.kind == TokenKind::RParen {
            return Ok(None);
        }
        self.lexer.push_back(next);
        Ok(Some(self.ctx.next_blank()))
    }

    // =========================================================================
    // Emission
    // =========================================================================

    /// Queue `(subject predicate object)` from the top frame.
    fn emit(&mut self, object: Term, at: &Token) -> Result<()> {
        let frame = self.ctx.top(at)?;
        match (&frame.subject, &frame.predicate) {
            (Some(s), Some(p)) => {
                let triple = Triple::new(s.clone(), p.clone(), object);
                self.queue.push_back(triple);
                Ok(())
            }
            _ => Err(DecodeError::fatal(
                at.line,
                at.column,
                "object without subject and predicate",
            )),
        }
    }

    fn push_rest(&mut self, cell: Option<Term>, rest: Term, at: &Token) -> Result<()> {
        let Some(cell) = cell else {
            return Err(DecodeError::fatal(at.line, at.column, "collection cell without node"));
        };
        self.queue
            .push_back(Triple::new(cell, Term::iri(rdf::REST), rest));
        Ok(())
    }
}

impl<R: Read> Iterator for TurtleDecoder<R> {
    type Item = Result<Triple>;

    fn next(&mut self) -> Option<Self::Item> {
        self.decode_triple().transpose()
    }
}

fn unexpected(token: &Token, position: &'static str) -> DecodeError {
    DecodeError::Unexpected {
        line: token.line,
        column: token.column,
        found: token.kind.name(),
        position,
    }
}

fn expected(expected: &'static str, token: &Token) -> DecodeError {
    DecodeError::Expected {
        line: token.line,
        column: token.column,
        expected,
        found: token.kind.name(),
    }
}
