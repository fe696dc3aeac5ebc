//! N-Triples and N-Quads decoders.
//!
//! Both formats carry exactly one statement per line:
//!
//! ```text
//! subject predicate object [graph] .
//! ```
//!
//! There are no prefixes, no relative IRIs and no nesting, so the parser is a
//! straight sequence of token checks. A statement-level error skips the rest of
//! the offending line; the next call resumes on the following line.

use std::io::Read;

use strata_graph_ir::{Datatype, Quad, Term, Triple};

use crate::error::{DecodeError, Result};
use crate::lex::{Dialect, Lexer, Token, TokenKind};

/// Statement parser shared by the N-Triples and N-Quads decoders.
struct LineParser<R> {
    lexer: Lexer<R>,
    statements: usize,
    finished: bool,
}

impl<R: Read> LineParser<R> {
    fn new(reader: R) -> Self {
        Self {
            lexer: Lexer::new(reader, Dialect::NTriples),
            statements: 0,
            finished: false,
        }
    }

    /// Decode the next statement, with its graph name when one was written.
    fn next_statement(&mut self, quads: bool) -> Result<Option<(Triple, Option<Term>)>> {
        if self.finished {
            return Ok(None);
        }

        match self.parse_statement(quads) {
            Ok(Some(statement)) => {
                self.statements += 1;
                tracing::trace!(line = self.lexer.line(), triple = %statement.0, "decoded statement");
                Ok(Some(statement))
            }
            Ok(None) => {
                self.finished = true;
                Ok(None)
            }
            Err(e) => {
                tracing::debug!(error = %e, "rejected statement");
                if e.is_fatal() {
                    self.finished = true;
                } else {
                    self.lexer.skip_line();
                }
                Err(e)
            }
        }
    }

    fn parse_statement(&mut self, quads: bool) -> Result<Option<(Triple, Option<Term>)>> {
        let mut first = self.lexer.next_token()?;
        while first.kind == TokenKind::EndOfLine {
            first = self.lexer.next_token()?;
        }
        if first.is_eof() {
            return Ok(None);
        }

        let subject = self.subject(first)?;
        let token = self.lexer.next_token()?;
        let predicate = self.predicate(token)?;
        let object = self.object()?;

        let mut token = self.lexer.next_token()?;
        let graph = if quads && token.kind != TokenKind::Dot {
            let graph = self.graph(token)?;
            token = self.lexer.next_token()?;
            Some(graph)
        } else {
            None
        };

        if token.kind != TokenKind::Dot {
            return Err(expected("'.'", &token));
        }

        let trailing = self.lexer.next_token()?;
        if trailing.kind != TokenKind::EndOfLine {
            return Err(DecodeError::syntax(
                trailing.line,
                trailing.column,
                "extra token after end of statement",
            ));
        }

        Ok(Some((Triple::new(subject, predicate, object), graph)))
    }

    fn subject(&mut self, token: Token) -> Result<Term> {
        match token.kind {
            TokenKind::Iri { iri, absolute: true } => Ok(Term::iri(iri)),
            TokenKind::BlankNodeLabel(label) => Ok(Term::blank(label)),
            _ => Err(unexpected(&token, "subject")),
        }
    }

    fn predicate(&mut self, token: Token) -> Result<Term> {
        match token.kind {
            TokenKind::Iri { iri, absolute: true } => Ok(Term::iri(iri)),
            TokenKind::BlankNodeLabel(label) => Ok(Term::blank(label)),
            _ => Err(unexpected(&token, "predicate")),
        }
    }

    fn object(&mut self) -> Result<Term> {
        let token = self.lexer.next_token()?;
        match token.kind {
            TokenKind::Iri { iri, absolute: true } => Ok(Term::iri(iri)),
            TokenKind::BlankNodeLabel(label) => Ok(Term::blank(label)),
            TokenKind::String(value) => self.literal_suffix(value),
            _ => Err(unexpected(&token, "object")),
        }
    }

    /// Attach the optional language tag or datatype following a literal.
    fn literal_suffix(&mut self, value: std::sync::Arc<str>) -> Result<Term> {
        let next = self.lexer.next_token()?;
        match next.kind {
            TokenKind::LangTag(tag) => Ok(Term::lang_string(value, tag)),
            TokenKind::DoubleCaret => {
                let token = self.lexer.next_token()?;
                match token.kind {
                    TokenKind::Iri { iri, absolute: true } => {
                        let datatype = Datatype::from_iri(iri);
                        if datatype.is_lang_string() {
                            return Err(DecodeError::untagged_lang_string(token.line, token.column));
                        }
                        Ok(Term::typed(value, datatype))
                    }
                    _ => Err(unexpected(&token, "datatype")),
                }
            }
            _ => {
                self.lexer.push_back(next);
                Ok(Term::string(value))
            }
        }
    }

    fn graph(&mut self, token: Token) -> Result<Term> {
        match token.kind {
            TokenKind::Iri { iri, absolute: true } => Ok(Term::iri(iri)),
            TokenKind::BlankNodeLabel(label) => Ok(Term::blank(label)),
            TokenKind::String(_) => Err(DecodeError::syntax(
                token.line,
                token.column,
                "graph name may not be a literal",
            )),
            _ => Err(unexpected(&token, "graph")),
        }
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

// =============================================================================
// N-Triples
// =============================================================================

/// Streaming N-Triples decoder.
///
/// ```
/// use strata_graph_text::NTriplesDecoder;
///
/// let input = "<http://example.org/s> <http://example.org/p> \"o\" .\n";
/// let mut decoder = NTriplesDecoder::new(input.as_bytes());
/// let triple = decoder.decode_triple().unwrap().unwrap();
/// assert_eq!(triple.o.as_literal().unwrap().0.as_str(), Some("o"));
/// assert!(decoder.decode_triple().unwrap().is_none());
/// ```
pub struct NTriplesDecoder<R> {
    parser: LineParser<R>,
}

impl<R: Read> NTriplesDecoder<R> {
    /// Create a decoder reading from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            parser: LineParser::new(reader),
        }
    }

    /// Decode the next triple; `Ok(None)` once the input is exhausted.
    pub fn decode_triple(&mut self) -> Result<Option<Triple>> {
        Ok(self.parser.next_statement(false)?.map(|(triple, _)| triple))
    }

    /// Number of statements decoded so far.
    pub fn statement_count(&self) -> usize {
        self.parser.statements
    }

    /// Last physical line read.
    pub fn line(&self) -> usize {
        self.parser.lexer.line()
    }
}

impl<R: Read> Iterator for NTriplesDecoder<R> {
    type Item = Result<Triple>;

    fn next(&mut self) -> Option<Self::Item> {
        self.decode_triple().transpose()
    }
}

// =============================================================================
// N-Quads
// =============================================================================

/// Streaming N-Quads decoder.
///
/// Statements without a graph name are placed in the default graph given at
/// construction.
pub struct NQuadsDecoder<R> {
    parser: LineParser<R>,
    default_graph: Term,
}

impl<R: Read> NQuadsDecoder<R> {
    /// Create a decoder reading from `reader`.
    ///
    /// Fails if `default_graph` is a literal.
    pub fn new(reader: R, default_graph: Term) -> Result<Self> {
        if default_graph.is_literal() {
            return Err(DecodeError::InvalidDefaultGraph(default_graph.to_string()));
        }
        Ok(Self {
            parser: LineParser::new(reader),
            default_graph,
        })
    }

    /// Decode the next quad; `Ok(None)` once the input is exhausted.
    pub fn decode_quad(&mut self) -> Result<Option<Quad>> {
        let Some((triple, graph)) = self.parser.next_statement(true)? else {
            return Ok(None);
        };
        let graph = graph.unwrap_or_else(|| self.default_graph.clone());
        Ok(Some(Quad::from_triple(triple, graph)))
    }

    /// Graph assigned to statements that do not name one.
    pub fn default_graph(&self) -> &Term {
        &self.default_graph
    }

    /// Number of statements decoded so far.
    pub fn statement_count(&self) -> usize {
        self.parser.statements
    }

    /// Last physical line read.
    pub fn line(&self) -> usize {
        self.parser.lexer.line()
    }
}

impl<R: Read> Iterator for NQuadsDecoder<R> {
    type Item = Result<Quad>;

    fn next(&mut self) -> Option<Self::Item> {
        self.decode_quad().transpose()
    }
}
