//! Document-wide parse state for the Turtle decoder.

use std::collections::{HashMap, HashSet};

use strata_graph_ir::Term;

use crate::error::{DecodeError, Result};
use crate::iri;
use crate::lex::Token;
use crate::options::TurtleOptions;

/// What a context frame is building.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FrameKind {
    /// Statement at document level, closed by `.`
    TopLevel,
    /// `[ ... ]` blank node property list
    PropertyList,
    /// One cell of a `( ... )` collection; the subject advances cell by cell
    CollectionCell,
}

impl FrameKind {
    fn unterminated(self) -> &'static str {
        match self {
            FrameKind::TopLevel => "unterminated statement",
            FrameKind::PropertyList => "unterminated property list",
            FrameKind::CollectionCell => "unterminated collection",
        }
    }
}

/// A partially built triple.
#[derive(Clone, Debug)]
pub(crate) struct Frame {
    pub kind: FrameKind,
    pub subject: Option<Term>,
    pub predicate: Option<Term>,
}

impl Frame {
    pub fn top_level() -> Self {
        Self {
            kind: FrameKind::TopLevel,
            subject: None,
            predicate: None,
        }
    }

    pub fn property_list(subject: Term) -> Self {
        Self {
            kind: FrameKind::PropertyList,
            subject: Some(subject),
            predicate: None,
        }
    }

    pub fn collection_cell(cell: Term) -> Self {
        Self {
            kind: FrameKind::CollectionCell,
            subject: Some(cell),
            predicate: Some(Term::iri(strata_vocab::rdf::FIRST)),
        }
    }
}

/// Base IRI, prefix map, blank node counter and context stack.
///
/// Lives as long as the decoder; only the stack is reset between statements.
pub(crate) struct ParseContext {
    base: Option<String>,
    prefixes: HashMap<String, String>,
    blank_node_prefix: String,
    /// Next generated blank node number
    counter: u64,
    /// Labels written in the document, never handed out by `next_blank`
    labels: HashSet<String>,
    /// Document labels that were already taken by a generated node
    renamed: HashMap<String, Term>,
    stack: Vec<Frame>,
}

impl ParseContext {
    pub fn new(options: &TurtleOptions) -> Self {
        Self {
            base: options.base_iri.clone(),
            prefixes: options
                .prefixes
                .iter()
                .map(|(p, ns)| (p.clone(), ns.clone()))
                .collect(),
            blank_node_prefix: options.blank_node_prefix.clone(),
            counter: 1,
            labels: HashSet::new(),
            renamed: HashMap::new(),
            stack: Vec::new(),
        }
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    pub fn prefixes(&self) -> &HashMap<String, String> {
        &self.prefixes
    }

    pub fn set_base(&mut self, base: String) {
        self.base = Some(base);
    }

    pub fn set_prefix(&mut self, prefix: String, namespace: String) {
        self.prefixes.insert(prefix, namespace);
    }

    /// Allocate a fresh blank node.
    ///
    /// Skips numbers whose label the document already used.
    pub fn next_blank(&mut self) -> Term {
        loop {
            let label = format!("{}{}", self.blank_node_prefix, self.counter);
            self.counter += 1;
            if !self.labels.contains(&label) {
                return Term::blank(label);
            }
        }
    }

    /// Blank node for a `_:label` written in the document.
    ///
    /// The same label always yields the same node. A label that a generated
    /// node already carries is mapped to a fresh node instead.
    pub fn labeled_blank(&mut self, label: &str) -> Term {
        if let Some(node) = self.renamed.get(label) {
            return node.clone();
        }
        if self.was_generated(label) {
            let node = self.next_blank();
            tracing::debug!(label, renamed = %node, "document label collides with generated blank node");
            self.renamed.insert(label.to_string(), node.clone());
            return node;
        }
        if !self.labels.contains(label) {
            self.labels.insert(label.to_string());
        }
        Term::blank(label)
    }

    fn was_generated(&self, label: &str) -> bool {
        let Some(digits) = label.strip_prefix(self.blank_node_prefix.as_str()) else {
            return false;
        };
        match digits.parse::<u64>() {
            Ok(n) => n >= 1 && n < self.counter && n.to_string() == digits,
            Err(_) => false,
        }
    }

    /// Resolve an IRI reference against the base IRI.
    pub fn resolve(&self, reference: &str, absolute: bool, at: &Token) -> Result<String> {
        if absolute {
            return Ok(reference.to_string());
        }
        match &self.base {
            Some(base) => Ok(iri::resolve(base, reference)),
            None => Err(DecodeError::syntax(
                at.line,
                at.column,
                format!("relative IRI <{}> with no base IRI", reference),
            )),
        }
    }

    /// Expand `prefix:local` through the prefix map.
    pub fn expand(&self, prefix: &str, local: &str, at: &Token) -> Result<String> {
        match self.prefixes.get(prefix) {
            Some(namespace) => Ok(format!("{}{}", namespace, local)),
            None => Err(DecodeError::syntax(
                at.line,
                at.column,
                format!("undefined prefix '{}'", prefix),
            )),
        }
    }

    // =========================================================================
    // Context stack
    // =========================================================================

    /// Start a new top-level statement.
    pub fn begin_statement(&mut self) {
        self.stack.clear();
        self.stack.push(Frame::top_level());
    }

    pub fn clear_stack(&mut self) {
        self.stack.clear();
    }

    /// Whether a property list or collection is open.
    pub fn is_nested(&self) -> bool {
        self.stack.len() > 1
    }

    pub fn push(&mut self, frame: Frame) {
        self.stack.push(frame);
    }

    pub fn pop(&mut self, at: &Token) -> Result<Frame> {
        self.stack
            .pop()
            .ok_or_else(|| DecodeError::fatal(at.line, at.column, "context stack underflow"))
    }

    pub fn top(&self, at: &Token) -> Result<&Frame> {
        self.stack
            .last()
            .ok_or_else(|| DecodeError::fatal(at.line, at.column, "context stack underflow"))
    }

    pub fn top_mut(&mut self, at: &Token) -> Result<&mut Frame> {
        self.stack
            .last_mut()
            .ok_or_else(|| DecodeError::fatal(at.line, at.column, "context stack underflow"))
    }

    /// Error for input ending inside the innermost open frame.
    pub fn unterminated(&self, at: &Token) -> DecodeError {
        let kind = self.stack.last().map_or(FrameKind::TopLevel, |f| f.kind);
        DecodeError::fatal(at.line, at.column, kind.unterminated())
    }
}
