//! Triples and quads

use crate::Term;
use serde::{Deserialize, Serialize};

/// An RDF triple.
///
/// Subject and predicate are never literals. Turtle predicates are always
/// IRIs; the N-Triples grammar also admits a blank node predicate.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    /// Subject
    pub s: Term,
    /// Predicate
    pub p: Term,
    /// Object
    pub o: Term,
}

impl Triple {
    /// Create a new triple
    pub fn new(s: Term, p: Term, o: Term) -> Self {
        Self { s, p, o }
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} .", self.s, self.p, self.o)
    }
}

/// An RDF triple plus the graph it belongs to.
///
/// The graph is never a literal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Quad {
    /// Subject
    pub s: Term,
    /// Predicate
    pub p: Term,
    /// Object
    pub o: Term,
    /// Graph name
    pub g: Term,
}

impl Quad {
    /// Create a new quad
    pub fn new(s: Term, p: Term, o: Term, g: Term) -> Self {
        Self { s, p, o, g }
    }

    /// Place a triple in `graph`.
    pub fn from_triple(triple: Triple, graph: Term) -> Self {
        Self::new(triple.s, triple.p, triple.o, graph)
    }

    /// The triple part of this quad.
    pub fn triple(&self) -> Triple {
        Triple::new(self.s.clone(), self.p.clone(), self.o.clone())
    }
}

impl std::fmt::Display for Quad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} {} .", self.s, self.p, self.o, self.g)
    }
}
