//! RDF term model consumed by the strata text decoders
//!
//! This crate provides the value types a decoder hands back to its caller:
//! terms, triples, and quads.
//!
//! # Key Design Principles
//!
//! 1. **Expanded IRIs only** - All IRIs are stored in expanded form. Prefixed
//!    names and relative references are resolved before a term is built.
//!
//! 2. **Explicit datatypes** - Literals always have an explicit datatype, never
//!    optional. Plain strings use `xsd:string`, language-tagged strings use
//!    `rdf:langString`.
//!
//! 3. **Coerced values** - A literal whose datatype is in the fixed coercion
//!    table (`xsd:integer`, `xsd:double`, `xsd:decimal`, `xsd:boolean`,
//!    `xsd:dateTime`) carries a native value; everything else keeps its
//!    lexical form.
//!
//! # Example
//!
//! ```
//! use strata_graph_ir::{Datatype, LiteralValue, Term, Triple};
//!
//! let triple = Triple::new(
//!     Term::iri("http://example.org/alice"),
//!     Term::iri("http://xmlns.com/foaf/0.1/age"),
//!     Term::typed("42", Datatype::xsd_integer()),
//! );
//!
//! let (value, _, _) = triple.o.as_literal().unwrap();
//! assert_eq!(value, &LiteralValue::Integer(42));
//! ```

mod coerce;
pub mod datatype;
mod term;
mod triple;

pub use coerce::coerce_lexical;
pub use datatype::Datatype;
pub use term::{BlankId, LiteralValue, Term};
pub use triple::{Quad, Triple};
