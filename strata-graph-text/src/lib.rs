//! Streaming decoders for RDF text formats: N-Triples, N-Quads and Turtle.
//!
//! Each decoder reads from any [`std::io::Read`] and hands out one statement per
//! call, pulling input a line at a time. Errors carry the line and column of
//! the offending token.
//!
//! # Example
//!
//! ```
//! use strata_graph_ir::Term;
//! use strata_graph_text::{NQuadsDecoder, TurtleDecoder};
//!
//! let turtle = r#"
//!     @prefix ex: <http://example.org/> .
//!     ex:alice ex:knows ( ex:bob ex:carol ) .
//! "#;
//! let triples = TurtleDecoder::new(turtle.as_bytes())
//!     .collect::<Result<Vec<_>, _>>()
//!     .unwrap();
//! assert_eq!(triples.len(), 5);
//!
//! let nquads = "<http://example.org/s> <http://example.org/p> \"o\" .\n";
//! let mut decoder =
//!     NQuadsDecoder::new(nquads.as_bytes(), Term::iri("http://example.org/g")).unwrap();
//! let quad = decoder.decode_quad().unwrap().unwrap();
//! assert_eq!(quad.g, Term::iri("http://example.org/g"));
//! ```

pub mod error;
pub mod feeder;
pub mod iri;
pub mod lex;
pub mod ntriples;
pub mod options;
pub mod turtle;

pub use error::{DecodeError, Result};
pub use lex::{tokenize, Dialect, Lexer, Token, TokenKind};
pub use ntriples::{NQuadsDecoder, NTriplesDecoder};
pub use options::TurtleOptions;
pub use turtle::TurtleDecoder;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_config() {
        let options: TurtleOptions = serde_json::from_str(
            r#"{ "base_iri": "http://example.org/", "prefixes": { "ex": "http://example.org/ns#" } }"#,
        )
        .unwrap();
        assert_eq!(options.base_iri.as_deref(), Some("http://example.org/"));
        assert_eq!(options.blank_node_prefix, "genid");
        assert_eq!(options.prefixes["ex"], "http://example.org/ns#");
    }

    #[test]
    fn test_empty_options_are_default() {
        let options: TurtleOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, TurtleOptions::default());
    }
}
