//! RDF text lexer.
//!
//! Tokenizes Turtle and N-Triples/N-Quads input line by line using winnow.

pub mod chars;
pub mod lexer;
pub mod token;

pub use lexer::{tokenize, Dialect, Lexer};
pub use token::{Token, TokenKind};
