//! Token types.
//!
//! Tokens are the output of lexical analysis, ready for parsing. Escape
//! sequences have already been decoded in every payload.

use std::sync::Arc;

/// A token with its source position.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The token kind
    pub kind: TokenKind,
    /// Line of the first character (1-based)
    pub line: usize,
    /// Column of the first character (1-based, in characters)
    pub column: usize,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }

    /// Check if this is an EOF token.
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}

/// Token kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // =========================================================================
    // IRIs
    // =========================================================================
    /// IRI reference: `<http://example.org/>`
    Iri {
        /// IRI text without the angle brackets
        iri: Arc<str>,
        /// Whether the IRI starts with a URI scheme
        absolute: bool,
    },

    /// Prefixed name: `prefix:local` (either part may be empty)
    PrefixedName {
        /// Namespace prefix (without colon)
        prefix: Arc<str>,
        /// Local name
        local: Arc<str>,
    },

    // =========================================================================
    // Blank Nodes
    // =========================================================================
    /// Labeled blank node: `_:name`
    BlankNodeLabel(Arc<str>),

    /// Anonymous blank node: `[]`, possibly with whitespace inside
    Anon,

    // =========================================================================
    // Literals
    // =========================================================================
    /// String literal (unescaped content)
    String(Arc<str>),

    /// Integer shorthand, lexical form
    Integer(Arc<str>),

    /// Decimal shorthand, lexical form
    Decimal(Arc<str>),

    /// Double shorthand (with exponent), lexical form
    Double(Arc<str>),

    /// Language tag (e.g., `@en`, `@en-US`), stored without the `@`.
    LangTag(Arc<str>),

    // =========================================================================
    // Keywords / Directives
    // =========================================================================
    /// `@prefix` directive
    KwPrefix,

    /// `@base` directive
    KwBase,

    /// SPARQL-style `PREFIX` (without @)
    KwSparqlPrefix,

    /// SPARQL-style `BASE` (without @)
    KwSparqlBase,

    /// `a` keyword (shorthand for rdf:type)
    KwA,

    /// `true` boolean literal
    KwTrue,

    /// `false` boolean literal
    KwFalse,

    // =========================================================================
    // Punctuation
    // =========================================================================
    /// `.`
    Dot,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `^^` (datatype marker)
    DoubleCaret,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `(`
    LParen,
    /// `)`
    RParen,

    // =========================================================================
    // Special
    // =========================================================================
    /// End of the current line (or a comment running to it)
    EndOfLine,
    /// End of input
    Eof,
}

impl TokenKind {
    /// Short human-readable name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Iri { absolute: true, .. } => "IRI",
            TokenKind::Iri { absolute: false, .. } => "relative IRI",
            TokenKind::PrefixedName { .. } => "prefixed name",
            TokenKind::BlankNodeLabel(_) => "blank node",
            TokenKind::Anon => "anonymous blank node",
            TokenKind::String(_) => "literal",
            TokenKind::Integer(_) | TokenKind::Decimal(_) | TokenKind::Double(_) => {
                "numeric literal"
            }
            TokenKind::LangTag(_) => "language tag",
            TokenKind::KwPrefix | TokenKind::KwSparqlPrefix => "prefix directive",
            TokenKind::KwBase | TokenKind::KwSparqlBase => "base directive",
            TokenKind::KwA => "'a'",
            TokenKind::KwTrue | TokenKind::KwFalse => "boolean literal",
            TokenKind::Dot => "'.'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::DoubleCaret => "'^^'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::EndOfLine => "end of line",
            TokenKind::Eof => "end of input",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Iri { iri, .. } => write!(f, "<{}>", iri),
            TokenKind::PrefixedName { prefix, local } => write!(f, "{}:{}", prefix, local),
            TokenKind::BlankNodeLabel(s) => write!(f, "_:{}", s),
            TokenKind::Anon => write!(f, "[]"),
            TokenKind::String(s) => write!(f, "\"{}\"", s),
            TokenKind::Integer(s) | TokenKind::Decimal(s) | TokenKind::Double(s) => {
                write!(f, "{}", s)
            }
            TokenKind::LangTag(s) => write!(f, "@{}", s),
            TokenKind::KwPrefix => write!(f, "@prefix"),
            TokenKind::KwBase => write!(f, "@base"),
            TokenKind::KwSparqlPrefix => write!(f, "PREFIX"),
            TokenKind::KwSparqlBase => write!(f, "BASE"),
            TokenKind::KwA => write!(f, "a"),
            TokenKind::KwTrue => write!(f, "true"),
            TokenKind::KwFalse => write!(f, "false"),
            TokenKind::Dot => write!(f, "."),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::DoubleCaret => write!(f, "^^"),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::EndOfLine => write!(f, "EOL"),
            TokenKind::Eof => write!(f, "EOF"),
        }
    }
}
