//! Error types for RDF text decoding

/// Error type for decoding operations
///
/// Every positional variant renders as `"<line>:<column>: ..."`, with 1-based
/// line numbers and columns counted in characters.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Lexical error or grammar violation with a free-form message
    #[error("{line}:{column}: syntax error: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// A token of the wrong kind in a grammar position
    #[error("{line}:{column}: unexpected {found} as {position}")]
    Unexpected {
        line: usize,
        column: usize,
        found: &'static str,
        position: &'static str,
    },

    /// A specific token kind was required
    #[error("{line}:{column}: expected {expected}, got {found}")]
    Expected {
        line: usize,
        column: usize,
        expected: &'static str,
        found: &'static str,
    },

    /// Structural error that leaves the decoder unusable (unterminated
    /// collection or property list at end of input)
    #[error("{line}:{column}: syntax error: {message}")]
    Fatal {
        line: usize,
        column: usize,
        message: String,
    },

    /// The N-Quads default graph must be an IRI or a blank node
    #[error("invalid default graph {0}: must be an IRI or blank node")]
    InvalidDefaultGraph(String),

    /// Reading the input failed (including invalid UTF-8)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for decoding operations
pub type Result<T> = std::result::Result<T, DecodeError>;

impl DecodeError {
    /// Create a syntax error
    pub fn syntax(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a structural (fatal) error
    pub fn fatal(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Fatal {
            line,
            column,
            message: message.into(),
        }
    }

    /// An `rdf:langString` datatype written without a language tag
    pub fn untagged_lang_string(line: usize, column: usize) -> Self {
        Self::syntax(line, column, "rdf:langString literal without a language tag")
    }

    /// Line and column of the error, if it has a source position.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Self::Syntax { line, column, .. }
            | Self::Unexpected { line, column, .. }
            | Self::Expected { line, column, .. }
            | Self::Fatal { line, column, .. } => Some((*line, *column)),
            Self::InvalidDefaultGraph(_) | Self::Io(_) => None,
        }
    }

    /// Whether the decoder that produced this error can not continue.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal { .. } | Self::Io(_))
    }
}
