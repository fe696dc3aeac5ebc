//! RDF term types: IRI, blank node, and literal
//!
//! Terms are the building blocks of triples. A term can be:
//! - An IRI (always expanded, never prefixed)
//! - A blank node (with an identifier scoped to one decoder)
//! - A literal (value + explicit datatype + optional language tag)

use crate::{coerce_lexical, Datatype};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Blank node identifier
///
/// Labels come either from the document (`_:name`) or from a decoder's
/// blank-node counter (`genid1`, `genid2`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlankId(Arc<str>);

impl BlankId {
    /// Create a blank node ID from a label
    ///
    /// The label should NOT include the `_:` prefix.
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(Arc::from(label.as_ref()))
    }

    /// Get the label (without `_:` prefix)
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlankId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// Literal value storage
///
/// A closed set of native values. `String` is also the fallback for
/// datatypes outside the coercion table, holding the raw lexical form.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum LiteralValue {
    /// String value (UTF-8), or the lexical form of an uncoerced literal
    String(Arc<str>),
    /// Boolean value
    Boolean(bool),
    /// Integer value (i64 range)
    Integer(i64),
    /// Floating point value (xsd:double and xsd:decimal)
    Double(f64),
    /// Timestamp (xsd:dateTime)
    DateTime(DateTime<FixedOffset>),
}

impl LiteralValue {
    /// Create a string literal value
    pub fn string(s: impl AsRef<str>) -> Self {
        LiteralValue::String(Arc::from(s.as_ref()))
    }

    /// Coerce a lexical form according to `datatype`.
    pub fn coerce(lexical: &str, datatype: &Datatype) -> Self {
        coerce_lexical(lexical, datatype)
    }

    /// Get the lexical representation of this value
    pub fn lexical(&self) -> String {
        match self {
            LiteralValue::String(s) => s.to_string(),
            LiteralValue::Boolean(b) => b.to_string(),
            LiteralValue::Integer(i) => i.to_string(),
            LiteralValue::Double(d) => {
                if d.is_nan() {
                    "NaN".to_string()
                } else if d.is_infinite() {
                    if d.is_sign_positive() {
                        "INF".to_string()
                    } else {
                        "-INF".to_string()
                    }
                } else {
                    d.to_string()
                }
            }
            LiteralValue::DateTime(dt) => dt.to_rfc3339(),
        }
    }

    /// Try to get as string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LiteralValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            LiteralValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            LiteralValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as double
    pub fn as_double(&self) -> Option<f64> {
        match self {
            LiteralValue::Double(d) => Some(*d),
            LiteralValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get as timestamp
    pub fn as_date_time(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            LiteralValue::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            LiteralValue::String(_) => 0,
            LiteralValue::Boolean(_) => 1,
            LiteralValue::Integer(_) => 2,
            LiteralValue::Double(_) => 3,
            LiteralValue::DateTime(_) => 4,
        }
    }
}

/// Doubles compare by `f64::total_cmp`, so `NaN` equals itself and
/// `-0.0` differs from `0.0`. Values of different kinds order as
/// String < Boolean < Integer < Double < DateTime.
impl Ord for LiteralValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::String(a), Self::String(b)) => a.cmp(b),
            (Self::Boolean(a), Self::Boolean(b)) => a.cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Double(a), Self::Double(b)) => a.total_cmp(b),
            (Self::DateTime(a), Self::DateTime(b)) => a.cmp(b),
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }
}

impl PartialOrd for LiteralValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for LiteralValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LiteralValue {}

impl Hash for LiteralValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_rank().hash(state);
        match self {
            Self::String(s) => s.hash(state),
            Self::Boolean(b) => b.hash(state),
            Self::Integer(i) => i.hash(state),
            Self::Double(d) => d.to_bits().hash(state),
            Self::DateTime(dt) => dt.hash(state),
        }
    }
}

/// An RDF term (subject, predicate, object, or graph position)
///
/// # Invariants
///
/// - `Term::Iri` always contains an **expanded** IRI, never a prefixed form.
/// - A `Term::Literal` with a language tag always has datatype `rdf:langString`;
///   one with any other datatype never has a language tag.
///
/// Terms order as IRI < blank node < literal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    /// Full expanded IRI (e.g., "http://schema.org/Person")
    Iri(Arc<str>),

    /// Blank node
    BlankNode(BlankId),

    /// Literal value with explicit datatype
    Literal {
        /// The (possibly coerced) value
        value: LiteralValue,
        /// Datatype (always present)
        datatype: Datatype,
        /// Language tag (only set when datatype is rdf:langString)
        language: Option<Arc<str>>,
    },
}

impl Term {
    /// Create an IRI term from an expanded IRI string
    pub fn iri(iri: impl AsRef<str>) -> Self {
        Term::Iri(Arc::from(iri.as_ref()))
    }

    /// Create a blank node term
    pub fn blank(label: impl AsRef<str>) -> Self {
        Term::BlankNode(BlankId::new(label))
    }

    /// Create a plain string literal (xsd:string)
    pub fn string(value: impl AsRef<str>) -> Self {
        Term::Literal {
            value: LiteralValue::string(value),
            datatype: Datatype::xsd_string(),
            language: None,
        }
    }

    /// Create a boolean literal (xsd:boolean)
    pub fn boolean(value: bool) -> Self {
        Term::Literal {
            value: LiteralValue::Boolean(value),
            datatype: Datatype::xsd_boolean(),
            language: None,
        }
    }

    /// Create an integer literal (xsd:integer)
    pub fn integer(value: i64) -> Self {
        Term::Literal {
            value: LiteralValue::Integer(value),
            datatype: Datatype::xsd_integer(),
            language: None,
        }
    }

    /// Create a double literal (xsd:double)
    pub fn double(value: f64) -> Self {
        Term::Literal {
            value: LiteralValue::Double(value),
            datatype: Datatype::xsd_double(),
            language: None,
        }
    }

    /// Create a language-tagged string literal (rdf:langString)
    pub fn lang_string(value: impl AsRef<str>, lang: impl AsRef<str>) -> Self {
        Term::Literal {
            value: LiteralValue::string(value),
            datatype: Datatype::rdf_lang_string(),
            language: Some(Arc::from(lang.as_ref())),
        }
    }

    /// Create a typed literal, coercing the lexical form when the datatype
    /// is in the coercion table.
    ///
    /// `rdf:langString` needs a tag, so without one the literal falls back to
    /// `xsd:string`.
    pub fn typed(lexical: impl AsRef<str>, datatype: Datatype) -> Self {
        if datatype.is_lang_string() {
            return Term::string(lexical);
        }
        Term::Literal {
            value: LiteralValue::coerce(lexical.as_ref(), &datatype),
            datatype,
            language: None,
        }
    }

    /// Check if this is an IRI term
    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    /// Check if this is a blank node
    pub fn is_blank(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    /// Check if this is a literal
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal { .. })
    }

    /// Try to get as IRI string
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Try to get as blank node ID
    pub fn as_blank(&self) -> Option<&BlankId> {
        match self {
            Term::BlankNode(id) => Some(id),
            _ => None,
        }
    }

    /// Try to get literal components
    pub fn as_literal(&self) -> Option<(&LiteralValue, &Datatype, Option<&str>)> {
        match self {
            Term::Literal {
                value,
                datatype,
                language,
            } => Some((value, datatype, language.as_deref())),
            _ => None,
        }
    }
}

/// Renders the term in N-Triples form, for diagnostics.
impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::BlankNode(id) => write!(f, "{}", id),
            Term::Literal {
                value,
                datatype,
                language,
            } => {
                f.write_str("\"")?;
                for c in value.lexical().chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                f.write_str("\"")?;
                if let Some(lang) = language {
                    write!(f, "@{}", lang)
                } else if !datatype.is_xsd_string() {
                    write!(f, "^^<{}>", datatype.as_iri())
                } else {
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_id() {
        let id = BlankId::new("b0");
        assert_eq!(id.as_str(), "b0");
        assert_eq!(format!("{}", id), "_:b0");
    }

    #[test]
    fn test_term_constructors() {
        let iri = Term::iri("http://example.org/foo");
        assert!(iri.is_iri());
        assert_eq!(iri.as_iri(), Some("http://example.org/foo"));

        let blank = Term::blank("b0");
        assert!(blank.is_blank());

        let string = Term::string("hello");
        assert!(string.is_literal());

        let lang = Term::lang_string("bonjour", "fr");
        let (_, dt, l) = lang.as_literal().unwrap();
        assert!(dt.is_lang_string());
        assert_eq!(l, Some("fr"));
    }

    #[test]
    fn test_typed_coerces_known_datatypes() {
        assert_eq!(Term::typed("42", Datatype::xsd_integer()), Term::integer(42));
        assert_eq!(Term::typed("true", Datatype::xsd_boolean()), Term::boolean(true));
        assert_eq!(Term::typed("2.5E0", Datatype::xsd_double()), Term::double(2.5));

        let custom = Term::typed("x", Datatype::from_iri("http://example.org/dt"));
        let (value, dt, lang) = custom.as_literal().unwrap();
        assert_eq!(value.as_str(), Some("x"));
        assert_eq!(dt.as_iri(), "http://example.org/dt");
        assert_eq!(lang, None);
    }

    #[test]
    fn test_literal_values() {
        assert_eq!(LiteralValue::string("test").lexical(), "test");
        assert_eq!(LiteralValue::Boolean(true).lexical(), "true");
        assert_eq!(LiteralValue::Integer(42).lexical(), "42");
        assert_eq!(LiteralValue::Double(f64::NAN).lexical(), "NaN");
        assert_eq!(LiteralValue::Double(f64::INFINITY).lexical(), "INF");
        assert_eq!(LiteralValue::Double(f64::NEG_INFINITY).lexical(), "-INF");
    }

    #[test]
    fn test_term_ordering() {
        let blank = Term::blank("b0");
        let iri = Term::iri("http://example.org");
        let lit = Term::string("hello");

        assert!(iri < blank);
        assert!(blank < lit);

        assert!(Term::iri("http://a.org") < Term::iri("http://b.org"));
    }

    #[test]
    fn test_term_display() {
        assert_eq!(
            format!("{}", Term::iri("http://example.org")),
            "<http://example.org>"
        );
        assert_eq!(format!("{}", Term::blank("b0")), "_:b0");
        assert_eq!(format!("{}", Term::string("say \"hi\"")), "\"say \\\"hi\\\"\"");
        assert_eq!(
            format!("{}", Term::lang_string("bonjour", "fr")),
            "\"bonjour\"@fr"
        );
        assert_eq!(
            format!("{}", Term::integer(42)),
            "\"42\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
    }

    #[test]
    fn test_terms_persist_through_serde() {
        let terms = vec![
            Term::iri("http://example.org/s"),
            Term::blank("b0"),
            Term::lang_string("chat", "fr"),
            Term::typed("x", Datatype::from_iri("http://example.org/dt")),
        ];
        let json = serde_json::to_string(&terms).unwrap();
        let back: Vec<Term> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, terms);
    }

    #[test]
    fn test_typed_lang_string_without_tag_is_plain() {
        let term = Term::typed("x", Datatype::rdf_lang_string());
        assert_eq!(term, Term::string("x"));
        let (_, dt, lang) = term.as_literal().unwrap();
        assert!(dt.is_xsd_string());
        assert!(lang.is_none());
    }

    #[test]
    fn test_double_equality_is_total() {
        assert_eq!(LiteralValue::Double(f64::NAN), LiteralValue::Double(f64::NAN));
        assert_eq!(Term::double(f64::NAN), Term::double(f64::NAN));
        assert_ne!(LiteralValue::Double(0.0), LiteralValue::Double(-0.0));
        assert!(LiteralValue::Integer(9) < LiteralValue::Double(1.0));
    }
}
