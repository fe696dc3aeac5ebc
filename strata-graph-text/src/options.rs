//! Turtle decoder configuration.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Options for [`TurtleDecoder`](crate::TurtleDecoder).
///
/// Deserializable so it can sit inside an application's own configuration:
///
/// ```toml
/// [turtle]
/// base_iri = "http://example.org/data/"
/// blank_node_prefix = "b"
///
/// [turtle.prefixes]
/// ex = "http://example.org/"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TurtleOptions {
    /// Initial base IRI; must be absolute
    pub base_iri: Option<String>,
    /// Label prefix for generated blank nodes (`genid1`, `genid2`, ...)
    pub blank_node_prefix: String,
    /// Prefixes in effect before the first directive
    pub prefixes: BTreeMap<String, String>,
}

impl Default for TurtleOptions {
    fn default() -> Self {
        Self {
            base_iri: None,
            blank_node_prefix: "genid".to_string(),
            prefixes: BTreeMap::new(),
        }
    }
}

impl TurtleOptions {
    /// Set the initial base IRI.
    pub fn with_base(mut self, base_iri: impl Into<String>) -> Self {
        self.base_iri = Some(base_iri.into());
        self
    }

    /// Pre-declare a prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>, namespace: impl Into<String>) -> Self {
        self.prefixes.insert(prefix.into(), namespace.into());
        self
    }

    /// Set the generated blank node label prefix.
    pub fn with_blank_node_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.blank_node_prefix = prefix.into();
        self
    }
}
