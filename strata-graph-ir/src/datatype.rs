//! Literal datatypes.
//!
//! Every literal carries one. A plain string is `xsd:string` and a
//! language-tagged string is `rdf:langString`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Datatype IRIs the coercion table dispatches on.
pub mod iri {
    pub use strata_vocab::rdf::LANG_STRING as RDF_LANG_STRING;
    pub use strata_vocab::xsd::{
        BOOLEAN as XSD_BOOLEAN, DATE_TIME as XSD_DATE_TIME, DECIMAL as XSD_DECIMAL,
        DOUBLE as XSD_DOUBLE, INTEGER as XSD_INTEGER, STRING as XSD_STRING,
    };
}

/// An expanded datatype IRI.
///
/// Two datatypes are equal exactly when their IRIs are.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Datatype(Arc<str>);

macro_rules! well_known {
    ($($name:ident => $iri:path),* $(,)?) => {
        impl Datatype {
            $(
                #[doc = concat!("`", stringify!($iri), "`")]
                pub fn $name() -> Self {
                    Self::from_iri($iri)
                }
            )*
        }
    };
}

well_known! {
    xsd_string => iri::XSD_STRING,
    xsd_boolean => iri::XSD_BOOLEAN,
    xsd_integer => iri::XSD_INTEGER,
    xsd_decimal => iri::XSD_DECIMAL,
    xsd_double => iri::XSD_DOUBLE,
    xsd_date_time => iri::XSD_DATE_TIME,
    rdf_lang_string => iri::RDF_LANG_STRING,
}

impl Datatype {
    pub fn from_iri(iri: impl AsRef<str>) -> Self {
        Datatype(Arc::from(iri.as_ref()))
    }

    pub fn as_iri(&self) -> &str {
        &self.0
    }

    /// Plain strings print without a `^^` suffix.
    pub fn is_xsd_string(&self) -> bool {
        &*self.0 == iri::XSD_STRING
    }

    pub fn is_lang_string(&self) -> bool {
        &*self.0 == iri::RDF_LANG_STRING
    }
}

impl std::fmt::Display for Datatype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
