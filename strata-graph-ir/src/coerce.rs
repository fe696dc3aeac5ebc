//! Literal-to-native value coercion
//!
//! A fixed table maps a handful of XSD datatypes to native values. Lexical
//! forms that are not valid for their datatype, and datatypes outside the
//! table, keep the raw lexical string.

use chrono::{DateTime, FixedOffset, NaiveDateTime};

use crate::datatype::iri;
use crate::{Datatype, LiteralValue};

/// Coerce a literal's lexical form according to its datatype.
pub fn coerce_lexical(lexical: &str, datatype: &Datatype) -> LiteralValue {
    let coerced = match datatype.as_iri() {
        iri::XSD_INTEGER => parse_integer(lexical),
        iri::XSD_DOUBLE => parse_double(lexical),
        iri::XSD_DECIMAL => parse_decimal(lexical),
        iri::XSD_BOOLEAN => parse_boolean(lexical),
        iri::XSD_DATE_TIME => parse_date_time(lexical),
        _ => None,
    };
    coerced.unwrap_or_else(|| LiteralValue::string(lexical))
}

fn parse_integer(lexical: &str) -> Option<LiteralValue> {
    let digits = lexical.strip_prefix(['+', '-']).unwrap_or(lexical);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    lexical.parse::<i64>().ok().map(LiteralValue::Integer)
}

fn parse_double(lexical: &str) -> Option<LiteralValue> {
    let value = match lexical {
        "INF" | "+INF" => f64::INFINITY,
        "-INF" => f64::NEG_INFINITY,
        "NaN" => f64::NAN,
        _ if is_numeric_lexical(lexical, true) => lexical.parse::<f64>().ok()?,
        _ => return None,
    };
    Some(LiteralValue::Double(value))
}

fn parse_decimal(lexical: &str) -> Option<LiteralValue> {
    if !is_numeric_lexical(lexical, false) {
        return None;
    }
    lexical.parse::<f64>().ok().map(LiteralValue::Double)
}

/// Rejects the non-XSD spellings Rust's float parser would accept (`inf`, `infinity`, ...).
fn is_numeric_lexical(lexical: &str, allow_exponent: bool) -> bool {
    !lexical.is_empty()
        && lexical.chars().any(|c| c.is_ascii_digit())
        && lexical.chars().all(|c| {
            c.is_ascii_digit()
                || matches!(c, '+' | '-' | '.')
                || (allow_exponent && matches!(c, 'e' | 'E'))
        })
}

fn parse_boolean(lexical: &str) -> Option<LiteralValue> {
    match lexical {
        "true" | "1" => Some(LiteralValue::Boolean(true)),
        "false" | "0" => Some(LiteralValue::Boolean(false)),
        _ => None,
    }
}

fn parse_date_time(lexical: &str) -> Option<LiteralValue> {
    if let Ok(dt) = DateTime::<FixedOffset>::parse_from_rfc3339(lexical) {
        return Some(LiteralValue::DateTime(dt));
    }
    // xsd:dateTime allows the zone offset to be omitted; read it as UTC.
    NaiveDateTime::parse_from_str(lexical, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| LiteralValue::DateTime(naive.and_utc().fixed_offset()))
}
