//! N-Triples decoding, end to end.

mod support;

use std::io::Cursor;

use strata_graph_ir::{Datatype, Term, Triple};
use strata_graph_text::{DecodeError, NTriplesDecoder};
use support::{ex, init_tracing};

fn decode_all(input: &str) -> Vec<Triple> {
    NTriplesDecoder::new(input.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

#[test]
fn single_statement_then_eof() {
    init_tracing();
    let input = "<http://example.org/s> <http://example.org/p> <http://example.org/o> .";
    let mut decoder = NTriplesDecoder::new(input.as_bytes());

    let triple = decoder.decode_triple().unwrap().unwrap();
    assert_eq!(triple, Triple::new(ex("s"), ex("p"), ex("o")));
    assert!(decoder.decode_triple().unwrap().is_none());
    assert!(decoder.decode_triple().unwrap().is_none());
    assert_eq!(decoder.statement_count(), 1);
}

#[test]
fn whitespace_and_comments_only() {
    init_tracing();
    let input = "   \n\n# a comment\n\t\n  # indented comment\n";
    let mut decoder = NTriplesDecoder::new(input.as_bytes());
    assert!(decoder.decode_triple().unwrap().is_none());
    assert_eq!(decoder.statement_count(), 0);
    assert_eq!(decoder.line(), 5);
}

#[test]
fn empty_input() {
    assert!(decode_all("").is_empty());
}

#[test]
fn unicode_escape_matches_literal_character() {
    let escaped = decode_all("<http://example.org/s> <http://example.org/p> \"\\u0053\" .");
    let direct = decode_all("<http://example.org/s> <http://example.org/p> \"S\" .");
    assert_eq!(escaped, direct);
    assert_eq!(escaped[0].o, Term::string("S"));
}

#[test]
fn disallowed_escape_is_a_lexical_error() {
    let input = "<http://example.org/s> <http://example.org/p> \"a\\zb\" .";
    let err = NTriplesDecoder::new(input.as_bytes())
        .decode_triple()
        .unwrap_err();
    assert!(matches!(err, DecodeError::Syntax { .. }));
    assert_eq!(
        err.to_string(),
        "1:49: syntax error: disallowed escape character 'z'"
    );
}

#[test]
fn crlf_line_endings() {
    let input = "<http://example.org/a> <http://example.org/p> \"x\" .\r\n\
                 <http://example.org/b> <http://example.org/p> \"y\" .\r\n";
    let triples = decode_all(input);
    assert_eq!(triples.len(), 2);
    assert_eq!(triples[1].o, Term::string("y"));
}

#[test]
fn literal_variants() {
    let input = concat!(
        "_:b0 <http://example.org/p> \"hello\"@en-GB .\n",
        "_:b0 <http://example.org/p> \"2.5\"^^<http://www.w3.org/2001/XMLSchema#double> .\n",
        "_:b0 <http://example.org/p> \"true\"^^<http://www.w3.org/2001/XMLSchema#boolean> .\n",
        "_:b0 <http://example.org/p> \"x\"^^<http://example.org/custom> .\n",
        "_:b0 <http://example.org/p> \"tab\\there\" .\n",
    );
    let objects: Vec<Term> = decode_all(input).into_iter().map(|t| t.o).collect();
    assert_eq!(
        objects,
        vec![
            Term::lang_string("hello", "en-GB"),
            Term::double(2.5),
            Term::boolean(true),
            Term::typed("x", Datatype::from_iri("http://example.org/custom")),
            Term::string("tab\there"),
        ]
    );
}

#[test]
fn errors_do_not_poison_later_lines() {
    init_tracing();
    let input = concat!(
        "<http://example.org/s> <http://example.org/p> <o> .\n",
        "<http://example.org/s> <http://example.org/p> 'single' .\n",
        "# fine after this\n",
        "<http://example.org/s> <http://example.org/p> <http://example.org/o> .\n",
    );
    let results: Vec<_> = NTriplesDecoder::new(input.as_bytes()).collect();
    assert_eq!(results.len(), 3);
    assert_eq!(
        results[0].as_ref().unwrap_err().to_string(),
        "1:47: unexpected relative IRI as object"
    );
    assert_eq!(
        results[1].as_ref().unwrap_err().position(),
        Some((2, 47))
    );
    assert_eq!(
        results[2].as_ref().unwrap(),
        &Triple::new(ex("s"), ex("p"), ex("o"))
    );
}

#[test]
fn prefixed_names_are_not_n_triples() {
    let err = NTriplesDecoder::new("ex:s <http://example.org/p> <http://example.org/o> .".as_bytes())
        .decode_triple()
        .unwrap_err();
    assert_eq!(err.to_string(), "1:1: syntax error: unexpected character 'e'");
}

#[test]
fn invalid_utf8_is_an_io_error() {
    let mut bytes = b"<http://example.org/s> <http://example.org/p> \"".to_vec();
    bytes.extend_from_slice(&[0xff, 0xfe]);
    bytes.extend_from_slice(b"\" .\n");
    let err = NTriplesDecoder::new(Cursor::new(bytes))
        .decode_triple()
        .unwrap_err();
    assert!(matches!(err, DecodeError::Io(_)));
    assert!(err.is_fatal());
}
