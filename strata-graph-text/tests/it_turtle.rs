//! Turtle decoding, end to end.

mod support;

use std::collections::HashSet;

use strata_graph_ir::{Term, Triple};
use strata_graph_text::{DecodeError, TurtleDecoder, TurtleOptions};
use strata_vocab::rdf;
use support::{ex, init_tracing};

fn decode_all(input: &str) -> Vec<Triple> {
    TurtleDecoder::new(input.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

fn first_error(input: &str) -> DecodeError {
    TurtleDecoder::new(input.as_bytes())
        .find_map(|r| r.err())
        .unwrap()
}

#[test]
fn directive_only_document() {
    init_tracing();
    let input = "@prefix ex: <http://example.org/> .\n\
                 @base <http://example.org/base/> .\n\
                 PREFIX foaf: <http://xmlns.com/foaf/0.1/>\n";
    let mut decoder = TurtleDecoder::new(input.as_bytes());
    assert!(decoder.decode_triple().unwrap().is_none());
    assert!(decoder.decode_triple().unwrap().is_none());
    assert_eq!(decoder.prefixes().len(), 2);
    assert_eq!(decoder.base_iri(), Some("http://example.org/base/"));
}

#[test]
fn whitespace_and_comments_only() {
    assert!(decode_all("\n   \n# nothing here\n\t# or here\n").is_empty());
}

#[test]
fn anonymous_blank_nodes_are_distinct_and_ordered() {
    let input = "@prefix ex: <http://example.org/> .\n\
                 ex:s ex:p [] , [] .\n\
                 [] ex:q [] .\n";
    let triples = decode_all(input);
    let labels: Vec<String> = triples
        .iter()
        .flat_map(|t| [&t.s, &t.o])
        .filter_map(|term| term.as_blank().map(|b| b.as_str().to_string()))
        .collect();
    assert_eq!(labels, vec!["genid1", "genid2", "genid3", "genid4"]);
    let unique: HashSet<&String> = labels.iter().collect();
    assert_eq!(unique.len(), labels.len());
}

#[test]
fn collection_desugaring() {
    init_tracing();
    let triples = decode_all("<http://example.org/s> <http://example.org/p> (<http://example.org/a> <http://example.org/b>) .");
    let b1 = Term::blank("genid1");
    let b2 = Term::blank("genid2");
    let first = Term::iri(rdf::FIRST);
    let rest = Term::iri(rdf::REST);

    assert_eq!(triples.len(), 5);
    assert_eq!(
        triples,
        vec![
            Triple::new(ex("s"), ex("p"), b1.clone()),
            Triple::new(b1.clone(), first.clone(), ex("a")),
            Triple::new(b1, rest.clone(), b2.clone()),
            Triple::new(b2.clone(), first, ex("b")),
            Triple::new(b2, rest, Term::iri(rdf::NIL)),
        ]
    );
}

#[test]
fn unicode_escape_matches_literal_character() {
    let escaped = decode_all("<http://example.org/s> <http://example.org/p> \"\\u0053\" .");
    let direct = decode_all("<http://example.org/s> <http://example.org/p> 'S' .");
    assert_eq!(escaped, direct);
    assert_eq!(escaped[0].o, Term::string("S"));
}

#[test]
fn disallowed_escape_is_a_lexical_error() {
    let err = first_error("<http://example.org/s> <http://example.org/p> \"bad \\z\" .");
    assert!(err.to_string().ends_with("syntax error: disallowed escape character 'z'"));
    assert_eq!(err.position(), Some((1, 52)));
}

#[test]
fn multi_line_long_literal() {
    let input = "@prefix ex: <http://example.org/> .\n\
                 ex:s ex:p \"\"\"first line\n\
                 \n\
                 # still inside\n\
                 last \"quoted\" line\"\"\" ;\n\
                 \x20   ex:q 1 .\n";
    let triples = decode_all(input);
    assert_eq!(triples.len(), 2);
    assert_eq!(
        triples[0].o,
        Term::string("first line\n\n# still inside\nlast \"quoted\" line")
    );
    assert_eq!(triples[1], Triple::new(ex("s"), ex("q"), Term::integer(1)));
}

#[test]
fn base_resolution() {
    let input = "@base <http://example.org/a/b/c> .\n\
                 <../d> <#p> <?q=1> .\n\
                 @base <x/> .\n\
                 <y> <http://example.org/p> <> .\n";
    let triples = decode_all(input);
    assert_eq!(
        triples[0],
        Triple::new(
            Term::iri("http://example.org/a/d"),
            Term::iri("http://example.org/a/b/c#p"),
            Term::iri("http://example.org/a/b/c?q=1"),
        )
    );
    assert_eq!(triples[1].s, Term::iri("http://example.org/a/b/x/y"));
    assert_eq!(triples[1].o, Term::iri("http://example.org/a/b/x/"));
}

#[test]
fn prefix_namespace_may_be_relative() {
    let input = "@base <http://example.org/> .\n\
                 @prefix v: <vocab#> .\n\
                 v:s v:p v:o .\n";
    let triples = decode_all(input);
    assert_eq!(triples[0].p, Term::iri("http://example.org/vocab#p"));
}

#[test]
fn options_seed_the_context() {
    let options = TurtleOptions::default()
        .with_base("http://example.org/")
        .with_prefix("ex", "http://example.org/")
        .with_blank_node_prefix("n");
    let input = "<s> ex:p [ ex:q ex:o ] .";
    let triples: Vec<Triple> = TurtleDecoder::with_options(input.as_bytes(), options)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        triples,
        vec![
            Triple::new(ex("s"), ex("p"), Term::blank("n1")),
            Triple::new(Term::blank("n1"), ex("q"), ex("o")),
        ]
    );
}

#[test]
fn redefined_prefix_takes_effect() {
    let input = "@prefix ex: <http://example.org/one/> .\n\
                 ex:a ex:b ex:c .\n\
                 @prefix ex: <http://example.org/two/> .\n\
                 ex:a ex:b ex:c .\n";
    let triples = decode_all(input);
    assert_eq!(triples[0].s, Term::iri("http://example.org/one/a"));
    assert_eq!(triples[1].s, Term::iri("http://example.org/two/a"));
}

#[test]
fn unterminated_collection_is_fatal() {
    init_tracing();
    let input = "@prefix ex: <http://example.org/> .\nex:s ex:p ( ex:a ex:b\n";
    let mut decoder = TurtleDecoder::new(input.as_bytes());
    let err = decoder.decode_triple().unwrap_err();
    assert!(matches!(err, DecodeError::Fatal { .. }));
    assert_eq!(err.to_string(), "3:1: syntax error: unterminated collection");
    assert!(decoder.decode_triple().unwrap().is_none());
}

#[test]
fn statement_errors_report_positions() {
    let err = first_error("@prefix ex: <http://example.org/> .\nex:s \"lit\" ex:o .\n");
    assert_eq!(err.to_string(), "2:6: unexpected literal as predicate");

    let err = first_error("@prefix ex: <http://example.org/> .\nex:s ex:p ex:o ex:z .\n");
    assert_eq!(err.to_string(), "2:16: expected '.', got prefixed name");

    let err = first_error("@prefix ex <http://example.org/> .\n");
    assert_eq!(err.to_string(), "1:9: syntax error: unknown keyword 'ex' (missing ':'?)");
}

#[test]
fn declarations_survive_a_failed_statement() {
    let input = "@prefix ex: <http://example.org/> .\n\
                 ex:s ex:p .\n\
                 ex:s ex:p ex:o .\n";
    let results: Vec<_> = TurtleDecoder::new(input.as_bytes()).collect();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_err());
    assert_eq!(
        results[1].as_ref().unwrap(),
        &Triple::new(ex("s"), ex("p"), ex("o"))
    );
}

#[test]
fn declaration_after_a_failed_literal_statement() {
    init_tracing();
    let input = "\"x\" <http://example.org/p> <http://example.org/o> .\n\
                 @prefix ex: <http://example.org/> .\n\
                 ex:a ex:b ex:c .\n";
    let results: Vec<_> = TurtleDecoder::new(input.as_bytes()).collect();
    assert_eq!(results.len(), 2);
    assert_eq!(
        results[0].as_ref().unwrap_err().to_string(),
        "1:1: unexpected literal as subject"
    );
    assert_eq!(
        results[1].as_ref().unwrap(),
        &Triple::new(ex("a"), ex("b"), ex("c"))
    );
}
