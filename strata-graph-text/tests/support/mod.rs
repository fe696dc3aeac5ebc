//! Shared helpers for the decoder integration tests.

#![allow(dead_code)]

use strata_graph_ir::Term;
use tracing_subscriber::EnvFilter;

/// Install a test subscriber that honors `RUST_LOG`; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// IRI term in the `http://example.org/` namespace.
pub fn ex(local: &str) -> Term {
    Term::iri(format!("http://example.org/{}", local))
}
