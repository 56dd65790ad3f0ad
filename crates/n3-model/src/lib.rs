//! Term/triple/formula/rule data model and string interning for the
//! n3reason engine.
//!
//! This crate provides the core N3 data model with:
//! - A term sum type (IRI, Literal, Variable, Blank, List, OpenList, Formula)
//! - String interning for IRIs and literal lexical forms
//! - Quoted-formula α-equivalence
//! - A base/prefix environment for QName expansion and shrinking
//!
//! # Architecture
//!
//! Follows the shape of an RDF term hierarchy (as in `rdf-model`) but for an
//! owned, single-threaded graph of terms rather than a borrowed, arena-backed
//! one: an N3 [`Formula`] owns its triples outright, so terms are built from
//! `Rc<str>` rather than `&'a str`.
//!
//! # Example
//!
//! ```rust,ignore
//! use n3_model::{Interner, Term, Triple};
//!
//! let interner = Interner::new();
//! let subject = Term::Iri(interner.intern("http://example.org/subject"));
//! let predicate = Term::Iri(interner.intern("http://example.org/predicate"));
//! let object = Term::literal_str(interner.intern("value"));
//!
//! let triple = Triple::new(subject, predicate, object);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod formula;
mod interner;
mod prefix;
mod rule;
mod term;
mod triple;
mod vocab;

pub use formula::Formula;
pub use interner::Interner;
pub use prefix::PrefixEnv;
pub use rule::{DerivedFact, Direction, Rule};
pub use term::{Literal, NumericKind, Term};
pub use triple::Triple;
pub use vocab::Vocabulary;

use std::rc::Rc;

/// A substitution snapshot: variable name to bound term. The live
/// substitution used while proving (with occurs-check binding, compaction,
/// and a binding-chain representation) lives in `n3-reason`; this is the
/// plain data record a finished or in-flight proof hands around, e.g. inside
/// a [`DerivedFact`].
pub type Bindings = rustc_hash::FxHashMap<Rc<str>, Term>;

/// Errors that can occur when working with the N3 data model itself (as
/// opposed to parse errors or proof failures, which live in their own
/// crates).
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// An IRI string was not a syntactically valid absolute IRI.
    #[error("invalid IRI: {0}")]
    InvalidIri(String),

    /// A literal's lexical form did not match its declared datatype.
    #[error("invalid literal: {0}")]
    InvalidLiteral(String),

    /// A QName could not be expanded because its prefix is unbound.
    #[error("unbound prefix in QName: {0}")]
    UnboundPrefix(String),
}

/// Result type for model-level operations.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_compiles_and_builds_a_triple() {
        let interner = Interner::new();
        let subject = Term::Iri(interner.intern("http://example.org/a"));
        let predicate = Term::Iri(interner.intern("http://example.org/p"));
        let object = Term::literal_str(interner.intern("v"));
        let triple = Triple::new(subject, predicate, object);
        assert!(triple.is_ground());
    }
}
