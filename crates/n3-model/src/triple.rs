//! Triples: the (subject, predicate, object) unit of both facts and rule
//! bodies/heads.

use crate::Term;
use std::fmt;

/// An N3 triple.
///
/// Unlike the teacher's `Triple::new`, construction here never panics on the
/// subject/predicate shape: N3 rule bodies and heads routinely carry a
/// [`Term::Variable`] in subject or predicate position (`?x :knows ?y`,
/// `?p a log:Property`), which the RDF triple the teacher modeled never
/// permitted. Only a ground [`crate::Formula`]'s toplevel facts are
/// constrained to be ground at all, and that constraint is enforced by the
/// caller that builds the fact set (spec.md §3 invariant 2), not by this
/// type.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Triple {
    /// Subject term.
    pub subject: Term,
    /// Predicate term (ordinarily an IRI, but a variable is legal in a rule
    /// body: `?s ?p ?o`).
    pub predicate: Term,
    /// Object term.
    pub object: Term,
}

impl Triple {
    /// Build a new triple from its three terms.
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Triple {
            subject,
            predicate,
            object,
        }
    }

    /// Whether every term in this triple is ground (spec.md §3 invariant 2).
    pub fn is_ground(&self) -> bool {
        self.subject.is_ground() && self.predicate.is_ground() && self.object.is_ground()
    }

    /// The dedup key used by the fact-set index (spec.md §3 invariant 6).
    pub fn dedup_key(&self) -> String {
        format!(
            "{}/{}/{}",
            self.subject.dedup_key(),
            self.predicate.dedup_key(),
            self.object.dedup_key()
        )
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn iri(s: &str) -> Term {
        Term::Iri(Rc::from(s))
    }

    #[test]
    fn variable_subject_and_predicate_are_permitted() {
        let t = Triple::new(
            Term::Variable(Rc::from("s")),
            Term::Variable(Rc::from("p")),
            Term::Variable(Rc::from("o")),
        );
        assert!(!t.is_ground());
    }

    #[test]
    fn ground_triple_reports_ground() {
        let t = Triple::new(
            iri("http://example.org/a"),
            iri("http://example.org/p"),
            Term::literal_str(Rc::from("v")),
        );
        assert!(t.is_ground());
    }

    #[test]
    fn display_renders_space_separated_terms() {
        let t = Triple::new(
            iri("http://example.org/a"),
            iri("http://example.org/p"),
            Term::literal_str(Rc::from("v")),
        );
        assert_eq!(
            t.to_string(),
            "<http://example.org/a> <http://example.org/p> \"v\""
        );
    }
}
