//! Rules and derivation records.
//!
//! No direct teacher precedent (the teacher's reasoning crate hard-codes
//! RDFS/transitive/OWL2 entailment rules in Rust, rather than modeling a
//! user-supplied rule as data); grounded structurally on
//! `reasoning::rete::ReteEngine`'s `ReasonerResult`/explicit-state idiom for
//! the surrounding `Debug`/`Clone` derive conventions, and on spec.md §3
//! "Triple and Rule" for the shape itself.

use crate::Triple;
use rustc_hash::FxHashSet;
use std::fmt;
use std::rc::Rc;

/// Which way a rule is meant to be read: forward (chained eagerly to
/// saturation) or backward (consulted on demand by the prover).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    /// `{P} => {C}` — fired during forward chaining.
    Forward,
    /// `{C} <= {B}` — consulted by the backward prover.
    Backward,
}

/// A rule: a premise and conclusion (each a sequence of triples), a
/// direction, whether it is an inference fuse, and the set of blank labels
/// that appear only in its head.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Rule {
    /// Body triples (the `{P}` / `{B}` side).
    pub premise: Vec<Triple>,
    /// Head triples (the `{C}` / `{H}` side). Empty iff the rule's
    /// conclusion was written as the literal `false`.
    pub conclusion: Vec<Triple>,
    /// Forward or backward.
    pub direction: Direction,
    /// True for forward rules whose conclusion is the literal `false`
    /// (spec.md §3: "`isFuse` is true for forward rules whose conclusion is
    /// the literal `false`"). Per spec.md §9.i, a *backward* rule with a
    /// `false` conclusion is never a fuse — that quirk is preserved here by
    /// only ever setting this flag when `direction == Direction::Forward`.
    pub is_fuse: bool,
    /// Blank node labels that occur in `conclusion` (spec.md §4.1: "blank
    /// nodes occurring only in rule heads become existentials that are
    /// Skolemized per firing").
    pub head_blank_labels: FxHashSet<Rc<str>>,
}

impl Rule {
    /// Build a forward rule (`{P} => {C}`).
    pub fn forward(premise: Vec<Triple>, conclusion: Vec<Triple>) -> Self {
        let is_fuse = conclusion.is_empty();
        let head_blank_labels = collect_blank_labels(&conclusion);
        Rule {
            premise,
            conclusion,
            direction: Direction::Forward,
            is_fuse,
            head_blank_labels,
        }
    }

    /// Build a backward rule (`{C} <= {B}`). Never a fuse, even if
    /// `conclusion` is empty (spec.md §9.i).
    pub fn backward(conclusion: Vec<Triple>, premise: Vec<Triple>) -> Self {
        let head_blank_labels = collect_blank_labels(&conclusion);
        Rule {
            premise,
            conclusion,
            direction: Direction::Backward,
            is_fuse: false,
            head_blank_labels,
        }
    }

    /// Whether `premise` and `conclusion` are both empty (a degenerate rule
    /// with no content).
    pub fn is_trivial(&self) -> bool {
        self.premise.is_empty() && self.conclusion.is_empty()
    }
}

fn collect_blank_labels(triples: &[Triple]) -> FxHashSet<Rc<str>> {
    let mut labels = FxHashSet::default();
    for triple in triples {
        collect_from_term(&triple.subject, &mut labels);
        collect_from_term(&triple.predicate, &mut labels);
        collect_from_term(&triple.object, &mut labels);
    }
    labels
}

fn collect_from_term(term: &crate::Term, labels: &mut FxHashSet<Rc<str>>) {
    use crate::Term;
    match term {
        Term::Blank(label) => {
            labels.insert(Rc::clone(label));
        }
        Term::List(items) | Term::OpenList(items, _) => {
            for item in items {
                collect_from_term(item, labels);
            }
        }
        Term::Formula(formula) => {
            for triple in &formula.triples {
                collect_from_term(&triple.subject, labels);
                collect_from_term(&triple.predicate, labels);
                collect_from_term(&triple.object, labels);
            }
        }
        Term::Iri(_) | Term::Literal(_) | Term::Variable(_) => {}
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let premise = self
            .premise
            .iter()
            .map(Triple::to_string)
            .collect::<Vec<_>>()
            .join(" . ");
        let conclusion = self
            .conclusion
            .iter()
            .map(Triple::to_string)
            .collect::<Vec<_>>()
            .join(" . ");
        match self.direction {
            Direction::Forward => write!(f, "{{ {premise} }} => {{ {conclusion} }}"),
            Direction::Backward => write!(f, "{{ {conclusion} }} <= {{ {premise} }}"),
        }
    }
}

/// A single derivation: the derived fact, the rule that produced it, the
/// instantiated premise it was proved against, and the substitution used.
/// Consumed only for explanation/streaming (spec.md §3 "DerivedFact");
/// carries no semantic weight of its own.
#[derive(Clone, Debug)]
pub struct DerivedFact {
    /// The newly derived triple.
    pub fact: Triple,
    /// The rule whose firing produced it.
    pub rule: Rc<Rule>,
    /// The premise triples as instantiated for this firing.
    pub instantiated_premise: Vec<Triple>,
    /// The substitution that proved the premise.
    pub bindings: crate::Bindings,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Term;
    use std::rc::Rc as StdRc;

    fn iri(s: &str) -> Term {
        Term::Iri(StdRc::from(s))
    }

    #[test]
    fn forward_rule_with_empty_conclusion_is_a_fuse() {
        let rule = Rule::forward(
            vec![Triple::new(iri("a"), iri("p"), iri("b"))],
            Vec::new(),
        );
        assert!(rule.is_fuse);
    }

    #[test]
    fn backward_rule_with_empty_conclusion_is_never_a_fuse() {
        let rule = Rule::backward(Vec::new(), vec![Triple::new(iri("a"), iri("p"), iri("b"))]);
        assert!(!rule.is_fuse);
    }

    #[test]
    fn head_blank_labels_collected_from_conclusion_only() {
        let rule = Rule::forward(
            vec![Triple::new(
                Term::Variable(StdRc::from("x")),
                iri("p"),
                Term::Blank(StdRc::from("body_blank")),
            )],
            vec![Triple::new(
                Term::Variable(StdRc::from("x")),
                iri("q"),
                Term::Blank(StdRc::from("head_blank")),
            )],
        );
        assert_eq!(rule.head_blank_labels.len(), 1);
        assert!(rule.head_blank_labels.contains("head_blank"));
    }
}
