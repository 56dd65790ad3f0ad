//! Quoted formulas: `{ ... }` reified as a term.
//!
//! No teacher precedent (the teacher's RDF-star `QuotedTriple` reifies a
//! single triple, not a graph) — grounded structurally on `rdf-model::Triple`
//! for the surrounding `Display`/dedup-key conventions, and on spec.md §3's
//! "Formula" row and invariant 4 (α-equivalence) for the semantics.

use crate::Triple;
use rustc_hash::FxHashMap;
use std::fmt;

/// An ordered sequence of triples, reified as a term.
///
/// Structural (derived) equality is order-sensitive and exact — it is what
/// the fact-set dedup key (§3 invariant 6) uses when a formula appears
/// verbatim as a stored term. [`Formula::alpha_equivalent`] is the separate,
/// order-insensitive, renaming-aware equality the unifier consults (spec.md
/// §3 invariant 4, §4.2 "Formulas unify by...").
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Formula {
    /// The formula's triples, in source order.
    pub triples: Vec<Triple>,
}

impl Formula {
    /// Build a formula from its triples.
    pub fn new(triples: Vec<Triple>) -> Self {
        Formula { triples }
    }

    /// The empty formula — the term that `true` desugars to (spec.md §4.1).
    pub fn empty() -> Self {
        Formula { triples: Vec::new() }
    }

    /// Whether this formula has no triples.
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// The dedup key for this formula as it appears verbatim in a stored
    /// term (order-sensitive; see struct docs for why this differs from
    /// [`Formula::alpha_equivalent`]).
    pub fn dedup_key(&self) -> String {
        let mut key = String::from("[");
        for triple in &self.triples {
            key.push_str(&triple.dedup_key());
            key.push(';');
        }
        key.push(']');
        key
    }

    /// Two formulas are α-equivalent iff there is a bijective renaming of
    /// variables and of blank labels mapping one triple multiset onto the
    /// other, matched order-insensitively (spec.md §3 invariant 4).
    ///
    /// Implemented as backtracking search over pairings between `self`'s
    /// triples and `other`'s: formulas quoted in N3 rule bodies are small
    /// (single-digit triple counts in practice), so the combinatorial cost
    /// of trying all pairings is not a concern in the way it would be for a
    /// general graph-isomorphism problem.
    pub fn alpha_equivalent(&self, other: &Formula) -> bool {
        if self.triples.len() != other.triples.len() {
            return false;
        }
        let mut var_map = FxHashMap::default();
        let mut blank_map = FxHashMap::default();
        let mut used = vec![false; other.triples.len()];
        match_remaining(&self.triples, &other.triples, &mut used, &mut var_map, &mut blank_map)
    }
}

fn match_remaining(
    lhs: &[Triple],
    rhs: &[Triple],
    used: &mut [bool],
    var_map: &mut FxHashMap<String, String>,
    blank_map: &mut FxHashMap<String, String>,
) -> bool {
    let Some((first, rest)) = lhs.split_first() else {
        return true;
    };
    for (idx, candidate) in rhs.iter().enumerate() {
        if used[idx] {
            continue;
        }
        let mut var_map_try = var_map.clone();
        let mut blank_map_try = blank_map.clone();
        if triples_alpha_match(first, candidate, &mut var_map_try, &mut blank_map_try) {
            used[idx] = true;
            if match_remaining(rest, rhs, used, &mut var_map_try, &mut blank_map_try) {
                *var_map = var_map_try;
                *blank_map = blank_map_try;
                return true;
            }
            used[idx] = false;
        }
    }
    false
}

fn triples_alpha_match(
    a: &Triple,
    b: &Triple,
    var_map: &mut FxHashMap<String, String>,
    blank_map: &mut FxHashMap<String, String>,
) -> bool {
    terms_alpha_match(&a.subject, &b.subject, var_map, blank_map)
        && terms_alpha_match(&a.predicate, &b.predicate, var_map, blank_map)
        && terms_alpha_match(&a.object, &b.object, var_map, blank_map)
}

fn terms_alpha_match(
    a: &crate::Term,
    b: &crate::Term,
    var_map: &mut FxHashMap<String, String>,
    blank_map: &mut FxHashMap<String, String>,
) -> bool {
    use crate::Term;
    match (a, b) {
        (Term::Variable(x), Term::Variable(y)) => consistent_rename(var_map, x, y),
        (Term::Blank(x), Term::Blank(y)) => consistent_rename(blank_map, x, y),
        (Term::Iri(x), Term::Iri(y)) => x == y,
        (Term::Literal(x), Term::Literal(y)) => x == y,
        (Term::List(xs), Term::List(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .zip(ys.iter())
                    .all(|(x, y)| terms_alpha_match(x, y, var_map, blank_map))
        }
        (Term::OpenList(xs, xt), Term::OpenList(ys, yt)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .zip(ys.iter())
                    .all(|(x, y)| terms_alpha_match(x, y, var_map, blank_map))
                && consistent_rename(var_map, xt, yt)
        }
        (Term::Formula(x), Term::Formula(y)) => x.alpha_equivalent(y),
        _ => false,
    }
}

fn consistent_rename(map: &mut FxHashMap<String, String>, from: &str, to: &str) -> bool {
    match map.get(from) {
        Some(existing) => existing == to,
        None => {
            if map.values().any(|v| v == to) {
                return false;
            }
            map.insert(from.to_string(), to.to_string());
            true
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, triple) in self.triples.iter().enumerate() {
            if i > 0 {
                write!(f, " . ")?;
            }
            write!(f, "{triple}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Term;
    use std::rc::Rc;

    fn iri(s: &str) -> Term {
        Term::Iri(Rc::from(s))
    }

    #[test]
    fn alpha_equivalent_under_variable_renaming() {
        let f1 = Formula::new(vec![Triple::new(
            Term::Variable(Rc::from("x")),
            iri("http://example.org/knows"),
            Term::Variable(Rc::from("y")),
        )]);
        let f2 = Formula::new(vec![Triple::new(
            Term::Variable(Rc::from("a")),
            iri("http://example.org/knows"),
            Term::Variable(Rc::from("b")),
        )]);
        assert!(f1.alpha_equivalent(&f2));
    }

    #[test]
    fn not_alpha_equivalent_when_renaming_is_inconsistent() {
        let f1 = Formula::new(vec![
            Triple::new(
                Term::Variable(Rc::from("x")),
                iri("http://example.org/p"),
                Term::Variable(Rc::from("x")),
            ),
        ]);
        let f2 = Formula::new(vec![
            Triple::new(
                Term::Variable(Rc::from("a")),
                iri("http://example.org/p"),
                Term::Variable(Rc::from("b")),
            ),
        ]);
        assert!(!f1.alpha_equivalent(&f2));
    }

    #[test]
    fn order_insensitive_match_of_triple_multiset() {
        let f1 = Formula::new(vec![
            Triple::new(iri("http://example.org/a"), iri("http://example.org/p"), iri("http://example.org/1")),
            Triple::new(iri("http://example.org/b"), iri("http://example.org/p"), iri("http://example.org/2")),
        ]);
        let f2 = Formula::new(vec![
            Triple::new(iri("http://example.org/b"), iri("http://example.org/p"), iri("http://example.org/2")),
            Triple::new(iri("http://example.org/a"), iri("http://example.org/p"), iri("http://example.org/1")),
        ]);
        assert!(f1.alpha_equivalent(&f2));
        assert_ne!(f1, f2, "structural equality stays order-sensitive");
    }

    #[test]
    fn dedup_key_is_order_sensitive() {
        let f1 = Formula::new(vec![
            Triple::new(iri("http://example.org/a"), iri("http://example.org/p"), iri("http://example.org/1")),
            Triple::new(iri("http://example.org/b"), iri("http://example.org/p"), iri("http://example.org/2")),
        ]);
        let f2 = Formula::new(vec![
            Triple::new(iri("http://example.org/b"), iri("http://example.org/p"), iri("http://example.org/2")),
            Triple::new(iri("http://example.org/a"), iri("http://example.org/p"), iri("http://example.org/1")),
        ]);
        assert_ne!(f1.dedup_key(), f2.dedup_key());
    }
}
