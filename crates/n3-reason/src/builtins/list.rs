//! `list:` builtins, plus the `rdf:first`/`rdf:rest` aliases spec.md §4.4
//! routes here when the subject resolves to a list term.
//!
//! Grounded on spec.md §4.4's catalog and §9.iii's "list builtins also
//! accept RDF-encoded list heads": [`materialize`] transparently resolves
//! an RDF cons-cell chain via [`crate::index::resolve_rdf_list`] whenever the
//! subject isn't already a [`Term::List`].

use crate::builtins::unify_one;
use crate::env::Env;
use crate::index::RdfListResolution;
use crate::prove::{self, ProveOptions};
use crate::subst::Subst;
use n3_model::{Term, Triple};
use std::cmp::Ordering;
use std::rc::Rc;

pub fn dispatch(local: &str, goal: &Triple, subst: &Subst, env: &Env<'_>) -> Vec<Subst> {
    let subject = subst.apply(&goal.subject);
    let object = &goal.object;

    match local {
        "first" => materialize(env, &subject)
            .and_then(|items| items.first().cloned())
            .map(|head| unify_one(head, object, subst))
            .unwrap_or_default(),
        "rest" => materialize(env, &subject)
            .filter(|items| !items.is_empty())
            .map(|items| unify_one(Term::List(items[1..].to_vec()), object, subst))
            .unwrap_or_default(),
        "last" => materialize(env, &subject)
            .and_then(|items| items.last().cloned())
            .map(|last| unify_one(last, object, subst))
            .unwrap_or_default(),
        "length" => materialize(env, &subject)
            .map(|items| {
                unify_one(
                    Term::literal_typed(Rc::from(items.len().to_string()), Rc::from(n3_model::Vocabulary::XSD_INTEGER)),
                    object,
                    subst,
                )
            })
            .unwrap_or_default(),
        "reverse" => materialize(env, &subject)
            .map(|mut items| {
                items.reverse();
                unify_one(Term::List(items), object, subst)
            })
            .unwrap_or_default(),
        "member" => materialize(env, &subject)
            .map(|items| items.into_iter().filter_map(|item| crate::unify::unify(&item, object, subst)).collect())
            .unwrap_or_default(),
        "in" => list_in(env, &subject, object, subst),
        "notMember" => not_member(env, &subject, object, subst),
        "memberAt" => member_at(env, &subject, object, subst),
        "iterate" => iterate(env, &subject, object, subst),
        "remove" => remove(env, &subject, object, subst),
        "map" => map_over(env, &subject, object, subst),
        "sort" => sort(env, &subject, object, subst),
        "firstRest" => first_rest(env, &subject, object, subst),
        "append" => append(env, &subject, object, subst),
        "empty" => match materialize(env, &subject) {
            Some(items) if items.is_empty() => vec![subst.clone()],
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// `?x list:in (list)` — the mirror of `member`: multi-solution over every
/// element of the object list that unifies with the subject.
fn list_in(env: &Env<'_>, subject: &Term, object: &Term, subst: &Subst) -> Vec<Subst> {
    let resolved_object = subst.apply(object);
    materialize(env, &resolved_object)
        .map(|items| items.into_iter().filter_map(|item| crate::unify::unify(subject, &item, subst)).collect())
        .unwrap_or_default()
}

/// `list list:notMember element` — succeeds once, with no new bindings,
/// iff the (ground) object does not unify with any element of the subject
/// list.
fn not_member(env: &Env<'_>, subject: &Term, object: &Term, subst: &Subst) -> Vec<Subst> {
    let resolved_object = subst.apply(object);
    if !resolved_object.is_ground() {
        return Vec::new();
    }
    let Some(items) = materialize(env, subject) else {
        return Vec::new();
    };
    let found = items.iter().any(|item| crate::unify::unify(item, &resolved_object, subst).is_some());
    if found {
        Vec::new()
    } else {
        vec![subst.clone()]
    }
}

/// `(list index) list:memberAt ?value` — the element at the (0-based,
/// bound) index.
fn member_at(env: &Env<'_>, subject: &Term, object: &Term, subst: &Subst) -> Vec<Subst> {
    let Term::List(parts) = subject else {
        return Vec::new();
    };
    let [list_term, index_term] = parts.as_slice() else {
        return Vec::new();
    };
    let Some(items) = materialize(env, list_term) else {
        return Vec::new();
    };
    let resolved_index = subst.apply(index_term);
    let Some(index) = resolved_index.as_literal().and_then(|lit| lit.as_f64()) else {
        return Vec::new();
    };
    if index < 0.0 || index.fract() != 0.0 {
        return Vec::new();
    }
    match items.get(index as usize) {
        Some(value) => unify_one(value.clone(), object, subst),
        None => Vec::new(),
    }
}

/// `(list) list:iterate (index value)` — every `(index, value)` pair, 0-based,
/// multi-solution in list order.
fn iterate(env: &Env<'_>, subject: &Term, object: &Term, subst: &Subst) -> Vec<Subst> {
    materialize(env, subject)
        .map(|items| {
            items
                .into_iter()
                .enumerate()
                .filter_map(|(index, value)| {
                    let pair = Term::List(vec![
                        Term::literal_typed(Rc::from(index.to_string()), Rc::from(n3_model::Vocabulary::XSD_INTEGER)),
                        value,
                    ]);
                    crate::unify::unify(&pair, object, subst)
                })
                .collect()
        })
        .unwrap_or_default()
}

/// `(list element) list:remove ?result` — `list` with every occurrence of
/// `element` (structurally ground-equal) removed.
fn remove(env: &Env<'_>, subject: &Term, object: &Term, subst: &Subst) -> Vec<Subst> {
    let Term::List(parts) = subject else {
        return Vec::new();
    };
    let [list_term, element_term] = parts.as_slice() else {
        return Vec::new();
    };
    let Some(items) = materialize(env, list_term) else {
        return Vec::new();
    };
    let element = subst.apply(element_term);
    let remaining: Vec<Term> = items.into_iter().filter(|item| item.dedup_key() != element.dedup_key()).collect();
    unify_one(Term::List(remaining), object, subst)
}

/// `(list predicate) list:map ?out` — for each element, proves `(element
/// predicate ?out)` via the backward prover (spec.md §4.5/§9: "`list:map`
/// ... call back into the prover"), multi-solution per element.
fn map_over(env: &Env<'_>, subject: &Term, object: &Term, subst: &Subst) -> Vec<Subst> {
    let Term::List(parts) = subject else {
        return Vec::new();
    };
    let [list_term, predicate_term] = parts.as_slice() else {
        return Vec::new();
    };
    let Some(items) = materialize(env, list_term) else {
        return Vec::new();
    };
    let Term::Iri(predicate) = subst.apply(predicate_term) else {
        return Vec::new();
    };
    let opts = ProveOptions { defer_builtins: true, max_results: None };
    let mut results = Vec::new();
    for item in items {
        let goal = Triple::new(item, Term::Iri(Rc::clone(&predicate)), object.clone());
        results.extend(prove::prove(std::slice::from_ref(&goal), subst, env, &opts));
    }
    results
}

/// `list:sort` — stable, numeric values ordered by value and sorted ahead
/// of every non-numeric element, which are compared lexicographically
/// (spec.md §4.4).
fn sort(env: &Env<'_>, subject: &Term, object: &Term, subst: &Subst) -> Vec<Subst> {
    materialize(env, subject)
        .map(|mut items| {
            items.sort_by(compare_for_sort);
            unify_one(Term::List(items), object, subst)
        })
        .unwrap_or_default()
}

fn compare_for_sort(a: &Term, b: &Term) -> Ordering {
    let a_num = a.as_literal().and_then(|lit| lit.as_f64());
    let b_num = b.as_literal().and_then(|lit| lit.as_f64());
    match (a_num, b_num) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => lexical_form(a).cmp(&lexical_form(b)),
    }
}

fn lexical_form(term: &Term) -> String {
    term.as_literal().map(|lit| lit.lex.to_string()).unwrap_or_else(|| term.dedup_key())
}

/// `list:firstRest` — `(first, rest)` in one call.
fn first_rest(env: &Env<'_>, subject: &Term, object: &Term, subst: &Subst) -> Vec<Subst> {
    materialize(env, subject)
        .filter(|items| !items.is_empty())
        .map(|items| {
            let first = items[0].clone();
            let rest = Term::List(items[1..].to_vec());
            unify_one(Term::List(vec![first, rest]), object, subst)
        })
        .unwrap_or_default()
}

/// Closed lists materialize directly; an RDF-encoded list head materializes
/// via [`crate::index::resolve_rdf_list`]; anything else (an open list, a
/// non-list ground term) has no list reading.
fn materialize(env: &Env<'_>, term: &Term) -> Option<Vec<Term>> {
    match term {
        Term::List(items) => Some(items.clone()),
        Term::OpenList(..) => None,
        _ => match crate::index::resolve_rdf_list(env.facts, term) {
            RdfListResolution::List(items) => Some(items),
            RdfListResolution::Rejected | RdfListResolution::NotAList => None,
        },
    }
}

/// `(list1 list2) list:append list3`.
fn append(env: &Env<'_>, subject: &Term, object: &Term, subst: &Subst) -> Vec<Subst> {
    let Term::List(parts) = subject else {
        return Vec::new();
    };
    let [first, second] = parts.as_slice() else {
        return Vec::new();
    };
    let (Some(a), Some(b)) = (materialize(env, first), materialize(env, second)) else {
        return Vec::new();
    };
    let mut combined = a;
    combined.extend(b);
    crate::unify::unify_for_list_append(&Term::List(combined), object, subst)
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::index::{BackwardRuleIndex, FactStore};
    use crate::skolem::SkolemGenerator;

    fn s(v: &str) -> Term {
        Term::literal_str(Rc::from(v))
    }

    fn test_env<'a>(
        facts: &'a FactStore,
        rules: &'a BackwardRuleIndex,
        config: &'a EngineConfig,
        skolem: &'a SkolemGenerator,
    ) -> Env<'a> {
        Env::for_test(facts, rules, config, skolem)
    }

    fn triple_for(local: &str, subject: Term, object: Term) -> Triple {
        Triple::new(
            subject,
            Term::Iri(Rc::from(format!("{}{}", n3_model::Vocabulary::LIST_NS, local))),
            object,
        )
    }

    #[test]
    fn first_and_rest_of_closed_list() {
        let facts = FactStore::new();
        let rules = BackwardRuleIndex::new();
        let config = EngineConfig::default();
        let skolem = SkolemGenerator::new(true);
        let env = test_env(&facts, &rules, &config, &skolem);
        let list = Term::List(vec![s("a"), s("b"), s("c")]);

        let goal = triple_for("first", list.clone(), Term::Variable(Rc::from("x")));
        let solutions = dispatch("first", &goal, &Subst::new(), &env);
        assert_eq!(solutions[0].resolve(&Term::Variable(Rc::from("x"))), s("a"));

        let goal = triple_for("rest", list, Term::Variable(Rc::from("x")));
        let solutions = dispatch("rest", &goal, &Subst::new(), &env);
        assert_eq!(
            solutions[0].resolve(&Term::Variable(Rc::from("x"))),
            Term::List(vec![s("b"), s("c")])
        );
    }

    #[test]
    fn member_yields_one_solution_per_element() {
        let facts = FactStore::new();
        let rules = BackwardRuleIndex::new();
        let config = EngineConfig::default();
        let skolem = SkolemGenerator::new(true);
        let env = test_env(&facts, &rules, &config, &skolem);
        let list = Term::List(vec![s("a"), s("b")]);
        let goal = triple_for("member", list, Term::Variable(Rc::from("x")));
        let solutions = dispatch("member", &goal, &Subst::new(), &env);
        assert_eq!(solutions.len(), 2);
    }

    #[test]
    fn rdf_encoded_list_materializes_via_fact_store() {
        let mut facts = FactStore::new();
        let n1 = Term::Iri(Rc::from("http://example.org/n1"));
        let n2 = Term::Iri(Rc::from("http://example.org/n2"));
        let nil = Term::Iri(Rc::from(n3_model::Vocabulary::RDF_NIL));
        facts.insert(Triple::new(n1.clone(), Term::Iri(Rc::from(n3_model::Vocabulary::RDF_FIRST)), s("a")));
        facts.insert(Triple::new(n1.clone(), Term::Iri(Rc::from(n3_model::Vocabulary::RDF_REST)), n2.clone()));
        facts.insert(Triple::new(n2.clone(), Term::Iri(Rc::from(n3_model::Vocabulary::RDF_FIRST)), s("b")));
        facts.insert(Triple::new(n2, Term::Iri(Rc::from(n3_model::Vocabulary::RDF_REST)), nil));
        let rules = BackwardRuleIndex::new();
        let config = EngineConfig::default();
        let skolem = SkolemGenerator::new(true);
        let env = test_env(&facts, &rules, &config, &skolem);
        let goal = triple_for("length", n1, Term::Variable(Rc::from("n")));
        let solutions = dispatch("length", &goal, &Subst::new(), &env);
        assert_eq!(
            solutions[0].resolve(&Term::Variable(Rc::from("n"))),
            Term::literal_typed(Rc::from("2"), Rc::from(n3_model::Vocabulary::XSD_INTEGER))
        );
    }

    fn int(v: i64) -> Term {
        Term::literal_typed(Rc::from(v.to_string()), Rc::from(n3_model::Vocabulary::XSD_INTEGER))
    }

    #[test]
    fn in_mirrors_member_with_subject_and_object_swapped() {
        let facts = FactStore::new();
        let rules = BackwardRuleIndex::new();
        let config = EngineConfig::default();
        let skolem = SkolemGenerator::new(true);
        let env = test_env(&facts, &rules, &config, &skolem);
        let list = Term::List(vec![s("a"), s("b")]);
        let goal = triple_for("in", Term::Variable(Rc::from("x")), list);
        let solutions = dispatch("in", &goal, &Subst::new(), &env);
        assert_eq!(solutions.len(), 2);
    }

    #[test]
    fn not_member_succeeds_when_element_absent() {
        let facts = FactStore::new();
        let rules = BackwardRuleIndex::new();
        let config = EngineConfig::default();
        let skolem = SkolemGenerator::new(true);
        let env = test_env(&facts, &rules, &config, &skolem);
        let list = Term::List(vec![s("a"), s("b")]);
        let goal = triple_for("notMember", list.clone(), s("z"));
        assert_eq!(dispatch("notMember", &goal, &Subst::new(), &env).len(), 1);
        let goal = triple_for("notMember", list, s("a"));
        assert!(dispatch("notMember", &goal, &Subst::new(), &env).is_empty());
    }

    #[test]
    fn member_at_returns_element_at_index() {
        let facts = FactStore::new();
        let rules = BackwardRuleIndex::new();
        let config = EngineConfig::default();
        let skolem = SkolemGenerator::new(true);
        let env = test_env(&facts, &rules, &config, &skolem);
        let subject = Term::List(vec![Term::List(vec![s("a"), s("b"), s("c")]), int(1)]);
        let goal = triple_for("memberAt", subject, Term::Variable(Rc::from("x")));
        let solutions = dispatch("memberAt", &goal, &Subst::new(), &env);
        assert_eq!(solutions[0].resolve(&Term::Variable(Rc::from("x"))), s("b"));
    }

    #[test]
    fn iterate_produces_index_value_pairs() {
        let facts = FactStore::new();
        let rules = BackwardRuleIndex::new();
        let config = EngineConfig::default();
        let skolem = SkolemGenerator::new(true);
        let env = test_env(&facts, &rules, &config, &skolem);
        let list = Term::List(vec![s("a"), s("b")]);
        let goal = triple_for("iterate", list, Term::Variable(Rc::from("x")));
        let solutions = dispatch("iterate", &goal, &Subst::new(), &env);
        assert_eq!(solutions.len(), 2);
        assert_eq!(
            solutions[0].resolve(&Term::Variable(Rc::from("x"))),
            Term::List(vec![int(0), s("a")])
        );
    }

    #[test]
    fn remove_drops_every_matching_occurrence() {
        let facts = FactStore::new();
        let rules = BackwardRuleIndex::new();
        let config = EngineConfig::default();
        let skolem = SkolemGenerator::new(true);
        let env = test_env(&facts, &rules, &config, &skolem);
        let subject = Term::List(vec![Term::List(vec![s("a"), s("b"), s("a")]), s("a")]);
        let goal = triple_for("remove", subject, Term::Variable(Rc::from("x")));
        let solutions = dispatch("remove", &goal, &Subst::new(), &env);
        assert_eq!(
            solutions[0].resolve(&Term::Variable(Rc::from("x"))),
            Term::List(vec![s("b")])
        );
    }

    #[test]
    fn sort_orders_numbers_before_strings_and_is_stable() {
        let facts = FactStore::new();
        let rules = BackwardRuleIndex::new();
        let config = EngineConfig::default();
        let skolem = SkolemGenerator::new(true);
        let env = test_env(&facts, &rules, &config, &skolem);
        let list = Term::List(vec![s("b"), int(2), s("a"), int(1)]);
        let goal = triple_for("sort", list, Term::Variable(Rc::from("x")));
        let solutions = dispatch("sort", &goal, &Subst::new(), &env);
        assert_eq!(
            solutions[0].resolve(&Term::Variable(Rc::from("x"))),
            Term::List(vec![int(1), int(2), s("a"), s("b")])
        );
    }

    #[test]
    fn first_rest_pairs_head_and_tail() {
        let facts = FactStore::new();
        let rules = BackwardRuleIndex::new();
        let config = EngineConfig::default();
        let skolem = SkolemGenerator::new(true);
        let env = test_env(&facts, &rules, &config, &skolem);
        let list = Term::List(vec![s("a"), s("b"), s("c")]);
        let goal = triple_for("firstRest", list, Term::Variable(Rc::from("x")));
        let solutions = dispatch("firstRest", &goal, &Subst::new(), &env);
        assert_eq!(
            solutions[0].resolve(&Term::Variable(Rc::from("x"))),
            Term::List(vec![s("a"), Term::List(vec![s("b"), s("c")])])
        );
    }

    #[test]
    fn map_applies_predicate_to_each_element() {
        let mut facts = FactStore::new();
        let double_iri: Rc<str> = Rc::from("http://example.org/double");
        facts.insert(Triple::new(int(1), Term::Iri(Rc::clone(&double_iri)), int(2)));
        facts.insert(Triple::new(int(2), Term::Iri(Rc::clone(&double_iri)), int(4)));
        let rules = BackwardRuleIndex::new();
        let config = EngineConfig::default();
        let skolem = SkolemGenerator::new(true);
        let env = test_env(&facts, &rules, &config, &skolem);
        let subject = Term::List(vec![Term::List(vec![int(1), int(2)]), Term::Iri(double_iri)]);
        let goal = triple_for("map", subject, Term::Variable(Rc::from("x")));
        let solutions = dispatch("map", &goal, &Subst::new(), &env);
        let mut results: Vec<Term> = solutions.into_iter().map(|s| s.resolve(&Term::Variable(Rc::from("x")))).collect();
        results.sort_by(compare_for_sort);
        assert_eq!(results, vec![int(2), int(4)]);
    }
}
