//! Property-based checks for saturation idempotence and scoped-closure
//! monotonicity, run over randomly generated small fact sets rather than
//! fixed examples.

use n3_model::{Term, Triple};
use n3_reason::{forward, BackwardRuleIndex, EngineConfig, FactStore, SkolemGenerator};
use proptest::prelude::*;
use std::rc::Rc;

fn node(n: u8) -> Term {
    Term::Iri(Rc::from(format!("http://example.org/n{n}")))
}

fn sub_iri() -> Term {
    Term::Iri(Rc::from("http://example.org/sub"))
}

fn transitive_sub_rule() -> n3_model::Rule {
    let x = Term::Variable(Rc::from("x"));
    let y = Term::Variable(Rc::from("y"));
    let z = Term::Variable(Rc::from("z"));
    n3_model::Rule::forward(
        vec![
            Triple::new(x.clone(), sub_iri(), y.clone()),
            Triple::new(y, sub_iri(), z.clone()),
        ],
        vec![Triple::new(x, sub_iri(), z)],
    )
}

fn saturate(facts: &[Triple]) -> FactStore {
    let mut store = FactStore::new();
    for f in facts {
        store.insert(f.clone());
    }
    let mut forward_rules = vec![Rc::new(transitive_sub_rule())];
    let mut backward_rules = BackwardRuleIndex::new();
    let config = EngineConfig::default();
    let skolem = SkolemGenerator::new(true);
    let deref = Rc::new(n3_deref::Dereferencer::new());
    forward::forward_chain(&mut store, &mut forward_rules, &mut backward_rules, &config, &skolem, deref, |_| {}).unwrap();
    store
}

proptest! {
    /// Re-running `forwardChain` over its own saturated output yields no new
    /// facts: saturation is a fixpoint, for any small set of `:sub` edges.
    #[test]
    fn saturation_is_idempotent(edges in prop::collection::vec((0u8..6, 0u8..6), 0..12)) {
        let facts: Vec<Triple> = edges.into_iter().map(|(a, b)| Triple::new(node(a), sub_iri(), node(b))).collect();

        let closure = saturate(&facts);
        let closure_facts: Vec<Triple> = closure.all().iter().map(|t| (**t).clone()).collect();
        let reclosed = saturate(&closure_facts);

        prop_assert_eq!(closure.len(), reclosed.len());
        for fact in closure.all() {
            prop_assert!(reclosed.contains(fact));
        }
    }

    /// The final fact set never contains two triples that collapse to the
    /// same dedup key (plain-literal/xsd:string normalization aside).
    #[test]
    fn saturation_never_duplicates_a_dedup_key(edges in prop::collection::vec((0u8..6, 0u8..6), 0..12)) {
        let facts: Vec<Triple> = edges.into_iter().map(|(a, b)| Triple::new(node(a), sub_iri(), node(b))).collect();
        let closure = saturate(&facts);

        let mut keys: Vec<_> = closure.all().iter().map(|t| t.dedup_key()).collect();
        let before = keys.len();
        keys.sort();
        keys.dedup();
        prop_assert_eq!(keys.len(), before);
    }
}

/// Scoped closure monotonicity: anything provable against the snapshot
/// frozen at level `M` is still provable against the (superset) snapshot
/// frozen at a later level `N >= M`, since each level only ever adds facts.
#[test]
fn collect_all_in_at_a_lower_priority_is_a_subset_at_a_higher_one() {
    let src = "\
        @prefix : <http://example.org/> .\n\
        @prefix log: <http://www.w3.org/2000/10/swap/log#> .\n\
        :x :p :a . :x :p :b .\n\
        { ?u :seed :more } => { :x :p ?u } .\n\
        :c :seed :more .\n\
        { ( ?y { :x :p ?y } 1 ) log:collectAllIn ?out1 } => { :x :level1 ?out1 } .\n\
        { ( ?y { :x :p ?y } 2 ) log:collectAllIn ?out2 } => { :x :level2 ?out2 } .";

    let config = EngineConfig::default();
    let output = n3_reason::reason_stream(src, None, &config, n3_reason::ReasonOptions::default()).unwrap();

    let level_list = |pred: &str| -> Vec<Term> {
        let iri = Term::Iri(Rc::from(format!("http://example.org/{pred}")));
        output
            .facts
            .all()
            .iter()
            .find(|t| t.predicate == iri)
            .and_then(|t| match &t.object {
                Term::List(items) => Some(items.clone()),
                _ => None,
            })
            .unwrap_or_default()
    };

    let level1 = level_list("level1");
    let level2 = level_list("level2");
    for item in &level1 {
        assert!(level2.contains(item), "{item:?} provable at level 1 but missing at level 2");
    }
}
