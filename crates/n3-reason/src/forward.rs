//! The forward chainer (spec.md §4.5).
//!
//! Grounded on `reasoning::rdfs::RDFSReasoner::infer`'s round-based
//! fixpoint loop (apply every rule once, commit what's new, repeat until
//! nothing changes), extended with per-firing Skolemization, dynamic rule
//! installation, the inference fuse, and the layered scoped-closure
//! fixpoint. Each round borrows the current fact/rule state immutably
//! (through a fresh [`Env`]) to *collect* a buffer of derivations, then
//! drops that borrow before mutating the fact store and rule lists to
//! *commit* them — the only shape that lets one round both read and grow
//! the same working set under the borrow checker without `RefCell`ling the
//! fact store itself.

use crate::config::EngineConfig;
use crate::env::Env;
use crate::error::{ReasonError, ReasonResult};
use crate::index::{BackwardRuleIndex, FactStore};
use crate::prove::{self, ProveOptions};
use crate::skolem::SkolemGenerator;
use crate::subst::Subst;
use n3_model::{DerivedFact, Direction, Formula, Rule, Term, Triple, Vocabulary};
use std::rc::Rc;

/// Saturate `facts` against `forward_rules`/`backward_rules` (the latter
/// consulted only by builtins/backward goals nested in a forward rule's
/// premise), mutating all three to their fixpoint. Returns every
/// [`DerivedFact`] produced, in production order, alongside every
/// `(subject, string)` pair recorded by `log:outputString` during the run
/// (spec.md §4.6); `on_derived` is invoked with each derivation as it is
/// committed (spec.md §4.5 contract).
pub fn forward_chain(
    facts: &mut FactStore,
    forward_rules: &mut Vec<Rc<Rule>>,
    backward_rules: &mut BackwardRuleIndex,
    config: &EngineConfig,
    skolem: &SkolemGenerator,
    deref: Rc<n3_deref::Dereferencer>,
    mut on_derived: impl FnMut(&DerivedFact),
) -> ReasonResult<(Vec<DerivedFact>, Vec<(Term, String)>)> {
    let root_env = Env::new(facts, backward_rules, forward_rules, config, skolem, deref);
    let mut derived_log = Vec::new();
    let mut scoped_level: u32 = 0;
    let mut rounds = 0usize;

    loop {
        loop {
            rounds += 1;
            if rounds > config.max_rounds {
                return Err(ReasonError::ResourceLimit(format!(
                    "forward chaining did not reach a fixpoint within {} rounds",
                    config.max_rounds
                )));
            }

            let (new_facts, new_rules) = {
                let env = root_env.rebind(facts, backward_rules, forward_rules.as_slice());
                env.scoped_level.set(scoped_level);
                run_round(&env, forward_rules)?
            };

            let mut any_new = false;
            for derived in new_facts {
                if facts.len() >= config.max_facts {
                    return Err(ReasonError::ResourceLimit(format!(
                        "fact set exceeded {} facts",
                        config.max_facts
                    )));
                }
                if facts.insert(derived.fact.clone()) {
                    any_new = true;
                    on_derived(&derived);
                    derived_log.push(derived);
                }
            }
            for rule in new_rules {
                if install_rule(forward_rules, backward_rules, rule) {
                    any_new = true;
                }
            }

            if !any_new {
                break;
            }
        }

        let max_priority = max_scoped_priority(forward_rules, backward_rules);
        if u64::from(scoped_level) >= max_priority {
            break;
        }
        scoped_level += 1;
        let mut snapshot = FactStore::new();
        for fact in facts.all() {
            snapshot.insert((**fact).clone());
        }
        *root_env.scoped_snapshot.borrow_mut() = Some(Rc::new(snapshot));
        root_env.scoped_level.set(scoped_level);
    }
    let output_strings = root_env.output_strings.borrow().clone();
    Ok((derived_log, output_strings))
}

/// Run every forward rule once against the current, unchanging state
/// borrowed by `env`, returning the derivations and newly-promoted rules
/// to commit — none of it mutates `env`'s fact/rule state directly (spec.md
/// §4.5's contract only promises mutation "by appending", which the caller
/// does after this returns).
fn run_round(env: &Env<'_>, forward_rules: &[Rc<Rule>]) -> ReasonResult<(Vec<DerivedFact>, Vec<Rule>)> {
    let mut new_facts = Vec::new();
    let mut new_rules = Vec::new();

    for rule in forward_rules {
        if rule.is_trivial() {
            continue;
        }
        let ground_no_blanks = rule.head_blank_labels.is_empty() && rule.conclusion.iter().all(Triple::is_ground);
        if ground_no_blanks && rule.conclusion.iter().all(|t| env.facts.contains(t)) {
            continue;
        }
        let opts = ProveOptions {
            defer_builtins: true,
            max_results: if ground_no_blanks { Some(1) } else { None },
        };
        let solutions = prove::prove(&rule.premise, &Subst::new(), env, &opts);

        for subst in solutions {
            let instantiated_premise: Vec<Triple> = rule
                .premise
                .iter()
                .map(|t| Triple::new(subst.apply(&t.subject), subst.apply(&t.predicate), subst.apply(&t.object)))
                .collect();

            if rule.is_fuse {
                return Err(ReasonError::Fuse {
                    premise: instantiated_premise
                        .iter()
                        .map(Triple::to_string)
                        .collect::<Vec<_>>()
                        .join(" . "),
                });
            }

            let firing_key = firing_key_for(rule, &instantiated_premise);
            let bindings = subst.to_bindings();
            for fact in instantiate_conclusion(rule, &subst, &firing_key, env.skolem) {
                if env.facts.contains(&fact) {
                    continue;
                }
                if let Some(installed) = try_install_rule(&fact) {
                    new_rules.push(installed);
                }
                new_facts.push(DerivedFact {
                    fact,
                    rule: Rc::clone(rule),
                    instantiated_premise: instantiated_premise.clone(),
                    bindings: bindings.clone(),
                });
            }
        }
    }

    Ok((new_facts, new_rules))
}

/// Substitute `rule`'s conclusion under `subst`, Skolemizing any head-blank
/// label that survives (spec.md §4.5 "Per-firing Skolemization"). `Subst`
/// only binds [`Term::Variable`], never [`Term::Blank`], so this is a
/// second pass over the already-substituted term rather than something
/// `Subst::apply` itself can do.
fn instantiate_conclusion(rule: &Rule, subst: &Subst, firing_key: &str, skolem: &SkolemGenerator) -> Vec<Triple> {
    rule.conclusion
        .iter()
        .map(|t| {
            Triple::new(
                replace_blanks(&subst.apply(&t.subject), firing_key, skolem),
                replace_blanks(&subst.apply(&t.predicate), firing_key, skolem),
                replace_blanks(&subst.apply(&t.object), firing_key, skolem),
            )
        })
        .collect()
}

fn replace_blanks(term: &Term, firing_key: &str, skolem: &SkolemGenerator) -> Term {
    match term {
        Term::Blank(label) => Term::Blank(skolem.head_blank(firing_key, label)),
        Term::List(items) => Term::List(items.iter().map(|t| replace_blanks(t, firing_key, skolem)).collect()),
        Term::OpenList(items, tail) => Term::OpenList(
            items.iter().map(|t| replace_blanks(t, firing_key, skolem)).collect(),
            Rc::clone(tail),
        ),
        Term::Formula(formula) => Term::Formula(Rc::new(Formula::new(
            formula
                .triples
                .iter()
                .map(|t| {
                    Triple::new(
                        replace_blanks(&t.subject, firing_key, skolem),
                        replace_blanks(&t.predicate, firing_key, skolem),
                        replace_blanks(&t.object, firing_key, skolem),
                    )
                })
                .collect(),
        )),
        other => other.clone(),
    }
}

/// A key identifying "this rule, fired on this instantiated body" (spec.md
/// §4.5: "memoized on a key derived from the instantiated body"), combining
/// the rule's identity (stable for the run via its `Rc` address) with the
/// instantiated premise's dedup keys so re-firing the same rule on the same
/// data reuses the same head blanks.
fn firing_key_for(rule: &Rc<Rule>, instantiated_premise: &[Triple]) -> String {
    let mut key = format!("{:p}", Rc::as_ptr(rule));
    for t in instantiated_premise {
        key.push('|');
        key.push_str(&t.dedup_key());
    }
    key
}

/// If `triple` is `log:implies`/`log:impliedBy` between two formulas (or
/// the literal `true`, read as the empty formula), lift it into a rule
/// ready to install (spec.md §4.5 "Dynamic rule installation"): blank
/// nodes in the lifted bodies become ordinary rule variables, since a
/// derived formula's blanks (e.g. from `log:conjunction`) have no meaning
/// as existentials once read back as a rule.
pub(crate) fn try_install_rule(triple: &Triple) -> Option<Rule> {
    let pred = triple.predicate.as_iri()?;
    if pred == Vocabulary::LOG_IMPLIES {
        let premise = lift_blanks(&formula_of(&triple.subject)?.triples);
        let conclusion = lift_blanks(&formula_of(&triple.object)?.triples);
        Some(Rule::forward(premise, conclusion))
    } else if pred == Vocabulary::LOG_IMPLIED_BY {
        let conclusion = lift_blanks(&formula_of(&triple.subject)?.triples);
        let premise = lift_blanks(&formula_of(&triple.object)?.triples);
        Some(Rule::backward(conclusion, premise))
    } else {
        None
    }
}

/// A term read as a formula for dynamic rule installation: a quoted
/// formula directly, or the literal `true` standing for the empty one
/// (spec.md §4.5). The parser already desugars the `true`/`false`
/// keywords to `Term::Formula(Formula::empty())` at parse time (so this
/// second branch only matters for a `true` that arrives as a plain
/// `xsd:boolean`-shaped literal via some other derivation path).
fn formula_of(term: &Term) -> Option<Formula> {
    match term {
        Term::Formula(f) => Some((**f).clone()),
        Term::Literal(lit) if lit.as_bool() == Some(true) => Some(Formula::empty()),
        _ => None,
    }
}

fn lift_blanks(triples: &[Triple]) -> Vec<Triple> {
    triples
        .iter()
        .map(|t| Triple::new(lift_term(&t.subject), lift_term(&t.predicate), lift_term(&t.object)))
        .collect()
}

fn lift_term(term: &Term) -> Term {
    match term {
        Term::Blank(label) => Term::Variable(Rc::clone(label)),
        Term::List(items) => Term::List(items.iter().map(lift_term).collect()),
        Term::OpenList(items, tail) => Term::OpenList(items.iter().map(lift_term).collect(), Rc::clone(tail)),
        Term::Formula(formula) => Term::Formula(Rc::new(Formula::new(lift_blanks(&formula.triples)))),
        other => other.clone(),
    }
}

/// Install `rule` unless an existing rule of the same direction already has
/// structurally equal premise and conclusion (spec.md §4.5 "Duplicates ...
/// are coalesced"). Returns whether a new rule was actually added.
pub(crate) fn install_rule(forward_rules: &mut Vec<Rc<Rule>>, backward_rules: &mut BackwardRuleIndex, rule: Rule) -> bool {
    match rule.direction {
        Direction::Forward => {
            if forward_rules
                .iter()
                .any(|r| r.premise == rule.premise && r.conclusion == rule.conclusion)
            {
                return false;
            }
            forward_rules.push(Rc::new(rule));
            true
        }
        Direction::Backward => {
            if backward_rules
                .all()
                .iter()
                .any(|r| r.premise == rule.premise && r.conclusion == rule.conclusion)
            {
                return false;
            }
            backward_rules.insert(Rc::new(rule));
            true
        }
    }
}

/// The highest explicit priority `N` any installed rule's body references
/// via the priority form of `log:includes`/`log:notIncludes`/
/// `log:collectAllIn`/`log:forAllIn` (spec.md §4.5 "Layered (scoped-
/// closure) fixpoint") — `0` if none do, in which case the ladder never
/// advances past phase A.
fn max_scoped_priority(forward_rules: &[Rc<Rule>], backward_rules: &BackwardRuleIndex) -> u64 {
    let mut max = 0u64;
    let mut scan = |triples: &[Triple]| {
        for t in triples {
            let Term::Iri(pred) = &t.predicate else { continue };
            let Some((ns, local)) = Vocabulary::split_builtin(pred) else { continue };
            if ns != Vocabulary::LOG_NS || !matches!(local, "includes" | "notIncludes" | "collectAllIn" | "forAllIn") {
                continue;
            }
            // `includes`/`notIncludes` carry the priority as the subject itself;
            // `collectAllIn`'s subject is `(value {clause} scope)`, with the
            // priority as the list's last element; `forAllIn`'s priority is the
            // object, since its subject is `({where} {then})`.
            if let Some(n) = scoped_priority_literal(&t.subject) {
                max = max.max(n);
            }
            if let Some(n) = scoped_priority_literal(&t.object) {
                max = max.max(n);
            }
        }
    };
    for rule in forward_rules {
        scan(&rule.premise);
        scan(&rule.conclusion);
    }
    for rule in backward_rules.all() {
        scan(&rule.premise);
        scan(&rule.conclusion);
    }
    max
}

/// Read a positive-integer scope priority off `term`, looking inside a
/// trailing list element when `term` is itself a `(... scope)` list.
fn scoped_priority_literal(term: &Term) -> Option<u64> {
    match term {
        Term::Literal(lit) => lit.as_i64().filter(|n| *n > 0).map(|n| n as u64),
        Term::List(items) => items.last().and_then(scoped_priority_literal),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skolem::SkolemGenerator;
    use std::rc::Rc as StdRc;

    fn iri(s: &str) -> Term {
        Term::Iri(StdRc::from(s))
    }

    fn var(s: &str) -> Term {
        Term::Variable(StdRc::from(s))
    }

    #[test]
    fn forward_rule_derives_new_fact_and_stops() {
        let mut facts = FactStore::new();
        facts.insert(Triple::new(iri("a"), iri("parent"), iri("b")));
        let mut forward_rules = vec![StdRc::new(Rule::forward(
            vec![Triple::new(var("x"), iri("parent"), var("y"))],
            vec![Triple::new(var("x"), iri("ancestor"), var("y"))],
        ))];
        let mut backward_rules = BackwardRuleIndex::new();
        let config = EngineConfig::default();
        let skolem = SkolemGenerator::new(true);
        let deref = Rc::new(n3_deref::Dereferencer::new());

        let (derived, _) = forward_chain(&mut facts, &mut forward_rules, &mut backward_rules, &config, &skolem, deref, |_| {}).unwrap();

        assert_eq!(derived.len(), 1);
        assert!(facts.contains(&Triple::new(iri("a"), iri("ancestor"), iri("b"))));
    }

    #[test]
    fn fuse_rule_aborts_with_fuse_error() {
        let mut facts = FactStore::new();
        facts.insert(Triple::new(iri("a"), iri("bad"), iri("b")));
        let mut forward_rules = vec![StdRc::new(Rule::forward(
            vec![Triple::new(var("x"), iri("bad"), var("y"))],
            Vec::new(),
        ))];
        let mut backward_rules = BackwardRuleIndex::new();
        let config = EngineConfig::default();
        let skolem = SkolemGenerator::new(true);
        let deref = Rc::new(n3_deref::Dereferencer::new());

        let result = forward_chain(&mut facts, &mut forward_rules, &mut backward_rules, &config, &skolem, deref, |_| {});
        assert!(matches!(result, Err(ReasonError::Fuse { .. })));
    }

    #[test]
    fn dynamic_rule_installation_promotes_log_implies_triple() {
        let mut facts = FactStore::new();
        facts.insert(Triple::new(iri("a"), iri("flag"), iri("b")));
        let premise = Formula::new(vec![Triple::new(var("x"), iri("flag"), var("y"))]);
        let conclusion = Formula::new(vec![Triple::new(var("x"), iri("derived"), var("y"))]);
        let mut forward_rules = vec![StdRc::new(Rule::forward(
            Vec::new(),
            vec![Triple::new(
                Term::Formula(StdRc::new(premise)),
                Term::Iri(StdRc::from(Vocabulary::LOG_IMPLIES)),
                Term::Formula(StdRc::new(conclusion)),
            )],
        ))];
        let mut backward_rules = BackwardRuleIndex::new();
        let config = EngineConfig::default();
        let skolem = SkolemGenerator::new(true);
        let deref = Rc::new(n3_deref::Dereferencer::new());

        forward_chain(&mut facts, &mut forward_rules, &mut backward_rules, &config, &skolem, deref, |_| {}).unwrap();

        assert!(facts.contains(&Triple::new(iri("a"), iri("derived"), iri("b"))));
    }

    #[test]
    fn repeated_firing_of_the_same_rule_reuses_head_blank() {
        let mut facts = FactStore::new();
        facts.insert(Triple::new(iri("a"), iri("tag"), iri("x")));
        let mut forward_rules = vec![StdRc::new(Rule::forward(
            vec![Triple::new(var("x"), iri("tag"), var("y"))],
            vec![Triple::new(var("x"), iri("has"), Term::Blank(StdRc::from("fresh")))],
        ))];
        let mut backward_rules = BackwardRuleIndex::new();
        let config = EngineConfig::default();
        let skolem = SkolemGenerator::new(true);
        let deref = Rc::new(n3_deref::Dereferencer::new());

        let (derived, _) = forward_chain(&mut facts, &mut forward_rules, &mut backward_rules, &config, &skolem, deref, |_| {}).unwrap();
        assert_eq!(derived.len(), 1);
    }
}
