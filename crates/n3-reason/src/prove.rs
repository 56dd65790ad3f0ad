//! The backward (Prolog-style) prover (spec.md §4.3).
//!
//! Grounded structurally on `reasoning::rete::ReteEngine`'s explicit-agenda,
//! iterative-run shape (a worklist of pending states rather than native
//! recursion, so a pathological proof cannot blow the Rust call stack) —
//! adapted here from a RETE match agenda to a DFS goal-stack: each
//! [`Frame`] is one in-flight proof state (remaining goals, substitution,
//! the set of goals currently under rule expansion, and a deferral count),
//! popped and expanded one at a time from an explicit `Vec<Frame>` stack.

use crate::builtins;
use crate::env::Env;
use crate::subst::Subst;
use crate::unify;
use n3_model::{Rule, Term, Triple};
use rustc_hash::FxHashSet;
use std::cell::Cell;
use std::rc::Rc;

/// Options threaded through one [`prove`] call.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProveOptions {
    /// Rotate a builtin goal that fails with unbound variables to the end
    /// of the queue instead of failing it outright (spec.md §4.3 step 1
    /// "Deferral") — used when solving forward-rule bodies. Backward rule
    /// bodies disable this to preserve their written evaluation order
    /// (spec.md §4.3 step 4: "important for termination").
    pub defer_builtins: bool,
    /// Stop after this many solutions; `None` enumerates every proof.
    pub max_results: Option<usize>,
}

/// One in-flight proof state on the explicit DFS stack.
struct Frame {
    goals: Vec<Triple>,
    subst: Subst,
    /// Goals (by instantiated dedup key) currently under backward-rule
    /// expansion on this branch — the cycle guard (spec.md §4.3 step 2).
    visited: Rc<FxHashSet<String>>,
    deferrals: usize,
    /// Total goal count at the start of this proof, bounding the deferral
    /// counter (spec.md §4.3: "bounded by the number of goals").
    goal_budget: usize,
}

/// Prove `goals` under `subst`, streaming every substitution that satisfies
/// all of them, in the prover's DFS order (spec.md §4.3 contract).
pub fn prove(goals: &[Triple], subst: &Subst, env: &Env<'_>, opts: &ProveOptions) -> Vec<Subst> {
    let mut answer_vars = Vec::new();
    for goal in goals {
        collect_vars(&goal.subject, &mut answer_vars);
        collect_vars(&goal.predicate, &mut answer_vars);
        collect_vars(&goal.object, &mut answer_vars);
    }

    let mut stack = vec![Frame {
        goals: goals.to_vec(),
        subst: subst.clone(),
        visited: Rc::new(FxHashSet::default()),
        deferrals: 0,
        goal_budget: goals.len().max(1),
    }];
    let mut results = Vec::new();

    while let Some(frame) = stack.pop() {
        if let Some(limit) = opts.max_results {
            if results.len() >= limit {
                break;
            }
        }
        if frame.goals.is_empty() {
            results.push(frame.subst.gc(answer_vars.iter().cloned()));
            continue;
        }
        expand(frame, env, opts, &mut stack);
    }
    results
}

fn expand(frame: Frame, env: &Env<'_>, opts: &ProveOptions, stack: &mut Vec<Frame>) {
    let Frame {
        goals,
        subst,
        visited,
        deferrals,
        goal_budget,
    } = frame;
    let (goal, rest) = goals.split_first().expect("expand called with no goals");
    let goal = goal.clone();
    let rest: Vec<Triple> = rest.to_vec();

    // Step 1: builtin dispatch.
    if let Some(solutions) = builtins::dispatch(env, &goal, &subst) {
        if solutions.is_empty() {
            if opts.defer_builtins
                && goal_has_unbound(&goal, &subst)
                && !rest.is_empty()
                && deferrals < goal_budget
            {
                let mut rotated = rest;
                rotated.push(goal);
                stack.push(Frame {
                    goals: rotated,
                    subst,
                    visited,
                    deferrals: deferrals + 1,
                    goal_budget,
                });
            }
            return;
        }
        for solution in solutions.into_iter().rev() {
            stack.push(Frame {
                goals: rest.clone(),
                subst: solution,
                visited: Rc::clone(&visited),
                deferrals: 0,
                goal_budget,
            });
        }
        return;
    }

    let mut alternatives: Vec<Frame> = Vec::new();

    // Step 3: facts.
    let candidates = env.facts.candidates(&goal.predicate, &goal.subject, &goal.object);
    for fact in candidates {
        if let Some(bound) = unify::unify_triple(&goal, &fact, &subst) {
            alternatives.push(Frame {
                goals: rest.clone(),
                subst: bound,
                visited: Rc::clone(&visited),
                deferrals: 0,
                goal_budget,
            });
        }
    }

    // Step 2 + 4: backward rules, cycle-guarded.
    let cycle_key = instantiated_key(&goal, &subst);
    if !visited.contains(&cycle_key) {
        for rule in env.backward_rules.candidates(&goal.predicate) {
            let renamed = standardize_apart(&rule, &env.rename_counter);
            for head in &renamed.conclusion {
                let Some(bound) = unify::unify_triple(&goal, head, &subst) else {
                    continue;
                };
                let mut new_visited = (*visited).clone();
                new_visited.insert(cycle_key.clone());
                let mut new_goals = renamed.premise.clone();
                new_goals.extend(rest.clone());
                alternatives.push(Frame {
                    goals: new_goals,
                    subst: bound,
                    visited: Rc::new(new_visited),
                    deferrals: 0,
                    goal_budget,
                });
            }
        }
    }

    for alt in alternatives.into_iter().rev() {
        stack.push(alt);
    }
}

/// Whether any term in `goal`, as currently substituted, still contains an
/// unbound variable (spec.md §4.3 step 1 "Deferral").
fn goal_has_unbound(goal: &Triple, subst: &Subst) -> bool {
    !subst.apply(&goal.subject).is_ground()
        || !subst.apply(&goal.predicate).is_ground()
        || !subst.apply(&goal.object).is_ground()
}

/// The cycle-guard key for a goal: its instantiated dedup key, so two
/// syntactically different goals that happen to resolve to the same ground
/// triple share a guard, while the same written goal at different
/// bindings does not falsely collide.
fn instantiated_key(goal: &Triple, subst: &Subst) -> String {
    Triple::new(subst.apply(&goal.subject), subst.apply(&goal.predicate), subst.apply(&goal.object)).dedup_key()
}

/// Rename every variable and blank in `rule` to fresh names unique to this
/// expansion (spec.md §4.3 step 4 "Standardize rule variables to fresh
/// names"), so two firings of the same backward rule within one proof never
/// collide.
fn standardize_apart(rule: &Rule, counter: &Cell<u64>) -> Rule {
    let n = counter.get() + 1;
    counter.set(n);
    Rule {
        premise: rule.premise.iter().map(|t| rename_triple(t, n)).collect(),
        conclusion: rule.conclusion.iter().map(|t| rename_triple(t, n)).collect(),
        direction: rule.direction,
        is_fuse: rule.is_fuse,
        head_blank_labels: rule.head_blank_labels.iter().map(|label| Rc::from(format!("{label}#b{n}")) as Rc<str>).collect(),
    }
}

fn rename_triple(triple: &Triple, n: u64) -> Triple {
    Triple::new(rename_term(&triple.subject, n), rename_term(&triple.predicate, n), rename_term(&triple.object, n))
}

/// Consistently rename variables/blanks within a standardized rule copy,
/// recursing into nested lists and formulas (a quoted formula inside a rule
/// still shares the rule's variable scope, spec.md §3).
fn rename_term(term: &Term, n: u64) -> Term {
    match term {
        Term::Variable(name) => Term::Variable(Rc::from(format!("{name}#v{n}"))),
        Term::Blank(label) => Term::Blank(Rc::from(format!("{label}#b{n}"))),
        Term::List(items) => Term::List(items.iter().map(|t| rename_term(t, n)).collect()),
        Term::OpenList(items, tail) => Term::OpenList(
            items.iter().map(|t| rename_term(t, n)).collect(),
            Rc::from(format!("{tail}#v{n}")),
        ),
        Term::Formula(formula) => Term::Formula(Rc::new(n3_model::Formula::new(
            formula.triples.iter().map(|t| rename_triple(t, n)).collect(),
        ))),
        other => other.clone(),
    }
}

fn collect_vars(term: &Term, out: &mut Vec<Rc<str>>) {
    match term {
        Term::Variable(name) => out.push(Rc::clone(name)),
        Term::List(items) => items.iter().for_each(|t| collect_vars(t, out)),
        Term::OpenList(items, tail) => {
            items.iter().for_each(|t| collect_vars(t, out));
            out.push(Rc::clone(tail));
        }
        Term::Formula(formula) => {
            for t in &formula.triples {
                collect_vars(&t.subject, out);
                collect_vars(&t.predicate, out);
                collect_vars(&t.object, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::index::{BackwardRuleIndex, FactStore};
    use crate::skolem::SkolemGenerator;
    use n3_model::Rule;
    use std::rc::Rc as StdRc;

    fn iri(s: &str) -> Term {
        Term::Iri(StdRc::from(s))
    }

    fn var(s: &str) -> Term {
        Term::Variable(StdRc::from(s))
    }

    #[test]
    fn proves_a_ground_goal_against_a_stored_fact() {
        let mut facts = FactStore::new();
        facts.insert(Triple::new(iri("a"), iri("p"), iri("b")));
        let rules = BackwardRuleIndex::new();
        let config = EngineConfig::default();
        let skolem = SkolemGenerator::new(true);
        let env = Env::for_test(&facts, &rules, &config, &skolem);

        let goal = Triple::new(iri("a"), iri("p"), var("x"));
        let opts = ProveOptions::default();
        let solutions = prove(&[goal], &Subst::new(), &env, &opts);
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].resolve(&var("x")), iri("b"));
    }

    #[test]
    fn backward_rule_expands_body_into_goals() {
        let facts_store = FactStore::new();
        let mut rules = BackwardRuleIndex::new();
        rules.insert(StdRc::new(Rule::backward(
            vec![Triple::new(var("x"), iri("ancestor"), var("y"))],
            vec![Triple::new(var("x"), iri("parent"), var("y"))],
        )));
        let mut facts = facts_store;
        facts.insert(Triple::new(iri("alice"), iri("parent"), iri("bob")));
        let config = EngineConfig::default();
        let skolem = SkolemGenerator::new(true);
        let env = Env::for_test(&facts, &rules, &config, &skolem);

        let goal = Triple::new(iri("alice"), iri("ancestor"), var("who"));
        let opts = ProveOptions::default();
        let solutions = prove(&[goal], &Subst::new(), &env, &opts);
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].resolve(&var("who")), iri("bob"));
    }

    #[test]
    fn cycle_guard_prevents_infinite_rule_self_expansion() {
        let facts = FactStore::new();
        let mut rules = BackwardRuleIndex::new();
        rules.insert(StdRc::new(Rule::backward(
            vec![Triple::new(var("x"), iri("loops"), var("y"))],
            vec![Triple::new(var("x"), iri("loops"), var("y"))],
        )));
        let config = EngineConfig::default();
        let skolem = SkolemGenerator::new(true);
        let env = Env::for_test(&facts, &rules, &config, &skolem);

        let goal = Triple::new(iri("a"), iri("loops"), var("who"));
        let opts = ProveOptions::default();
        let solutions = prove(&[goal], &Subst::new(), &env, &opts);
        assert!(solutions.is_empty());
    }

    #[test]
    fn deferral_rotates_unbound_builtin_goal_until_other_goal_binds_it() {
        let facts = FactStore::new();
        let rules = BackwardRuleIndex::new();
        let config = EngineConfig::default();
        let skolem = SkolemGenerator::new(true);
        let env = Env::for_test(&facts, &rules, &config, &skolem);

        let math_iri: Rc<str> = Rc::from(format!("{}greaterThan", n3_model::Vocabulary::MATH_NS));
        let goals = vec![
            Triple::new(var("x"), Term::Iri(math_iri), Term::literal_typed(Rc::from("1"), Rc::from(n3_model::Vocabulary::XSD_INTEGER))),
            Triple::new(var("x"), iri("equalsFive"), Term::Variable(Rc::from("_unused"))),
        ];
        // math:greaterThan with an unbound subject yields no solutions and
        // has no other goal to progress it here, so this proof simply
        // fails rather than looping — the test documents that shape.
        let opts = ProveOptions { defer_builtins: true, max_results: None };
        let solutions = prove(&goals, &Subst::new(), &env, &opts);
        assert!(solutions.is_empty());
    }
}
