//! `log:` builtins (spec.md §4.4): formula algebra, dereferencing, dynamic
//! rule queries, and the layered scoped-closure predicates (§4.5).
//!
//! No teacher precedent — this namespace has no analogue in the teacher's
//! own domain. Grounded on [`crate::env::Env`]'s documented contract for
//! `scoped_snapshot`/`scoped_level` (priority-form evaluation), `with_scope`
//! (explicit-scope-formula evaluation), `deref` (`content`/`semantics`), and
//! `skolem` (the `skolem` builtin); `conclusion`'s local saturation reuses
//! [`crate::forward::forward_chain`] exactly as the top-level reasoner does.

use crate::builtins::unify_one;
use crate::env::Env;
use crate::index::{BackwardRuleIndex, FactStore};
use crate::prove::{self, ProveOptions};
use crate::subst::Subst;
use n3_model::{Formula, Term, Triple, Vocabulary};
use rustc_hash::FxHashSet;
use std::rc::Rc;

pub fn dispatch(local: &str, goal: &Triple, subst: &Subst, env: &Env<'_>) -> Vec<Subst> {
    let subject = subst.apply(&goal.subject);
    let object = &goal.object;

    match local {
        "equalTo" => crate::unify::unify(&subject, &subst.apply(object), subst).into_iter().collect(),
        "notEqualTo" => {
            if crate::unify::unify(&subject, &subst.apply(object), subst).is_some() {
                Vec::new()
            } else {
                vec![subst.clone()]
            }
        }
        "conjunction" => conjunction(&subject, object, subst),
        "conclusion" => conclusion(env, &subject, object, subst),
        "content" => content(env, &subject, object, subst),
        "semantics" => semantics(env, &subject, object, subst, false),
        "semanticsOrError" => semantics(env, &subject, object, subst, true),
        "parsedAsN3" => parsed_as_n3(&subject, object, subst),
        "rawType" => raw_type(env, &subject, object, subst),
        "dtlit" => dtlit(&subject, object, subst),
        "langlit" => langlit(&subject, object, subst),
        "implies" => rule_query(env, &subject, object, subst, true),
        "impliedBy" => rule_query(env, &subject, object, subst, false),
        "includes" => includes(env, &subject, object, subst, false),
        "notIncludes" => includes(env, &subject, object, subst, true),
        "collectAllIn" => collect_all_in(env, &subject, object, subst),
        "forAllIn" => for_all_in(env, &subject, object, subst),
        "trace" => {
            tracing::info!(message = %subst.apply(&subject), "log:trace");
            vec![subst.clone()]
        }
        "outputString" => output_string(env, &subject, object, subst),
        "skolem" => skolem(env, &subject, object, subst),
        "uri" => uri(&subject, object, subst),
        _ => Vec::new(),
    }
}

/// `(f1 f2 ...) log:conjunction ?out` — the union of the argument formulas'
/// triples, duplicates collapsed by dedup key, order preserved.
fn conjunction(subject: &Term, object: &Term, subst: &Subst) -> Vec<Subst> {
    let Term::List(items) = subject else {
        return Vec::new();
    };
    let mut seen = FxHashSet::default();
    let mut merged = Vec::new();
    for item in items {
        let Term::Formula(formula) = item else {
            return Vec::new();
        };
        for triple in &formula.triples {
            if seen.insert(triple.dedup_key()) {
                merged.push(triple.clone());
            }
        }
    }
    unify_one(Term::Formula(Rc::new(Formula::new(merged))), object, subst)
}

/// `{formula} log:conclusion ?out` — the deductive closure of `formula`
/// under its own `log:implies`/`log:impliedBy` triples, with no access to
/// the surrounding fact set or rule base. Memoized per run (spec.md §4.4).
fn conclusion(env: &Env<'_>, subject: &Term, object: &Term, subst: &Subst) -> Vec<Subst> {
    let Term::Formula(formula) = subject else {
        return Vec::new();
    };
    let key = formula.dedup_key();
    if let Some(cached) = env.conclusion_memo.borrow().get(&key) {
        return unify_one(cached.clone(), object, subst);
    }

    let mut local_facts = FactStore::new();
    let mut local_forward = Vec::new();
    let mut local_backward = BackwardRuleIndex::new();
    for triple in &formula.triples {
        if let Some(rule) = crate::forward::try_install_rule(triple) {
            crate::forward::install_rule(&mut local_forward, &mut local_backward, rule);
        } else if triple.is_ground() {
            local_facts.insert(triple.clone());
        }
    }

    let deref = Rc::clone(&env.deref);
    let result = crate::forward::forward_chain(
        &mut local_facts,
        &mut local_forward,
        &mut local_backward,
        env.config,
        env.skolem,
        deref,
        |_| {},
    );
    if result.is_err() {
        return Vec::new();
    }

    let triples: Vec<Triple> = local_facts.all().iter().map(|t| (**t).clone()).collect();
    let out = Term::Formula(Rc::new(Formula::new(triples)));
    env.conclusion_memo.borrow_mut().insert(key, out.clone());
    unify_one(out, object, subst)
}

/// `<iri> log:content ?out` — the raw (undecoded) text behind `iri`.
fn content(env: &Env<'_>, subject: &Term, object: &Term, subst: &Subst) -> Vec<Subst> {
    let Term::Iri(iri) = subject else {
        return Vec::new();
    };
    match env.deref.deref(iri, env.config.enforce_https) {
        Ok(text) => unify_one(Term::literal_str(Rc::from(text)), object, subst),
        Err(_) => Vec::new(),
    }
}

/// `<iri> log:semantics ?out` / `log:semanticsOrError`: dereference `iri`,
/// parse it as N3, and bind `out` to the resulting formula — on failure,
/// `semantics` fails the goal while `semanticsOrError` binds an error string
/// literal instead (spec.md §4.4).
fn semantics(env: &Env<'_>, subject: &Term, object: &Term, subst: &Subst, or_error: bool) -> Vec<Subst> {
    let Term::Iri(iri) = subject else {
        return Vec::new();
    };
    let fetched = env.deref.deref(iri, env.config.enforce_https);
    let text = match fetched {
        Ok(text) => text,
        Err(e) if or_error => {
            return unify_one(Term::literal_str(Rc::from(e.to_string())), object, subst);
        }
        Err(_) => return Vec::new(),
    };
    match parse_formula(&text) {
        Some(formula) => unify_one(Term::Formula(Rc::new(formula)), object, subst),
        None if or_error => unify_one(
            Term::literal_str(Rc::from(format!("failed to parse semantics of {iri}"))),
            object,
            subst,
        ),
        None => Vec::new(),
    }
}

/// `"n3 text" log:parsedAsN3 ?out` — parse a literal's lexical value as a
/// standalone N3 document and bind the result as a formula.
fn parsed_as_n3(subject: &Term, object: &Term, subst: &Subst) -> Vec<Subst> {
    let Some(lit) = subject.as_literal() else {
        return Vec::new();
    };
    match parse_formula(&lit.lex) {
        Some(formula) => unify_one(Term::Formula(Rc::new(formula)), object, subst),
        None => Vec::new(),
    }
}

/// Parse `text` as a fresh N3 document, folding its facts plus any rules
/// (read back as `log:implies`/`log:impliedBy` triples) into one formula.
fn parse_formula(text: &str) -> Option<Formula> {
    let interner = n3_model::Interner::new();
    let doc = n3_parse::parse(text, &interner).ok()?;
    let mut triples = doc.facts;
    for rule in doc.forward_rules {
        triples.push(Triple::new(
            Term::Formula(Rc::new(Formula::new(rule.premise))),
            Term::Iri(Rc::from(Vocabulary::LOG_IMPLIES)),
            Term::Formula(Rc::new(Formula::new(rule.conclusion))),
        ));
    }
    for rule in doc.backward_rules {
        triples.push(Triple::new(
            Term::Formula(Rc::new(Formula::new(rule.conclusion))),
            Term::Iri(Rc::from(Vocabulary::LOG_IMPLIED_BY)),
            Term::Formula(Rc::new(Formula::new(rule.premise))),
        ));
    }
    Some(Formula::new(triples))
}

/// `?term log:rawType ?out` — the coarse structural class of `term`: a
/// quoted formula, a literal, an RDF-encoded or closed list, or anything
/// else (spec.md §4.4).
fn raw_type(env: &Env<'_>, subject: &Term, object: &Term, subst: &Subst) -> Vec<Subst> {
    let class: &str = if subject.is_formula() {
        Vocabulary::LOG_FORMULA
    } else if subject.is_literal() {
        Vocabulary::LOG_LITERAL
    } else if matches!(subject, Term::List(_) | Term::OpenList(..))
        || matches!(crate::index::resolve_rdf_list(env.facts, subject), crate::index::RdfListResolution::List(_))
    {
        Vocabulary::RDF_LIST
    } else {
        Vocabulary::LOG_OTHER
    };
    unify_one(Term::Iri(Rc::from(class)), object, subst)
}

/// `(lex dt) log:dtlit ?out` / `?typedLiteral log:dtlit (lex dt)` —
/// bidirectional construction/destructuring of a datatyped literal.
fn dtlit(subject: &Term, object: &Term, subst: &Subst) -> Vec<Subst> {
    if let Term::List(parts) = subject {
        let [lex, dt] = parts.as_slice() else { return Vec::new() };
        let (Some(lex_lit), Term::Iri(dt_iri)) = (lex.as_literal(), dt) else {
            return Vec::new();
        };
        let literal = Term::literal_typed(Rc::clone(&lex_lit.lex), Rc::clone(dt_iri));
        return unify_one(literal, object, subst);
    }
    if let Some(lit) = subject.as_literal() {
        if let Some(dt) = &lit.datatype {
            let pair = Term::List(vec![
                Term::literal_str(Rc::clone(&lit.lex)),
                Term::Iri(Rc::clone(dt)),
            ]);
            return unify_one(pair, object, subst);
        }
    }
    Vec::new()
}

/// `(lex tag) log:langlit ?out` / `?langLiteral log:langlit (lex tag)` —
/// bidirectional construction/destructuring of a language-tagged literal.
fn langlit(subject: &Term, object: &Term, subst: &Subst) -> Vec<Subst> {
    if let Term::List(parts) = subject {
        let [lex, tag] = parts.as_slice() else { return Vec::new() };
        let (Some(lex_lit), Some(tag_lit)) = (lex.as_literal(), tag.as_literal()) else {
            return Vec::new();
        };
        let literal = Term::literal_lang(Rc::clone(&lex_lit.lex), Rc::clone(&tag_lit.lex));
        return unify_one(literal, object, subst);
    }
    if let Some(lit) = subject.as_literal() {
        if let Some(tag) = &lit.language {
            let pair = Term::List(vec![
                Term::literal_str(Rc::clone(&lit.lex)),
                Term::literal_str(Rc::clone(tag)),
            ]);
            return unify_one(pair, object, subst);
        }
    }
    Vec::new()
}

/// `?premise log:implies ?conclusion` / `log:impliedBy` read as a query over
/// every loaded rule of the matching direction — one solution per rule,
/// alpha-renamed fresh so repeated queries don't collide (spec.md §4.4 "the
/// rule-forming predicates are themselves queryable").
fn rule_query(env: &Env<'_>, subject: &Term, object: &Term, subst: &Subst, forward: bool) -> Vec<Subst> {
    let mut out = Vec::new();
    if forward {
        for rule in env.forward_rules {
            let premise = Term::Formula(Rc::new(Formula::new(rule.premise.clone())));
            let conclusion = Term::Formula(Rc::new(Formula::new(rule.conclusion.clone())));
            if let Some(bound) = crate::unify::unify(&premise, subject, subst) {
                out.extend(crate::unify::unify(&conclusion, object, &bound));
            }
        }
    } else {
        for rule in env.backward_rules.all() {
            let conclusion = Term::Formula(Rc::new(Formula::new(rule.conclusion.clone())));
            let premise = Term::Formula(Rc::new(Formula::new(rule.premise.clone())));
            if let Some(bound) = crate::unify::unify(&conclusion, subject, subst) {
                out.extend(crate::unify::unify(&premise, object, &bound));
            }
        }
    }
    out
}

/// The evaluation context for a scoped-closure builtin argument, resolved
/// from either an explicit scope formula or a priority literal (spec.md
/// §4.5). Returns `None` when the argument is malformed, or when it names a
/// priority level the ladder has not yet reached — in the latter case the
/// builtin simply fails this round rather than firing early.
enum ScopeArg {
    Explicit(Rc<FactStore>),
    Frozen(Rc<FactStore>),
}

fn resolve_scope(env: &Env<'_>, term: &Term) -> Option<ScopeArg> {
    match term {
        Term::Formula(formula) => {
            let mut facts = FactStore::new();
            for triple in &formula.triples {
                if triple.is_ground() {
                    facts.insert(triple.clone());
                }
            }
            Some(ScopeArg::Explicit(Rc::new(facts)))
        }
        Term::Literal(lit) => {
            let n = lit.as_i64().filter(|n| *n > 0)? as u32;
            if n > env.scoped_level.get() {
                return None;
            }
            let snapshot = env.scoped_snapshot.borrow();
            snapshot.as_ref().cloned().map(ScopeArg::Frozen)
        }
        _ => None,
    }
}

/// Build a local `Env` evaluating goals against `scope` in isolation:
/// explicit-scope formulas get no rules at all; the priority ladder's frozen
/// snapshot is still checked against the live backward rule base, since it
/// represents "the closure so far", not a rule-free sandbox. Reborrows every
/// singleton at `scope`'s (shorter) lifetime rather than `env`'s own, since
/// [`Env::with_scope`] ties its facts argument to `env`'s original lifetime,
/// which a function-local [`ScopeArg`] cannot satisfy.
fn scoped_env<'b>(env: &Env<'_>, scope: &'b ScopeArg, empty_rules: &'b BackwardRuleIndex) -> Env<'b> {
    let (facts, backward_rules): (&'b FactStore, &'b BackwardRuleIndex) = match scope {
        ScopeArg::Explicit(facts) => (facts, empty_rules),
        ScopeArg::Frozen(facts) => (facts, env.backward_rules),
    };
    Env {
        facts,
        backward_rules,
        forward_rules: env.forward_rules,
        config: env.config,
        skolem: env.skolem,
        deref: Rc::clone(&env.deref),
        now: Rc::clone(&env.now),
        output_strings: Rc::clone(&env.output_strings),
        scoped_snapshot: Rc::clone(&env.scoped_snapshot),
        scoped_level: Rc::clone(&env.scoped_level),
        rename_counter: Rc::clone(&env.rename_counter),
        conclusion_memo: Rc::clone(&env.conclusion_memo),
    }
}

/// `scope log:includes {clause}` / `log:notIncludes`: does `clause` (read as
/// a set of goals, with no bindings escaping) hold against `scope`?
fn includes(env: &Env<'_>, subject: &Term, object: &Term, subst: &Subst, negate: bool) -> Vec<Subst> {
    let Term::Formula(clause) = subst.apply(object) else {
        return Vec::new();
    };
    let Some(scope) = resolve_scope(env, subject) else {
        return Vec::new();
    };
    let empty_rules = BackwardRuleIndex::new();
    let local_env = scoped_env(env, &scope, &empty_rules);
    let opts = ProveOptions { defer_builtins: true, max_results: Some(1) };
    let holds = !prove::prove(&clause.triples, subst, &local_env, &opts).is_empty();
    if holds != negate {
        vec![subst.clone()]
    } else {
        Vec::new()
    }
}

/// `(value {clause} scope) log:collectAllIn ?out` — every distinct binding
/// of `value` for which `clause` holds against `scope`, collected into a
/// list in proof order (spec.md §4.5).
fn collect_all_in(env: &Env<'_>, subject: &Term, object: &Term, subst: &Subst) -> Vec<Subst> {
    let Term::List(parts) = subject else {
        return Vec::new();
    };
    let [value, clause_term, scope_term] = parts.as_slice() else {
        return Vec::new();
    };
    let Term::Formula(clause) = subst.apply(clause_term) else {
        return Vec::new();
    };
    let Some(scope) = resolve_scope(env, &subst.apply(scope_term)) else {
        return Vec::new();
    };
    let empty_rules = BackwardRuleIndex::new();
    let local_env = scoped_env(env, &scope, &empty_rules);
    let opts = ProveOptions { defer_builtins: true, max_results: None };
    let solutions = prove::prove(&clause.triples, subst, &local_env, &opts);

    let mut seen = FxHashSet::default();
    let mut collected = Vec::new();
    for solution in solutions {
        let resolved = solution.apply(value);
        if seen.insert(resolved.dedup_key()) {
            collected.push(resolved);
        }
    }
    unify_one(Term::List(collected), object, subst)
}

/// `({where} {then}) log:forAllIn scope` — universally quantified check:
/// for every solution of `where` against `scope`, does `then` also hold
/// against `scope`? Vacuously true when `where` has no solutions.
fn for_all_in(env: &Env<'_>, subject: &Term, object: &Term, subst: &Subst) -> Vec<Subst> {
    let Term::List(parts) = subject else {
        return Vec::new();
    };
    let [where_term, then_term] = parts.as_slice() else {
        return Vec::new();
    };
    let (Term::Formula(where_formula), Term::Formula(then_formula)) =
        (subst.apply(where_term), subst.apply(then_term))
    else {
        return Vec::new();
    };
    let Some(scope) = resolve_scope(env, &subst.apply(object)) else {
        return Vec::new();
    };
    let empty_rules = BackwardRuleIndex::new();
    let local_env = scoped_env(env, &scope, &empty_rules);
    let enum_opts = ProveOptions { defer_builtins: true, max_results: None };
    let where_solutions = prove::prove(&where_formula.triples, subst, &local_env, &enum_opts);

    let check_opts = ProveOptions { defer_builtins: true, max_results: Some(1) };
    for solution in &where_solutions {
        if prove::prove(&then_formula.triples, solution, &local_env, &check_opts).is_empty() {
            return Vec::new();
        }
    }
    vec![subst.clone()]
}

/// `key log:outputString "text"` — record a side-channel string for
/// `n3-cli`'s `-r` output mode; always succeeds once both sides are ground.
fn output_string(env: &Env<'_>, subject: &Term, object: &Term, subst: &Subst) -> Vec<Subst> {
    let resolved_object = subst.apply(object);
    let Some(lit) = resolved_object.as_literal() else {
        return Vec::new();
    };
    if !subject.is_ground() {
        return Vec::new();
    }
    env.output_strings.borrow_mut().push((subject.clone(), lit.lex.to_string()));
    vec![subst.clone()]
}

/// `?term log:skolem ?iri` — the stable Skolem IRI for a ground term (spec.md
/// §6.5), keyed by its canonical dedup key.
fn skolem(env: &Env<'_>, subject: &Term, object: &Term, subst: &Subst) -> Vec<Subst> {
    if !subject.is_ground() {
        return Vec::new();
    }
    let iri = env.skolem.skolem_iri(&subject.dedup_key());
    unify_one(Term::Iri(iri), object, subst)
}

/// `<iri> log:uri "text"` — bidirectional conversion between an IRI and its
/// string form, rejecting lexical values with characters illegal in an
/// IRIREF.
fn uri(subject: &Term, object: &Term, subst: &Subst) -> Vec<Subst> {
    match subject {
        Term::Iri(iri) => unify_one(Term::literal_str(Rc::clone(iri)), object, subst),
        _ => match subject.as_literal() {
            Some(lit) if is_valid_iri_text(&lit.lex) => unify_one(Term::Iri(Rc::clone(&lit.lex)), object, subst),
            _ => Vec::new(),
        },
    }
}

fn is_valid_iri_text(text: &str) -> bool {
    !text.is_empty() && !text.chars().any(|c| c.is_whitespace() || c == '<' || c == '>' || c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::skolem::SkolemGenerator;

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
            Term::Iri(Rc::from(format!("{}{}", Vocabulary::LOG_NS, local))),
            object,
        )
    }

    #[test]
    fn conjunction_merges_and_dedups_triples() {
        let facts = FactStore::new();
        let rules = BackwardRuleIndex::new();
        let config = EngineConfig::default();
        let skolem = SkolemGenerator::new(true);
        let env = test_env(&facts, &rules, &config, &skolem);

        let a = Triple::new(Term::Iri(Rc::from("s")), Term::Iri(Rc::from("p")), Term::Iri(Rc::from("o")));
        let f1 = Term::Formula(Rc::new(Formula::new(vec![a.clone()])));
        let f2 = Term::Formula(Rc::new(Formula::new(vec![a])));
        let goal = triple_for("conjunction", Term::List(vec![f1, f2]), Term::Variable(Rc::from("out")));
        let solutions = dispatch("conjunction", &goal, &Subst::new(), &env);
        let Term::Formula(merged) = solutions[0].resolve(&Term::Variable(Rc::from("out"))) else {
            panic!("expected a formula");
        };
        assert_eq!(merged.triples.len(), 1);
    }

    #[test]
    fn raw_type_reports_formula_and_literal() {
        let facts = FactStore::new();
        let rules = BackwardRuleIndex::new();
        let config = EngineConfig::default();
        let skolem = SkolemGenerator::new(true);
        let env = test_env(&facts, &rules, &config, &skolem);

        let goal = triple_for("rawType", Term::literal_str(Rc::from("x")), Term::Variable(Rc::from("t")));
        let solutions = dispatch("rawType", &goal, &Subst::new(), &env);
        assert_eq!(
            solutions[0].resolve(&Term::Variable(Rc::from("t"))),
            Term::Iri(Rc::from(format!("{}Literal", Vocabulary::LOG_NS)))
        );
    }

    #[test]
    fn dtlit_constructs_and_destructures() {
        let facts = FactStore::new();
        let rules = BackwardRuleIndex::new();
        let config = EngineConfig::default();
        let skolem = SkolemGenerator::new(true);
        let env = test_env(&facts, &rules, &config, &skolem);

        let pair = Term::List(vec![Term::literal_str(Rc::from("42")), Term::Iri(Rc::from(Vocabulary::XSD_INTEGER))]);
        let goal = triple_for("dtlit", pair, Term::Variable(Rc::from("lit")));
        let solutions = dispatch("dtlit", &goal, &Subst::new(), &env);
        assert_eq!(
            solutions[0].resolve(&Term::Variable(Rc::from("lit"))),
            Term::literal_typed(Rc::from("42"), Rc::from(Vocabulary::XSD_INTEGER))
        );
    }

    #[test]
    fn skolem_is_stable_for_the_same_ground_term() {
        let facts = FactStore::new();
        let rules = BackwardRuleIndex::new();
        let config = EngineConfig::default();
        let skolem = SkolemGenerator::new(true);
        let env = test_env(&facts, &rules, &config, &skolem);

        let goal = triple_for("skolem", Term::Iri(Rc::from("http://example.org/a")), Term::Variable(Rc::from("s")));
        let s1 = dispatch("skolem", &goal, &Subst::new(), &env);
        let s2 = dispatch("skolem", &goal, &Subst::new(), &env);
        assert_eq!(
            s1[0].resolve(&Term::Variable(Rc::from("s"))),
            s2[0].resolve(&Term::Variable(Rc::from("s")))
        );
    }

    #[test]
    fn includes_checks_clause_against_explicit_scope_formula() {
        let facts = FactStore::new();
        let rules = BackwardRuleIndex::new();
        let config = EngineConfig::default();
        let skolem = SkolemGenerator::new(true);
        let env = test_env(&facts, &rules, &config, &skolem);

        let scope = Term::Formula(Rc::new(Formula::new(vec![Triple::new(
            Term::Iri(Rc::from("a")),
            Term::Iri(Rc::from("p")),
            Term::Iri(Rc::from("b")),
        )])));
        let clause = Term::Formula(Rc::new(Formula::new(vec![Triple::new(
            Term::Iri(Rc::from("a")),
            Term::Iri(Rc::from("p")),
            Term::Variable(Rc::from("x")),
        )])));
        let goal = triple_for("includes", scope, clause);
        let solutions = dispatch("includes", &goal, &Subst::new(), &env);
        assert_eq!(solutions.len(), 1);
    }

    #[test]
    fn not_includes_fails_when_clause_holds() {
        let facts = FactStore::new();
        let rules = BackwardRuleIndex::new();
        let config = EngineConfig::default();
        let skolem = SkolemGenerator::new(true);
        let env = test_env(&facts, &rules, &config, &skolem);

        let scope = Term::Formula(Rc::new(Formula::new(vec![Triple::new(
            Term::Iri(Rc::from("a")),
            Term::Iri(Rc::from("p")),
            Term::Iri(Rc::from("b")),
        )])));
        let clause = Term::Formula(Rc::new(Formula::new(vec![Triple::new(
            Term::Iri(Rc::from("a")),
            Term::Iri(Rc::from("p")),
            Term::Iri(Rc::from("b")),
        )])));
        let goal = triple_for("notIncludes", scope, clause);
        assert!(dispatch("notIncludes", &goal, &Subst::new(), &env).is_empty());
    }
}
