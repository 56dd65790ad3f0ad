//! Unifier, backward prover, builtin library, and forward chainer for the
//! n3reason engine (spec.md §1 "the core").
//!
//! [`reason_stream`] is the single programmatic entry point (spec.md §6.4):
//! parse, index the parsed facts/rules, saturate, and hand back the
//! saturated fact set, the derivation log, and a printed closure.

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod builtins;
pub mod config;
pub mod env;
pub mod error;
pub mod forward;
pub mod index;
pub mod prove;
pub mod skolem;
pub mod subst;
pub mod unify;

pub use config::EngineConfig;
pub use env::Env;
pub use error::{ReasonError, ReasonResult};
pub use index::{BackwardRuleIndex, FactStore, RdfListResolution};
pub use skolem::SkolemGenerator;

use n3_model::{DerivedFact, Interner, PrefixEnv};
use std::rc::Rc;

/// Options for a [`reason_stream`] run, beyond the bounds/flags already
/// carried by [`EngineConfig`] (spec.md §6.4's `reasonStream` options bag).
#[derive(Default)]
pub struct ReasonOptions<'a> {
    /// Called once per derivation, in production order (spec.md §6.4
    /// `onDerived`, §5 "Ordering").
    pub on_derived: Option<&'a mut dyn FnMut(&DerivedFact)>,
    /// Whether `closure_n3` includes the input facts alongside the derived
    /// ones, or only the derivations (spec.md §6.4
    /// `includeInputFactsInClosure`).
    pub include_input_facts_in_closure: bool,
}

/// The result of a saturated run (spec.md §6.4: `{ prefixes, facts, derived,
/// closureN3 }`).
pub struct ReasonOutput {
    /// The `@prefix`/`@base` environment accumulated while parsing, reused
    /// to print `closure_n3`.
    pub prefixes: PrefixEnv,
    /// The saturated fact set.
    pub facts: FactStore,
    /// Forward rules in scope at the end of the run, including any
    /// installed dynamically via `log:implies`/`log:impliedBy`.
    pub forward_rules: Vec<Rc<n3_model::Rule>>,
    /// Backward rules in scope at the end of the run, same caveat.
    pub backward_rules: BackwardRuleIndex,
    /// Every derivation, in production order.
    pub derived: Vec<DerivedFact>,
    /// Every `(subject, string)` pair recorded by `log:outputString` during
    /// the run, in the order recorded (spec.md §4.6; ordering/concatenation
    /// into the `-r/--strings` CLI output is the caller's job).
    pub output_strings: Vec<(n3_model::Term, String)>,
    /// `facts` (or just `derived`, depending on
    /// [`ReasonOptions::include_input_facts_in_closure`]) printed back out
    /// as N3 text (spec.md §6.4 `closureN3`).
    pub closure_n3: String,
}

/// Parse `text`, saturate it, and return the result (spec.md §6.4
/// `reasonStream`). `base_iri` seeds the printer/parser's base environment
/// for resolving relative IRIs, matching `@base`/`BASE` directive handling.
pub fn reason_stream(
    text: &str,
    base_iri: Option<&str>,
    config: &EngineConfig,
    mut options: ReasonOptions<'_>,
) -> ReasonResult<ReasonOutput> {
    let interner = Interner::new();
    let doc = n3_parse::parse(text, &interner)?;

    let mut prefixes = doc.prefixes;
    if let Some(base) = base_iri {
        if prefixes.base().is_none() {
            prefixes.set_base(base);
        }
    }

    let input_facts = doc.facts;
    let mut facts = FactStore::new();
    for fact in &input_facts {
        facts.insert(fact.clone());
    }

    let mut forward_rules: Vec<Rc<n3_model::Rule>> = doc.forward_rules.into_iter().map(Rc::new).collect();
    let mut backward_rules = BackwardRuleIndex::new();
    for rule in doc.backward_rules {
        backward_rules.insert(Rc::new(rule));
    }

    let skolem = SkolemGenerator::new(config.deterministic_skolem);
    let deref = Rc::new(n3_deref::Dereferencer::new());

    let (derived, output_strings) = forward::forward_chain(
        &mut facts,
        &mut forward_rules,
        &mut backward_rules,
        config,
        &skolem,
        deref,
        |df| {
            if let Some(on_derived) = options.on_derived.as_deref_mut() {
                on_derived(df);
            }
        },
    )?;

    let closure_n3 = if options.include_input_facts_in_closure {
        print_triples(facts.all().iter().map(|t| t.as_ref()), &prefixes)
    } else {
        print_triples(derived.iter().map(|df| &df.fact), &prefixes)
    };

    Ok(ReasonOutput {
        prefixes,
        facts,
        forward_rules,
        backward_rules,
        derived,
        output_strings,
        closure_n3,
    })
}

fn print_triples<'a>(triples: impl Iterator<Item = &'a n3_model::Triple>, prefixes: &PrefixEnv) -> String {
    triples
        .map(|t| n3_parse::print_triple(t, prefixes))
        .collect::<Vec<_>>()
        .join("\n")
}
