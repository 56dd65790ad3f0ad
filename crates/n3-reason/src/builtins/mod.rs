//! Builtin predicate dispatch (spec.md §4.4).
//!
//! No direct teacher precedent (the teacher has no builtin-predicate
//! dispatch table of its own); the dispatch shape is grounded on
//! `reasoning::ReasonerError`/`ReasonerResult` plus the `Vocabulary`-const
//! `match` idiom from `n3_model::vocab`. Each namespace gets its own module;
//! [`dispatch`] routes by [`n3_model::Vocabulary::split_builtin`] and hands
//! off.

pub mod crypto;
pub mod list;
pub mod log;
pub mod math;
pub mod string;
pub mod time;

use crate::env::Env;
use crate::subst::Subst;
use n3_model::{Term, Triple, Vocabulary};

/// Dispatch `goal` to the builtin library, if its predicate names one.
///
/// Returns `None` when the goal's predicate is not a recognized builtin (the
/// prover should fall back to fact/rule lookup for it) and `Some(solutions)`
/// — possibly empty — when it is (spec.md §4.3 step 1).
///
/// `rdf:first`/`rdf:rest` are only treated as `list:*` aliases when the
/// resolved subject is a list *term* (spec.md §4.4); against an RDF-encoded
/// list node (an IRI/blank), they fall through to ordinary fact lookup so
/// list-as-data structures still unify structurally.
pub fn dispatch(env: &Env, goal: &Triple, subst: &Subst) -> Option<Vec<Subst>> {
    let predicate = subst.resolve(&goal.predicate);
    let Term::Iri(pred_iri) = &predicate else {
        return None;
    };

    if env.config.super_restricted
        && pred_iri.as_ref() != Vocabulary::LOG_IMPLIES
        && pred_iri.as_ref() != Vocabulary::LOG_IMPLIED_BY
    {
        return None;
    }

    if pred_iri.as_ref() == Vocabulary::RDF_FIRST || pred_iri.as_ref() == Vocabulary::RDF_REST {
        let subject = subst.resolve(&goal.subject);
        if !matches!(subject, Term::List(_) | Term::OpenList(..)) {
            return None;
        }
        let local = if pred_iri.as_ref() == Vocabulary::RDF_FIRST {
            "first"
        } else {
            "rest"
        };
        return Some(list::dispatch(local, goal, subst, env));
    }

    let (ns, local) = Vocabulary::split_builtin(pred_iri)?;
    let solutions = match ns {
        Vocabulary::MATH_NS => math::dispatch(local, goal, subst),
        Vocabulary::STRING_NS => string::dispatch(local, goal, subst),
        Vocabulary::LIST_NS => list::dispatch(local, goal, subst, env),
        Vocabulary::TIME_NS => time::dispatch(local, goal, subst, env),
        Vocabulary::CRYPTO_NS => crypto::dispatch(local, goal, subst),
        Vocabulary::LOG_NS => log::dispatch(local, goal, subst, env),
        _ => Vec::new(),
    };
    Some(solutions)
}

/// Unify `computed` into `object`, under `subst`, yielding at most one
/// solution — the common shape for a deterministic forward-only builtin.
pub(crate) fn unify_one(computed: Term, object: &Term, subst: &Subst) -> Vec<Subst> {
    crate::unify::unify(&computed, object, subst).into_iter().collect()
}
