//! The shared context threaded through the prover and builtin dispatch.
//!
//! No teacher precedent — grounded on spec.md §5 "Shared resources" (the
//! fact store, rule indexes, Skolem generator, and configuration every
//! builtin and prover call needs read access to) plus §4.4's `log:*` scoped
//! builtins, which additionally need a mutable "current scope snapshot"
//! (`scoped_snapshot`/`scoped_level`) and a `now` memo (`time:localTime`
//! reads the same instant for the whole run) and an output-string sink
//! (`log:outputString`). The read-mostly fact/rule/config/Skolem context is
//! borrowed (`&'a`); the handful of fields every nested scope must still
//! share are `Rc`-wrapped so [`Env::with_scope`] can swap in a temporary
//! fact set without losing them.

use crate::config::EngineConfig;
use crate::index::{BackwardRuleIndex, FactStore};
use crate::skolem::SkolemGenerator;
use n3_model::{Rule, Term};
use rustc_hash::FxHashMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Context passed by reference to every builtin and prover call.
pub struct Env<'a> {
    /// The working fact set currently in scope.
    pub facts: &'a FactStore,
    /// Backward rules currently in scope, indexed by head predicate.
    pub backward_rules: &'a BackwardRuleIndex,
    /// All forward rules installed so far (static plus dynamically
    /// installed via `log:implies`/`log:impliedBy`), for builtins that
    /// inspect the rule set itself.
    pub forward_rules: &'a [Rc<Rule>],
    /// Process configuration (spec.md §5/§6.3).
    pub config: &'a EngineConfig,
    /// The run's Skolem generator (spec.md §3 invariant 5).
    pub skolem: &'a SkolemGenerator,
    /// The IRI dereferencer backing `log:semantics` (spec.md §6.2).
    pub deref: Rc<n3_deref::Dereferencer>,
    /// Memoized `time:localTime` result: the first read fixes "now" for the
    /// rest of the run (spec.md §4.4: repeated reads are stable).
    pub now: Rc<RefCell<Option<Term>>>,
    /// Side channel `log:outputString` writes to, for `n3-cli`'s `-r` mode.
    pub output_strings: Rc<RefCell<Vec<(Term, String)>>>,
    /// The frozen fact-set snapshot backing priority-form scoped closure
    /// builtins (spec.md §4.5 "layered scoped closure").
    pub scoped_snapshot: Rc<RefCell<Option<Rc<FactStore>>>>,
    /// The highest priority level whose snapshot has been taken so far.
    pub scoped_level: Rc<Cell<u32>>,
    /// Monotonic counter backing backward-rule variable renaming (alpha
    /// conversion on each rule expansion, spec.md §4.3), so two firings of
    /// the same rule within one proof never collide.
    pub rename_counter: Rc<Cell<u64>>,
    /// Memoized `log:conclusion` results, keyed by the argument formula's
    /// dedup key (spec.md §4.4: deductive closure of a quoted formula is
    /// pure, so repeated queries against the same formula are cached).
    pub conclusion_memo: Rc<RefCell<FxHashMap<String, Term>>>,
}

impl<'a> Clone for Env<'a> {
    fn clone(&self) -> Self {
        Env {
            facts: self.facts,
            backward_rules: self.backward_rules,
            forward_rules: self.forward_rules,
            config: self.config,
            skolem: self.skolem,
            deref: Rc::clone(&self.deref),
            now: Rc::clone(&self.now),
            output_strings: Rc::clone(&self.output_strings),
            scoped_snapshot: Rc::clone(&self.scoped_snapshot),
            scoped_level: Rc::clone(&self.scoped_level),
            rename_counter: Rc::clone(&self.rename_counter),
            conclusion_memo: Rc::clone(&self.conclusion_memo),
        }
    }
}

impl<'a> Env<'a> {
    /// Build the top-level context for a fresh `reason_stream` run.
    pub fn new(
        facts: &'a FactStore,
        backward_rules: &'a BackwardRuleIndex,
        forward_rules: &'a [Rc<Rule>],
        config: &'a EngineConfig,
        skolem: &'a SkolemGenerator,
        deref: Rc<n3_deref::Dereferencer>,
    ) -> Self {
        Env {
            facts,
            backward_rules,
            forward_rules,
            config,
            skolem,
            deref,
            now: Rc::new(RefCell::new(None)),
            output_strings: Rc::new(RefCell::new(Vec::new())),
            scoped_snapshot: Rc::new(RefCell::new(None)),
            scoped_level: Rc::new(Cell::new(0)),
            rename_counter: Rc::new(Cell::new(0)),
            conclusion_memo: Rc::new(RefCell::new(FxHashMap::default())),
        }
    }

    /// Rebind the fact/rule context to an explicit local scope — used to
    /// evaluate `log:includes`/`log:collectAllIn`/`log:forAllIn`'s
    /// explicit-scope-formula form (spec.md §4.4) in isolation, without rule
    /// firing and without disturbing the shared singleton state (the Skolem
    /// generator, the `now` memo, the output-string sink, the priority
    /// ladder).
    pub fn with_scope(&self, facts: &'a FactStore, backward_rules: &'a BackwardRuleIndex) -> Self {
        Env {
            facts,
            backward_rules,
            forward_rules: self.forward_rules,
            config: self.config,
            skolem: self.skolem,
            deref: Rc::clone(&self.deref),
            now: Rc::clone(&self.now),
            output_strings: Rc::clone(&self.output_strings),
            scoped_snapshot: Rc::clone(&self.scoped_snapshot),
            scoped_level: Rc::clone(&self.scoped_level),
            rename_counter: Rc::clone(&self.rename_counter),
            conclusion_memo: Rc::clone(&self.conclusion_memo),
        }
    }

    /// Rebind the fact/rule context for the next forward-chaining round
    /// (spec.md §4.5's round-buffer-then-commit loop): unlike
    /// [`Self::with_scope`], this also swaps `forward_rules`, since dynamic
    /// rule installation grows that slice between rounds, while still
    /// sharing every Rc-backed singleton (the Skolem "now" memo, the
    /// output-string sink, and the scoped-closure ladder) with the caller's
    /// original `Env`.
    pub fn rebind(
        &self,
        facts: &'a FactStore,
        backward_rules: &'a BackwardRuleIndex,
        forward_rules: &'a [Rc<Rule>],
    ) -> Self {
        Env {
            facts,
            backward_rules,
            forward_rules,
            config: self.config,
            skolem: self.skolem,
            deref: Rc::clone(&self.deref),
            now: Rc::clone(&self.now),
            output_strings: Rc::clone(&self.output_strings),
            scoped_snapshot: Rc::clone(&self.scoped_snapshot),
            scoped_level: Rc::clone(&self.scoped_level),
            rename_counter: Rc::clone(&self.rename_counter),
            conclusion_memo: Rc::clone(&self.conclusion_memo),
        }
    }

    /// A minimal context for unit tests that don't exercise dereferencing,
    /// dynamic rule installation, or scoped closure.
    #[cfg(test)]
    pub fn for_test(
        facts: &'a FactStore,
        backward_rules: &'a BackwardRuleIndex,
        config: &'a EngineConfig,
        skolem: &'a SkolemGenerator,
    ) -> Self {
        Env::new(facts, backward_rules, &[], config, skolem, Rc::new(n3_deref::Dereferencer::new()))
    }
}
