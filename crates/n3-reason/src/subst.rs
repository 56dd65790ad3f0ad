//! Substitutions: variable bindings threaded through unification and the
//! backward prover.
//!
//! Grounded on `datalog::Substitution = FxHashMap<String, String>`
//! (`crates/datalog` as absorbed into this crate, see DESIGN.md),
//! generalized to bind [`n3_model::Term`] variables to full [`Term`] values
//! (not just string constants) and given a copy-on-write `Rc<FxHashMap<..>>`
//! representation plus a [`Subst::gc`] compaction pass per spec.md §4.2
//! "Substitution GC".

use n3_model::Term;
use rustc_hash::{FxHashMap, FxHashSet};
use std::rc::Rc;

/// A substitution: variable name to bound term.
///
/// Cloning a `Subst` is O(1) (an `Rc` bump); extending one via [`Subst::bind`]
/// clones the underlying map once. This is "copy-on-write" in the sense the
/// spec asks for — every in-flight proof branch holds its own logical
/// snapshot without the others seeing its bindings — rather than a
/// structural-sharing persistent map, which would need a crate with no
/// precedent in the teacher's dependency stack.
#[derive(Clone, Debug, Default)]
pub struct Subst {
    bindings: Rc<FxHashMap<Rc<str>, Term>>,
}

impl Subst {
    /// An empty substitution.
    pub fn new() -> Self {
        Self::default()
    }

    /// The term directly bound to `var`, if any (one hop, not resolved
    /// through chains of variable-to-variable bindings — use [`Self::resolve`]
    /// for that).
    pub fn get(&self, var: &str) -> Option<&Term> {
        self.bindings.get(var)
    }

    /// Number of variables bound.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Resolve `term` through the substitution: if it is a bound variable,
    /// follow the binding chain (which cannot cycle — [`Self::bind`] enforces
    /// an occurs check) until reaching an unbound variable or a non-variable
    /// term. Does not recurse into list/formula structure — callers that
    /// need a fully dereferenced term use [`Self::apply`].
    pub fn resolve<'a>(&'a self, term: &'a Term) -> Term {
        let mut current = term.clone();
        loop {
            match &current {
                Term::Variable(name) => match self.bindings.get(name.as_ref()) {
                    Some(next) => current = next.clone(),
                    None => return current,
                },
                _ => return current,
            }
        }
    }

    /// Fully substitute `term`, recursing into lists, open lists, and
    /// formulas, so the result contains no variable bound (directly or
    /// transitively) in this substitution.
    pub fn apply(&self, term: &Term) -> Term {
        let resolved = self.resolve(term);
        match resolved {
            Term::List(items) => Term::List(items.iter().map(|t| self.apply(t)).collect()),
            Term::OpenList(items, tail) => {
                let applied_tail = self.resolve(&Term::Variable(Rc::clone(&tail)));
                match applied_tail {
                    Term::Variable(still_unbound) => {
                        Term::OpenList(items.iter().map(|t| self.apply(t)).collect(), still_unbound)
                    }
                    Term::List(tail_items) => {
                        let mut all: Vec<Term> = items.iter().map(|t| self.apply(t)).collect();
                        all.extend(tail_items.iter().map(|t| self.apply(t)));
                        Term::List(all)
                    }
                    other => other,
                }
            }
            Term::Formula(formula) => {
                let triples = formula
                    .triples
                    .iter()
                    .map(|t| {
                        n3_model::Triple::new(
                            self.apply(&t.subject),
                            self.apply(&t.predicate),
                            self.apply(&t.object),
                        )
                    })
                    .collect();
                Term::Formula(Rc::new(n3_model::Formula::new(triples)))
            }
            other => other,
        }
    }

    /// Whether `var` occurs (after resolving through this substitution)
    /// anywhere inside `term` — the unifier's occurs check.
    pub fn occurs(&self, var: &str, term: &Term) -> bool {
        match self.resolve(term) {
            Term::Variable(name) => name.as_ref() == var,
            Term::List(items) | Term::OpenList(items, _) => {
                items.iter().any(|t| self.occurs(var, t))
            }
            Term::Formula(formula) => formula.triples.iter().any(|t| {
                self.occurs(var, &t.subject) || self.occurs(var, &t.predicate) || self.occurs(var, &t.object)
            }),
            _ => false,
        }
    }

    /// Bind `var` to `term`, returning a new substitution. Returns `None` if
    /// the occurs check fails (spec.md §4.2: "binding a variable `v` to `t`
    /// requires `v` not occurring in `t`").
    pub fn bind(&self, var: Rc<str>, term: Term) -> Option<Self> {
        if let Term::Variable(existing) = &term {
            if existing.as_ref() == var.as_ref() {
                return Some(self.clone());
            }
        }
        if self.occurs(&var, &term) {
            return None;
        }
        let mut map = (*self.bindings).clone();
        map.insert(var, term);
        Some(Subst {
            bindings: Rc::new(map),
        })
    }

    /// Compact this substitution to only the bindings reachable from `keep`
    /// (spec.md §4.2 "Substitution GC"): transitively follows every kept
    /// variable's binding, keeping deep backward chains linear rather than
    /// carrying forward every binding made along the way.
    pub fn gc(&self, keep: impl IntoIterator<Item = Rc<str>>) -> Self {
        let mut reachable: FxHashSet<Rc<str>> = FxHashSet::default();
        let mut stack: Vec<Rc<str>> = keep.into_iter().collect();
        while let Some(var) = stack.pop() {
            if !reachable.insert(Rc::clone(&var)) {
                continue;
            }
            if let Some(term) = self.bindings.get(var.as_ref()) {
                collect_vars(term, &mut stack);
            }
        }
        let mut map = FxHashMap::default();
        for var in &reachable {
            if let Some(term) = self.bindings.get(var.as_ref()) {
                map.insert(Rc::clone(var), term.clone());
            }
        }
        Subst {
            bindings: Rc::new(map),
        }
    }

    /// Iterate over all bindings (used to build a [`n3_model::Bindings`]
    /// snapshot for a [`n3_model::DerivedFact`]).
    pub fn iter(&self) -> impl Iterator<Item = (&Rc<str>, &Term)> {
        self.bindings.iter()
    }

    /// Snapshot this substitution as a plain [`n3_model::Bindings`] map, each
    /// value fully applied.
    pub fn to_bindings(&self) -> n3_model::Bindings {
        self.bindings
            .keys()
            .map(|k| (Rc::clone(k), self.apply(&Term::Variable(Rc::clone(k)))))
            .collect()
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
