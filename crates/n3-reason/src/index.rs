//! Fact and rule indexes (spec.md §2 "Indexes").
//!
//! Grounded on `reasoning::transitive`'s `AHashMap<String, AHashMap<String,
//! Vec<String>>>` adjacency-cache idiom, generalized from a single
//! adjacency relation to the three fact buckets spec.md §2 names (by
//! predicate, by (predicate, subject), by (predicate, object)) plus a
//! canonical-triple-key dedup set, a backward-rule-by-head-predicate index,
//! and the RDF-list head cache/conflict rule from spec.md §9.iii.

use n3_model::{Rule, Term, Triple, Vocabulary};
use rustc_hash::{FxHashMap, FxHashSet};
use std::rc::Rc;

/// The append-only working fact set with its side indexes (spec.md §5
/// "Shared resources": "any new fact must be indexed at insertion").
#[derive(Default)]
pub struct FactStore {
    facts: Vec<Rc<Triple>>,
    dedup: FxHashSet<String>,
    by_predicate: FxHashMap<String, Vec<usize>>,
    by_pred_subject: FxHashMap<(String, String), Vec<usize>>,
    by_pred_object: FxHashMap<(String, String), Vec<usize>>,
}

impl FactStore {
    /// An empty fact store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `triple` if it is not already present under the dedup key
    /// (spec.md §3 invariant 6). Returns `true` iff newly inserted.
    pub fn insert(&mut self, triple: Triple) -> bool {
        let key = triple.dedup_key();
        if !self.dedup.insert(key) {
            return false;
        }
        let idx = self.facts.len();
        let pred_key = triple.predicate.dedup_key();
        let subj_key = triple.subject.dedup_key();
        let obj_key = triple.object.dedup_key();
        self.by_predicate.entry(pred_key.clone()).or_default().push(idx);
        self.by_pred_subject
            .entry((pred_key.clone(), subj_key))
            .or_default()
            .push(idx);
        self.by_pred_object.entry((pred_key, obj_key)).or_default().push(idx);
        self.facts.push(Rc::new(triple));
        true
    }

    /// All facts, in insertion order.
    pub fn all(&self) -> &[Rc<Triple>] {
        &self.facts
    }

    /// Number of facts stored.
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Whether an equivalent triple (by dedup key) is already stored.
    pub fn contains(&self, triple: &Triple) -> bool {
        self.dedup.contains(&triple.dedup_key())
    }

    /// Candidate facts for a goal triple, choosing the smallest applicable
    /// index bucket (by (predicate, subject), by (predicate, object), or by
    /// predicate alone), falling back to a full scan when the predicate is
    /// unbound (spec.md §4.3 step 3: "smallest bucket wins").
    pub fn candidates(&self, predicate: &Term, subject: &Term, object: &Term) -> Vec<Rc<Triple>> {
        let pred_key = ground_key(predicate);
        let subj_key = ground_key(subject);
        let obj_key = ground_key(object);

        let mut best: Option<&Vec<usize>> = None;
        if let (Some(p), Some(s)) = (&pred_key, &subj_key) {
            if let Some(idxs) = self.by_pred_subject.get(&(p.clone(), s.clone())) {
                best = smaller(best, idxs);
            }
        }
        if let (Some(p), Some(o)) = (&pred_key, &obj_key) {
            if let Some(idxs) = self.by_pred_object.get(&(p.clone(), o.clone())) {
                best = smaller(best, idxs);
            }
        }
        if let Some(p) = &pred_key {
            if let Some(idxs) = self.by_predicate.get(p) {
                best = smaller(best, idxs);
            }
        }
        match best {
            Some(idxs) => idxs.iter().map(|&i| Rc::clone(&self.facts[i])).collect(),
            None => self.facts.clone(),
        }
    }
}

fn smaller<'a>(current: Option<&'a Vec<usize>>, candidate: &'a Vec<usize>) -> Option<&'a Vec<usize>> {
    match current {
        Some(c) if c.len() <= candidate.len() => Some(c),
        _ => Some(candidate),
    }
}

/// A ground term's dedup key, used as an index bucket key, or `None` if the
/// term is a variable (unbound goal positions cannot narrow the bucket).
fn ground_key(term: &Term) -> Option<String> {
    match term {
        Term::Variable(_) | Term::OpenList(..) => None,
        other => Some(other.dedup_key()),
    }
}

/// Backward rules indexed by the head predicate of their conclusion's first
/// triple, so the prover doesn't scan every backward rule for every goal.
#[derive(Default)]
pub struct BackwardRuleIndex {
    rules: Vec<Rc<Rule>>,
    by_head_predicate: FxHashMap<String, Vec<usize>>,
    untyped: Vec<usize>,
}

impl BackwardRuleIndex {
    /// An empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `rule` by the predicate of the first triple in its conclusion,
    /// if that predicate is a ground IRI; otherwise it is consulted for
    /// every goal (rare — a rule head whose predicate is itself a variable).
    pub fn insert(&mut self, rule: Rc<Rule>) {
        let idx = self.rules.len();
        match rule.conclusion.first().map(|t| &t.predicate) {
            Some(Term::Iri(iri)) => {
                self.by_head_predicate.entry(iri.to_string()).or_default().push(idx);
            }
            _ => self.untyped.push(idx),
        }
        self.rules.push(rule);
    }

    /// Candidate backward rules whose head might match a goal on `predicate`.
    pub fn candidates(&self, predicate: &Term) -> Vec<Rc<Rule>> {
        let mut out = Vec::new();
        if let Term::Iri(iri) = predicate {
            if let Some(idxs) = self.by_head_predicate.get(iri.as_ref()) {
                out.extend(idxs.iter().map(|&i| Rc::clone(&self.rules[i])));
            }
        } else {
            out.extend(self.rules.iter().cloned());
            return out;
        }
        out.extend(self.untyped.iter().map(|&i| Rc::clone(&self.rules[i])));
        out
    }

    /// All indexed rules, in installation order.
    pub fn all(&self) -> &[Rc<Rule>] {
        &self.rules
    }

    /// Number of rules indexed.
    pub fn len(&self) -> usize {
        self.rules.len()
    }
}

/// The result of walking an RDF-encoded list's `rdf:first`/`rdf:rest`
/// chain from a head node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RdfListResolution {
    /// The chain resolved to a well-formed, finite list of elements.
    List(Vec<Term>),
    /// The chain has conflicting `rdf:first`/`rdf:rest` statements for the
    /// same node, or forms a cycle (spec.md §9.iii: "truly conflicting
    /// statements cause the list to be rejected").
    Rejected,
    /// `head` is not `rdf:nil` and has no `rdf:first`/`rdf:rest` statements
    /// at all — not an RDF-list node.
    NotAList,
}

/// Walk an RDF-encoded list's `rdf:first`/`rdf:rest` chain from `head`,
/// collapsing duplicate identical statements and rejecting genuine
/// conflicts or cycles (spec.md §4.4 "list:* builtins also accept
/// RDF-encoded list heads", §9.iii).
pub fn resolve_rdf_list(store: &FactStore, head: &Term) -> RdfListResolution {
    let mut items = Vec::new();
    let mut current = head.clone();
    let mut visited = FxHashSet::default();

    loop {
        if let Term::Iri(iri) = &current {
            if iri.as_ref() == Vocabulary::RDF_NIL {
                return RdfListResolution::List(items);
            }
        }
        let key = current.dedup_key();
        if !visited.insert(key) {
            return RdfListResolution::Rejected;
        }

        let first_pred = Term::Iri(Rc::from(Vocabulary::RDF_FIRST));
        let rest_pred = Term::Iri(Rc::from(Vocabulary::RDF_REST));

        let firsts = distinct_objects(store, &current, &first_pred);
        let rests = distinct_objects(store, &current, &rest_pred);

        if firsts.is_empty() && rests.is_empty() {
            if items.is_empty() {
                return RdfListResolution::NotAList;
            }
            return RdfListResolution::Rejected;
        }
        if firsts.len() > 1 || rests.len() > 1 {
            return RdfListResolution::Rejected;
        }
        items.push(firsts[0].clone());
        current = rests[0].clone();
    }
}

fn distinct_objects(store: &FactStore, subject: &Term, predicate: &Term) -> Vec<Term> {
    let wildcard = Term::Variable(Rc::from("_rdf_list_scan"));
    let candidates = store.candidates(predicate, subject, &wildcard);
    let mut seen = FxHashSet::default();
    let mut out = Vec::new();
    for triple in candidates {
        if &triple.predicate != predicate || &triple.subject != subject {
            continue;
        }
        if seen.insert(triple.object.dedup_key()) {
            out.push(triple.object.clone());
        }
    }
    out
}
