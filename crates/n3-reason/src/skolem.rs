//! Skolemization: per-firing head-blank generation and the `log:skolem`
//! builtin's stable IRI minting (spec.md §3 invariant 5, §4.5 "Per-firing
//! Skolemization", §6.5 "Wire formats").
//!
//! No teacher precedent — grounded on the `uuid` crate (already a workspace
//! dependency for the Skolem-IRI namespace's 32-hex-digit UUID format) and a
//! hand-rolled FNV-1a-style 128-bit mix for the deterministic key, exactly as
//! spec.md §6.5 names it.

use rustc_hash::FxHashMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

const SKOLEM_NS: &str = "https://eyereasoner.github.io/.well-known/genid/";

/// Generates Skolem blanks (rule-head existentials, per firing) and Skolem
/// IRIs (the `log:skolem` builtin), memoized so repeated requests for the
/// same key return the same identifier within one run (spec.md invariant 5).
pub struct SkolemGenerator {
    deterministic: bool,
    salt: u64,
    blank_counter: Cell<u64>,
    blank_memo: RefCell<FxHashMap<String, Rc<str>>>,
    iri_memo: RefCell<FxHashMap<String, Rc<str>>>,
}

impl SkolemGenerator {
    /// Build a generator. In deterministic mode the salt is fixed (`0`);
    /// otherwise a fresh random salt is drawn via [`uuid::Uuid::new_v4`],
    /// matching spec.md §3 invariant 5's "different across independent
    /// runs" requirement.
    pub fn new(deterministic: bool) -> Self {
        let salt = if deterministic {
            0
        } else {
            uuid::Uuid::new_v4().as_u128() as u64
        };
        SkolemGenerator {
            deterministic,
            salt,
            blank_counter: Cell::new(0),
            blank_memo: RefCell::new(FxHashMap::default()),
            iri_memo: RefCell::new(FxHashMap::default()),
        }
    }

    /// The fresh-or-memoized head blank for `(firing_key, head_label)`:
    /// re-firing the same rule on the same instantiated body yields the same
    /// blank; distinct firings get distinct blanks (spec.md §4.5).
    pub fn head_blank(&self, firing_key: &str, head_label: &str) -> Rc<str> {
        let key = format!("{firing_key}\u{0}{head_label}");
        if let Some(existing) = self.blank_memo.borrow().get(&key) {
            return Rc::clone(existing);
        }
        let n = self.blank_counter.get() + 1;
        self.blank_counter.set(n);
        let label: Rc<str> = Rc::from(format!("sk_{n}"));
        self.blank_memo.borrow_mut().insert(key, Rc::clone(&label));
        label
    }

    /// The stable Skolem IRI for `canonical_key` (spec.md §6.5): under the
    /// `genid/` namespace, formatted as a 32-hex-digit UUID, derived from an
    /// FNV-1a-style 128-bit mix of `canonical_key`, salted by the per-run
    /// salt unless deterministic.
    pub fn skolem_iri(&self, canonical_key: &str) -> Rc<str> {
        let full_key = format!("{}\u{0}{}", self.salt, canonical_key);
        if let Some(existing) = self.iri_memo.borrow().get(&full_key) {
            return Rc::clone(existing);
        }
        let hash = fnv1a_128(full_key.as_bytes());
        let hex = format!("{hash:032x}");
        let formatted = format!(
            "{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        );
        let iri: Rc<str> = Rc::from(format!("{SKOLEM_NS}{formatted}"));
        self.iri_memo.borrow_mut().insert(full_key, Rc::clone(&iri));
        iri
    }

    /// Whether this generator is running in deterministic mode.
    pub fn is_deterministic(&self) -> bool {
        self.deterministic
    }
}

/// FNV-1a extended to a 128-bit accumulator: two independent 64-bit FNV-1a
/// passes (with different offset bases) interleaved into the high/low
/// halves. Not cryptographic (spec.md §1 non-goals: "cryptographic-grade
/// Skolem IDs" is explicitly out of scope).
fn fnv1a_128(data: &[u8]) -> u128 {
    const PRIME: u64 = 0x100000001b3;
    let mut hi: u64 = 0xcbf29ce484222325;
    let mut lo: u64 = 0x84222325cbf29ce4;
    for &byte in data {
        hi ^= byte as u64;
        hi = hi.wrapping_mul(PRIME);
        lo ^= byte.rotate_left(4) as u64;
        lo = lo.wrapping_mul(PRIME);
    }
    ((hi as u128) << 64) | lo as u128
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_mode_is_stable_across_generators() {
        let a = SkolemGenerator::new(true);
        let b = SkolemGenerator::new(true);
        assert_eq!(a.skolem_iri("key"), b.skolem_iri("key"));
    }

    #[test]
    fn non_deterministic_mode_differs_across_generators() {
        let a = SkolemGenerator::new(false);
        let b = SkolemGenerator::new(false);
        assert_ne!(a.skolem_iri("key"), b.skolem_iri("key"));
    }

    #[test]
    fn head_blank_is_memoized_per_firing_key_and_label() {
        let gen = SkolemGenerator::new(true);
        let b1 = gen.head_blank("firing-1", "x");
        let b2 = gen.head_blank("firing-1", "x");
        assert_eq!(b1, b2);
        let b3 = gen.head_blank("firing-2", "x");
        assert_ne!(b1, b3);
    }

    #[test]
    fn skolem_iri_has_32_hex_digit_uuid_shape() {
        let gen = SkolemGenerator::new(true);
        let iri = gen.skolem_iri("anything");
        let uuid_part = iri.strip_prefix(SKOLEM_NS).unwrap();
        assert_eq!(uuid_part.len(), 36);
        assert_eq!(uuid_part.chars().filter(|c| *c == '-').count(), 4);
    }
}
