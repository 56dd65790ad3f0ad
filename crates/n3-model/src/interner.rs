//! String interning for IRIs and literal lexical forms
//!
//! Mirrors the teacher's `Dictionary` (string-to-stable-reference table) but
//! drops its `unsafe` 'static-upgrade trick: this engine runs single-threaded
//! (see spec.md §5), so there is no need for the `Arc<RwLock<..>>` sharing the
//! teacher's version pays for. A plain `Rc<str>` handed out of a `RefCell`
//! is enough to make "same lexical key -> same pointer" hold, per invariant
//! §3.1.

use rustc_hash::FxHashSet;
use std::cell::RefCell;
use std::rc::Rc;

/// Interns strings by lexical value, returning a shared, deduplicated
/// `Rc<str>` for any given input.
///
/// Two calls to `intern` with equal strings return `Rc`s that are `Rc::ptr_eq`
/// to each other, so callers may use pointer comparison as a fast path before
/// falling back to structural comparison.
#[derive(Clone, Default)]
pub struct Interner {
    strings: Rc<RefCell<FxHashSet<Rc<str>>>>,
}

impl Interner {
    /// Create an empty interner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `s`, returning the canonical `Rc<str>` for its lexical value.
    pub fn intern(&self, s: &str) -> Rc<str> {
        if let Some(existing) = self.strings.borrow().get(s) {
            return Rc::clone(existing);
        }
        let rc: Rc<str> = Rc::from(s);
        self.strings.borrow_mut().insert(Rc::clone(&rc));
        rc
    }

    /// Number of distinct strings interned so far.
    pub fn len(&self) -> usize {
        self.strings.borrow().len()
    }

    /// Whether nothing has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.strings.borrow().is_empty()
    }
}
