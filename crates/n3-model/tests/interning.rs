//! Interning is a canonicalization: equal strings always come back as the
//! same `Rc` allocation, distinct strings never do (spec.md §3 invariant 1,
//! "same lexical key -> same pointer"), checked against randomly generated
//! string pairs rather than a handful of fixed examples.

use n3_model::Interner;
use proptest::prelude::*;
use std::rc::Rc;

proptest! {
    #[test]
    fn equal_strings_intern_to_the_same_pointer(s in "[a-zA-Z0-9:/._#-]{0,40}") {
        let interner = Interner::new();
        let a = interner.intern(&s);
        let b = interner.intern(&s);
        prop_assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn distinct_strings_never_share_a_pointer(a in "[a-zA-Z0-9]{1,20}", b in "[a-zA-Z0-9]{1,20}") {
        prop_assume!(a != b);
        let interner = Interner::new();
        let ra = interner.intern(&a);
        let rb = interner.intern(&b);
        prop_assert!(!Rc::ptr_eq(&ra, &rb));
    }
}
