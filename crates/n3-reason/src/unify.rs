//! The unifier (spec.md §4.2).
//!
//! Grounded structurally on `reasoning::rete::Pattern`/`PatternElement`'s
//! constant/variable/wildcard matching shape, generalized to the full
//! [`Term`] sum type and threaded through a [`Subst`] rather than a fixed
//! triple pattern.

use crate::subst::Subst;
use n3_model::{Literal, NumericKind, Term, Triple, Vocabulary};

/// Unify two terms under the ordinary equivalence rules (spec.md §3
/// invariant 3, §4.2).
pub fn unify(a: &Term, b: &Term, subst: &Subst) -> Option<Subst> {
    unify_mode(a, b, subst, false)
}

/// Unify two terms under `list:append`'s split-direction rules, which
/// additionally allow integer/decimal cross-datatype numeric equality
/// (spec.md §9.ii; DESIGN.md Open Question 4).
pub fn unify_for_list_append(a: &Term, b: &Term, subst: &Subst) -> Option<Subst> {
    unify_mode(a, b, subst, true)
}

/// Unify two triples, checking predicates first (spec.md §4.2: "cheap and
/// selective").
pub fn unify_triple(a: &Triple, b: &Triple, subst: &Subst) -> Option<Subst> {
    let subst = unify(&a.predicate, &b.predicate, subst)?;
    let subst = unify(&a.subject, &b.subject, &subst)?;
    unify(&a.object, &b.object, &subst)
}

fn unify_mode(a: &Term, b: &Term, subst: &Subst, list_append: bool) -> Option<Subst> {
    let a = subst.resolve(a);
    let b = subst.resolve(b);
    match (&a, &b) {
        (Term::Variable(x), Term::Variable(y)) if x == y => Some(subst.clone()),
        (Term::Variable(x), _) => subst.bind(x.clone(), b),
        (_, Term::Variable(y)) => subst.bind(y.clone(), a),
        (Term::Iri(x), Term::Iri(y)) => (x == y).then(|| subst.clone()),
        (Term::Blank(x), Term::Blank(y)) => (x == y).then(|| subst.clone()),
        (Term::Literal(x), Term::Literal(y)) => {
            literal_equal(x, y, list_append).then(|| subst.clone())
        }
        (Term::List(xs), Term::List(ys)) => unify_closed_lists(xs, ys, subst, list_append),
        (Term::OpenList(prefix, tail), Term::List(items))
        | (Term::List(items), Term::OpenList(prefix, tail)) => {
            unify_open_closed(prefix, tail, items, subst, list_append)
        }
        (Term::OpenList(xs, xt), Term::OpenList(ys, yt)) => {
            if xs.len() != ys.len() {
                return None;
            }
            let mut s = subst.clone();
            for (x, y) in xs.iter().zip(ys.iter()) {
                s = unify_mode(x, y, &s, list_append)?;
            }
            if xt == yt {
                Some(s)
            } else {
                s.bind(xt.clone(), Term::Variable(yt.clone()))
            }
        }
        (Term::Formula(f1), Term::Formula(f2)) => {
            if f1.alpha_equivalent(f2) {
                return Some(subst.clone());
            }
            unify_formula_triples(&f1.triples, &f2.triples, subst, list_append)
        }
        _ => None,
    }
}

fn unify_closed_lists(xs: &[Term], ys: &[Term], subst: &Subst, list_append: bool) -> Option<Subst> {
    if xs.len() != ys.len() {
        return None;
    }
    let mut s = subst.clone();
    for (x, y) in xs.iter().zip(ys.iter()) {
        s = unify_mode(x, y, &s, list_append)?;
    }
    Some(s)
}

/// `(p1 .. pk | T)` unifies with `(y1 .. yn)` iff `k <= n`; binds each `pi`
/// to `yi` and `T` to the list `(y_{k+1} .. yn)` (spec.md §4.2).
fn unify_open_closed(
    prefix: &[Term],
    tail: &Term,
    items: &[Term],
    subst: &Subst,
    list_append: bool,
) -> Option<Subst> {
    if prefix.len() > items.len() {
        return None;
    }
    let mut s = subst.clone();
    for (p, y) in prefix.iter().zip(items.iter()) {
        s = unify_mode(p, y, &s, list_append)?;
    }
    let Term::Variable(tail_var) = tail else {
        return None;
    };
    s.bind(tail_var.clone(), Term::List(items[prefix.len()..].to_vec()))
}

fn unify_formula_triples(
    lhs: &[Triple],
    rhs: &[Triple],
    subst: &Subst,
    list_append: bool,
) -> Option<Subst> {
    if lhs.len() != rhs.len() {
        return None;
    }
    let mut used = vec![false; rhs.len()];
    unify_remaining(lhs, rhs, &mut used, subst, list_append)
}

fn unify_remaining(
    lhs: &[Triple],
    rhs: &[Triple],
    used: &mut [bool],
    subst: &Subst,
    list_append: bool,
) -> Option<Subst> {
    let Some((first, rest)) = lhs.split_first() else {
        return Some(subst.clone());
    };
    for (idx, candidate) in rhs.iter().enumerate() {
        if used[idx] {
            continue;
        }
        if let Some(s2) = unify_triple_mode(first, candidate, subst, list_append) {
            used[idx] = true;
            if let Some(result) = unify_remaining(rest, rhs, used, &s2, list_append) {
                return Some(result);
            }
            used[idx] = false;
        }
    }
    None
}

fn unify_triple_mode(a: &Triple, b: &Triple, subst: &Subst, list_append: bool) -> Option<Subst> {
    let s = unify_mode(&a.predicate, &b.predicate, subst, list_append)?;
    let s = unify_mode(&a.subject, &b.subject, &s, list_append)?;
    unify_mode(&a.object, &b.object, &s, list_append)
}

/// Literal equivalence under spec.md §3 invariant 3: identical raw values;
/// plain-string/`xsd:string` equivalence; same numeric value in the same
/// numeric datatype (or, in `list:append`'s split direction, any
/// integer/decimal pairing); `xsd:boolean` truth-value equivalence.
pub fn literal_equal(a: &Literal, b: &Literal, list_append: bool) -> bool {
    if a.lex == b.lex && a.language == b.language && a.datatype == b.datatype {
        return true;
    }
    if a.language.is_some() || b.language.is_some() {
        return false;
    }
    let a_bool = a.datatype.as_deref() == Some(Vocabulary::XSD_BOOLEAN);
    let b_bool = b.datatype.as_deref() == Some(Vocabulary::XSD_BOOLEAN);
    if a_bool || b_bool {
        return a_bool == b_bool && a.as_bool().is_some() && a.as_bool() == b.as_bool();
    }
    if let (Some(ak), Some(bk)) = (a.numeric_kind(), b.numeric_kind()) {
        let same_kind = ak == bk;
        let cross_ok = list_append && is_int_or_decimal(ak) && is_int_or_decimal(bk);
        if same_kind || cross_ok {
            if let (Some(av), Some(bv)) = (a.as_f64(), b.as_f64()) {
                return av == bv;
            }
        }
        return false;
    }
    let a_string_like = a.datatype.is_none() || a.datatype.as_deref() == Some(Vocabulary::XSD_STRING);
    let b_string_like = b.datatype.is_none() || b.datatype.as_deref() == Some(Vocabulary::XSD_STRING);
    a_string_like && b_string_like && a.lex == b.lex
}

fn is_int_or_decimal(kind: NumericKind) -> bool {
    matches!(kind, NumericKind::Integer | NumericKind::Decimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn rc(s: &str) -> Rc<str> {
        Rc::from(s)
    }

    fn var(s: &str) -> Term {
        Term::Variable(rc(s))
    }

    fn iri(s: &str) -> Term {
        Term::Iri(rc(s))
    }

    #[test]
    fn unify_variable_with_constant_binds() {
        let s = unify(&var("x"), &iri("http://example.org/a"), &Subst::new()).unwrap();
        assert_eq!(s.resolve(&var("x")), iri("http://example.org/a"));
    }

    #[test]
    fn unify_distinct_iris_fails() {
        assert!(unify(&iri("http://example.org/a"), &iri("http://example.org/b"), &Subst::new()).is_none());
    }

    #[test]
    fn plain_string_unifies_with_xsd_string() {
        let plain = Term::literal_str(rc("hi"));
        let typed = Term::literal_typed(rc("hi"), rc(n3_model::Vocabulary::XSD_STRING));
        assert!(unify(&plain, &typed, &Subst::new()).is_some());
    }

    #[test]
    fn lang_tagged_literal_never_unifies_with_plain() {
        let plain = Term::literal_str(rc("hi"));
        let tagged = Term::literal_lang(rc("hi"), rc("en"));
        assert!(unify(&plain, &tagged, &Subst::new()).is_none());
    }

    #[test]
    fn numeric_equal_value_same_kind_unifies() {
        let a = Term::literal_str(rc("1"));
        let b = Term::literal_str(rc("1"));
        assert!(unify(&a, &b, &Subst::new()).is_some());
    }

    #[test]
    fn cross_kind_numeric_fails_ordinary_unify_but_succeeds_for_list_append() {
        let int_lit = Term::literal_typed(rc("1"), rc(n3_model::Vocabulary::XSD_INTEGER));
        let dec_lit = Term::literal_typed(rc("1.0"), rc(n3_model::Vocabulary::XSD_DECIMAL));
        assert!(unify(&int_lit, &dec_lit, &Subst::new()).is_none());
        assert!(unify_for_list_append(&int_lit, &dec_lit, &Subst::new()).is_some());
    }

    #[test]
    fn open_list_unifies_with_closed_list_binding_tail() {
        let open = Term::OpenList(vec![var("h")], rc("t"));
        let closed = Term::List(vec![iri("http://example.org/a"), iri("http://example.org/b")]);
        let s = unify(&open, &closed, &Subst::new()).unwrap();
        assert_eq!(s.resolve(&var("h")), iri("http://example.org/a"));
        assert_eq!(
            s.apply(&Term::Variable(rc("t"))),
            Term::List(vec![iri("http://example.org/b")])
        );
    }

    #[test]
    fn open_list_longer_than_closed_fails() {
        let open = Term::OpenList(vec![var("a"), var("b"), var("c")], rc("t"));
        let closed = Term::List(vec![iri("http://example.org/a")]);
        assert!(unify(&open, &closed, &Subst::new()).is_none());
    }

    #[test]
    fn alpha_equivalent_formulas_unify_without_binding() {
        let f1 = Term::Formula(Rc::new(n3_model::Formula::new(vec![Triple::new(
            var("x"),
            iri("http://example.org/p"),
            var("y"),
        )])));
        let f2 = Term::Formula(Rc::new(n3_model::Formula::new(vec![Triple::new(
            var("a"),
            iri("http://example.org/p"),
            var("b"),
        )])));
        let before = Subst::new();
        let after = unify(&f1, &f2, &before).unwrap();
        assert_eq!(after.len(), before.len());
    }

    #[test]
    fn formula_unifies_order_insensitively_with_binding() {
        let f1 = Term::Formula(Rc::new(n3_model::Formula::new(vec![
            Triple::new(iri("http://example.org/a"), iri("http://example.org/p"), var("x")),
            Triple::new(iri("http://example.org/b"), iri("http://example.org/p"), iri("http://example.org/2")),
        ])));
        let f2 = Term::Formula(Rc::new(n3_model::Formula::new(vec![
            Triple::new(iri("http://example.org/b"), iri("http://example.org/p"), iri("http://example.org/2")),
            Triple::new(iri("http://example.org/a"), iri("http://example.org/p"), iri("http://example.org/1")),
        ])));
        let s = unify(&f1, &f2, &Subst::new()).unwrap();
        assert_eq!(s.resolve(&var("x")), iri("http://example.org/1"));
    }
}
