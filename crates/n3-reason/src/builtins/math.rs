//! `math:` builtins (spec.md §4.4): numeric arithmetic and comparisons over
//! the four ranked numeric kinds (integer < decimal < float < double).
//!
//! Grounded on spec.md §3's "common datatype" promotion rule and §4.4's
//! per-namespace catalog; there is no teacher precedent for a numeric
//! builtin library, so the arithmetic itself is hand-written against that
//! rule, reusing [`n3_model::NumericKind::common`] exactly as invariant-3
//! numeric equivalence does in `unify.rs`.

use crate::builtins::time::{datetime_to_epoch_seconds, parse_duration_seconds};
use crate::builtins::unify_one;
use crate::subst::Subst;
use n3_model::{Literal, NumericKind, Term, Triple, Vocabulary};
use std::rc::Rc;

/// Unary and binary `sin`/`cos`/... whose forward direction is total and
/// whose backward direction (both operands unbound) is declared
/// satisfiable-but-unconstrained by spec.md §4.3's "satisfiability
/// fallback" rather than actually inverted.
const PURELY_FUNCTIONAL_UNARY: &[&str] = &[
    "sin", "cos", "tan", "asin", "acos", "atan", "sinh", "cosh", "tanh", "degrees", "negation",
];

pub fn dispatch(local: &str, goal: &Triple, subst: &Subst) -> Vec<Subst> {
    let subject = subst.apply(&goal.subject);
    let object = &goal.object;

    match local {
        "sum" => numeric_fold(&subject, 0.0, |a, b| a + b)
            .map(|r| finish(r, &object, subst))
            .unwrap_or_default(),
        "product" => numeric_fold(&subject, 1.0, |a, b| a * b)
            .map(|r| finish(r, &object, subst))
            .unwrap_or_default(),
        "difference" => difference(&subject, object, subst),
        "quotient" => pair(&subject)
            .and_then(|((a, ak), (b, bk))| {
                (b != 0.0).then(|| numeric_result(a / b, ak.common(bk).max(NumericKind::Decimal)))
            })
            .map(|r| finish(r, &object, subst))
            .unwrap_or_default(),
        "integerQuotient" => pair(&subject)
            .and_then(|((a, _), (b, _))| (b != 0.0).then(|| numeric_result((a / b).trunc(), NumericKind::Integer)))
            .map(|r| finish(r, &object, subst))
            .unwrap_or_default(),
        "remainder" => pair(&subject)
            .and_then(|((a, _), (b, _))| (b != 0.0).then(|| numeric_result(a % b, NumericKind::Integer)))
            .map(|r| finish(r, &object, subst))
            .unwrap_or_default(),
        "exponentiation" => exponentiation(&subject, object, subst),
        "absoluteValue" => unary("absoluteValue", &subject, f64::abs, subst, object),
        "rounded" => unary_kind(&subject, |v| (v + 0.5).floor(), NumericKind::Integer, subst, object),
        "negation" => unary("negation", &subject, |v| -v, subst, object),
        "degrees" => unary("degrees", &subject, f64::to_degrees, subst, object),
        "sin" => unary("sin", &subject, f64::sin, subst, object),
        "cos" => unary("cos", &subject, f64::cos, subst, object),
        "tan" => unary("tan", &subject, f64::tan, subst, object),
        "asin" => unary("asin", &subject, f64::asin, subst, object),
        "acos" => unary("acos", &subject, f64::acos, subst, object),
        "atan" => unary("atan", &subject, f64::atan, subst, object),
        "sinh" => unary("sinh", &subject, f64::sinh, subst, object),
        "cosh" => unary("cosh", &subject, f64::cosh, subst, object),
        "tanh" => unary("tanh", &subject, f64::tanh, subst, object),
        "greaterThan" => compare(&subject, object, subst, |o| o == std::cmp::Ordering::Greater),
        "lessThan" => compare(&subject, object, subst, |o| o == std::cmp::Ordering::Less),
        "notGreaterThan" => compare(&subject, object, subst, |o| o != std::cmp::Ordering::Greater),
        "notLessThan" => compare(&subject, object, subst, |o| o != std::cmp::Ordering::Less),
        "equalTo" => compare(&subject, object, subst, |o| o == std::cmp::Ordering::Equal),
        "notEqualTo" => compare(&subject, object, subst, |o| o != std::cmp::Ordering::Equal),
        _ => Vec::new(),
    }
}

fn finish(result: Term, object: &Term, subst: &Subst) -> Vec<Subst> {
    unify_one(result, object, subst)
}

fn numeric_of(term: &Term) -> Option<(f64, NumericKind)> {
    let lit = term.as_literal()?;
    Some((lit.as_f64()?, lit.numeric_kind()?))
}

fn numeric_result(value: f64, kind: NumericKind) -> Term {
    Term::Literal(Literal {
        lex: Rc::from(format_numeric(value, kind)),
        language: None,
        datatype: Some(Rc::from(kind.datatype_iri())),
    })
}

fn format_numeric(value: f64, kind: NumericKind) -> String {
    match kind {
        NumericKind::Integer => format!("{}", value as i64),
        NumericKind::Decimal if value.fract() == 0.0 => format!("{value:.1}"),
        _ => format!("{value}"),
    }
}

/// Sums or products take a list subject: `(a b c) math:sum ?x`.
fn numeric_fold(subject: &Term, seed: f64, op: impl Fn(f64, f64) -> f64) -> Option<Term> {
    let Term::List(items) = subject else {
        return None;
    };
    let mut acc = seed;
    let mut kind = NumericKind::Integer;
    for item in items {
        let (v, k) = numeric_of(item)?;
        acc = op(acc, v);
        kind = kind.common(k);
    }
    Some(numeric_result(acc, kind))
}

/// Two-element-list subject: `(a b) math:difference ?x`.
fn pair(subject: &Term) -> Option<((f64, NumericKind), (f64, NumericKind))> {
    let Term::List(items) = subject else {
        return None;
    };
    let [a, b] = items.as_slice() else {
        return None;
    };
    Some((numeric_of(a)?, numeric_of(b)?))
}

/// `(a b) math:difference ?x` — numeric subtraction when both operands are
/// numeric; otherwise, when both are `xsd:dateTime`/`xsd:date` literals,
/// the difference in whole days as an `xsd:duration` lexical form (spec.md
/// §4.4).
fn difference(subject: &Term, object: &Term, subst: &Subst) -> Vec<Subst> {
    if let Some(((a, ak), (b, bk))) = pair(subject) {
        return finish(numeric_result(a - b, ak.common(bk)), object, subst);
    }
    let Term::List(items) = subject else {
        return Vec::new();
    };
    let [a, b] = items.as_slice() else {
        return Vec::new();
    };
    let (Some(ea), Some(eb)) = (epoch_of(a), epoch_of(b)) else {
        return Vec::new();
    };
    let days = (ea - eb) / 86_400;
    let lex = if days < 0 { format!("-P{}D", -days) } else { format!("P{days}D") };
    finish(Term::literal_typed(Rc::from(lex), Rc::from(Vocabulary::XSD_DURATION)), object, subst)
}

/// `(base exp) math:exponentiation ?result` — forward direction computes
/// `base^exp`; when `exp` is unbound but `base` and `result` are known, the
/// inverse solves `exp = log(result) / log(base)` (spec.md §4.4).
fn exponentiation(subject: &Term, object: &Term, subst: &Subst) -> Vec<Subst> {
    if let Some(((b, bk), (e, ek))) = pair(subject) {
        return finish(numeric_result(b.powf(e), bk.common(ek)), object, subst);
    }
    let Term::List(items) = subject else {
        return Vec::new();
    };
    let [base_term, exp_term] = items.as_slice() else {
        return Vec::new();
    };
    let resolved_object = subst.apply(object);
    let (Some((b, bk)), Some((r, rk))) = (numeric_of(base_term), numeric_of(&resolved_object)) else {
        return Vec::new();
    };
    if !exp_term.is_variable() || b <= 0.0 || b == 1.0 {
        return Vec::new();
    }
    let e = r.ln() / b.ln();
    unify_one(numeric_result(e, bk.common(rk).max(NumericKind::Decimal)), exp_term, subst)
}

/// The temporal analogue of [`numeric_of`]: the value of an
/// `xsd:dateTime`/`xsd:date` literal in epoch seconds.
fn epoch_of(term: &Term) -> Option<i64> {
    let lit = term.as_literal()?;
    let dt = lit.datatype.as_deref()?;
    if dt == Vocabulary::XSD_DATETIME || dt == Vocabulary::XSD_DATE {
        datetime_to_epoch_seconds(&lit.lex)
    } else {
        None
    }
}

/// A single orderable value for `math:`'s six comparisons, over numerics,
/// `xsd:dateTime`/`xsd:date` (as epoch seconds), and `xsd:duration` (as
/// total seconds) — spec.md §4.4: "compare numeric/dateTime/date/duration
/// values."
fn comparable_value(term: &Term) -> Option<f64> {
    if let Some((v, _)) = numeric_of(term) {
        return Some(v);
    }
    if let Some(epoch) = epoch_of(term) {
        return Some(epoch as f64);
    }
    let lit = term.as_literal()?;
    if lit.datatype.as_deref() == Some(Vocabulary::XSD_DURATION) {
        return parse_duration_seconds(&lit.lex).map(|s| s as f64);
    }
    None
}

fn unary(local: &str, subject: &Term, op: impl Fn(f64) -> f64, subst: &Subst, object: &Term) -> Vec<Subst> {
    match numeric_of(subject) {
        Some((v, kind)) => finish(numeric_result(op(v), kind.max(NumericKind::Float)), object, subst),
        None => satisfiability_fallback(local, subject, object, subst),
    }
}

fn unary_kind(subject: &Term, op: impl Fn(f64) -> f64, kind: NumericKind, subst: &Subst, object: &Term) -> Vec<Subst> {
    match numeric_of(subject) {
        Some((v, _)) => finish(numeric_result(op(v), kind), object, subst),
        None => Vec::new(),
    }
}

/// spec.md §4.3 "satisfiability fallback": restricted to the fixed set of
/// purely functional math relations — succeed once with no new bindings
/// when the subject is unbound, rather than fail outright. Any other
/// unary builtin (e.g. `absoluteValue`) still fails on an unbound subject.
fn satisfiability_fallback(local: &str, subject: &Term, _object: &Term, subst: &Subst) -> Vec<Subst> {
    if is_purely_functional(local) && subject.is_variable() {
        vec![subst.clone()]
    } else {
        Vec::new()
    }
}

fn compare(subject: &Term, object: &Term, subst: &Subst, accept: impl Fn(std::cmp::Ordering) -> bool) -> Vec<Subst> {
    let resolved_object = subst.apply(object);
    let (Some(a), Some(b)) = (comparable_value(subject), comparable_value(&resolved_object)) else {
        return Vec::new();
    };
    match a.partial_cmp(&b) {
        Some(ord) if accept(ord) => vec![subst.clone()],
        _ => Vec::new(),
    }
}

fn is_purely_functional(local: &str) -> bool {
    PURELY_FUNCTIONAL_UNARY.contains(&local)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_int(s: &str) -> Term {
        Term::literal_typed(Rc::from(s), Rc::from(n3_model::Vocabulary::XSD_INTEGER))
    }

    fn triple_for(local: &str, subject: Term, object: Term) -> Triple {
        Triple::new(
            subject,
            Term::Iri(Rc::from(format!("{}{}", n3_model::Vocabulary::MATH_NS, local))),
            object,
        )
    }

    #[test]
    fn sum_computes_forward() {
        let subject = Term::List(vec![lit_int("1"), lit_int("2"), lit_int("3")]);
        let goal = triple_for("sum", subject, Term::Variable(Rc::from("x")));
        let solutions = dispatch("sum", &goal, &Subst::new());
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].resolve(&Term::Variable(Rc::from("x"))), lit_int("6"));
    }

    #[test]
    fn difference_computes_forward() {
        let subject = Term::List(vec![lit_int("5"), lit_int("2")]);
        let goal = triple_for("difference", subject, Term::Variable(Rc::from("x")));
        let solutions = dispatch("difference", &goal, &Subst::new());
        assert_eq!(solutions[0].resolve(&Term::Variable(Rc::from("x"))), lit_int("3"));
    }

    #[test]
    fn quotient_by_zero_fails() {
        let subject = Term::List(vec![lit_int("5"), lit_int("0")]);
        let goal = triple_for("quotient", subject, Term::Variable(Rc::from("x")));
        assert!(dispatch("quotient", &goal, &Subst::new()).is_empty());
    }

    #[test]
    fn greater_than_succeeds_without_new_bindings() {
        let goal = triple_for("greaterThan", lit_int("5"), lit_int("2"));
        let solutions = dispatch("greaterThan", &goal, &Subst::new());
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].len(), 0);
    }

    #[test]
    fn greater_than_fails_when_false() {
        let goal = triple_for("greaterThan", lit_int("1"), lit_int("2"));
        assert!(dispatch("greaterThan", &goal, &Subst::new()).is_empty());
    }

    #[test]
    fn sin_with_both_sides_unbound_succeeds_trivially() {
        let goal = triple_for("sin", Term::Variable(Rc::from("a")), Term::Variable(Rc::from("b")));
        let solutions = dispatch("sin", &goal, &Subst::new());
        assert_eq!(solutions.len(), 1);
    }

    #[test]
    fn unrecognized_local_name_yields_no_solutions() {
        let goal = triple_for("bogus", lit_int("1"), Term::Variable(Rc::from("x")));
        assert!(dispatch("bogus", &goal, &Subst::new()).is_empty());
    }

    #[test]
    fn absolute_value_with_unbound_subject_fails_rather_than_falling_back() {
        let goal = triple_for("absoluteValue", Term::Variable(Rc::from("a")), Term::Variable(Rc::from("b")));
        assert!(dispatch("absoluteValue", &goal, &Subst::new()).is_empty());
    }

    fn datetime(s: &str) -> Term {
        Term::literal_typed(Rc::from(s), Rc::from(n3_model::Vocabulary::XSD_DATETIME))
    }

    #[test]
    fn difference_of_datetimes_yields_duration_of_days() {
        let subject = Term::List(vec![datetime("2023-12-27T00:00:00Z"), datetime("2023-12-25T00:00:00Z")]);
        let goal = triple_for("difference", subject, Term::Variable(Rc::from("x")));
        let solutions = dispatch("difference", &goal, &Subst::new());
        assert_eq!(
            solutions[0].resolve(&Term::Variable(Rc::from("x"))),
            Term::literal_typed(Rc::from("P2D"), Rc::from(n3_model::Vocabulary::XSD_DURATION))
        );
    }

    #[test]
    fn greater_than_compares_datetimes() {
        let goal = triple_for("greaterThan", datetime("2023-12-27T00:00:00Z"), datetime("2023-12-25T00:00:00Z"));
        assert_eq!(dispatch("greaterThan", &goal, &Subst::new()).len(), 1);
    }

    #[test]
    fn exponentiation_forward_computes_power() {
        let subject = Term::List(vec![lit_int("2"), lit_int("3")]);
        let goal = triple_for("exponentiation", subject, Term::Variable(Rc::from("x")));
        let solutions = dispatch("exponentiation", &goal, &Subst::new());
        assert_eq!(solutions[0].resolve(&Term::Variable(Rc::from("x"))), lit_int("8"));
    }

    #[test]
    fn exponentiation_inverse_solves_exponent() {
        let subject = Term::List(vec![lit_int("2"), Term::Variable(Rc::from("e"))]);
        let goal = triple_for("exponentiation", subject, lit_int("8"));
        let solutions = dispatch("exponentiation", &goal, &Subst::new());
        assert_eq!(solutions.len(), 1);
        let e = solutions[0].resolve(&Term::Variable(Rc::from("e")));
        let (v, _) = numeric_of(&e).unwrap();
        assert!((v - 3.0).abs() < 1e-9);
    }
}
