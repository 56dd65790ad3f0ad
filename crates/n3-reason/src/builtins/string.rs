//! `string:` builtins (spec.md §4.4): string predicates and transforms.
//!
//! Grounded on spec.md §4.4's per-namespace catalog; no teacher precedent,
//! so behavior follows the conventional cwm/eye `string:` vocabulary this
//! catalog is drawn from. `regex` (already a workspace dependency for
//! `matches`/`scrape`/`replace`) is reused rather than hand-rolling pattern
//! matching.

use crate::builtins::unify_one;
use crate::subst::Subst;
use n3_model::{Term, Triple};
use std::rc::Rc;

pub fn dispatch(local: &str, goal: &Triple, subst: &Subst) -> Vec<Subst> {
    let subject = subst.apply(&goal.subject);
    let object = &goal.object;

    match local {
        "concatenation" => concatenation(&subject)
            .map(|s| unify_one(Term::literal_str(Rc::from(s)), object, subst))
            .unwrap_or_default(),
        "contains" => binary_bool(&subject, object, subst, |a, b| a.contains(b.as_str())),
        "containsIgnoringCase" => {
            binary_bool(&subject, object, subst, |a, b| a.to_lowercase().contains(&b.to_lowercase()))
        }
        "startsWith" => binary_bool(&subject, object, subst, |a, b| a.starts_with(b.as_str())),
        "endsWith" => binary_bool(&subject, object, subst, |a, b| a.ends_with(b.as_str())),
        "equalIgnoringCase" => binary_bool(&subject, object, subst, |a, b| a.to_lowercase() == b.to_lowercase()),
        "notEqualIgnoringCase" => binary_bool(&subject, object, subst, |a, b| a.to_lowercase() != b.to_lowercase()),
        "greaterThan" => binary_bool(&subject, object, subst, |a, b| a > b),
        "lessThan" => binary_bool(&subject, object, subst, |a, b| a < b),
        "notGreaterThan" => binary_bool(&subject, object, subst, |a, b| a <= b),
        "notLessThan" => binary_bool(&subject, object, subst, |a, b| a >= b),
        "matches" => binary_bool(&subject, object, subst, |a, pattern| {
            regex::Regex::new(&pattern).map(|re| re.is_match(&a)).unwrap_or(false)
        }),
        "notMatches" => binary_bool(&subject, object, subst, |a, pattern| {
            regex::Regex::new(&pattern).map(|re| !re.is_match(&a)).unwrap_or(false)
        }),
        "length" => as_str(&subject)
            .map(|s| {
                unify_one(
                    Term::literal_typed(Rc::from(s.chars().count().to_string()), Rc::from(n3_model::Vocabulary::XSD_INTEGER)),
                    object,
                    subst,
                )
            })
            .unwrap_or_default(),
        "scrape" => scrape(&subject, object, subst),
        "replace" => replace(&subject, object, subst),
        "format" => format_string(&subject, object, subst),
        _ => Vec::new(),
    }
}

fn as_str(term: &Term) -> Option<String> {
    term.as_literal().map(|lit| lit.lex.to_string())
}

fn concatenation(subject: &Term) -> Option<String> {
    let Term::List(items) = subject else {
        return None;
    };
    let mut out = String::new();
    for item in items {
        out.push_str(&as_str(item)?);
    }
    Some(out)
}

fn binary_bool(subject: &Term, object: &Term, subst: &Subst, test: impl Fn(String, String) -> bool) -> Vec<Subst> {
    let resolved_object = subst.apply(object);
    let (Some(a), Some(b)) = (as_str(subject), as_str(&resolved_object)) else {
        return Vec::new();
    };
    if test(a, b) {
        vec![subst.clone()]
    } else {
        Vec::new()
    }
}

/// `(?string ?pattern) string:scrape ?match` — the first overall regex
/// match (or its first capture group, if the pattern has one).
fn scrape(subject: &Term, object: &Term, subst: &Subst) -> Vec<Subst> {
    let Term::List(items) = subject else {
        return Vec::new();
    };
    let [text, pattern] = items.as_slice() else {
        return Vec::new();
    };
    let (Some(text), Some(pattern)) = (as_str(text), as_str(pattern)) else {
        return Vec::new();
    };
    let Ok(re) = regex::Regex::new(&pattern) else {
        return Vec::new();
    };
    let Some(caps) = re.captures(&text) else {
        return Vec::new();
    };
    let matched = caps.get(1).or_else(|| caps.get(0)).map(|m| m.as_str().to_string());
    match matched {
        Some(s) => unify_one(Term::literal_str(Rc::from(s)), object, subst),
        None => Vec::new(),
    }
}

/// `(?string ?pattern ?replacement) string:replace ?result`.
fn replace(subject: &Term, object: &Term, subst: &Subst) -> Vec<Subst> {
    let Term::List(items) = subject else {
        return Vec::new();
    };
    let [text, pattern, replacement] = items.as_slice() else {
        return Vec::new();
    };
    let (Some(text), Some(pattern), Some(replacement)) = (as_str(text), as_str(pattern), as_str(replacement)) else {
        return Vec::new();
    };
    let Ok(re) = regex::Regex::new(&pattern) else {
        return Vec::new();
    };
    let replaced = re.replace_all(&text, replacement.as_str()).into_owned();
    unify_one(Term::literal_str(Rc::from(replaced)), object, subst)
}

/// `(fmt arg1 arg2 ...) string:format ?result` — only `%s` and `%%` are
/// recognized specifiers; any other `%`-escape fails the builtin outright
/// (spec.md §4.4).
fn format_string(subject: &Term, object: &Term, subst: &Subst) -> Vec<Subst> {
    let Term::List(items) = subject else {
        return Vec::new();
    };
    let [fmt_term, args @ ..] = items else {
        return Vec::new();
    };
    let Some(fmt) = as_str(fmt_term) else {
        return Vec::new();
    };
    let mut out = String::new();
    let mut args = args.iter();
    let mut chars = fmt.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => {
                let Some(Some(arg)) = args.next().map(as_str) else {
                    return Vec::new();
                };
                out.push_str(&arg);
            }
            Some('%') => out.push('%'),
            _ => return Vec::new(),
        }
    }
    unify_one(Term::literal_str(Rc::from(out)), object, subst)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Term {
        Term::literal_str(Rc::from(v))
    }

    fn triple_for(local: &str, subject: Term, object: Term) -> Triple {
        Triple::new(
            subject,
            Term::Iri(Rc::from(format!("{}{}", n3_model::Vocabulary::STRING_NS, local))),
            object,
        )
    }

    #[test]
    fn concatenation_joins_list_elements() {
        let goal = triple_for("concatenation", Term::List(vec![s("foo"), s("bar")]), Term::Variable(Rc::from("x")));
        let solutions = dispatch("concatenation", &goal, &Subst::new());
        assert_eq!(solutions[0].resolve(&Term::Variable(Rc::from("x"))), s("foobar"));
    }

    #[test]
    fn contains_succeeds_and_fails_correctly() {
        let goal = triple_for("contains", s("foobar"), s("oob"));
        assert_eq!(dispatch("contains", &goal, &Subst::new()).len(), 1);
        let goal = triple_for("contains", s("foobar"), s("zzz"));
        assert!(dispatch("contains", &goal, &Subst::new()).is_empty());
    }

    #[test]
    fn length_counts_characters() {
        let goal = triple_for("length", s("hello"), Term::Variable(Rc::from("n")));
        let solutions = dispatch("length", &goal, &Subst::new());
        assert_eq!(
            solutions[0].resolve(&Term::Variable(Rc::from("n"))),
            Term::literal_typed(Rc::from("5"), Rc::from(n3_model::Vocabulary::XSD_INTEGER))
        );
    }

    #[test]
    fn matches_tests_regex() {
        let goal = triple_for("matches", s("hello123"), s(r"^[a-z]+\d+$"));
        assert_eq!(dispatch("matches", &goal, &Subst::new()).len(), 1);
    }

    #[test]
    fn replace_substitutes_pattern() {
        let subject = Term::List(vec![s("hello world"), s("world"), s("there")]);
        let goal = triple_for("replace", subject, Term::Variable(Rc::from("x")));
        let solutions = dispatch("replace", &goal, &Subst::new());
        assert_eq!(solutions[0].resolve(&Term::Variable(Rc::from("x"))), s("hello there"));
    }

    #[test]
    fn not_equal_ignoring_case_distinguishes_different_words() {
        let goal = triple_for("notEqualIgnoringCase", s("Foo"), s("bar"));
        assert_eq!(dispatch("notEqualIgnoringCase", &goal, &Subst::new()).len(), 1);
        let goal = triple_for("notEqualIgnoringCase", s("Foo"), s("FOO"));
        assert!(dispatch("notEqualIgnoringCase", &goal, &Subst::new()).is_empty());
    }

    #[test]
    fn format_substitutes_percent_s_and_escapes_percent_percent() {
        let subject = Term::List(vec![s("%s scored %s%%"), s("alice"), s("90")]);
        let goal = triple_for("format", subject, Term::Variable(Rc::from("x")));
        let solutions = dispatch("format", &goal, &Subst::new());
        assert_eq!(solutions[0].resolve(&Term::Variable(Rc::from("x"))), s("alice scored 90%"));
    }

    #[test]
    fn format_rejects_unsupported_specifier() {
        let subject = Term::List(vec![s("%d"), s("1")]);
        let goal = triple_for("format", subject, Term::Variable(Rc::from("x")));
        assert!(dispatch("format", &goal, &Subst::new()).is_empty());
    }
}
