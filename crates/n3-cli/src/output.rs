//! Output formatting for `n3reason`: per-derivation N3/proof-comment lines
//! (spec.md §6.3 `-p/--proof-comments`) and the `log:outputString` ordering
//! rule (spec.md §4.6).
//!
//! No teacher precedent (the teacher's reasoners return typed structs for
//! callers to format themselves, never owning their own CLI rendering);
//! grounded on `n3-parse::print`'s free-function-over-`PrefixEnv` style so
//! this module stays a thin consumer of that crate rather than a second
//! printer.

use n3_model::{DerivedFact, PrefixEnv, Term};
use n3_parse::print_triple;

/// Render one derivation as it should appear in the CLI's (non-streaming or
/// streaming) N3 output: the instantiated premise and firing rule as a
/// leading comment block when `proof_comments` is set, then the derived
/// triple terminated with `" ."`.
pub fn render_derivation(df: &DerivedFact, prefixes: &PrefixEnv, proof_comments: bool) -> String {
    let mut out = String::new();
    if proof_comments {
        out.push_str("# proof:\n");
        out.push_str(&format!("#   rule: {}\n", df.rule));
        for premise in &df.instantiated_premise {
            out.push_str(&format!("#   premise: {} .\n", print_triple(premise, prefixes)));
        }
        let mut bound: Vec<_> = df.bindings.iter().collect();
        bound.sort_by(|a, b| a.0.cmp(b.0));
        for (var, term) in bound {
            out.push_str(&format!("#   ?{var} = {}\n", n3_parse::print_term(term, prefixes)));
        }
    }
    out.push_str(&print_triple(&df.fact, prefixes));
    out.push_str(" .");
    out
}

/// Render a bare input-only prefix header for `-t/--stream` mode: every
/// `@prefix`/`@base` directive the source declared, printed before any
/// derivation is streamed (spec.md §6.3 "print a compact, input-only prefix
/// header first").
pub fn render_stream_header(prefixes: &PrefixEnv) -> String {
    let mut out = String::new();
    if let Some(base) = prefixes.base() {
        out.push_str(&format!("@base <{base}> .\n"));
    }
    out
}

/// Concatenate every `log:outputString` pair's object string, in the
/// deterministic subject ordering spec.md §4.6 defines: numeric values
/// first (by value), then plain literals (by lexical form), then IRIs
/// (lexicographically), then blanks (by label); ties within a class are
/// broken by insertion order, which a stable sort preserves for free.
pub fn order_output_strings(pairs: &[(Term, String)]) -> String {
    let mut indexed: Vec<(usize, &(Term, String))> = pairs.iter().enumerate().collect();
    indexed.sort_by(|(_, (a, _)), (_, (b, _))| subject_rank(a).cmp(&subject_rank(b)));
    indexed.into_iter().map(|(_, (_, s))| s.as_str()).collect()
}

/// The sort key for one `log:outputString` subject: a class tag (numeric <
/// plain literal < IRI < blank < anything else) and a within-class key.
fn subject_rank(term: &Term) -> (u8, RankKey) {
    match term {
        Term::Literal(lit) if lit.numeric_kind().is_some() => {
            let value = lit.as_f64().unwrap_or(0.0);
            (0, RankKey::Numeric(value))
        }
        Term::Literal(lit) => (1, RankKey::Text(lit.lex.to_string())),
        Term::Iri(iri) => (2, RankKey::Text(iri.to_string())),
        Term::Blank(label) => (3, RankKey::Text(label.to_string())),
        other => (4, RankKey::Text(format!("{other:?}"))),
    }
}

#[derive(PartialEq)]
enum RankKey {
    Numeric(f64),
    Text(String),
}

impl Eq for RankKey {}

impl PartialOrd for RankKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match (self, other) {
            (RankKey::Numeric(a), RankKey::Numeric(b)) => a.total_cmp(b),
            (RankKey::Text(a), RankKey::Text(b)) => a.cmp(b),
            (RankKey::Numeric(_), RankKey::Text(_)) => std::cmp::Ordering::Less,
            (RankKey::Text(_), RankKey::Numeric(_)) => std::cmp::Ordering::Greater,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn lit_num(s: &str) -> Term {
        Term::literal_typed(Rc::from(s), Rc::from(n3_model::Vocabulary::XSD_INTEGER))
    }

    #[test]
    fn numeric_subjects_sort_before_iris_and_by_value() {
        let pairs = vec![
            (Term::Iri(Rc::from("http://example.org/a")), "iri".to_string()),
            (lit_num("10"), "ten".to_string()),
            (lit_num("2"), "two".to_string()),
        ];
        assert_eq!(order_output_strings(&pairs), "twoteniri");
    }

    #[test]
    fn ties_preserve_insertion_order() {
        let pairs = vec![
            (Term::Iri(Rc::from("http://example.org/a")), "first".to_string()),
            (Term::Iri(Rc::from("http://example.org/a")), "second".to_string()),
        ];
        assert_eq!(order_output_strings(&pairs), "firstsecond");
    }
}
