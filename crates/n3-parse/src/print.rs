//! N3 serialization.
//!
//! Grounded on `rdf-io`'s serializer-factory naming (referenced from its own
//! `tests/serializer_tests.rs`, since the implementation itself was not in
//! the retrieved pack) — a free function per term/triple rather than a
//! `Display` impl, because printing needs a [`PrefixEnv`] to shrink IRIs
//! into QNames and `Term`/`Triple`'s own `Display` impls (in `n3-model`)
//! know nothing about prefixes.

use n3_model::{Literal, PrefixEnv, Term, Triple};

/// Render `iri` as a QName if `prefixes` has a safe shrinking, else as a
/// full `<iri>`.
fn print_iri(iri: &str, prefixes: &PrefixEnv) -> String {
    match prefixes.shrink(iri) {
        Some(qname) => qname,
        None => format!("<{iri}>"),
    }
}

fn print_literal(lit: &Literal, prefixes: &PrefixEnv) -> String {
    let mut out = format!("\"{}\"", escape_lex(&lit.lex));
    if let Some(lang) = &lit.language {
        out.push('@');
        out.push_str(lang);
    } else if let Some(dt) = &lit.datatype {
        out.push_str("^^");
        out.push_str(&print_iri(dt, prefixes));
    }
    out
}

fn escape_lex(lex: &str) -> String {
    let mut out = String::with_capacity(lex.len());
    for ch in lex.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// Render a single term as N3 text, using `prefixes` to shrink IRIs.
pub fn print_term(term: &Term, prefixes: &PrefixEnv) -> String {
    match term {
        Term::Iri(iri) => print_iri(iri, prefixes),
        Term::Literal(lit) => print_literal(lit, prefixes),
        Term::Variable(name) => format!("?{name}"),
        Term::Blank(label) => format!("_:{label}"),
        Term::List(items) => {
            let body = items
                .iter()
                .map(|t| print_term(t, prefixes))
                .collect::<Vec<_>>()
                .join(" ");
            format!("( {body} )")
        }
        Term::OpenList(items, tail) => {
            let body = items
                .iter()
                .map(|t| print_term(t, prefixes))
                .collect::<Vec<_>>()
                .join(" ");
            format!("( {body} | ?{tail} )")
        }
        Term::Formula(formula) => {
            let body = formula
                .triples
                .iter()
                .map(|t| print_triple(t, prefixes))
                .collect::<Vec<_>>()
                .join(" . ");
            format!("{{ {body} }}")
        }
    }
}

/// Render a triple as N3 text, terminated with no trailing `.` (callers
/// append `" ."` for toplevel output, or compose within a formula with
/// `" . "` separators, matching [`print_term`]'s formula branch).
pub fn print_triple(triple: &Triple, prefixes: &PrefixEnv) -> String {
    format!(
        "{} {} {}",
        print_term(&triple.subject, prefixes),
        print_term(&triple.predicate, prefixes),
        print_term(&triple.object, prefixes)
    )
}
