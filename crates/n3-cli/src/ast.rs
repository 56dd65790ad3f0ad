//! `-a/--ast` support: render a parsed document as JSON instead of reasoning
//! over it (spec.md §6.3).
//!
//! No teacher precedent for the JSON shape itself (the teacher has no
//! argv-driven AST dump); `n3-model` carries no `serde` derives (spec.md §3
//! terms are built from interned `Rc<str>`, which `serde_json::json!` can
//! walk directly without needing `Serialize` on the term types), so this
//! module hand-builds `serde_json::Value`s term by term.

use n3_model::{Literal, PrefixEnv, Rule, Term, Triple};
use n3_parse::ParsedDocument;
use serde_json::{json, Value};

/// Render a parsed document as the JSON structure `-a/--ast` prints.
pub fn document_to_json(doc: &ParsedDocument) -> Value {
    json!({
        "prefixes": prefixes_to_json(&doc.prefixes),
        "facts": doc.facts.iter().map(triple_to_json).collect::<Vec<_>>(),
        "forwardRules": doc.forward_rules.iter().map(rule_to_json).collect::<Vec<_>>(),
        "backwardRules": doc.backward_rules.iter().map(rule_to_json).collect::<Vec<_>>(),
    })
}

fn prefixes_to_json(prefixes: &PrefixEnv) -> Value {
    json!({ "base": prefixes.base() })
}

fn rule_to_json(rule: &Rule) -> Value {
    json!({
        "premise": rule.premise.iter().map(triple_to_json).collect::<Vec<_>>(),
        "conclusion": rule.conclusion.iter().map(triple_to_json).collect::<Vec<_>>(),
        "isFuse": rule.is_fuse,
    })
}

fn triple_to_json(triple: &Triple) -> Value {
    json!({
        "subject": term_to_json(&triple.subject),
        "predicate": term_to_json(&triple.predicate),
        "object": term_to_json(&triple.object),
    })
}

fn term_to_json(term: &Term) -> Value {
    match term {
        Term::Iri(iri) => json!({ "type": "iri", "value": iri.as_ref() }),
        Term::Literal(lit) => literal_to_json(lit),
        Term::Variable(name) => json!({ "type": "variable", "name": name.as_ref() }),
        Term::Blank(label) => json!({ "type": "blank", "label": label.as_ref() }),
        Term::List(items) => json!({
            "type": "list",
            "items": items.iter().map(term_to_json).collect::<Vec<_>>(),
        }),
        Term::OpenList(items, tail) => json!({
            "type": "openList",
            "items": items.iter().map(term_to_json).collect::<Vec<_>>(),
            "tail": tail.as_ref(),
        }),
        Term::Formula(formula) => json!({
            "type": "formula",
            "triples": formula.triples.iter().map(triple_to_json).collect::<Vec<_>>(),
        }),
    }
}

fn literal_to_json(lit: &Literal) -> Value {
    json!({
        "type": "literal",
        "lex": lit.lex.as_ref(),
        "language": lit.language.as_deref(),
        "datatype": lit.datatype.as_deref(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use n3_model::Interner;

    #[test]
    fn document_to_json_carries_one_fact_per_triple() {
        let interner = Interner::new();
        let doc = n3_parse::parse("@prefix : <http://example.org/> .\n:a :p 1 .", &interner).unwrap();
        let value = document_to_json(&doc);
        assert_eq!(value["facts"].as_array().unwrap().len(), 1);
    }
}
