//! Fixed vocabularies: RDF/OWL/XSD core terms plus the N3 builtin namespace
//! roots (`math:`, `time:`, `list:`, `string:`, `crypto:`, `log:`).
//!
//! Grounded on the teacher's `rdf-model::vocab::Vocabulary` (a struct of
//! `pub const &'static str` namespace constants), trimmed to what an N3
//! reasoner actually consults (no SHACL/PROV constants — out of scope here)
//! and extended with the builtin namespaces spec.md §4.4 dispatches on.

/// Standard and builtin-predicate vocabularies used throughout the engine.
pub struct Vocabulary;

impl Vocabulary {
    /// RDF namespace IRI.
    pub const RDF_NS: &'static str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// rdf:type — the `a` abbreviation expands to this.
    pub const RDF_TYPE: &'static str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// rdf:first — head of an RDF-encoded list cons cell.
    pub const RDF_FIRST: &'static str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
    /// rdf:rest — tail of an RDF-encoded list cons cell.
    pub const RDF_REST: &'static str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
    /// rdf:nil — the empty RDF-encoded list.
    pub const RDF_NIL: &'static str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
    /// rdf:List — the class `log:rawType` reports for RDF-encoded lists.
    pub const RDF_LIST: &'static str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#List";

    /// OWL namespace IRI.
    pub const OWL_NS: &'static str = "http://www.w3.org/2002/07/owl#";
    /// owl:sameAs — the `=` abbreviation expands to this.
    pub const OWL_SAME_AS: &'static str = "http://www.w3.org/2002/07/owl#sameAs";

    /// XSD namespace IRI.
    pub const XSD_NS: &'static str = "http://www.w3.org/2001/XMLSchema#";
    /// xsd:string.
    pub const XSD_STRING: &'static str = "http://www.w3.org/2001/XMLSchema#string";
    /// xsd:integer (all derived integer datatypes normalize to this).
    pub const XSD_INTEGER: &'static str = "http://www.w3.org/2001/XMLSchema#integer";
    /// xsd:decimal.
    pub const XSD_DECIMAL: &'static str = "http://www.w3.org/2001/XMLSchema#decimal";
    /// xsd:float.
    pub const XSD_FLOAT: &'static str = "http://www.w3.org/2001/XMLSchema#float";
    /// xsd:double.
    pub const XSD_DOUBLE: &'static str = "http://www.w3.org/2001/XMLSchema#double";
    /// xsd:boolean.
    pub const XSD_BOOLEAN: &'static str = "http://www.w3.org/2001/XMLSchema#boolean";
    /// xsd:dateTime.
    pub const XSD_DATETIME: &'static str = "http://www.w3.org/2001/XMLSchema#dateTime";
    /// xsd:date.
    pub const XSD_DATE: &'static str = "http://www.w3.org/2001/XMLSchema#date";
    /// xsd:duration.
    pub const XSD_DURATION: &'static str = "http://www.w3.org/2001/XMLSchema#duration";
    /// rdf:langString — reconstructed whenever a literal carries `@tag`.
    pub const RDF_LANG_STRING: &'static str =
        "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

    /// `math:` namespace IRI.
    pub const MATH_NS: &'static str = "http://www.w3.org/2000/10/swap/math#";
    /// `string:` namespace IRI.
    pub const STRING_NS: &'static str = "http://www.w3.org/2000/10/swap/string#";
    /// `list:` namespace IRI.
    pub const LIST_NS: &'static str = "http://www.w3.org/2000/10/swap/list#";
    /// `time:` namespace IRI.
    pub const TIME_NS: &'static str = "http://www.w3.org/2000/10/swap/time#";
    /// `crypto:` namespace IRI.
    pub const CRYPTO_NS: &'static str = "http://www.w3.org/2000/10/swap/crypto#";
    /// `log:` namespace IRI.
    pub const LOG_NS: &'static str = "http://www.w3.org/2000/10/swap/log#";

    /// log:implies — the `=>` forward-rule predicate.
    pub const LOG_IMPLIES: &'static str = "http://www.w3.org/2000/10/swap/log#implies";
    /// log:impliedBy — the `<=` backward-rule predicate.
    pub const LOG_IMPLIED_BY: &'static str = "http://www.w3.org/2000/10/swap/log#impliedBy";
    /// log:Formula — the class `log:rawType` reports for a quoted formula.
    pub const LOG_FORMULA: &'static str = "http://www.w3.org/2000/10/swap/log#Formula";
    /// log:Literal — the class `log:rawType` reports for a literal.
    pub const LOG_LITERAL: &'static str = "http://www.w3.org/2000/10/swap/log#Literal";
    /// log:Other — the class `log:rawType` reports for anything else.
    pub const LOG_OTHER: &'static str = "http://www.w3.org/2000/10/swap/log#Other";

    /// Splits a builtin IRI into its namespace and local name, if it falls
    /// under one of the six recognized builtin namespaces.
    pub fn split_builtin(iri: &str) -> Option<(&'static str, &str)> {
        const NAMESPACES: &[&str] = &[
            Vocabulary::MATH_NS,
            Vocabulary::STRING_NS,
            Vocabulary::LIST_NS,
            Vocabulary::TIME_NS,
            Vocabulary::CRYPTO_NS,
            Vocabulary::LOG_NS,
        ];
        for ns in NAMESPACES {
            if let Some(local) = iri.strip_prefix(ns) {
                return Some((ns, local));
            }
        }
        None
    }
}
