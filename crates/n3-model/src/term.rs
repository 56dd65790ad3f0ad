//! N3 term model: the sum type at the root of everything else in this crate.
//!
//! Grounded on `rdf-model::node::Node` (enum-of-variants-with-Display/Debug,
//! `is_*`/`as_*` accessor families), generalized from borrowed `Node<'a>` to
//! owned, interned terms: an N3 [`Formula`] owns its triples outright (it is
//! not a view over a borrowed graph), so there is no lifetime to hang a
//! `Node<'a>` off of. `Iri`/`Variable`/`Blank` hold `Rc<str>` produced by
//! [`crate::Interner`] so that `Rc::ptr_eq` is a valid fast path for equality
//! (invariant 1, spec.md §3).

use crate::Formula;
use std::fmt;
use std::rc::Rc;

/// A single N3 term: ground or variable, atomic or structured.
///
/// Unlike the teacher's `Node<'a>`, there is no dedicated `QuotedTriple`
/// variant (N3 reifies via [`Term::Formula`], not RDF-star) and no SPARQL
/// flavor of variable distinguishing bound patterns from stored data — N3
/// variables are universal and appear identically in facts, rule bodies, and
/// rule heads.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Term {
    /// Absolute IRI, interned by lexical value.
    Iri(Rc<str>),
    /// Literal value: lexical form plus optional language tag or datatype.
    Literal(Literal),
    /// Rule-local universal variable, named without its leading `?`.
    Variable(Rc<str>),
    /// Existential blank node, named without its leading `_:`.
    Blank(Rc<str>),
    /// Closed list `( t1 t2 ... tn )`.
    List(Vec<Term>),
    /// Open list `( t1 ... tk | tail )`: a prefix plus a tail variable name
    /// (without its leading `?`). Appears only as a partial list pattern in
    /// rule bodies and heads, never as a stored fact (spec.md §3, "OpenList").
    OpenList(Vec<Term>, Rc<str>),
    /// Quoted formula: an ordered graph reified as a term.
    Formula(Rc<Formula>),
}

impl Term {
    /// Build an IRI term.
    pub fn iri(iri: Rc<str>) -> Self {
        Term::Iri(iri)
    }

    /// Build a plain string literal (no language, no explicit datatype).
    pub fn literal_str(value: Rc<str>) -> Self {
        Term::Literal(Literal {
            lex: value,
            language: None,
            datatype: None,
        })
    }

    /// Build a language-tagged literal.
    pub fn literal_lang(value: Rc<str>, language: Rc<str>) -> Self {
        Term::Literal(Literal {
            lex: value,
            language: Some(language),
            datatype: None,
        })
    }

    /// Build a typed literal.
    pub fn literal_typed(value: Rc<str>, datatype: Rc<str>) -> Self {
        Term::Literal(Literal {
            lex: value,
            language: None,
            datatype: Some(datatype),
        })
    }

    /// Whether this is an [`Term::Iri`].
    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    /// Whether this is a [`Term::Literal`].
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    /// Whether this is a [`Term::Variable`].
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    /// Whether this is a [`Term::Blank`].
    pub fn is_blank(&self) -> bool {
        matches!(self, Term::Blank(_))
    }

    /// Whether this is a [`Term::Formula`].
    pub fn is_formula(&self) -> bool {
        matches!(self, Term::Formula(_))
    }

    /// Whether this term is ground: no [`Term::Variable`] anywhere within it
    /// (including nested inside lists and formulas — a quoted formula's
    /// variables are local to the formula and do not make the *outer* term
    /// non-ground per spec.md §3 invariant 2, so formulas are not recursed
    /// into here; callers that need to know whether a formula's body is
    /// ground should inspect its triples directly).
    pub fn is_ground(&self) -> bool {
        match self {
            Term::Variable(_) => false,
            Term::OpenList(..) => false,
            Term::List(items) => items.iter().all(Term::is_ground),
            Term::Iri(_) | Term::Literal(_) | Term::Blank(_) | Term::Formula(_) => true,
        }
    }

    /// Get the IRI string, if this is an IRI.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Get the literal, if this is one.
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Get the variable name (without `?`), if this is one.
    pub fn as_variable(&self) -> Option<&str> {
        match self {
            Term::Variable(name) => Some(name),
            _ => None,
        }
    }

    /// Get the formula, if this is one.
    pub fn as_formula(&self) -> Option<&Rc<Formula>> {
        match self {
            Term::Formula(f) => Some(f),
            _ => None,
        }
    }

    /// The dedup key used by the fact-set index (spec.md §3 invariant 6):
    /// structurally identical except that a plain string and the same
    /// lexical value typed `xsd:string` share a key (invariant 3.ii), while
    /// blank labels are *not* identified with each other.
    pub fn dedup_key(&self) -> String {
        match self {
            Term::Iri(iri) => format!("I{iri}"),
            Term::Literal(lit) => format!("L{}", lit.dedup_key()),
            Term::Variable(name) => format!("V{name}"),
            Term::Blank(label) => format!("B{label}"),
            Term::List(items) => {
                let mut key = String::from("(");
                for item in items {
                    key.push_str(&item.dedup_key());
                    key.push(',');
                }
                key.push(')');
                key
            }
            Term::OpenList(items, tail) => {
                let mut key = String::from("(");
                for item in items {
                    key.push_str(&item.dedup_key());
                    key.push(',');
                }
                key.push_str("|V");
                key.push_str(tail);
                key.push(')');
                key
            }
            Term::Formula(formula) => format!("F{}", formula.dedup_key()),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::Literal(lit) => write!(f, "{lit}"),
            Term::Variable(name) => write!(f, "?{name}"),
            Term::Blank(label) => write!(f, "_:{label}"),
            Term::List(items) => {
                write!(f, "(")?;
                for item in items {
                    write!(f, " {item}")?;
                }
                write!(f, " )")
            }
            Term::OpenList(items, tail) => {
                write!(f, "(")?;
                for item in items {
                    write!(f, " {item}")?;
                }
                write!(f, " | ?{tail} )")
            }
            Term::Formula(formula) => write!(f, "{{ {formula} }}"),
        }
    }
}

/// A literal value: lexical form plus an optional language tag or an
/// optional explicit datatype IRI (mutually exclusive, per N3 syntax).
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Literal {
    /// Lexical form with any language/datatype suffix already stripped.
    pub lex: Rc<str>,
    /// Language tag, e.g. `en`, without the leading `@`.
    pub language: Option<Rc<str>>,
    /// Explicit datatype IRI, e.g. `xsd:integer`'s expansion.
    pub datatype: Option<Rc<str>>,
}

impl Literal {
    /// Whether this literal has neither a language tag nor an explicit
    /// datatype (a "plain" literal under §3 of the N3 grammar).
    pub fn is_plain(&self) -> bool {
        self.language.is_none() && self.datatype.is_none()
    }

    /// The dedup key (spec.md §3 invariant 3.ii): a plain literal and the
    /// same lexical form typed `xsd:string` collapse to the same key; a
    /// language-tagged literal never collapses with either.
    pub fn dedup_key(&self) -> String {
        match (&self.language, &self.datatype) {
            (Some(lang), _) => format!("{}@{}", self.lex, lang),
            (None, Some(dt)) if dt.as_ref() == crate::Vocabulary::XSD_STRING => {
                format!("{}^^str", self.lex)
            }
            (None, Some(dt)) => format!("{}^^{}", self.lex, dt),
            (None, None) => format!("{}^^str", self.lex),
        }
    }

    /// Parse as an `i64`, regardless of any declared datatype (callers are
    /// responsible for checking [`Self::numeric_kind`] first if the
    /// datatype matters).
    pub fn as_i64(&self) -> Option<i64> {
        self.lex.parse().ok()
    }

    /// Parse as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        self.lex.parse().ok()
    }

    /// Parse as a boolean (`true`/`false` only; N3 has no `1`/`0` boolean
    /// shorthand in the lexical space, unlike the teacher's RDF literal).
    pub fn as_bool(&self) -> Option<bool> {
        match self.lex.as_ref() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    /// The numeric kind recognized for this literal by lexical shape or
    /// declared datatype, per spec.md §3 "Numeric kinds recognized".
    pub fn numeric_kind(&self) -> Option<NumericKind> {
        if let Some(dt) = &self.datatype {
            return NumericKind::from_datatype_iri(dt);
        }
        NumericKind::infer_from_lexical_shape(&self.lex)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.lex)?;
        if let Some(lang) = &self.language {
            write!(f, "@{lang}")?;
        } else if let Some(dt) = &self.datatype {
            write!(f, "^^<{dt}>")?;
        }
        Ok(())
    }
}

/// The four numeric datatypes the builtin library ranks and promotes
/// between (spec.md §3: "integer < decimal < float < double").
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum NumericKind {
    /// `xsd:integer` (all derived integer datatypes normalize to this).
    Integer,
    /// `xsd:decimal`.
    Decimal,
    /// `xsd:float`.
    Float,
    /// `xsd:double`.
    Double,
}

impl NumericKind {
    fn from_datatype_iri(iri: &str) -> Option<Self> {
        match iri {
            s if s == crate::Vocabulary::XSD_INTEGER => Some(NumericKind::Integer),
            s if s == crate::Vocabulary::XSD_DECIMAL => Some(NumericKind::Decimal),
            s if s == crate::Vocabulary::XSD_FLOAT => Some(NumericKind::Float),
            s if s == crate::Vocabulary::XSD_DOUBLE => Some(NumericKind::Double),
            _ => None,
        }
    }

    fn infer_from_lexical_shape(lex: &str) -> Option<Self> {
        if lex.is_empty() {
            return None;
        }
        let body = lex.strip_prefix(['+', '-']).unwrap_or(lex);
        if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || c == '+' || c == '-') {
            return None;
        }
        if body.contains(['e', 'E']) {
            return Some(NumericKind::Double);
        }
        if body.contains('.') {
            return Some(NumericKind::Decimal);
        }
        if body.chars().all(|c| c.is_ascii_digit()) {
            return Some(NumericKind::Integer);
        }
        None
    }

    /// The datatype IRI this numeric kind normalizes to.
    pub fn datatype_iri(self) -> &'static str {
        match self {
            NumericKind::Integer => crate::Vocabulary::XSD_INTEGER,
            NumericKind::Decimal => crate::Vocabulary::XSD_DECIMAL,
            NumericKind::Float => crate::Vocabulary::XSD_FLOAT,
            NumericKind::Double => crate::Vocabulary::XSD_DOUBLE,
        }
    }

    /// The common (highest-ranked) kind of two operands, per spec.md §3.
    pub fn common(self, other: Self) -> Self {
        self.max(other)
    }
}
