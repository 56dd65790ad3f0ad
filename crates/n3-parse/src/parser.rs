//! Recursive-descent N3 parser: token stream to (prefixes, facts, forward
//! rules, backward rules).
//!
//! No teacher precedent for the grammar itself (see the crate's top-level
//! docs for why this isn't a `pest` grammar file); the surrounding error
//! type and the overall "parse into a small owned result struct" shape is
//! grounded on `rdf-io::TurtleParser::parse`'s `ParseResult<Vec<Quad<'a>>>`
//! return convention, generalized to the four-part `(PrefixEnv, Triples,
//! ForwardRules, BackwardRules)` result spec.md §2/§6.1 specifies.

use crate::error::{ParseError, ParseResult};
use crate::lexer::{Lexer, Token};
use n3_model::{Formula, Interner, PrefixEnv, Rule, Term, Triple, Vocabulary};
use std::rc::Rc;

/// The result of parsing a full N3 document.
pub struct ParsedDocument {
    /// Accumulated `@prefix`/`@base` bindings.
    pub prefixes: PrefixEnv,
    /// Ground toplevel triples (spec.md §3 "Lifecycle": non-ground toplevel
    /// triples are discarded).
    pub facts: Vec<Triple>,
    /// Toplevel `{P} => {C}` rules, plus any `log:implies` triples written
    /// at the toplevel.
    pub forward_rules: Vec<Rule>,
    /// Toplevel `{C} <= {B}` rules, plus any `log:impliedBy` triples written
    /// at the toplevel.
    pub backward_rules: Vec<Rule>,
}

/// Parse an N3 document, interning all IRIs/literals/variables/blanks
/// through `interner`.
pub fn parse(src: &str, interner: &Interner) -> ParseResult<ParsedDocument> {
    let tokens = Lexer::new(src).tokenize()?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        interner,
        prefixes: PrefixEnv::new(),
        blank_counter: 0,
    };
    parser.parse_document()
}

struct Parser<'a> {
    tokens: Vec<crate::lexer::SpannedToken>,
    pos: usize,
    interner: &'a Interner,
    prefixes: PrefixEnv,
    blank_counter: u64,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos].token
    }

    fn offset(&self) -> usize {
        self.tokens[self.pos].offset
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].token.clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect_token(&mut self, expected: &Token, what: &str) -> ParseResult<()> {
        if self.peek() == expected {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::syntax(
                self.offset(),
                format!("expected {what}, found {}", self.peek()),
            ))
        }
    }

    fn intern(&self, s: &str) -> Rc<str> {
        self.interner.intern(s)
    }

    fn fresh_blank(&mut self) -> Rc<str> {
        self.blank_counter += 1;
        self.intern(&format!("path_{}", self.blank_counter))
    }

    fn log_predicate(&self, iri: &str) -> Term {
        Term::Iri(self.intern(iri))
    }

    fn parse_document(&mut self) -> ParseResult<ParsedDocument> {
        let mut facts = Vec::new();
        loop {
            match self.peek() {
                Token::Eof => break,
                Token::AtPrefix => self.parse_prefix_directive(true)?,
                Token::AtBase => self.parse_base_directive(true)?,
                Token::BareWord(w) if w.eq_ignore_ascii_case("prefix") => {
                    self.parse_prefix_directive(false)?
                }
                Token::BareWord(w) if w.eq_ignore_ascii_case("base") => {
                    self.parse_base_directive(false)?
                }
                _ => self.parse_statement(&mut facts)?,
            }
        }
        let (facts, forward_rules, backward_rules) = self.lift_toplevel_rules(facts);
        Ok(ParsedDocument {
            prefixes: std::mem::take(&mut self.prefixes),
            facts,
            forward_rules,
            backward_rules,
        })
    }

    fn parse_prefix_directive(&mut self, with_dot: bool) -> ParseResult<()> {
        self.advance();
        let prefix = match self.advance() {
            Token::PrefixedName(p, l) if l.is_empty() => p,
            other => {
                return Err(ParseError::syntax(
                    self.offset(),
                    format!("expected a prefix name, found {other}"),
                ))
            }
        };
        let iri_ref = match self.advance() {
            Token::IriRef(s) => s,
            other => {
                return Err(ParseError::syntax(
                    self.offset(),
                    format!("expected an IRI reference, found {other}"),
                ))
            }
        };
        let resolved = self.prefixes.resolve(&iri_ref);
        self.prefixes.set_prefix(prefix, resolved);
        if with_dot {
            self.expect_token(&Token::Dot, "'.'")?;
        }
        Ok(())
    }

    fn parse_base_directive(&mut self, with_dot: bool) -> ParseResult<()> {
        self.advance();
        let iri_ref = match self.advance() {
            Token::IriRef(s) => s,
            other => {
                return Err(ParseError::syntax(
                    self.offset(),
                    format!("expected an IRI reference, found {other}"),
                ))
            }
        };
        let resolved = self.prefixes.resolve(&iri_ref);
        self.prefixes.set_base(resolved);
        if with_dot {
            self.expect_token(&Token::Dot, "'.'")?;
        }
        Ok(())
    }

    /// Parses one statement (a toplevel fact/rule, or a triple nested in a
    /// formula) into `sink`.
    fn parse_statement(&mut self, sink: &mut Vec<Triple>) -> ParseResult<()> {
        let subject = self.parse_path_term(sink)?;
        match self.peek() {
            Token::ImpliesForward => {
                self.advance();
                let object = self.parse_path_term(sink)?;
                self.expect_statement_end()?;
                let premise = self.require_formula(&subject, "a forward rule's premise")?;
                let conclusion = self.require_formula(&object, "a forward rule's conclusion")?;
                sink.push(Triple::new(
                    Term::Formula(premise),
                    self.log_predicate(Vocabulary::LOG_IMPLIES),
                    Term::Formula(conclusion),
                ));
            }
            Token::ImpliesBackward => {
                self.advance();
                let object = self.parse_path_term(sink)?;
                self.expect_statement_end()?;
                let conclusion = self.require_formula(&subject, "a backward rule's conclusion")?;
                let premise = self.require_formula(&object, "a backward rule's premise")?;
                sink.push(Triple::new(
                    Term::Formula(conclusion),
                    self.log_predicate(Vocabulary::LOG_IMPLIED_BY),
                    Term::Formula(premise),
                ));
            }
            _ => {
                self.parse_predicate_object_list(subject, sink)?;
                self.expect_statement_end()?;
            }
        }
        Ok(())
    }

    fn require_formula(&self, term: &Term, what: &str) -> ParseResult<Rc<Formula>> {
        match term {
            Term::Formula(f) => Ok(Rc::clone(f)),
            other => Err(ParseError::syntax(
                self.offset(),
                format!("expected {what} to be a quoted formula, found {other}"),
            )),
        }
    }

    fn expect_statement_end(&mut self) -> ParseResult<()> {
        if self.peek() == &Token::Dot {
            self.advance();
            return Ok(());
        }
        if matches!(self.peek(), Token::RBrace | Token::Eof) {
            return Ok(());
        }
        Err(ParseError::syntax(
            self.offset(),
            format!("expected '.' to end the statement, found {}", self.peek()),
        ))
    }

    fn parse_predicate_object_list(&mut self, subject: Term, sink: &mut Vec<Triple>) -> ParseResult<()> {
        loop {
            if self.peek() == &Token::Keyword("has".to_string()) {
                self.advance();
            }
            let inverse = match self.peek() {
                Token::Keyword(k) if k == "is" => {
                    self.advance();
                    true
                }
                Token::InverseArrow => {
                    self.advance();
                    true
                }
                _ => false,
            };
            let predicate = self.parse_predicate_term(sink)?;
            if inverse && self.peek() == &Token::Keyword("of".to_string()) {
                self.advance();
            }
            loop {
                let object = self.parse_path_term(sink)?;
                if inverse {
                    sink.push(Triple::new(object, predicate.clone(), subject.clone()));
                } else {
                    sink.push(Triple::new(subject.clone(), predicate.clone(), object));
                }
                if self.peek() == &Token::Comma {
                    self.advance();
                    continue;
                }
                break;
            }
            if self.peek() == &Token::Semicolon {
                self.advance();
                if matches!(self.peek(), Token::Dot | Token::RBrace | Token::Eof) {
                    break;
                }
                continue;
            }
            break;
        }
        Ok(())
    }

    fn parse_predicate_term(&mut self, sink: &mut Vec<Triple>) -> ParseResult<Term> {
        match self.peek().clone() {
            Token::Keyword(k) if k == "a" => {
                self.advance();
                Ok(self.log_predicate(Vocabulary::RDF_TYPE))
            }
            Token::Equals => {
                self.advance();
                Ok(self.log_predicate(Vocabulary::OWL_SAME_AS))
            }
            _ => self.parse_path_term(sink),
        }
    }

    fn parse_path_term(&mut self, sink: &mut Vec<Triple>) -> ParseResult<Term> {
        let mut term = self.parse_primary_term(sink)?;
        loop {
            match self.peek() {
                Token::Bang => {
                    self.advance();
                    let predicate = self.parse_primary_term(sink)?;
                    let blank = self.fresh_blank();
                    sink.push(Triple::new(term.clone(), predicate, Term::Blank(Rc::clone(&blank))));
                    term = Term::Blank(blank);
                }
                Token::Caret => {
                    self.advance();
                    let predicate = self.parse_primary_term(sink)?;
                    let blank = self.fresh_blank();
                    sink.push(Triple::new(Term::Blank(Rc::clone(&blank)), predicate, term.clone()));
                    term = Term::Blank(blank);
                }
                _ => break,
            }
        }
        Ok(term)
    }

    fn parse_primary_term(&mut self, sink: &mut Vec<Triple>) -> ParseResult<Term> {
        let offset = self.offset();
        match self.advance() {
            Token::IriRef(iri) => {
                let resolved = self.prefixes.resolve(&iri);
                Ok(Term::Iri(self.intern(&resolved)))
            }
            Token::PrefixedName(prefix, local) => {
                let qname = format!("{prefix}:{local}");
                let expanded = self
                    .prefixes
                    .expand(&qname)
                    .ok_or_else(|| ParseError::syntax(offset, format!("unbound prefix in '{qname}'")))?;
                Ok(Term::Iri(self.intern(&expanded)))
            }
            Token::Variable(name) => Ok(Term::Variable(self.intern(&name))),
            Token::BlankNodeLabel(name) => Ok(Term::Blank(self.intern(&name))),
            Token::Keyword(k) if k == "true" || k == "false" => {
                Ok(Term::Formula(Rc::new(Formula::empty())))
            }
            Token::StringLiteral(lex) => self.parse_literal_suffix(lex, offset),
            Token::NumberLiteral(lex) => Ok(Term::literal_str(self.intern(&lex))),
            Token::LBracket => self.parse_blank_property_list(sink),
            Token::LParen => self.parse_list(sink),
            Token::LBrace => self.parse_formula(),
            other => Err(ParseError::syntax(
                offset,
                format!("expected a term, found {other}"),
            )),
        }
    }

    fn parse_literal_suffix(&mut self, lex: String, offset: usize) -> ParseResult<Term> {
        let lex_rc = self.intern(&lex);
        match self.peek().clone() {
            Token::DoubleCaret => {
                self.advance();
                let datatype = match self.advance() {
                    Token::IriRef(iri) => {
                        let resolved = self.prefixes.resolve(&iri);
                        self.intern(&resolved)
                    }
                    Token::PrefixedName(prefix, local) => {
                        let qname = format!("{prefix}:{local}");
                        let expanded = self.prefixes.expand(&qname).ok_or_else(|| {
                            ParseError::syntax(offset, format!("unbound prefix in '{qname}'"))
                        })?;
                        self.intern(&expanded)
                    }
                    other => {
                        return Err(ParseError::syntax(
                            offset,
                            format!("expected a datatype IRI, found {other}"),
                        ))
                    }
                };
                Ok(Term::literal_typed(lex_rc, datatype))
            }
            Token::LangTag(tag) => {
                self.advance();
                Ok(Term::literal_lang(lex_rc, self.intern(&tag)))
            }
            _ => Ok(Term::literal_str(lex_rc)),
        }
    }

    fn parse_blank_property_list(&mut self, sink: &mut Vec<Triple>) -> ParseResult<Term> {
        if self.peek() == &Token::RBracket {
            self.advance();
            return Ok(Term::Blank(self.fresh_blank()));
        }
        let node = if self.peek() == &Token::Keyword("id".to_string()) {
            self.advance();
            self.parse_primary_term(sink)?
        } else {
            Term::Blank(self.fresh_blank())
        };
        if self.peek() != &Token::RBracket {
            self.parse_predicate_object_list(node.clone(), sink)?;
        }
        self.expect_token(&Token::RBracket, "']'")?;
        Ok(node)
    }

    fn parse_list(&mut self, sink: &mut Vec<Triple>) -> ParseResult<Term> {
        let mut items = Vec::new();
        loop {
            if self.peek() == &Token::RParen {
                self.advance();
                break;
            }
            items.push(self.parse_path_term(sink)?);
        }
        Ok(Term::List(items))
    }

    fn parse_formula(&mut self) -> ParseResult<Term> {
        let mut inner = Vec::new();
        loop {
            if self.peek() == &Token::RBrace {
                self.advance();
                break;
            }
            self.parse_statement(&mut inner)?;
        }
        Ok(Term::Formula(Rc::new(Formula::new(inner))))
    }

    /// Splits the toplevel fact list into ground facts and the rules that
    /// `{P} => {C}` / `{C} <= {B}` syntax (and bare `log:implies`/
    /// `log:impliedBy` triples) desugar to, lifting body blanks to
    /// variables (spec.md §4.1).
    fn lift_toplevel_rules(&self, facts: Vec<Triple>) -> (Vec<Triple>, Vec<Rule>, Vec<Rule>) {
        let mut plain = Vec::new();
        let mut forward = Vec::new();
        let mut backward = Vec::new();
        for triple in facts {
            let predicate_iri = triple.predicate.as_iri().map(str::to_string);
            match (predicate_iri.as_deref(), &triple.subject, &triple.object) {
                (Some(Vocabulary::LOG_IMPLIES), Term::Formula(premise), Term::Formula(conclusion)) => {
                    forward.push(Rule::forward(
                        lift_blanks(&premise.triples),
                        conclusion.triples.clone(),
                    ));
                }
                (Some(Vocabulary::LOG_IMPLIED_BY), Term::Formula(conclusion), Term::Formula(premise)) => {
                    backward.push(Rule::backward(
                        conclusion.triples.clone(),
                        lift_blanks(&premise.triples),
                    ));
                }
                _ => {
                    if triple.is_ground() {
                        plain.push(triple);
                    }
                }
            }
        }
        (plain, forward, backward)
    }
}

fn lift_blanks(triples: &[Triple]) -> Vec<Triple> {
    triples
        .iter()
        .map(|t| {
            Triple::new(
                lift_blanks_term(&t.subject),
                lift_blanks_term(&t.predicate),
                lift_blanks_term(&t.object),
            )
        })
        .collect()
}

fn lift_blanks_term(term: &Term) -> Term {
    match term {
        Term::Blank(label) => Term::Variable(Rc::clone(label)),
        Term::List(items) => Term::List(items.iter().map(lift_blanks_term).collect()),
        Term::OpenList(items, tail) => {
            Term::OpenList(items.iter().map(lift_blanks_term).collect(), Rc::clone(tail))
        }
        other => other.clone(),
    }
}
