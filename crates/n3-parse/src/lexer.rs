//! N3 tokenizer.
//!
//! Hand-rolled rather than grammar-file-generated; see the crate's top-level
//! docs (and DESIGN.md) for why. Grounded on `MattesWhite/metis-rs`'s
//! `parse/n3/terminals.rs` module split (a dedicated terminals/tokens layer
//! ahead of the grammar productions) for the shape of "tokenize first, parse
//! a token stream second" rather than scanning raw `&str` inline in the
//! parser.

use crate::error::ParseError;
use std::fmt;
use std::str::CharIndices;

/// A lexical token, carrying the codepoint offset it started at (for error
/// reporting, spec.md §6.1).
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    /// The token itself.
    pub token: Token,
    /// Codepoint offset of the token's first character.
    pub offset: usize,
}

/// The token alphabet of N3: Turtle's tokens plus formulas, variables, and
/// the rule arrows.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `<iri>` — absolute or relative, angle brackets already stripped.
    IriRef(String),
    /// `prefix:local` — the empty prefix (`:local`) is represented as `""`.
    PrefixedName(String, String),
    /// `?name` — a universal variable, without its leading `?`.
    Variable(String),
    /// `_:label` — an explicit blank node label, without its leading `_:`.
    BlankNodeLabel(String),
    /// A decoded string literal's content (quotes, triple-quotes, and
    /// escape sequences already resolved).
    StringLiteral(String),
    /// A numeric literal's raw lexical form (kept verbatim so the model
    /// layer can infer its [`n3_model::NumericKind`]).
    NumberLiteral(String),
    /// `@tag` — a language tag, without its leading `@`.
    LangTag(String),
    /// `^^` — datatype annotation marker.
    DoubleCaret,
    /// A bare reserved word: `a`, `is`, `of`, `has`, `true`, `false`, `id`.
    Keyword(String),
    /// A bare, non-reserved, non-colon-terminated word (`PREFIX`, `BASE` in
    /// their SPARQL-style forms). Never a valid term by itself.
    BareWord(String),
    /// `.`
    Dot,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `=>`
    ImpliesForward,
    /// `<=`
    ImpliesBackward,
    /// `=`
    Equals,
    /// `<-`
    InverseArrow,
    /// `!`
    Bang,
    /// `^` (the reverse-path operator, distinct from `^^`).
    Caret,
    /// `@prefix`
    AtPrefix,
    /// `@base`
    AtBase,
    /// End of input.
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::IriRef(iri) => write!(f, "<{iri}>"),
            Token::PrefixedName(p, l) => write!(f, "{p}:{l}"),
            Token::Variable(v) => write!(f, "?{v}"),
            Token::BlankNodeLabel(l) => write!(f, "_:{l}"),
            Token::StringLiteral(s) => write!(f, "\"{s}\""),
            Token::NumberLiteral(s) => write!(f, "{s}"),
            Token::LangTag(t) => write!(f, "@{t}"),
            Token::DoubleCaret => write!(f, "^^"),
            Token::Keyword(k) => write!(f, "{k}"),
            Token::BareWord(w) => write!(f, "{w}"),
            Token::Dot => write!(f, "."),
            Token::Semicolon => write!(f, ";"),
            Token::Comma => write!(f, ","),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::ImpliesForward => write!(f, "=>"),
            Token::ImpliesBackward => write!(f, "<="),
            Token::Equals => write!(f, "="),
            Token::InverseArrow => write!(f, "<-"),
            Token::Bang => write!(f, "!"),
            Token::Caret => write!(f, "^"),
            Token::AtPrefix => write!(f, "@prefix"),
            Token::AtBase => write!(f, "@base"),
            Token::Eof => write!(f, "<eof>"),
        }
    }
}

const RESERVED_WORDS: &[&str] = &["a", "is", "of", "has", "true", "false", "id"];

/// Tokenizes an N3 source document into a flat stream of [`SpannedToken`]s
/// (comments and whitespace already stripped).
pub struct Lexer<'a> {
    src: &'a str,
    chars: std::iter::Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    /// Build a lexer over `src`.
    pub fn new(src: &'a str) -> Self {
        Lexer {
            src,
            chars: src.char_indices().peekable(),
        }
    }

    /// Tokenize the entire input, ending with a single [`Token::Eof`].
    pub fn tokenize(mut self) -> Result<Vec<SpannedToken>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            let Some(&(offset, ch)) = self.chars.peek() else {
                tokens.push(SpannedToken {
                    token: Token::Eof,
                    offset: self.src.chars().count(),
                });
                return Ok(tokens);
            };
            let token = self.next_token(offset, ch)?;
            tokens.push(SpannedToken { token, offset });
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while matches!(self.chars.peek(), Some((_, c)) if c.is_whitespace()) {
                self.chars.next();
            }
            if matches!(self.chars.peek(), Some((_, '#'))) {
                while matches!(self.chars.peek(), Some((_, c)) if *c != '\n') {
                    self.chars.next();
                }
                continue;
            }
            break;
        }
    }

    fn next_token(&mut self, offset: usize, ch: char) -> Result<Token, ParseError> {
        match ch {
            '<' => self.lex_angle(offset),
            '?' => {
                self.chars.next();
                Ok(Token::Variable(self.take_name()))
            }
            '_' if self.peek_at(1) == Some(':') => {
                self.chars.next();
                self.chars.next();
                Ok(Token::BlankNodeLabel(self.take_name()))
            }
            '"' | '\'' => self.lex_string(offset, ch),
            '@' => self.lex_at_word(offset),
            '^' => {
                self.chars.next();
                if matches!(self.chars.peek(), Some((_, '^'))) {
                    self.chars.next();
                    Ok(Token::DoubleCaret)
                } else {
                    Ok(Token::Caret)
                }
            }
            '=' => {
                self.chars.next();
                if matches!(self.chars.peek(), Some((_, '>'))) {
                    self.chars.next();
                    Ok(Token::ImpliesForward)
                } else {
                    Ok(Token::Equals)
                }
            }
            '!' => {
                self.chars.next();
                Ok(Token::Bang)
            }
            '.' if !self.peek_is_digit_at(1) => {
                self.chars.next();
                Ok(Token::Dot)
            }
            ';' => {
                self.chars.next();
                Ok(Token::Semicolon)
            }
            ':' => {
                self.chars.next();
                Ok(Token::PrefixedName(String::new(), self.take_pn_local()))
            }
            ',' => {
                self.chars.next();
                Ok(Token::Comma)
            }
            '[' => {
                self.chars.next();
                Ok(Token::LBracket)
            }
            ']' => {
                self.chars.next();
                Ok(Token::RBracket)
            }
            '(' => {
                self.chars.next();
                Ok(Token::LParen)
            }
            ')' => {
                self.chars.next();
                Ok(Token::RParen)
            }
            '{' => {
                self.chars.next();
                Ok(Token::LBrace)
            }
            '}' => {
                self.chars.next();
                Ok(Token::RBrace)
            }
            c if c.is_ascii_digit() || c == '+' || c == '-' => self.lex_number(offset),
            c if is_name_start(c) => self.lex_name_or_keyword(offset),
            other => Err(ParseError::syntax(
                offset,
                format!("unexpected character '{other}'"),
            )),
        }
    }

    fn lex_angle(&mut self, offset: usize) -> Result<Token, ParseError> {
        if self.peek_at(1) == Some('=') {
            self.chars.next();
            self.chars.next();
            return Ok(Token::ImpliesBackward);
        }
        if self.peek_at(1) == Some('-') {
            self.chars.next();
            self.chars.next();
            return Ok(Token::InverseArrow);
        }
        self.chars.next();
        let mut iri = String::new();
        loop {
            match self.chars.next() {
                Some((_, '>')) => return Ok(Token::IriRef(iri)),
                Some((_, c)) => iri.push(c),
                None => {
                    return Err(ParseError::syntax(offset, "unterminated IRI reference"))
                }
            }
        }
    }

    fn lex_string(&mut self, offset: usize, quote: char) -> Result<Token, ParseError> {
        let triple = self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote);
        self.chars.next();
        if triple {
            self.chars.next();
            self.chars.next();
        }
        let mut content = String::new();
        loop {
            if triple {
                if self.peek_at(0) == Some(quote)
                    && self.peek_at(1) == Some(quote)
                    && self.peek_at(2) == Some(quote)
                {
                    self.chars.next();
                    self.chars.next();
                    self.chars.next();
                    return Ok(Token::StringLiteral(content));
                }
            } else if self.peek_at(0) == Some(quote) {
                self.chars.next();
                return Ok(Token::StringLiteral(content));
            }
            match self.chars.next() {
                Some((_, '\\')) => content.push(self.lex_escape(offset)?),
                Some((_, c)) => content.push(c),
                None => return Err(ParseError::syntax(offset, "unterminated string literal")),
            }
        }
    }

    fn lex_escape(&mut self, offset: usize) -> Result<char, ParseError> {
        match self.chars.next() {
            Some((_, 'n')) => Ok('\n'),
            Some((_, 't')) => Ok('\t'),
            Some((_, 'r')) => Ok('\r'),
            Some((_, '"')) => Ok('"'),
            Some((_, '\'')) => Ok('\''),
            Some((_, '\\')) => Ok('\\'),
            Some((_, 'u')) => self.lex_unicode_escape(offset, 4),
            Some((_, 'U')) => self.lex_unicode_escape(offset, 8),
            Some((_, other)) => Ok(other),
            None => Err(ParseError::syntax(offset, "unterminated escape sequence")),
        }
    }

    fn lex_unicode_escape(&mut self, offset: usize, digits: usize) -> Result<char, ParseError> {
        let mut code = String::new();
        for _ in 0..digits {
            match self.chars.next() {
                Some((_, c)) => code.push(c),
                None => return Err(ParseError::syntax(offset, "unterminated unicode escape")),
            }
        }
        let codepoint = u32::from_str_radix(&code, 16)
            .map_err(|_| ParseError::syntax(offset, "invalid unicode escape"))?;
        char::from_u32(codepoint)
            .ok_or_else(|| ParseError::syntax(offset, "invalid unicode codepoint"))
    }

    fn lex_at_word(&mut self, offset: usize) -> Result<Token, ParseError> {
        self.chars.next();
        let word = self.take_name_with_hyphens();
        if word.is_empty() {
            return Err(ParseError::syntax(offset, "expected a word after '@'"));
        }
        match word.as_str() {
            "prefix" => Ok(Token::AtPrefix),
            "base" => Ok(Token::AtBase),
            other => Ok(Token::LangTag(other.to_string())),
        }
    }

    fn lex_number(&mut self, offset: usize) -> Result<Token, ParseError> {
        let mut lex = String::new();
        if matches!(self.chars.peek(), Some((_, '+')) | Some((_, '-'))) {
            lex.push(self.chars.next().unwrap().1);
        }
        while matches!(self.chars.peek(), Some((_, c)) if c.is_ascii_digit()) {
            lex.push(self.chars.next().unwrap().1);
        }
        if matches!(self.chars.peek(), Some((_, '.'))) && self.peek_is_digit_at(1) {
            lex.push(self.chars.next().unwrap().1);
            while matches!(self.chars.peek(), Some((_, c)) if c.is_ascii_digit()) {
                lex.push(self.chars.next().unwrap().1);
            }
        }
        if matches!(self.chars.peek(), Some((_, 'e')) | Some((_, 'E'))) {
            let mut lookahead = self.chars.clone();
            lookahead.next();
            let exponent_follows = matches!(lookahead.peek(), Some((_, c)) if c.is_ascii_digit())
                || (matches!(lookahead.peek(), Some((_, '+')) | Some((_, '-'))) && {
                    lookahead.next();
                    matches!(lookahead.peek(), Some((_, c)) if c.is_ascii_digit())
                });
            if exponent_follows {
                lex.push(self.chars.next().unwrap().1);
                if matches!(self.chars.peek(), Some((_, '+')) | Some((_, '-'))) {
                    lex.push(self.chars.next().unwrap().1);
                }
                while matches!(self.chars.peek(), Some((_, c)) if c.is_ascii_digit()) {
                    lex.push(self.chars.next().unwrap().1);
                }
            }
        }
        if lex.is_empty() || lex == "+" || lex == "-" {
            return Err(ParseError::syntax(offset, "malformed numeric literal"));
        }
        Ok(Token::NumberLiteral(lex))
    }

    fn lex_name_or_keyword(&mut self, _offset: usize) -> Result<Token, ParseError> {
        let start = self.take_name();
        if matches!(self.chars.peek(), Some((_, ':'))) {
            self.chars.next();
            let local = self.take_pn_local();
            return Ok(Token::PrefixedName(start, local));
        }
        if RESERVED_WORDS.contains(&start.as_str()) {
            return Ok(Token::Keyword(start));
        }
        Ok(Token::BareWord(start))
    }

    fn take_name(&mut self) -> String {
        let mut name = String::new();
        while matches!(self.chars.peek(), Some((_, c)) if is_name_char(*c)) {
            name.push(self.chars.next().unwrap().1);
        }
        name
    }

    fn take_pn_local(&mut self) -> String {
        let mut name = String::new();
        while matches!(self.chars.peek(), Some((_, c)) if is_name_char(*c) || *c == '.' || *c == '-') {
            name.push(self.chars.next().unwrap().1);
        }
        name
    }

    fn take_name_with_hyphens(&mut self) -> String {
        let mut name = String::new();
        while matches!(self.chars.peek(), Some((_, c)) if c.is_alphanumeric() || *c == '-') {
            name.push(self.chars.next().unwrap().1);
        }
        name
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.clone().nth(n).map(|(_, c)| c)
    }

    fn peek_is_digit_at(&self, n: usize) -> bool {
        self.peek_at(n).is_some_and(|c| c.is_ascii_digit())
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens_of(src: &str) -> Vec<Token> {
        Lexer::new(src)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn tokenizes_prefixed_triple() {
        let toks = tokens_of(":A :sub :B .");
        assert_eq!(
            toks,
            vec![
                Token::PrefixedName("".into(), "A".into()),
                Token::PrefixedName("".into(), "sub".into()),
                Token::PrefixedName("".into(), "B".into()),
                Token::Dot,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn tokenizes_iri_ref() {
        let toks = tokens_of("<http://example.org/a>");
        assert_eq!(
            toks,
            vec![Token::IriRef("http://example.org/a".into()), Token::Eof]
        );
    }

    #[test]
    fn tokenizes_forward_and_backward_arrows() {
        let toks = tokens_of("=> <=");
        assert_eq!(
            toks,
            vec![Token::ImpliesForward, Token::ImpliesBackward, Token::Eof]
        );
    }

    #[test]
    fn tokenizes_variable_and_formula_braces() {
        let toks = tokens_of("{ ?x :p ?y }");
        assert_eq!(
            toks,
            vec![
                Token::LBrace,
                Token::Variable("x".into()),
                Token::PrefixedName("".into(), "p".into()),
                Token::Variable("y".into()),
                Token::RBrace,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn tokenizes_quoted_string_with_escape() {
        let toks = tokens_of("\"line\\nbreak\"");
        assert_eq!(
            toks,
            vec![Token::StringLiteral("line\nbreak".into()), Token::Eof]
        );
    }

    #[test]
    fn tokenizes_typed_literal_suffix() {
        let toks = tokens_of("\"42\"^^xsd:integer");
        assert_eq!(
            toks,
            vec![
                Token::StringLiteral("42".into()),
                Token::DoubleCaret,
                Token::PrefixedName("xsd".into(), "integer".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn tokenizes_number_literal() {
        let toks = tokens_of("3.14");
        assert_eq!(toks, vec![Token::NumberLiteral("3.14".into()), Token::Eof]);
    }

    #[test]
    fn skips_comments() {
        let toks = tokens_of("# a comment\n:A :p :B .");
        assert_eq!(
            toks,
            vec![
                Token::PrefixedName("".into(), "A".into()),
                Token::PrefixedName("".into(), "p".into()),
                Token::PrefixedName("".into(), "B".into()),
                Token::Dot,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn recognizes_reserved_words() {
        let toks = tokens_of("a has is of true false id");
        assert_eq!(
            toks,
            vec![
                Token::Keyword("a".into()),
                Token::Keyword("has".into()),
                Token::Keyword("is".into()),
                Token::Keyword("of".into()),
                Token::Keyword("true".into()),
                Token::Keyword("false".into()),
                Token::Keyword("id".into()),
                Token::Eof,
            ]
        );
    }
}
