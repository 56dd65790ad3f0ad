//! Parse errors.
//!
//! Grounded on `rdf-io::ParseError` (`thiserror`-derived, `Syntax { line,
//! col, message }` variant), narrowed to what the tokenizer/parser pair
//! actually raises — no `InvalidIri`/`InvalidLiteral`/`Unsupported`
//! variants, since IRI and literal well-formedness are checked as part of
//! ordinary syntax errors here rather than as a second validation pass.

use thiserror::Error;

/// A parse failure, carrying a codepoint offset into the source text
/// (spec.md §6.1: "a syntax error kind with a codepoint offset").
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A lexical or grammatical error.
    #[error("syntax error at offset {offset}: {message}")]
    Syntax {
        /// Codepoint offset into the source text.
        offset: usize,
        /// Human-readable description.
        message: String,
    },

    /// End of input reached while more tokens were expected.
    #[error("unexpected end of input: {message}")]
    UnexpectedEof {
        /// What was expected.
        message: String,
    },
}

impl ParseError {
    /// Build a [`ParseError::Syntax`] at `offset`.
    pub fn syntax(offset: usize, message: impl Into<String>) -> Self {
        ParseError::Syntax {
            offset,
            message: message.into(),
        }
    }

    /// The codepoint offset this error occurred at, if it carries one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            ParseError::Syntax { offset, .. } => Some(*offset),
            ParseError::UnexpectedEof { .. } => None,
        }
    }

    /// Convert a codepoint offset into a 1-based (line, column) pair, for
    /// the CLI to report (spec.md §6.1: "The CLI converts this to a
    /// line:column message").
    pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
        let mut line = 1;
        let mut col = 1;
        for ch in source.chars().take(offset) {
            if ch == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
        }
        (line, col)
    }
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
