//! IRI dereferencing for `log:semantics` (spec.md §6.2).
//!
//! No teacher precedent (the teacher has no network layer at all); grounded
//! directly on spec.md §6.2's wire contract: `file://`/bare-path IRIs are
//! read from disk, `http(s)://` IRIs are fetched with up to 10 redirects and
//! a dereferencing `Accept` header, gzip/deflate/br bodies are transparently
//! decompressed, and `-e/--enforce-https` rewrites the scheme before the
//! request is made. Every successful dereference is cached by IRI for the
//! lifetime of the [`Dereferencer`], since a single run may ask for the same
//! imported ontology many times across nested quoted formulas.

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod error;

pub use error::{DerefError, DerefResult};

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Read;

/// The `Accept` header sent with every HTTP(S) dereference, preferring N3
/// and Turtle over RDF/XML (spec.md §6.2).
const ACCEPT_HEADER: &str = "text/n3, text/turtle;q=0.9, application/rdf+xml;q=0.5, */*;q=0.1";

/// Maximum HTTP redirects to follow before giving up (spec.md §6.2).
const MAX_REDIRECTS: u32 = 10;

/// Fetches and caches the N3/Turtle text behind an IRI.
pub struct Dereferencer {
    agent: ureq::Agent,
    cache: RefCell<HashMap<String, String>>,
}

impl Default for Dereferencer {
    fn default() -> Self {
        Self::new()
    }
}

impl Dereferencer {
    /// A dereferencer with an empty cache.
    pub fn new() -> Self {
        Dereferencer {
            agent: ureq::AgentBuilder::new().redirects(MAX_REDIRECTS).build(),
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Resolve `iri` to its source text, consulting and then populating the
    /// cache. `enforce_https` rewrites an `http://` scheme to `https://`
    /// before any network request (spec.md §6.3 `-e`).
    pub fn deref(&self, iri: &str, enforce_https: bool) -> DerefResult<String> {
        if let Some(cached) = self.cache.borrow().get(iri) {
            return Ok(cached.clone());
        }
        let text = self.fetch(iri, enforce_https)?;
        self.cache.borrow_mut().insert(iri.to_string(), text.clone());
        Ok(text)
    }

    /// Whether `iri` has already been resolved and cached this run.
    pub fn is_cached(&self, iri: &str) -> bool {
        self.cache.borrow().contains_key(iri)
    }

    fn fetch(&self, iri: &str, enforce_https: bool) -> DerefResult<String> {
        if let Some(path) = iri.strip_prefix("file://") {
            return std::fs::read_to_string(path).map_err(|e| DerefError::Io(iri.to_string(), e.to_string()));
        }
        if !iri.contains("://") {
            return std::fs::read_to_string(iri).map_err(|e| DerefError::Io(iri.to_string(), e.to_string()));
        }

        let target = if enforce_https {
            iri.replacen("http://", "https://", 1)
        } else {
            iri.to_string()
        };

        let response = self
            .agent
            .get(&target)
            .set("Accept", ACCEPT_HEADER)
            .call()
            .map_err(|e| DerefError::Http(target.clone(), e.to_string()))?;

        let encoding = response.header("Content-Encoding").map(str::to_string);
        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| DerefError::Io(target.clone(), e.to_string()))?;
        decode_body(&bytes, encoding.as_deref()).map_err(|e| DerefError::Decode(target, e))
    }
}

/// Transparently decompress a response body per its `Content-Encoding`,
/// then validate it as UTF-8 (spec.md §6.2: "gzip/deflate/br decompression").
fn decode_body(bytes: &[u8], encoding: Option<&str>) -> Result<String, String> {
    let decoded = match encoding {
        Some("gzip") => {
            let mut out = Vec::new();
            flate2::read::GzDecoder::new(bytes)
                .read_to_end(&mut out)
                .map_err(|e| e.to_string())?;
            out
        }
        Some("deflate") => {
            let mut out = Vec::new();
            flate2::read::DeflateDecoder::new(bytes)
                .read_to_end(&mut out)
                .map_err(|e| e.to_string())?;
            out
        }
        Some("br") => {
            let mut out = Vec::new();
            brotli::Decompressor::new(bytes, 4096)
                .read_to_end(&mut out)
                .map_err(|e| e.to_string())?;
            out
        }
        _ => bytes.to_vec(),
    };
    String::from_utf8(decoded).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_body_round_trips_without_an_encoding() {
        let text = decode_body("hello".as_bytes(), None).unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn unreadable_bare_path_fails_with_io_error() {
        let deref = Dereferencer::new();
        let err = deref.deref("/nonexistent/path/does/not/exist.n3", false).unwrap_err();
        assert!(matches!(err, DerefError::Io(_, _)));
    }

    #[test]
    fn cache_starts_empty() {
        let deref = Dereferencer::new();
        assert!(!deref.is_cached("file:///tmp/anything.n3"));
    }
}
