//! Base/prefix environment: `@prefix`/`@base`/`PREFIX`/`BASE` bookkeeping
//! and QName expansion for the parser, plus safe-local shrinking for the
//! printer.
//!
//! No direct teacher precedent — `rdf-io::turtle` resolves Turtle prefixes
//! inline while parsing rather than exposing a standalone environment type.
//! Grounded generally on that file's `HashMap<String, String>` prefix-map
//! style, switched to `rustc_hash::FxHashMap` to match this crate's other
//! lookup tables.

use rustc_hash::FxHashMap;

/// The base IRI and prefix map accumulated while parsing a document, and
/// consulted when printing one back out.
#[derive(Clone, Debug, Default)]
pub struct PrefixEnv {
    base: Option<String>,
    prefixes: FxHashMap<String, String>,
}

impl PrefixEnv {
    /// An empty environment with no base IRI and no prefixes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base IRI (from `@base <iri> .` or `BASE <iri>`).
    pub fn set_base(&mut self, base: impl Into<String>) {
        self.base = Some(base.into());
    }

    /// The current base IRI, if one has been set.
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Register a prefix binding (from `@prefix p: <iri> .` or `PREFIX p:
    /// <iri>`). A later binding for the same prefix overwrites the earlier
    /// one, matching the parser reading the document top to bottom.
    pub fn set_prefix(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        self.prefixes.insert(prefix.into(), iri.into());
    }

    /// Expand a QName `prefix:local` into its full IRI, or `None` if the
    /// prefix is unbound.
    pub fn expand(&self, qname: &str) -> Option<String> {
        let (prefix, local) = qname.split_once(':')?;
        let ns = self.prefixes.get(prefix)?;
        Some(format!("{ns}{local}"))
    }

    /// Resolve a possibly-relative IRI reference against the current base,
    /// per RFC 3986 §5.3 merge rules for the common cases N3 documents use
    /// (absolute IRIs pass through unchanged; a leading `/` replaces the
    /// base's path; anything else is appended after the base's last `/`).
    pub fn resolve(&self, iri_ref: &str) -> String {
        if iri_ref.contains("://") {
            return iri_ref.to_string();
        }
        let Some(base) = &self.base else {
            return iri_ref.to_string();
        };
        if let Some(rest) = iri_ref.strip_prefix('/') {
            if let Some(scheme_end) = base.find("://") {
                let after_scheme = &base[scheme_end + 3..];
                let authority_end = after_scheme.find('/').map(|i| scheme_end + 3 + i).unwrap_or(base.len());
                return format!("{}/{}", &base[..authority_end], rest);
            }
            return format!("/{rest}");
        }
        match base.rfind('/') {
            Some(pos) => format!("{}{}", &base[..=pos], iri_ref),
            None => format!("{base}{iri_ref}"),
        }
    }

    /// Shrink a full IRI back into `prefix:local` form for printing, if a
    /// bound prefix's namespace is a prefix of `iri` and the remainder is a
    /// syntactically safe QName local part (starts with a letter or
    /// underscore, contains only name characters). Returns `None` when no
    /// such shrinking is safe, in which case the printer falls back to a
    /// full `<iri>`.
    pub fn shrink<'a>(&self, iri: &'a str) -> Option<String> {
        let mut best: Option<(&str, &'a str)> = None;
        for (prefix, ns) in &self.prefixes {
            if let Some(local) = iri.strip_prefix(ns.as_str()) {
                if is_safe_local(local) {
                    match best {
                        Some((_, best_local)) if best_local.len() <= local.len() => {}
                        _ => best = Some((prefix, local)),
                    }
                }
            }
        }
        best.map(|(prefix, local)| format!("{prefix}:{local}"))
    }
}

fn is_safe_local(local: &str) -> bool {
    if local.is_empty() {
        return true;
    }
    let mut chars = local.chars();
    let first = chars.next().unwrap();
    if !(first.is_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_unbound_prefix_is_none() {
        let env = PrefixEnv::new();
        assert_eq!(env.expand("ex:thing"), None);
    }

    #[test]
    fn expand_bound_prefix() {
        let mut env = PrefixEnv::new();
        env.set_prefix("ex", "http://example.org/");
        assert_eq!(
            env.expand("ex:thing").as_deref(),
            Some("http://example.org/thing")
        );
    }

    #[test]
    fn shrink_picks_the_longest_matching_namespace() {
        let mut env = PrefixEnv::new();
        env.set_prefix("ex", "http://example.org/");
        env.set_prefix("exsub", "http://example.org/sub/");
        assert_eq!(
            env.shrink("http://example.org/sub/thing").as_deref(),
            Some("exsub:thing")
        );
    }

    #[test]
    fn shrink_rejects_unsafe_local_part() {
        let mut env = PrefixEnv::new();
        env.set_prefix("ex", "http://example.org/");
        assert_eq!(env.shrink("http://example.org/1invalid"), None);
    }

    #[test]
    fn resolve_relative_against_base() {
        let mut env = PrefixEnv::new();
        env.set_base("http://example.org/doc");
        assert_eq!(env.resolve("thing"), "http://example.org/thing");
    }

    #[test]
    fn resolve_absolute_iri_passes_through() {
        let env = PrefixEnv::new();
        assert_eq!(
            env.resolve("http://other.org/x"),
            "http://other.org/x"
        );
    }
}
