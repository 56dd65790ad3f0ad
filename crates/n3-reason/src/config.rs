//! Engine configuration.
//!
//! Grounded on `reasoning::ReasonerConfig` (a plain `Clone` struct of
//! bounds/flags passed into `infer`), but threaded explicitly through every
//! `reason_stream`/`prove`/`forward_chain` call rather than held in process-
//! wide statics — a deliberate deviation from spec.md §5/§9's "process-wide
//! configuration" framing, recorded as an Open Question resolution in
//! DESIGN.md.

/// Process-wide configuration flags from spec.md §5/§6.3/§9, threaded
/// explicitly instead of living in global statics.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// `-d/--deterministic-skolem`: Skolem IDs depend only on the subject
    /// term, with no per-run salt (spec.md §6.3).
    pub deterministic_skolem: bool,
    /// `-e/--enforce-https`: rewrite `http://` to `https://` before
    /// dereferencing (spec.md §6.2).
    pub enforce_https: bool,
    /// `-s/--super-restricted`: disable every builtin except
    /// `log:implies`/`log:impliedBy` (spec.md §4.4).
    pub super_restricted: bool,
    /// `-p/--proof-comments`: attach a human-readable explanation to each
    /// derivation (spec.md §6.3). The core always records the information
    /// needed (each [`n3_model::DerivedFact`] carries its rule/premise/
    /// bindings); this flag only controls whether the CLI prints it.
    pub proof_comments: bool,
    /// Upper bound on the number of forward-chaining saturation rounds
    /// before giving up with [`crate::error::ReasonError::ResourceLimit`]
    /// (not part of spec.md's core contract — see that variant's docs).
    pub max_rounds: usize,
    /// Upper bound on the number of facts the working set may hold before
    /// giving up with [`crate::error::ReasonError::ResourceLimit`].
    pub max_facts: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            deterministic_skolem: false,
            enforce_https: false,
            super_restricted: false,
            proof_comments: false,
            max_rounds: 10_000,
            max_facts: 5_000_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_not_deterministic_or_restricted() {
        let cfg = EngineConfig::default();
        assert!(!cfg.deterministic_skolem);
        assert!(!cfg.super_restricted);
    }
}
