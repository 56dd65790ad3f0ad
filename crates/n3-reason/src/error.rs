//! Error taxonomy (spec.md §7): only syntax errors and the inference fuse
//! escape the core; everything else drives backtracking or scoped failure
//! and never reaches this type.
//!
//! Grounded on `reasoning::ReasonerError` (`thiserror`-derived enum of
//! `Inconsistency`/`InvalidRule`/`Cycle`/`ResourceLimit`), renamed and
//! trimmed to the two failures spec.md §7 actually lets out, plus a
//! transparent wrap of [`n3_parse::ParseError`].

use thiserror::Error;

/// An error that aborts a `reason_stream` call (spec.md §7 "Propagation
/// policy": only syntax errors and fatal fuses escape the core).
#[derive(Debug, Error)]
pub enum ReasonError {
    /// The input failed to parse.
    #[error(transparent)]
    Parse(#[from] n3_parse::ParseError),

    /// A forward rule whose conclusion is the literal `false` fired (spec.md
    /// §4.5 "Inference fuse"). Carries the instantiated premise that proved
    /// the fuse, for diagnostics.
    #[error("inference fuse: {premise}")]
    Fuse {
        /// The instantiated premise that proved the fuse's body.
        premise: String,
    },

    /// A configured resource bound (max derived facts, max chaining rounds)
    /// was exceeded before reaching a fixpoint. Not part of spec.md's core
    /// contract (§5 "Cancellation / timeout: Not part of the core
    /// contract"), but `n3-cli` needs a way to stop a runaway program rather
    /// than hang forever, so [`crate::config::EngineConfig`] carries the
    /// bound and this variant reports it.
    #[error("resource limit exceeded: {0}")]
    ResourceLimit(String),
}

/// Result type for reasoning operations.
pub type ReasonResult<T> = Result<T, ReasonError>;
