//! `crypto:` builtins (spec.md §4.4): one-way hash digests over a literal's
//! lexical bytes, hex-encoded.
//!
//! Grounded on the workspace's `sha1`/`md-5`/`sha2`/`hex` dependencies
//! (already selected for exactly this namespace — see root `Cargo.toml`'s
//! "Crypto builtins" comment); no teacher precedent for the dispatch shape
//! itself.

use crate::builtins::unify_one;
use crate::subst::Subst;
use n3_model::{Term, Triple};
use sha2::Digest;
use std::rc::Rc;

pub fn dispatch(local: &str, goal: &Triple, subst: &Subst) -> Vec<Subst> {
    let subject = subst.apply(&goal.subject);
    let Some(lit) = subject.as_literal() else {
        return Vec::new();
    };
    let bytes = lit.lex.as_bytes();
    let digest = match local {
        "sha" => hex::encode(sha1::Sha1::digest(bytes)),
        "md5" => hex::encode(md5::Md5::digest(bytes)),
        "sha256" => hex::encode(sha2::Sha256::digest(bytes)),
        "sha512" => hex::encode(sha2::Sha512::digest(bytes)),
        _ => return Vec::new(),
    };
    unify_one(Term::literal_str(Rc::from(digest)), &goal.object, subst)
}
