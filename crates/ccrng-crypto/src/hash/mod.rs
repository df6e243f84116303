//! Unified hash module.
//!
//! Re-exports the hash contexts and maps a [`HashAlgId`] onto a boxed
//! [`Digest`] so the HMAC and self-test code can stay algorithm-agnostic.

pub use crate::provider::Digest;
pub use crate::sha2::{Sha256, Sha512};
pub use crate::sm3::Sm3;

use ccrng_types::HashAlgId;

/// Create a fresh digest context for `alg`.
pub fn new_digest(alg: HashAlgId) -> Box<dyn Digest> {
    match alg {
        HashAlgId::Sha256 => Box::new(Sha256::new()),
        HashAlgId::Sha512 => Box::new(Sha512::new()),
        HashAlgId::Sm3 => Box::new(Sm3::new()),
    }
}
