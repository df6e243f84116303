//! Trait-based provider mechanism for the primitives consumed by the
//! self-tests and the DRBG.
//!
//! The cipher and hash internals come from the RustCrypto crates; these
//! traits are the seam through which the rest of the crate reaches them, so
//! a hardware-backed engine can be substituted without touching the DRBG or
//! the known-answer tests.

use ccrng_types::CryptoError;

/// A hash / message digest algorithm.
pub trait Digest: Send + Sync {
    /// The output size in bytes.
    fn output_size(&self) -> usize;

    /// The internal block size in bytes.
    fn block_size(&self) -> usize;

    /// Feed data into the hash state.
    fn update(&mut self, data: &[u8]) -> Result<(), CryptoError>;

    /// Finalize the hash and write the digest to `out`.
    /// The length of `out` must be at least `output_size()`.
    /// The context is reset afterwards.
    fn finish(&mut self, out: &mut [u8]) -> Result<(), CryptoError>;

    /// Reset the hash state to process a new message.
    fn reset(&mut self);
}

/// A keyed block cipher (e.g., AES, SM4).
pub trait BlockCipher: Send + Sync {
    /// Block size in bytes.
    fn block_size(&self) -> usize;

    /// Key size in bytes.
    fn key_size(&self) -> usize;

    /// Encrypt a single block in-place.
    fn encrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError>;

    /// Decrypt a single block in-place.
    fn decrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError>;
}

/// One-shot digest computation over any [`Digest`].
pub fn digest(ctx: &mut dyn Digest, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    ctx.reset();
    ctx.update(data)?;
    let mut out = vec![0u8; ctx.output_size()];
    ctx.finish(&mut out)?;
    Ok(out)
}
