//! SHA-2 hash algorithms used by the self-tests.
//!
//! SHA-256 and SHA-512 as defined in FIPS 180-4, wrapping the `sha2` crate
//! behind the [`Digest`] provider trait.

use crate::provider::Digest;
use ccrng_types::CryptoError;
use sha2::Digest as _;

// ---------------------------------------------------------------------------
// SHA-256
// ---------------------------------------------------------------------------

/// SHA-256 output size in bytes.
pub const SHA256_OUTPUT_SIZE: usize = 32;

/// SHA-256 hash context.
#[derive(Clone, Default)]
pub struct Sha256 {
    inner: sha2::Sha256,
}

impl Sha256 {
    /// Create a new SHA-256 hash context.
    pub fn new() -> Self {
        Self::default()
    }

    /// One-shot: compute the SHA-256 digest of `data`.
    pub fn digest(data: &[u8]) -> [u8; SHA256_OUTPUT_SIZE] {
        let mut out = [0u8; SHA256_OUTPUT_SIZE];
        out.copy_from_slice(&sha2::Sha256::digest(data));
        out
    }
}

impl Digest for Sha256 {
    fn output_size(&self) -> usize {
        SHA256_OUTPUT_SIZE
    }

    fn block_size(&self) -> usize {
        64
    }

    fn update(&mut self, data: &[u8]) -> Result<(), CryptoError> {
        self.inner.update(data);
        Ok(())
    }

    fn finish(&mut self, out: &mut [u8]) -> Result<(), CryptoError> {
        if out.len() < SHA256_OUTPUT_SIZE {
            return Err(CryptoError::BufferTooSmall {
                need: SHA256_OUTPUT_SIZE,
                got: out.len(),
            });
        }
        out[..SHA256_OUTPUT_SIZE].copy_from_slice(&self.inner.finalize_reset());
        Ok(())
    }

    fn reset(&mut self) {
        sha2::Digest::reset(&mut self.inner);
    }
}

// ---------------------------------------------------------------------------
// SHA-512
// ---------------------------------------------------------------------------

/// SHA-512 output size in bytes.
pub const SHA512_OUTPUT_SIZE: usize = 64;

/// SHA-512 hash context.
#[derive(Clone, Default)]
pub struct Sha512 {
    inner: sha2::Sha512,
}

impl Sha512 {
    /// Create a new SHA-512 hash context.
    pub fn new() -> Self {
        Self::default()
    }

    /// One-shot: compute the SHA-512 digest of `data`.
    pub fn digest(data: &[u8]) -> [u8; SHA512_OUTPUT_SIZE] {
        let mut out = [0u8; SHA512_OUTPUT_SIZE];
        out.copy_from_slice(&sha2::Sha512::digest(data));
        out
    }
}

impl Digest for Sha512 {
    fn output_size(&self) -> usize {
        SHA512_OUTPUT_SIZE
    }

    fn block_size(&self) -> usize {
        128
    }

    fn update(&mut self, data: &[u8]) -> Result<(), CryptoError> {
        self.inner.update(data);
        Ok(())
    }

    fn finish(&mut self, out: &mut [u8]) -> Result<(), CryptoError> {
        if out.len() < SHA512_OUTPUT_SIZE {
            return Err(CryptoError::BufferTooSmall {
                need: SHA512_OUTPUT_SIZE,
                got: out.len(),
            });
        }
        out[..SHA512_OUTPUT_SIZE].copy_from_slice(&self.inner.finalize_reset());
        Ok(())
    }

    fn reset(&mut self) {
        sha2::Digest::reset(&mut self.inner);
    }
}
