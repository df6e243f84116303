//! SM3 cryptographic hash algorithm.
//!
//! SM3 is a 256-bit hash function standardized by the Chinese government
//! (GB/T 32905-2016), provided here by the `sm3` crate.

use crate::provider::Digest;
use ccrng_types::CryptoError;
use sm3::Digest as _;

/// SM3 output size in bytes.
pub const SM3_OUTPUT_SIZE: usize = 32;

/// SM3 block size in bytes.
pub const SM3_BLOCK_SIZE: usize = 64;

/// SM3 hash context.
#[derive(Clone, Default)]
pub struct Sm3 {
    inner: sm3::Sm3,
}

impl Sm3 {
    /// Create a new SM3 hash context.
    pub fn new() -> Self {
        Self::default()
    }

    /// One-shot: compute the SM3 digest of `data`.
    pub fn digest(data: &[u8]) -> [u8; SM3_OUTPUT_SIZE] {
        let mut out = [0u8; SM3_OUTPUT_SIZE];
        out.copy_from_slice(&sm3::Sm3::digest(data));
        out
    }
}

impl Digest for Sm3 {
    fn output_size(&self) -> usize {
        SM3_OUTPUT_SIZE
    }

    fn block_size(&self) -> usize {
        SM3_BLOCK_SIZE
    }

    fn update(&mut self, data: &[u8]) -> Result<(), CryptoError> {
        self.inner.update(data);
        Ok(())
    }

    fn finish(&mut self, out: &mut [u8]) -> Result<(), CryptoError> {
        if out.len() < SM3_OUTPUT_SIZE {
            return Err(CryptoError::BufferTooSmall {
                need: SM3_OUTPUT_SIZE,
                got: out.len(),
            });
        }
        out[..SM3_OUTPUT_SIZE].copy_from_slice(&self.inner.finalize_reset());
        Ok(())
    }

    fn reset(&mut self) {
        sm3::Digest::reset(&mut self.inner);
    }
}
