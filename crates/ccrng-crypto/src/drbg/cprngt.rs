//! Continuous test on DRBG output blocks.
//!
//! Fails closed when two adjacent 16-byte blocks of `previous || blocks`
//! are equal. No retry.

use ccrng_types::CryptoError;

/// Output block size in bytes.
pub const BLOCK_LEN: usize = 16;

/// Check one Generate window against the carried `previous` block.
///
/// `blocks` must hold at least one whole block.
pub fn check(previous: &[u8; BLOCK_LEN], blocks: &[u8]) -> Result<(), CryptoError> {
    if blocks.is_empty() || blocks.len() % BLOCK_LEN != 0 {
        return Err(CryptoError::InvalidArg);
    }
    let mut last: &[u8] = previous;
    for block in blocks.chunks_exact(BLOCK_LEN) {
        if block == last {
            return Err(CryptoError::DrbgContinuousTestFail);
        }
        last = block;
    }
    Ok(())
}
