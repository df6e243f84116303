//! CTR (Counter) mode of operation.

use crate::provider::BlockCipher;
use ccrng_types::CryptoError;

/// Increment a big-endian counter block by 1, wrapping on overflow.
pub(crate) fn increment_counter(counter: &mut [u8]) {
    for byte in counter.iter_mut().rev() {
        *byte = byte.wrapping_add(1);
        if *byte != 0 {
            break;
        }
    }
}

/// Encrypt or decrypt data in place using CTR mode.
/// `nonce` must be one block (used as the initial counter value).
pub fn ctr_crypt(
    cipher: &dyn BlockCipher,
    nonce: &[u8],
    data: &mut [u8],
) -> Result<(), CryptoError> {
    let bs = cipher.block_size();
    if nonce.len() != bs {
        return Err(CryptoError::InvalidIvLength);
    }
    if data.is_empty() {
        return Ok(());
    }
    let mut counter = nonce.to_vec();
    let mut keystream = vec![0u8; bs];

    for chunk in data.chunks_mut(bs) {
        keystream.copy_from_slice(&counter);
        cipher.encrypt_block(&mut keystream)?;
        for (d, &k) in chunk.iter_mut().zip(keystream.iter()) {
            *d ^= k;
        }
        increment_counter(&mut counter);
    }
    Ok(())
}
