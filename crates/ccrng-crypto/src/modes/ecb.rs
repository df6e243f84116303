//! ECB (Electronic Codebook) mode of operation.
//!
//! **Security warning**: ECB mode does not provide semantic security. It is
//! here for the known-answer self-tests only.

use crate::provider::BlockCipher;
use ccrng_types::CryptoError;

fn check_len(cipher: &dyn BlockCipher, data: &[u8]) -> Result<(), CryptoError> {
    if data.is_empty() || data.len() % cipher.block_size() != 0 {
        return Err(CryptoError::InvalidArg);
    }
    Ok(())
}

/// Encrypt data using ECB mode.
/// Input must be a non-empty multiple of the block size (no padding).
pub fn ecb_encrypt(cipher: &dyn BlockCipher, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    check_len(cipher, plaintext)?;
    let mut output = plaintext.to_vec();
    for chunk in output.chunks_mut(cipher.block_size()) {
        cipher.encrypt_block(chunk)?;
    }
    Ok(output)
}

/// Decrypt data using ECB mode.
pub fn ecb_decrypt(cipher: &dyn BlockCipher, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    check_len(cipher, ciphertext)?;
    let mut output = ciphertext.to_vec();
    for chunk in output.chunks_mut(cipher.block_size()) {
        cipher.decrypt_block(chunk)?;
    }
    Ok(output)
}
