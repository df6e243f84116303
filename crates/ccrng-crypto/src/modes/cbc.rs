//! CBC (Cipher Block Chaining) mode of operation, without padding.

use crate::provider::BlockCipher;
use ccrng_types::CryptoError;

fn check_args(cipher: &dyn BlockCipher, iv: &[u8], data: &[u8]) -> Result<(), CryptoError> {
    let bs = cipher.block_size();
    if iv.len() != bs {
        return Err(CryptoError::InvalidIvLength);
    }
    if data.is_empty() || data.len() % bs != 0 {
        return Err(CryptoError::InvalidArg);
    }
    Ok(())
}

/// Encrypt whole blocks using CBC mode.
pub fn cbc_encrypt(
    cipher: &dyn BlockCipher,
    iv: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    check_args(cipher, iv, plaintext)?;
    let mut data = plaintext.to_vec();
    let mut prev = iv.to_vec();

    for chunk in data.chunks_mut(cipher.block_size()) {
        for (c, p) in chunk.iter_mut().zip(prev.iter()) {
            *c ^= p;
        }
        cipher.encrypt_block(chunk)?;
        prev.copy_from_slice(chunk);
    }
    Ok(data)
}

/// Decrypt whole blocks using CBC mode.
pub fn cbc_decrypt(
    cipher: &dyn BlockCipher,
    iv: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    check_args(cipher, iv, ciphertext)?;
    let mut output = ciphertext.to_vec();
    let mut prev = iv.to_vec();
    let mut ct_copy = vec![0u8; cipher.block_size()];

    for chunk in output.chunks_mut(cipher.block_size()) {
        ct_copy.copy_from_slice(chunk);
        cipher.decrypt_block(chunk)?;
        for (c, p) in chunk.iter_mut().zip(prev.iter()) {
            *c ^= p;
        }
        std::mem::swap(&mut prev, &mut ct_copy);
    }
    Ok(output)
}
