//! SM4 block cipher.
//!
//! SM4 is a 128-bit block cipher standardized by the Chinese government
//! (GB/T 32907-2016). Block operations come from the `sm4` crate.

use ccrng_types::CryptoError;
use cipher::generic_array::GenericArray;
use cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use crate::provider::BlockCipher;
use sm4::Sm4;

/// SM4 block size in bytes (128 bits).
pub const SM4_BLOCK_SIZE: usize = 16;

/// SM4 key size in bytes (128 bits).
pub const SM4_KEY_SIZE: usize = 16;

/// An SM4 key with its expanded round keys.
#[derive(Clone)]
pub struct Sm4Key {
    cipher: Sm4,
}

impl Sm4Key {
    /// Create a new SM4 key from 16 raw bytes.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        let cipher = Sm4::new_from_slice(key).map_err(|_| CryptoError::InvalidKeyLength {
            expected: SM4_KEY_SIZE,
            got: key.len(),
        })?;
        Ok(Sm4Key { cipher })
    }
}

impl BlockCipher for Sm4Key {
    fn block_size(&self) -> usize {
        SM4_BLOCK_SIZE
    }

    fn key_size(&self) -> usize {
        SM4_KEY_SIZE
    }

    fn encrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError> {
        if block.len() != SM4_BLOCK_SIZE {
            return Err(CryptoError::InvalidArg);
        }
        self.cipher.encrypt_block(GenericArray::from_mut_slice(block));
        Ok(())
    }

    fn decrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError> {
        if block.len() != SM4_BLOCK_SIZE {
            return Err(CryptoError::InvalidArg);
        }
        self.cipher.decrypt_block(GenericArray::from_mut_slice(block));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // GB/T 32907-2016 Appendix A.1
    #[test]
    fn test_sm4_standard_vector() {
        let key = Sm4Key::new(&hex!("0123456789abcdeffedcba9876543210")).unwrap();
        let mut block = hex!("0123456789abcdeffedcba9876543210");
        key.encrypt_block(&mut block).unwrap();
        assert_eq!(block, hex!("681edf34d206965e86b3e94f536e4246"));
        key.decrypt_block(&mut block).unwrap();
        assert_eq!(block, hex!("0123456789abcdeffedcba9876543210"));
    }

    #[test]
    fn test_sm4_invalid_key_len() {
        assert!(matches!(
            Sm4Key::new(&[0u8; 32]),
            Err(CryptoError::InvalidKeyLength {
                expected: 16,
                got: 32
            })
        ));
    }
}
