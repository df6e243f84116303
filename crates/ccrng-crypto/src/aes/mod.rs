//! AES block cipher.
//!
//! AES-128 and AES-256 block operations over the `aes` crate, exposed
//! through the [`BlockCipher`] provider trait. For modes of operation see
//! the [`modes`](crate::modes) module.

use aes::{Aes128, Aes256};
use ccrng_types::CryptoError;
use cipher::generic_array::GenericArray;
use cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use crate::provider::BlockCipher;

/// AES block size in bytes (128 bits).
pub const AES_BLOCK_SIZE: usize = 16;

#[derive(Clone)]
enum Schedule {
    Aes128(Aes128),
    Aes256(Aes256),
}

/// An AES key with its expanded schedule.
///
/// The schedule is zeroized on drop by the `aes` crate.
#[derive(Clone)]
pub struct AesKey {
    schedule: Schedule,
}

impl AesKey {
    /// Create a new AES key from raw bytes.
    ///
    /// Accepts 16-byte (AES-128) or 32-byte (AES-256) keys.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        let schedule = match key.len() {
            16 => Schedule::Aes128(Aes128::new(GenericArray::from_slice(key))),
            32 => Schedule::Aes256(Aes256::new(GenericArray::from_slice(key))),
            got => return Err(CryptoError::InvalidKeyLength { expected: 32, got }),
        };
        Ok(AesKey { schedule })
    }

    /// Return the key length in bytes.
    pub fn key_len(&self) -> usize {
        match self.schedule {
            Schedule::Aes128(_) => 16,
            Schedule::Aes256(_) => 32,
        }
    }
}

fn check_block(block: &[u8]) -> Result<(), CryptoError> {
    if block.len() != AES_BLOCK_SIZE {
        return Err(CryptoError::BufferTooSmall {
            need: AES_BLOCK_SIZE,
            got: block.len(),
        });
    }
    Ok(())
}

impl BlockCipher for AesKey {
    fn block_size(&self) -> usize {
        AES_BLOCK_SIZE
    }

    fn key_size(&self) -> usize {
        self.key_len()
    }

    fn encrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError> {
        check_block(block)?;
        let block = GenericArray::from_mut_slice(block);
        match &self.schedule {
            Schedule::Aes128(c) => c.encrypt_block(block),
            Schedule::Aes256(c) => c.encrypt_block(block),
        }
        Ok(())
    }

    fn decrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError> {
        check_block(block)?;
        let block = GenericArray::from_mut_slice(block);
        match &self.schedule {
            Schedule::Aes128(c) => c.decrypt_block(block),
            Schedule::Aes256(c) => c.decrypt_block(block),
        }
        Ok(())
    }
}
