//! HMAC (Hash-based Message Authentication Code), RFC 2104.
//!
//! HMAC(K, m) = H((K' XOR opad) || H((K' XOR ipad) || m))
//!
//! where K' is the key padded/hashed to block size, ipad = 0x36, opad = 0x5c.

use crate::hash::new_digest;
use crate::provider::Digest;
use ccrng_types::{CryptoError, MacAlgId};
use zeroize::Zeroize;

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// HMAC context over one of the [`MacAlgId`] hashes.
pub struct Hmac {
    alg: MacAlgId,
    /// Inner hash context (keyed with the ipad block).
    inner: Box<dyn Digest>,
    /// Outer hash context (keyed with the opad block).
    outer: Box<dyn Digest>,
    /// Processed key block, kept for reset.
    key_block: Vec<u8>,
}

impl Hmac {
    /// Create a new HMAC instance keyed with `key`.
    pub fn new(alg: MacAlgId, key: &[u8]) -> Result<Self, CryptoError> {
        let mut inner = new_digest(alg.hash());
        let block_size = inner.block_size();
        let output_size = inner.output_size();

        // Keys longer than the block are hashed first; shorter ones are zero padded.
        let mut key_block = vec![0u8; block_size];
        if key.len() > block_size {
            inner.update(key)?;
            inner.finish(&mut key_block[..output_size])?;
        } else {
            key_block[..key.len()].copy_from_slice(key);
        }

        let mut ctx = Hmac {
            alg,
            inner,
            outer: new_digest(alg.hash()),
            key_block,
        };
        ctx.load_pads()?;
        Ok(ctx)
    }

    fn load_pads(&mut self) -> Result<(), CryptoError> {
        self.inner.reset();
        self.outer.reset();

        let mut pad: Vec<u8> = self.key_block.iter().map(|b| b ^ IPAD).collect();
        let res = self.inner.update(&pad);
        pad.zeroize();
        res?;

        let mut pad: Vec<u8> = self.key_block.iter().map(|b| b ^ OPAD).collect();
        let res = self.outer.update(&pad);
        pad.zeroize();
        res
    }

    /// Output size in bytes.
    pub fn output_size(&self) -> usize {
        self.inner.output_size()
    }

    /// The algorithm this context was created for.
    pub fn alg(&self) -> MacAlgId {
        self.alg
    }

    /// Feed data into the HMAC computation.
    pub fn update(&mut self, data: &[u8]) -> Result<(), CryptoError> {
        self.inner.update(data)
    }

    /// Finalize the HMAC computation and write the result to `out`.
    pub fn finish(&mut self, out: &mut [u8]) -> Result<(), CryptoError> {
        let mut inner_hash = vec![0u8; self.inner.output_size()];
        self.inner.finish(&mut inner_hash)?;
        let res = self.outer.update(&inner_hash);
        inner_hash.zeroize();
        res?;
        self.outer.finish(out)
    }

    /// Reset the HMAC state for reuse with the same key.
    pub fn reset(&mut self) -> Result<(), CryptoError> {
        self.load_pads()
    }

    /// One-shot HMAC computation.
    pub fn mac(alg: MacAlgId, key: &[u8], data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut ctx = Self::new(alg, key)?;
        ctx.update(data)?;
        let mut out = vec![0u8; ctx.output_size()];
        ctx.finish(&mut out)?;
        Ok(out)
    }
}

impl Drop for Hmac {
    fn drop(&mut self) {
        self.key_block.zeroize();
    }
}
