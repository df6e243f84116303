//! Deterministic Random Bit Generator (NIST SP 800-90A).
//!
//! - CTR-DRBG (Section 10.2) with AES-128 or AES-256 and a derivation function
//! - The continuous test over its output blocks

pub mod cprngt;
pub mod ctr_drbg;

pub use ctr_drbg::{
    block_cipher_df, Drbg, DrbgConfig, DrbgState, ReseedAccounting, MAX_ADDITIONAL_INPUT,
    MAX_KAT_BYTES, MAX_RESEED_COUNTER, MAX_REQUEST_BYTES,
};
