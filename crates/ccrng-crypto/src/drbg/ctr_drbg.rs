//! CTR-DRBG (Counter-mode Deterministic Random Bit Generator).
//!
//! Implements NIST SP 800-90A Section 10.2 with AES-128 or AES-256 and the
//! Block_Cipher_df derivation function, plus the module-specific pieces
//! around it: known-answer (KAT) mode, pending additional input, the
//! continuous output test and the FIPS approval gate.

use super::cprngt;
use crate::aes::AesKey;
use crate::cert::fips::trace;
use crate::cert::{FipsState, GuardOutcome, GuardPolicy, StateFlags};
use crate::entropy::EntropyInput;
use crate::modes::ctr::increment_counter;
use crate::provider::BlockCipher;
use ccrng_types::{CryptoError, DrbgKeySize, FipsError};
use log::{debug, warn};
use std::sync::Arc;
use zeroize::{Zeroize, Zeroizing};

/// AES block size in bytes.
const BLOCK_LEN: usize = cprngt::BLOCK_LEN;
/// Largest key length (AES-256).
const MAX_KEY_LEN: usize = 32;

/// Generate fails once the reseed counter reaches this value.
pub const MAX_RESEED_COUNTER: u64 = 0xFFFF_FFFF - 0xF;
/// Largest single Generate request in bytes.
pub const MAX_REQUEST_BYTES: usize = 0xFFFF;
/// Largest additional input in bytes; it must also be a multiple of 4.
pub const MAX_ADDITIONAL_INPUT: usize = 48;
/// Largest KAT entropy + nonce in bytes (126 words).
pub const MAX_KAT_BYTES: usize = 504;

/// How Generate advances the reseed counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub enum ReseedAccounting {
    /// +1 per Generate call.
    #[default]
    PerRequest,
    /// +1 per output block. A request that would take the counter past
    /// [`MAX_RESEED_COUNTER`] is refused.
    PerBlock,
}

/// DRBG construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct DrbgConfig {
    #[cfg_attr(feature = "serde", serde(with = "key_size_serde"))]
    pub key_size: DrbgKeySize,
    pub reseed_accounting: ReseedAccounting,
}

#[cfg(feature = "serde")]
mod key_size_serde {
    use ccrng_types::DrbgKeySize;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DrbgKeySize, D::Error> {
        match u32::deserialize(d)? {
            128 => Ok(DrbgKeySize::Aes128),
            256 => Ok(DrbgKeySize::Aes256),
            other => Err(serde::de::Error::custom(format!(
                "unsupported drbg key size {other}, expected 128 or 256"
            ))),
        }
    }
}

/// Lifecycle state of a [`Drbg`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrbgState {
    Uninstantiated,
    Instantiated,
    /// A reseed or continuous test failed; only uninstantiate is accepted.
    Faulted,
}

/// CTR-DRBG context (NIST SP 800-90A Section 10.2).
pub struct Drbg {
    config: DrbgConfig,
    state: DrbgState,
    /// Key K; only the first `key_len` bytes are used.
    key: [u8; MAX_KEY_LEN],
    /// Counter block V.
    v: [u8; BLOCK_LEN],
    /// Expanded schedule of `key`.
    cipher: Option<AesKey>,
    reseed_counter: u64,
    kat_mode: bool,
    /// Entropy || nonce loaded by `enter_kat_mode`, consumed by the next seeding.
    kat_material: Zeroizing<Vec<u8>>,
    /// Consumed by the next instantiate, reseed or generate.
    additional_input: Zeroizing<Vec<u8>>,
    /// Last output block, carried for the continuous test.
    prev_block: Option<[u8; BLOCK_LEN]>,
    approval: Option<Arc<FipsState>>,
}

impl Drop for Drbg {
    fn drop(&mut self) {
        self.zeroize_working_state();
    }
}

impl std::fmt::Debug for Drbg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Drbg")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("reseed_counter", &self.reseed_counter)
            .field("kat_mode", &self.kat_mode)
            .finish_non_exhaustive()
    }
}

impl Drbg {
    /// Create an uninstantiated, ungated DRBG.
    pub fn new(config: DrbgConfig) -> Self {
        Drbg {
            config,
            state: DrbgState::Uninstantiated,
            key: [0u8; MAX_KEY_LEN],
            v: [0u8; BLOCK_LEN],
            cipher: None,
            reseed_counter: 0,
            kat_mode: false,
            kat_material: Zeroizing::new(Vec::new()),
            additional_input: Zeroizing::new(Vec::new()),
            prev_block: None,
            approval: None,
        }
    }

    /// Create an uninstantiated DRBG gated by the FIPS approval state.
    pub fn with_approval(config: DrbgConfig, approval: Arc<FipsState>) -> Self {
        let mut drbg = Self::new(config);
        drbg.approval = Some(approval);
        drbg
    }

    pub fn config(&self) -> DrbgConfig {
        self.config
    }

    pub fn state(&self) -> DrbgState {
        self.state
    }

    pub fn reseed_counter(&self) -> u64 {
        self.reseed_counter
    }

    pub fn kat_mode(&self) -> bool {
        self.kat_mode
    }

    /// Instantiated with real entropy; production callers check this
    /// before trusting output.
    pub fn is_unpredictable(&self) -> bool {
        self.state == DrbgState::Instantiated && !self.kat_mode
    }

    fn key_len(&self) -> usize {
        self.config.key_size.key_len()
    }

    fn seed_len(&self) -> usize {
        self.config.key_size.seed_len()
    }

    fn check_gate(&self) -> Result<(), CryptoError> {
        if let Some(approval) = &self.approval {
            approval.check_approved()?;
        }
        Ok(())
    }

    fn zeroize_working_state(&mut self) {
        self.key.zeroize();
        self.v.zeroize();
        self.cipher = None;
        self.reseed_counter = 0;
        self.prev_block.zeroize();
        self.prev_block = None;
    }

    /// Queue additional input for the next instantiate, reseed or generate,
    /// replacing any pending input.
    pub fn add_additional_input(&mut self, data: &[u8]) -> Result<(), CryptoError> {
        self.check_gate()?;
        if data.len() > MAX_ADDITIONAL_INPUT || data.len() % 4 != 0 {
            return Err(CryptoError::DrbgAdditionalInputSize(data.len()));
        }
        self.additional_input.zeroize();
        self.additional_input.extend_from_slice(data);
        Ok(())
    }

    /// Load fixed entropy and nonce for known-answer testing.
    ///
    /// The material is consumed by the next instantiate or reseed; the mode
    /// itself stays on until [`Drbg::disable_kat_mode`] or
    /// [`Drbg::uninstantiate`].
    pub fn enter_kat_mode(&mut self, entropy: &[u8], nonce: &[u8]) -> Result<(), CryptoError> {
        self.check_gate()?;
        if entropy.is_empty() {
            return if nonce.is_empty() {
                Ok(())
            } else {
                Err(CryptoError::InvalidArg)
            };
        }
        if entropy.len() + nonce.len() > MAX_KAT_BYTES {
            return Err(CryptoError::DrbgKatParams);
        }
        self.kat_material.zeroize();
        self.kat_material.extend_from_slice(entropy);
        self.kat_material.extend_from_slice(nonce);
        self.kat_mode = true;
        Ok(())
    }

    /// Leave KAT mode. Silently does nothing unless FIPS approves.
    pub fn disable_kat_mode(&mut self) {
        if let Some(approval) = &self.approval {
            if let Ok(GuardOutcome::Skip) =
                approval.guard(StateFlags::APPROVED, GuardPolicy::Advisory)
            {
                return;
            }
        }
        self.kat_mode = false;
        self.kat_material.zeroize();
    }

    /// Instantiate the DRBG (SP 800-90A §10.2.1.3.2).
    ///
    /// Personalization is `personalization` or, when absent, the pending
    /// additional input; supplying both is an error.
    pub fn instantiate(
        &mut self,
        entropy: &dyn EntropyInput,
        personalization: Option<&[u8]>,
    ) -> Result<(), CryptoError> {
        let pending = Zeroizing::new(std::mem::take(&mut *self.additional_input));
        self.check_gate()?;
        if self.state != DrbgState::Uninstantiated {
            return Err(CryptoError::DrbgInvalidState);
        }
        let pers: &[u8] = match personalization {
            Some(_) if !pending.is_empty() => return Err(CryptoError::InvalidArg),
            Some(p) if p.len() > MAX_ADDITIONAL_INPUT => {
                return Err(CryptoError::DrbgAdditionalInputSize(p.len()))
            }
            Some(p) => p,
            None => &pending,
        };

        let res = self.seed_fresh(entropy, pers);
        match res {
            Ok(()) => {
                self.state = DrbgState::Instantiated;
                debug!(
                    "drbg: instantiated ({:?}, kat mode {})",
                    self.config.key_size, self.kat_mode
                );
            }
            Err(ref e) => {
                self.zeroize_working_state();
                warn!("drbg: instantiate failed: {e}");
            }
        }
        res
    }

    fn seed_fresh(&mut self, entropy: &dyn EntropyInput, pers: &[u8]) -> Result<(), CryptoError> {
        let mut material = self.take_seed_entropy(entropy)?;
        material.extend_from_slice(pers);
        let seed = block_cipher_df(&material, self.seed_len(), self.key_len())?;

        self.key.zeroize();
        self.v.zeroize();
        self.rekey()?;
        self.update(&seed)?;
        self.reseed_counter = 1;
        self.prev_block = None;
        Ok(())
    }

    /// Reseed the DRBG with fresh entropy and any pending additional input
    /// (SP 800-90A §10.2.1.4.2). A failure faults the DRBG.
    pub fn reseed(&mut self, entropy: &dyn EntropyInput) -> Result<(), CryptoError> {
        let adin = Zeroizing::new(std::mem::take(&mut *self.additional_input));
        self.check_gate()?;
        if self.state != DrbgState::Instantiated {
            return Err(CryptoError::DrbgInvalidState);
        }

        let res = self.take_seed_entropy(entropy).and_then(|mut material| {
            material.extend_from_slice(&adin);
            let seed = block_cipher_df(&material, self.seed_len(), self.key_len())?;
            self.update(&seed)
        });
        match res {
            Ok(()) => {
                self.reseed_counter = 1;
                debug!("drbg: reseeded");
            }
            Err(ref e) => {
                self.zeroize_working_state();
                self.state = DrbgState::Faulted;
                warn!("drbg: reseed failed, drbg faulted: {e}");
            }
        }
        res
    }

    /// Seed entropy: the loaded KAT material in KAT mode, otherwise
    /// `keylen + keylen/2` bytes (entropy and nonce) from `entropy`.
    fn take_seed_entropy(
        &mut self,
        entropy: &dyn EntropyInput,
    ) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        if self.kat_mode {
            let material = Zeroizing::new(std::mem::take(&mut *self.kat_material));
            if material.is_empty() {
                return Err(CryptoError::DrbgKatParams);
            }
            return Ok(material);
        }
        let len = self.key_len() + self.key_len() / 2;
        let mut material = Zeroizing::new(vec![0u8; len]);
        entropy.get_entropy(&mut material)?;
        Ok(material)
    }

    /// Generate pseudorandom bytes (SP 800-90A §10.2.1.5.2).
    ///
    /// On any error `output` is zeroed. Pending additional input is
    /// consumed whether or not the call succeeds.
    pub fn generate(&mut self, output: &mut [u8]) -> Result<(), CryptoError> {
        let adin = Zeroizing::new(std::mem::take(&mut *self.additional_input));
        let res = self
            .check_gate()
            .and_then(|()| self.generate_inner(output, &adin));
        if res.is_err() {
            output.zeroize();
        }
        res
    }

    /// Generate `len` pseudorandom bytes (convenience method).
    pub fn generate_bytes(&mut self, len: usize) -> Result<Vec<u8>, CryptoError> {
        let mut output = vec![0u8; len];
        self.generate(&mut output)?;
        Ok(output)
    }

    fn generate_inner(&mut self, output: &mut [u8], adin: &[u8]) -> Result<(), CryptoError> {
        if self.state != DrbgState::Instantiated {
            return Err(CryptoError::DrbgInvalidState);
        }
        if output.len() > MAX_REQUEST_BYTES {
            return Err(CryptoError::DrbgRequestTooLarge {
                max: MAX_REQUEST_BYTES,
                got: output.len(),
            });
        }
        if output.is_empty() {
            return Ok(());
        }
        let n_blocks = (output.len() + BLOCK_LEN - 1) / BLOCK_LEN;
        let next_counter = match self.config.reseed_accounting {
            ReseedAccounting::PerRequest => self.reseed_counter + 1,
            ReseedAccounting::PerBlock => self.reseed_counter + n_blocks as u64,
        };
        if next_counter > MAX_RESEED_COUNTER {
            return Err(CryptoError::DrbgReseedRequired);
        }

        let adin_df = if adin.is_empty() {
            Zeroizing::new(vec![0u8; self.seed_len()])
        } else {
            let derived = block_cipher_df(adin, self.seed_len(), self.key_len())?;
            self.update(&derived)?;
            derived
        };

        if !self.kat_mode && self.prev_block.is_none() {
            self.prev_block = Some(self.next_block()?);
        }

        let mut blocks = Zeroizing::new(vec![0u8; n_blocks * BLOCK_LEN]);
        for chunk in blocks.chunks_exact_mut(BLOCK_LEN) {
            chunk.copy_from_slice(&self.next_block()?);
        }

        if !self.kat_mode {
            if let Some(prev) = &self.prev_block {
                if let Err(e) = cprngt::check(prev, &blocks) {
                    self.continuous_test_failed();
                    return Err(e);
                }
                if let Some(approval) = &self.approval {
                    if approval.is_supported() {
                        approval.set_trace(trace::PRNG_CONT);
                    }
                }
            }
        }

        let mut last = [0u8; BLOCK_LEN];
        last.copy_from_slice(&blocks[(n_blocks - 1) * BLOCK_LEN..]);
        self.prev_block = Some(last);
        last.zeroize();

        output.copy_from_slice(&blocks[..output.len()]);
        self.update(&adin_df)?;

        self.reseed_counter = next_counter;
        Ok(())
    }

    fn continuous_test_failed(&mut self) {
        self.zeroize_working_state();
        self.state = DrbgState::Faulted;
        warn!("drbg: continuous test failed, drbg faulted");
        if let Some(approval) = &self.approval {
            if approval.is_supported() {
                if let Err(e) = approval.set_error(FipsError::PrngCont) {
                    debug!("drbg: continuous test error not recorded: {e}");
                }
            }
        }
    }

    /// Zeroize all state and return to `Uninstantiated`. Never refused.
    pub fn uninstantiate(&mut self) {
        self.zeroize_working_state();
        self.additional_input.zeroize();
        self.kat_material.zeroize();
        self.kat_mode = false;
        self.state = DrbgState::Uninstantiated;
    }

    fn rekey(&mut self) -> Result<(), CryptoError> {
        let len = self.key_len();
        self.cipher = Some(AesKey::new(&self.key[..len])?);
        Ok(())
    }

    /// V = V + 1; return E(K, V).
    fn next_block(&mut self) -> Result<[u8; BLOCK_LEN], CryptoError> {
        let cipher = self.cipher.as_ref().ok_or(CryptoError::DrbgInvalidState)?;
        increment_counter(&mut self.v);
        let mut block = self.v;
        cipher.encrypt_block(&mut block)?;
        Ok(block)
    }

    /// CTR_DRBG_Update (SP 800-90A §10.2.1.2). `provided_data` is seedlen bytes.
    fn update(&mut self, provided_data: &[u8]) -> Result<(), CryptoError> {
        let seed_len = self.seed_len();
        let key_len = self.key_len();
        if provided_data.len() != seed_len {
            return Err(CryptoError::InvalidArg);
        }

        let mut temp = Zeroizing::new([0u8; MAX_KEY_LEN + BLOCK_LEN]);
        for chunk in temp[..seed_len].chunks_exact_mut(BLOCK_LEN) {
            chunk.copy_from_slice(&self.next_block()?);
        }
        for (t, p) in temp.iter_mut().zip(provided_data) {
            *t ^= p;
        }

        self.key[..key_len].copy_from_slice(&temp[..key_len]);
        self.v.copy_from_slice(&temp[key_len..seed_len]);
        self.rekey()
    }

    #[cfg(test)]
    pub(crate) fn set_reseed_counter(&mut self, value: u64) {
        self.reseed_counter = value;
    }

    #[cfg(test)]
    fn peek_next_block(&self) -> [u8; BLOCK_LEN] {
        let mut v = self.v;
        increment_counter(&mut v);
        if let Some(cipher) = &self.cipher {
            cipher.encrypt_block(&mut v).unwrap();
        }
        v
    }
}

/// Block_Cipher_df (SP 800-90A §10.3.2) with an AES key of `key_len` bytes.
///
/// Derives `output_len` bytes from arbitrary-length input.
pub fn block_cipher_df(
    input: &[u8],
    output_len: usize,
    key_len: usize,
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    // S = L(4) || N(4) || input || 0x80 || zero padding to a block multiple
    let mut s = Zeroizing::new(Vec::with_capacity(8 + input.len() + 1 + BLOCK_LEN));
    s.extend_from_slice(&(input.len() as u32).to_be_bytes());
    s.extend_from_slice(&(output_len as u32).to_be_bytes());
    s.extend_from_slice(input);
    s.push(0x80);
    while s.len() % BLOCK_LEN != 0 {
        s.push(0x00);
    }

    // K = 0x00 01 02 .. (key_len - 1)
    let mut df_key = Zeroizing::new(vec![0u8; key_len]);
    for (i, byte) in df_key.iter_mut().enumerate() {
        *byte = i as u8;
    }
    let cipher = AesKey::new(&df_key)?;

    // temp = BCC(K, IV_0 || S) || BCC(K, IV_1 || S) || ..
    let temp_len = key_len + BLOCK_LEN;
    let mut temp = Zeroizing::new(Vec::with_capacity(temp_len));
    let mut counter = 0u32;
    while temp.len() < temp_len {
        let mut iv = [0u8; BLOCK_LEN];
        iv[..4].copy_from_slice(&counter.to_be_bytes());

        let mut chaining = [0u8; BLOCK_LEN];
        for block in std::iter::once(&iv[..]).chain(s.chunks(BLOCK_LEN)) {
            for (c, b) in chaining.iter_mut().zip(block) {
                *c ^= b;
            }
            cipher.encrypt_block(&mut chaining)?;
        }
        temp.extend_from_slice(&chaining);
        chaining.zeroize();
        counter += 1;
    }

    // K' || X from temp, then X = E(K', X) until output_len bytes are produced.
    let cipher = AesKey::new(&temp[..key_len])?;
    let mut x = [0u8; BLOCK_LEN];
    x.copy_from_slice(&temp[key_len..temp_len]);

    let mut result = Zeroizing::new(Vec::with_capacity(output_len + BLOCK_LEN));
    while result.len() < output_len {
        cipher.encrypt_block(&mut x)?;
        result.extend_from_slice(&x);
    }
    result.truncate(output_len);
    x.zeroize();
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::{CertState, CryptoUsage};
    use hex_literal::hex;
    use std::sync::atomic::{AtomicU8, Ordering};

    /// Entropy source yielding a counter-derived pattern, distinct per call.
    struct CountingEntropy(AtomicU8);

    impl EntropyInput for CountingEntropy {
        fn get_entropy(&self, out: &mut [u8]) -> Result<(), CryptoError> {
            let base = self.0.fetch_add(1, Ordering::Relaxed);
            for (i, b) in out.iter_mut().enumerate() {
                *b = base.wrapping_mul(31).wrapping_add(i as u8);
            }
            Ok(())
        }
    }

    struct FailingEntropy;

    impl EntropyInput for FailingEntropy {
        fn get_entropy(&self, _out: &mut [u8]) -> Result<(), CryptoError> {
            Err(CryptoError::EntropyGenerationNotCompleted)
        }
    }

    fn entropy() -> CountingEntropy {
        CountingEntropy(AtomicU8::new(1))
    }

    fn instantiated(config: DrbgConfig) -> Drbg {
        let mut drbg = Drbg::new(config);
        drbg.instantiate(&entropy(), None).unwrap();
        drbg
    }

    // NIST CAVP CTR_DRBG AES-128 use df, no prediction resistance, COUNT 0
    #[test]
    fn test_ctr_drbg_cavp_aes128_df() {
        let config = DrbgConfig {
            key_size: DrbgKeySize::Aes128,
            ..Default::default()
        };
        let mut drbg = Drbg::new(config);
        drbg.enter_kat_mode(
            &hex!("890eb067acf7382eff80b0c73bc872c6"),
            &hex!("aad471ef3ef1d203"),
        )
        .unwrap();
        drbg.instantiate(&FailingEntropy, None).unwrap();
        let mut out = [0u8; 64];
        drbg.generate(&mut out).unwrap();
        drbg.generate(&mut out).unwrap();
        assert_eq!(
            out,
            hex!(
                "a5514ed7095f64f3d0d3a5760394ab42062f373a25072a6ea6bcfd8489e94af6"
                "cf18659fea22ed1ca0a9e33f718b115ee536b12809c31b72b08ddd8be1910fa3"
            )
        );
        assert!(!drbg.is_unpredictable());
    }

    #[test]
    fn test_ctr_drbg_instantiate() {
        let drbg = instantiated(DrbgConfig::default());
        assert_eq!(drbg.state(), DrbgState::Instantiated);
        assert_eq!(drbg.reseed_counter(), 1);
        assert!(drbg.is_unpredictable());
    }

    #[test]
    fn test_ctr_drbg_instantiate_twice_rejected() {
        let mut drbg = instantiated(DrbgConfig::default());
        assert!(matches!(
            drbg.instantiate(&entropy(), None),
            Err(CryptoError::DrbgInvalidState)
        ));
    }

    #[test]
    fn test_ctr_drbg_instantiate_failure_stays_uninstantiated() {
        let mut drbg = Drbg::new(DrbgConfig::default());
        assert!(drbg.instantiate(&FailingEntropy, None).is_err());
        assert_eq!(drbg.state(), DrbgState::Uninstantiated);
        drbg.instantiate(&entropy(), None).unwrap();
    }

    #[test]
    fn test_ctr_drbg_personalization_conflict() {
        let mut drbg = Drbg::new(DrbgConfig::default());
        drbg.add_additional_input(&[1u8; 16]).unwrap();
        assert!(matches!(
            drbg.instantiate(&entropy(), Some(b"pers")),
            Err(CryptoError::InvalidArg)
        ));
        // The pending input was consumed by the failed call.
        drbg.instantiate(&entropy(), Some(b"pers")).unwrap();
    }

    #[test]
    fn test_ctr_drbg_generate_consecutive_differ() {
        let mut drbg = instantiated(DrbgConfig::default());
        let out1 = drbg.generate_bytes(32).unwrap();
        let out2 = drbg.generate_bytes(32).unwrap();
        assert_ne!(out1, out2);
        assert_eq!(drbg.reseed_counter(), 3);
    }

    #[test]
    fn test_ctr_drbg_generate_requires_instantiate() {
        let mut drbg = Drbg::new(DrbgConfig::default());
        let mut out = [0xAAu8; 16];
        assert!(matches!(
            drbg.generate(&mut out),
            Err(CryptoError::DrbgInvalidState)
        ));
        assert_eq!(out, [0u8; 16]);
    }

    #[test]
    fn test_ctr_drbg_empty_request_is_noop() {
        let mut drbg = instantiated(DrbgConfig::default());
        drbg.generate(&mut []).unwrap();
        assert_eq!(drbg.reseed_counter(), 1);
    }

    #[test]
    fn test_ctr_drbg_request_too_large() {
        let mut drbg = instantiated(DrbgConfig::default());
        let mut out = vec![0u8; MAX_REQUEST_BYTES + 1];
        assert!(matches!(
            drbg.generate(&mut out),
            Err(CryptoError::DrbgRequestTooLarge { max: 0xFFFF, .. })
        ));
        drbg.generate(&mut out[..MAX_REQUEST_BYTES]).unwrap();
    }

    #[test]
    fn test_ctr_drbg_reseed_required_at_bound() {
        let mut drbg = instantiated(DrbgConfig::default());
        drbg.set_reseed_counter(MAX_RESEED_COUNTER - 1);
        drbg.generate_bytes(16).unwrap();
        assert_eq!(drbg.reseed_counter(), MAX_RESEED_COUNTER);

        let mut out = [0x5Au8; 16];
        assert!(matches!(
            drbg.generate(&mut out),
            Err(CryptoError::DrbgReseedRequired)
        ));
        assert_eq!(out, [0u8; 16]);
        assert_eq!(drbg.reseed_counter(), MAX_RESEED_COUNTER);

        drbg.reseed(&entropy()).unwrap();
        assert_eq!(drbg.reseed_counter(), 1);
        drbg.generate_bytes(16).unwrap();
    }

    #[test]
    fn test_ctr_drbg_per_block_accounting_refuses_past_bound() {
        let config = DrbgConfig {
            reseed_accounting: ReseedAccounting::PerBlock,
            ..Default::default()
        };
        let mut drbg = instantiated(config);
        drbg.generate_bytes(33).unwrap();
        assert_eq!(drbg.reseed_counter(), 4);

        // 10 blocks from MAX - 2 would cross the bound.
        drbg.set_reseed_counter(MAX_RESEED_COUNTER - 2);
        let mut out = [0x5Au8; 160];
        assert!(matches!(
            drbg.generate(&mut out),
            Err(CryptoError::DrbgReseedRequired)
        ));
        assert_eq!(out, [0u8; 160]);
        assert_eq!(drbg.reseed_counter(), MAX_RESEED_COUNTER - 2);
        assert_eq!(drbg.state(), DrbgState::Instantiated);

        // Exactly reaching the bound is allowed.
        drbg.generate_bytes(32).unwrap();
        assert_eq!(drbg.reseed_counter(), MAX_RESEED_COUNTER);
        assert!(matches!(
            drbg.generate_bytes(1),
            Err(CryptoError::DrbgReseedRequired)
        ));
    }

    #[test]
    fn test_ctr_drbg_additional_input_rules() {
        let mut drbg = instantiated(DrbgConfig::default());
        assert!(matches!(
            drbg.add_additional_input(&[0u8; 6]),
            Err(CryptoError::DrbgAdditionalInputSize(6))
        ));
        assert!(drbg.add_additional_input(&[0u8; 52]).is_err());
        drbg.add_additional_input(&[0u8; 48]).unwrap();
    }

    #[test]
    fn test_ctr_drbg_additional_input_consumed_once() {
        let kat = |drbg: &mut Drbg| {
            drbg.enter_kat_mode(&[0x11u8; 32], &[0x22u8; 16]).unwrap();
            drbg.instantiate(&FailingEntropy, None).unwrap();
        };

        let mut a = Drbg::new(DrbgConfig::default());
        kat(&mut a);
        a.add_additional_input(&[0x33u8; 32]).unwrap();
        let a1 = a.generate_bytes(32).unwrap();
        let a2 = a.generate_bytes(32).unwrap();

        let mut b = Drbg::new(DrbgConfig::default());
        kat(&mut b);
        let b1 = b.generate_bytes(32).unwrap();
        let b2 = b.generate_bytes(32).unwrap();

        // Same seed: the input changes the first call only, but the state
        // diverges from there on.
        assert_ne!(a1, b1);
        assert_ne!(a2, b2);

        // A failing call consumes the pending input too.
        let mut c = Drbg::new(DrbgConfig::default());
        c.add_additional_input(&[0x44u8; 4]).unwrap();
        assert!(c.generate_bytes(16).is_err());
        kat(&mut c);
        let c1 = c.generate_bytes(32).unwrap();
        assert_eq!(c1, b1);
    }

    #[test]
    fn test_ctr_drbg_kat_determinism() {
        let run = || {
            let mut drbg = Drbg::new(DrbgConfig::default());
            drbg.enter_kat_mode(&[0xABu8; 32], &[0xCDu8; 16]).unwrap();
            drbg.instantiate(&FailingEntropy, Some(b"personal")).unwrap();
            drbg.generate_bytes(100).unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_ctr_drbg_distinct_seeds_distinct_output() {
        let mut a = Drbg::new(DrbgConfig::default());
        a.enter_kat_mode(&[1u8; 32], &[0u8; 16]).unwrap();
        a.instantiate(&FailingEntropy, None).unwrap();
        let mut b = Drbg::new(DrbgConfig::default());
        b.enter_kat_mode(&[2u8; 32], &[0u8; 16]).unwrap();
        b.instantiate(&FailingEntropy, None).unwrap();
        assert_ne!(a.generate_bytes(64).unwrap(), b.generate_bytes(64).unwrap());
    }

    #[test]
    fn test_ctr_drbg_kat_material_consumed_by_seeding() {
        let mut drbg = Drbg::new(DrbgConfig::default());
        drbg.enter_kat_mode(&[7u8; 32], &[]).unwrap();
        drbg.instantiate(&FailingEntropy, None).unwrap();
        // No material reloaded: reseed in KAT mode has nothing to use.
        assert!(matches!(
            drbg.reseed(&entropy()),
            Err(CryptoError::DrbgKatParams)
        ));
        assert_eq!(drbg.state(), DrbgState::Faulted);
        assert!(drbg.generate_bytes(16).is_err());
        drbg.uninstantiate();
        assert_eq!(drbg.state(), DrbgState::Uninstantiated);
        assert!(!drbg.kat_mode());
    }

    #[test]
    fn test_ctr_drbg_enter_kat_mode_params() {
        let mut drbg = Drbg::new(DrbgConfig::default());
        drbg.enter_kat_mode(&[], &[]).unwrap();
        assert!(!drbg.kat_mode());
        assert!(matches!(
            drbg.enter_kat_mode(&[], &[1]),
            Err(CryptoError::InvalidArg)
        ));
        assert!(matches!(
            drbg.enter_kat_mode(&[0u8; 500], &[0u8; 8]),
            Err(CryptoError::DrbgKatParams)
        ));
        drbg.enter_kat_mode(&[0u8; 496], &[0u8; 8]).unwrap();
        assert!(drbg.kat_mode());
        drbg.disable_kat_mode();
        assert!(!drbg.kat_mode());
    }

    #[test]
    fn test_ctr_drbg_reseed_failure_faults() {
        let mut drbg = instantiated(DrbgConfig::default());
        assert!(drbg.reseed(&FailingEntropy).is_err());
        assert_eq!(drbg.state(), DrbgState::Faulted);
        assert!(matches!(
            drbg.reseed(&entropy()),
            Err(CryptoError::DrbgInvalidState)
        ));
    }

    #[test]
    fn test_ctr_drbg_gated_by_fips() {
        let fips = FipsState::shared();
        fips.set_state(StateFlags::SUPPORTED | StateFlags::SUSPENDED).unwrap();
        let mut drbg = Drbg::with_approval(DrbgConfig::default(), Arc::clone(&fips));
        drbg.instantiate(&entropy(), None).unwrap();
        drbg.enter_kat_mode(&[1u8; 32], &[]).unwrap();

        fips.crypto_usage_state_set(CryptoUsage::NonApproved).unwrap();
        assert!(matches!(
            drbg.generate_bytes(16),
            Err(CryptoError::Cmvp(ccrng_types::CmvpError::NotApproved))
        ));
        // Advisory: silently skipped.
        drbg.disable_kat_mode();
        assert!(drbg.kat_mode());

        fips.set_peer_status(true).unwrap();
        drbg.disable_kat_mode();
        assert!(!drbg.kat_mode());
    }

    #[test]
    fn test_ctr_drbg_continuous_test_failure_records_fips_error() {
        let fips = FipsState::shared();
        fips.set_state(StateFlags::SUPPORTED).unwrap();
        let mut drbg = Drbg::with_approval(DrbgConfig::default(), Arc::clone(&fips));
        drbg.instantiate(&entropy(), None).unwrap();
        drbg.generate_bytes(16).unwrap();
        assert_eq!(fips.trace() & trace::PRNG_CONT, trace::PRNG_CONT);

        // Carry the block the next request will produce first.
        drbg.prev_block = Some(drbg.peek_next_block());

        let mut out = [0xFFu8; 32];
        assert!(matches!(
            drbg.generate(&mut out),
            Err(CryptoError::DrbgContinuousTestFail)
        ));
        assert_eq!(out, [0u8; 32]);
        assert_eq!(drbg.state(), DrbgState::Faulted);
        assert_eq!(fips.error(), Some(FipsError::PrngCont));
        assert_eq!(fips.state(), CertState::Error);
    }

    #[test]
    fn test_ctr_drbg_with_approval_matches_ungated() {
        let config = DrbgConfig {
            key_size: DrbgKeySize::Aes128,
            reseed_accounting: ReseedAccounting::PerBlock,
        };
        let fips = FipsState::shared();
        let mut gated = Drbg::with_approval(config, Arc::clone(&fips));
        assert_eq!(gated.config(), config);
        assert_eq!(gated.state(), DrbgState::Uninstantiated);

        let mut plain = Drbg::new(config);
        for drbg in [&mut gated, &mut plain] {
            drbg.enter_kat_mode(&[0x11u8; 16], &[0x22u8; 8]).unwrap();
            drbg.instantiate(&FailingEntropy, None).unwrap();
        }
        assert_eq!(gated.generate_bytes(40).unwrap(), plain.generate_bytes(40).unwrap());
        assert_eq!(gated.reseed_counter(), 4);

        // KAT mode skips the continuous test.
        assert_eq!(fips.trace(), 0);
    }

    #[test]
    fn test_ctr_drbg_uninstantiate_idempotent() {
        let mut drbg = instantiated(DrbgConfig::default());
        drbg.uninstantiate();
        drbg.uninstantiate();
        assert_eq!(drbg.state(), DrbgState::Uninstantiated);
        assert_eq!(drbg.reseed_counter(), 0);
        drbg.instantiate(&entropy(), None).unwrap();
    }

    #[test]
    fn test_block_cipher_df() {
        let input = b"test input for derivation function";
        let output = block_cipher_df(input, 48, 32).unwrap();
        assert_eq!(output.len(), 48);
        assert_eq!(output, block_cipher_df(input, 48, 32).unwrap());
        assert_ne!(output, block_cipher_df(b"different input", 48, 32).unwrap());
        assert_eq!(block_cipher_df(input, 32, 16).unwrap().len(), 32);
    }
}
