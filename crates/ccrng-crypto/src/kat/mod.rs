//! Power-up known-answer tests (KAT).
//!
//! Each group runs a fixed vector table against one primitive family and
//! compares every output against the expected value in constant time. The
//! first failing vector's code is recorded as the scheme's error; a group
//! that passes in full sets its trace bit.
//!
//! FIPS order: AES → SHA-2 → HMAC → CTR-DRBG. Chinese order: SM4 → SM3.

pub mod tables;

use crate::cert::{chinese, fips, ApprovalState, CertScheme, ChCertState, FipsState};
use crate::drbg::{Drbg, DrbgConfig};
use crate::entropy::EntropyInput;
use crate::hash::new_digest;
use crate::hmac::Hmac;
use crate::modes::cipher_crypt;
use crate::provider;
use ccrng_types::{
    ChCertError, CipherAlgId, CipherDirection, CryptoError, FipsError, HashAlgId, MacAlgId,
};
use log::{debug, info, warn};
use std::fmt;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// A known-answer vector with its failure code.
pub trait KatVector {
    type Code: Copy + fmt::Display;

    fn name(&self) -> &str;
    fn code(&self) -> Self::Code;
    fn expected(&self) -> &[u8];
}

/// One-shot cipher vector.
#[derive(Debug, Clone, Copy)]
pub struct CipherVector<'a, E> {
    pub name: &'a str,
    pub code: E,
    pub alg: CipherAlgId,
    pub dir: CipherDirection,
    pub key: &'a [u8],
    /// Empty for ECB.
    pub iv: &'a [u8],
    pub input: &'a [u8],
    pub output: &'a [u8],
}

#[derive(Debug, Clone, Copy)]
pub struct HashVector<'a, E> {
    pub name: &'a str,
    pub code: E,
    pub alg: HashAlgId,
    pub msg: &'a [u8],
    pub digest: &'a [u8],
}

#[derive(Debug, Clone, Copy)]
pub struct HmacVector<'a, E> {
    pub name: &'a str,
    pub code: E,
    pub alg: MacAlgId,
    pub key: &'a [u8],
    pub msg: &'a [u8],
    pub mac: &'a [u8],
}

/// CTR-DRBG vector for the instantiate, reseed, generate, reseed, generate
/// flow. The second output is the one compared.
#[derive(Debug, Clone, Copy)]
pub struct DrbgVector<'a, E> {
    pub name: &'a str,
    pub code: E,
    pub entropy: &'a [u8],
    pub nonce: &'a [u8],
    pub personalization: &'a [u8],
    pub entropy_pr1: &'a [u8],
    pub addin1: &'a [u8],
    pub entropy_pr2: &'a [u8],
    pub addin2: &'a [u8],
    pub output: &'a [u8],
}

macro_rules! impl_kat_vector {
    ($ty:ident, $expected:ident) => {
        impl<E: Copy + fmt::Display> KatVector for $ty<'_, E> {
            type Code = E;

            fn name(&self) -> &str {
                self.name
            }

            fn code(&self) -> E {
                self.code
            }

            fn expected(&self) -> &[u8] {
                self.$expected
            }
        }
    };
}

impl_kat_vector!(CipherVector, output);
impl_kat_vector!(HashVector, digest);
impl_kat_vector!(HmacVector, mac);
impl_kat_vector!(DrbgVector, output);

/// Run `vectors` in order through `invoke`.
///
/// Returns the code of the first vector whose invocation fails or whose
/// output differs from the expected value.
pub fn run_set<V, F>(vectors: &[V], mut invoke: F) -> Result<(), V::Code>
where
    V: KatVector,
    F: FnMut(&V) -> Result<Vec<u8>, CryptoError>,
{
    for v in vectors {
        match invoke(v) {
            Ok(out) if bool::from(out.as_slice().ct_eq(v.expected())) => {}
            Ok(_) => {
                warn!("kat: {} output mismatch ({})", v.name(), v.code());
                return Err(v.code());
            }
            Err(e) => {
                warn!("kat: {} failed: {e} ({})", v.name(), v.code());
                return Err(v.code());
            }
        }
    }
    Ok(())
}

/// [`run_set`], then record `test` in the trace of `state` on full success.
pub fn run_group<S, V, F>(
    state: &ApprovalState<S>,
    test: u32,
    vectors: &[V],
    invoke: F,
) -> Result<(), S::Error>
where
    S: CertScheme,
    V: KatVector<Code = S::Error>,
    F: FnMut(&V) -> Result<Vec<u8>, CryptoError>,
{
    run_set(vectors, invoke)?;
    state.set_trace(test);
    debug!("{}: kat group {test:#x} passed", S::NAME);
    Ok(())
}

pub fn invoke_cipher<E>(v: &CipherVector<'_, E>) -> Result<Vec<u8>, CryptoError> {
    cipher_crypt(v.alg, v.dir, v.key, v.iv, v.input)
}

pub fn invoke_hash<E>(v: &HashVector<'_, E>) -> Result<Vec<u8>, CryptoError> {
    let mut ctx = new_digest(v.alg);
    provider::digest(ctx.as_mut(), v.msg)
}

pub fn invoke_hmac<E>(v: &HmacVector<'_, E>) -> Result<Vec<u8>, CryptoError> {
    Hmac::mac(v.alg, v.key, v.msg)
}

/// Entropy input for a DRBG that only ever runs in KAT mode.
struct KatOnlyEntropy;

impl EntropyInput for KatOnlyEntropy {
    fn get_entropy(&self, _out: &mut [u8]) -> Result<(), CryptoError> {
        Err(CryptoError::DrbgKatParams)
    }
}

/// Run a DRBG vector on a scratch AES-256 DRBG, gated by `approval` when given.
pub fn invoke_drbg<E>(
    v: &DrbgVector<'_, E>,
    approval: Option<&Arc<FipsState>>,
) -> Result<Vec<u8>, CryptoError> {
    let mut drbg = match approval {
        Some(state) => Drbg::with_approval(DrbgConfig::default(), Arc::clone(state)),
        None => Drbg::new(DrbgConfig::default()),
    };
    let res = drbg_flow(&mut drbg, v);
    drbg.uninstantiate();
    res
}

fn drbg_flow<E>(drbg: &mut Drbg, v: &DrbgVector<'_, E>) -> Result<Vec<u8>, CryptoError> {
    let mut out = vec![0u8; v.output.len()];

    drbg.enter_kat_mode(v.entropy, v.nonce)?;
    drbg.add_additional_input(v.personalization)?;
    drbg.instantiate(&KatOnlyEntropy, None)?;

    drbg.enter_kat_mode(v.entropy_pr1, &[])?;
    drbg.add_additional_input(v.addin1)?;
    drbg.reseed(&KatOnlyEntropy)?;
    drbg.generate(&mut out)?;

    drbg.enter_kat_mode(v.entropy_pr2, &[])?;
    drbg.add_additional_input(v.addin2)?;
    drbg.reseed(&KatOnlyEntropy)?;
    drbg.generate(&mut out)?;
    Ok(out)
}

/// The FIPS power-up vector tables.
#[derive(Debug, Clone, Copy)]
pub struct FipsKatTables<'a> {
    pub aes: &'a [CipherVector<'a, FipsError>],
    pub hash: &'a [HashVector<'a, FipsError>],
    pub hmac: &'a [HmacVector<'a, FipsError>],
    pub prng: &'a [DrbgVector<'a, FipsError>],
}

impl Default for FipsKatTables<'_> {
    fn default() -> Self {
        FipsKatTables {
            aes: tables::AES,
            hash: tables::HASH,
            hmac: tables::HMAC,
            prng: tables::PRNG,
        }
    }
}

/// The Chinese certification power-up vector tables.
#[derive(Debug, Clone, Copy)]
pub struct ChCertKatTables<'a> {
    pub sm4: &'a [CipherVector<'a, ChCertError>],
    pub sm3: &'a [HashVector<'a, ChCertError>],
}

impl Default for ChCertKatTables<'_> {
    fn default() -> Self {
        ChCertKatTables {
            sm4: tables::SM4,
            sm3: tables::SM3,
        }
    }
}

/// Run the FIPS power-up self-tests with the built-in tables.
pub fn run_fips_power_up(state: &Arc<FipsState>) -> Result<(), FipsError> {
    run_fips_power_up_with(state, &FipsKatTables::default())
}

/// Run the FIPS power-up self-tests over `tables`.
///
/// The first failure is recorded with `set_error` and returned. Success is
/// reported to the peer.
pub fn run_fips_power_up_with(
    state: &Arc<FipsState>,
    tables: &FipsKatTables<'_>,
) -> Result<(), FipsError> {
    let st: &FipsState = state;
    let res = run_group(st, fips::trace::AES, tables.aes, invoke_cipher)
        .and_then(|()| run_group(st, fips::trace::HASH, tables.hash, invoke_hash))
        .and_then(|()| run_group(st, fips::trace::HMAC, tables.hmac, invoke_hmac))
        .and_then(|()| {
            run_group(st, fips::trace::PRNG, tables.prng, |v| {
                invoke_drbg(v, Some(state))
            })
        });
    match res {
        Ok(()) => {
            info!("fips: power-up self-tests passed");
            st.notify_peer(Ok(()));
            Ok(())
        }
        Err(code) => {
            record_failure(st, code);
            Err(code)
        }
    }
}

/// Run the Chinese certification power-up self-tests with the built-in tables.
pub fn run_ch_cert_power_up(state: &ChCertState) -> Result<(), ChCertError> {
    run_ch_cert_power_up_with(state, &ChCertKatTables::default())
}

pub fn run_ch_cert_power_up_with(
    state: &ChCertState,
    tables: &ChCertKatTables<'_>,
) -> Result<(), ChCertError> {
    let res = run_group(state, chinese::trace::SM4, tables.sm4, invoke_cipher)
        .and_then(|()| run_group(state, chinese::trace::SM3, tables.sm3, invoke_hash));
    match res {
        Ok(()) => {
            info!("chinese cert: power-up self-tests passed");
            Ok(())
        }
        Err(code) => {
            record_failure(state, code);
            Err(code)
        }
    }
}

fn record_failure<S: CertScheme>(state: &ApprovalState<S>, code: S::Error) {
    if let Err(e) = state.set_error(code) {
        debug!("{}: kat failure {code} not recorded: {e}", S::NAME);
    }
}
