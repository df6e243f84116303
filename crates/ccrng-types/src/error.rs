/// Cryptographic operation errors.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    // General errors
    #[error("null or empty input")]
    NullInput,
    #[error("invalid argument")]
    InvalidArg,
    #[error("operation not supported")]
    NotSupported,

    // Buffer errors
    #[error("buffer length not enough: need {need}, got {got}")]
    BufferTooSmall { need: usize, got: usize },

    // Symmetric cipher errors
    #[error("invalid key length: expected {expected}, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },
    #[error("invalid iv length")]
    InvalidIvLength,

    // Entropy source errors
    #[error("entropy: no eligible noise channel")]
    EntropyNoEligibleChannel,
    #[error("entropy: channel completed without a valid sample")]
    EntropyChannelNotReady,
    #[error("entropy: sample register read as zero")]
    EntropyEhrZero,
    #[error("entropy: waiting for sampler completion failed")]
    EntropyWaitFailed,
    #[error("entropy: repetition count test failed")]
    EntropyRctFailure,
    #[error("entropy: adaptive proportion test failed")]
    EntropyAptFailure,
    #[error("entropy: generation not completed on any channel")]
    EntropyGenerationNotCompleted,

    // DRBG errors
    #[error("drbg: invalid state")]
    DrbgInvalidState,
    #[error("drbg: reseed required")]
    DrbgReseedRequired,
    #[error("drbg: request of {got} bytes exceeds the maximum of {max}")]
    DrbgRequestTooLarge { max: usize, got: usize },
    #[error("drbg: invalid additional input size {0}")]
    DrbgAdditionalInputSize(usize),
    #[error("drbg: invalid known-answer test parameters")]
    DrbgKatParams,
    #[error("drbg: continuous test detected a repeated block")]
    DrbgContinuousTestFail,

    // Certification gating
    #[error("certification: {0}")]
    Cmvp(#[from] CmvpError),
}

impl CryptoError {
    /// True for raw-sample health test failures of the noise source.
    pub fn is_health_failure(&self) -> bool {
        matches!(
            self,
            CryptoError::EntropyRctFailure | CryptoError::EntropyAptFailure
        )
    }
}

/// Certification (approval state machine) errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CmvpError {
    #[error("an error is already recorded")]
    ErrorAlreadyRecorded,
    #[error("state flags {0:#x} cannot be set directly")]
    InvalidStateFlags(u32),
    #[error("state flags {0:#x} cannot be reverted")]
    InvalidRevert(u32),
    #[error("operation requires the suspended state")]
    NotSuspended,
    #[error("operation not approved")]
    NotApproved,
}

/// FIPS error codes recorded in the FIPS approval state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum FipsError {
    #[error("fips: general error")]
    General,
    #[error("fips: error reported by the peer environment")]
    FromRee,
    #[error("fips: AES-ECB self-test failed")]
    AesEcbPut,
    #[error("fips: AES-CBC self-test failed")]
    AesCbcPut,
    #[error("fips: AES-CTR self-test failed")]
    AesCtrPut,
    #[error("fips: SHA-256 self-test failed")]
    Sha256Put,
    #[error("fips: SHA-512 self-test failed")]
    Sha512Put,
    #[error("fips: HMAC-SHA256 self-test failed")]
    HmacSha256Put,
    #[error("fips: HMAC-SHA512 self-test failed")]
    HmacSha512Put,
    #[error("fips: PRNG self-test failed")]
    PrngPut,
    #[error("fips: PRNG continuous test failed")]
    PrngCont,
}

/// Chinese certification error codes recorded in its approval state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ChCertError {
    #[error("chinese cert: SM4-ECB self-test failed")]
    Sm4EcbPut,
    #[error("chinese cert: SM4-CBC self-test failed")]
    Sm4CbcPut,
    #[error("chinese cert: SM4-CTR self-test failed")]
    Sm4CtrPut,
    #[error("chinese cert: SM3 self-test failed")]
    Sm3Put,
}

/// Library initialisation and lifecycle errors.
#[derive(Debug, thiserror::Error)]
pub enum LibError {
    #[error("library: invalid configuration: {0}")]
    Config(String),
    #[error("library: fatal error is locked")]
    FatalErrorLocked,
    #[error("library: secure disable is set")]
    SecureDisabled,
    #[error("library: suspended")]
    Suspended,
    #[error("library: not suspended")]
    NotSuspended,
    #[error("library: fips power-up test failed: {0}")]
    Fips(#[from] FipsError),
    #[error("library: chinese certification power-up test failed: {0}")]
    ChCert(#[from] ChCertError),
    #[error("library: random generator instantiation failed: {0}")]
    RndInstantiation(#[source] CryptoError),
    #[error("library: certification state: {0}")]
    Cmvp(#[from] CmvpError),
    #[error("library: crypto error: {0}")]
    Crypto(#[from] CryptoError),
}
