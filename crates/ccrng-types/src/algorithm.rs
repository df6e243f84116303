/// Certification scheme the library is initialised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CertType {
    /// No certification; both schemes are left unsupported.
    #[default]
    None,
    /// FIPS 140-3.
    Fips,
    /// Chinese commercial cryptography certification.
    Chinese,
}

/// Block cipher key size of the CTR-DRBG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrbgKeySize {
    Aes128,
    #[default]
    Aes256,
}

impl DrbgKeySize {
    /// Key length in bytes.
    pub const fn key_len(self) -> usize {
        match self {
            DrbgKeySize::Aes128 => 16,
            DrbgKeySize::Aes256 => 32,
        }
    }

    /// Seed length (key + counter block) in bytes.
    pub const fn seed_len(self) -> usize {
        self.key_len() + 16
    }
}

/// Symmetric cipher identifiers (algorithm + mode combination).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherAlgId {
    // AES-ECB
    Aes128Ecb,
    Aes256Ecb,
    // AES-CBC
    Aes128Cbc,
    Aes256Cbc,
    // AES-CTR
    Aes128Ctr,
    Aes256Ctr,
    // SM4
    Sm4Ecb,
    Sm4Cbc,
    Sm4Ctr,
}

/// Block cipher mode of operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherMode {
    Ecb,
    Cbc,
    Ctr,
}

impl CipherAlgId {
    /// The mode of operation of this cipher identifier.
    pub const fn mode(self) -> CipherMode {
        match self {
            CipherAlgId::Aes128Ecb | CipherAlgId::Aes256Ecb | CipherAlgId::Sm4Ecb => {
                CipherMode::Ecb
            }
            CipherAlgId::Aes128Cbc | CipherAlgId::Aes256Cbc | CipherAlgId::Sm4Cbc => {
                CipherMode::Cbc
            }
            CipherAlgId::Aes128Ctr | CipherAlgId::Aes256Ctr | CipherAlgId::Sm4Ctr => {
                CipherMode::Ctr
            }
        }
    }

    /// Key length in bytes.
    pub const fn key_len(self) -> usize {
        match self {
            CipherAlgId::Aes256Ecb | CipherAlgId::Aes256Cbc | CipherAlgId::Aes256Ctr => 32,
            _ => 16,
        }
    }
}

/// Direction of a symmetric cipher operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherDirection {
    Encrypt,
    Decrypt,
}

/// Hash algorithm identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgId {
    Sha256,
    Sha512,
    Sm3,
}

/// MAC algorithm identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacAlgId {
    HmacSha256,
    HmacSha512,
}

impl MacAlgId {
    /// The underlying hash of this HMAC.
    pub const fn hash(self) -> HashAlgId {
        match self {
            MacAlgId::HmacSha256 => HashAlgId::Sha256,
            MacAlgId::HmacSha512 => HashAlgId::Sha512,
        }
    }
}
