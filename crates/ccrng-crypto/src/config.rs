//! Library configuration.

use crate::drbg::DrbgConfig;
use crate::entropy::EntropyConfig;
use ccrng_types::{CertType, LibError};

/// Everything [`crate::lifecycle::CryptoLib::init`] needs besides the platform.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct LibConfig {
    #[cfg_attr(feature = "serde", serde(with = "cert_type_serde"))]
    pub cert_type: CertType,
    pub entropy: EntropyConfig,
    pub drbg: DrbgConfig,
}

impl LibConfig {
    pub fn validate(&self) -> Result<(), LibError> {
        self.entropy.validate()
    }

    /// Parse and validate a TOML configuration. Missing keys take their
    /// defaults.
    ///
    /// ```
    /// use ccrng_crypto::config::LibConfig;
    /// use ccrng_types::{CertType, DrbgKeySize};
    ///
    /// let config = LibConfig::from_toml_str(
    ///     r#"
    ///     cert_type = "fips"
    ///
    ///     [entropy]
    ///     sub_sampling_ratios = [0, 500, 1000, 0]
    ///
    ///     [drbg]
    ///     key_size = 128
    ///     "#,
    /// )
    /// .unwrap();
    /// assert_eq!(config.cert_type, CertType::Fips);
    /// assert_eq!(config.entropy.allowed_channels(), 0b0110);
    /// assert_eq!(config.drbg.key_size, DrbgKeySize::Aes128);
    /// ```
    #[cfg(feature = "serde")]
    pub fn from_toml_str(s: &str) -> Result<Self, LibError> {
        let config: LibConfig = toml::from_str(s).map_err(|e| LibError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(feature = "serde")]
mod cert_type_serde {
    use ccrng_types::CertType;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<CertType, D::Error> {
        let s = String::deserialize(d)?;
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(CertType::None),
            "fips" => Ok(CertType::Fips),
            "chinese" => Ok(CertType::Chinese),
            other => Err(serde::de::Error::custom(format!(
                "unknown cert type {other:?}, expected none, fips or chinese"
            ))),
        }
    }
}
