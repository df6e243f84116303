#![forbid(unsafe_code)]
#![doc = "Certified random-bit generation for a crypto engine host library."]

// Core traits
pub mod provider;

// Primitives consumed by the self-tests and the DRBG
pub mod aes;
pub mod hash;
pub mod hmac;
pub mod modes;
pub mod sha2;
pub mod sm3;
pub mod sm4;

// Random-bit generation
pub mod drbg;
pub mod entropy;

// Certification
pub mod cert;
pub mod kat;

// Library
pub mod config;
pub mod lifecycle;

pub use config::LibConfig;
pub use lifecycle::CryptoLib;
