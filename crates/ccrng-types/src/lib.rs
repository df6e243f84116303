#![forbid(unsafe_code)]
#![doc = "Common types, error codes, algorithm identifiers, and constants for ccrng."]

pub mod algorithm;
pub mod error;

pub use algorithm::*;
pub use error::*;
