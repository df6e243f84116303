//! Ring-oscillator channel selection.
//!
//! The noise source has four channels, encoded as one-hot bits
//! `0x1, 0x2, 0x4, 0x8` from fastest to slowest.

use ccrng_types::CryptoError;

/// Number of noise channels.
pub const NUM_CHANNELS: usize = 4;

/// The slowest channel bit.
pub const LAST_CHANNEL: u32 = 0x8;

/// Select the first channel at or after `start` (moving to slower
/// channels) that is present in `allowed`.
///
/// `select_channel(0b0110, 0b0001) == Ok(0b0010)`.
pub fn select_channel(allowed: u32, start: u32) -> Result<u32, CryptoError> {
    if start == 0 {
        return Err(CryptoError::EntropyNoEligibleChannel);
    }
    let mut channel = start;
    while channel <= LAST_CHANNEL {
        if allowed & channel != 0 {
            return Ok(channel);
        }
        channel <<= 1;
    }
    Err(CryptoError::EntropyNoEligibleChannel)
}

/// Look up the sub-sampling ratio configured for `channel`.
pub fn sampling_ratio(ratios: &[u32; NUM_CHANNELS], channel: u32) -> Result<u32, CryptoError> {
    match channel {
        0x1 => Ok(ratios[0]),
        0x2 => Ok(ratios[1]),
        0x4 => Ok(ratios[2]),
        0x8 => Ok(ratios[3]),
        _ => Err(CryptoError::EntropyNoEligibleChannel),
    }
}

/// Derive the allowed-channel mask: bit n is set iff ratio n is non-zero.
pub fn allowed_mask(ratios: &[u32; NUM_CHANNELS]) -> u32 {
    ratios
        .iter()
        .enumerate()
        .filter(|&(_, &r)| r != 0)
        .fold(0, |mask, (i, _)| mask | (1 << i))
}
