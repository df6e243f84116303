//! Hardware boundary of the noise source.
//!
//! [`TrngHal`] is the register-level surface the entropy collector drives;
//! [`Platform`] adds the platform flags and power hooks the library
//! lifecycle consults. [`SamplingSession`] scopes one enable/disable cycle
//! of the sampler.

use ccrng_types::CryptoError;
use zeroize::Zeroize;

/// Words in one entropy holding register (EHR) read.
pub const EHR_WORDS: usize = 6;

/// Bytes in one EHR read.
pub const EHR_BYTES: usize = EHR_WORDS * 4;

/// Completion status bit: the EHR holds a valid sample.
pub const STATUS_EHR_VALID: u32 = 0x1;

/// Register-level control of the true random number generator.
pub trait TrngHal: Send {
    fn enable_clock(&mut self);
    fn disable_clock(&mut self);
    /// Program the sub-sampling ratio of the selected channel.
    fn set_sub_sampling(&mut self, ratio: u32);
    /// Start sampling on a one-hot `channel`.
    fn enable_channel(&mut self, channel: u32);
    fn disable_channel(&mut self);
    /// Clear a pending completion and re-arm the sampler.
    fn clear_completion(&mut self);
    /// Block until the sampler signals completion; returns the status bits.
    fn wait_for_completion(&mut self) -> Result<u32, CryptoError>;
    /// Read the entropy holding register.
    fn read_ehr(&mut self, words: &mut [u32; EHR_WORDS]);
}

/// Platform flags and power management around the TRNG.
pub trait Platform: TrngHal {
    /// The fatal-error lock fuse is set; the library must not start.
    fn fatal_error_locked(&self) -> bool {
        false
    }

    /// Secure disable is set; crypto services are withheld.
    fn secure_disabled(&self) -> bool {
        false
    }

    fn power_down(&mut self) {}

    fn power_up(&mut self) {}
}

/// One enable/disable cycle of the sampler on a single channel.
///
/// Dropping the session disables the channel and clock and clears any
/// pending completion, on every exit path.
pub struct SamplingSession<'a, H: TrngHal + ?Sized> {
    hal: &'a mut H,
}

impl<'a, H: TrngHal + ?Sized> SamplingSession<'a, H> {
    /// Enable the clock, program `ratio` and start `channel`.
    pub fn open(hal: &'a mut H, channel: u32, ratio: u32) -> Self {
        hal.enable_clock();
        hal.set_sub_sampling(ratio);
        hal.enable_channel(channel);
        SamplingSession { hal }
    }

    /// Wait for one EHR sample and copy it into `out` as little-endian words.
    pub fn read_chunk(&mut self, out: &mut [u8; EHR_BYTES]) -> Result<(), CryptoError> {
        let status = self.hal.wait_for_completion()?;
        if status & STATUS_EHR_VALID == 0 {
            return Err(CryptoError::EntropyChannelNotReady);
        }

        let mut words = [0u32; EHR_WORDS];
        self.hal.read_ehr(&mut words);
        let res = if words.iter().any(|&w| w == 0) {
            Err(CryptoError::EntropyEhrZero)
        } else {
            for (dst, w) in out.chunks_exact_mut(4).zip(words.iter()) {
                dst.copy_from_slice(&w.to_le_bytes());
            }
            Ok(())
        };
        words.zeroize();
        self.hal.clear_completion();
        res
    }
}

impl<H: TrngHal + ?Sized> Drop for SamplingSession<'_, H> {
    fn drop(&mut self) {
        self.hal.disable_channel();
        self.hal.disable_clock();
        self.hal.clear_completion();
    }
}

/// Software TRNG backed by the operating system's random source.
///
/// For hosts without the crypto engine. Channel and ratio settings are
/// accepted and ignored.
#[cfg(feature = "soft-trng")]
#[derive(Debug, Default)]
pub struct SoftTrng {
    running: bool,
}

#[cfg(feature = "soft-trng")]
impl SoftTrng {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "soft-trng")]
impl TrngHal for SoftTrng {
    fn enable_clock(&mut self) {}

    fn disable_clock(&mut self) {}

    fn set_sub_sampling(&mut self, _ratio: u32) {}

    fn enable_channel(&mut self, _channel: u32) {
        self.running = true;
    }

    fn disable_channel(&mut self) {
        self.running = false;
    }

    fn clear_completion(&mut self) {}

    fn wait_for_completion(&mut self) -> Result<u32, CryptoError> {
        if !self.running {
            return Err(CryptoError::EntropyWaitFailed);
        }
        Ok(STATUS_EHR_VALID)
    }

    fn read_ehr(&mut self, words: &mut [u32; EHR_WORDS]) {
        let mut buf = [0u8; EHR_BYTES];
        if getrandom::getrandom(&mut buf).is_err() {
            // All-zero words are rejected by the collector.
            words.fill(0);
            return;
        }
        for (w, b) in words.iter_mut().zip(buf.chunks_exact(4)) {
            *w = u32::from_le_bytes([b[0], b[1], b[2], b[3]]);
        }
        buf.zeroize();
    }
}

#[cfg(feature = "soft-trng")]
impl Platform for SoftTrng {}
