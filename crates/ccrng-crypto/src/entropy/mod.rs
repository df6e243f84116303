//! Entropy source with health testing (NIST SP 800-90B).
//!
//! Qualifies and samples a ring-oscillator noise source:
//! 1. Pick the fastest allowed channel (or the last one that worked)
//! 2. Collect raw bytes through a scoped [`SamplingSession`]
//! 3. Run the RCT and APT over every collected bit
//! 4. On failure, rotate to the next slower allowed channel
//!
//! # Example
//!
//! ```
//! use ccrng_crypto::entropy::{EntropyConfig, EntropySource, SoftTrng};
//!
//! let es = EntropySource::new(SoftTrng::new(), EntropyConfig::default()).unwrap();
//! es.startup_test().expect("startup test failed");
//! let mut buf = [0u8; 48];
//! es.get_entropy(&mut buf).expect("entropy acquisition failed");
//! ```

pub mod channel;
pub mod hal;
pub mod health;

pub use channel::{allowed_mask, sampling_ratio, select_channel};
#[cfg(feature = "soft-trng")]
pub use hal::SoftTrng;
pub use hal::{Platform, SamplingSession, TrngHal, EHR_BYTES};
pub use health::{AptTest, HealthTest, RctTest};

use ccrng_types::{CryptoError, LibError};
use log::{debug, warn};
use parking_lot::Mutex;
use zeroize::Zeroize;

/// Largest single collection in bytes.
pub const MAX_COLLECT_BYTES: usize = 1056;

/// Default number of bytes collected and discarded by the startup test.
pub const DEFAULT_STARTUP_BYTES: usize = 528;

/// Default sub-sampling ratio programmed for every channel.
pub const DEFAULT_SUB_SAMPLING_RATIO: u32 = 1000;

/// Bound on channel rotation within one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct RetryPolicy {
    /// Channels tried (including the first) before giving up.
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: channel::NUM_CHANNELS as u32,
        }
    }
}

/// Configuration for the entropy source.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct EntropyConfig {
    /// Sub-sampling ratio per channel, fastest first. Zero disables the
    /// channel. Default: 1000 for every channel.
    pub sub_sampling_ratios: [u32; channel::NUM_CHANNELS],
    /// RCT cutoff. Default: 21.
    pub rct_cutoff: u32,
    /// APT cutoff. Default: 589.
    pub apt_cutoff: u32,
    /// APT window in 1-bit samples. Default: 1024.
    pub apt_window: u32,
    /// Bytes collected by the startup test. Default: 528.
    pub startup_bytes: usize,
    pub retry: RetryPolicy,
}

impl Default for EntropyConfig {
    fn default() -> Self {
        EntropyConfig {
            sub_sampling_ratios: [DEFAULT_SUB_SAMPLING_RATIO; channel::NUM_CHANNELS],
            rct_cutoff: health::DEFAULT_RCT_CUTOFF,
            apt_cutoff: health::DEFAULT_APT_CUTOFF,
            apt_window: health::DEFAULT_APT_WINDOW,
            startup_bytes: DEFAULT_STARTUP_BYTES,
            retry: RetryPolicy::default(),
        }
    }
}

impl EntropyConfig {
    /// Mask of the channels with a non-zero sub-sampling ratio.
    pub fn allowed_channels(&self) -> u32 {
        allowed_mask(&self.sub_sampling_ratios)
    }

    pub fn validate(&self) -> Result<(), LibError> {
        if self.allowed_channels() == 0 {
            return Err(LibError::Config(
                "entropy: every sub-sampling ratio is zero".into(),
            ));
        }
        if self.rct_cutoff < 2 {
            return Err(LibError::Config(format!(
                "entropy: rct cutoff {} is below 2",
                self.rct_cutoff
            )));
        }
        if self.apt_window == 0 || self.apt_cutoff == 0 || self.apt_cutoff >= self.apt_window {
            return Err(LibError::Config(format!(
                "entropy: apt cutoff {} does not fit window {}",
                self.apt_cutoff, self.apt_window
            )));
        }
        if self.startup_bytes == 0 || self.startup_bytes > MAX_COLLECT_BYTES {
            return Err(LibError::Config(format!(
                "entropy: startup byte count {} out of range",
                self.startup_bytes
            )));
        }
        if self.retry.max_attempts == 0 {
            return Err(LibError::Config("entropy: retry policy allows no attempt".into()));
        }
        Ok(())
    }
}

/// A supplier of seed material for the DRBG.
pub trait EntropyInput: Send + Sync {
    /// Fill `out` with entropy.
    fn get_entropy(&self, out: &mut [u8]) -> Result<(), CryptoError>;
}

struct Collector<H> {
    hal: H,
    config: EntropyConfig,
    allowed: u32,
    /// Channel of the last successful collection, 0 if none.
    last_channel: u32,
    health: HealthTest,
}

/// Health-tested entropy collection over a [`TrngHal`].
///
/// All collection is serialised by an internal lock.
pub struct EntropySource<H: TrngHal> {
    inner: Mutex<Collector<H>>,
}

impl<H: TrngHal> EntropySource<H> {
    /// Create an entropy source over `hal`, rejecting unusable configurations.
    pub fn new(hal: H, config: EntropyConfig) -> Result<Self, LibError> {
        config.validate()?;
        let health = HealthTest::new(config.rct_cutoff, config.apt_window, config.apt_cutoff);
        Ok(EntropySource {
            inner: Mutex::new(Collector {
                hal,
                allowed: config.allowed_channels(),
                config,
                last_channel: 0,
                health,
            }),
        })
    }

    /// Fill `out` with health-tested raw entropy.
    pub fn get_entropy(&self, out: &mut [u8]) -> Result<(), CryptoError> {
        self.inner.lock().get_entropy(out)
    }

    /// Collect the configured startup amount, test it and discard it.
    pub fn startup_test(&self) -> Result<(), CryptoError> {
        let mut inner = self.inner.lock();
        let mut buf = vec![0u8; inner.config.startup_bytes];
        let res = inner.get_entropy(&mut buf);
        buf.zeroize();
        if let Err(ref e) = res {
            warn!("entropy: startup test failed: {e}");
        }
        res
    }

    /// Channel of the last successful collection, 0 if none yet.
    pub fn last_channel(&self) -> u32 {
        self.inner.lock().last_channel
    }

    /// Run `f` with exclusive access to the hardware.
    pub fn with_hal<R>(&self, f: impl FnOnce(&mut H) -> R) -> R {
        f(&mut self.inner.lock().hal)
    }

    pub fn hal_mut(&mut self) -> &mut H {
        &mut self.inner.get_mut().hal
    }

    /// Consume the source and hand the hardware back.
    pub fn into_hal(self) -> H {
        self.inner.into_inner().hal
    }
}

impl<H: TrngHal> EntropyInput for EntropySource<H> {
    fn get_entropy(&self, out: &mut [u8]) -> Result<(), CryptoError> {
        EntropySource::get_entropy(self, out)
    }
}

impl<H: TrngHal> Collector<H> {
    fn get_entropy(&mut self, out: &mut [u8]) -> Result<(), CryptoError> {
        if out.is_empty() {
            return Err(CryptoError::NullInput);
        }
        if out.len() > MAX_COLLECT_BYTES {
            return Err(CryptoError::InvalidArg);
        }

        let start = if self.last_channel != 0 { self.last_channel } else { 1 };
        let mut channel = select_channel(self.allowed, start)?;

        for attempt in 0..self.config.retry.max_attempts {
            let res = self
                .collect(channel, out)
                .and_then(|()| self.health.test_buffer(out));
            match res {
                Ok(()) => {
                    if channel != self.last_channel {
                        debug!("entropy: using channel {channel:#x}");
                    }
                    self.last_channel = channel;
                    return Ok(());
                }
                Err(e) => {
                    out.zeroize();
                    if e.is_health_failure() {
                        warn!("entropy: channel {channel:#x} health test failed: {e}");
                    } else {
                        warn!("entropy: channel {channel:#x} failed on attempt {attempt}: {e}");
                    }
                    match select_channel(self.allowed, channel << 1) {
                        Ok(next) => channel = next,
                        Err(_) => break,
                    }
                }
            }
        }

        self.last_channel = 0;
        Err(CryptoError::EntropyGenerationNotCompleted)
    }

    /// Read `out.len()` raw bytes from `channel`, whole EHR chunks at a time.
    fn collect(&mut self, channel: u32, out: &mut [u8]) -> Result<(), CryptoError> {
        let ratio = sampling_ratio(&self.config.sub_sampling_ratios, channel)?;
        let mut session = SamplingSession::open(&mut self.hal, channel, ratio);
        let mut chunk = [0u8; EHR_BYTES];
        let mut res = Ok(());
        for dst in out.chunks_mut(EHR_BYTES) {
            if let Err(e) = session.read_chunk(&mut chunk) {
                res = Err(e);
                break;
            }
            dst.copy_from_slice(&chunk[..dst.len()]);
        }
        chunk.zeroize();
        if res.is_err() {
            out.zeroize();
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::hal::mock::{MockTrng, Sample};
    use super::hal::EHR_WORDS;
    use super::*;

    fn source(hal: MockTrng, ratios: [u32; 4]) -> EntropySource<MockTrng> {
        let config = EntropyConfig {
            sub_sampling_ratios: ratios,
            ..Default::default()
        };
        EntropySource::new(hal, config).unwrap()
    }

    #[test]
    fn test_config_default_is_valid() {
        let config = EntropyConfig::default();
        config.validate().unwrap();
        assert_eq!(config.allowed_channels(), 0b1111);
    }

    #[test]
    fn test_config_all_zero_ratios_rejected() {
        let config = EntropyConfig {
            sub_sampling_ratios: [0; 4],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(LibError::Config(_))));
        assert!(EntropySource::new(MockTrng::default(), config).is_err());
    }

    #[test]
    fn test_get_entropy_uses_fastest_allowed_channel() {
        let es = source(MockTrng::default(), [0, 10, 20, 30]);
        let mut buf = [0u8; 48];
        es.get_entropy(&mut buf).unwrap();
        assert_eq!(buf, [0x55u8; 48]);
        assert_eq!(es.last_channel(), 0x2);
        es.with_hal(|hal| {
            assert_eq!(hal.ratio, 10);
            assert!(!hal.clock_on);
        });
    }

    #[test]
    fn test_get_entropy_partial_chunk() {
        let es = source(MockTrng::default(), [1, 1, 1, 1]);
        let mut buf = [0u8; 30];
        es.get_entropy(&mut buf).unwrap();
        assert!(buf.iter().all(|&b| b == 0x55));
    }

    #[test]
    fn test_get_entropy_rotates_past_stuck_channel() {
        let hal = MockTrng {
            bad_channels: 0x1,
            ..Default::default()
        };
        let es = source(hal, [1, 2, 3, 4]);
        let mut buf = [0u8; 48];
        es.get_entropy(&mut buf).unwrap();
        assert_eq!(es.last_channel(), 0x2);
        es.with_hal(|hal| assert_eq!(hal.enabled_channels, vec![0x1, 0x2]));

        // The working channel is remembered.
        es.get_entropy(&mut buf).unwrap();
        es.with_hal(|hal| assert_eq!(hal.enabled_channels, vec![0x1, 0x2, 0x2]));
    }

    #[test]
    fn test_get_entropy_rotates_past_zero_ehr() {
        let mut hal = MockTrng::default();
        hal.script.push_back(Sample::valid([0; EHR_WORDS]));
        let es = source(hal, [1, 0, 1, 0]);
        let mut buf = [0u8; 24];
        es.get_entropy(&mut buf).unwrap();
        assert_eq!(es.last_channel(), 0x4);
    }

    #[test]
    fn test_get_entropy_exhausted_rotation() {
        let hal = MockTrng {
            bad_channels: 0b1111,
            ..Default::default()
        };
        let es = source(hal, [1, 1, 1, 1]);
        let mut buf = [0xAAu8; 48];
        assert!(matches!(
            es.get_entropy(&mut buf),
            Err(CryptoError::EntropyGenerationNotCompleted)
        ));
        assert_eq!(buf, [0u8; 48]);
        assert_eq!(es.last_channel(), 0);
    }

    #[test]
    fn test_get_entropy_respects_retry_policy() {
        let hal = MockTrng {
            bad_channels: 0b0011,
            ..Default::default()
        };
        let config = EntropyConfig {
            retry: RetryPolicy { max_attempts: 2 },
            ..Default::default()
        };
        let es = EntropySource::new(hal, config).unwrap();
        let mut buf = [0u8; 24];
        assert!(es.get_entropy(&mut buf).is_err());
        es.with_hal(|hal| assert_eq!(hal.enabled_channels, vec![0x1, 0x2]));
    }

    #[test]
    fn test_get_entropy_size_limits() {
        let es = source(MockTrng::default(), [1, 1, 1, 1]);
        assert!(matches!(
            es.get_entropy(&mut []),
            Err(CryptoError::NullInput)
        ));
        let mut big = vec![0u8; MAX_COLLECT_BYTES + 1];
        assert!(matches!(
            es.get_entropy(&mut big),
            Err(CryptoError::InvalidArg)
        ));
    }

    #[test]
    fn test_startup_test_collects_and_discards() {
        let mut es = source(MockTrng::default(), [1, 1, 1, 1]);
        es.startup_test().unwrap();
        // 528 bytes = 22 EHR reads, each re-armed, plus one release
        assert_eq!(es.hal_mut().clears, 23);
    }

    #[cfg(feature = "soft-trng")]
    #[test]
    fn test_soft_trng_entropy() {
        let es = EntropySource::new(SoftTrng::new(), EntropyConfig::default()).unwrap();
        es.startup_test().unwrap();
        let mut buf = [0u8; 48];
        es.get_entropy(&mut buf).unwrap();
        assert!(buf.iter().any(|&b| b != 0));
    }
}
