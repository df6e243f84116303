//! Raw-sample health tests per NIST SP 800-90B §4.4.
//!
//! The noise source is binary, so every bit of a collected buffer is one
//! sample. Bits are taken least-significant first within each byte, which
//! matches reading the little-endian sample words bit by bit.
//!
//! - **Repetition Count Test (RCT)**: detects a stuck noise source
//! - **Adaptive Proportion Test (APT)**: detects a biased noise source

use ccrng_types::CryptoError;

/// Default RCT cutoff for H=1.0, α=2⁻²⁰: C = 1 + ⌈20/1.0⌉ = 21.
pub const DEFAULT_RCT_CUTOFF: u32 = 21;

/// Default APT window size for a binary noise source.
pub const DEFAULT_APT_WINDOW: u32 = 1024;

/// Default APT cutoff for W=1024, α=2⁻²⁰.
pub const DEFAULT_APT_CUTOFF: u32 = 589;

/// Repetition Count Test (NIST SP 800-90B §4.4.1).
pub struct RctTest {
    /// Cutoff threshold C; failure when the count reaches this value.
    cutoff: u32,
    /// Current consecutive repetition count (B).
    count: u32,
    /// Previous sample value (A).
    last_sample: u8,
    initialized: bool,
}

impl RctTest {
    pub fn new(cutoff: u32) -> Self {
        RctTest {
            cutoff,
            count: 0,
            last_sample: 0,
            initialized: false,
        }
    }

    /// Test a single sample. Returns `Err(EntropyRctFailure)` once the same
    /// value has been seen `cutoff` times in a row.
    pub fn test(&mut self, sample: u8) -> Result<(), CryptoError> {
        if !self.initialized {
            self.last_sample = sample;
            self.count = 1;
            self.initialized = true;
            return Ok(());
        }

        if sample == self.last_sample {
            self.count += 1;
            if self.count >= self.cutoff {
                return Err(CryptoError::EntropyRctFailure);
            }
        } else {
            self.last_sample = sample;
            self.count = 1;
        }

        Ok(())
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.last_sample = 0;
        self.initialized = false;
    }
}

/// Adaptive Proportion Test (NIST SP 800-90B §4.4.2).
///
/// The first sample of each window becomes the base value; at the end of
/// the window the test fails if the base value was seen more than `cutoff`
/// times. A trailing partial window is not judged.
pub struct AptTest {
    window_size: u32,
    cutoff: u32,
    /// Occurrences of the base value in the current window (B).
    count: u32,
    /// Samples examined in the current window.
    index: u32,
    /// Base value of the current window (A).
    base_value: u8,
    base_set: bool,
}

impl AptTest {
    pub fn new(window_size: u32, cutoff: u32) -> Self {
        AptTest {
            window_size,
            cutoff,
            count: 0,
            index: 0,
            base_value: 0,
            base_set: false,
        }
    }

    /// Test a single sample.
    pub fn test(&mut self, sample: u8) -> Result<(), CryptoError> {
        if !self.base_set {
            self.base_value = sample;
            self.base_set = true;
            self.count = 1;
            self.index = 1;
        } else {
            if sample == self.base_value {
                self.count += 1;
            }
            self.index += 1;
        }

        if self.index >= self.window_size {
            let count = self.count;
            self.base_set = false;
            self.count = 0;
            self.index = 0;
            if count > self.cutoff {
                return Err(CryptoError::EntropyAptFailure);
            }
        }

        Ok(())
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.index = 0;
        self.base_value = 0;
        self.base_set = false;
    }
}

/// Combined health test that runs both RCT and APT on each sample.
pub struct HealthTest {
    pub rct: RctTest,
    pub apt: AptTest,
}

impl HealthTest {
    pub fn new(rct_cutoff: u32, apt_window: u32, apt_cutoff: u32) -> Self {
        HealthTest {
            rct: RctTest::new(rct_cutoff),
            apt: AptTest::new(apt_window, apt_cutoff),
        }
    }

    /// Create a combined health test with the default parameters.
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_RCT_CUTOFF, DEFAULT_APT_WINDOW, DEFAULT_APT_CUTOFF)
    }

    /// Test a single 1-bit sample against both RCT and APT.
    pub fn test_sample(&mut self, sample: u8) -> Result<(), CryptoError> {
        self.rct.test(sample)?;
        self.apt.test(sample)?;
        Ok(())
    }

    /// Run both tests over every bit of one collected buffer.
    ///
    /// State does not carry over between buffers.
    pub fn test_buffer(&mut self, data: &[u8]) -> Result<(), CryptoError> {
        self.reset();
        if data.is_empty() {
            return Err(CryptoError::NullInput);
        }
        for &byte in data {
            for bit in 0..8 {
                self.test_sample((byte >> bit) & 1)?;
            }
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.rct.reset();
        self.apt.reset();
    }
}

impl Default for HealthTest {
    fn default() -> Self {
        Self::with_defaults()
    }
}
