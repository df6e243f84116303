//! Shared helpers for the integration tests.

#![allow(dead_code)]

use ccrng_crypto::entropy::hal::{EHR_WORDS, STATUS_EHR_VALID};
use ccrng_crypto::entropy::{Platform, TrngHal};
use ccrng_types::CryptoError;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Balanced bit patterns with short runs, read LSB first.
const PATTERNS: [u32; 3] = [0x5555_5555, 0x3333_3333, 0x0F0F_0F0F];

/// Deterministic TRNG whose healthy channels cycle through balanced
/// patterns and whose stuck channels emit all-ones words.
#[derive(Debug, Default)]
pub struct ScriptedTrng {
    /// Mask of channels that fail the repetition count test.
    pub stuck: u32,
    pub fatal_locked: bool,
    pub secure_disabled: bool,
    pub channel: u32,
    pub channels_used: Vec<u32>,
    pub power_downs: usize,
    pub power_ups: usize,
    /// EHR reads so far, across all channels.
    pub reads: usize,
}

impl TrngHal for ScriptedTrng {
    fn enable_clock(&mut self) {}

    fn disable_clock(&mut self) {}

    fn set_sub_sampling(&mut self, _ratio: u32) {}

    fn enable_channel(&mut self, channel: u32) {
        self.channel = channel;
        self.channels_used.push(channel);
    }

    fn disable_channel(&mut self) {
        self.channel = 0;
    }

    fn clear_completion(&mut self) {}

    fn wait_for_completion(&mut self) -> Result<u32, CryptoError> {
        if self.channel == 0 {
            return Err(CryptoError::EntropyWaitFailed);
        }
        Ok(STATUS_EHR_VALID)
    }

    fn read_ehr(&mut self, words: &mut [u32; EHR_WORDS]) {
        let word = if self.stuck & self.channel != 0 {
            0xFFFF_FFFF
        } else {
            PATTERNS[self.reads % PATTERNS.len()]
        };
        self.reads += 1;
        words.fill(word);
    }
}

impl Platform for ScriptedTrng {
    fn fatal_error_locked(&self) -> bool {
        self.fatal_locked
    }

    fn secure_disabled(&self) -> bool {
        self.secure_disabled
    }

    fn power_down(&mut self) {
        self.power_downs += 1;
    }

    fn power_up(&mut self) {
        self.power_ups += 1;
    }
}
