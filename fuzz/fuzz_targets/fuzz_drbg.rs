#![no_main]
use ccrng_crypto::drbg::{Drbg, DrbgConfig, DrbgState, MAX_REQUEST_BYTES};
use ccrng_crypto::entropy::EntropyInput;
use ccrng_types::CryptoError;
use libfuzzer_sys::fuzz_target;

struct FuzzEntropy<'a>(&'a [u8]);

impl EntropyInput for FuzzEntropy<'_> {
    fn get_entropy(&self, out: &mut [u8]) -> Result<(), CryptoError> {
        if self.0.is_empty() {
            return Err(CryptoError::EntropyGenerationNotCompleted);
        }
        for (o, b) in out.iter_mut().zip(self.0.iter().cycle()) {
            *o = *b;
        }
        Ok(())
    }
}

// Drive the DRBG with an arbitrary operation sequence. It must never
// panic, and output must only be produced while instantiated.
fuzz_target!(|data: &[u8]| {
    let (seed, ops) = data.split_at(data.len().min(48));
    let entropy = FuzzEntropy(seed);
    let mut drbg = Drbg::new(DrbgConfig::default());
    let _ = drbg.instantiate(&entropy, None);

    for op in ops.chunks(8) {
        let arg = op.get(1..).unwrap_or(&[]);
        match op[0] % 6 {
            0 => {
                let len = usize::from(u16::from_le_bytes([op[0], *arg.first().unwrap_or(&0)]));
                let mut out = vec![0u8; len];
                let res = drbg.generate(&mut out);
                if drbg.state() != DrbgState::Instantiated || len > MAX_REQUEST_BYTES {
                    assert!(res.is_err());
                }
                if res.is_err() {
                    assert!(out.iter().all(|&b| b == 0));
                }
            }
            1 => {
                let _ = drbg.reseed(&entropy);
            }
            2 => {
                let _ = drbg.add_additional_input(arg);
            }
            3 => {
                let _ = drbg.enter_kat_mode(arg, &[]);
            }
            4 => drbg.disable_kat_mode(),
            _ => drbg.uninstantiate(),
        }
    }
    drbg.uninstantiate();
});
