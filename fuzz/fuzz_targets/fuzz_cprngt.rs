#![no_main]
use ccrng_crypto::drbg::cprngt::{check, BLOCK_LEN};
use ccrng_types::CryptoError;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < BLOCK_LEN {
        return;
    }
    let (head, blocks) = data.split_at(BLOCK_LEN);
    let mut prev = [0u8; BLOCK_LEN];
    prev.copy_from_slice(head);

    let repeated = std::iter::once(head)
        .chain(blocks.chunks_exact(BLOCK_LEN))
        .collect::<Vec<_>>()
        .windows(2)
        .any(|w| w[0] == w[1]);
    match check(&prev, blocks) {
        Ok(()) => assert!(!repeated),
        Err(CryptoError::DrbgContinuousTestFail) => assert!(repeated),
        Err(CryptoError::InvalidArg) => {
            assert!(blocks.is_empty() || blocks.len() % BLOCK_LEN != 0)
        }
        Err(e) => panic!("unexpected error {e:?}"),
    }
});
