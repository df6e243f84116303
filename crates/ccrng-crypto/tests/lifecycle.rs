//! Library boot, peer synchronisation and power management.

mod common;

use ccrng_crypto::cert::{fips, CertState};
use ccrng_crypto::{CryptoLib, LibConfig};
use ccrng_types::{CertType, CmvpError, CryptoError, FipsError, LibError};
use common::{init_logging, ScriptedTrng};
use std::sync::{Arc, Mutex};

fn config(cert_type: CertType) -> LibConfig {
    LibConfig {
        cert_type,
        ..Default::default()
    }
}

#[test]
fn test_fips_boot_to_approved_generation() {
    init_logging();
    let statuses = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&statuses);
    let mut lib = CryptoLib::init_with_notifier(
        ScriptedTrng::default(),
        config(CertType::Fips),
        Box::new(move |s| sink.lock().unwrap().push(s)),
    )
    .unwrap();

    assert_eq!(lib.fips().state(), CertState::Suspended);
    assert_eq!(lib.fips().trace() & fips::trace::PRNG, fips::trace::PRNG);
    assert!(lib.drbg().unwrap().is_unpredictable());

    let mut out = [0u8; 64];
    assert!(matches!(
        lib.generate(&mut out),
        Err(LibError::Crypto(CryptoError::Cmvp(CmvpError::NotApproved)))
    ));
    assert_eq!(out, [0u8; 64]);

    lib.set_peer_status(true).unwrap();
    lib.generate(&mut out).unwrap();
    assert_ne!(out, [0u8; 64]);

    // A peer failure is recorded but not echoed back to the peer.
    lib.set_peer_status(false).unwrap();
    assert_eq!(lib.fips().error(), Some(FipsError::FromRee));
    assert!(lib.generate(&mut out).is_err());
    assert_eq!(*statuses.lock().unwrap(), vec![Ok(())]);
}

#[test]
fn test_boot_rotates_past_stuck_channel() {
    let hal = ScriptedTrng {
        stuck: 0b0001,
        ..Default::default()
    };
    let mut lib = CryptoLib::init(hal, config(CertType::Chinese)).unwrap();
    assert_eq!(lib.entropy().last_channel(), 0b0010);
    assert_eq!(lib.ch_cert().state(), CertState::Supported);
    lib.generate(&mut [0u8; 32]).unwrap();
}

#[test]
fn test_boot_refused_when_fatal_error_locked() {
    let hal = ScriptedTrng {
        fatal_locked: true,
        ..Default::default()
    };
    assert!(matches!(
        CryptoLib::init(hal, config(CertType::Fips)),
        Err(LibError::FatalErrorLocked)
    ));
}

#[test]
fn test_boot_rejects_bad_config() {
    let mut bad = config(CertType::None);
    bad.entropy.apt_cutoff = bad.entropy.apt_window;
    assert!(matches!(
        CryptoLib::init(ScriptedTrng::default(), bad),
        Err(LibError::Config(_))
    ));
}

#[test]
fn test_secure_disabled_library_refuses_generation() {
    let hal = ScriptedTrng {
        secure_disabled: true,
        ..Default::default()
    };
    let mut lib = CryptoLib::init(hal, config(CertType::Chinese)).unwrap();
    assert!(lib.is_secure_disabled());
    assert_eq!(lib.ch_cert().state(), CertState::NotSupported);
    assert!(matches!(
        lib.generate(&mut [0u8; 16]),
        Err(LibError::SecureDisabled)
    ));
    assert!(matches!(lib.reseed(), Err(LibError::SecureDisabled)));
}

#[test]
fn test_suspend_resume_cycle() {
    let mut lib = CryptoLib::init(ScriptedTrng::default(), config(CertType::None)).unwrap();
    let mut before = [0u8; 32];
    lib.generate(&mut before).unwrap();

    lib.suspend().unwrap();
    assert!(lib.is_suspended());
    assert!(matches!(lib.reseed(), Err(LibError::Suspended)));

    lib.resume().unwrap();
    let mut after = [0u8; 32];
    lib.generate(&mut after).unwrap();
    assert_ne!(before, after);

    let hal = lib.fini();
    assert_eq!((hal.power_downs, hal.power_ups), (1, 1));
}

#[test]
fn test_resume_fails_when_entropy_dies() {
    let mut lib = CryptoLib::init(ScriptedTrng::default(), config(CertType::None)).unwrap();
    lib.suspend().unwrap();
    lib.entropy().with_hal(|hal| hal.stuck = 0b1111);
    assert!(matches!(
        lib.resume(),
        Err(LibError::RndInstantiation(
            CryptoError::EntropyGenerationNotCompleted
        ))
    ));
    assert!(lib.is_suspended());
    assert!(matches!(
        lib.generate(&mut [0u8; 16]),
        Err(LibError::Suspended)
    ));
}
