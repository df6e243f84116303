//! Library boot, shutdown and power management.
//!
//! [`CryptoLib::init`] brings the library up in a fixed order:
//!
//! 1. Refuse to start when the platform's fatal-error lock is set
//! 2. Stop after the entropy source is built when secure disable is set
//! 3. FIPS: mark supported and run the power-up self-tests
//! 4. Run the entropy startup test and instantiate the library DRBG
//! 5. Chinese cert: mark supported, run its self-tests, approve usage
//! 6. FIPS: suspend with non-approved usage until the peer reports OK

use crate::cert::{
    ApprovalState, ChCertState, CryptoUsage, FipsState, PeerNotifier, StateFlags,
};
use crate::config::LibConfig;
use crate::drbg::{Drbg, DrbgState};
use crate::entropy::{EntropySource, Platform};
use crate::kat;
use ccrng_types::{CertType, CryptoError, FipsError, LibError};
use log::{debug, info, warn};
use std::sync::Arc;

/// An initialised library instance.
pub struct CryptoLib<P: Platform> {
    cert_type: CertType,
    fips: Arc<FipsState>,
    ch_cert: Arc<ChCertState>,
    entropy: EntropySource<P>,
    /// `None` when secure disable is set.
    drbg: Option<Drbg>,
    suspended: bool,
}

impl<P: Platform> std::fmt::Debug for CryptoLib<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoLib")
            .field("cert_type", &self.cert_type)
            .field("fips", &self.fips.state())
            .field("ch_cert", &self.ch_cert.state())
            .field("drbg", &self.drbg)
            .field("suspended", &self.suspended)
            .finish_non_exhaustive()
    }
}

impl<P: Platform> CryptoLib<P> {
    /// Initialise the library on `platform`.
    pub fn init(platform: P, config: LibConfig) -> Result<Self, LibError> {
        Self::init_with_state(platform, config, FipsState::shared())
    }

    /// Initialise the library, reporting FIPS status changes to the peer
    /// environment through `notifier`.
    pub fn init_with_notifier(
        platform: P,
        config: LibConfig,
        notifier: PeerNotifier<FipsError>,
    ) -> Result<Self, LibError> {
        Self::init_with_state(platform, config, Arc::new(FipsState::with_notifier(notifier)))
    }

    fn init_with_state(
        platform: P,
        config: LibConfig,
        fips: Arc<FipsState>,
    ) -> Result<Self, LibError> {
        config.validate()?;
        if platform.fatal_error_locked() {
            warn!("lib: fatal error lock is set, refusing to start");
            return Err(LibError::FatalErrorLocked);
        }
        let secure_disabled = platform.secure_disabled();

        let mut lib = CryptoLib {
            cert_type: config.cert_type,
            fips,
            ch_cert: Arc::new(ApprovalState::new()),
            entropy: EntropySource::new(platform, config.entropy.clone())?,
            drbg: None,
            suspended: false,
        };
        if secure_disabled {
            info!("lib: secure disable is set, random generation and certification skipped");
            return Ok(lib);
        }

        if lib.cert_type == CertType::Fips {
            lib.fips.set_state(StateFlags::SUPPORTED)?;
            kat::run_fips_power_up(&lib.fips)?;
        }

        lib.entropy
            .startup_test()
            .map_err(LibError::RndInstantiation)?;
        let mut drbg = if lib.cert_type == CertType::Fips {
            Drbg::with_approval(config.drbg, Arc::clone(&lib.fips))
        } else {
            Drbg::new(config.drbg)
        };
        drbg.instantiate(&lib.entropy, None)
            .map_err(LibError::RndInstantiation)?;
        lib.drbg = Some(drbg);

        match lib.cert_type {
            CertType::Chinese => {
                lib.ch_cert.set_state(StateFlags::SUPPORTED)?;
                kat::run_ch_cert_power_up(&lib.ch_cert)?;
                lib.ch_cert.crypto_usage_state_set(CryptoUsage::Approved)?;
            }
            CertType::Fips => {
                lib.fips.set_state(StateFlags::SUSPENDED)?;
                lib.fips.crypto_usage_state_set(CryptoUsage::NonApproved)?;
            }
            CertType::None => {}
        }

        info!(
            "lib: initialised ({:?}, fips {:?}, chinese cert {:?})",
            lib.cert_type,
            lib.fips.state(),
            lib.ch_cert.state()
        );
        Ok(lib)
    }

    /// Uninstantiate the library DRBG and release the platform.
    pub fn fini(mut self) -> P {
        if let Some(drbg) = self.drbg.as_mut() {
            drbg.uninstantiate();
        }
        info!("lib: finalised");
        self.entropy.into_hal()
    }

    /// Fill `out` from the library DRBG, reseeding once when the reseed
    /// counter is exhausted.
    pub fn generate(&mut self, out: &mut [u8]) -> Result<(), LibError> {
        if self.suspended {
            return Err(LibError::Suspended);
        }
        let drbg = self.drbg.as_mut().ok_or(LibError::SecureDisabled)?;
        match drbg.generate(out) {
            Err(CryptoError::DrbgReseedRequired) => {
                debug!("lib: reseed counter exhausted, reseeding");
                drbg.reseed(&self.entropy)?;
                drbg.generate(out)?;
                Ok(())
            }
            res => Ok(res?),
        }
    }

    /// [`CryptoLib::generate`] with additional input mixed into this request.
    pub fn generate_with_additional_input(
        &mut self,
        additional_input: &[u8],
        out: &mut [u8],
    ) -> Result<(), LibError> {
        if self.suspended {
            return Err(LibError::Suspended);
        }
        self.drbg
            .as_mut()
            .ok_or(LibError::SecureDisabled)?
            .add_additional_input(additional_input)?;
        self.generate(out)
    }

    /// Reseed the library DRBG from the entropy source.
    pub fn reseed(&mut self) -> Result<(), LibError> {
        if self.suspended {
            return Err(LibError::Suspended);
        }
        let drbg = self.drbg.as_mut().ok_or(LibError::SecureDisabled)?;
        drbg.reseed(&self.entropy)?;
        Ok(())
    }

    /// Power the platform down. Random generation is refused until
    /// [`CryptoLib::resume`].
    pub fn suspend(&mut self) -> Result<(), LibError> {
        if self.suspended {
            return Err(LibError::Suspended);
        }
        self.entropy.hal_mut().power_down();
        self.suspended = true;
        info!("lib: suspended");
        Ok(())
    }

    /// Power the platform up, re-run the entropy startup test and reseed
    /// the library DRBG. The library stays suspended if either fails.
    pub fn resume(&mut self) -> Result<(), LibError> {
        if !self.suspended {
            return Err(LibError::NotSuspended);
        }
        self.entropy.hal_mut().power_up();

        if let Some(drbg) = self.drbg.as_mut() {
            self.entropy
                .startup_test()
                .map_err(LibError::RndInstantiation)?;
            if drbg.state() == DrbgState::Instantiated {
                drbg.reseed(&self.entropy)?;
            }
        }
        self.suspended = false;
        info!("lib: resumed");
        Ok(())
    }

    /// Apply the FIPS status reported by the peer environment.
    pub fn set_peer_status(&self, ok: bool) -> Result<(), LibError> {
        self.fips.set_peer_status(ok)?;
        Ok(())
    }

    pub fn cert_type(&self) -> CertType {
        self.cert_type
    }

    pub fn fips(&self) -> &Arc<FipsState> {
        &self.fips
    }

    pub fn ch_cert(&self) -> &Arc<ChCertState> {
        &self.ch_cert
    }

    pub fn entropy(&self) -> &EntropySource<P> {
        &self.entropy
    }

    pub fn drbg(&self) -> Option<&Drbg> {
        self.drbg.as_ref()
    }

    pub fn is_secure_disabled(&self) -> bool {
        self.drbg.is_none()
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::{chinese, fips, CertState};
    use crate::entropy::hal::mock::MockTrng;
    use ccrng_types::CmvpError;
    use std::sync::Mutex;

    fn config(cert_type: CertType) -> LibConfig {
        LibConfig {
            cert_type,
            ..Default::default()
        }
    }

    #[test]
    fn test_init_without_certification() {
        let mut lib = CryptoLib::init(MockTrng::default(), config(CertType::None)).unwrap();
        assert_eq!(lib.fips().state(), CertState::NotSupported);
        assert_eq!(lib.ch_cert().state(), CertState::NotSupported);
        assert!(lib.drbg().unwrap().is_unpredictable());

        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        lib.generate(&mut a).unwrap();
        lib.generate(&mut b).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_init_fips_waits_for_peer() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut lib = CryptoLib::init_with_notifier(
            MockTrng::default(),
            config(CertType::Fips),
            Box::new(move |s| sink.lock().unwrap().push(s)),
        )
        .unwrap();

        assert_eq!(lib.fips().state(), CertState::Suspended);
        assert_eq!(
            lib.fips().trace(),
            fips::trace::AES | fips::trace::HASH | fips::trace::HMAC | fips::trace::PRNG
        );
        assert_eq!(*seen.lock().unwrap(), vec![Ok(())]);

        let mut out = [0u8; 16];
        assert!(matches!(
            lib.generate(&mut out),
            Err(LibError::Crypto(CryptoError::Cmvp(CmvpError::NotApproved)))
        ));

        lib.set_peer_status(true).unwrap();
        assert_eq!(lib.fips().state(), CertState::Supported);
        lib.generate(&mut out).unwrap();
        assert_ne!(lib.fips().trace() & fips::trace::PRNG_CONT, 0);
    }

    #[test]
    fn test_peer_failure_blocks_generation() {
        let mut lib = CryptoLib::init(MockTrng::default(), config(CertType::Fips)).unwrap();
        lib.set_peer_status(false).unwrap();
        assert_eq!(lib.fips().error(), Some(FipsError::FromRee));
        // Error is sticky: a later OK cannot lift it.
        assert!(lib.set_peer_status(true).is_ok());
        assert_eq!(lib.fips().state(), CertState::Error);
        assert!(lib.generate(&mut [0u8; 16]).is_err());
    }

    #[test]
    fn test_init_chinese_cert() {
        let mut lib = CryptoLib::init(MockTrng::default(), config(CertType::Chinese)).unwrap();
        assert_eq!(lib.ch_cert().state(), CertState::Supported);
        assert_eq!(
            lib.ch_cert().trace(),
            chinese::trace::SM4 | chinese::trace::SM3
        );
        assert!(lib.ch_cert().check_approved().is_ok());
        assert_eq!(lib.fips().state(), CertState::NotSupported);
        lib.generate(&mut [0u8; 64]).unwrap();
    }

    #[test]
    fn test_init_fatal_error_locked() {
        let hal = MockTrng {
            fatal_locked: true,
            ..Default::default()
        };
        assert!(matches!(
            CryptoLib::init(hal, LibConfig::default()),
            Err(LibError::FatalErrorLocked)
        ));
    }

    #[test]
    fn test_init_secure_disabled() {
        let hal = MockTrng {
            secure_disabled: true,
            ..Default::default()
        };
        let mut lib = CryptoLib::init(hal, config(CertType::Fips)).unwrap();
        assert!(lib.is_secure_disabled());
        assert_eq!(lib.fips().trace(), 0);
        assert!(matches!(
            lib.generate(&mut [0u8; 16]),
            Err(LibError::SecureDisabled)
        ));
    }

    #[test]
    fn test_init_entropy_failure() {
        let hal = MockTrng {
            bad_channels: 0b1111,
            ..Default::default()
        };
        assert!(matches!(
            CryptoLib::init(hal, LibConfig::default()),
            Err(LibError::RndInstantiation(
                CryptoError::EntropyGenerationNotCompleted
            ))
        ));
    }

    #[test]
    fn test_suspend_resume() {
        let mut lib = CryptoLib::init(MockTrng::default(), LibConfig::default()).unwrap();
        lib.generate(&mut [0u8; 16]).unwrap();

        lib.suspend().unwrap();
        assert!(matches!(lib.suspend(), Err(LibError::Suspended)));
        assert!(matches!(
            lib.generate(&mut [0u8; 16]),
            Err(LibError::Suspended)
        ));

        lib.resume().unwrap();
        assert!(matches!(lib.resume(), Err(LibError::NotSuspended)));
        assert_eq!(lib.drbg().unwrap().reseed_counter(), 1);
        lib.generate(&mut [0u8; 16]).unwrap();

        let hal = lib.fini();
        assert_eq!(hal.power_cycles, (1, 1));
    }

    #[test]
    fn test_generate_reseeds_when_exhausted() {
        let mut lib = CryptoLib::init(MockTrng::default(), LibConfig::default()).unwrap();
        lib.drbg
            .as_mut()
            .unwrap()
            .set_reseed_counter(crate::drbg::MAX_RESEED_COUNTER);
        lib.generate(&mut [0u8; 16]).unwrap();
        assert_eq!(lib.drbg().unwrap().reseed_counter(), 2);
    }

    #[test]
    fn test_generate_with_additional_input() {
        let mut lib = CryptoLib::init(MockTrng::default(), LibConfig::default()).unwrap();
        let mut out = [0u8; 32];
        lib.generate_with_additional_input(&[0xA5; 16], &mut out).unwrap();
        assert!(lib
            .generate_with_additional_input(&[0xA5; 5], &mut out)
            .is_err());
    }
}
