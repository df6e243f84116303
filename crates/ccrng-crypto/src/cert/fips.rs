//! FIPS 140-3 approval scheme.

use super::{ApprovalState, CertScheme, StateFlags};
use ccrng_types::{CmvpError, FipsError};

/// Trace bits of the FIPS power-up self-test groups.
pub mod trace {
    pub const AES: u32 = 0x1;
    pub const HASH: u32 = 0x8;
    pub const HMAC: u32 = 0x10;
    pub const PRNG: u32 = 0x200;
    /// Set when the continuous test passes on a supported module, not at
    /// power-up.
    pub const PRNG_CONT: u32 = 0x1000;
}

/// The FIPS scheme marker.
#[derive(Debug, Clone, Copy)]
pub struct Fips;

impl CertScheme for Fips {
    const NAME: &'static str = "fips";
    const HAS_SUSPEND: bool = true;
    const APPROVED_BIT: u32 = 0x8;

    type Error = FipsError;

    fn revertible(flags: StateFlags) -> bool {
        flags == StateFlags::SUSPENDED || flags == StateFlags::APPROVED
    }

    fn notifies_peer(err: &FipsError) -> bool {
        // Errors reported by the peer are not echoed back.
        *err != FipsError::FromRee
    }
}

/// FIPS approval state.
pub type FipsState = ApprovalState<Fips>;

impl ApprovalState<Fips> {
    /// Apply the status reported by the peer environment.
    ///
    /// `true` leaves the suspended state and approves crypto usage;
    /// `false` records [`FipsError::FromRee`].
    pub fn set_peer_status(&self, ok: bool) -> Result<(), CmvpError> {
        if ok {
            self.revert_state(StateFlags::SUSPENDED)?;
            self.set_state(StateFlags::APPROVED)
        } else {
            self.set_error(FipsError::FromRee)
        }
    }
}
