//! Chinese commercial cryptography approval scheme.

use super::{ApprovalState, CertScheme, StateFlags};
use ccrng_types::ChCertError;

/// Trace bits of the Chinese power-up self-test groups.
pub mod trace {
    pub const SM4: u32 = 0x1;
    pub const SM3: u32 = 0x2;
}

/// The Chinese certification scheme marker.
#[derive(Debug, Clone, Copy)]
pub struct ChineseCert;

impl CertScheme for ChineseCert {
    const NAME: &'static str = "chinese cert";
    const HAS_SUSPEND: bool = false;
    const APPROVED_BIT: u32 = 0x4;

    type Error = ChCertError;

    fn revertible(flags: StateFlags) -> bool {
        flags == StateFlags::APPROVED
    }
}

/// Chinese certification approval state.
pub type ChCertState = ApprovalState<ChineseCert>;
