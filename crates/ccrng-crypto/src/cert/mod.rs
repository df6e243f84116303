//! Certification-gated approval state machines.
//!
//! One [`ApprovalState`] exists per certification scheme ([`Fips`] and
//! [`ChineseCert`]). It is constructed explicitly, shared by `Arc`, and
//! holds `{flags, sticky error, trace}` behind its own mutex:
//!
//! ```text
//! NotSupported → {Supported, Error}
//! Supported    → {Error, Suspended}
//! Suspended    → {Approved, NonApproved}
//! Error          (absorbing)
//! ```
//!
//! Gated entry points consult [`ApprovalState::guard`] before doing work.

pub mod chinese;
pub mod fips;

pub use chinese::{ChCertState, ChineseCert};
pub use fips::{Fips, FipsState};

use ccrng_types::CmvpError;
use log::{debug, error};
use parking_lot::Mutex;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// State flag bits. `NotSupported` is the absence of [`StateFlags::SUPPORTED`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StateFlags(u32);

impl StateFlags {
    pub const EMPTY: StateFlags = StateFlags(0);
    /// Reserved; only [`ApprovalState::set_error`] may enter the error state.
    pub const ERROR: StateFlags = StateFlags(0x1);
    pub const SUPPORTED: StateFlags = StateFlags(0x2);
    /// FIPS only.
    pub const SUSPENDED: StateFlags = StateFlags(0x4);
    pub const APPROVED: StateFlags = StateFlags(0x8);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn from_bits(bits: u32) -> StateFlags {
        StateFlags(bits)
    }

    pub const fn contains(self, other: StateFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: StateFlags) -> StateFlags {
        StateFlags(self.0 | other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for StateFlags {
    type Output = StateFlags;

    fn bitor(self, rhs: StateFlags) -> StateFlags {
        self.union(rhs)
    }
}

/// Effective state of a scheme, with `Error` dominating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertState {
    NotSupported,
    Supported,
    /// FIPS only.
    Suspended,
    Error,
}

/// How a failed guard is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardPolicy {
    /// The operation is refused with `NotApproved`.
    Mandatory,
    /// The operation is silently skipped.
    Advisory,
}

/// Outcome of a passed or advisory guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Proceed,
    Skip,
}

/// Requested crypto usage after the power-up self-tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoUsage {
    Approved,
    NonApproved,
}

/// Callback informing the peer environment of the module status:
/// `Ok(())` after successful self-tests, `Err(code)` when an error is
/// recorded.
pub type PeerNotifier<E> = Box<dyn Fn(Result<(), E>) + Send + Sync>;

/// Static description of a certification scheme.
pub trait CertScheme: Send + Sync + 'static {
    /// Scheme name for logs.
    const NAME: &'static str;
    /// Whether the scheme has the SUSPENDED flag.
    const HAS_SUSPEND: bool;
    /// Encoding of the APPROVED flag in [`ApprovalState::raw_flags`].
    const APPROVED_BIT: u32;

    /// Error codes recorded by this scheme.
    type Error: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static;

    /// Flags that [`ApprovalState::revert_state`] accepts.
    fn revertible(flags: StateFlags) -> bool;

    /// Whether recording `err` should notify the peer.
    fn notifies_peer(_err: &Self::Error) -> bool {
        false
    }
}

struct Inner<E> {
    flags: StateFlags,
    error: Option<E>,
    trace: u32,
}

/// Lock-guarded approval state of one certification scheme.
pub struct ApprovalState<S: CertScheme> {
    inner: Mutex<Inner<S::Error>>,
    notifier: Option<PeerNotifier<S::Error>>,
    _scheme: PhantomData<S>,
}

impl<S: CertScheme> ApprovalState<S> {
    /// Create a state with APPROVED set, no error and an empty trace.
    pub fn new() -> Self {
        ApprovalState {
            inner: Mutex::new(Inner {
                flags: StateFlags::APPROVED,
                error: None,
                trace: 0,
            }),
            notifier: None,
            _scheme: PhantomData,
        }
    }

    /// Create a state that reports status changes through `notifier`.
    pub fn with_notifier(notifier: PeerNotifier<S::Error>) -> Self {
        ApprovalState {
            notifier: Some(notifier),
            ..Self::new()
        }
    }

    /// Convenience for `Arc::new(Self::new())`.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn settable() -> StateFlags {
        if S::HAS_SUSPEND {
            StateFlags::SUPPORTED | StateFlags::SUSPENDED | StateFlags::APPROVED
        } else {
            StateFlags::SUPPORTED | StateFlags::APPROVED
        }
    }

    /// OR `flags` into the state.
    pub fn set_state(&self, flags: StateFlags) -> Result<(), CmvpError> {
        if flags.contains(StateFlags::ERROR) || !Self::settable().contains(flags) {
            return Err(CmvpError::InvalidStateFlags(flags.bits()));
        }
        let mut inner = self.inner.lock();
        inner.flags = inner.flags | flags;
        debug!("{}: set state {:#x} -> {:#x}", S::NAME, flags.bits(), inner.flags.bits());
        Ok(())
    }

    /// Clear `flags` from the state.
    pub fn revert_state(&self, flags: StateFlags) -> Result<(), CmvpError> {
        if !S::revertible(flags) {
            return Err(CmvpError::InvalidRevert(flags.bits()));
        }
        let mut inner = self.inner.lock();
        inner.flags = StateFlags(inner.flags.0 & !flags.0);
        debug!("{}: revert state {:#x} -> {:#x}", S::NAME, flags.bits(), inner.flags.bits());
        Ok(())
    }

    /// Record `code` as the scheme's error. The first error wins.
    pub fn set_error(&self, code: S::Error) -> Result<(), CmvpError> {
        {
            let mut inner = self.inner.lock();
            if inner.error.is_some() {
                return Err(CmvpError::ErrorAlreadyRecorded);
            }
            inner.error = Some(code);
        }
        error!("{}: entering error state: {code}", S::NAME);
        if S::notifies_peer(&code) {
            self.notify_peer(Err(code));
        }
        Ok(())
    }

    /// OR a completed self-test group into the trace.
    pub fn set_trace(&self, test: u32) {
        self.inner.lock().trace |= test;
    }

    /// Effective state: `Error > Suspended > Supported > NotSupported`.
    pub fn state(&self) -> CertState {
        let inner = self.inner.lock();
        if inner.error.is_some() {
            CertState::Error
        } else if S::HAS_SUSPEND && inner.flags.contains(StateFlags::SUSPENDED) {
            CertState::Suspended
        } else if inner.flags.contains(StateFlags::SUPPORTED) {
            CertState::Supported
        } else {
            CertState::NotSupported
        }
    }

    pub fn error(&self) -> Option<S::Error> {
        self.inner.lock().error
    }

    pub fn trace(&self) -> u32 {
        self.inner.lock().trace
    }

    pub fn flags(&self) -> StateFlags {
        self.inner.lock().flags
    }

    /// Flags in the scheme's register encoding, with the error bit set
    /// when an error is recorded.
    pub fn raw_flags(&self) -> u32 {
        let inner = self.inner.lock();
        let mut raw = 0;
        if inner.error.is_some() {
            raw |= StateFlags::ERROR.bits();
        }
        if inner.flags.contains(StateFlags::SUPPORTED) {
            raw |= StateFlags::SUPPORTED.bits();
        }
        if S::HAS_SUSPEND && inner.flags.contains(StateFlags::SUSPENDED) {
            raw |= StateFlags::SUSPENDED.bits();
        }
        if inner.flags.contains(StateFlags::APPROVED) {
            raw |= S::APPROVED_BIT;
        }
        raw
    }

    /// Check that no error is recorded and `required` flags are all set.
    pub fn guard(
        &self,
        required: StateFlags,
        policy: GuardPolicy,
    ) -> Result<GuardOutcome, CmvpError> {
        let pass = {
            let inner = self.inner.lock();
            inner.error.is_none() && inner.flags.contains(required)
        };
        match (pass, policy) {
            (true, _) => Ok(GuardOutcome::Proceed),
            (false, GuardPolicy::Advisory) => Ok(GuardOutcome::Skip),
            (false, GuardPolicy::Mandatory) => Err(CmvpError::NotApproved),
        }
    }

    /// Mandatory guard on APPROVED.
    pub fn check_approved(&self) -> Result<(), CmvpError> {
        self.guard(StateFlags::APPROVED, GuardPolicy::Mandatory)
            .map(|_| ())
    }

    /// True when an advisory APPROVED guard would skip the operation.
    pub fn skip_unless_approved(&self) -> bool {
        matches!(
            self.guard(StateFlags::APPROVED, GuardPolicy::Advisory),
            Ok(GuardOutcome::Skip)
        )
    }

    /// Conditional self-tests run only while the scheme is supported.
    pub fn conditional_tests_enabled(&self) -> bool {
        matches!(
            self.guard(StateFlags::SUPPORTED, GuardPolicy::Advisory),
            Ok(GuardOutcome::Proceed)
        )
    }

    /// SUPPORTED is set, regardless of any recorded error.
    pub fn is_supported(&self) -> bool {
        self.inner.lock().flags.contains(StateFlags::SUPPORTED)
    }

    /// Select approved or non-approved usage after the power-up tests.
    ///
    /// Schemes with a suspended state require it to be current.
    pub fn crypto_usage_state_set(&self, usage: CryptoUsage) -> Result<(), CmvpError> {
        if S::HAS_SUSPEND && self.state() != CertState::Suspended {
            return Err(CmvpError::NotSuspended);
        }
        match usage {
            CryptoUsage::Approved => self.set_state(StateFlags::APPROVED),
            CryptoUsage::NonApproved => self.revert_state(StateFlags::APPROVED),
        }
    }

    /// Forward a status to the peer notifier, if one is installed.
    pub fn notify_peer(&self, status: Result<(), S::Error>) {
        if let Some(notify) = &self.notifier {
            debug!("{}: notifying peer: {status:?}", S::NAME);
            notify(status);
        }
    }
}

impl<S: CertScheme> Default for ApprovalState<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CertScheme> fmt::Debug for ApprovalState<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("ApprovalState")
            .field("scheme", &S::NAME)
            .field("flags", &inner.flags)
            .field("error", &inner.error)
            .field("trace", &inner.trace)
            .finish()
    }
}
