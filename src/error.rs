//! Unified error types for the FPC1020 platform driver.
//!
//! One `Error` enum per failure class the attach orchestration and the
//! command surface need to distinguish, plus [`HwError`] for what a
//! backend port reports. All variants are `Copy` so they pass through the
//! controller lock and the command dispatcher without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level driver error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A pin configuration, rail or GPIO is missing or unresolvable.
    /// Fatal for attach.
    Config(&'static str),
    /// A dependency is not ready yet. The owning framework retries attach;
    /// this crate never does.
    Unavailable(&'static str),
    /// A rail or pin-select call failed on a direct command.
    Hardware(HwError),
    /// Malformed external input. Rejected before any state is touched.
    InvalidCommand(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration: {msg}"),
            Self::Unavailable(msg) => write!(f, "not ready: {msg}"),
            Self::Hardware(e) => write!(f, "hardware: {e}"),
            Self::InvalidCommand(msg) => write!(f, "invalid command: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

impl Error {
    /// Whether the attach orchestration should try again later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// Kernel-style negative errno, as the attribute surface reports it.
    pub fn errno(&self) -> i32 {
        match self {
            Self::Unavailable(_) => -EDEFER,
            Self::Hardware(HwError::Failed(rc)) if *rc < 0 => *rc,
            Self::Config(_) | Self::Hardware(_) | Self::InvalidCommand(_) => -EINVAL,
        }
    }
}

const EINVAL: i32 = 22;
const EDEFER: i32 = 517;

// ---------------------------------------------------------------------------
// Backend errors
// ---------------------------------------------------------------------------

/// What a pin, rail or IRQ backend reports for a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwError {
    /// The named resource does not exist on this platform.
    Missing,
    /// The backend exists but is not ready yet.
    Deferred,
    /// The call failed with a backend return code.
    Failed(i32),
}

impl fmt::Display for HwError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "resource missing"),
            Self::Deferred => write!(f, "backend deferred"),
            Self::Failed(rc) => write!(f, "call failed (rc={rc})"),
        }
    }
}

impl From<HwError> for Error {
    fn from(e: HwError) -> Self {
        Self::Hardware(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Driver-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
