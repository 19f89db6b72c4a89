//! Platform guess for observed devices.
//!
//! Different platforms need different interaction procedures, so every
//! record carries a best guess at the peer's platform. Guesses start
//! provisional and are confirmed or replaced as the transport learns more;
//! devices that match a reject pattern enter `Ignore` with an exponential
//! backoff so they are retried occasionally but never hammered.

use std::fmt;
use std::time::Duration;

/// Best current guess at a device's platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformGuess {
    /// Looks like Android, awaiting confirmation.
    AndroidProvisional,
    Android,
    /// Looks like the other platform, awaiting confirmation.
    IosProvisional,
    Ios,
    /// Do not interact while the ignore window is armed.
    Ignore,
    /// Identity obtained via sharing only; never directly connected.
    Shared,
    Unknown,
}

impl PlatformGuess {
    /// A confirmed platform that cross-record propagation may copy onto
    /// provisional records.
    pub fn is_definitive(&self) -> bool {
        matches!(self, Self::Android | Self::Ios)
    }

    /// States that propagation may overwrite with a definitive guess.
    pub fn is_provisional_or_unknown(&self) -> bool {
        matches!(
            self,
            Self::Unknown | Self::AndroidProvisional | Self::IosProvisional
        )
    }
}

impl fmt::Display for PlatformGuess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::AndroidProvisional => "android?",
            Self::Android => "android",
            Self::IosProvisional => "ios?",
            Self::Ios => "ios",
            Self::Ignore => "ignore",
            Self::Shared => "shared",
            Self::Unknown => "unknown",
        };
        write!(f, "{label}")
    }
}

/// Backoff armed on first entry into `Ignore`.
pub const INITIAL_IGNORE_BACKOFF: Duration = Duration::from_secs(60);

/// Backoff stops growing once it reaches this value.
pub const IGNORE_BACKOFF_CAP: Duration = Duration::from_secs(3 * 60);

/// Grow an armed backoff by the 1.2 factor with integer rounding.
///
/// Integer multiply-and-round on whole seconds: no float drift, and the
/// growth sequence stays 60, 72, 86, 103, 124, 149, 179, 215.
pub fn next_ignore_backoff(current: Duration) -> Duration {
    Duration::from_secs((current.as_secs().saturating_mul(12) + 5) / 10)
}
