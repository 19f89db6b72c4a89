//! Target identifiers for observed devices.

use std::fmt;

use uuid::Uuid;

/// Opaque, stable handle for one logical device record.
///
/// Derived from the transport's logical device handle when one exists, or
/// generated randomly for records created without an observation (e.g. a
/// peer that announced itself only by writing its identity over a channel).
///
/// The identifier is ephemeral by design: it is never persisted and carries
/// no meaning beyond equality within the current process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetIdentifier(String);

impl TargetIdentifier {
    /// Derive an identifier from a transport-level logical handle.
    pub fn from_handle(handle: &str) -> Self {
        Self(handle.to_string())
    }

    /// Generate a fresh random identifier for a record with no handle.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The identifier value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
