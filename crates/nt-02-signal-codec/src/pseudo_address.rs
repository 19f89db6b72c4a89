//! Rotating pseudo device address.
//!
//! Some platforms rotate their low-level radio address every few minutes,
//! which would otherwise make a device unrecognisable between adverts. The
//! pseudo address is an application-level correlation key broadcast in
//! vendor data: random, 48 bits wide to match the collision probability of
//! a real radio address, and rotated on the advertiser's own schedule.
//! Collisions are possible and accepted; they are not corrected.

use std::fmt;
use std::hash::{Hash, Hasher};

use rand::rngs::OsRng;
use rand::RngCore;

/// A 48-bit rotating pseudo address.
///
/// Two addresses are equal iff their numeric values are equal; the byte
/// form exists only for the wire.
#[derive(Debug, Clone, Copy)]
pub struct PseudoAddress {
    value: u64,
    bytes: [u8; 6],
}

impl PseudoAddress {
    /// Generate a fresh address from OS entropy.
    ///
    /// A full 64-bit value is drawn and truncated to the low 48 bits by the
    /// 6-byte little-endian encoding.
    pub fn generate() -> Self {
        Self::from_value(OsRng.next_u64())
    }

    /// Build an address from a numeric value (truncated to 48 bits).
    pub fn from_value(value: u64) -> Self {
        let le = value.to_le_bytes();
        let mut bytes = [0u8; 6];
        bytes.copy_from_slice(&le[..6]);
        Self {
            value: decode(&bytes),
            bytes,
        }
    }

    /// Decode an address from wire bytes, zero-extending little-endian.
    ///
    /// Accepts any slice: advertisers put the address in a vendor data block
    /// whose length is not enforced, so short and oversized payloads both
    /// appear in practice. At most the first eight bytes contribute.
    pub fn from_bytes(data: &[u8]) -> Self {
        let value = decode(data);
        let le = value.to_le_bytes();
        let mut bytes = [0u8; 6];
        bytes.copy_from_slice(&le[..6]);
        Self { value, bytes }
    }

    /// Numeric value (48-bit range when constructed from 6 wire bytes).
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Little-endian wire encoding.
    pub fn bytes(&self) -> [u8; 6] {
        self.bytes
    }
}

/// Zero-extend up to eight little-endian bytes into a u64.
fn decode(data: &[u8]) -> u64 {
    let mut le = [0u8; 8];
    let take = data.len().min(8);
    le[..take].copy_from_slice(&data[..take]);
    u64::from_le_bytes(le)
}

impl PartialEq for PseudoAddress {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for PseudoAddress {}

impl Hash for PseudoAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Display for PseudoAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.bytes))
    }
}
