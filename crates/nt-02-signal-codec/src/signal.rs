//! Channel signal data codec.
//!
//! Three fixed wire shapes share a one-byte leading action code; all
//! multi-byte integers are little-endian:
//!
//! | action | layout after the action byte |
//! |--------|------------------------------|
//! | 1 write-proximity        | `i16` proximity value |
//! | 2 write-identity         | `u16` length N, then N payload bytes |
//! | 3 write-identity-sharing | `i16` proximity, `u16` length N, N bytes |
//!
//! Decoders validate the action byte and the exact length before extracting
//! fields and return `None` on any mismatch - corrupted and partially
//! received channel writes are routine, not exceptional.

use shared_types::{Data, IdentityPayload, PayloadSharingData, Proximity};

/// Action code: peer reports a proximity reading to self.
pub const ACTION_WRITE_PROXIMITY: u8 = 1;
/// Action code: peer reports its identity payload.
pub const ACTION_WRITE_IDENTITY: u8 = 2;
/// Action code: peer reports a proximity value plus a bundle of *other*
/// identities it has seen.
pub const ACTION_WRITE_IDENTITY_SHARING: u8 = 3;

/// Signal data bundle kinds, detected from the action byte alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalDataKind {
    Proximity,
    Identity,
    IdentitySharing,
    Unknown,
}

/// Inspect only the action byte; empty input is `Unknown`.
pub fn detect(data: &[u8]) -> SignalDataKind {
    match data.first() {
        Some(&ACTION_WRITE_PROXIMITY) => SignalDataKind::Proximity,
        Some(&ACTION_WRITE_IDENTITY) => SignalDataKind::Identity,
        Some(&ACTION_WRITE_IDENTITY_SHARING) => SignalDataKind::IdentitySharing,
        _ => SignalDataKind::Unknown,
    }
}

/// Encode a write-proximity bundle: `[action][i16 proximity]`.
pub fn encode_write_proximity(proximity: Proximity) -> Data {
    let mut bytes = Vec::with_capacity(3);
    bytes.push(ACTION_WRITE_PROXIMITY);
    bytes.extend_from_slice(&proximity.0.to_le_bytes());
    Data(bytes)
}

/// Decode a write-proximity bundle; `None` unless the action code matches
/// and the length is exactly three bytes.
pub fn decode_write_proximity(data: &[u8]) -> Option<Proximity> {
    if detect(data) != SignalDataKind::Proximity {
        return None;
    }
    if data.len() != 3 {
        return None;
    }
    int16(data, 1).map(Proximity)
}

/// Encode a write-identity bundle: `[action][u16 length][payload]`.
pub fn encode_write_identity(payload: &IdentityPayload) -> Data {
    let mut bytes = Vec::with_capacity(3 + payload.len());
    bytes.push(ACTION_WRITE_IDENTITY);
    bytes.extend_from_slice(&(payload.len() as u16).to_le_bytes());
    bytes.extend_from_slice(payload.as_bytes());
    Data(bytes)
}

/// Decode a write-identity bundle; `None` unless the declared length matches
/// the bytes actually present.
pub fn decode_write_identity(data: &[u8]) -> Option<IdentityPayload> {
    if detect(data) != SignalDataKind::Identity {
        return None;
    }
    if data.len() < 3 {
        return None;
    }
    let count = uint16(data, 1)? as usize;
    if data.len() != 3 + count {
        return None;
    }
    Some(IdentityPayload::new(data[3..].to_vec()))
}

/// Encode a write-identity-sharing bundle:
/// `[action][i16 proximity][u16 length][payload]`.
pub fn encode_write_identity_sharing(sharing: &PayloadSharingData) -> Data {
    let mut bytes = Vec::with_capacity(5 + sharing.data.len());
    bytes.push(ACTION_WRITE_IDENTITY_SHARING);
    bytes.extend_from_slice(&sharing.proximity.0.to_le_bytes());
    bytes.extend_from_slice(&(sharing.data.len() as u16).to_le_bytes());
    bytes.extend_from_slice(sharing.data.as_bytes());
    Data(bytes)
}

/// Decode a write-identity-sharing bundle; `None` unless the declared
/// length matches the bytes actually present.
pub fn decode_write_identity_sharing(data: &[u8]) -> Option<PayloadSharingData> {
    if detect(data) != SignalDataKind::IdentitySharing {
        return None;
    }
    if data.len() < 5 {
        return None;
    }
    let proximity = int16(data, 1)?;
    let count = uint16(data, 3)? as usize;
    if data.len() != 5 + count {
        return None;
    }
    Some(PayloadSharingData::new(
        Proximity(proximity),
        Data(data[5..].to_vec()),
    ))
}

fn int16(data: &[u8], index: usize) -> Option<i16> {
    if index + 2 > data.len() {
        return None;
    }
    Some(i16::from_le_bytes([data[index], data[index + 1]]))
}

fn uint16(data: &[u8], index: usize) -> Option<u16> {
    if index + 2 > data.len() {
        return None;
    }
    Some(u16::from_le_bytes([data[index], data[index + 1]]))
}
