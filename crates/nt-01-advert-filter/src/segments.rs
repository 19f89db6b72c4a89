//! Structured advert segment types.

use std::fmt;

use shared_types::Data;

/// Advert segment type codes.
///
/// Only the codes observed in real captures are named; everything else maps
/// to [`SegmentType::Unknown`] rather than an error, because new assigned
/// numbers appear on the air long before parsers learn about them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentType {
    Unknown,
    ServiceUuid16IncompleteList,
    ServiceUuid16CompleteList,
    ServiceUuid32IncompleteList,
    ServiceUuid32CompleteList,
    ServiceUuid128IncompleteList,
    ServiceUuid128CompleteList,
    DeviceNameShortened,
    DeviceNameComplete,
    TxPowerLevel,
    DeviceClass,
    SimplePairingHash,
    SimplePairingRandomiser,
    DeviceId,
    MeshMessage,
    MeshBeacon,
    BigInfo,
    BroadcastCode,
    ManufacturerData,
}

impl SegmentType {
    /// Map a wire type code to a segment type, `Unknown` for anything
    /// unassigned.
    pub fn from_code(code: u8) -> Self {
        match code {
            0x02 => Self::ServiceUuid16IncompleteList,
            0x03 => Self::ServiceUuid16CompleteList,
            0x04 => Self::ServiceUuid32IncompleteList,
            0x05 => Self::ServiceUuid32CompleteList,
            0x06 => Self::ServiceUuid128IncompleteList,
            0x07 => Self::ServiceUuid128CompleteList,
            0x08 => Self::DeviceNameShortened,
            0x09 => Self::DeviceNameComplete,
            0x0A => Self::TxPowerLevel,
            0x0D => Self::DeviceClass,
            0x0E => Self::SimplePairingHash,
            0x0F => Self::SimplePairingRandomiser,
            0x10 => Self::DeviceId,
            0x2A => Self::MeshMessage,
            0x2B => Self::MeshBeacon,
            0x2C => Self::BigInfo,
            0x2D => Self::BroadcastCode,
            0xFF => Self::ManufacturerData,
            _ => Self::Unknown,
        }
    }
}

/// One `[length][type][payload]` unit within an advert.
///
/// `raw` includes the two header bytes; `data` excludes the type byte.
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvertSegment {
    pub segment_type: SegmentType,
    /// Payload length as declared by the wire header (type byte excluded).
    pub data_length: usize,
    pub data: Vec<u8>,
    pub raw: Data,
}

impl fmt::Display for AdvertSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AdvertSegment{{type={:?},len={},data={},raw={}}}",
            self.segment_type,
            self.data_length,
            hex::encode(&self.data),
            self.raw,
        )
    }
}

/// All segments decoded from one scan response, with the byte count that
/// was available for decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResponseData {
    pub data_length: usize,
    pub segments: Vec<AdvertSegment>,
}

/// One vendor-specific data block: u16 little-endian vendor id followed by
/// vendor-defined bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManufacturerData {
    pub vendor_id: u16,
    pub data: Vec<u8>,
    pub raw: Data,
}

/// One typed sub-message within a vendor-specific block.
///
/// `raw` is the unit the pattern filter operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorSubSegment {
    pub sub_type: u8,
    /// Length as declared on the wire; the actual payload may be shorter
    /// when the block ends early.
    pub declared_length: usize,
    pub data: Vec<u8>,
    pub raw: Data,
}

impl fmt::Display for VendorSubSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
