//! # Signal Codec Subsystem
//!
//! Two small binary codecs shared by both ends of a proximity exchange:
//!
//! - [`signal`] - the fixed little-endian sub-protocol written over an
//!   opened channel (proximity readings, identity payloads, and bundles of
//!   identities seen on behalf of third parties).
//! - [`pseudo_address`] - the 48-bit rotating pseudo address broadcast in
//!   vendor data, used to re-identify a device across radio address
//!   rotations.
//!
//! Decoders tolerate corrupted or partially-received writes by returning
//! `None`; encoders are total. Wire constants must match the peer
//! implementation exactly.

pub mod pseudo_address;
pub mod signal;

pub use pseudo_address::PseudoAddress;
pub use signal::{
    decode_write_identity, decode_write_identity_sharing, decode_write_proximity, detect,
    encode_write_identity, encode_write_identity_sharing, encode_write_proximity, SignalDataKind,
    ACTION_WRITE_IDENTITY, ACTION_WRITE_IDENTITY_SHARING, ACTION_WRITE_PROXIMITY,
};
