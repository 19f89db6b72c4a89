//! # Advert Parsing & Device Filtering Subsystem
//!
//! This crate turns raw broadcast advert bytes into structured segments and
//! matches them against operator-supplied patterns, deciding whether a
//! device is worth the cost of a follow-up connection.
//!
//! ## Pipeline
//!
//! ```text
//! raw advert bytes
//!   ├─ extract_segments()            length/type prefixed segments
//!   ├─ extract_manufacturer_data()   vendor-specific blocks (type 0xFF)
//!   ├─ extract_vendor_subsegments()  typed sub-messages within a block
//!   └─ extract_messages()            the unit the pattern filter sees
//! ```
//!
//! ## Malformed input
//!
//! Truncated, padded, or corrupted adverts are routine wire input, not
//! faults: decoding stops silently at the first inconsistency and returns
//! whatever was decoded so far, and slice helpers return empty buffers for
//! any out-of-range request.

pub mod byteops;
pub mod filter;
pub mod messages;
pub mod parser;
pub mod segments;

pub use byteops::{big_endian_slice, little_endian_slice};
pub use filter::{
    compile_patterns, match_advert, match_hex_message, match_messages, FilterPattern,
    MatchingPattern,
};
pub use messages::extract_messages;
pub use parser::{
    extract_manufacturer_data, extract_segments, extract_tx_power, extract_vendor_subsegments,
    parse_scan_response,
};
pub use segments::{
    AdvertSegment, ManufacturerData, ScanResponseData, SegmentType, VendorSubSegment,
};
