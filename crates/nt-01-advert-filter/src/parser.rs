//! Advert segment decoding.
//!
//! Decoding never fails: truncated or padded trailing data silently ends the
//! walk and whatever decoded so far is returned. Real adverts are routinely
//! shorter than their headers claim.

use shared_types::{Data, TxPower};

use crate::byteops::big_endian_slice;
use crate::segments::{
    AdvertSegment, ManufacturerData, ScanResponseData, SegmentType, VendorSubSegment,
};

/// Marks the legacy service-data encoding inside vendor blocks: the
/// remainder of the block is one sub-segment with no length byte.
const LEGACY_SUBSEGMENT_TYPE: u8 = 0x01;

/// Decode a full scan response starting at `offset`.
pub fn parse_scan_response(raw: &[u8], offset: usize) -> ScanResponseData {
    ScanResponseData {
        data_length: raw.len().saturating_sub(offset),
        segments: extract_segments(raw, offset),
    }
}

/// Walk `raw` from `offset` decoding `[length][type][payload]` segments.
///
/// The length byte counts the type byte. A header that claims more bytes
/// than remain, or fewer than two trailing bytes, ends the walk.
pub fn extract_segments(raw: &[u8], offset: usize) -> Vec<AdvertSegment> {
    let mut segments = Vec::new();
    let len = raw.len() as isize;
    let mut position = offset as isize;

    while position < len {
        if position + 2 > len {
            break;
        }
        let segment_length = raw[position as usize] as isize;
        let type_code = raw[position as usize + 1];
        position += 2;
        if position + segment_length - 1 > len {
            // Declared length runs past the buffer: stop, keep what we have.
            break;
        }
        let data = big_endian_slice(raw, position, segment_length - 1);
        let raw_segment = big_endian_slice(raw, position - 2, segment_length + 1);
        position += segment_length - 1;
        segments.push(AdvertSegment {
            segment_type: SegmentType::from_code(type_code),
            data_length: data.len(),
            data,
            raw: Data::from(raw_segment),
        });
    }

    segments
}

/// Find the tx-power-level segment and read its single payload byte.
pub fn extract_tx_power(segments: &[AdvertSegment]) -> Option<TxPower> {
    segments
        .iter()
        .find(|segment| segment.segment_type == SegmentType::TxPowerLevel)
        .and_then(|segment| segment.data.first().map(|&value| TxPower(value)))
}

/// Reinterpret every manufacturer-data segment as a vendor block:
/// u16 little-endian vendor id, then vendor-defined bytes.
///
/// Segments shorter than the two id bytes are skipped; the same advert can
/// legitimately carry several vendor blocks.
pub fn extract_manufacturer_data(segments: &[AdvertSegment]) -> Vec<ManufacturerData> {
    let mut blocks = Vec::new();
    for segment in segments {
        if segment.segment_type != SegmentType::ManufacturerData {
            continue;
        }
        if segment.data.len() < 2 {
            continue;
        }
        let vendor_id = u16::from_le_bytes([segment.data[0], segment.data[1]]);
        blocks.push(ManufacturerData {
            vendor_id,
            data: big_endian_slice(&segment.data, 2, segment.data.len() as isize - 2),
            raw: segment.raw.clone(),
        });
    }
    blocks
}

/// Split vendor blocks into typed sub-segments.
///
/// A `0x01` byte at the cursor marks the legacy encoding: the remainder of
/// the block is one final sub-segment with no length byte. This conflates
/// "legacy whole-remainder encoding" with "type 1, no length byte" and is
/// preserved exactly - downstream pattern libraries are tuned to its output.
/// Everything else is `[sub_type][declared_length][payload]`, with the
/// payload clamped to the bytes actually remaining in the block.
///
/// A non-legacy type byte with no length byte after it (a lone trailing
/// byte) makes the whole extraction yield nothing, matching peer behavior
/// where that advert fails filtering outright.
pub fn extract_vendor_subsegments(blocks: &[ManufacturerData]) -> Vec<VendorSubSegment> {
    let mut subsegments = Vec::new();
    for block in blocks {
        let block_len = block.data.len();
        let mut position = 0usize;
        while position < block_len {
            let sub_type = block.data[position];
            if sub_type == LEGACY_SUBSEGMENT_TYPE {
                let length = block_len - position - 1;
                subsegments.push(VendorSubSegment {
                    sub_type,
                    declared_length: length,
                    data: big_endian_slice(&block.data, position as isize + 1, length as isize),
                    raw: Data::from(big_endian_slice(
                        &block.data,
                        position as isize,
                        (block_len - position) as isize,
                    )),
                });
                position = block_len;
            } else {
                if position + 1 >= block_len {
                    return Vec::new();
                }
                let declared_length = block.data[position + 1] as usize;
                let max_length = declared_length.min(block_len - position - 2);
                subsegments.push(VendorSubSegment {
                    sub_type,
                    declared_length,
                    data: big_endian_slice(
                        &block.data,
                        position as isize + 2,
                        max_length as isize,
                    ),
                    raw: Data::from(big_endian_slice(
                        &block.data,
                        position as isize,
                        max_length as isize + 2,
                    )),
                });
                position += max_length + 2;
            }
        }
    }
    subsegments
}
