//! Message extraction pipeline: raw advert bytes to filterable messages.

use shared_types::Data;

use crate::parser::{extract_manufacturer_data, extract_segments, extract_vendor_subsegments};

/// Extract the vendor sub-messages carried by a raw advert.
///
/// Returns `None` when the advert is empty or any pipeline stage yields no
/// output - "no vendor data present". A `Some` result may still be an empty
/// list ("vendor data present but zero usable messages"); downstream
/// matching treats both as no match but logging distinguishes them.
pub fn extract_messages(raw: &[u8]) -> Option<Vec<Data>> {
    if raw.is_empty() {
        return None;
    }
    let segments = extract_segments(raw, 0);
    if segments.is_empty() {
        return None;
    }
    let blocks = extract_manufacturer_data(&segments);
    if blocks.is_empty() {
        return None;
    }
    let subsegments = extract_vendor_subsegments(&blocks);
    if subsegments.is_empty() {
        return None;
    }
    Some(
        subsegments
            .into_iter()
            .filter(|subsegment| !subsegment.raw.is_empty())
            .map(|subsegment| subsegment.raw)
            .collect(),
    )
}
