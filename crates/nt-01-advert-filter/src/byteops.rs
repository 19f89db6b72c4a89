//! Bounds-tolerant byte slice helpers.
//!
//! Advert payloads declare their own lengths, and those declarations are
//! frequently wrong. Every helper here returns an empty buffer for any
//! request outside the source bounds - callers treat "empty" as "invalid
//! region" instead of handling faults at every extraction site.

/// Copy `length` bytes starting at `offset`, preserving byte order.
///
/// Returns an empty buffer when `data` is empty, `offset < 0`,
/// `length <= 0`, or the requested range exceeds the source bounds.
pub fn big_endian_slice(data: &[u8], offset: isize, length: isize) -> Vec<u8> {
    if data.is_empty() || offset < 0 || length <= 0 {
        return Vec::new();
    }
    let (offset, length) = (offset as usize, length as usize);
    if offset + length > data.len() {
        return Vec::new();
    }
    data[offset..offset + length].to_vec()
}

/// Copy `length` bytes starting at `offset`, reversing byte order.
///
/// Same bounds contract as [`big_endian_slice`]; the two results are exact
/// byte reversals of each other for any valid request.
pub fn little_endian_slice(data: &[u8], offset: isize, length: isize) -> Vec<u8> {
    let mut bytes = big_endian_slice(data, offset, length);
    bytes.reverse();
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_big_endian_slice_in_range() {
        let data = [0, 1, 5, 6, 7, 8, 12, 13, 14];
        assert_eq!(big_endian_slice(&data, 2, 4), vec![5, 6, 7, 8]);
    }

    #[test]
    fn test_little_endian_slice_in_range() {
        let data = [0, 1, 5, 6, 7, 8, 12, 13, 14];
        assert_eq!(little_endian_slice(&data, 2, 4), vec![8, 7, 6, 5]);
    }

    #[test]
    fn test_slice_overflow_is_empty() {
        let data = [0, 1, 5, 6, 7];
        assert!(big_endian_slice(&data, 2, 4).is_empty());
        assert!(little_endian_slice(&data, 2, 4).is_empty());
    }

    #[test]
    fn test_slice_negative_offset_is_empty() {
        let data = [0, 1, 5, 6, 7];
        assert!(big_endian_slice(&data, -1, 4).is_empty());
        assert!(little_endian_slice(&data, -1, 4).is_empty());
    }

    #[test]
    fn test_slice_offset_past_end_is_empty() {
        let data = [0, 1, 5, 6, 7];
        assert!(big_endian_slice(&data, 5, 4).is_empty());
        assert!(little_endian_slice(&data, 5, 4).is_empty());
    }

    #[test]
    fn test_slice_non_positive_length_is_empty() {
        let data = [0, 1, 5, 6, 7];
        assert!(big_endian_slice(&data, 0, 0).is_empty());
        assert!(big_endian_slice(&data, 0, -3).is_empty());
    }

    #[test]
    fn test_slice_empty_source_is_empty() {
        assert!(big_endian_slice(&[], 0, 1).is_empty());
        assert!(little_endian_slice(&[], 0, 1).is_empty());
    }

    proptest! {
        /// The two helpers are byte reversals of each other, and both are
        /// empty exactly when the request is out of range.
        #[test]
        fn prop_endian_slices_are_reversals(
            data in proptest::collection::vec(any::<u8>(), 0..64),
            offset in -4isize..68,
            length in -4isize..68,
        ) {
            let big = big_endian_slice(&data, offset, length);
            let mut little = little_endian_slice(&data, offset, length);
            little.reverse();
            prop_assert_eq!(&big, &little);

            let out_of_range = data.is_empty()
                || offset < 0
                || length <= 0
                || (offset as usize) + (length as usize) > data.len();
            prop_assert_eq!(big.is_empty(), out_of_range);
        }
    }
}
