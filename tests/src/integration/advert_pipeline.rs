//! Raw advert bytes through message extraction and pattern filtering.

#[cfg(test)]
mod tests {
    use nt_01_advert_filter::{compile_patterns, extract_messages, match_advert};
    use nt_03_target_registry::default_feature_patterns;

    use crate::init_tracing;

    fn advert(hex: &str) -> Vec<u8> {
        hex::decode(hex).expect("valid test vector")
    }

    /// Background advert from a real capture: one prefixed vendor
    /// sub-segment, zero-padded to the 31-byte advert size.
    #[test]
    fn test_single_message_capture() {
        init_tracing();
        let mut raw = advert("0201060aff4c001005421c1e616a");
        raw.resize(31, 0x00);

        let messages = extract_messages(&raw).expect("vendor data present");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].hex_encoded_string(), "1005421c1e616a");
    }

    /// Capture with two vendor blocks: a prefixed sub-segment in the first
    /// and a legacy whole-remainder sub-segment in the second.
    #[test]
    fn test_two_message_capture_and_filter_verdicts() {
        init_tracing();
        let raw = advert(
            "02011a020a0c0bff4c001006071ea3dd89e014ff4c0001000000000000000000002000\
             000000000000000000000000000000000000000000000000000000",
        );

        let messages = extract_messages(&raw).expect("vendor data present");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].hex_encoded_string(), "1006071ea3dd89e0");
        assert_eq!(
            messages[1].hex_encoded_string(),
            "0100000000000000000000200000000000"
        );

        let matching = compile_patterns(&["^10....1e"]);
        assert!(match_advert(&matching, &raw).is_some());
        let non_matching = compile_patterns(&["^10....04"]);
        assert!(match_advert(&non_matching, &raw).is_none());
    }

    /// The shipped pattern list classifies known message shapes.
    #[test]
    fn test_default_patterns_against_known_messages() {
        let patterns = compile_patterns(&default_feature_patterns());

        let classified = ["10060c044fde4df7", "10050c144fde4d", "0500000000"];
        for message in classified {
            assert!(
                nt_01_advert_filter::match_hex_message(&patterns, message).is_some(),
                "expected {message} to match a shipped pattern"
            );
        }

        // This message shape matches nothing in the shipped list.
        assert!(
            nt_01_advert_filter::match_hex_message(&patterns, "1005421c1e616a").is_none()
        );
    }

    /// A pattern list with a broken entry still applies the valid ones.
    #[test]
    fn test_broken_pattern_does_not_disable_filtering() {
        let patterns = compile_patterns(&["([broken", "^10....1e"]);
        assert_eq!(patterns.len(), 1);

        let raw = advert("02011a0bff4c001006071ea3dd89e0");
        assert!(match_advert(&patterns, &raw).is_some());
    }
}
