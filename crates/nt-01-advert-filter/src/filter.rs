//! Device filter: match extracted messages against operator patterns.
//!
//! Patterns are regular expressions over the hex representation of each
//! extracted message - maximum flexibility for operators cataloguing which
//! nearby hardware can and cannot host the sensor service. Matching is
//! case-insensitive and unanchored; patterns that must anchor to the start
//! of a message include an explicit `^`.

use regex::{Regex, RegexBuilder};
use tracing::warn;

use shared_types::Data;

use crate::messages::extract_messages;

/// One compiled filter pattern. Order within the configured list is
/// significant: the first match wins.
#[derive(Debug, Clone)]
pub struct FilterPattern {
    /// The pattern source as configured.
    pub source: String,
    /// Case-insensitive compiled form.
    pub compiled: Regex,
}

/// A successful pattern match: which pattern fired and against which
/// hex-encoded message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchingPattern {
    pub pattern: String,
    pub message: String,
}

/// Compile pattern strings into [`FilterPattern`]s.
///
/// A pattern that fails to compile is logged and dropped - a bad entry in
/// an operator-supplied list must not disable the remaining patterns.
pub fn compile_patterns<S: AsRef<str>>(patterns: &[S]) -> Vec<FilterPattern> {
    let mut compiled = Vec::with_capacity(patterns.len());
    for pattern in patterns {
        let source = pattern.as_ref();
        match RegexBuilder::new(source).case_insensitive(true).build() {
            Ok(regex) => compiled.push(FilterPattern {
                source: source.to_string(),
                compiled: regex,
            }),
            Err(error) => {
                warn!(pattern = source, %error, "invalid filter pattern dropped");
            }
        }
    }
    compiled
}

/// Match a single hex-encoded message against the patterns in list order,
/// returning the first pattern that finds a match anywhere in the message.
pub fn match_hex_message<'a>(
    patterns: &'a [FilterPattern],
    message: &str,
) -> Option<&'a FilterPattern> {
    patterns
        .iter()
        .find(|pattern| pattern.compiled.is_match(message))
}

/// Match a raw advert against the patterns.
///
/// Extracts messages via the pipeline; with no patterns, no messages, or no
/// match, returns `None`. Messages are tested in extraction order and the
/// patterns in list order within each message; the first pair that matches
/// wins. A device is accepted for further interaction iff this returns
/// `Some`.
pub fn match_advert(patterns: &[FilterPattern], raw: &[u8]) -> Option<MatchingPattern> {
    if patterns.is_empty() || raw.is_empty() {
        return None;
    }
    let messages = extract_messages(raw)?;
    for message in &messages {
        let hex_message = message.hex_encoded_string();
        if let Some(pattern) = match_hex_message(patterns, &hex_message) {
            return Some(MatchingPattern {
                pattern: pattern.source.clone(),
                message: hex_message,
            });
        }
    }
    None
}

/// Match against pre-extracted messages rather than a raw advert.
///
/// Used when the caller already holds the extraction output (e.g. when
/// re-classifying a known device from its stored advert).
pub fn match_messages(patterns: &[FilterPattern], messages: &[Data]) -> Option<MatchingPattern> {
    for message in messages {
        let hex_message = message.hex_encoded_string();
        if let Some(pattern) = match_hex_message(patterns, &hex_message) {
            return Some(MatchingPattern {
                pattern: pattern.source.clone(),
                message: hex_message,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advert(hex: &str) -> Vec<u8> {
        hex::decode(hex).expect("valid test vector")
    }

    #[test]
    fn test_compile_drops_invalid_patterns() {
        let patterns = compile_patterns(&["^10....04", "([unclosed", "^05"]);
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].source, "^10....04");
        assert_eq!(patterns[1].source, "^05");
    }

    #[test]
    fn test_match_hex_message_wildcards_and_case() {
        let patterns = compile_patterns(&["^10....04", "^10....14"]);
        assert!(match_hex_message(&patterns, "10060c044fde4df7").is_some());
        // Case-insensitive: uppercase hex matches too, and the dots are
        // wildcards over arbitrary characters.
        assert!(match_hex_message(&patterns, "10XXXX044FDE4DF7").is_some());
        assert!(match_hex_message(&patterns, "10060c054fde4df7").is_none());
    }

    #[test]
    fn test_match_order_first_pattern_wins() {
        let patterns = compile_patterns(&["^10", "^10....04"]);
        let matched = match_hex_message(&patterns, "10060c044fde4df7").expect("matches");
        assert_eq!(matched.source, "^10");
    }

    #[test]
    fn test_match_advert_two_message_vector() {
        let raw = advert(
            "02011a020a0c0bff4c001006071ea3dd89e014ff4c0001000000000000000000002000\
             000000000000000000000000000000000000000000000000000000",
        );
        let accept = compile_patterns(&["^10....1e"]);
        let matched = match_advert(&accept, &raw).expect("pattern matches first message");
        assert_eq!(matched.message, "1006071ea3dd89e0");

        let reject = compile_patterns(&["^10....04"]);
        assert_eq!(match_advert(&reject, &raw), None);
    }

    #[test]
    fn test_match_advert_without_patterns_or_data() {
        let patterns = compile_patterns(&["^10"]);
        assert_eq!(match_advert(&patterns, &[]), None);
        assert_eq!(match_advert(&[], &advert("020106")), None);
        // No vendor data in the advert at all.
        assert_eq!(match_advert(&patterns, &advert("020106")), None);
    }

    #[test]
    fn test_match_messages_on_pre_extracted_output() {
        use crate::messages::extract_messages;
        let raw = advert("02011a0bff4c001006071ea3dd89e0");
        let messages = extract_messages(&raw).expect("vendor data present");
        let patterns = compile_patterns(&["^10....1e"]);
        let matched = match_messages(&patterns, &messages).expect("matches");
        assert_eq!(matched.message, "1006071ea3dd89e0");
    }

    #[test]
    fn test_unanchored_find_matches_mid_message() {
        let patterns = compile_patterns(&["dd89"]);
        let raw = advert("02011a0bff4c001006071ea3dd89e0");
        assert!(match_advert(&patterns, &raw).is_some());
    }
}
