//! Enumeration mining from documentation text
//!
//! IEEE 2030.5 documents most enumerations in prose rather than facets:
//!
//! ```text
//! 0 = Not applicable (default, if not specified)
//! 1 = Active
//! 3 - 64: Reserved
//! ```
//!
//! Each line is classified independently. The range pattern is always tried
//! before the single-value pattern, since `3 - 64: Reserved` also matches the
//! latter with key `3`.

use super::model::{Annotation, EnumRange, EnumValues};
use once_cell::sync::Lazy;
use regex::Regex;

static RANGE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)\s*-\s*([0-9]+)\s*:\s*(.+)$").unwrap());

static VALUE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)\s*[=\-:]\s*(.+)$").unwrap());

static DEFAULT_NOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*\([^)]*default[^)]*\)").unwrap());

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';'];

/// Extract enumeration values and ranges from a documentation block
pub fn interpret(text: &str) -> Annotation {
    let mut values = EnumValues::new();
    let mut ranges = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(range) = parse_range(line) {
            ranges.push(range);
            continue;
        }

        // Prose mentioning reserved values, not a record
        if line.to_lowercase().contains("reserved") && !line.bytes().any(|b| b.is_ascii_digit()) {
            continue;
        }

        if let Some(caps) = VALUE_LINE.captures(line) {
            values.insert(caps[1].to_string(), clean_description(&caps[2]));
        }
    }

    Annotation {
        values: (!values.is_empty()).then_some(values),
        ranges: (!ranges.is_empty()).then_some(ranges),
    }
}

fn parse_range(line: &str) -> Option<EnumRange> {
    let caps = RANGE_LINE.captures(line)?;
    Some(EnumRange {
        start: caps[1].parse().ok()?,
        end: caps[2].parse().ok()?,
        description: clean_description(&caps[3]),
    })
}

/// Drop `(… default …)` notes and trailing punctuation
fn clean_description(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches(TRAILING_PUNCTUATION);
    DEFAULT_NOTE.replace_all(trimmed, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_values_all_separators() {
        let ann = interpret("0 = Off\n1 - On\n2: Standby");
        let values = ann.values.unwrap();
        assert_eq!(values["0"], "Off");
        assert_eq!(values["1"], "On");
        assert_eq!(values["2"], "Standby");
        assert!(ann.ranges.is_none());
    }

    #[test]
    fn test_range_line() {
        let ann = interpret("0 = Not applicable\n3 - 64: Reserved");
        assert_eq!(
            ann.ranges.unwrap(),
            vec![EnumRange {
                start: 3,
                end: 64,
                description: "Reserved".to_string()
            }]
        );
        let values = ann.values.unwrap();
        assert_eq!(values.len(), 1);
        assert!(!values.contains_key("3"));
    }

    #[test]
    fn test_default_parenthetical_is_stripped() {
        let ann = interpret("0 = Value (default, if not specified)");
        assert_eq!(ann.values.unwrap()["0"], "Value");

        let ann = interpret("1 = Other (DEFAULT).");
        assert_eq!(ann.values.unwrap()["1"], "Other");

        let ann = interpret("65 - 191: User-defined (default if absent);");
        assert_eq!(ann.ranges.unwrap()[0].description, "User-defined");
    }

    #[test]
    fn test_punctuation_before_default_note_is_kept() {
        let ann = interpret("0 = Value, (default)");
        assert_eq!(ann.values.unwrap()["0"], "Value,");
    }

    #[test]
    fn test_other_parentheticals_are_kept() {
        let ann = interpret("2 = Apparent power (VA).");
        assert_eq!(ann.values.unwrap()["2"], "Apparent power (VA)");
    }

    #[test]
    fn test_prose_is_ignored() {
        let ann = interpret(
            "The kind of the reading.\nAll other values reserved.\nSee section 4 for details",
        );
        assert!(ann.values.is_none());
        assert!(ann.ranges.is_none());
        assert!(ann.is_empty());
    }

    #[test]
    fn test_indented_lines_are_trimmed() {
        let ann = interpret("Kinds:\n      0 = Unknown\n      1 = Electricity\n");
        assert_eq!(ann.values.unwrap().len(), 2);
    }

    #[test]
    fn test_overflowing_range_falls_back_to_single_value() {
        let ann = interpret("1 - 99999999999999999999999: Everything");
        assert!(ann.ranges.is_none());
        assert_eq!(
            ann.values.unwrap()["1"],
            "99999999999999999999999: Everything"
        );
    }

    #[test]
    fn test_value_order_is_document_order() {
        let ann = interpret("5 = E\n1 = A\n3 = C");
        let keys: Vec<_> = ann.values.unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["5", "1", "3"]);
    }

    proptest! {
        #[test]
        fn prop_range_lines_never_produce_values(
            start in 0u64..10_000,
            end in 0u64..10_000,
            desc in "[A-Za-z][A-Za-z ]{0,20}",
        ) {
            let ann = interpret(&format!("{} - {}: {}", start, end, desc));
            prop_assert!(ann.values.is_none());
            let ranges = ann.ranges.unwrap();
            prop_assert_eq!(ranges.len(), 1);
            prop_assert_eq!(ranges[0].start, start);
            prop_assert_eq!(ranges[0].end, end);
        }

        #[test]
        fn prop_never_returns_empty_collections(text in "[ -~\n]{0,200}") {
            let ann = interpret(&text);
            prop_assert!(ann.values.map_or(true, |v| !v.is_empty()));
            prop_assert!(ann.ranges.map_or(true, |r| !r.is_empty()));
        }
    }
}
