//! Property-based tests for the CSV line codec
//!
//! These properties pin the codec's near-inverse behavior and check that
//! every line it writes is read back identically by an RFC 4180 reader.

use csv::ReaderBuilder;
use proptest::prelude::*;

use epoch_expander::csv_handler::{format_line, needs_quoting, parse_line};

/// Strategy for generating fields rich in CSV special characters
fn field_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        // Plain alphanumeric values
        "[a-zA-Z0-9 ]{0,12}".prop_map(|s| s),
        // Values with delimiters and quotes
        "[a-z,\" ]{0,12}".prop_map(|s| s),
        // JSON-like values
        "[{}\\[\\]:,\"a-z0-9]{0,16}".prop_map(|s| s),
        // Embedded newlines
        "[a-z]{0,5}\n[a-z]{0,5}".prop_map(|s| s),
        Just(String::new()),
        Just(r#"{"confirm":1752210112744}"#.to_string()),
    ]
}

/// Strategy for fields without line terminators
fn single_line_field_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,\"{}\\[\\]:]{0,16}".prop_map(|s| s)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Formatting, parsing and formatting again is stable
    #[test]
    fn format_parse_format_is_stable(
        fields in prop::collection::vec(field_strategy(), 1..8)
    ) {
        let line = format_line(&fields);
        let reparsed = parse_line(&line);
        prop_assert_eq!(format_line(&reparsed), line);
    }

    // Parsing a formatted line restores the fields
    #[test]
    fn parse_restores_formatted_fields(
        fields in prop::collection::vec(field_strategy(), 1..8)
    ) {
        let line = format_line(&fields);
        prop_assert_eq!(parse_line(&line), fields);
    }

    // A field is quoted exactly when it contains a special character
    #[test]
    fn quoting_matches_rule(field in field_strategy()) {
        let line = format_line(&[field.as_str()]);
        let quoted = line.starts_with('"') && line.ends_with('"') && line.len() >= 2;
        prop_assert_eq!(quoted, needs_quoting(&field));
    }

    // Lines written by the codec are valid RFC 4180 records
    #[test]
    fn formatted_line_is_read_back_by_csv_crate(
        fields in prop::collection::vec(single_line_field_strategy(), 2..8)
    ) {
        let line = format_line(&fields);
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(line.as_bytes());

        let record = reader.records().next()
            .expect("Should have a record")
            .expect("Should successfully read record");
        let read: Vec<String> = record.iter().map(str::to_string).collect();
        prop_assert_eq!(read, fields);
    }

    // The number of fields is one more than the number of unquoted commas
    #[test]
    fn parse_never_loses_fields(
        fields in prop::collection::vec("[a-z0-9]{0,6}", 1..10)
    ) {
        let line = fields.join(",");
        prop_assert_eq!(parse_line(&line).len(), fields.len());
    }
}
