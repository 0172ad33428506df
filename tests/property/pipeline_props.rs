//! Property-based tests for the CSV conversion pipeline
//!
//! Tables are generated from a small vocabulary of column names, some of
//! which are timestamp columns, and rows of epoch values, small numbers and
//! words. Embedded JSON columns are left out so every output row stays on a
//! single physical line.

use chrono::DateTime;
use proptest::prelude::*;

use epoch_expander::csv_handler::{format_line, parse_line};
use epoch_expander::epoch::ReadableZone;
use epoch_expander::pipeline::{ConversionPipeline, ConvertOptions};

/// Column names after the leading `id` column
const OTHER_COLUMNS: [&str; 6] = [
    "name",
    "createdAt",
    "status",
    "updatedAt",
    "closedAt",
    "note",
];

fn pipeline() -> ConversionPipeline {
    ConversionPipeline::new(ConvertOptions {
        readable_zone: ReadableZone::Utc,
        ..ConvertOptions::default()
    })
}

fn iso_for_seconds(seconds: i64) -> String {
    DateTime::from_timestamp(seconds, 0)
        .expect("Seconds should be in range")
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// Strategy for headers that always start with `id`
fn header_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::sample::subsequence(OTHER_COLUMNS.to_vec(), 0..=OTHER_COLUMNS.len()).prop_map(
        |columns| {
            std::iter::once("id")
                .chain(columns)
                .map(str::to_string)
                .collect()
        },
    )
}

/// Strategy for non-empty row identifiers
fn id_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,6}".prop_map(|s| s)
}

/// Strategy for field values
fn value_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        // Epoch seconds between 2000 and 2100
        (946_684_801i64..4_102_444_800).prop_map(|n| n.to_string()),
        // Epoch milliseconds between 2000 and 2100
        (946_684_800_001i64..4_102_444_800_000).prop_map(|n| n.to_string()),
        // Numbers too small to be timestamps
        (0i64..946_684_800).prop_map(|n| n.to_string()),
        "[a-z]{0,6}".prop_map(|s| s),
        Just("null".to_string()),
    ]
}

/// Strategy for a header plus rows no wider than the header
fn table_strategy() -> impl Strategy<Value = (Vec<String>, Vec<Vec<String>>)> {
    header_strategy().prop_flat_map(|header| {
        let width = header.len();
        let row = (id_strategy(), prop::collection::vec(value_strategy(), 0..width)).prop_map(
            |(id, rest)| std::iter::once(id).chain(rest).collect::<Vec<_>>(),
        );
        (Just(header), prop::collection::vec(row, 0..20))
    })
}

/// Strategy for a header plus rows exactly as wide as the header
fn full_table_strategy() -> impl Strategy<Value = (Vec<String>, Vec<Vec<String>>)> {
    header_strategy().prop_flat_map(|header| {
        let width = header.len();
        let row = (id_strategy(), prop::collection::vec(value_strategy(), width - 1)).prop_map(
            |(id, rest)| std::iter::once(id).chain(rest).collect::<Vec<_>>(),
        );
        (Just(header), prop::collection::vec(row, 1..10))
    })
}

fn render(header: &[String], rows: &[Vec<String>]) -> String {
    std::iter::once(format_line(header))
        .chain(rows.iter().map(|row| format_line(row)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn simple_column_count(header: &[String]) -> usize {
    header
        .iter()
        .filter(|name| name.ends_with("At"))
        .count()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // One output line per data row, plus the header
    #[test]
    fn output_has_one_line_per_row((header, rows) in table_strategy()) {
        let output = pipeline().convert(&render(&header, &rows)).unwrap();
        prop_assert_eq!(output.split('\n').count(), rows.len() + 1);
    }

    // Every output row has exactly as many fields as the output header
    #[test]
    fn output_rows_match_header_width((header, rows) in table_strategy()) {
        let output = pipeline().convert(&render(&header, &rows)).unwrap();
        let mut lines = output.split('\n');
        let output_header = parse_line(lines.next().unwrap());
        prop_assert_eq!(output_header.len(), header.len() + simple_column_count(&header));

        for line in lines {
            prop_assert_eq!(parse_line(line).len(), output_header.len());
        }
    }

    // Original fields come through unchanged ahead of the converted fields
    #[test]
    fn original_fields_are_preserved((header, rows) in full_table_strategy()) {
        let output = pipeline().convert(&render(&header, &rows)).unwrap();

        for (line, row) in output.split('\n').skip(1).zip(&rows) {
            let fields = parse_line(line);
            prop_assert_eq!(&fields[..row.len()], &row[..]);
        }
    }

    // Blank lines anywhere in the input do not change the output
    #[test]
    fn blank_lines_are_ignored(
        (header, rows) in table_strategy(),
        blank in prop_oneof![Just(""), Just("   "), Just("\t")]
    ) {
        let text = render(&header, &rows);
        let padded = format!("{blank}\n{}\n{blank}\n", text.replace('\n', &format!("\n{blank}\n")));
        prop_assert_eq!(
            pipeline().convert(&padded).unwrap(),
            pipeline().convert(&text).unwrap()
        );
    }

    // CRLF line endings produce the same output as LF
    #[test]
    fn crlf_input_matches_lf((header, rows) in table_strategy()) {
        let text = render(&header, &rows);
        prop_assert_eq!(
            pipeline().convert(&text.replace('\n', "\r\n")).unwrap(),
            pipeline().convert(&text).unwrap()
        );
    }

    // A createdAt value in seconds lands as ISO 8601 in the converted column
    #[test]
    fn seconds_are_converted_to_iso(
        seconds in 946_684_801i64..4_102_444_800,
        id in id_strategy()
    ) {
        let text = format!("id,createdAt\n{id},{seconds}");
        let output = pipeline().convert(&text).unwrap();
        let row = parse_line(output.split('\n').nth(1).unwrap());
        prop_assert_eq!(row.len(), 3);
        prop_assert_eq!(&row[2], &iso_for_seconds(seconds));
    }

    // The same instant in seconds and in milliseconds converts identically
    #[test]
    fn seconds_and_millis_agree(seconds in 946_684_801i64..4_102_444_800) {
        let text = format!("createdAt\n{seconds}\n{}", seconds * 1000);
        let output = pipeline().convert(&text).unwrap();
        let rows: Vec<Vec<String>> = output.split('\n').skip(1).map(parse_line).collect();
        prop_assert_eq!(&rows[0][1], &rows[1][1]);
    }
}
