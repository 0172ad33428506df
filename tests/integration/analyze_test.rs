//! Integration tests for analyze mode and inspect mode reports

use chrono::{TimeZone, Utc};
use serde_json::Value;
use tempfile::tempdir;

use epoch_expander::analyzer::analyze;
use epoch_expander::csv_handler::ColumnKind;
use epoch_expander::epoch::{EpochUnit, ReadableZone};
use epoch_expander::inspector::inspect;
use epoch_expander::pipeline::{ConversionPipeline, ConvertOptions};
use epoch_expander::util::read_input;

const EXPORT_CSV: &str = "\
orderId,createdAt,trackingHistory,note
o1,1752210112744,\"[{\"\"at\"\":1752210112744},{\"\"at\"\":1703980800}]\",first
o2,1703980800,,\"multi
line\"
o3,1703980800
";

#[test]
fn test_analyze_export_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("export.csv");
    std::fs::write(&path, EXPORT_CSV).unwrap();

    let report = analyze(&read_input(Some(&path)).unwrap()).unwrap();
    assert_eq!(report.headers, ["orderId", "createdAt", "trackingHistory", "note"]);
    assert_eq!(report.total_records, 3);
    assert_eq!(report.ragged_records, 1);
    assert_eq!(report.ragged_lines, vec![5]);

    let kinds: Vec<(&str, ColumnKind)> = report
        .timestamp_columns
        .iter()
        .map(|spec| (spec.name.as_str(), spec.kind))
        .collect();
    assert_eq!(
        kinds,
        [
            ("createdAt", ColumnKind::Simple),
            ("trackingHistory", ColumnKind::JsonEmbedded)
        ]
    );

    let sample = &report.json_samples[0];
    assert!(sample.parses);
    assert!(sample.top_level_keys.is_empty());
    assert_eq!(sample.timestamp_values, 2);

    let text = report.to_string();
    assert!(text.contains("CSV Structure Report"));
    assert!(text.contains("[1] createdAt (simple)"));
    assert!(text.contains("[2] trackingHistory (json)"));
    assert!(text.contains("Line 5"));
}

#[test]
fn test_analyze_report_serializes_to_json() {
    let report = analyze(EXPORT_CSV).unwrap();
    let json: Value = serde_json::to_value(&report).unwrap();

    assert_eq!(json["total_records"], 3);
    assert_eq!(json["timestamp_columns"][0]["kind"], "simple");
    assert_eq!(json["timestamp_columns"][1]["kind"], "json_embedded");
    assert_eq!(json["json_samples"][0]["column"], "trackingHistory");
}

#[test]
fn test_analyze_converted_output_is_rectangular() {
    let simple = "orderId,createdAt,note\no1,1752210112744,a\no2\no3,1703980800,c,extra\n";
    let before = analyze(simple).unwrap();
    assert_eq!(before.ragged_records, 2);

    let pipeline = ConversionPipeline::new(ConvertOptions {
        readable_zone: ReadableZone::Utc,
        ..ConvertOptions::default()
    });
    let converted = pipeline.convert(simple).unwrap();
    let after = analyze(&converted).unwrap();

    assert_eq!(after.column_count(), 4);
    assert_eq!(after.total_records, 3);
    // Rows wider than the header stay wider
    assert_eq!(after.ragged_records, 1);
}

#[test]
fn test_inspect_seconds_and_millis_agree() {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let seconds = inspect("1703980800", now).unwrap();
    let millis = inspect("1703980800000", now).unwrap();

    assert_eq!(seconds.unit, EpochUnit::Seconds);
    assert_eq!(millis.unit, EpochUnit::Milliseconds);
    assert_eq!(seconds.iso, millis.iso);
    assert_eq!(seconds.iso, "2023-12-31T00:00:00.000Z");
    assert_eq!(seconds.epoch_millis, 1_703_980_800_000);
    assert_eq!(seconds.relative, "1 days ago");
}

#[test]
fn test_inspect_rejects_non_numeric_value() {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    assert!(inspect("yesterday", now).is_err());
}
