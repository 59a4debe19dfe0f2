// Rate/usage formatter boundary tests

use netspeedmon::formatting::*;
use netspeedmon::models::{Deltas, IconText};

const KIB: i64 = 1024;
const MIB: i64 = 1024 * 1024;

fn compact(v: i64) -> (String, String) {
    let IconText { magnitude, unit } = format_rate_compact(v);
    (magnitude, unit)
}

fn pair(m: &str, u: &str) -> (String, String) {
    (m.to_string(), u.to_string())
}

#[test]
fn test_compact_bytes_row() {
    assert_eq!(compact(0), pair("0", "B/s"));
    assert_eq!(compact(999), pair("999", "B/s"));
}

#[test]
fn test_compact_sub_kilobyte_uses_one_digit() {
    assert_eq!(compact(1000), pair("0.9", "K/s"));
    assert_eq!(compact(1023), pair("0.9", "K/s"));
}

#[test]
fn test_compact_integer_kilobytes() {
    assert_eq!(compact(KIB), pair("1", "K/s"));
    assert_eq!(compact(2 * KIB - 1), pair("1", "K/s"));
    assert_eq!(compact(999 * KIB), pair("999", "K/s"));
}

#[test]
fn test_compact_fractional_megabytes() {
    assert_eq!(compact(999 * KIB + 1), pair("0.9", "M/s"));
    assert_eq!(compact(MIB), pair("1.0", "M/s"));
    assert_eq!(compact(MIB + MIB / 2), pair("1.5", "M/s"));
    assert_eq!(compact(10 * MIB - 1), pair("9.9", "M/s"));
}

#[test]
fn test_compact_integer_megabytes() {
    assert_eq!(compact(10 * MIB), pair("10", "M/s"));
    assert_eq!(compact(123 * MIB + 5), pair("123", "M/s"));
}

#[test]
fn test_compact_negative_renders_in_bytes_row() {
    assert_eq!(compact(-5), pair("-5", "B/s"));
    assert_eq!(compact(-5000), pair("-5000", "B/s"));
}

#[test]
fn test_verbose_boundaries() {
    assert_eq!(format_rate_verbose(0), "0 B/s");
    assert_eq!(format_rate_verbose(1023), "1023 B/s");
    assert_eq!(format_rate_verbose(1024), "1.00 Kb/s");
    assert_eq!(format_rate_verbose(1536), "1.50 Kb/s");
    assert_eq!(format_rate_verbose(MIB - 1), "1023.99 Kb/s");
    assert_eq!(format_rate_verbose(MIB), "1.00 Mb/s");
    assert_eq!(format_rate_verbose(250 * MIB), "250.00 Mb/s");
}

#[test]
fn test_verbose_truncates_instead_of_rounding() {
    assert_eq!(format_rate_verbose(2047), "1.99 Kb/s");
    assert_eq!(format_rate_verbose(2 * MIB - 1), "1.99 Mb/s");
}

#[test]
fn test_verbose_negative() {
    assert_eq!(format_rate_verbose(-2048), "-2048 B/s");
}

#[test]
fn test_usage_boundaries() {
    assert_eq!(format_usage(0), "0 B");
    assert_eq!(format_usage(1023), "1023 B");
    assert_eq!(format_usage(1024), "1.00 KB");
    assert_eq!(format_usage(1_048_576), "1.00 MB");
    assert_eq!(format_usage(1_073_741_824), "1.00 GB");
    assert_eq!(format_usage(29_312_178), "27.95 MB");
}

#[test]
fn test_usage_truncates_instead_of_rounding() {
    assert_eq!(format_usage(1_073_741_823), "1023.99 MB");
    assert_eq!(format_usage(2 * 1_073_741_824 - 1), "1.99 GB");
}

#[test]
fn test_formatters_are_pure() {
    for v in [0, 999, 1000, 1024, 999 * KIB + 1, 10 * MIB, 3 * MIB + 7] {
        assert_eq!(format_rate_compact(v), format_rate_compact(v));
        assert_eq!(format_rate_verbose(v), format_rate_verbose(v));
        assert_eq!(format_usage(v), format_usage(v));
    }
}

#[test]
fn test_report_icon_uses_combined_rate() {
    let deltas = Deltas {
        download_rate: 600,
        upload_rate: 500,
        session_download: 2048,
        session_upload: 10,
    };
    let report = format_report(&deltas);
    assert_eq!(report.icon, IconText::new("1", "K/s"));
    assert_eq!(report.download, "600 B/s");
    assert_eq!(report.upload, "500 B/s");
    assert_eq!(report.session_download, "2.00 KB");
    assert_eq!(report.session_upload, "10 B");
}
