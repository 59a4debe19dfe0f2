//! Rate and usage formatting for the icon and the status text.
//!
//! All fractional output is truncated, never rounded: 2047 bytes is "1.99 KB",
//! not "2.00 KB". Fractions are computed in integer fixed point so that no
//! float formatting is involved.

use crate::models::{Deltas, IconText, TickReport};

const KIB: i64 = 1024;
const MIB: i64 = KIB * 1024;
const GIB: i64 = MIB * 1024;

/// Upper bound (inclusive) of the integer "K/s" row of the compact table.
const COMPACT_KIB_MAX: i64 = 999 * KIB;
/// Below this the compact "M/s" form keeps one fractional digit.
const COMPACT_MIB_INTEGER_FROM: i64 = 10 * MIB;

/// `value / divisor` with exactly `digits` fractional digits, truncated.
/// Callers only pass non-negative values.
fn truncated(value: i64, divisor: i64, digits: u32) -> String {
    let whole = value / divisor;
    let scale = 10_i64.pow(digits);
    let frac = (value % divisor) * scale / divisor;
    format!("{whole}.{frac:0width$}", width = digits as usize)
}

/// Compact form for the icon glyph: short magnitude plus a two/three letter unit.
///
/// Negative input (counter reset) falls into the bytes row and renders as-is.
pub fn format_rate_compact(bytes_per_sec: i64) -> IconText {
    let v = bytes_per_sec;
    if v < 1000 {
        IconText::new(v.to_string(), "B/s")
    } else if v < KIB {
        IconText::new(truncated(v, KIB, 1), "K/s")
    } else if v <= COMPACT_KIB_MAX {
        IconText::new((v / KIB).to_string(), "K/s")
    } else if v < COMPACT_MIB_INTEGER_FROM {
        IconText::new(truncated(v, MIB, 1), "M/s")
    } else {
        IconText::new((v / MIB).to_string(), "M/s")
    }
}

/// Verbose form for the status text, e.g. "12.34 Kb/s".
pub fn format_rate_verbose(bytes_per_sec: i64) -> String {
    let v = bytes_per_sec;
    if v < KIB {
        format!("{v} B/s")
    } else if v < MIB {
        format!("{} Kb/s", truncated(v, KIB, 2))
    } else {
        format!("{} Mb/s", truncated(v, MIB, 2))
    }
}

/// Cumulative session usage, e.g. "3.07 GB".
pub fn format_usage(bytes: i64) -> String {
    let v = bytes;
    if v < KIB {
        format!("{v} B")
    } else if v < MIB {
        format!("{} KB", truncated(v, KIB, 2))
    } else if v < GIB {
        format!("{} MB", truncated(v, MIB, 2))
    } else {
        format!("{} GB", truncated(v, GIB, 2))
    }
}

/// Renders one tick: the icon shows the combined rate, the text lines show
/// each direction separately.
pub fn format_report(deltas: &Deltas) -> TickReport {
    TickReport {
        icon: format_rate_compact(deltas.total_rate()),
        download: format_rate_verbose(deltas.download_rate),
        upload: format_rate_verbose(deltas.upload_rate),
        session_download: format_usage(deltas.session_download),
        session_upload: format_usage(deltas.session_upload),
    }
}
