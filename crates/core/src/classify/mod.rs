//! Free-text classifiers for the three hardware components.
//!
//! Each classifier is a pure, total function from raw cell text to a
//! [`Classification`](crate::model::Classification): no I/O, no shared state,
//! and no panics on arbitrary input. Malformed text degrades to an "Unknown"
//! value instead of failing.

pub mod memory;
pub mod processor;
pub mod storage;
pub mod units;

pub use memory::classify_memory;
pub use processor::classify_processor;
pub use storage::classify_storage;

use once_cell::sync::Lazy;
use regex::Regex;

static ANNOTATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^)]*\)|\[[^\]]*\]").expect("annotation regex"));

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Remove parenthetical and bracketed annotations, e.g. `"8 GB (2x4 GB)"`
/// becomes `"8 GB"`. Unclosed brackets are left alone.
pub(crate) fn strip_annotations(text: &str) -> String {
    ANNOTATION_RE.replace_all(text, " ").into_owned()
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").trim().to_string()
}

/// Standard cleanup used for matching: annotations stripped, whitespace
/// collapsed, lowercased. The original text is preserved separately for
/// output.
pub(crate) fn normalize_for_match(text: &str) -> String {
    collapse_whitespace(&strip_annotations(text)).to_lowercase()
}

/// Parse a decimal number that may use a comma as the decimal separator,
/// as Spanish-locale spreadsheet exports do ("3,2 GHz").
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    text.replace(',', ".").parse::<f64>().ok()
}

/// Format a capacity without a spurious trailing ".0": 16.0 renders as "16",
/// 1.5 as "1.5".
pub(crate) fn format_quantity(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}
