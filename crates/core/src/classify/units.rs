//! Shared capacity-extraction primitive.
//!
//! Extracts a numeric magnitude in GB from free text via an ordered cascade
//! of regex attempts, first match wins:
//!
//! 1. exact unit match with decimal ("8.0 GB", "16GB", "16 gigabytes"),
//! 2. larger/smaller unit requiring conversion (MB divided by 1024, TB
//!    multiplied by 1024),
//! 3. malformed-unit repair ("16gGB", "1 TR") corrected and re-matched,
//! 4. bare numeric value, resolved by the caller's domain heuristic since
//!    the same literal means different things for RAM ("16" is 16 GB) and
//!    legacy exports ("16384" is MB).
//!
//! The cascade is deterministic and total: it always terminates and never
//! panics on arbitrary text. No match at all yields `None`, which callers
//! surface as an "Unknown" component.

use once_cell::sync::Lazy;
use regex::Regex;

use super::parse_number;

/// Which component family a capacity string belongs to. Controls the order
/// units are tried in: storage strings lead with TB ("1TB SSD"), memory
/// strings with GB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitFamily {
    Memory,
    Storage,
}

/// Unit the winning pattern matched, before conversion to GB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchedUnit {
    Gigabytes,
    Megabytes,
    Terabytes,
}

static GB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(?:gb|gigabytes?|gigas?)\b").expect("gb regex")
});

static MB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(?:mb|megabytes?)\b").expect("mb regex")
});

static TB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(?:tb|terabytes?|teras?)\b").expect("tb regex")
});

static BARE_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:[.,]\d+)?)").expect("bare number regex"));

/// Known unit typos seen in real exports: duplicated unit letters and the
/// "TR" mis-type for "TB". Applied before a second cascade pass.
static UNIT_REPAIRS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"(?i)g\s*gb\b").expect("ggb repair"), "gb"),
        (Regex::new(r"(?i)gbb\b").expect("gbb repair"), "gb"),
        (Regex::new(r"(?i)mbb\b").expect("mbb repair"), "mb"),
        (Regex::new(r"(?i)tbb\b").expect("tbb repair"), "tb"),
        (Regex::new(r"(?i)\btr\b").expect("tr repair"), "tb"),
        (Regex::new(r"(?i)(\d)tr\b").expect("digit tr repair"), "${1}tb"),
    ]
});

fn to_gigabytes(value: f64, unit: MatchedUnit) -> f64 {
    match unit {
        MatchedUnit::Gigabytes => value,
        MatchedUnit::Megabytes => value / 1024.0,
        MatchedUnit::Terabytes => value * 1024.0,
    }
}

fn try_units(text: &str, family: UnitFamily) -> Option<(f64, MatchedUnit)> {
    let order: [(&Lazy<Regex>, MatchedUnit); 3] = match family {
        UnitFamily::Memory => [
            (&GB_RE, MatchedUnit::Gigabytes),
            (&MB_RE, MatchedUnit::Megabytes),
            (&TB_RE, MatchedUnit::Terabytes),
        ],
        UnitFamily::Storage => [
            (&TB_RE, MatchedUnit::Terabytes),
            (&GB_RE, MatchedUnit::Gigabytes),
            (&MB_RE, MatchedUnit::Megabytes),
        ],
    };

    for (re, unit) in order {
        if let Some(caps) = re.captures(text) {
            if let Some(value) = parse_number(&caps[1]) {
                return Some((value, unit));
            }
        }
    }
    None
}

/// Steps 1-3 of the cascade: explicit unit, conversion, typo repair.
///
/// Returns the capacity converted to GB plus which unit matched, or `None`
/// when no unit-bearing pattern applies (step 4, the bare number, is left to
/// the caller because its heuristic is domain specific).
pub fn extract_unit_capacity(text: &str, family: UnitFamily) -> Option<(f64, MatchedUnit)> {
    if let Some((value, unit)) = try_units(text, family) {
        return Some((to_gigabytes(value, unit), unit));
    }

    let mut repaired = text.to_string();
    let mut changed = false;
    for (re, replacement) in UNIT_REPAIRS.iter() {
        if re.is_match(&repaired) {
            repaired = re.replace_all(&repaired, *replacement).into_owned();
            changed = true;
        }
    }
    if changed {
        if let Some((value, unit)) = try_units(&repaired, family) {
            log::debug!("repaired malformed unit in {:?} -> {:?}", text, repaired);
            return Some((to_gigabytes(value, unit), unit));
        }
    }

    None
}

/// Step 4: the first numeric token in the text, with no unit attached.
/// Interpretation (GB vs MB vs KB) is up to the caller.
pub fn extract_bare_number(text: &str) -> Option<f64> {
    BARE_NUMBER_RE.captures(text).and_then(|caps| parse_number(&caps[1]))
}
