//! Storage classifier.
//!
//! Detects the device technology (SSD/HDD) from keywords, extracts a
//! capacity via the shared unit cascade (TB patterns first), and rounds it
//! to a commercial size using a tiered range table with a device-type-aware
//! nearest-neighbor fallback.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Classification, ClassifiedStorage, DeviceType, DisplayUnit};

use super::units::{extract_bare_number, extract_unit_capacity, UnitFamily};
use super::{format_quantity, normalize_for_match};

/// Tiered commercial-size table: a capacity at or below the bound (in GB)
/// rounds to the paired size. Values above the last bound are handled by the
/// whole-TB rule and the nearest-neighbor fallback.
const COMMERCIAL_TIERS: [(f64, f64); 10] = [
    (20.0, 16.0),
    (50.0, 32.0),
    (80.0, 64.0),
    (130.0, 120.0),
    (220.0, 128.0),
    (280.0, 250.0),
    (400.0, 320.0),
    (490.0, 480.0),
    (600.0, 500.0),
    (800.0, 750.0),
];

/// Sizes typical of SSDs, used by the fallback for sub-200 GB or
/// explicitly-SSD ambiguous values.
const SSD_TYPICAL_GB: [f64; 12] =
    [16.0, 32.0, 64.0, 120.0, 128.0, 250.0, 256.0, 480.0, 500.0, 512.0, 1000.0, 2000.0];

/// Sizes typical of spinning disks, preferred for ambiguous values of
/// 200 GB and up.
const HDD_TYPICAL_GB: [f64; 6] = [250.0, 320.0, 500.0, 750.0, 1000.0, 2000.0];

/// Relative distance within which a nearest-neighbor candidate is accepted.
const NEAREST_NEIGHBOR_TOLERANCE: f64 = 0.15;

static SSD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bssd\b|solid[ -]?state|\bnvme\b|estado s[oó]lido").expect("ssd regex")
});

static HDD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bhdd\b|hard[ -]?drive|hard[ -]?disk|mechanical|disco duro").expect("hdd regex")
});

/// Bare number immediately followed by a device-type token, e.g. "500 SSD".
static BARE_WITH_TYPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(?:ssd|hdd)\b").expect("bare-with-type regex")
});

/// Round raw TB-granularity capacities to whole-TB display buckets: 1024 GB
/// becomes the 1000 GB bucket, 2048 GB the 2000 GB bucket.
fn round_to_whole_tb(capacity_gb: f64) -> f64 {
    let tb = (capacity_gb / 1024.0).round().max(1.0);
    tb * 1000.0
}

fn nearest_typical(capacity_gb: f64, candidates: &[f64]) -> Option<f64> {
    let mut best: Option<f64> = None;
    let mut best_distance = f64::INFINITY;
    for &size in candidates {
        let distance = (capacity_gb - size).abs();
        if distance < best_distance {
            best = Some(size);
            best_distance = distance;
        }
    }
    let size = best?;
    let relative = (capacity_gb - size).abs() / capacity_gb;
    if relative <= NEAREST_NEIGHBOR_TOLERANCE {
        Some(size)
    } else {
        None
    }
}

/// Round a raw capacity to a commercial size.
///
/// Tier table first; at and above 900 GB capacities snap to whole-TB
/// buckets; the gap in between is resolved by nearest-neighbor against
/// device-typical sizes (HDD-typical for HDDs and for ambiguous values of
/// 200 GB and up, SSD-typical otherwise), falling back to the whole-TB rule
/// when nothing is within 15% relative distance.
pub fn round_to_commercial_size(capacity_gb: f64, device_type: DeviceType) -> f64 {
    if capacity_gb <= 0.0 {
        return 0.0;
    }
    for (bound, size) in COMMERCIAL_TIERS {
        if capacity_gb <= bound {
            return size;
        }
    }
    if capacity_gb >= 900.0 {
        return round_to_whole_tb(capacity_gb);
    }

    let prefer_hdd = device_type == DeviceType::Hdd
        || (device_type == DeviceType::Unknown && capacity_gb >= 200.0);
    let candidates: &[f64] = if prefer_hdd { &HDD_TYPICAL_GB } else { &SSD_TYPICAL_GB };
    nearest_typical(capacity_gb, candidates).unwrap_or_else(|| round_to_whole_tb(capacity_gb))
}

/// Display conversion: 1000 GB and up are shown in TB.
///
/// The TB value intentionally preserves the legacy `round(gb / 102.4) / 10`
/// formula so output matches existing exports digit for digit.
pub fn display_capacity(capacity_gb: f64) -> (f64, DisplayUnit) {
    if capacity_gb >= 1000.0 {
        ((capacity_gb / 102.4).round() / 10.0, DisplayUnit::Tb)
    } else {
        (capacity_gb, DisplayUnit::Gb)
    }
}

fn detect_device_type(cleaned: &str) -> DeviceType {
    if SSD_RE.is_match(cleaned) {
        DeviceType::Ssd
    } else if HDD_RE.is_match(cleaned) {
        DeviceType::Hdd
    } else {
        DeviceType::Unknown
    }
}

fn unknown_storage(original: &str, device_type: DeviceType, reason: &str) -> Classification<ClassifiedStorage> {
    Classification::Degraded {
        value: ClassifiedStorage {
            original_text: original.to_string(),
            capacity_gb: 0.0,
            device_type,
            display_capacity: 0.0,
            display_unit: DisplayUnit::Gb,
            normalized_label: "Unknown".to_string(),
        },
        reason: reason.to_string(),
    }
}

/// Classify one raw storage cell. Total: never panics, degrades to "Unknown".
pub fn classify_storage(text: &str) -> Classification<ClassifiedStorage> {
    let original = text.trim();
    if original.is_empty() {
        return unknown_storage(text, DeviceType::Unknown, "empty storage field");
    }

    let cleaned = normalize_for_match(text);
    let device_type = detect_device_type(&cleaned);

    // TB first, then GB/MB, then "500 SSD", then a pure bare number taken
    // as GB already.
    let raw_gb = match extract_unit_capacity(&cleaned, UnitFamily::Storage) {
        Some((gb, _unit)) => Some(gb),
        None => BARE_WITH_TYPE_RE
            .captures(&cleaned)
            .and_then(|caps| super::parse_number(&caps[1]))
            .or_else(|| extract_bare_number(&cleaned)),
    };

    let raw_gb = match raw_gb {
        Some(gb) if gb > 0.0 => gb,
        _ => return unknown_storage(text, device_type, "no storage capacity detected"),
    };

    let capacity_gb = round_to_commercial_size(raw_gb, device_type);
    let (display, unit) = display_capacity(capacity_gb);
    log::debug!(
        "storage {:?}: raw {:.2} GB -> commercial {} GB ({} {})",
        text,
        raw_gb,
        capacity_gb,
        format_quantity(display),
        unit.as_str()
    );

    let mut label = format!("{} {}", format_quantity(display), unit.as_str());
    if device_type != DeviceType::Unknown {
        label.push(' ');
        label.push_str(device_type.as_str());
    }

    Classification::Classified(ClassifiedStorage {
        original_text: text.to_string(),
        capacity_gb,
        device_type,
        display_capacity: display,
        display_unit: unit,
        normalized_label: label,
    })
}
