//! Memory (RAM) classifier.
//!
//! Extracts a capacity via the shared unit cascade, rounds it to a canonical
//! commercial size, and picks up the DDR generation and clock speed when the
//! text mentions them.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Classification, ClassifiedMemory, MemoryType};

use super::units::{extract_bare_number, extract_unit_capacity, UnitFamily};
use super::{format_quantity, normalize_for_match};

/// Commercially standard RAM capacities used to round noisy input.
///
/// 2 GB is kept in the set for rule-set authors, but the `< 4` floor in
/// [`round_to_canonical_size`] makes it unreachable from classification.
pub const CANONICAL_SIZES_GB: [f64; 14] =
    [2.0, 4.0, 6.0, 8.0, 12.0, 16.0, 24.0, 32.0, 48.0, 64.0, 96.0, 128.0, 256.0, 512.0];

static MEMORY_CLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d{3,5})\s*(?:mhz|hz)\b").expect("memory clock regex"));

static DDR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)ddr([2-5])?").expect("ddr regex"));

/// Round a raw capacity to the nearest canonical size.
///
/// Zero and negative stay 0 (unknown); any positive value below 4 rounds up
/// to 4, since no commercially meaningful module is smaller today. Ties go
/// to the smaller size.
pub fn round_to_canonical_size(capacity_gb: f64) -> f64 {
    if capacity_gb <= 0.0 {
        return 0.0;
    }
    if capacity_gb < 4.0 {
        return 4.0;
    }
    let mut best = CANONICAL_SIZES_GB[0];
    let mut best_distance = f64::INFINITY;
    for &size in &CANONICAL_SIZES_GB {
        let distance = (capacity_gb - size).abs();
        if distance < best_distance {
            best = size;
            best_distance = distance;
        }
    }
    best
}

/// Resolve a bare number with no unit into GB.
///
/// Spreadsheet exports frequently report RAM in raw MB ("16384") or even KB
/// with no unit, so magnitude decides: up to 64 is already GB, up to 65536
/// is MB, anything larger is KB.
pub fn bare_number_heuristic(value: f64) -> f64 {
    if value <= 64.0 {
        value
    } else if value <= 65536.0 {
        value / 1024.0
    } else {
        value / (1024.0 * 1024.0)
    }
}

fn detect_memory_type(cleaned: &str) -> MemoryType {
    match DDR_RE.captures(cleaned) {
        Some(caps) => match caps.get(1).map(|m| m.as_str()) {
            Some("2") => MemoryType::Ddr2,
            Some("3") => MemoryType::Ddr3,
            Some("4") => MemoryType::Ddr4,
            Some("5") => MemoryType::Ddr5,
            _ => MemoryType::Ddr,
        },
        None => MemoryType::Ddr,
    }
}

fn unknown_memory(original: &str, reason: &str) -> Classification<ClassifiedMemory> {
    Classification::Degraded {
        value: ClassifiedMemory {
            original_text: original.to_string(),
            capacity_gb: 0.0,
            memory_type: MemoryType::Unknown,
            clock_speed_mhz: None,
            normalized_label: "Unknown".to_string(),
        },
        reason: reason.to_string(),
    }
}

/// Classify one raw memory cell. Total: never panics, degrades to "Unknown".
pub fn classify_memory(text: &str) -> Classification<ClassifiedMemory> {
    let original = text.trim();
    if original.is_empty() {
        return unknown_memory(text, "empty memory field");
    }

    let cleaned = normalize_for_match(text);

    let memory_type = detect_memory_type(&cleaned);
    let clock_speed_mhz = MEMORY_CLOCK_RE
        .captures(&cleaned)
        .and_then(|caps| caps[1].parse::<u32>().ok());

    // DDR generation digits and clock numbers would fool the bare-number
    // fallback, so they are blanked before the capacity cascade runs.
    let mut capacity_text = MEMORY_CLOCK_RE.replace_all(&cleaned, " ").into_owned();
    capacity_text = DDR_RE.replace_all(&capacity_text, " ").into_owned();

    let raw_gb = match extract_unit_capacity(&capacity_text, UnitFamily::Memory) {
        Some((gb, _unit)) => gb,
        None => match extract_bare_number(&capacity_text) {
            Some(value) => bare_number_heuristic(value),
            None => return unknown_memory(text, "no memory capacity detected"),
        },
    };

    if raw_gb <= 0.0 {
        return unknown_memory(text, "no memory capacity detected");
    }

    let capacity_gb = round_to_canonical_size(raw_gb);
    log::debug!("memory {:?}: raw {:.2} GB -> canonical {} GB", text, raw_gb, capacity_gb);

    let mut label = format!("{} GB", format_quantity(capacity_gb));
    if memory_type != MemoryType::Ddr {
        label.push(' ');
        label.push_str(memory_type.as_str());
    }
    if let Some(mhz) = clock_speed_mhz {
        label.push_str(&format!(" {} MHz", mhz));
    }

    Classification::Classified(ClassifiedMemory {
        original_text: text.to_string(),
        capacity_gb,
        memory_type,
        clock_speed_mhz,
        normalized_label: label,
    })
}
