use audit_core::classify::classify_memory;
use audit_core::classify::memory::{
    bare_number_heuristic, round_to_canonical_size, CANONICAL_SIZES_GB,
};
use audit_core::model::MemoryType;

/// Bare "16384" is a raw-MB legacy export and normalizes to 16 GB.
#[test]
fn bare_number_in_megabytes_is_detected() {
    let result = classify_memory("16384");
    assert!(!result.is_degraded());
    let memory = result.value();
    assert_eq!(memory.capacity_gb, 16.0);
    assert_eq!(memory.normalized_label, "16 GB");
}

/// "1000" with no unit reads as 1000 MB, which lands below the 4 GB floor.
#[test]
fn bare_thousand_rounds_up_to_the_floor() {
    let result = classify_memory("1000");
    assert_eq!(result.value().capacity_gb, 4.0);
    assert_eq!(result.value().normalized_label, "4 GB");
}

#[test]
fn bare_small_number_is_already_gigabytes() {
    assert_eq!(classify_memory("16").value().capacity_gb, 16.0);
    assert_eq!(classify_memory("8").value().capacity_gb, 8.0);
}

#[test]
fn ddr_generation_and_clock_are_extracted() {
    let result = classify_memory("8 GB DDR4 2400MHz");
    let memory = result.value();
    assert_eq!(memory.capacity_gb, 8.0);
    assert_eq!(memory.memory_type, MemoryType::Ddr4);
    assert_eq!(memory.clock_speed_mhz, Some(2400));
    assert_eq!(memory.normalized_label, "8 GB DDR4 2400 MHz");
}

/// Plain "DDR" with no digit stays the unspecified generation and is
/// omitted from the label.
#[test]
fn unspecified_ddr_is_omitted_from_label() {
    let result = classify_memory("16 GB DDR");
    assert_eq!(result.value().memory_type, MemoryType::Ddr);
    assert_eq!(result.value().normalized_label, "16 GB");
}

#[test]
fn parenthetical_annotations_are_ignored() {
    let result = classify_memory("8 GB (2x4 GB)");
    assert_eq!(result.value().capacity_gb, 8.0);
}

/// Empty or unparseable input degrades to Unknown with a reason; it never
/// raises.
#[test]
fn malformed_input_degrades_to_unknown() {
    for text in ["", "   ", "sin datos", "???"] {
        let result = classify_memory(text);
        assert!(result.is_degraded(), "expected degraded for {:?}", text);
        let memory = result.value();
        assert_eq!(memory.capacity_gb, 0.0);
        assert_eq!(memory.memory_type, MemoryType::Unknown);
        assert_eq!(memory.normalized_label, "Unknown");
        assert!(result.degraded_reason().is_some());
    }
}

/// Rounding closure: every non-negative input maps into the canonical set,
/// and every positive value below 4 maps to exactly 4.
#[test]
fn rounding_closure_over_canonical_set() {
    let mut x = 0.1;
    while x < 600.0 {
        let rounded = round_to_canonical_size(x);
        assert!(
            CANONICAL_SIZES_GB.contains(&rounded),
            "{} rounded to non-canonical {}",
            x,
            rounded
        );
        if x < 4.0 {
            assert_eq!(rounded, 4.0, "floor violated for {}", x);
        }
        x += 0.7;
    }
    assert_eq!(round_to_canonical_size(0.0), 0.0);
    assert_eq!(round_to_canonical_size(-5.0), 0.0);
}

#[test]
fn bare_number_heuristic_tiers() {
    assert_eq!(bare_number_heuristic(16.0), 16.0);
    assert_eq!(bare_number_heuristic(64.0), 64.0);
    assert_eq!(bare_number_heuristic(16384.0), 16.0);
    assert_eq!(bare_number_heuristic(65536.0), 64.0);
    assert_eq!(bare_number_heuristic(16_777_216.0), 16.0);
}

/// Idempotence: re-classifying a normalized label yields the same capacity.
#[test]
fn normalized_label_reparses_to_same_capacity() {
    for text in ["16384", "8 GB DDR4 2400MHz", "32 gb", "0.5 TB"] {
        let first = classify_memory(text);
        let second = classify_memory(&first.value().normalized_label);
        assert_eq!(
            first.value().capacity_gb,
            second.value().capacity_gb,
            "idempotence failed for {:?}",
            text
        );
    }
}
