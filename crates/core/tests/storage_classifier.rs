use audit_core::classify::classify_storage;
use audit_core::classify::storage::{display_capacity, round_to_commercial_size};
use audit_core::model::{DeviceType, DisplayUnit};

/// "1 TB" converts to 1024 GB, rounds to the 1000 GB commercial bucket, and
/// displays as 1 TB.
#[test]
fn one_terabyte_normalizes_to_commercial_bucket() {
    let result = classify_storage("1 TB");
    let storage = result.value();
    assert_eq!(storage.capacity_gb, 1000.0);
    assert_eq!(storage.display_unit, DisplayUnit::Tb);
    assert_eq!(storage.display_capacity, 1.0);
    assert_eq!(storage.normalized_label, "1 TB");
}

#[test]
fn device_type_keywords_are_detected() {
    assert_eq!(classify_storage("500 GB SSD").value().device_type, DeviceType::Ssd);
    assert_eq!(classify_storage("500 GB solid state").value().device_type, DeviceType::Ssd);
    assert_eq!(classify_storage("NVMe 512GB").value().device_type, DeviceType::Ssd);
    assert_eq!(classify_storage("1TB HDD").value().device_type, DeviceType::Hdd);
    assert_eq!(classify_storage("hard drive 500GB").value().device_type, DeviceType::Hdd);
    assert_eq!(classify_storage("Disco duro 500 GB").value().device_type, DeviceType::Hdd);
    assert_eq!(classify_storage("500 GB").value().device_type, DeviceType::Unknown);
}

/// A bare number with a device-type suffix ("500 SSD") is still a capacity.
#[test]
fn bare_number_with_type_suffix() {
    let result = classify_storage("500 SSD");
    assert_eq!(result.value().capacity_gb, 500.0);
    assert_eq!(result.value().device_type, DeviceType::Ssd);
    assert_eq!(result.value().normalized_label, "500 GB SSD");
}

/// A pure bare number is assumed to already be GB.
#[test]
fn pure_bare_number_is_gigabytes() {
    assert_eq!(classify_storage("256").value().capacity_gb, 250.0);
    assert_eq!(classify_storage("120").value().capacity_gb, 120.0);
}

#[test]
fn tier_table_rounds_to_documented_sizes() {
    let cases = [
        (10.0, 16.0),
        (30.0, 32.0),
        (60.0, 64.0),
        (100.0, 120.0),
        (160.0, 128.0),
        (250.0, 250.0),
        (320.0, 320.0),
        (480.0, 480.0),
        (500.0, 500.0),
        (750.0, 750.0),
        (1024.0, 1000.0),
        (2048.0, 2000.0),
    ];
    for (input, expected) in cases {
        assert_eq!(
            round_to_commercial_size(input, DeviceType::Unknown),
            expected,
            "tier rounding for {}",
            input
        );
    }
}

/// Monotonic bucketing: a larger raw capacity never rounds to a smaller
/// commercial size, for any fixed device type.
#[test]
fn commercial_rounding_is_monotonic() {
    for device in [DeviceType::Ssd, DeviceType::Hdd, DeviceType::Unknown] {
        let mut previous = 0.0;
        let mut x = 1.0;
        while x < 3000.0 {
            let size = round_to_commercial_size(x, device);
            assert!(
                size >= previous,
                "inversion at {} ({:?}): {} < {}",
                x,
                device,
                size,
                previous
            );
            previous = size;
            x += 1.0;
        }
    }
}

/// The TB display conversion preserves the legacy round(gb/102.4)/10
/// formula.
#[test]
fn display_conversion_uses_legacy_formula() {
    assert_eq!(display_capacity(1000.0), (1.0, DisplayUnit::Tb));
    assert_eq!(display_capacity(2000.0), (2.0, DisplayUnit::Tb));
    assert_eq!(display_capacity(500.0), (500.0, DisplayUnit::Gb));
    assert_eq!(display_capacity(999.0), (999.0, DisplayUnit::Gb));
}

#[test]
fn malformed_input_degrades_to_unknown() {
    for text in ["", "  ", "disco"] {
        let result = classify_storage(text);
        assert!(result.is_degraded(), "expected degraded for {:?}", text);
        assert_eq!(result.value().capacity_gb, 0.0);
        assert_eq!(result.value().normalized_label, "Unknown");
    }
}

/// Device-type keywords survive even when the capacity is unreadable, so a
/// degraded record still reports what kind of disk it was.
#[test]
fn degraded_storage_keeps_device_type() {
    let result = classify_storage("ssd (capacity unreadable)");
    assert!(result.is_degraded());
    assert_eq!(result.value().device_type, DeviceType::Ssd);
}

/// Idempotence: re-classifying a normalized label keeps the same capacity
/// and device type.
#[test]
fn normalized_label_reparses_to_same_classification() {
    for text in ["1 TB", "500 GB SSD", "250gb hdd", "2TB"] {
        let first = classify_storage(text);
        let second = classify_storage(&first.value().normalized_label);
        assert_eq!(first.value().capacity_gb, second.value().capacity_gb);
        assert_eq!(first.value().device_type, second.value().device_type);
    }
}
