use audit_core::dataset::process_dataset;
use audit_core::model::Row;
use audit_core::rules::RuleSet;
use audit_core::stats::aggregate;

fn row(cells: &[(&str, &str)]) -> Row {
    cells.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn fleet() -> Vec<Row> {
    vec![
        row(&[("CPU", "Intel Core i5-8500 3.0GHz"), ("RAM", "16 GB"), ("Disco", "500 GB SSD")]),
        row(&[("CPU", "Intel Core i5-9400 2.9GHz"), ("RAM", "8 GB"), ("Disco", "1 TB HDD")]),
        row(&[("CPU", "AMD Ryzen 7 5800X"), ("RAM", "32 GB"), ("Disco", "1 TB SSD")]),
        row(&[("CPU", "Intel Core i3-2100"), ("RAM", "4 GB"), ("Disco", "120 GB")]),
    ]
}

#[test]
fn counts_and_pass_rate() {
    let report = process_dataset(&fleet(), &RuleSet::default()).expect("report");
    let stats = &report.statistics;

    assert_eq!(stats.total, 4);
    // i5-8500 passes; i5-9400 fails the 3.0 GHz floor; Ryzen 7 passes; i3
    // fails generically (and on RAM and storage).
    assert_eq!(stats.passed, 2);
    assert_eq!(stats.failed, 2);
    assert_eq!(stats.pass_rate, 0.5);
}

#[test]
fn brand_and_family_distributions() {
    let report = process_dataset(&fleet(), &RuleSet::default()).expect("report");
    let stats = &report.statistics;

    assert_eq!(stats.by_brand.get("Intel"), Some(&3));
    assert_eq!(stats.by_brand.get("AMD"), Some(&1));
    assert_eq!(stats.by_family.get("Core i5"), Some(&2));
    assert_eq!(stats.by_family.get("Core i3"), Some(&1));
    assert_eq!(stats.by_family.get("Ryzen 7"), Some(&1));
    assert_eq!(stats.by_brand_family.get("Intel Core i5"), Some(&2));
    assert_eq!(stats.by_brand_family.get("AMD Ryzen 7"), Some(&1));
}

/// Rows with no detected generation land in the "Unknown" bucket.
#[test]
fn generation_distribution_has_unknown_bucket() {
    let rows = vec![
        row(&[("CPU", "Intel Core i5-8500")]),
        row(&[("CPU", "Intel Xeon Gold 6230")]),
    ];
    let report = process_dataset(&rows, &RuleSet::default()).expect("report");
    let stats = &report.statistics;

    assert_eq!(stats.by_generation.get("8th Gen"), Some(&1));
    assert_eq!(stats.by_generation.get("Unknown"), Some(&1));
}

#[test]
fn failure_reasons_are_tallied_by_text() {
    let rows = vec![
        row(&[("CPU", "Intel Core i5-6500 3.2GHz")]),
        row(&[("CPU", "Intel Core i5-6600 3.3GHz")]),
        row(&[("CPU", "???")]),
    ];
    let report = process_dataset(&rows, &RuleSet::default()).expect("report");
    let stats = &report.statistics;

    assert_eq!(stats.failed, 3);
    // Both 6th Gen parts fail with the identical generation reason, so they
    // share one bucket.
    let generation_bucket = stats
        .failure_reasons
        .iter()
        .find(|(reason, _)| reason.contains("generation"))
        .map(|(_, count)| *count);
    assert_eq!(generation_bucket, Some(2));
}

#[test]
fn memory_and_storage_sub_statistics() {
    let report = process_dataset(&fleet(), &RuleSet::default()).expect("report");
    let stats = &report.statistics;

    assert_eq!(stats.ram.count, 4);
    assert_eq!(stats.ram.passed, 3);
    assert_eq!(stats.ram.failed, 1);
    assert_eq!(stats.ram.size_distribution.get("16 GB"), Some(&1));
    assert_eq!(stats.ram.size_distribution.get("4 GB"), Some(&1));
    assert_eq!(stats.ram.mean_capacity_gb, (16.0 + 8.0 + 32.0 + 4.0) / 4.0);

    assert_eq!(stats.storage.count, 4);
    assert_eq!(stats.storage.by_device_type.get("SSD"), Some(&2));
    assert_eq!(stats.storage.by_device_type.get("HDD"), Some(&1));
    assert_eq!(stats.storage.by_device_type.get("Unknown"), Some(&1));
    assert_eq!(stats.storage.by_capacity.get("1 TB"), Some(&2));
    assert_eq!(stats.storage.by_capacity.get("500 GB"), Some(&1));
    assert_eq!(stats.storage.by_capacity.get("120 GB"), Some(&1));
    assert_eq!(stats.storage.mean_capacity_gb, (500.0 + 1000.0 + 1000.0 + 120.0) / 4.0);
}

/// A processor-only dataset leaves the sub-statistics zeroed.
#[test]
fn absent_components_leave_zeroed_sub_statistics() {
    let rows = vec![row(&[("CPU", "Intel Core i5-8500 3.0GHz")])];
    let report = process_dataset(&rows, &RuleSet::default()).expect("report");
    let stats = &report.statistics;

    assert_eq!(stats.ram.count, 0);
    assert_eq!(stats.ram.mean_capacity_gb, 0.0);
    assert_eq!(stats.storage.count, 0);
}

#[test]
fn empty_record_slice_aggregates_to_defaults() {
    let stats = aggregate(&[]);
    assert_eq!(stats.total, 0);
    assert_eq!(stats.pass_rate, 0.0);
    assert!(stats.by_brand.is_empty());
}

/// Aggregation is a pure fold: the same records always give the same
/// statistics.
#[test]
fn aggregation_is_deterministic() {
    let report = process_dataset(&fleet(), &RuleSet::default()).expect("report");
    let again = aggregate(&report.records);
    assert_eq!(report.statistics, again);
}
