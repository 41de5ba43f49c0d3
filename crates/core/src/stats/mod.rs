//! Fleet-wide aggregate statistics.
//!
//! A single full pass over all records; nothing is updated incrementally.
//! Distributions use `BTreeMap` so serialization order is deterministic
//! regardless of row processing order. Field names and nesting are part of
//! the contract with downstream chart/report renderers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::DatasetRecord;

/// Memory sub-statistics. Counts cover rows where a memory column exists.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MemoryStatistics {
    pub count: usize,
    pub passed: usize,
    pub failed: usize,
    /// Distribution keyed by normalized size, e.g. "16 GB".
    #[serde(rename = "sizeDistribution")]
    pub size_distribution: BTreeMap<String, usize>,
    #[serde(rename = "meanCapacityGB")]
    pub mean_capacity_gb: f64,
}

/// Storage sub-statistics. Counts cover rows where a storage column exists.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StorageStatistics {
    pub count: usize,
    pub passed: usize,
    pub failed: usize,
    #[serde(rename = "byDeviceType")]
    pub by_device_type: BTreeMap<String, usize>,
    /// Distribution keyed by display capacity, e.g. "500 GB", "1 TB".
    #[serde(rename = "byCapacity")]
    pub by_capacity: BTreeMap<String, usize>,
    #[serde(rename = "meanCapacityGB")]
    pub mean_capacity_gb: f64,
}

/// Everything the chart/report renderers consume for one ingestion pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateStatistics {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    #[serde(rename = "passRate")]
    pub pass_rate: f64,
    #[serde(rename = "byBrand")]
    pub by_brand: BTreeMap<String, usize>,
    #[serde(rename = "byFamily")]
    pub by_family: BTreeMap<String, usize>,
    #[serde(rename = "byGeneration")]
    pub by_generation: BTreeMap<String, usize>,
    /// Distribution over "<Brand> <Family>" pairs, e.g. "Intel Core i5".
    #[serde(rename = "byBrandFamily")]
    pub by_brand_family: BTreeMap<String, usize>,
    #[serde(rename = "failureReasons")]
    pub failure_reasons: BTreeMap<String, usize>,
    pub ram: MemoryStatistics,
    pub storage: StorageStatistics,
}

fn bump(map: &mut BTreeMap<String, usize>, key: impl Into<String>) {
    *map.entry(key.into()).or_insert(0) += 1;
}

/// Fold all records into fleet statistics. Pure and deterministic: the same
/// records always produce the same statistics.
pub fn aggregate(records: &[DatasetRecord]) -> AggregateStatistics {
    let mut stats = AggregateStatistics { total: records.len(), ..Default::default() };

    let mut ram_capacity_sum = 0.0;
    let mut storage_capacity_sum = 0.0;

    for record in records {
        if record.verdict.overall_passes {
            stats.passed += 1;
        } else {
            stats.failed += 1;
            if !record.verdict.overall_reason.is_empty() {
                bump(&mut stats.failure_reasons, record.verdict.overall_reason.clone());
            }
        }

        let cpu = record.processor.value();
        bump(&mut stats.by_brand, cpu.brand.as_str());
        bump(&mut stats.by_family, cpu.family.clone());
        bump(
            &mut stats.by_generation,
            cpu.generation.clone().unwrap_or_else(|| "Unknown".to_string()),
        );
        bump(&mut stats.by_brand_family, format!("{} {}", cpu.brand.as_str(), cpu.family));

        if let (Some(memory), Some(verdict)) = (&record.memory, &record.memory_verdict) {
            let mem = memory.value();
            stats.ram.count += 1;
            if verdict.passes {
                stats.ram.passed += 1;
            } else {
                stats.ram.failed += 1;
            }
            bump(&mut stats.ram.size_distribution, format!("{:.0} GB", mem.capacity_gb));
            ram_capacity_sum += mem.capacity_gb;
        }

        if let (Some(storage), Some(verdict)) = (&record.storage, &record.storage_verdict) {
            let st = storage.value();
            stats.storage.count += 1;
            if verdict.passes {
                stats.storage.passed += 1;
            } else {
                stats.storage.failed += 1;
            }
            bump(&mut stats.storage.by_device_type, st.device_type.as_str());
            let capacity_key = format!(
                "{} {}",
                crate::classify::format_quantity(st.display_capacity),
                st.display_unit.as_str()
            );
            bump(&mut stats.storage.by_capacity, capacity_key);
            storage_capacity_sum += st.capacity_gb;
        }
    }

    if stats.total > 0 {
        stats.pass_rate = stats.passed as f64 / stats.total as f64;
    }
    if stats.ram.count > 0 {
        stats.ram.mean_capacity_gb = ram_capacity_sum / stats.ram.count as f64;
    }
    if stats.storage.count > 0 {
        stats.storage.mean_capacity_gb = storage_capacity_sum / stats.storage.count as f64;
    }

    stats
}
