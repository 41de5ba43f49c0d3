//! Minimum-specification policy: the `RuleSet` configuration object and the
//! compliance resolver that evaluates classified components against it.
//!
//! The rule set is read-only input, constructed once by the caller (default
//! policy or user customization) and passed by reference into every
//! classification call. There is no ambient "current rule set": frontends
//! resolve and inject the active configuration explicitly.
//!
//! JSON field names (`minGeneration`, `minSpeedGHz`, `minCapacityGB`,
//! `preferSSD`, ...) are a compatibility contract with the persistence layer
//! and must not change.

use serde::{Deserialize, Serialize};

use crate::model::{
    ClassifiedMemory, ClassifiedProcessor, ClassifiedStorage, ComplianceVerdict, DeviceType,
    DisplayUnit,
};

/// Thresholds for one processor family. A threshold of 0 means "no
/// constraint" and is always satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FamilyRule {
    #[serde(rename = "minGeneration")]
    pub min_generation: u32,
    #[serde(rename = "minSpeedGHz")]
    pub min_speed_ghz: f64,
}

impl FamilyRule {
    pub const fn new(min_generation: u32, min_speed_ghz: f64) -> Self {
        Self { min_generation, min_speed_ghz }
    }

    /// No constraints; the family always passes.
    pub const fn unconstrained() -> Self {
        Self::new(0, 0.0)
    }
}

/// Optional relaxation: from `min_generation` onward, the lower
/// `min_speed_ghz` suffices instead of the family's base speed threshold.
///
/// Reproduces the richer legacy default for Ryzen 5 (3.5 GHz suffices from
/// 3rd Gen, else 3.7 GHz). Omitted from serialized rule sets unless set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelaxedSpeed {
    #[serde(rename = "minGeneration")]
    pub min_generation: u32,
    #[serde(rename = "minSpeedGHz")]
    pub min_speed_ghz: f64,
}

/// Thresholds and enablement for the "other" processor families (Xeon,
/// EPYC, Celeron, Pentium, Athlon and similar legacy lines).
///
/// When disabled, every such family fails with the generic reason. When
/// enabled, Xeon and EPYC keep their structural checks and the remaining
/// families are evaluated against the thresholds here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OtherRules {
    pub enabled: bool,
    #[serde(rename = "minGeneration")]
    pub min_generation: u32,
    #[serde(rename = "minSpeedGHz")]
    pub min_speed_ghz: f64,
}

/// Per-family processor policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorRules {
    #[serde(rename = "intelCoreI5")]
    pub intel_core_i5: FamilyRule,
    #[serde(rename = "intelCoreI7")]
    pub intel_core_i7: FamilyRule,
    #[serde(rename = "intelCoreI9")]
    pub intel_core_i9: FamilyRule,
    #[serde(rename = "amdRyzen5")]
    pub amd_ryzen_5: FamilyRule,
    #[serde(
        rename = "amdRyzen5Relaxed",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub amd_ryzen_5_relaxed: Option<RelaxedSpeed>,
    #[serde(rename = "amdRyzen7")]
    pub amd_ryzen_7: FamilyRule,
    #[serde(rename = "amdRyzen9")]
    pub amd_ryzen_9: FamilyRule,
    pub other: OtherRules,
}

/// RAM policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RamRules {
    #[serde(rename = "minCapacityGB")]
    pub min_capacity_gb: f64,
}

/// Storage policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StorageRules {
    #[serde(rename = "minCapacityGB")]
    pub min_capacity_gb: f64,
    #[serde(rename = "preferSSD")]
    pub prefer_ssd: bool,
}

/// The configurable minimum-specification policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub processor: ProcessorRules,
    pub ram: RamRules,
    pub storage: StorageRules,
}

impl Default for RuleSet {
    /// The embedded default policy: Core i5 needs 8th Gen and 3.0 GHz; i7
    /// needs 7th Gen; i9 always passes; Ryzen 5 needs 3.7 GHz (3.5 GHz from
    /// 3rd Gen); Ryzen 7/9 and Threadripper always pass; Xeon passes only on
    /// the "new model" pattern; EPYC always passes; 8 GB RAM; 256 GB storage
    /// with no SSD requirement.
    fn default() -> Self {
        Self {
            processor: ProcessorRules {
                intel_core_i5: FamilyRule::new(8, 3.0),
                intel_core_i7: FamilyRule::new(7, 0.0),
                intel_core_i9: FamilyRule::unconstrained(),
                amd_ryzen_5: FamilyRule::new(0, 3.7),
                amd_ryzen_5_relaxed: Some(RelaxedSpeed { min_generation: 3, min_speed_ghz: 3.5 }),
                amd_ryzen_7: FamilyRule::unconstrained(),
                amd_ryzen_9: FamilyRule::unconstrained(),
                other: OtherRules { enabled: true, min_generation: 0, min_speed_ghz: 0.0 },
            },
            ram: RamRules { min_capacity_gb: 8.0 },
            storage: StorageRules { min_capacity_gb: 256.0, prefer_ssd: false },
        }
    }
}

const GENERIC_PROCESSOR_REASON: &str = "Processor does not meet brand/model requirements";

/// Numeric generation from a classified processor's generation marker:
/// "8th Gen" is 8, "v3" is 3, "Gen 2" is 2.
pub fn generation_number(cpu: &ClassifiedProcessor) -> Option<u32> {
    let generation = cpu.generation.as_deref()?;
    let digits: String = generation.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Xeon "new model" structural check: E5/E7 v3 or later, a Gold/Silver/
/// Bronze/Platinum tier, or the E-2xxx line.
pub fn is_new_xeon(cpu: &ClassifiedProcessor) -> bool {
    if let Some(extra) = &cpu.extra_info {
        if matches!(extra.as_str(), "Gold" | "Silver" | "Bronze" | "Platinum") {
            return true;
        }
    }
    if let Some(model) = &cpu.model_number {
        if model.starts_with("E-2") {
            return true;
        }
        if model.starts_with("E5") || model.starts_with("E7") {
            if let Some(v) = generation_number(cpu) {
                return v >= 3;
            }
        }
    }
    false
}

fn evaluate_family_rule(
    cpu: &ClassifiedProcessor,
    rule: &FamilyRule,
    relaxed: Option<&RelaxedSpeed>,
) -> ComplianceVerdict {
    let generation = generation_number(cpu);

    // Generation check first, then speed; the first failure wins.
    if rule.min_generation > 0 {
        match generation {
            Some(n) if n >= rule.min_generation => {}
            Some(n) => {
                return ComplianceVerdict::fail(format!(
                    "Insufficient generation: {} detected, requires generation {} or newer",
                    n, rule.min_generation
                ));
            }
            None => {
                return ComplianceVerdict::fail(format!(
                    "Insufficient generation: unknown, requires generation {} or newer",
                    rule.min_generation
                ));
            }
        }
    }

    let required_speed = match relaxed {
        Some(rel) if generation.map_or(false, |n| n >= rel.min_generation) => rel.min_speed_ghz,
        _ => rule.min_speed_ghz,
    };
    if required_speed > 0.0 {
        let detected = cpu.clock_speed_ghz.unwrap_or(0.0);
        if detected < required_speed {
            return ComplianceVerdict::fail(format!(
                "Insufficient clock speed: {:.1} GHz detected, requires at least {:.1} GHz",
                detected, required_speed
            ));
        }
    }

    ComplianceVerdict::pass()
}

/// Evaluate a classified processor against the rule set.
///
/// Families without an entry, and "other" families when disabled, fail with
/// a generic reason rather than a threshold-specific one.
pub fn evaluate_processor(cpu: &ClassifiedProcessor, rules: &RuleSet) -> ComplianceVerdict {
    let p = &rules.processor;
    match cpu.family.as_str() {
        "Core i5" => evaluate_family_rule(cpu, &p.intel_core_i5, None),
        "Core i7" => evaluate_family_rule(cpu, &p.intel_core_i7, None),
        "Core i9" => evaluate_family_rule(cpu, &p.intel_core_i9, None),
        "Ryzen 5" => evaluate_family_rule(cpu, &p.amd_ryzen_5, p.amd_ryzen_5_relaxed.as_ref()),
        "Ryzen 7" => evaluate_family_rule(cpu, &p.amd_ryzen_7, None),
        "Ryzen 9" => evaluate_family_rule(cpu, &p.amd_ryzen_9, None),
        "Ryzen Threadripper" => ComplianceVerdict::pass(),
        "EPYC" => {
            if p.other.enabled {
                ComplianceVerdict::pass()
            } else {
                ComplianceVerdict::fail(GENERIC_PROCESSOR_REASON)
            }
        }
        "Xeon" => {
            if !p.other.enabled {
                ComplianceVerdict::fail(GENERIC_PROCESSOR_REASON)
            } else if is_new_xeon(cpu) {
                ComplianceVerdict::pass()
            } else {
                ComplianceVerdict::fail(
                    "Xeon model predates the supported lines (E5/E7 v3+, Gold/Silver/Bronze/Platinum, E-2xxx)",
                )
            }
        }
        "Celeron" | "Pentium" | "Atom" | "Athlon" | "Phenom" | "Phenom II" | "FX" | "A4"
        | "A6" | "A8" | "A10" | "A12" => {
            if !p.other.enabled {
                ComplianceVerdict::fail(GENERIC_PROCESSOR_REASON)
            } else {
                let rule = FamilyRule::new(p.other.min_generation, p.other.min_speed_ghz);
                evaluate_family_rule(cpu, &rule, None)
            }
        }
        _ => ComplianceVerdict::fail(GENERIC_PROCESSOR_REASON),
    }
}

fn format_gb_or_tb(capacity_gb: f64) -> String {
    if capacity_gb >= 1000.0 {
        format!("{:.1} TB", (capacity_gb / 102.4).round() / 10.0)
    } else {
        format!("{:.0} GB", capacity_gb)
    }
}

/// Evaluate classified memory: passes iff capacity meets the RAM minimum.
pub fn evaluate_memory(memory: &ClassifiedMemory, rules: &RuleSet) -> ComplianceVerdict {
    let required = rules.ram.min_capacity_gb;
    if memory.capacity_gb >= required {
        ComplianceVerdict::pass()
    } else {
        ComplianceVerdict::fail(format!(
            "Insufficient RAM: {} detected, requires at least {}",
            format_gb_or_tb(memory.capacity_gb),
            format_gb_or_tb(required)
        ))
    }
}

/// Evaluate classified storage: capacity threshold first, then the SSD
/// requirement. Sufficient capacity on a non-SSD device fails with the
/// distinct SSD reason.
pub fn evaluate_storage(storage: &ClassifiedStorage, rules: &RuleSet) -> ComplianceVerdict {
    let required = rules.storage.min_capacity_gb;
    if storage.capacity_gb < required {
        let observed = match storage.display_unit {
            DisplayUnit::Tb => format!("{:.1} TB", storage.display_capacity),
            DisplayUnit::Gb => format!("{:.0} GB", storage.display_capacity),
        };
        return ComplianceVerdict::fail(format!(
            "Insufficient storage: {} detected, requires at least {}",
            observed,
            format_gb_or_tb(required)
        ));
    }
    if rules.storage.prefer_ssd && storage.device_type != DeviceType::Ssd {
        return ComplianceVerdict::fail(format!(
            "SSD required but {} detected",
            match storage.device_type {
                DeviceType::Hdd => "HDD",
                _ => "another device type",
            }
        ));
    }
    ComplianceVerdict::pass()
}
