//! Core data model for classified hardware components and dataset records.
//!
//! Everything here is a plain serde-friendly value type. Classification never
//! fails with an error: malformed input produces a [`Classification::Degraded`]
//! value carrying an "Unknown" component plus the reason, so downstream
//! aggregation can distinguish absent data from successfully-classified
//! non-compliant hardware.

use serde::{Deserialize, Serialize};

/// Processor brand, detected from free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Brand {
    Intel,
    #[serde(rename = "AMD")]
    Amd,
    Qualcomm,
    Apple,
    #[serde(rename = "ARM")]
    Arm,
    Samsung,
    Other,
}

impl Brand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Brand::Intel => "Intel",
            Brand::Amd => "AMD",
            Brand::Qualcomm => "Qualcomm",
            Brand::Apple => "Apple",
            Brand::Arm => "ARM",
            Brand::Samsung => "Samsung",
            Brand::Other => "Other",
        }
    }
}

/// DDR generation of a memory module.
///
/// `Ddr` means "DDR of unspecified generation": the text mentioned nothing
/// more precise, which is the common case in inventory spreadsheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryType {
    #[serde(rename = "DDR2")]
    Ddr2,
    #[serde(rename = "DDR3")]
    Ddr3,
    #[serde(rename = "DDR4")]
    Ddr4,
    #[serde(rename = "DDR5")]
    Ddr5,
    #[serde(rename = "DDR")]
    Ddr,
    Unknown,
}

impl MemoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryType::Ddr2 => "DDR2",
            MemoryType::Ddr3 => "DDR3",
            MemoryType::Ddr4 => "DDR4",
            MemoryType::Ddr5 => "DDR5",
            MemoryType::Ddr => "DDR",
            MemoryType::Unknown => "Unknown",
        }
    }
}

/// Storage device technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceType {
    #[serde(rename = "SSD")]
    Ssd,
    #[serde(rename = "HDD")]
    Hdd,
    Unknown,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Ssd => "SSD",
            DeviceType::Hdd => "HDD",
            DeviceType::Unknown => "Unknown",
        }
    }
}

/// Unit used when presenting a storage capacity to humans.
///
/// TB is used iff the canonical capacity is at least 1000 GB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayUnit {
    #[serde(rename = "GB")]
    Gb,
    #[serde(rename = "TB")]
    Tb,
}

impl DisplayUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayUnit::Gb => "GB",
            DisplayUnit::Tb => "TB",
        }
    }
}

/// Normalized view of one processor description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedProcessor {
    /// Cell text exactly as it appeared in the spreadsheet.
    pub original_text: String,
    pub brand: Brand,
    /// Product line within the brand, e.g. "Core i5", "Ryzen 7", "Xeon".
    /// "Unknown" when nothing matched.
    pub family: String,
    /// Model number as printed, e.g. "8500", "2600X", "E5-2670".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_number: Option<String>,
    /// Vendor generation marker, e.g. "8th Gen", "v3", "Gen 2".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<String>,
    /// Decoded meaning of a trailing model-number letter, e.g. "Unlocked multiplier".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture_suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock_speed_ghz: Option<f64>,
    /// Variant tags that are not a model number: Xeon metal tier, Snapdragon
    /// Plus/Ultra, Apple Pro/Max/Ultra, FX core count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_info: Option<String>,
    pub normalized_label: String,
}

/// Normalized view of one memory description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedMemory {
    pub original_text: String,
    /// Capacity rounded to a canonical commercial size; 0 when unknown.
    pub capacity_gb: f64,
    pub memory_type: MemoryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock_speed_mhz: Option<u32>,
    pub normalized_label: String,
}

/// Normalized view of one storage description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedStorage {
    pub original_text: String,
    /// Capacity rounded to a commercial size; 0 when unknown.
    pub capacity_gb: f64,
    pub device_type: DeviceType,
    /// Capacity in `display_unit` units, e.g. 1.0 for a 1024 GB drive shown in TB.
    pub display_capacity: f64,
    pub display_unit: DisplayUnit,
    pub normalized_label: String,
}

/// Outcome of classifying one component.
///
/// `Degraded` still carries a usable (zeroed/"Unknown") value, so every
/// consumer can treat both arms uniformly while the reason stays available
/// for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification<T> {
    Classified(T),
    Degraded { value: T, reason: String },
}

impl<T> Classification<T> {
    pub fn value(&self) -> &T {
        match self {
            Classification::Classified(v) => v,
            Classification::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Classification::Classified(v) => v,
            Classification::Degraded { value, .. } => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Classification::Degraded { .. })
    }

    pub fn degraded_reason(&self) -> Option<&str> {
        match self {
            Classification::Classified(_) => None,
            Classification::Degraded { reason, .. } => Some(reason),
        }
    }
}

/// Pass/fail outcome for a single component against a rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceVerdict {
    pub passes: bool,
    /// Empty iff `passes`.
    pub reason: String,
}

impl ComplianceVerdict {
    pub fn pass() -> Self {
        Self { passes: true, reason: String::new() }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self { passes: false, reason: reason.into() }
    }
}

/// Combined verdict for one inventory row.
///
/// `overall_reason` is the first failing component's reason in the fixed
/// precedence order Processor, Memory, Storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordVerdict {
    pub overall_passes: bool,
    pub overall_reason: String,
}

/// One spreadsheet row: ordered (column name, cell text) pairs.
///
/// Order is preserved because the output-row contract appends normalized
/// fields after the original ones.
pub type Row = Vec<(String, String)>;

/// One fully-processed inventory row.
///
/// Created per row during ingestion and never mutated afterward; the
/// aggregator folds over these and external collaborators persist or export
/// them unchanged. Memory/storage fields are `None` when the dataset has no
/// such column (that component is then treated as passing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub row: Row,
    pub processor: Classification<ClassifiedProcessor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<Classification<ClassifiedMemory>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<Classification<ClassifiedStorage>>,
    pub processor_verdict: ComplianceVerdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_verdict: Option<ComplianceVerdict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_verdict: Option<ComplianceVerdict>,
    pub verdict: RecordVerdict,
}
