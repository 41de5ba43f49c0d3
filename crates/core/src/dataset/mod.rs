//! Dataset ingestion: column discovery, per-row classification, record
//! verdicts, and assembly of the augmented output row.
//!
//! Rows are independent; each is classified in isolation and never mutated
//! afterward. Only two conditions are fatal: an empty dataset, and a header
//! row with no processor-indicating column. Everything else degrades to
//! "Unknown" classifications that surface as data.

use thiserror::Error;

use crate::classify::{classify_memory, classify_processor, classify_storage};
use crate::model::{DatasetRecord, RecordVerdict, Row};
use crate::rules::{evaluate_memory, evaluate_processor, evaluate_storage, RuleSet};
use crate::stats::{aggregate, AggregateStatistics};

/// Column-name tokens that indicate the processor column (case-insensitive
/// substring match). Bilingual, matching the spreadsheet corpus.
pub const PROCESSOR_TOKENS: [&str; 4] = ["procesador", "processor", "cpu", "micro"];

/// Tokens indicating the memory column.
pub const MEMORY_TOKENS: [&str; 3] = ["ram", "memoria", "memory"];

/// Tokens indicating the storage column.
pub const STORAGE_TOKENS: [&str; 6] =
    ["disco", "disk", "hdd", "ssd", "storage", "almacenamiento"];

/// Fatal ingestion errors. Per-field problems are never errors; they degrade.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DatasetError {
    #[error("Dataset contains no rows")]
    EmptyDataset,
    #[error("No processor column found; expected a column name containing one of: procesador, processor, cpu, micro")]
    NoProcessorColumn,
}

/// Which columns of the dataset hold each component's text.
///
/// Memory and storage are optional: when absent, that component is treated
/// as passing ("N/A") rather than failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub processor: String,
    pub memory: Option<String>,
    pub storage: Option<String>,
}

fn find_column(row: &Row, tokens: &[&str]) -> Option<String> {
    row.iter()
        .map(|(name, _)| name)
        .find(|name| {
            let lowered = name.to_lowercase();
            tokens.iter().any(|token| lowered.contains(token))
        })
        .cloned()
}

/// Scan the first row's column names for the component columns.
pub fn discover_columns(first_row: &Row) -> Result<ColumnMap, DatasetError> {
    let processor =
        find_column(first_row, &PROCESSOR_TOKENS).ok_or(DatasetError::NoProcessorColumn)?;
    let memory = find_column(first_row, &MEMORY_TOKENS);
    let storage = find_column(first_row, &STORAGE_TOKENS);
    log::debug!(
        "column map: processor={:?} memory={:?} storage={:?}",
        processor,
        memory,
        storage
    );
    Ok(ColumnMap { processor, memory, storage })
}

fn cell<'a>(row: &'a Row, column: &str) -> &'a str {
    row.iter()
        .find(|(name, _)| name == column)
        .map(|(_, value)| value.as_str())
        .unwrap_or("")
}

/// Classify one row and combine the component verdicts.
///
/// Overall pass is the AND of all present components; the overall reason is
/// the first failing component's reason in Processor, Memory, Storage order.
pub fn process_row(row: &Row, columns: &ColumnMap, rules: &RuleSet) -> DatasetRecord {
    let processor = classify_processor(cell(row, &columns.processor));
    let memory = columns.memory.as_deref().map(|c| classify_memory(cell(row, c)));
    let storage = columns.storage.as_deref().map(|c| classify_storage(cell(row, c)));

    let processor_verdict = evaluate_processor(processor.value(), rules);
    let memory_verdict = memory.as_ref().map(|m| evaluate_memory(m.value(), rules));
    let storage_verdict = storage.as_ref().map(|s| evaluate_storage(s.value(), rules));

    let overall_passes = processor_verdict.passes
        && memory_verdict.as_ref().map_or(true, |v| v.passes)
        && storage_verdict.as_ref().map_or(true, |v| v.passes);

    let overall_reason = if overall_passes {
        String::new()
    } else {
        [
            Some(&processor_verdict),
            memory_verdict.as_ref(),
            storage_verdict.as_ref(),
        ]
        .into_iter()
        .flatten()
        .find(|v| !v.passes)
        .map(|v| v.reason.clone())
        .unwrap_or_default()
    };

    DatasetRecord {
        row: row.clone(),
        processor,
        memory,
        storage,
        processor_verdict,
        memory_verdict,
        storage_verdict,
        verdict: RecordVerdict { overall_passes, overall_reason },
    }
}

/// Everything one ingestion pass produces: the column map, the per-row
/// records, and the fleet-wide statistics.
#[derive(Debug, Clone)]
pub struct DatasetReport {
    pub columns: ColumnMap,
    pub records: Vec<DatasetRecord>,
    pub statistics: AggregateStatistics,
}

/// Run the whole pipeline: discover columns, classify every row, aggregate.
pub fn process_dataset(rows: &[Row], rules: &RuleSet) -> Result<DatasetReport, DatasetError> {
    let first = rows.first().ok_or(DatasetError::EmptyDataset)?;
    let columns = discover_columns(first)?;

    let records: Vec<DatasetRecord> =
        rows.iter().map(|row| process_row(row, &columns, rules)).collect();
    let statistics = aggregate(&records);

    Ok(DatasetReport { columns, records, statistics })
}

// ---------------------------------------------------------------------------
// Output-row contract
// ---------------------------------------------------------------------------

fn yes_no(passes: bool) -> &'static str {
    if passes {
        "Sí"
    } else {
        "No"
    }
}

fn push(row: &mut Row, name: &str, value: impl Into<String>) {
    row.push((name.to_string(), value.into()));
}

/// Build the augmented output row: the original fields followed by the
/// normalized and compliance fields.
///
/// Field names and values ("Sí"/"No", "N/A" for absent components) are the
/// compatibility contract consumed by export writers and the persistence
/// layer; do not rename them.
pub fn output_row(record: &DatasetRecord) -> Row {
    let mut out = record.row.clone();

    let cpu = record.processor.value();
    push(&mut out, "Procesador Normalizado", cpu.normalized_label.clone());
    push(&mut out, "Marca Procesador", cpu.brand.as_str());
    push(&mut out, "Modelo Procesador", cpu.model_number.clone().unwrap_or_default());
    push(&mut out, "Generación", cpu.generation.clone().unwrap_or_default());
    push(
        &mut out,
        "Velocidad",
        cpu.clock_speed_ghz.map(|g| format!("{:.1} GHz", g)).unwrap_or_default(),
    );
    push(&mut out, "Cumple Requisitos Procesador", yes_no(record.processor_verdict.passes));
    push(&mut out, "Motivo Incumplimiento Procesador", record.processor_verdict.reason.clone());

    match (&record.memory, &record.memory_verdict) {
        (Some(memory), Some(verdict)) => {
            let mem = memory.value();
            push(&mut out, "RAM Normalizada", mem.normalized_label.clone());
            push(&mut out, "Capacidad RAM", format!("{:.0} GB", mem.capacity_gb));
            push(&mut out, "Tipo RAM", mem.memory_type.as_str());
            push(&mut out, "Cumple Requisitos RAM", yes_no(verdict.passes));
            push(&mut out, "Motivo Incumplimiento RAM", verdict.reason.clone());
        }
        _ => {
            push(&mut out, "RAM Normalizada", "N/A");
            push(&mut out, "Capacidad RAM", "");
            push(&mut out, "Tipo RAM", "");
            push(&mut out, "Cumple Requisitos RAM", "N/A");
            push(&mut out, "Motivo Incumplimiento RAM", "");
        }
    }

    match (&record.storage, &record.storage_verdict) {
        (Some(storage), Some(verdict)) => {
            let st = storage.value();
            push(&mut out, "Almacenamiento Normalizado", st.normalized_label.clone());
            push(
                &mut out,
                "Capacidad Almacenamiento",
                format!("{} {}", crate::classify::format_quantity(st.display_capacity), st.display_unit.as_str()),
            );
            push(&mut out, "Tipo Almacenamiento", st.device_type.as_str());
            push(&mut out, "Cumple Requisitos Almacenamiento", yes_no(verdict.passes));
            push(&mut out, "Motivo Incumplimiento Almacenamiento", verdict.reason.clone());
        }
        _ => {
            push(&mut out, "Almacenamiento Normalizado", "N/A");
            push(&mut out, "Capacidad Almacenamiento", "");
            push(&mut out, "Tipo Almacenamiento", "");
            push(&mut out, "Cumple Requisitos Almacenamiento", "N/A");
            push(&mut out, "Motivo Incumplimiento Almacenamiento", "");
        }
    }

    push(&mut out, "Cumple Requisitos", yes_no(record.verdict.overall_passes));
    push(&mut out, "Motivo Incumplimiento", record.verdict.overall_reason.clone());

    out
}
