use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use audit_core::model::Row;
use audit_core::rules::RuleSet;

/// Read inventory rows from a JSON file: an array of objects mapping column
/// name to cell value. Non-string scalars (numbers, booleans) are kept as
/// their text form, matching how spreadsheet exports deliver numeric cells.
pub fn load_rows(path: &Path) -> Result<Vec<Row>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rows file: {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).context("Failed to parse rows JSON")?;

    let array = value
        .as_array()
        .ok_or_else(|| anyhow!("Rows file must contain a JSON array of objects"))?;

    let mut rows = Vec::with_capacity(array.len());
    for (index, entry) in array.iter().enumerate() {
        let object = entry
            .as_object()
            .ok_or_else(|| anyhow!("Row {} is not a JSON object", index))?;
        let row: Row = object
            .iter()
            .map(|(name, cell)| (name.clone(), cell_text(cell)))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Load a rule set from a JSON or YAML file, by extension; `.yaml`/`.yml`
/// use YAML, everything else JSON.
pub fn load_rule_set(path: &Path) -> Result<RuleSet> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rule-set file: {}", path.display()))?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);
    if is_yaml {
        serde_yaml::from_str(&text).context("Failed to parse rule-set YAML")
    } else {
        serde_json::from_str(&text).context("Failed to parse rule-set JSON")
    }
}

/// Resolve the active rule set: the given file, or the embedded default
/// policy when none is supplied.
pub fn resolve_rule_set(path: Option<&Path>) -> Result<RuleSet> {
    match path {
        Some(p) => load_rule_set(p),
        None => Ok(RuleSet::default()),
    }
}

/// Serialize output rows back to a JSON array of objects, preserving column
/// order (the appended fields follow the originals).
pub fn rows_to_json(rows: &[Row]) -> Result<String> {
    let array: Vec<serde_json::Value> = rows
        .iter()
        .map(|row| {
            let mut object = serde_json::Map::new();
            for (name, value) in row {
                object.insert(name.clone(), serde_json::Value::String(value.clone()));
            }
            serde_json::Value::Object(object)
        })
        .collect();
    serde_json::to_string_pretty(&array).context("Failed to serialize output rows")
}
