use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use fleet_audit::{load_rows, resolve_rule_set, rows_to_json};

/// Hardware inventory compliance auditing CLI.
///
/// This CLI is a thin wrapper around `audit-core` (exposed in code as
/// `audit_core`). All substantive logic lives in the library so it can be
/// tested thoroughly and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "fleet-audit",
    version,
    about = "Classify free-text hardware inventory and audit it against a minimum-spec policy",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify and audit a whole dataset of inventory rows.
    ///
    /// The input file is a JSON array of objects mapping column name to cell
    /// text, as produced by a spreadsheet-to-JSON conversion. Column roles
    /// (processor/memory/storage) are discovered from the column names.
    Analyze {
        /// Path to the rows file (JSON array of objects).
        #[arg(long)]
        input: PathBuf,

        /// Optional rule-set file (JSON, or YAML by extension). Defaults to
        /// the embedded default policy.
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Emit the full aggregate statistics as JSON instead of a summary.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Optional path to write the augmented output rows (original fields
        /// plus normalized and compliance fields) as JSON.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Classify a single processor description and evaluate it.
    ClassifyCpu {
        /// The raw processor text, e.g. "Intel(R) Core(TM) i5-8500 @ 3.00GHz".
        text: String,

        /// Optional rule-set file. Defaults to the embedded default policy.
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Classify a single memory description and evaluate it.
    ClassifyRam {
        /// The raw memory text, e.g. "16384" or "8 GB DDR4".
        text: String,

        #[arg(long)]
        rules: Option<PathBuf>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Classify a single storage description and evaluate it.
    ClassifyDisk {
        /// The raw storage text, e.g. "1 TB SSD".
        text: String,

        #[arg(long)]
        rules: Option<PathBuf>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Print the embedded default rule set, ready to copy and customize.
    DefaultRules {
        /// Emit YAML instead of JSON.
        #[arg(long, default_value_t = false)]
        yaml: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Analyze { input, rules, json, output } => {
            analyze_command(&input, rules.as_deref(), json, output.as_deref())?
        }
        Command::ClassifyCpu { text, rules, json } => {
            classify_cpu_command(&text, rules.as_deref(), json)?
        }
        Command::ClassifyRam { text, rules, json } => {
            classify_ram_command(&text, rules.as_deref(), json)?
        }
        Command::ClassifyDisk { text, rules, json } => {
            classify_disk_command(&text, rules.as_deref(), json)?
        }
        Command::DefaultRules { yaml } => default_rules_command(yaml)?,
    }

    Ok(())
}

/// Run the full pipeline over a rows file and report the results.
fn analyze_command(
    input: &std::path::Path,
    rules_path: Option<&std::path::Path>,
    json: bool,
    output: Option<&std::path::Path>,
) -> Result<()> {
    let rules = resolve_rule_set(rules_path)?;
    let rows = load_rows(input)?;

    let report = audit_core::dataset::process_dataset(&rows, &rules)
        .context("Failed to process dataset")?;

    if let Some(output_path) = output {
        let output_rows: Vec<_> =
            report.records.iter().map(audit_core::dataset::output_row).collect();
        let serialized = rows_to_json(&output_rows)?;
        fs::write(output_path, serialized)
            .with_context(|| format!("Failed to write output rows: {}", output_path.display()))?;
        println!("Wrote augmented rows to {}", output_path.display());
    }

    if json {
        let serialized = serde_json::to_string_pretty(&report.statistics)
            .context("Failed to serialize statistics")?;
        println!("{}", serialized);
        return Ok(());
    }

    let stats = &report.statistics;
    println!("Fleet audit v{} ({})", audit_core::version(), Utc::now().to_rfc3339());
    println!("==========================================");
    println!("Rows: {}", stats.total);
    println!(
        "Compliant: {} / Non-compliant: {} ({:.1}% pass rate)",
        stats.passed,
        stats.failed,
        stats.pass_rate * 100.0
    );
    println!();
    println!("Columns:");
    println!("  Processor: {}", report.columns.processor);
    println!("  Memory:    {}", report.columns.memory.as_deref().unwrap_or("(none)"));
    println!("  Storage:   {}", report.columns.storage.as_deref().unwrap_or("(none)"));

    println!();
    println!("By brand:");
    for (brand, count) in &stats.by_brand {
        println!("  - {}: {}", brand, count);
    }

    println!();
    println!("By family:");
    for (family, count) in &stats.by_family {
        println!("  - {}: {}", family, count);
    }

    if !stats.failure_reasons.is_empty() {
        println!();
        println!("Failure reasons:");
        for (reason, count) in &stats.failure_reasons {
            println!("  - {} ({})", reason, count);
        }
    }

    if stats.ram.count > 0 {
        println!();
        println!(
            "RAM: {} rows, {} pass, mean {:.1} GB",
            stats.ram.count, stats.ram.passed, stats.ram.mean_capacity_gb
        );
    }
    if stats.storage.count > 0 {
        println!(
            "Storage: {} rows, {} pass, mean {:.0} GB",
            stats.storage.count, stats.storage.passed, stats.storage.mean_capacity_gb
        );
    }

    Ok(())
}

fn classify_cpu_command(
    text: &str,
    rules_path: Option<&std::path::Path>,
    json: bool,
) -> Result<()> {
    let rules = resolve_rule_set(rules_path)?;
    let classification = audit_core::classify::classify_processor(text);
    let verdict = audit_core::rules::evaluate_processor(classification.value(), &rules);

    if json {
        let payload = serde_json::json!({
            "classification": classification,
            "verdict": verdict,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let degraded = classification.degraded_reason().map(str::to_string);
    let cpu = classification.into_value();
    println!("Input:      {}", text);
    println!("Normalized: {}", cpu.normalized_label);
    println!("Brand:      {}", cpu.brand.as_str());
    println!("Family:     {}", cpu.family);
    if let Some(model) = &cpu.model_number {
        println!("Model:      {}", model);
    }
    if let Some(generation) = &cpu.generation {
        println!("Generation: {}", generation);
    }
    if let Some(ghz) = cpu.clock_speed_ghz {
        println!("Speed:      {:.1} GHz", ghz);
    }
    if let Some(suffix) = &cpu.architecture_suffix {
        println!("Suffix:     {}", suffix);
    }
    if let Some(reason) = degraded {
        println!("Degraded:   {}", reason);
    }
    print_verdict(&verdict);
    Ok(())
}

fn classify_ram_command(
    text: &str,
    rules_path: Option<&std::path::Path>,
    json: bool,
) -> Result<()> {
    let rules = resolve_rule_set(rules_path)?;
    let classification = audit_core::classify::classify_memory(text);
    let verdict = audit_core::rules::evaluate_memory(classification.value(), &rules);

    if json {
        let payload = serde_json::json!({
            "classification": classification,
            "verdict": verdict,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let degraded = classification.degraded_reason().map(str::to_string);
    let memory = classification.into_value();
    println!("Input:      {}", text);
    println!("Normalized: {}", memory.normalized_label);
    println!("Capacity:   {:.0} GB", memory.capacity_gb);
    println!("Type:       {}", memory.memory_type.as_str());
    if let Some(mhz) = memory.clock_speed_mhz {
        println!("Speed:      {} MHz", mhz);
    }
    if let Some(reason) = degraded {
        println!("Degraded:   {}", reason);
    }
    print_verdict(&verdict);
    Ok(())
}

fn classify_disk_command(
    text: &str,
    rules_path: Option<&std::path::Path>,
    json: bool,
) -> Result<()> {
    let rules = resolve_rule_set(rules_path)?;
    let classification = audit_core::classify::classify_storage(text);
    let verdict = audit_core::rules::evaluate_storage(classification.value(), &rules);

    if json {
        let payload = serde_json::json!({
            "classification": classification,
            "verdict": verdict,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let degraded = classification.degraded_reason().map(str::to_string);
    let storage = classification.into_value();
    println!("Input:      {}", text);
    println!("Normalized: {}", storage.normalized_label);
    println!("Capacity:   {:.0} GB", storage.capacity_gb);
    println!("Type:       {}", storage.device_type.as_str());
    if let Some(reason) = degraded {
        println!("Degraded:   {}", reason);
    }
    print_verdict(&verdict);
    Ok(())
}

fn default_rules_command(yaml: bool) -> Result<()> {
    let rules = audit_core::rules::RuleSet::default();
    if yaml {
        println!("{}", serde_yaml::to_string(&rules).context("Failed to serialize rule set")?);
    } else {
        println!(
            "{}",
            serde_json::to_string_pretty(&rules).context("Failed to serialize rule set")?
        );
    }
    Ok(())
}

fn print_verdict(verdict: &audit_core::model::ComplianceVerdict) {
    if verdict.passes {
        println!("Verdict:    PASS");
    } else {
        println!("Verdict:    FAIL: {}", verdict.reason);
    }
}
