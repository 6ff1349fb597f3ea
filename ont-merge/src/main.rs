/*!
 * ONT-MERGE - Merge the CSV-derived export into the canonical ONT dataset
 *
 * ROLE:
 * Brings `csvjson.json` (customer export) into `onts.json` (monitoring
 * dataset) without losing the monitoring state of known ONTs.
 *
 * HOW IT WORKS:
 * - Export rows are matched on customer id (`ID` -> `id_pelanggan`)
 * - Known customers: name, location, IP and coordinates refreshed;
 *   id, status and rto_count untouched
 * - New customers: appended with the next free id, status ON
 * - Previous dataset kept as a timestamped backup; `--dry-run` writes nothing
 *
 * USAGE:
 *   ont-merge [--config ont-tools.yaml] [--base-dir DIR] [--dry-run]
 */

use anyhow::{Context, Result};
use clap::Parser;
use ont_core::logging::init_tracing;
use ont_core::{Dataset, MergeEvent, MergePlan, PathOverrides, StoreError, ToolsConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Debug, Parser)]
#[command(name = "ont-merge", version, about = "Merge csvjson.json into onts.json")]
struct Cli {
    /// YAML config file (default: $ONT_TOOLS_CONFIG or ./ont-tools.yaml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory relative paths are resolved against
    #[arg(long)]
    base_dir: Option<PathBuf>,
    /// Canonical dataset file
    #[arg(long)]
    dataset: Option<PathBuf>,
    /// CSV-derived JSON export to merge
    #[arg(long)]
    source: Option<PathBuf>,
    /// Where backups of the previous dataset go
    #[arg(long)]
    backup_dir: Option<PathBuf>,
    /// Show what would change without writing anything
    #[arg(long)]
    dry_run: bool,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = init_tracing("warn") {
        eprintln!("{e}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "merge failed");
            println!("❌ Error: {e:#}");
            if let Some(hint) = e.downcast_ref::<StoreError>().and_then(StoreError::hint) {
                println!("💡 {hint}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = ToolsConfig::load(cli.config.as_deref());
    config.apply_overrides(PathOverrides {
        base_dir: cli.base_dir,
        dataset: cli.dataset,
        source: cli.source,
        backup_dir: cli.backup_dir,
    });

    let dataset = Dataset::from_config(&config);
    let source = config.source_path();

    println!("=== ONT Data Merge ===");
    println!();
    println!("1. Loading existing data from {}", dataset.path().display());
    println!("2. Loading export from {}", source.display());

    let Some(plan) = dataset
        .plan_merge(&source)
        .with_context(|| format!("loading {}", dataset.path().display()))?
    else {
        println!("No export data to process");
        return Ok(());
    };

    println!("   Existing records: {}", plan.existing);
    println!("   Export rows: {}", plan.source_rows);
    println!();
    println!("3. Converting export rows...");
    println!("   Valid rows: {}", plan.valid);
    println!();
    println!("4. Merging...");
    print_events(&plan);
    println!();
    print_summary(&plan);

    if cli.dry_run {
        println!();
        println!("Dry run: nothing written");
        return Ok(());
    }

    println!();
    println!("6. Saving merged dataset...");
    let report = dataset
        .apply_merge(&plan)
        .with_context(|| format!("saving {}", dataset.path().display()))?;

    println!();
    println!("=== Done ===");
    match &report.backup {
        Some(backup) => println!("Previous data backed up to: {}", backup.display()),
        None => println!("No previous data to back up"),
    }
    println!("Merged data saved to: {}", report.path.display());
    Ok(())
}

fn print_events(plan: &MergePlan) {
    for event in &plan.outcome.events {
        match event {
            MergeEvent::Updated {
                id,
                id_pelanggan,
                name,
            } => println!("✓ Updated: {} ({}) #{}", name, id_pelanggan, id),
            MergeEvent::Added {
                id,
                id_pelanggan,
                name,
            } => println!("✓ Added: {} ({}) → #{}", name, id_pelanggan, id),
        }
    }
}

fn print_summary(plan: &MergePlan) {
    println!("5. Merge result:");
    println!("   - Existing records: {}", plan.existing);
    println!("   - Added: {}", plan.outcome.added);
    println!("   - Updated: {}", plan.outcome.updated);
    println!("   - Final total: {}", plan.outcome.records.len());
}
