/*!
 * ONT-RESET - Put every ONT back to status ON with a zero RTO counter
 *
 * ROLE:
 * Maintenance tool run after an outage, or before monitoring restarts, so
 * stale OFF / RTO states do not linger in the dataset.
 *
 * HOW IT WORKS:
 * - Shows the current status (first 10 ONTs + online/offline totals)
 * - Asks for confirmation on stdin, skipped with `--yes`
 * - Rewrites the dataset through the same atomic save + backup as ont-merge
 * - Missing or invalid dataset: distinct message + hint, exit code 1
 *
 * USAGE:
 *   ont-reset [--config ont-tools.yaml] [--dataset data/onts.json] [-y]
 */

mod prompt;

use anyhow::Result;
use clap::Parser;
use ont_core::logging::init_tracing;
use ont_core::{Dataset, OntRecord, PathOverrides, ResetOutcome, StatusSummary, StoreError, ToolsConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

const PREVIEW_LIMIT: usize = 10;
const RULE: &str = "============================================================";
const SHORT_RULE: &str = "========================================";

#[derive(Debug, Parser)]
#[command(name = "ont-reset", version, about = "Reset all ONT statuses to ON")]
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
    /// Where backups of the previous dataset go
    #[arg(long)]
    backup_dir: Option<PathBuf>,
    /// Reset without asking
    #[arg(short, long)]
    yes: bool,
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
            report_failure(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = ToolsConfig::load(cli.config.as_deref());
    config.apply_overrides(PathOverrides {
        base_dir: cli.base_dir,
        dataset: cli.dataset,
        source: None,
        backup_dir: cli.backup_dir,
    });
    let dataset = Dataset::from_config(&config);

    println!("🔄 ONT STATUS RESET TOOL");
    println!("{SHORT_RULE}");

    let records = dataset.load_strict()?;
    display_current_status(&records);
    println!();
    println!("{SHORT_RULE}");

    let confirmed = cli.yes || prompt::confirm("Reset every status to ON?")?;
    if confirmed {
        println!();
        println!("🔄 Resetting {} ONT...", records.len());
    }

    match dataset.reset(records, confirmed)? {
        ResetOutcome::Aborted => println!("❌ Reset cancelled"),
        ResetOutcome::Persisted {
            report,
            save,
            records,
        } => {
            for ont in &records {
                println!("✅ {} ({}) → {}", display_name(ont), display_ip(ont), ont.status);
            }
            println!();
            println!("🎉 Reset {} ONT to status ON ({} changed)", records.len(), report.changed);
            println!("💾 {} updated", save.path.display());
            if let Some(backup) = &save.backup {
                println!("🗄️  Backup: {}", backup.display());
            }
            println!(
                "📊 Statistics: {} ONLINE, {} OFFLINE",
                report.after.online, report.after.offline
            );
        }
    }
    Ok(())
}

fn display_current_status(records: &[OntRecord]) {
    println!("📋 CURRENT ONT STATUS:");
    println!("{RULE}");

    for ont in records.iter().take(PREVIEW_LIMIT) {
        let icon = if ont.status.is_online() { "✅" } else { "❌" };
        println!("{} {} ({}) → {}", icon, display_name(ont), display_ip(ont), ont.status);
    }
    if records.len() > PREVIEW_LIMIT {
        println!("... and {} more ONT", records.len() - PREVIEW_LIMIT);
    }

    let summary = StatusSummary::of(records);
    println!("{RULE}");
    println!("📊 Total: {} ONT", summary.total);
    println!("✅ Online: {}", summary.online);
    println!("❌ Offline: {}", summary.offline);
}

fn display_name(ont: &OntRecord) -> &str {
    if ont.name.is_empty() {
        "Unknown"
    } else {
        &ont.name
    }
}

fn display_ip(ont: &OntRecord) -> &str {
    if ont.ip.is_empty() {
        "N/A"
    } else {
        &ont.ip
    }
}

fn report_failure(e: &anyhow::Error) {
    error!(error = %format!("{e:#}"), "reset failed");
    match e.downcast_ref::<StoreError>() {
        Some(store @ StoreError::NotFound(_)) => println!("❌ Dataset not found: {store}"),
        Some(store @ StoreError::InvalidJson { .. }) => println!("❌ Dataset is not valid: {store}"),
        _ => println!("❌ Error: {e:#}"),
    }
    if let Some(hint) = e.downcast_ref::<StoreError>().and_then(StoreError::hint) {
        println!("💡 {hint}");
    }
}
