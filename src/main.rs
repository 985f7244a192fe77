//! fleet-health - fleet health scoring from CSV exports
//!
//! # Usage
//!
//! ```bash
//! # Ranked action list
//! fleet-health prioritize --assets activos.csv --maintenance mantenimiento.csv --reference referencia.csv
//!
//! # Dashboard aggregates as JSON
//! fleet-health summary --assets activos.csv --format json
//!
//! # One asset with its maintenance history
//! fleet-health asset EX-01 --assets activos.csv --maintenance mantenimiento.csv
//!
//! # Effective configuration
//! fleet-health config
//! ```
//!
//! # Environment Variables
//!
//! - `FLEET_HEALTH_CONFIG`: Path to the engine config TOML (default: ./fleet_health.toml)
//! - `FLEET_HEALTH_ASSETS`, `FLEET_HEALTH_MAINTENANCE`, `FLEET_HEALTH_REFERENCE`: input CSV paths
//! - `RUST_LOG`: Logging level (default: info)

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;

use fleet_health::config::{self, EngineConfig};
use fleet_health::fleet::{maintenance_history, FleetEvaluation, FleetEvaluator};
use fleet_health::ingest::{self, parse::parse_date};
use fleet_health::narrative;
use fleet_health::{AssetRecord, MaintenanceEvent, ReferenceEntry};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "fleet-health")]
#[command(about = "Health scoring and maintenance recommendations for equipment fleets")]
#[command(version)]
struct CliArgs {
    /// Asset registry CSV
    #[arg(long, global = true, env = "FLEET_HEALTH_ASSETS")]
    assets: Option<PathBuf>,

    /// Maintenance log CSV (optional; no history when absent)
    #[arg(long, global = true, env = "FLEET_HEALTH_MAINTENANCE")]
    maintenance: Option<PathBuf>,

    /// Reference table CSV (optional; defaults for every type when absent)
    #[arg(long, global = true, env = "FLEET_HEALTH_REFERENCE")]
    reference: Option<PathBuf>,

    /// Engine config TOML, overrides the FLEET_HEALTH_CONFIG search order
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Evaluation date (YYYY-MM-DD or DD/MM/YYYY), default today
    #[arg(long, global = true, value_parser = parse_as_of)]
    as_of: Option<NaiveDate>,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Every asset with score, RUL, costs and recommendation
    Evaluate,
    /// Ranked action list, most urgent first
    Prioritize {
        /// Show only the first N rows
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Fleet dashboard aggregates
    Summary,
    /// Executive summary prompt for the narrative service
    Brief,
    /// One asset in detail with its maintenance history
    Asset {
        /// Asset identifier
        id: String,
    },
    /// Prompt for a free-form question about the fleet
    Ask {
        question: String,
    },
    /// Print the effective engine configuration as TOML
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_as_of(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).ok_or_else(|| format!("invalid date '{s}', expected YYYY-MM-DD"))
}

// ============================================================================
// Input Loading
// ============================================================================

struct Inputs {
    assets: Vec<AssetRecord>,
    events: Vec<MaintenanceEvent>,
    reference: Vec<ReferenceEntry>,
}

fn load_inputs(args: &CliArgs, as_of: NaiveDate) -> Result<Inputs> {
    let Some(assets_path) = &args.assets else {
        bail!("--assets is required (or set FLEET_HEALTH_ASSETS)");
    };

    let assets = ingest::load_assets(assets_path, as_of.year())
        .with_context(|| format!("loading asset registry {}", assets_path.display()))?
        .records;

    let events = match &args.maintenance {
        Some(path) => {
            ingest::load_maintenance(path)
                .with_context(|| format!("loading maintenance log {}", path.display()))?
                .records
        }
        None => Vec::new(),
    };

    let reference = match &args.reference {
        Some(path) => {
            ingest::load_reference(path)
                .with_context(|| format!("loading reference table {}", path.display()))?
                .records
        }
        None => Vec::new(),
    };

    Ok(Inputs { assets, events, reference })
}

// ============================================================================
// Output
// ============================================================================

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_evaluation(evaluation: &FleetEvaluation, currency: &str) {
    println!(
        "{:<12} {:<18} {:>6} {:<6} {:>9} {:>14} {:<26} {:>4}",
        "ID", "TYPE", "HEALTH", "BAND", "RUL (h)", &format!("COST ({currency})"), "ACTION", "PRIO"
    );
    for a in &evaluation.assets {
        println!(
            "{:<12} {:<18} {:>6.1} {:<6} {:>9.0} {:>14.0} {:<26} {:>4}",
            a.id(),
            a.asset.equipment_type,
            a.health_score,
            a.health_band(),
            a.rul_hours,
            a.trailing_maintenance_cost,
            a.recommendation.action,
            a.priority()
        );
    }
    print_rejected(evaluation);
}

fn print_rejected(evaluation: &FleetEvaluation) {
    if evaluation.rejected.is_empty() {
        return;
    }
    println!();
    println!("Rejected rows: {}", evaluation.rejected.len());
    for row in &evaluation.rejected {
        println!("  row {}: {}", row.row_index + 1, row.error);
    }
}

fn print_prioritized(evaluation: &FleetEvaluation, limit: Option<usize>, currency: &str) {
    let ranked = evaluation.prioritized();
    let shown = limit.unwrap_or(ranked.len());
    for (rank, row) in ranked.iter().take(shown).enumerate() {
        println!(
            "{:>3}. [P{}] {} ({}) health {:.1} -> {} within {} months, impact {:.0} {}",
            rank + 1,
            row.priority,
            row.asset_id,
            row.equipment_type,
            row.health_score,
            row.action,
            row.horizon_months,
            row.economic_impact,
            currency
        );
        println!("       {}. {}", row.reason, row.detail);
    }
}

fn print_summary(evaluation: &FleetEvaluation, fleet_name: &str, currency: &str) {
    let s = evaluation.summary();
    println!("Fleet: {fleet_name}");
    println!("  Assets:                 {} ({} rejected rows)", s.total_assets, s.rejected_rows);
    println!("  Critical (< 40):        {}", s.critical_assets);
    println!("  Average health:         {:.1}", s.average_health);
    println!("  Average age:            {:.1} years", s.average_age_years);
    println!("  Actions within 6 mo:    {}", s.actions_within_6_months);
    println!("  Actions within 12 mo:   {}", s.actions_within_12_months);
    println!("  Urgent (P1-P2):         {}", s.urgent_actions);
    println!("  Economic impact:        {:.0} {currency}", s.total_economic_impact);
    println!("  Maintenance cost:       {:.0} {currency}", s.total_maintenance_cost);
    println!("  Bands:                  {} red / {} amber / {} green", s.bands.red, s.bands.amber, s.bands.green);
    println!();
    println!("Health by equipment type:");
    for t in &s.by_type {
        println!("  {:<20} {:>3} assets  avg {:>5.1}", t.equipment_type, t.assets, t.average_health);
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    // Load engine configuration
    let engine_config = match &args.config {
        Some(path) => EngineConfig::load_from_file(path)
            .with_context(|| format!("loading engine config {}", path.display()))?,
        None => EngineConfig::load(),
    };
    info!(
        "Fleet: {} | Policy: {} | Currency: {}",
        engine_config.fleet.name, engine_config.scoring.policy, engine_config.fleet.currency
    );
    config::init(engine_config);
    let cfg = config::get();

    if let Command::Config = args.command {
        print!("{}", cfg.to_toml()?);
        return Ok(());
    }

    let as_of = args.as_of.unwrap_or_else(|| chrono::Local::now().date_naive());
    let inputs = load_inputs(&args, as_of)?;
    let evaluator = FleetEvaluator::new(cfg).with_as_of(as_of);
    let evaluation = evaluator.evaluate_fleet(&inputs.assets, &inputs.events, &inputs.reference);
    let currency = cfg.fleet.currency.as_str();
    let json = args.format == OutputFormat::Json;

    match &args.command {
        Command::Evaluate if json => print_json(&evaluation)?,
        Command::Evaluate => print_evaluation(&evaluation, currency),
        Command::Prioritize { limit } if json => {
            let ranked = evaluation.prioritized();
            print_json(&ranked[..limit.unwrap_or(ranked.len()).min(ranked.len())])?;
        }
        Command::Prioritize { limit } => print_prioritized(&evaluation, *limit, currency),
        Command::Summary if json => print_json(&evaluation.summary())?,
        Command::Summary => print_summary(&evaluation, &cfg.fleet.name, currency),
        Command::Brief => {
            let prompt = narrative::executive_summary_prompt(&evaluation.summary(), &evaluation.assets, currency);
            println!("{prompt}");
        }
        Command::Asset { id } => {
            let Some(asset) = evaluation.find(id) else {
                bail!("asset '{id}' not found (or rejected) in {} assets", evaluation.assets.len());
            };
            let history = maintenance_history(id, &inputs.events);
            if json {
                print_json(&serde_json::json!({ "asset": asset, "history": history }))?;
            } else {
                println!("{}", narrative::asset_analysis_prompt(asset, &history, currency));
            }
        }
        Command::Ask { question } => {
            println!("{}", narrative::fleet_question_prompt(&evaluation.assets, question));
        }
        // printed before inputs are loaded
        Command::Config => {}
    }

    Ok(())
}
