//! PI Colony Simulator
//!
//! Replays an EVE Online planetary colony export forward in time: extractors
//! fill storages, factories pull inputs and emit products, routes move
//! goods between pins.

mod catalog;
mod clock;
mod colony;
mod db;
mod error;
mod extraction;
mod facility;
mod loader;
mod models;
mod report;
mod route;
mod scheduler;
mod transfer;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rusqlite::Connection;
use walkdir::WalkDir;

use crate::catalog::Catalog;
use crate::clock::{Clock, SystemClock};
use crate::colony::{DEFAULT_MAX_EVENTS, EndCondition, SimulationOutcome};
use crate::extraction::ExtractorYield;
use crate::facility::Timestamp;
use crate::loader::LoadOptions;
use crate::models::{Schematic, TypeInfo};
use crate::report::SimulationReport;

#[derive(Parser)]
#[command(name = "pi-colony-sim")]
#[command(about = "Discrete-event simulator for EVE Online planetary colonies")]
struct Cli {
    /// Path to the SQLite database with types and schematics
    #[arg(short, long, default_value = "pi_data.db")]
    database: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Until {
    /// Stop once simulated time catches up with the wall clock
    Now,
    /// Keep going until every pin has stopped
    WorkEnds,
}

impl From<Until> for EndCondition {
    fn from(until: Until) -> Self {
        match until {
            Until::Now => EndCondition::UntilNow,
            Until::WorkEnds => EndCondition::UntilWorkEnds,
        }
    }
}

#[derive(clap::Args)]
struct SimulationArgs {
    /// When to stop simulating
    #[arg(short, long, value_enum, default_value = "now")]
    until: Until,

    /// Fixed horizon (YYYY-MM-DDTHH:MM:SSZ); no event after it runs
    #[arg(short, long)]
    end: Option<String>,

    /// Maximum number of events handled in one run
    #[arg(long, default_value_t = DEFAULT_MAX_EVENTS)]
    max_events: u64,

    /// Fail when the scenario has no extractors
    #[arg(long)]
    require_extractors: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize empty database with schema
    Init,

    /// Load sample types and schematics for testing
    LoadSample,

    /// List all schematics in the database
    Schematics {
        /// Show a single schematic
        #[arg(long)]
        id: Option<i64>,
    },

    /// Simulate a colony export and print the resulting state
    Simulate {
        /// Scenario JSON file
        scenario: PathBuf,

        #[command(flatten)]
        sim: SimulationArgs,

        /// Print JSON instead of a text report
        #[arg(long)]
        json: bool,
    },

    /// Show a colony as loaded, without simulating
    Status {
        /// Scenario JSON file
        scenario: PathBuf,

        /// Print JSON instead of a text report
        #[arg(long)]
        json: bool,
    },

    /// Print the extractor yield per cycle
    Yield {
        /// Base quantity per cycle
        qty_per_cycle: u32,

        /// Cycle length in seconds
        #[arg(short, long, default_value = "1800")]
        cycle_time: i64,

        /// Number of cycles to print
        #[arg(short = 'n', long, default_value = "84")]
        cycles: u64,
    },

    /// Simulate every scenario under a directory
    Batch {
        /// Directory searched recursively for *.json scenarios
        dir: PathBuf,

        #[command(flatten)]
        sim: SimulationArgs,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pi_colony_sim=info")),
        )
        .init();

    let cli = Cli::parse();

    let conn = Connection::open(&cli.database)
        .with_context(|| format!("Failed to open database {}", cli.database.display()))?;
    db::init_schema(&conn)?;

    let clock = SystemClock;

    match cli.command {
        Commands::Init => {
            println!("Database initialized at: {}", cli.database.display());
        }

        Commands::LoadSample => {
            load_sample_data(&conn)?;
            println!("Sample data loaded successfully!");
        }

        Commands::Schematics { id } => {
            let catalog = db::load_catalog(&conn)?;
            let schematics = match id {
                Some(id) => match db::get_schematic(&conn, id)? {
                    Some(schematic) => vec![schematic],
                    None => anyhow::bail!("Schematic {} not found", id),
                },
                None => db::list_schematics(&conn)?,
            };
            if schematics.is_empty() {
                println!("No schematics in database. Run 'load-sample' or import an item database first.");
            } else {
                println!("{:>6} {:>8}  {:<30} {:<30}", "ID", "Cycle", "Input", "Output");
                println!("{}", "-".repeat(78));
                for s in schematics {
                    println!(
                        "{:>6} {:>7}s  {:<30} {:<30}",
                        s.schematic_id,
                        s.cycle_time,
                        format!("{} x {}", s.input_quantity, catalog.type_name(s.input_type_id)),
                        format!("{} x {}", s.output_quantity, catalog.type_name(s.output_type_id)),
                    );
                }
            }
        }

        Commands::Simulate { scenario, sim, json } => {
            let catalog = db::load_catalog(&conn)?;
            let (colony, outcome) = run_scenario(&scenario, &catalog, &sim, &clock)?;

            if json {
                let report = SimulationReport::new(&colony, &catalog, outcome);
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report::colony_report(&colony, &catalog, clock.now()));
                println!(
                    "Stopped: {:?} after {} events",
                    outcome.stop_reason, outcome.events_processed
                );
            }
        }

        Commands::Status { scenario, json } => {
            let catalog = db::load_catalog(&conn)?;
            let now = clock.now();
            let mut colony = loader::load_scenario(&scenario, &catalog, LoadOptions::default(), now)
                .with_context(|| format!("Failed to load {}", scenario.display()))?;

            if json {
                let mut status = colony.get_colony_status(now);
                status.pins = status.pins.into_iter().map(|pin| pin.named(&catalog)).collect();
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("{}", report::colony_report(&colony, &catalog, now));
            }
        }

        Commands::Yield {
            qty_per_cycle,
            cycle_time,
            cycles,
        } => {
            anyhow::ensure!(cycle_time > 0, "cycle time must be positive");
            let calc = ExtractorYield::new(qty_per_cycle, cycle_time);

            println!("{:>6} {:>10}", "Cycle", "Yield");
            println!("{}", "-".repeat(17));
            if cycles > 0 {
                for (cycle, amount) in calc.yield_range(0, cycles - 1) {
                    println!("{:>6} {:>10}", cycle, amount);
                }
            }
            println!("{}", "-".repeat(17));
            println!("{:>6} {:>10}", "Total", calc.total_yield(cycles));
        }

        Commands::Batch { dir, sim } => {
            let catalog = db::load_catalog(&conn)?;
            let stats = run_batch(&dir, &catalog, &sim, &clock)?;
            println!("\n{}", stats);
        }
    }

    Ok(())
}

fn parse_horizon(end: Option<&String>) -> Result<Option<Timestamp>> {
    end.map(|value| {
        loader::parse_utc(value)
            .with_context(|| format!("Invalid --end {:?}, expected YYYY-MM-DDTHH:MM:SSZ", value))
    })
    .transpose()
}

fn run_scenario(
    path: &Path,
    catalog: &Catalog,
    sim: &SimulationArgs,
    clock: &dyn Clock,
) -> Result<(colony::Colony, SimulationOutcome)> {
    let options = LoadOptions {
        require_extractors: sim.require_extractors,
    };
    let mut colony = loader::load_scenario(path, catalog, options, clock.now())
        .with_context(|| format!("Failed to load {}", path.display()))?;
    colony.sim_end_time = parse_horizon(sim.end.as_ref())?;
    colony.max_events = sim.max_events;

    let outcome = colony.simulate(sim.until.into(), clock);
    Ok((colony, outcome))
}

#[derive(Debug, Default)]
struct BatchStats {
    simulated: usize,
    still_working: usize,
    events: u64,
    errors: usize,
}

impl std::fmt::Display for BatchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Simulated {} colonies ({} still working, {} events). Errors: {}",
            self.simulated, self.still_working, self.events, self.errors
        )
    }
}

fn run_batch(dir: &Path, catalog: &Catalog, sim: &SimulationArgs, clock: &dyn Clock) -> Result<BatchStats> {
    let mut stats = BatchStats::default();

    println!("Scanning {} for colony exports...", dir.display());
    for entry in WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }

        match run_scenario(path, catalog, sim, clock) {
            Ok((colony, outcome)) => {
                let working = colony.has_working_facility();
                stats.simulated += 1;
                stats.events += outcome.events_processed;
                if working {
                    stats.still_working += 1;
                }
                println!(
                    "  {}: {} events, stopped {:?} at {}, {}",
                    path.display(),
                    outcome.events_processed,
                    outcome.stop_reason,
                    outcome.end_time.format("%Y-%m-%d %H:%M"),
                    if working { "working" } else { "idle" }
                );
            }
            Err(e) => {
                tracing::error!("{}: {:#}", path.display(), e);
                stats.errors += 1;
            }
        }
    }

    Ok(stats)
}

/// Load sample PI types and schematics for testing without an item database
fn load_sample_data(conn: &Connection) -> Result<()> {
    db::clear_static_data(conn)?;

    let types = [
        (2267, "Base Metals", 0.01),
        (2268, "Aqueous Liquids", 0.01),
        (2073, "Microorganisms", 0.01),
        (2389, "Plasmids", 0.38),
        (2398, "Reactive Metals", 0.38),
        (3645, "Water", 0.38),
        (2524, "Barren Command Center", 1000.0),
        (2544, "Barren Launchpad", 1000.0),
        (2541, "Barren Storage Facility", 1000.0),
        (2473, "Barren Basic Industry Facility", 1000.0),
        (2848, "Barren Extractor Control Unit", 1000.0),
    ];
    for (type_id, name, volume) in types {
        db::upsert_type(
            conn,
            &TypeInfo {
                type_id,
                name: name.to_string(),
                volume,
            },
        )?;
    }

    // Basic processing: 3000 raw -> 20 processed every 30 minutes
    let schematics = [(131, 2268, 3645), (126, 2267, 2398), (127, 2073, 2389)];
    for (schematic_id, input_type_id, output_type_id) in schematics {
        db::upsert_schematic(
            conn,
            &Schematic {
                schematic_id,
                cycle_time: 1800,
                input_type_id,
                input_quantity: 3000,
                output_type_id,
                output_quantity: 20,
            },
        )?;
    }

    db::upsert_capacity(conn, 2541, 12000.0)?;

    println!("Loaded {} sample types and {} schematics", types.len(), schematics.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::clock::ManualClock;
    use crate::colony::StopReason;

    const SAMPLE_COLONY: &str = include_str!("../demos/barren_water.json");

    fn args(until: Until, end: Option<&str>) -> SimulationArgs {
        SimulationArgs {
            until,
            end: end.map(str::to_string),
            max_events: DEFAULT_MAX_EVENTS,
            require_extractors: true,
        }
    }

    fn sample_catalog() -> Catalog {
        let conn = Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();
        load_sample_data(&conn).unwrap();
        db::load_catalog(&conn).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn sample_colony_runs_to_horizon() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("colony.json");
        std::fs::write(&path, SAMPLE_COLONY).unwrap();

        let catalog = sample_catalog();
        let clock = ManualClock::new(DateTime::from_timestamp(4_000_000_000, 0).unwrap());
        let sim = args(Until::WorkEnds, Some("2025-01-19T12:00:00Z"));
        let (colony, outcome) = run_scenario(&path, &catalog, &sim, &clock).unwrap();

        assert_eq!(outcome.stop_reason, StopReason::ReachedHorizon);
        assert!(outcome.events_processed > 0);
        let launchpad = colony.facility(3).unwrap();
        assert!(launchpad.contents.get(3645) > 0, "water reached the launchpad");
    }

    #[test]
    fn batch_skips_non_scenarios_and_counts_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), SAMPLE_COLONY).unwrap();
        std::fs::write(dir.path().join("broken.json"), "{").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let catalog = sample_catalog();
        let clock = ManualClock::new(DateTime::from_timestamp(4_000_000_000, 0).unwrap());
        let sim = args(Until::Now, Some("2025-01-19T06:00:00Z"));
        let stats = run_batch(dir.path(), &catalog, &sim, &clock).unwrap();

        assert_eq!(stats.simulated, 1);
        assert_eq!(stats.errors, 1);
    }

    #[test]
    fn horizon_must_be_well_formed() {
        assert!(parse_horizon(Some(&"tomorrow".to_string())).is_err());
        assert!(parse_horizon(None).unwrap().is_none());
    }
}
