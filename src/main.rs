//! Germline Replicator
//!
//! The entry point for one creature process. Parses the CLI, loads
//! habitat settings and the genome, wires the food pool, hatchery, and
//! telemetry sink, and runs the creature until natural death or a halt.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::signal;
use tracing::info;

use germline::config::{resolve_habitat, Settings};
use germline::genome::Genome;
use germline::lifecycle::{watch_halt_file, CancelToken, Creature, CreatureOptions};
use germline::mutation;
use germline::pool::FilePool;
use germline::replication::lineage::brood_summary;
use germline::replication::{starter_genome, Hatchery, HatcheryOptions, Lineage, SpawnLedger};
use germline::telemetry::EventSink;
use germline::types::CreatureState;

/// Germline -- self-replicating creature runtime
#[derive(Parser, Debug)]
#[command(
    name = "germline",
    version,
    about = "Germline -- self-replicating creature runtime",
    long_about = "Runs one creature through its lifecycle in a shared habitat. \
                  Reproduction writes a mutated copy of the creature's genome \
                  and launches it as an independent detached process."
)]
struct Cli {
    /// Dotted lineage identity (empty for the progenitor)
    #[arg(long, default_value = "")]
    id: String,

    /// Random seed (defaults to the current time)
    #[arg(long)]
    seed: Option<f64>,

    /// Maximum lineage depth before construction is refused
    #[arg(long, default_value_t = 3)]
    maxgen: u32,

    /// Allow reproduction (the default)
    #[arg(long, overrides_with = "no_reproduce")]
    reproduce: bool,

    /// Forbid reproduction and drop the inter-tick delay
    #[arg(long)]
    no_reproduce: bool,

    /// Genome file to hatch from (defaults to the built-in starter genome)
    #[arg(long)]
    genome: Option<PathBuf>,

    /// Ticks to live (0 = a full natural lifespan)
    #[arg(long, default_value_t = 0)]
    ticks: u32,

    /// Habitat directory shared by the whole population
    #[arg(long, default_value = ".")]
    habitat: String,

    /// Leave reserved-word tokens out of the mutation pool
    #[arg(long)]
    no_keywords: bool,

    /// Print the habitat's spawn ledger and exit
    #[arg(long)]
    lineage: bool,
}

// ---- Lineage Command --------------------------------------------------------

/// Print the spawn ledger: per-parent brood counts plus the most recent
/// spawns.
fn show_lineage(habitat: &Path, settings: &Settings) {
    let ledger_path = habitat.join(&settings.ledger_file);
    if !ledger_path.exists() {
        println!(
            "No spawn ledger at {}; nothing has reproduced here yet.",
            ledger_path.display()
        );
        return;
    }

    let ledger = match SpawnLedger::open(&ledger_path) {
        Ok(ledger) => ledger,
        Err(e) => {
            eprintln!("Failed to open spawn ledger: {}", e);
            return;
        }
    };

    match brood_summary(&ledger) {
        Ok(summary) => println!("{}", summary.cyan()),
        Err(e) => eprintln!("Failed to summarize spawn ledger: {}", e),
    }
}

// ---- Main Run ---------------------------------------------------------------

/// Load the genome, build the habitat collaborators, construct the
/// creature (the depth guard fires here, before any side effect), and
/// run it to its end.
async fn run(cli: Cli, habitat: PathBuf, settings: Settings) -> Result<()> {
    let seed = cli.seed.unwrap_or_else(mutation::time_seed);
    let reproduce = cli.reproduce || !cli.no_reproduce;

    // Verification runs skip both replication and real-time pacing.
    let tick_delay = if reproduce {
        Duration::from_millis(settings.tick_delay_ms)
    } else {
        Duration::ZERO
    };

    let (genome_text, genome_path) = match &cli.genome {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading genome {}", path.display()))?;
            (text, Some(path.clone()))
        }
        None => (starter_genome(), None),
    };
    let genome = Genome::parse(&genome_text).context("genome is not viable")?;

    let lineage = Lineage::new(cli.id.clone());
    info!(
        id = %lineage,
        generation = lineage.generation(),
        seed,
        habitat = %habitat.display(),
        version = env!("CARGO_PKG_VERSION"),
        "waking up"
    );

    let pool = FilePool::new(&habitat, &settings);
    let sink = EventSink::bind(&settings.collector_addr);
    let hatchery = Hatchery::new(HatcheryOptions {
        enabled: reproduce,
        parent: lineage.clone(),
        habitat: habitat.clone(),
        brood_dir: habitat.join(&settings.brood_dir),
        ledger_path: habitat.join(&settings.ledger_file),
        genome_text,
        weights: genome.weights,
        use_keywords: !cli.no_keywords,
        max_depth: cli.maxgen,
    });

    let mut creature = Creature::new(
        CreatureOptions {
            lineage: lineage.clone(),
            max_depth: cli.maxgen,
            genome,
            genome_path,
            seed,
            tick_delay,
        },
        Box::new(pool),
        Box::new(hatchery),
        sink,
    )?;

    fs::create_dir_all(&habitat)
        .with_context(|| format!("creating habitat {}", habitat.display()))?;

    // Cooperative shutdown: signals and the halt sentinel both trip the
    // same token, and the creature checks it between ticks only.
    let cancel = CancelToken::new();
    let watcher = watch_halt_file(
        habitat.join(&settings.halt_file),
        Duration::from_millis(500),
        cancel.clone(),
    );
    let signals = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let ctrl_c = signal::ctrl_c();
            #[cfg(unix)]
            {
                let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
                    .expect("Failed to register SIGTERM handler");
                tokio::select! {
                    _ = ctrl_c => info!("received SIGINT, halting"),
                    _ = sigterm.recv() => info!("received SIGTERM, halting"),
                }
            }
            #[cfg(not(unix))]
            {
                ctrl_c.await.expect("Failed to register Ctrl+C handler");
                info!("received shutdown signal, halting");
            }
            cancel.cancel();
        })
    };

    creature.live(cli.ticks, &cancel).await;

    watcher.abort();
    signals.abort();

    match creature.state() {
        CreatureState::Dead(reason) => println!(
            "{}",
            format!(
                "{} died of {} at age {} with {} offspring",
                display_name(lineage.as_str()),
                reason,
                creature.age(),
                creature.offspring()
            )
            .bold()
        ),
        CreatureState::Alive => println!(
            "{}",
            format!(
                "{} stopped at age {} with {} offspring",
                display_name(lineage.as_str()),
                creature.age(),
                creature.offspring()
            )
            .bold()
        ),
    }

    Ok(())
}

fn display_name(id: &str) -> &str {
    if id.is_empty() {
        "<progenitor>"
    } else {
        id
    }
}

// ---- Entry Point ------------------------------------------------------------

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let habitat = resolve_habitat(&cli.habitat);
    let settings = Settings::load(&habitat);
    tracing_subscriber::fmt()
        .with_max_level(settings.log_level.tracing_level())
        .init();

    if cli.lineage {
        show_lineage(&habitat, &settings);
        return;
    }

    if let Err(e) = run(cli, habitat, settings).await {
        eprintln!("Fatal: {:#}", e);
        std::process::exit(1);
    }
}
