//! Mutator
//!
//! Standalone mutation-testing loop. Takes an arbitrary target file,
//! applies one random defect per round, and keeps or reverts each
//! candidate based on an external verifier's exit status. Shares the
//! mutation engine with the replicator but never touches a habitat.

use clap::Parser;
use std::path::PathBuf;

use germline::harness::{self, HarnessOptions};
use germline::mutation;

/// Mutate a target file and keep what survives verification
#[derive(Parser, Debug)]
#[command(
    name = "mutator",
    version,
    about = "Mutate a target file and keep what survives verification",
    long_about = "Applies random single-token defects to a copy of the target \
                  (saved beside it as mutated_<name>) and accepts or reverts \
                  each round based on the --check command's exit status."
)]
struct Cli {
    /// Path to the file to mutate
    target: PathBuf,

    /// Number of mutation rounds
    #[arg(default_value_t = 1)]
    mutations: u32,

    /// Random seed (defaults to the current time)
    #[arg(long)]
    seed: Option<f64>,

    /// Verifier command; the candidate path is appended as its final argument
    #[arg(long)]
    check: Option<String>,

    /// Skip verification and accept every mutation
    #[arg(long)]
    no_environment: bool,

    /// Leave reserved-word tokens out of the mutation pool
    #[arg(long)]
    no_keywords: bool,
}

fn main() {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let seed = cli.seed.unwrap_or_else(mutation::time_seed);
    let check = if cli.no_environment { None } else { cli.check };
    tracing::info!(target = %cli.target.display(), mutations = cli.mutations, seed, "mutator starting");

    let options = HarnessOptions {
        target: cli.target,
        mutations: cli.mutations,
        seed,
        check,
        use_keywords: !cli.no_keywords,
    };

    if let Err(e) = harness::run(options) {
        eprintln!("Fatal: {:#}", e);
        std::process::exit(1);
    }
}
