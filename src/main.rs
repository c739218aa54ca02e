mod config;
mod error;
mod heuristic;
mod puzzle;
mod report;
mod search;

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use config::Config;
use search::{search, Outcome, Strategy};

/// Sort a shuffled pancake stack with several search strategies and compare them.
#[derive(Debug, Parser)]
#[command(name = "pancake-sorter", version)]
struct Args {
    /// TOML configuration file; flags below override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of pancakes.
    #[arg(short = 'n', long)]
    size: Option<usize>,

    /// Seed for the shuffle and the random strategy.
    #[arg(long)]
    seed: Option<u64>,

    /// Explicit starting stack, e.g. 3,1,2.
    #[arg(long, value_delimiter = ',')]
    initial: Option<Vec<u32>>,

    /// Strategy to run; repeat to run several. Defaults to all of them.
    #[arg(short, long = "strategy", value_enum)]
    strategies: Vec<Strategy>,

    /// Stop a run after this many expansions.
    #[arg(long)]
    max_expansions: Option<u64>,

    /// Stop a run after this many seconds.
    #[arg(long)]
    time_limit: Option<u64>,

    /// Print the flips each solved run found.
    #[arg(long)]
    show_path: bool,

    /// Print the final open and closed sets of every run.
    #[arg(long)]
    show_sets: bool,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(size) = self.size {
            config.size = size;
            config.initial = None;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(initial) = &self.initial {
            config.initial = Some(initial.clone());
        }
        if !self.strategies.is_empty() {
            config.strategies = self.strategies.clone();
        }
        if let Some(max) = self.max_expansions {
            config.budget.max_expansions = Some(max);
        }
        if let Some(secs) = self.time_limit {
            config.budget.seconds_spent_limit = Some(secs);
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    args.apply(&mut config);
    config.validate().context("invalid configuration")?;

    let seed = config.seed.unwrap_or_else(rand::random);
    info!(
        "size={} seed={} strategies={:?}",
        config.effective_size(),
        seed,
        config.strategies
    );
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let initial = config
        .initial_state(&mut rng)
        .context("failed to build the initial stack")?;

    let stdout = io::stdout();
    let color = stdout.is_terminal();
    let mut out = stdout.lock();
    writeln!(out, "Initial stack: {}", initial)?;

    let reports: Vec<_> = config
        .strategies
        .iter()
        .map(|&strategy| search(&initial, strategy, &config.budget, &mut rng))
        .collect();

    report::print_table(&mut out, &reports, color).context("failed to print results")?;

    if args.show_path {
        for run in reports
            .iter()
            .filter(|r| matches!(r.outcome, Outcome::Solved(_)))
        {
            report::print_path(&mut out, &initial, run, color)?;
        }
    }

    if args.show_sets {
        for run in &reports {
            report::print_sets(&mut out, run, color)?;
        }
    }

    Ok(())
}
