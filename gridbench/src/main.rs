//! `gridbench -a <algorithm> <map-or-directory>`
//!
//! Prints one result line per map to stdout. Given a directory, every
//! `*.map` below it is benchmarked and a `total` line follows.

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use gridbench::{Baseline, BenchConfig, OutputFormat, Runner, run_corpus, settle_baseline};
use gridbench_movingai::ScenarioPolicy;
use gridbench_paths::{Algorithm, Corners};

#[derive(Parser, Debug)]
#[command(name = "gridbench")]
#[command(about = "Benchmark grid pathfinding algorithms on MovingAI maps")]
struct Args {
    /// Search algorithm: jps, astar or dijkstra
    #[arg(short, long)]
    algorithm: Algorithm,

    /// A .map file, or a directory searched recursively for them
    path: PathBuf,

    /// Config file (default: ./gridbench.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Diagonal corner policy: forbid or allow
    #[arg(long)]
    corners: Option<Corners>,

    /// Worker threads (0 = one per core)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Per-search time budget in milliseconds
    #[arg(long)]
    time_budget_ms: Option<u64>,

    /// Timed passes over each map
    #[arg(short, long)]
    samples: Option<usize>,

    /// Query source: file, file-or-sample or sample
    #[arg(long)]
    scenarios: Option<ScenarioPolicy>,

    /// Queries to draw when sampling
    #[arg(long)]
    sample_count: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Only sample start/goal pairs that are connected
    #[arg(long)]
    reachable_only: bool,

    /// Check solved costs against the scenario file
    #[arg(long)]
    verify: bool,

    #[arg(long)]
    tolerance: Option<f64>,

    /// Output format: text or json
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Compare timings with a saved baseline (needs --samples >= 2)
    #[arg(long, value_name = "FILE")]
    baseline: Option<PathBuf>,

    /// Save this run's timings as a baseline (needs --samples >= 2)
    #[arg(long, value_name = "FILE")]
    save_baseline: Option<PathBuf>,

    /// More logging on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn apply(&self, config: &mut BenchConfig) {
        if let Some(v) = self.corners {
            config.corners = v;
        }
        if let Some(v) = self.threads {
            config.threads = v;
        }
        if self.time_budget_ms.is_some() {
            config.time_budget_ms = self.time_budget_ms;
        }
        if let Some(v) = self.samples {
            config.samples = v;
        }
        if let Some(v) = self.scenarios {
            config.scenarios = v;
        }
        if let Some(v) = self.sample_count {
            config.sample_count = v;
        }
        if let Some(v) = self.seed {
            config.seed = v;
        }
        config.reachable_only |= self.reachable_only;
        config.verify |= self.verify;
        if let Some(v) = self.tolerance {
            config.tolerance = v;
        }
        if let Some(v) = self.format {
            config.format = v;
        }
        if self.baseline.is_some() {
            config.baseline.clone_from(&self.baseline);
        }
        if self.save_baseline.is_some() {
            config.save_baseline.clone_from(&self.save_baseline);
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let mut config = BenchConfig::discover(args.config.as_deref())?;
    args.apply(&mut config);
    let format = config.format;
    let runner = Runner::new(config)?;
    let mut measured = Baseline::new();

    if args.path.is_dir() {
        let totals = run_corpus(&runner, &args.path, args.algorithm, |report| {
            measured.record_report(report);
            match format {
                OutputFormat::Text => println!("{report}"),
                OutputFormat::Json => println!("{}", report.to_json()),
            }
        })?;
        measured.record_total(args.algorithm, totals.time());
        match format {
            OutputFormat::Text => println!("{totals}"),
            OutputFormat::Json => println!("{}", totals.to_json()),
        }
    } else {
        let report = runner
            .run_map(&args.path, args.algorithm)
            .with_context(|| format!("cannot benchmark {}", args.path.display()))?;
        measured.record_report(&report);
        measured.record_total(args.algorithm, report.time);
        match format {
            OutputFormat::Text => println!("{report}"),
            OutputFormat::Json => println!("{}", report.to_json()),
        }
    }

    for c in settle_baseline(runner.config(), &measured)? {
        match format {
            OutputFormat::Text => println!("{c}"),
            OutputFormat::Json => println!("{}", c.to_json()),
        }
    }
    Ok(())
}
