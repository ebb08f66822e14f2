//! Stepview CLI
//!
//! Headless front end for the playback engine: play a sort to completion,
//! compare two sorts side by side, export traces, and verify that every
//! registered algorithm replays to sorted output.

mod config;
mod drive;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use stepview_algos::{algorithms, lookup, Preset};
use stepview_core::Trace;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{StepviewConfig, CONFIG_FILE};
use drive::{run_compare, run_single, Pace};

#[derive(Parser)]
#[command(name = "stepview")]
#[command(about = "Replay sorting algorithm runs step by step", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to stepview.toml (defaults to ./stepview.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one algorithm to completion and print its metrics
    Run {
        /// Algorithm key (see `stepview algos`)
        #[arg(short, long)]
        algo: String,

        /// Pace ticks with the system clock instead of a simulated one
        #[arg(long)]
        realtime: bool,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Play two algorithms over the same dataset side by side
    Compare {
        #[arg(short, long)]
        left: String,

        #[arg(short, long)]
        right: String,

        #[arg(long)]
        realtime: bool,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Write the serialized trace of one run
    Trace {
        #[arg(short, long)]
        algo: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Check that every algorithm's trace replays to the sorted dataset
    Verify {
        #[command(flatten)]
        overrides: Overrides,
    },

    /// Write a default stepview.toml
    Init {
        /// Directory to create the file in
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// List registered algorithms
    Algos,

    /// List dataset presets
    Presets,
}

/// Command-line overrides for values from stepview.toml
#[derive(Args, Debug)]
struct Overrides {
    #[arg(long)]
    preset: Option<Preset>,

    #[arg(short = 'n', long)]
    size: Option<usize>,

    #[arg(long)]
    min: Option<i64>,

    #[arg(long)]
    max: Option<i64>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    fps: Option<u32>,

    #[arg(long)]
    stride: Option<usize>,
}

impl Overrides {
    fn apply(self, config: &mut StepviewConfig) -> Result<()> {
        let dataset = &mut config.dataset;
        dataset.preset = self.preset.unwrap_or(dataset.preset);
        dataset.size = self.size.unwrap_or(dataset.size);
        dataset.min = self.min.unwrap_or(dataset.min);
        dataset.max = self.max.unwrap_or(dataset.max);
        dataset.seed = self.seed.unwrap_or(dataset.seed);

        let playback = &mut config.playback;
        playback.frames_per_second = self.fps.unwrap_or(playback.frames_per_second);
        playback.stride = self.stride.unwrap_or(playback.stride);
        playback.validate().context("Invalid playback options")?;
        Ok(())
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load(path: Option<&PathBuf>, overrides: Overrides) -> Result<StepviewConfig> {
    let mut config = StepviewConfig::load(path.map(PathBuf::as_path))?;
    overrides.apply(&mut config)?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            algo,
            realtime,
            overrides,
        } => {
            let config = load(cli.config.as_ref(), overrides)?;
            let info = lookup(&algo)?;
            let data = config.dataset.generate()?;
            info!(algo = info.key, n = data.len(), preset = %config.dataset.preset, "running");

            let summary = run_single(info, config.playback, data, &Pace::new(realtime))?;
            println!("{summary}");
        }

        Commands::Compare {
            left,
            right,
            realtime,
            overrides,
        } => {
            let config = load(cli.config.as_ref(), overrides)?;
            let (left, right) = (lookup(&left)?, lookup(&right)?);
            let data = config.dataset.generate()?;
            info!(left = left.key, right = right.key, n = data.len(), "comparing");

            let summary = run_compare(left, right, config.playback, data, &Pace::new(realtime))?;
            println!("{}", summary.left);
            println!("{}", summary.right);
            println!("max cursor gap: {}", summary.max_gap);
        }

        Commands::Trace {
            algo,
            out,
            overrides,
        } => {
            let config = load(cli.config.as_ref(), overrides)?;
            let info = lookup(&algo)?;
            let data = config.dataset.generate()?;
            let json = info
                .trace(&data)
                .to_json()
                .context("Failed to serialize trace")?;

            match out {
                Some(path) => {
                    fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(path = %path.display(), "trace written");
                }
                None => println!("{json}"),
            }
        }

        Commands::Verify { overrides } => {
            let config = load(cli.config.as_ref(), overrides)?;
            let data = config.dataset.generate()?;
            let mut expected = data.clone();
            expected.sort_unstable();

            let mut failures = 0;
            for info in algorithms() {
                let trace = info.trace(&data);
                let reparsed = Trace::from_json(&trace.to_json()?)
                    .with_context(|| format!("Failed to reparse {} trace", info.key))?;
                let replayed = reparsed.replay()?;
                let ok = replayed.state.values() == expected.as_slice();
                if !ok {
                    failures += 1;
                }
                println!(
                    "{:<10} {:<4} ops={:<6} comparisons={:<6} swaps={}",
                    info.key,
                    if ok { "ok" } else { "FAIL" },
                    trace.operations.len(),
                    replayed.metrics.comparisons,
                    replayed.metrics.swaps,
                );
            }
            if failures > 0 {
                bail!("{failures} algorithm(s) did not replay to sorted output");
            }
        }

        Commands::Init { path } => {
            let target = path.join(CONFIG_FILE);
            if target.exists() {
                bail!("{} already exists", target.display());
            }
            let content = StepviewConfig::default().to_toml()?;
            fs::write(&target, content)
                .with_context(|| format!("Failed to write {}", target.display()))?;
            info!(path = %target.display(), "config created");
        }

        Commands::Algos => {
            for info in algorithms() {
                println!(
                    "{:<10} {:<22} stable={:<5} in_place={:<5} comparison={:<5} best={:<12} avg={:<12} worst={}",
                    info.key,
                    info.name,
                    info.stable,
                    info.in_place,
                    info.comparison,
                    info.complexity.best,
                    info.complexity.avg,
                    info.complexity.worst,
                );
            }
        }

        Commands::Presets => {
            for preset in Preset::ALL {
                println!("{:<16} {}", preset.key(), preset.description());
            }
        }
    }

    Ok(())
}
