//! Serpent CLI
//!
//! Thin driver around `serpent_core`:
//! - replay host snapshots through the pipeline
//! - seeded soak runs over random worlds
//! - dump config presets

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serpent_core::{random_world, BotConfig, BotCore, RawSnapshot, Reason};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "serpent")]
#[command(about = "Run the serpent bot core on snapshots or random worlds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run snapshots from a JSON file (one object or an array)
    Decide {
        /// Snapshot JSON file path
        #[arg(long)]
        snapshot: PathBuf,

        /// Config file (.json, .yaml, .yml); defaults to the balanced preset.
        /// A missing file or out-of-range values fall back to the defaults.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Repeat the last snapshot this many times
        #[arg(long, default_value_t = 1)]
        ticks: usize,

        /// Print the full tick report instead of the decision
        #[arg(long, default_value = "false")]
        report: bool,
    },

    /// Run the pipeline over seeded random worlds
    Soak {
        #[arg(long, default_value_t = 0)]
        seed: u64,

        #[arg(long, default_value_t = 1000)]
        ticks: u64,

        #[arg(long, default_value_t = 16)]
        rivals: usize,

        /// Preset name (balanced, cautious, aggressive, deterministic)
        #[arg(long, default_value = "balanced")]
        preset: String,
    },

    /// Print a config preset as JSON
    Preset {
        #[arg(long, default_value = "balanced")]
        name: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Decide { snapshot, config, ticks, report } => decide(&snapshot, config.as_deref(), ticks, report),
        Commands::Soak { seed, ticks, rivals, preset } => soak(seed, ticks, rivals, &preset),
        Commands::Preset { name } => {
            let config = preset(&name)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn preset(name: &str) -> Result<BotConfig> {
    match BotConfig::preset(name) {
        Some(config) => Ok(config),
        None => bail!("unknown preset: {}", name),
    }
}

fn load_snapshots(path: &Path) -> Result<Vec<RawSnapshot>> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    let snapshots = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        vec![serde_json::from_value(value)?]
    };
    Ok(snapshots)
}

fn decide(snapshot: &Path, config: Option<&Path>, ticks: usize, report: bool) -> Result<()> {
    let config = match config {
        Some(path) => match BotConfig::load(path) {
            Ok(config) => config,
            Err(err) if err.is_recoverable() => {
                warn!(path = %path.display(), error = %err, "config unusable, using defaults");
                BotConfig::default()
            }
            Err(err) => return Err(err).with_context(|| format!("loading config {}", path.display())),
        },
        None => BotConfig::default(),
    };
    let snapshots = load_snapshots(snapshot)?;
    let Some(last) = snapshots.last() else {
        bail!("{} contains no snapshots", snapshot.display());
    };
    info!(count = snapshots.len(), "loaded snapshots");

    let mut core = BotCore::new(config);
    let repeats = std::iter::repeat(last).take(ticks.saturating_sub(1));
    for raw in snapshots.iter().chain(repeats) {
        let decision = core.tick_raw(raw);
        if report {
            println!("{}", serde_json::to_string(&core.last_report())?);
        } else {
            println!("{}", serde_json::to_string(&decision)?);
        }
    }
    Ok(())
}

fn soak(seed: u64, ticks: u64, rivals: usize, preset_name: &str) -> Result<()> {
    let mut core = BotCore::new(preset(preset_name)?);
    let mut reasons: BTreeMap<Reason, u64> = BTreeMap::new();
    let mut boosts = 0u64;
    let mut circling = 0u64;

    for t in 0..ticks {
        let world = random_world(seed.wrapping_add(t), rivals);
        let Some(decision) = core.tick(&world) else {
            continue;
        };
        if !decision.heading.is_finite() {
            bail!("non-finite heading at tick {} (seed {})", t, seed.wrapping_add(t));
        }
        *reasons.entry(decision.reason).or_default() += 1;
        boosts += u64::from(decision.boost);
        circling += u64::from(decision.mode == serpent_core::Mode::DefensiveCircle);
    }

    println!("Soak: {} ticks, {} rivals, preset {}", ticks, rivals, preset_name);
    for (reason, count) in &reasons {
        println!("   {:<22} {:>8} ({:.1}%)", reason.as_str(), count, *count as f64 * 100.0 / ticks.max(1) as f64);
    }
    println!("   boosts: {}  circling: {}", boosts, circling);
    let stats = core.stats();
    println!("   tracked rivals at end: {} (hunters {})", stats.active, stats.hunters);
    Ok(())
}
