//! SwingDesk CLI: inspect configured policies and evaluate snapshots.
//!
//! Commands:
//! - `strategies`: list the enabled policies for a config
//! - `evaluate`: run policies over JSON `StrategyInput` snapshots and print
//!   one JSON `TradeIntent` per line
//!
//! Logs go to stderr and are filtered by `RUST_LOG` (default `info`), so
//! stdout stays machine-readable.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use swingdesk_core::batch::{evaluate_all, DecisionSummary};
use swingdesk_core::strategies::ALL_STRATEGY_IDS;
use swingdesk_core::{build_strategies, Strategy, StrategyInput, SwingConfig};
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "swingdesk",
    about = "SwingDesk CLI: swing-trading decision engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the policies enabled by a config (all nine by default).
    Strategies {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Evaluate policies over snapshots read from a JSON file.
    Evaluate {
        /// JSON file holding one StrategyInput or an array of them.
        #[arg(long)]
        input: PathBuf,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Restrict to these policy ids (repeatable). Defaults to every enabled policy.
        #[arg(long = "strategy")]
        strategies: Vec<String>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Strategies { config } => run_list(config.as_deref()),
        Commands::Evaluate {
            input,
            config,
            strategies,
        } => run_evaluate(&input, config.as_deref(), &strategies),
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<SwingConfig> {
    match path {
        Some(p) => SwingConfig::load(p).with_context(|| format!("loading {}", p.display())),
        None => Ok(SwingConfig::default()),
    }
}

fn run_list(config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    for strategy in build_strategies(&config)? {
        println!("{:<22} {}", strategy.id(), strategy.name());
    }
    Ok(())
}

fn select(
    config: &SwingConfig,
    only: &[String],
) -> Result<Vec<Box<dyn Strategy>>> {
    for id in only {
        if !ALL_STRATEGY_IDS.contains(&id.as_str()) {
            bail!("unknown strategy id: {id} (known: {})", ALL_STRATEGY_IDS.join(", "));
        }
    }
    let mut strategies = build_strategies(config)?;
    if !only.is_empty() {
        strategies.retain(|s| only.iter().any(|id| id == s.id()));
        if strategies.is_empty() {
            bail!("none of the requested strategies are enabled in the config");
        }
    }
    Ok(strategies)
}

/// Accept either a JSON array of inputs or a single input object.
fn read_inputs(path: &Path) -> Result<Vec<StrategyInput>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("parsing {} as JSON", path.display()))?;
    let inputs: Vec<StrategyInput> = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        vec![serde_json::from_value(value)?]
    };

    // Policies still evaluate these; the warnings make bad upstream data visible.
    for input in &inputs {
        let insane = input.bars.iter().filter(|b| !b.is_sane()).count();
        if insane > 0 {
            warn!(symbol = input.symbol(), bars = insane, "inconsistent OHLC bars in input");
        }
        if !input.scores.is_in_unit_range() {
            warn!(symbol = input.symbol(), "scores outside [0, 1]");
        }
    }
    Ok(inputs)
}

fn run_evaluate(input: &Path, config: Option<&Path>, only: &[String]) -> Result<()> {
    let config = load_config(config)?;
    let strategies = select(&config, only)?;
    let inputs = read_inputs(input)?;
    if inputs.is_empty() {
        warn!(path = %input.display(), "no snapshots to evaluate");
    }
    info!(
        snapshots = inputs.len(),
        strategies = strategies.len(),
        "evaluating"
    );

    let intents = evaluate_all(&strategies, &inputs);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for intent in &intents {
        serde_json::to_writer(&mut out, intent)?;
        writeln!(out)?;
    }
    out.flush()?;

    let summary = DecisionSummary::from_intents(&intents);
    eprintln!("{:<22} {:>5} {:>5} {:>5} {:>5}", "strategy", "BUY", "HOLD", "EXIT", "SKIP");
    for (id, counts) in &summary.by_strategy {
        eprintln!(
            "{:<22} {:>5} {:>5} {:>5} {:>5}",
            id, counts.buy, counts.hold, counts.exit, counts.skip
        );
    }
    let totals = summary.totals();
    eprintln!(
        "{:<22} {:>5} {:>5} {:>5} {:>5}",
        "total", totals.buy, totals.hold, totals.exit, totals.skip
    );
    Ok(())
}
