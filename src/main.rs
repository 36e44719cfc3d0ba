//! Bancor-lite command line
//!
//! Subcommands:
//!   - simulate: run the seeded random operation simulator and print a report
//!   - validate-genesis: check a genesis JSON file against every pool invariant
//!
//! Logging goes through tracing; `RUST_LOG` overrides the default `info`
//! filter, `--json-logs` switches to JSON lines.
//!
//! Created: 2026-10-17

use anyhow::{bail, Context, Result};
use bancorlite::config::BancorConfig;
use bancorlite::genesis::GenesisState;
use bancorlite::simulation::run_simulation;
use bancorlite::store::MemStore;
use bancorlite::testing::{MemBank, MockMarketKeeper, MockTokenKeeper};
use bancorlite::BancorKeeper;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Bancor-lite bonding curve pools
#[derive(Parser)]
#[command(name = "bancorlite", version)]
struct Args {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run randomized init/trade/cancel operations and check invariants
    Simulate {
        /// TOML config with [params] and [simulation] sections
        #[arg(short, long, env = "BANCOR_CONFIG")]
        config: Option<PathBuf>,

        /// Override the configured seed
        #[arg(long)]
        seed: Option<u64>,

        /// Override the configured number of operations
        #[arg(long)]
        ops: Option<usize>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a genesis JSON file
    ValidateGenesis {
        file: PathBuf,
    },
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        fmt().json().with_env_filter(filter).init();
    } else {
        fmt().with_env_filter(filter).with_target(false).init();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.json_logs);

    match args.command {
        Command::Simulate { config, seed, ops, json } => simulate(config, seed, ops, json),
        Command::ValidateGenesis { file } => validate_genesis(file),
    }
}

fn simulate(config_path: Option<PathBuf>, seed: Option<u64>, ops: Option<usize>, json: bool) -> Result<()> {
    let mut config = BancorConfig::load_with_env(config_path.as_deref())
        .context("Failed to load configuration")?;
    if let Some(seed) = seed {
        config.simulation.seed = seed;
    }
    if let Some(ops) = ops {
        config.simulation.operations = ops;
    }
    info!(
        "Params: reserve {} | create fee {} | cancel fee {} | trade fee {} bps",
        config.params.reserve_denom,
        config.params.create_bancor_fee,
        config.params.cancel_bancor_fee,
        config.params.trade_fee_rate
    );

    let report = run_simulation(config.params, config.simulation)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Seed:        {}", report.seed);
        println!("Operations:  {}", report.operations);
        for (kind, stats) in &report.ops {
            println!("  {:<14} delivered {:>6}  rejected {:>6}", kind, stats.delivered, stats.rejected);
        }
        for (code, count) in &report.rejections {
            println!("  code {:<9} {:>6}", code, count);
        }
        println!("Pools left:  {}", report.final_pools);
        println!("Violations:  {}", report.invariant_violations.len());
    }

    if !report.is_clean() {
        for violation in &report.invariant_violations {
            warn!("{}", violation);
        }
        bail!("{} invariant violations", report.invariant_violations.len());
    }
    Ok(())
}

fn validate_genesis(file: PathBuf) -> Result<()> {
    let genesis = GenesisState::load(&file)?;
    genesis
        .validate()
        .with_context(|| format!("Invalid genesis: {}", file.display()))?;

    // import into an empty store to exercise the same write path as the chain
    let mut keeper = BancorKeeper::new(
        MemStore::new(),
        MockTokenKeeper::new(),
        MockMarketKeeper::new(),
        MemBank::new(),
    );
    keeper.init_genesis(&genesis)?;
    let exported = keeper.export_genesis(&genesis.params)?;

    info!(
        "Genesis OK: {} pools, reserve {}",
        exported.pools.len(),
        exported.params.reserve_denom
    );
    for pool in &exported.pools {
        println!(
            "{:<24} owner {} | stock {}/{} | price {} | money {}",
            pool.key(),
            pool.owner,
            pool.stock_in_pool,
            pool.max_supply,
            pool.price,
            pool.money_in_pool
        );
    }
    Ok(())
}
