//! Randomized Operation Simulator
//!
//! Drives a `SimApp` with a weighted mix of init / trade / cancel messages
//! from a seeded RNG, and checks the pool invariants after every message:
//!   - every pool record sits on its curve, reserves within [0, max_supply]
//!   - each owner's frozen balance covers the reserves of its pools
//!   - total supply of every denom (spendable + frozen + fees) is constant
//!
//! Same seed and config -> same report.
//!
//! Created: 2026-10-17

use alloy_primitives::{Address, U256};
use anyhow::{bail, Context, Result};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::msgs::{Msg, MsgBancorCancel, MsgBancorInit, MsgBancorTrade};
use crate::params::Params;
use crate::pool::Pool;
use crate::testing::SimApp;
use crate::types::pair_key;

/// Non-reserve money denom the simulator quotes some pools in
pub const ALT_MONEY_DENOM: &str = "usd";

const STOCK_SUPPLY: u64 = 10_000_000;
const ACCOUNT_FUNDING: u64 = 1_000_000_000_000_000;
/// One day
const MAX_BLOCK_INTERVAL_SECS: i64 = 86_400;

// ── Config ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_operations")]
    pub operations: usize,
    #[serde(default = "default_accounts")]
    pub accounts: usize,
    #[serde(default = "default_tokens")]
    pub tokens: usize,
    #[serde(default = "default_weight")]
    pub weight_init: u32,
    #[serde(default = "default_weight")]
    pub weight_trade: u32,
    #[serde(default = "default_weight")]
    pub weight_cancel: u32,
    /// Seconds between blocks; one message per block
    #[serde(default = "default_block_interval")]
    pub block_interval_secs: i64,
}

fn default_seed() -> u64 { 42 }
fn default_operations() -> usize { 500 }
fn default_accounts() -> usize { 5 }
fn default_tokens() -> usize { 3 }
fn default_weight() -> u32 { 100 }
fn default_block_interval() -> i64 { 5 }

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            operations: default_operations(),
            accounts: default_accounts(),
            tokens: default_tokens(),
            weight_init: default_weight(),
            weight_trade: default_weight(),
            weight_cancel: default_weight(),
            block_interval_secs: default_block_interval(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.accounts < 2 {
            bail!("simulation needs at least 2 accounts, got {}", self.accounts);
        }
        if self.accounts > 255 {
            bail!("simulation supports at most 255 accounts, got {}", self.accounts);
        }
        if self.tokens == 0 {
            bail!("simulation needs at least 1 stock token");
        }
        if self.weight_init == 0 && self.weight_trade == 0 && self.weight_cancel == 0 {
            bail!("all operation weights are zero");
        }
        if !(0..=MAX_BLOCK_INTERVAL_SECS).contains(&self.block_interval_secs) {
            bail!(
                "block interval must be within [0, {}], got {}",
                MAX_BLOCK_INTERVAL_SECS,
                self.block_interval_secs
            );
        }
        Ok(())
    }

    fn weights(&self) -> [u32; 3] {
        [self.weight_init, self.weight_trade, self.weight_cancel]
    }
}

// ── Report ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OpStats {
    pub delivered: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    pub seed: u64,
    pub operations: usize,
    /// Keyed by message kind
    pub ops: BTreeMap<String, OpStats>,
    /// Rejection count per error code
    pub rejections: BTreeMap<u32, usize>,
    pub final_pools: usize,
    pub invariant_violations: Vec<String>,
}

impl SimulationReport {
    pub fn is_clean(&self) -> bool {
        self.invariant_violations.is_empty()
    }

    pub fn delivered(&self, kind: &str) -> usize {
        self.ops.get(kind).map(|s| s.delivered).unwrap_or(0)
    }
}

// ── Runner ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum OpKind {
    Init,
    Trade,
    Cancel,
}

const OP_KINDS: [OpKind; 3] = [OpKind::Init, OpKind::Trade, OpKind::Cancel];

pub struct Simulation {
    app: SimApp,
    rng: ChaCha20Rng,
    chooser: WeightedIndex<u32>,
    config: SimulationConfig,
    accounts: Vec<Address>,
    stocks: Vec<String>,
    /// Stock denom -> issuer
    issuers: BTreeMap<String, Address>,
    supply: BTreeMap<String, U256>,
    report: SimulationReport,
}

impl Simulation {
    pub fn new(params: Params, config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        params.validate().context("invalid simulation params")?;
        let chooser = WeightedIndex::new(config.weights()).context("invalid operation weights")?;
        let mut rng = ChaCha20Rng::seed_from_u64(config.seed);

        let mut app = SimApp::with_params(params);
        let accounts: Vec<Address> = (0..config.accounts)
            .map(|i| Address::repeat_byte(i as u8 + 1))
            .collect();

        let reserve = app.params.reserve_denom.clone();
        app.issue_token(ALT_MONEY_DENOM, accounts[0], U256::ZERO);
        for account in &accounts {
            app.fund(*account, &reserve, U256::from(ACCOUNT_FUNDING));
            app.fund(*account, ALT_MONEY_DENOM, U256::from(ACCOUNT_FUNDING));
        }

        let mut stocks = Vec::with_capacity(config.tokens);
        let mut issuers = BTreeMap::new();
        for i in 0..config.tokens {
            let denom = format!("tk{}", i);
            let issuer = accounts[i % accounts.len()];
            app.issue_token(&denom, issuer, U256::from(STOCK_SUPPLY));
            // cents between 0.01 and 10.00
            let last_price = Decimal::new(rng.gen_range(1..=1000), 2);
            app.add_market(&pair_key(&denom, &reserve), Some(last_price));
            issuers.insert(denom.clone(), issuer);
            stocks.push(denom);
        }

        let mut supply = BTreeMap::new();
        for denom in stocks.iter().map(String::as_str).chain([reserve.as_str(), ALT_MONEY_DENOM]) {
            supply.insert(denom.to_string(), app.keeper.bank().total_supply(denom));
        }

        let report = SimulationReport {
            seed: config.seed,
            ..SimulationReport::default()
        };

        Ok(Self {
            app,
            rng,
            chooser,
            config,
            accounts,
            stocks,
            issuers,
            supply,
            report,
        })
    }

    pub fn app(&self) -> &SimApp {
        &self.app
    }

    /// Run every configured operation and return the report
    pub fn run(mut self) -> SimulationReport {
        info!(
            "Simulation starting: seed {} | {} operations | {} accounts | {} stocks",
            self.config.seed, self.config.operations, self.accounts.len(), self.stocks.len()
        );
        for step in 0..self.config.operations {
            self.step(step);
        }
        self.report.final_pools = self.pools().len();
        info!(
            "Simulation done: {} operations | {} pools left | {} violations",
            self.report.operations,
            self.report.final_pools,
            self.report.invariant_violations.len()
        );
        self.report
    }

    fn step(&mut self, step: usize) {
        if let Err(e) = self.app.next_block(self.config.block_interval_secs) {
            warn!("Step {}: cannot advance block: {}", step, e);
            self.report.invariant_violations.push(format!("step {}: {}", step, e));
            return;
        }
        let msg = match OP_KINDS[self.chooser.sample(&mut self.rng)] {
            OpKind::Init => self.random_init(),
            OpKind::Trade => self.random_trade(),
            OpKind::Cancel => self.random_cancel(),
        };
        let kind = msg.kind();
        let result = self.app.deliver(msg);

        self.report.operations += 1;
        let stats = self.report.ops.entry(kind.to_string()).or_default();
        match result {
            Ok(_) => stats.delivered += 1,
            Err(e) => {
                stats.rejected += 1;
                *self.report.rejections.entry(e.code()).or_default() += 1;
                debug!("Step {}: {} rejected: {}", step, kind, e);
            }
        }

        for violation in self.check_invariants() {
            warn!("Step {}: invariant violated after {}: {}", step, kind, violation);
            self.report
                .invariant_violations
                .push(format!("step {}: {}", step, violation));
        }
    }

    fn pools(&self) -> Vec<Pool> {
        self.app.keeper.pools().unwrap_or_default()
    }

    fn random_account(&mut self) -> Address {
        self.accounts[self.rng.gen_range(0..self.accounts.len())]
    }

    fn random_pool(&mut self) -> Option<Pool> {
        self.pools().choose(&mut self.rng).cloned()
    }

    fn random_init(&mut self) -> Msg {
        let stock = self.stocks[self.rng.gen_range(0..self.stocks.len())].clone();
        let money = if self.rng.gen_bool(0.25) {
            ALT_MONEY_DENOM.to_string()
        } else {
            self.app.params.reserve_denom.clone()
        };
        // mostly the issuer, sometimes a stranger
        let issuer = self.issuers.get(&stock).copied();
        let owner = match issuer {
            Some(issuer) if !self.rng.gen_bool(0.1) => issuer,
            _ => self.random_account(),
        };
        let init_price = Decimal::new(self.rng.gen_range(0..=500), 2);
        let max_price = init_price + Decimal::new(self.rng.gen_range(0..=500), 2);
        Msg::Init(MsgBancorInit {
            owner,
            stock,
            money,
            init_price,
            max_supply: U256::from(self.rng.gen_range(1_000u64..=200_000)),
            max_price,
            enable_cancel_time: self.app.ctx.unix_time() + self.rng.gen_range(0..=60),
        })
    }

    fn random_trade(&mut self) -> Msg {
        let sender = self.random_account();
        let is_buy = self.rng.gen_bool(0.5);
        let Some(pool) = self.random_pool() else {
            // no pool yet: exercises the not-found path
            let stock = self.stocks[0].clone();
            return Msg::Trade(MsgBancorTrade {
                sender,
                stock,
                money: self.app.params.reserve_denom.clone(),
                amount: U256::from(1u64),
                is_buy,
                money_limit: U256::ZERO,
            });
        };

        // slightly past the reserve on either side
        let room = if is_buy {
            pool.stock_in_pool
        } else {
            pool.max_supply - pool.stock_in_pool
        };
        let room = u64::try_from(room).unwrap_or(u64::MAX - 10);
        let amount = self.rng.gen_range(1..=room + 10);

        let money_limit = if self.rng.gen_bool(0.2) {
            U256::from(self.rng.gen_range(0u64..=2_000_000))
        } else {
            U256::ZERO
        };

        Msg::Trade(MsgBancorTrade {
            sender,
            stock: pool.stock,
            money: pool.money,
            amount: U256::from(amount),
            is_buy,
            money_limit,
        })
    }

    fn random_cancel(&mut self) -> Msg {
        let stranger = self.random_account();
        match self.random_pool() {
            Some(pool) => Msg::Cancel(MsgBancorCancel {
                owner: if self.rng.gen_bool(0.9) { pool.owner } else { stranger },
                stock: pool.stock,
                money: pool.money,
            }),
            None => Msg::Cancel(MsgBancorCancel {
                owner: stranger,
                stock: self.stocks[0].clone(),
                money: self.app.params.reserve_denom.clone(),
            }),
        }
    }

    /// Violations of the pool and ledger invariants in the current state
    pub fn check_invariants(&self) -> Vec<String> {
        let mut violations = Vec::new();
        let pools = match self.app.keeper.pools() {
            Ok(pools) => pools,
            Err(e) => return vec![format!("pool listing failed: {}", e)],
        };

        let mut escrow: BTreeMap<(Address, String), U256> = BTreeMap::new();
        for pool in &pools {
            if let Err(e) = pool.validate() {
                violations.push(e.to_string());
            }
            for (denom, amount) in [(&pool.stock, pool.stock_in_pool), (&pool.money, pool.money_in_pool)] {
                let entry = escrow.entry((pool.owner, denom.clone())).or_insert(U256::ZERO);
                *entry = entry.saturating_add(amount);
            }
        }
        for ((owner, denom), reserved) in &escrow {
            let frozen = self.app.frozen(*owner, denom);
            if frozen < *reserved {
                violations.push(format!(
                    "{} has {} {} frozen, pools hold {}",
                    owner, frozen, denom, reserved
                ));
            }
        }

        for (denom, expected) in &self.supply {
            let actual = self.app.keeper.bank().total_supply(denom);
            if actual != *expected {
                violations.push(format!(
                    "total supply of {} changed: {} -> {}",
                    denom, expected, actual
                ));
            }
        }
        violations
    }
}

/// Build and run a simulation in one call
pub fn run_simulation(params: Params, config: SimulationConfig) -> Result<SimulationReport> {
    Ok(Simulation::new(params, config)?.run())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(seed: u64) -> SimulationConfig {
        SimulationConfig {
            seed,
            operations: 300,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_invariants_hold_over_random_operations() {
        for seed in [1, 7, 42] {
            let report = run_simulation(Params::default(), small_config(seed)).unwrap();
            assert!(report.is_clean(), "seed {}: {:?}", seed, report.invariant_violations);
            assert_eq!(report.operations, 300);
            assert!(report.delivered("bancor_init") > 0);
            assert!(report.delivered("bancor_trade") > 0);
        }
    }

    #[test]
    fn test_same_seed_same_report() {
        let a = run_simulation(Params::default(), small_config(9)).unwrap();
        let b = run_simulation(Params::default(), small_config(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_trade_only_weights() {
        let config = SimulationConfig {
            operations: 50,
            weight_init: 0,
            weight_cancel: 0,
            ..SimulationConfig::default()
        };
        let report = run_simulation(Params::default(), config).unwrap();
        // no pool is ever created, so every trade is rejected
        assert_eq!(report.delivered("bancor_trade"), 0);
        assert_eq!(report.ops["bancor_trade"].rejected, 50);
        assert!(report.is_clean());
    }

    #[test]
    fn test_zero_weights_rejected() {
        let config = SimulationConfig {
            weight_init: 0,
            weight_trade: 0,
            weight_cancel: 0,
            ..SimulationConfig::default()
        };
        assert!(Simulation::new(Params::default(), config).is_err());
    }

    #[test]
    fn test_block_interval_bounds() {
        let config = SimulationConfig {
            block_interval_secs: MAX_BLOCK_INTERVAL_SECS + 1,
            ..SimulationConfig::default()
        };
        assert!(Simulation::new(Params::default(), config).is_err());

        let config = SimulationConfig {
            operations: 10,
            block_interval_secs: MAX_BLOCK_INTERVAL_SECS,
            ..SimulationConfig::default()
        };
        assert!(run_simulation(Params::default(), config).unwrap().is_clean());
    }

    #[test]
    fn test_fresh_state_is_clean() {
        let sim = Simulation::new(Params::default(), SimulationConfig::default()).unwrap();
        assert!(sim.check_invariants().is_empty());
        assert!(sim.app().keeper.pools().unwrap().is_empty());
    }
}
