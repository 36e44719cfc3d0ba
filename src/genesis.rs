//! Genesis import/export
//!
//! Chain initialisation writes pools through the same registry the
//! handlers use, after every record has been checked against its curve.
//! Ledger balances (the frozen reserves) are imported by the bank module,
//! not here.
//!
//! Created: 2026-10-17

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::info;

use crate::errors::{BancorError, BancorResult};
use crate::keeper::BancorKeeper;
use crate::params::Params;
use crate::pool::Pool;
use crate::store::KvStore;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    #[serde(default)]
    pub params: Params,
    #[serde(default)]
    pub pools: Vec<Pool>,
}

impl GenesisState {
    pub fn new(params: Params, pools: Vec<Pool>) -> Self {
        Self { params, pools }
    }

    /// Params must be valid, every pool on its curve, pair keys unique
    pub fn validate(&self) -> BancorResult<()> {
        self.params.validate()?;
        let mut seen = BTreeSet::new();
        for pool in &self.pools {
            if pool.stock == pool.money {
                return Err(BancorError::InvalidRequest(format!(
                    "pool {} trades a denom against itself",
                    pool.key()
                )));
            }
            pool.validate()?;
            if !seen.insert(pool.key()) {
                return Err(BancorError::PoolAlreadyExists(pool.key()));
            }
        }
        Ok(())
    }

    /// Read a genesis JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read genesis file: {}", path.as_ref().display()))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse genesis JSON")
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to encode genesis JSON")
    }
}

impl<S: KvStore, T, M, B> BancorKeeper<S, T, M, B> {
    /// Validate and write every genesis pool. Returns the params to run with.
    pub fn init_genesis(&mut self, genesis: &GenesisState) -> BancorResult<Params> {
        genesis.validate()?;
        for pool in &genesis.pools {
            self.registry.save(pool)?;
        }
        info!(
            "Genesis imported: {} pools (reserve {}, trade fee {} bps)",
            genesis.pools.len(),
            genesis.params.reserve_denom,
            genesis.params.trade_fee_rate
        );
        Ok(genesis.params.clone())
    }

    pub fn export_genesis(&self, params: &Params) -> BancorResult<GenesisState> {
        Ok(GenesisState::new(params.clone(), self.pools()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msgs::{Msg, MsgBancorInit, MsgBancorTrade};
    use crate::testing::{SimApp, RESERVE};
    use alloy_primitives::{Address, U256};
    use rust_decimal_macros::dec;

    fn pool(stock: &str) -> Pool {
        Pool::new(
            Address::repeat_byte(1),
            stock,
            RESERVE,
            dec!(1),
            U256::from(1000u64),
            dec!(2),
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_default_genesis_is_valid() {
        assert!(GenesisState::default().validate().is_ok());
    }

    #[test]
    fn test_duplicate_pool_rejected() {
        let genesis = GenesisState::new(Params::default(), vec![pool("abc"), pool("abc")]);
        assert_eq!(
            genesis.validate().unwrap_err(),
            BancorError::PoolAlreadyExists("abc/cet".to_string())
        );
    }

    #[test]
    fn test_off_curve_pool_rejected() {
        let mut bad = pool("abc").with_stock_in_pool(U256::from(900u64)).unwrap();
        bad.money_in_pool += U256::from(1u64);
        let genesis = GenesisState::new(Params::default(), vec![bad]);
        assert!(matches!(genesis.validate(), Err(BancorError::InvalidRequest(_))));
    }

    #[test]
    fn test_pool_with_excess_price_digits_is_valid() {
        let pool = Pool::new(
            Address::repeat_byte(1),
            "abc",
            RESERVE,
            dec!(0.1234567890123456789),
            U256::from(1000u64),
            dec!(2),
            0,
        )
        .unwrap();
        let genesis = GenesisState::new(Params::default(), vec![pool]);
        assert!(genesis.validate().is_ok());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = Params {
            trade_fee_rate: 20_000,
            ..Params::default()
        };
        assert!(GenesisState::new(params, vec![]).validate().is_err());
    }

    #[test]
    fn test_export_then_import_keeps_pools() {
        let owner = Address::repeat_byte(1);
        let buyer = Address::repeat_byte(2);
        let mut app = SimApp::new();
        app.params.trade_fee_rate = 0;
        app.issue_token("abc", owner, U256::from(1000u64));
        app.fund(owner, RESERVE, U256::from(1_000_000_000_000u64));
        app.fund(buyer, RESERVE, U256::from(1_000u64));
        app.add_market("abc/cet", Some(dec!(1)));

        app.deliver(Msg::Init(MsgBancorInit {
            owner,
            stock: "abc".to_string(),
            money: RESERVE.to_string(),
            init_price: dec!(1),
            max_supply: U256::from(1000u64),
            max_price: dec!(2),
            enable_cancel_time: 0,
        }))
        .unwrap();
        app.deliver(Msg::Trade(MsgBancorTrade {
            sender: buyer,
            stock: "abc".to_string(),
            money: RESERVE.to_string(),
            amount: U256::from(100u64),
            is_buy: true,
            money_limit: U256::ZERO,
        }))
        .unwrap();

        let exported = app.keeper.export_genesis(&app.params).unwrap();
        assert_eq!(exported.pools.len(), 1);

        let json = exported.to_json_pretty().unwrap();
        let imported = GenesisState::from_json(&json).unwrap();
        assert_eq!(imported, exported);

        let mut fresh = SimApp::new();
        let params = fresh.keeper.init_genesis(&imported).unwrap();
        assert_eq!(params.trade_fee_rate, 0);
        assert_eq!(fresh.pool("abc/cet"), app.pool("abc/cet"));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let genesis = GenesisState::from_json("{}").unwrap();
        assert_eq!(genesis, GenesisState::default());
    }
}
