//! Module Parameters
//!
//! Block-scoped snapshot of the fee parameters. Handlers receive it
//! explicitly, nothing here is process-wide state.
//!
//! Created: 2026-10-17

use crate::errors::{BancorError, BancorResult};
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Basis point denominator for the trade fee rate
pub const FEE_RATE_PRECISION: u64 = 10_000;

/// Default reserve (native) asset of the chain
pub const DEFAULT_RESERVE_DENOM: &str = "cet";

/// 1000 CET with 8 decimals
pub const DEFAULT_CREATE_BANCOR_FEE: u64 = 100_000_000_000;
/// 100 CET with 8 decimals
pub const DEFAULT_CANCEL_BANCOR_FEE: u64 = 10_000_000_000;
/// 0.1%
pub const DEFAULT_TRADE_FEE_RATE: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Flat fee in the reserve asset charged when a pool is created
    #[serde(default = "default_create_fee")]
    pub create_bancor_fee: u64,
    /// Flat fee in the reserve asset charged when a pool is cancelled
    #[serde(default = "default_cancel_fee")]
    pub cancel_bancor_fee: u64,
    /// Trade commission in basis points of the stock's reserve-market value
    #[serde(default = "default_trade_fee_rate")]
    pub trade_fee_rate: u64,
    /// Asset fees are paid in and stock markets are quoted against
    #[serde(default = "default_reserve_denom")]
    pub reserve_denom: String,
}

fn default_create_fee() -> u64 { DEFAULT_CREATE_BANCOR_FEE }
fn default_cancel_fee() -> u64 { DEFAULT_CANCEL_BANCOR_FEE }
fn default_trade_fee_rate() -> u64 { DEFAULT_TRADE_FEE_RATE }
fn default_reserve_denom() -> String { DEFAULT_RESERVE_DENOM.to_string() }

impl Default for Params {
    fn default() -> Self {
        Self {
            create_bancor_fee: DEFAULT_CREATE_BANCOR_FEE,
            cancel_bancor_fee: DEFAULT_CANCEL_BANCOR_FEE,
            trade_fee_rate: DEFAULT_TRADE_FEE_RATE,
            reserve_denom: DEFAULT_RESERVE_DENOM.to_string(),
        }
    }
}

impl Params {
    pub fn validate(&self) -> BancorResult<()> {
        if self.trade_fee_rate > FEE_RATE_PRECISION {
            return Err(BancorError::InvalidRequest(format!(
                "trade fee rate {} exceeds {} basis points",
                self.trade_fee_rate, FEE_RATE_PRECISION
            )));
        }
        if self.reserve_denom.is_empty() {
            return Err(BancorError::InvalidRequest(
                "reserve denom must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn create_fee(&self) -> U256 {
        U256::from(self.create_bancor_fee)
    }

    pub fn cancel_fee(&self) -> U256 {
        U256::from(self.cancel_bancor_fee)
    }

    pub fn is_reserve(&self, denom: &str) -> bool {
        self.reserve_denom == denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_are_valid() {
        assert!(Params::default().validate().is_ok());
        assert!(Params::default().is_reserve("cet"));
    }

    #[test]
    fn test_fee_rate_above_one_hundred_percent_rejected() {
        let params = Params {
            trade_fee_rate: 10_001,
            ..Params::default()
        };
        assert!(matches!(params.validate(), Err(BancorError::InvalidRequest(_))));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let params: Params = serde_json::from_str(r#"{"trade_fee_rate": 25}"#).unwrap();
        assert_eq!(params.trade_fee_rate, 25);
        assert_eq!(params.create_bancor_fee, DEFAULT_CREATE_BANCOR_FEE);
        assert_eq!(params.reserve_denom, "cet");
    }
}
