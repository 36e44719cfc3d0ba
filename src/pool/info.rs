//! Bancor Pool Record
//!
//! The stored state of one bonding-curve pool. Reserves and the cached
//! price only ever change together, through `with_stock_in_pool`, which
//! returns a new candidate record and leaves the original untouched.
//!
//! Created: 2026-10-17

use alloy_primitives::{Address, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calculator::BondingCurve;
use crate::errors::{BancorError, BancorResult};
use crate::types::{pair_key, TradeSide};

/// One bancor pool, keyed by its ordered (stock, money) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub owner: Address,
    pub stock: String,
    pub money: String,
    /// Price while the full `max_supply` is still in the pool
    pub init_price: Decimal,
    /// Stock frozen at creation; upper bound of `stock_in_pool`
    pub max_supply: U256,
    /// Price once the pool is sold out
    pub max_price: Decimal,
    /// Spot price implied by `stock_in_pool`
    pub price: Decimal,
    pub stock_in_pool: U256,
    pub money_in_pool: U256,
    /// Unix seconds; cancel is rejected before this
    pub enable_cancel_time: i64,
}

impl Pool {
    /// Fresh pool holding its whole supply and no money
    pub fn new(
        owner: Address,
        stock: impl Into<String>,
        money: impl Into<String>,
        init_price: Decimal,
        max_supply: U256,
        max_price: Decimal,
        enable_cancel_time: i64,
    ) -> BancorResult<Self> {
        // validates the endpoints; the price is the curve's, not the raw input
        let start = BondingCurve::new(init_price, max_price, max_supply)?.point_at(max_supply)?;
        Ok(Self {
            owner,
            stock: stock.into(),
            money: money.into(),
            init_price,
            max_supply,
            max_price,
            price: start.price,
            stock_in_pool: start.stock_in_pool,
            money_in_pool: start.money_in_pool,
            enable_cancel_time,
        })
    }

    /// Registry key: "stock/money"
    pub fn key(&self) -> String {
        pair_key(&self.stock, &self.money)
    }

    pub fn curve(&self) -> BancorResult<BondingCurve> {
        BondingCurve::new(self.init_price, self.max_price, self.max_supply)
    }

    /// Candidate record with the reserve moved to `stock_in_pool`
    pub fn with_stock_in_pool(&self, stock_in_pool: U256) -> BancorResult<Pool> {
        let point = self.curve()?.point_at(stock_in_pool)?;
        Ok(Pool {
            stock_in_pool: point.stock_in_pool,
            money_in_pool: point.money_in_pool,
            price: point.price,
            ..self.clone()
        })
    }

    /// Candidate record after a trade of `amount` stock.
    ///
    /// A buy takes stock out of the pool, a sell puts it back.
    pub fn after_trade(&self, side: TradeSide, amount: U256) -> BancorResult<Pool> {
        let new_stock = match side {
            TradeSide::Buy => self.stock_in_pool.checked_sub(amount).ok_or_else(|| {
                BancorError::CurveBoundsExceeded {
                    requested: format!("-{}", amount - self.stock_in_pool),
                    max_supply: self.max_supply,
                }
            })?,
            TradeSide::Sell => self
                .stock_in_pool
                .checked_add(amount)
                .ok_or(BancorError::Overflow("stock in pool"))?,
        };
        self.with_stock_in_pool(new_stock)
    }

    /// Check that the cached reserves and price agree with the curve
    pub fn validate(&self) -> BancorResult<()> {
        if self.stock.is_empty() || self.money.is_empty() {
            return Err(BancorError::InvalidRequest(format!(
                "pool {} has an empty denom",
                self.key()
            )));
        }
        let expected = self.curve()?.point_at(self.stock_in_pool)?;
        if expected.money_in_pool != self.money_in_pool || expected.price != self.price {
            return Err(BancorError::InvalidRequest(format!(
                "pool {} is off its curve: money {} price {}, expected money {} price {}",
                self.key(),
                self.money_in_pool,
                self.price,
                expected.money_in_pool,
                expected.price
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_pool() -> Pool {
        Pool::new(
            Address::repeat_byte(1),
            "abc",
            "cet",
            dec!(1),
            U256::from(1000u64),
            dec!(2),
            100,
        )
        .unwrap()
    }

    #[test]
    fn test_new_pool_is_full() {
        let pool = test_pool();
        assert_eq!(pool.key(), "abc/cet");
        assert_eq!(pool.stock_in_pool, pool.max_supply);
        assert_eq!(pool.money_in_pool, U256::ZERO);
        assert_eq!(pool.price, dec!(1));
        assert!(pool.validate().is_ok());
    }

    #[test]
    fn test_after_trade_leaves_original_untouched() {
        let pool = test_pool();
        let bought = pool.after_trade(TradeSide::Buy, U256::from(100u64)).unwrap();

        assert_eq!(bought.stock_in_pool, U256::from(900u64));
        assert_eq!(bought.money_in_pool, U256::from(105u64));
        assert_eq!(bought.price, dec!(1.1));
        assert_eq!(pool.stock_in_pool, U256::from(1000u64));

        let sold = bought.after_trade(TradeSide::Sell, U256::from(100u64)).unwrap();
        assert_eq!(sold, pool);
    }

    #[test]
    fn test_trade_bounds() {
        let pool = test_pool();
        let err = pool.after_trade(TradeSide::Sell, U256::from(1u64)).unwrap_err();
        assert!(matches!(err, BancorError::CurveBoundsExceeded { .. }));

        let err = pool.after_trade(TradeSide::Buy, U256::from(1001u64)).unwrap_err();
        match err {
            BancorError::CurveBoundsExceeded { requested, .. } => assert_eq!(requested, "-1"),
            other => panic!("unexpected error: {other}"),
        }

        let empty = pool.after_trade(TradeSide::Buy, U256::from(1000u64)).unwrap();
        assert_eq!(empty.price, dec!(2));
    }

    #[test]
    fn test_excess_price_digits_stay_on_curve() {
        // 19 fractional digits: the curve only sees the first 18
        let pool = Pool::new(
            Address::repeat_byte(1),
            "abc",
            "cet",
            dec!(1.0000000000000000009),
            U256::from(1000u64),
            dec!(2),
            0,
        )
        .unwrap();
        assert_eq!(pool.price, dec!(1));
        assert_eq!(pool.init_price, dec!(1.0000000000000000009));
        assert!(pool.validate().is_ok());

        let bought = pool.after_trade(TradeSide::Buy, U256::from(10u64)).unwrap();
        let sold = bought.after_trade(TradeSide::Sell, U256::from(10u64)).unwrap();
        assert_eq!(sold, pool);
    }

    #[test]
    fn test_validate_detects_tampered_reserve() {
        let mut pool = test_pool();
        pool.money_in_pool = U256::from(7u64);
        assert!(pool.validate().is_err());
    }
}
