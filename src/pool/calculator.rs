//! Bonding Curve Calculator
//!
//! Purpose:
//!     Maps a pool's stock reserve to its marginal price and to the money
//!     reserve that selling the missing stock has accumulated. Every
//!     validating node must produce bit-identical results, so no floating
//!     point is used anywhere in here.
//!
//! Created: 2026-10-17
//!
//! Curve:
//!     Linear in the supplied stock (maxSupply - stockInPool), from
//!     (maxSupply, initPrice) to (0, maxPrice):
//!
//! ```text
//!   P(price) = P(init) + (P(max) - P(init)) * supplied / maxSupply
//!   M        = (P(price) + P(init)) * supplied / 2
//!   money    = round_half_even(M / 10^18)
//! ```
//!
//! P(x) is x in 18-digit fixed point (U256 scaled by 10^18). Both
//! divisions truncate; only the final conversion to an integer amount
//! rounds, half to even.
//!
//! Notes:
//!     - money is the trapezoid under the curve, so a trade pays the blended
//!       price over its whole size, not the pre-trade spot price
//!     - money is a pure function of stockInPool: buy N then sell N restores
//!       the money reserve exactly

use alloy_primitives::U256;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::errors::{BancorError, BancorResult};
use crate::params::FEE_RATE_PRECISION;

// ── Fixed Point ─────────────────────────────────────────────────────────────

/// Fractional digits of the fixed-point price representation
pub const PRICE_DECIMALS: u32 = 18;

/// 10^18
fn precision() -> U256 {
    U256::from(1_000_000_000_000_000_000u64)
}

/// Convert a decimal price to 18-digit fixed point.
///
/// Digits beyond the 18th are truncated. Negative prices are rejected.
pub fn price_to_fixed(price: Decimal) -> BancorResult<U256> {
    if price < Decimal::ZERO {
        return Err(BancorError::InvalidPrice(format!("{} is negative", price)));
    }
    let truncated = price.round_dp_with_strategy(PRICE_DECIMALS, RoundingStrategy::ToZero);
    let mantissa = u128::try_from(truncated.mantissa())
        .map_err(|_| BancorError::InvalidPrice(format!("{} is negative", price)))?;
    let factor = U256::from(10u64).pow(U256::from(PRICE_DECIMALS - truncated.scale()));
    U256::from(mantissa)
        .checked_mul(factor)
        .ok_or(BancorError::Overflow("price conversion"))
}

/// Largest mantissa a `Decimal` holds: 2^96 - 1
fn max_mantissa() -> U256 {
    U256::from(u128::MAX >> 32)
}

/// Convert an 18-digit fixed-point value back to a normalized decimal.
///
/// Above 96 bits of mantissa the scale is reduced, truncating the lowest
/// digits. Fails only past `Decimal::MAX`.
pub fn fixed_to_price(value: U256) -> BancorResult<Decimal> {
    let ten = U256::from(10u64);
    let mut raw = value;
    let mut scale = PRICE_DECIMALS;
    while raw > max_mantissa() && scale > 0 {
        raw /= ten;
        scale -= 1;
    }
    if raw > max_mantissa() {
        return Err(BancorError::InvalidPrice(format!(
            "{} (1e-18 units) exceeds the largest representable price",
            value
        )));
    }
    // fits in 96 bits
    let raw = u128::try_from(raw)
        .ok()
        .and_then(|v| i128::try_from(v).ok())
        .ok_or_else(|| BancorError::InvalidPrice(format!("{} (1e-18 units) out of range", value)))?;
    Decimal::try_from_i128_with_scale(raw, scale)
        .map(|d| d.normalize())
        .map_err(|e| BancorError::InvalidPrice(e.to_string()))
}

/// Round an 18-digit fixed-point value to an integer, half to even
pub fn round_half_even(value: U256) -> U256 {
    let (quotient, remainder) = value.div_rem(precision());
    let half = precision() / U256::from(2u64);
    if remainder > half || (remainder == half && quotient.bit(0)) {
        quotient + U256::from(1u64)
    } else {
        quotient
    }
}

// ── Curve ───────────────────────────────────────────────────────────────────

/// Reserve position on the curve: stock left, money accumulated, spot price
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurvePoint {
    pub stock_in_pool: U256,
    pub money_in_pool: U256,
    pub price: Decimal,
}

/// Linear bonding curve between two price endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BondingCurve {
    init_price: U256,
    max_price: U256,
    max_supply: U256,
}

impl BondingCurve {
    /// Build a curve, rejecting endpoints that would make it decreasing or
    /// a supply that would make it undefined.
    pub fn new(init_price: Decimal, max_price: Decimal, max_supply: U256) -> BancorResult<Self> {
        if max_supply.is_zero() {
            return Err(BancorError::InvalidRequest(
                "max supply must be positive".to_string(),
            ));
        }
        let init_price = price_to_fixed(init_price)?;
        let max_price = price_to_fixed(max_price)?;
        if max_price < init_price {
            return Err(BancorError::InvalidPrice(
                "max price must not be less than init price".to_string(),
            ));
        }
        let curve = Self {
            init_price,
            max_price,
            max_supply,
        };
        // the sold-out point has the largest intermediates: reject curves
        // whose integral cannot be computed there
        curve.money_at(U256::ZERO)?;
        Ok(curve)
    }

    pub fn max_supply(&self) -> U256 {
        self.max_supply
    }

    fn check_bounds(&self, stock_in_pool: U256) -> BancorResult<U256> {
        if stock_in_pool > self.max_supply {
            return Err(BancorError::CurveBoundsExceeded {
                requested: stock_in_pool.to_string(),
                max_supply: self.max_supply,
            });
        }
        Ok(self.max_supply - stock_in_pool)
    }

    /// Spot price at a reserve position, in 18-digit fixed point
    pub fn fixed_price_at(&self, stock_in_pool: U256) -> BancorResult<U256> {
        let supplied = self.check_bounds(stock_in_pool)?;
        let spread = self.max_price - self.init_price;
        let climb = spread
            .checked_mul(supplied)
            .ok_or(BancorError::Overflow("curve price"))?
            / self.max_supply;
        Ok(self.init_price + climb)
    }

    /// Money accumulated by the pool at a reserve position
    pub fn money_at(&self, stock_in_pool: U256) -> BancorResult<U256> {
        let supplied = self.check_bounds(stock_in_pool)?;
        let price = self.fixed_price_at(stock_in_pool)?;
        let area = price
            .checked_add(self.init_price)
            .and_then(|sum| sum.checked_mul(supplied))
            .ok_or(BancorError::Overflow("curve integral"))?
            / U256::from(2u64);
        Ok(round_half_even(area))
    }

    /// Full reserve position at `stock_in_pool`
    pub fn point_at(&self, stock_in_pool: U256) -> BancorResult<CurvePoint> {
        let money_in_pool = self.money_at(stock_in_pool)?;
        let price = fixed_to_price(self.fixed_price_at(stock_in_pool)?)?;
        debug!(
            "Curve point: stock={} money={} price={}",
            stock_in_pool, money_in_pool, price
        );
        Ok(CurvePoint {
            stock_in_pool,
            money_in_pool,
            price,
        })
    }

    /// Money crossing the pool boundary when the reserve moves from `old` to `new`
    pub fn money_delta(&self, old_stock: U256, new_stock: U256) -> BancorResult<U256> {
        let old_money = self.money_at(old_stock)?;
        let new_money = self.money_at(new_stock)?;
        Ok(if new_money >= old_money {
            new_money - old_money
        } else {
            old_money - new_money
        })
    }
}

// ── Commission ──────────────────────────────────────────────────────────────

/// Trade commission in the reserve asset:
/// round_half_even(last_price * amount * fee_rate / 10000)
pub fn commission(last_price: Decimal, amount: U256, fee_rate_bps: u64) -> BancorResult<U256> {
    let price = price_to_fixed(last_price)?;
    let value = price
        .checked_mul(amount)
        .and_then(|v| v.checked_mul(U256::from(fee_rate_bps)))
        .ok_or(BancorError::Overflow("trade commission"))?
        / U256::from(FEE_RATE_PRECISION);
    Ok(round_half_even(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn unit_curve() -> BondingCurve {
        BondingCurve::new(dec!(1), dec!(2), U256::from(1000u64)).unwrap()
    }

    #[test]
    fn test_curve_endpoints() {
        let curve = unit_curve();

        let full = curve.point_at(U256::from(1000u64)).unwrap();
        assert_eq!(full.price, dec!(1));
        assert_eq!(full.money_in_pool, U256::ZERO);

        let empty = curve.point_at(U256::ZERO).unwrap();
        assert_eq!(empty.price, dec!(2));
        // (2 + 1) * 1000 / 2
        assert_eq!(empty.money_in_pool, U256::from(1500u64));
    }

    #[test]
    fn test_buy_pays_blended_price() {
        let curve = unit_curve();
        let point = curve.point_at(U256::from(900u64)).unwrap();

        assert_eq!(point.price, dec!(1.1));
        // (1.1 + 1) * 100 / 2, above the 100 a spot-price charge would give
        assert_eq!(point.money_in_pool, U256::from(105u64));
        assert_eq!(
            curve.money_delta(U256::from(1000u64), U256::from(900u64)).unwrap(),
            U256::from(105u64)
        );
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let curve = unit_curve();
        let err = curve.point_at(U256::from(1001u64)).unwrap_err();
        assert!(matches!(err, BancorError::CurveBoundsExceeded { .. }));
    }

    #[test]
    fn test_rounding_half_to_even() {
        // supply 3, price 0 -> 1: money at sold-out = 1 * 3 / 2 = 1.5 -> 2
        let curve = BondingCurve::new(dec!(0), dec!(1), U256::from(3u64)).unwrap();
        assert_eq!(curve.money_at(U256::ZERO).unwrap(), U256::from(2u64));
        // truncated thirds: 0.1666.. -> 0 and 0.6666.. -> 1
        assert_eq!(curve.money_at(U256::from(2u64)).unwrap(), U256::ZERO);
        assert_eq!(curve.money_at(U256::from(1u64)).unwrap(), U256::from(1u64));

        // supply 5: 2.5 -> 2
        let curve = BondingCurve::new(dec!(0), dec!(1), U256::from(5u64)).unwrap();
        assert_eq!(curve.money_at(U256::ZERO).unwrap(), U256::from(2u64));
    }

    #[test]
    fn test_price_fixed_point_round_trip() {
        let fixed = price_to_fixed(dec!(1.25)).unwrap();
        assert_eq!(fixed, U256::from(1_250_000_000_000_000_000u64));
        assert_eq!(fixed_to_price(fixed).unwrap(), dec!(1.25));

        // 19th digit truncated
        let fixed = price_to_fixed(dec!(0.0000000000000000019)).unwrap();
        assert_eq!(fixed, U256::from(1u64));
    }

    #[test]
    fn test_large_prices_reduce_scale() {
        // 1e11 has a 1e29 fixed-point mantissa, past 96 bits
        let fixed = price_to_fixed(dec!(100000000000)).unwrap();
        assert_eq!(fixed_to_price(fixed).unwrap(), dec!(100000000000));

        let curve = BondingCurve::new(dec!(1), dec!(100000000000), U256::from(1000u64)).unwrap();
        let empty = curve.point_at(U256::ZERO).unwrap();
        assert_eq!(empty.price, dec!(100000000000));
        assert_eq!(empty.money_in_pool, U256::from(50_000_000_000_500u64));

        let flat = BondingCurve::new(dec!(100000000000), dec!(100000000000), U256::from(1000u64)).unwrap();
        assert_eq!(flat.point_at(U256::from(999u64)).unwrap().price, dec!(100000000000));
    }

    #[test]
    fn test_price_limits() {
        // Decimal::MAX survives the round trip exactly
        let fixed = price_to_fixed(Decimal::MAX).unwrap();
        assert_eq!(fixed_to_price(fixed).unwrap(), Decimal::MAX);
        let curve = BondingCurve::new(dec!(1), Decimal::MAX, U256::from(1000u64)).unwrap();
        assert_eq!(curve.point_at(U256::ZERO).unwrap().price, Decimal::MAX);

        // one past it cannot be represented
        let err = fixed_to_price(fixed + precision()).unwrap_err();
        assert!(matches!(err, BancorError::InvalidPrice(_)));

        // curve arithmetic overflows U256 at the sold-out point
        let supply = U256::from(10u64).pow(U256::from(40u64));
        let err = BondingCurve::new(dec!(1), Decimal::MAX, supply).unwrap_err();
        assert!(matches!(err, BancorError::Overflow(_)));
    }

    #[test]
    fn test_invalid_curves_rejected() {
        assert!(BondingCurve::new(dec!(1), dec!(2), U256::ZERO).is_err());
        assert!(BondingCurve::new(dec!(3), dec!(2), U256::from(10u64)).is_err());
        assert!(BondingCurve::new(dec!(-1), dec!(2), U256::from(10u64)).is_err());
    }

    #[test]
    fn test_commission() {
        // 2 * 100 * 10 / 10000 = 0.2 -> 0
        assert_eq!(commission(dec!(2), U256::from(100u64), 10).unwrap(), U256::ZERO);
        // 0.5 * 3 * 10000 / 10000 = 1.5 -> 2
        assert_eq!(commission(dec!(0.5), U256::from(3u64), 10_000).unwrap(), U256::from(2u64));
        // 3 * 1000 * 50 / 10000 = 15
        assert_eq!(commission(dec!(3), U256::from(1000u64), 50).unwrap(), U256::from(15u64));
    }

    proptest! {
        #[test]
        fn prop_price_monotonic_in_reserve(
            a in 0u64..=10_000,
            b in 0u64..=10_000,
        ) {
            let curve = BondingCurve::new(dec!(0.37), dec!(4.2), U256::from(10_000u64)).unwrap();
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let price_low = curve.fixed_price_at(U256::from(low)).unwrap();
            let price_high = curve.fixed_price_at(U256::from(high)).unwrap();
            // fewer tokens left in the pool never means a cheaper price
            prop_assert!(price_low >= price_high);
            prop_assert!(curve.money_at(U256::from(low)).unwrap() >= curve.money_at(U256::from(high)).unwrap());
        }

        #[test]
        fn prop_delta_is_path_independent(
            start in 0u64..=5_000,
            step in 0u64..=2_500,
        ) {
            let curve = BondingCurve::new(dec!(1), dec!(7), U256::from(5_000u64)).unwrap();
            let start = U256::from(start);
            let mid = start.saturating_sub(U256::from(step));
            let there = curve.money_delta(start, mid).unwrap();
            let back = curve.money_delta(mid, start).unwrap();
            prop_assert_eq!(there, back);
        }
    }
}
