//! Trade Engine
//!
//! Buys and sells stock against an active pool.
//!
//! Steps:
//!     1. load pool, reject the owner trading against itself
//!     2. move the reserve on the curve (bounds checked there)
//!     3. money crossing the pool = |new money - old money|
//!     4. slippage check against `money_limit`
//!     5. commission valued at the stock/reserve market's last price
//!     6. custody: fee, then coins to pool, then coins from pool
//!     7. persist the candidate pool and emit the trade event
//!
//! Only 6 and 7 mutate state. There is no compensation when a custody call
//! fails midway: the enclosing transaction is discarded as a whole.
//!
//! Created: 2026-10-17

use alloy_primitives::U256;
use tracing::{debug, info};

use crate::errors::{BancorError, BancorResult};
use crate::events::*;
use crate::guards;
use crate::keeper::BancorKeeper;
use crate::keepers::{BankKeeper, MarketKeeper, TokenKeeper};
use crate::msgs::MsgBancorTrade;
use crate::params::Params;
use crate::pool::commission;
use crate::store::KvStore;
use crate::types::{pair_key, BlockContext, Coin, TradeSide};

/// Reject a trade whose money amount is worse than the caller's limit.
/// A zero limit means no limit.
pub fn check_money_limit(side: TradeSide, money: U256, limit: U256) -> BancorResult<()> {
    if limit.is_zero() {
        return Ok(());
    }
    let crossed = match side {
        TradeSide::Buy if money > limit => Some("more than"),
        TradeSide::Sell if money < limit => Some("less than"),
        _ => None,
    };
    match crossed {
        Some(direction) => Err(BancorError::SlippageExceeded {
            actual: money,
            limit,
            direction,
        }),
        None => Ok(()),
    }
}

impl<S, T, M, B> BancorKeeper<S, T, M, B>
where
    S: KvStore,
    T: TokenKeeper,
    M: MarketKeeper,
    B: BankKeeper,
{
    pub fn trade(
        &mut self,
        ctx: &BlockContext,
        params: &Params,
        msg: &MsgBancorTrade,
    ) -> BancorResult<Response> {
        let key = pair_key(&msg.stock, &msg.money);
        let pool = self
            .registry
            .load(&key)?
            .ok_or_else(|| BancorError::PoolNotFound(key.clone()))?;
        guards::check_not_owner(&pool, &msg.sender)?;

        let side = msg.side();
        let updated = pool.after_trade(side, msg.amount)?;

        let (coins_to_pool, coins_from_pool) = match side {
            TradeSide::Buy => {
                let cost = updated
                    .money_in_pool
                    .checked_sub(pool.money_in_pool)
                    .ok_or(BancorError::Overflow("money in pool"))?;
                (
                    Coin::new(pool.money.clone(), cost),
                    Coin::new(pool.stock.clone(), msg.amount),
                )
            }
            TradeSide::Sell => {
                let proceeds = pool
                    .money_in_pool
                    .checked_sub(updated.money_in_pool)
                    .ok_or(BancorError::Overflow("money in pool"))?;
                (
                    Coin::new(pool.stock.clone(), msg.amount),
                    Coin::new(pool.money.clone(), proceeds),
                )
            }
        };
        let money_moved = match side {
            TradeSide::Buy => coins_to_pool.amount,
            TradeSide::Sell => coins_from_pool.amount,
        };
        check_money_limit(side, money_moved, msg.money_limit)?;

        let market_key = pair_key(&pool.stock, &params.reserve_denom);
        let last_price = self
            .market
            .last_executed_price(&market_key)
            .ok_or_else(|| BancorError::PriceOracleUnavailable(market_key.clone()))?;
        let fee = Coin::new(
            params.reserve_denom.clone(),
            commission(last_price, msg.amount, params.trade_fee_rate)?,
        );
        debug!(
            "Bancor trade quote: {} {} {} | money {} | fee {} at {} {}",
            key, side, msg.amount, money_moved, fee, market_key, last_price
        );

        self.bank.deduct_fee(&msg.sender, &fee)?;
        self.bank.send_coins(&msg.sender, &pool.owner, &coins_to_pool)?;
        self.bank.freeze_coins(&pool.owner, &coins_to_pool)?;
        self.bank.unfreeze_coins(&pool.owner, &coins_from_pool)?;
        self.bank.send_coins(&pool.owner, &msg.sender, &coins_from_pool)?;

        self.registry.save(&updated)?;

        info!(
            "Bancor trade: {} {} by {} | to pool {} | from pool {} | reserves ({}, {}) price {} (height {})",
            key, side, msg.sender, coins_to_pool, coins_from_pool,
            updated.stock_in_pool, updated.money_in_pool, updated.price, ctx.height
        );

        Ok(Response::with_events(vec![
            Event::new(EVENT_TYPE_BANCORLITE).attr(ATTRIBUTE_KEY_TRADE_FOR, &key),
            Event::new(EVENT_TYPE_MESSAGE)
                .attr(ATTRIBUTE_MODULE, EVENT_TYPE_BANCORLITE)
                .attr(ATTRIBUTE_ACTION, "bancor_trade")
                .attr(ATTRIBUTE_NEW_STOCK_IN_POOL, updated.stock_in_pool)
                .attr(ATTRIBUTE_NEW_MONEY_IN_POOL, updated.money_in_pool)
                .attr(ATTRIBUTE_NEW_PRICE, updated.price)
                .attr(ATTRIBUTE_TRADE_SIDE, side)
                .attr(ATTRIBUTE_COINS_FROM_POOL, &coins_from_pool)
                .attr(ATTRIBUTE_COINS_TO_POOL, &coins_to_pool)
                .attr(ATTRIBUTE_COMMISSION, &fee),
        ]))
    }
}
