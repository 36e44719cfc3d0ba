//! Pool Lifecycle: init and cancel
//!
//! Uninitialized -> Active (init) -> Cancelled (cancel). A cancelled key
//! is free again for a new init.
//!
//! Both operations run every guard before touching the ledger, and only
//! write the registry after every custody call succeeded. A custody
//! failure midway is rolled back by the enclosing transaction.
//!
//! Created: 2026-10-17

use tracing::info;

use crate::errors::{BancorError, BancorResult};
use crate::events::*;
use crate::guards;
use crate::keeper::BancorKeeper;
use crate::keepers::{BankKeeper, MarketKeeper, TokenKeeper};
use crate::msgs::{MsgBancorCancel, MsgBancorInit};
use crate::params::Params;
use crate::pool::Pool;
use crate::store::KvStore;
use crate::types::{pair_key, BlockContext, Coin};

impl<S, T, M, B> BancorKeeper<S, T, M, B>
where
    S: KvStore,
    T: TokenKeeper,
    M: MarketKeeper,
    B: BankKeeper,
{
    /// Create a pool: freeze the whole supply from the owner, charge the
    /// creation fee and register the pool at its initial price.
    pub fn init_pool(
        &mut self,
        ctx: &BlockContext,
        params: &Params,
        msg: &MsgBancorInit,
    ) -> BancorResult<Response> {
        let key = pair_key(&msg.stock, &msg.money);

        guards::check_tokens_exist(&self.tokens, &msg.stock, &msg.money)?;
        guards::check_token_issuer(&self.tokens, &msg.stock, &msg.owner)?;
        guards::check_market_exists(&self.market, params, &msg.stock, &msg.money)?;
        guards::check_pool_absent(&self.registry, &key)?;

        let pool = Pool::new(
            msg.owner,
            msg.stock.clone(),
            msg.money.clone(),
            msg.init_price,
            msg.max_supply,
            msg.max_price,
            msg.enable_cancel_time,
        )?;

        self.bank
            .freeze_coins(&msg.owner, &Coin::new(msg.stock.clone(), msg.max_supply))?;
        self.bank
            .deduct_fee(&msg.owner, &Coin::new(params.reserve_denom.clone(), params.create_fee()))?;

        self.registry.save(&pool)?;

        info!(
            "Bancor init: {} by {} | supply {} | price {} -> {} | cancel after {} (height {})",
            key, pool.owner, pool.max_supply, pool.init_price, pool.max_price,
            pool.enable_cancel_time, ctx.height
        );

        Ok(Response::with_events(vec![
            Event::new(EVENT_TYPE_BANCORLITE).attr(ATTRIBUTE_KEY_CREATE_FOR, &key),
            Event::new(EVENT_TYPE_MESSAGE)
                .attr(ATTRIBUTE_MODULE, EVENT_TYPE_BANCORLITE)
                .attr(ATTRIBUTE_ACTION, "bancor_init")
                .attr(ATTRIBUTE_OWNER, pool.owner)
                .attr(ATTRIBUTE_MAX_SUPPLY, pool.max_supply)
                .attr(ATTRIBUTE_NEW_STOCK_IN_POOL, pool.stock_in_pool)
                .attr(ATTRIBUTE_NEW_MONEY_IN_POOL, pool.money_in_pool)
                .attr(ATTRIBUTE_NEW_PRICE, pool.price),
        ]))
    }

    /// Withdraw a pool: charge the cancellation fee, release both reserves
    /// to the owner and drop the record.
    pub fn cancel_pool(
        &mut self,
        ctx: &BlockContext,
        params: &Params,
        msg: &MsgBancorCancel,
    ) -> BancorResult<Response> {
        let key = pair_key(&msg.stock, &msg.money);
        let pool = self
            .registry
            .load(&key)?
            .ok_or_else(|| BancorError::PoolNotFound(key.clone()))?;

        guards::check_cooldown(&pool, ctx)?;
        guards::check_cancel_owner(&pool, &msg.owner)?;
        guards::check_market_exists(&self.market, params, &pool.stock, &pool.money)?;

        self.bank
            .deduct_fee(&msg.owner, &Coin::new(params.reserve_denom.clone(), params.cancel_fee()))?;
        let stock_back = Coin::new(pool.stock.clone(), pool.stock_in_pool);
        let money_back = Coin::new(pool.money.clone(), pool.money_in_pool);
        self.bank.unfreeze_coins(&pool.owner, &stock_back)?;
        self.bank.unfreeze_coins(&pool.owner, &money_back)?;

        self.registry.remove(&pool);

        info!(
            "Bancor cancel: {} by {} | returned {} and {} (height {})",
            key, pool.owner, stock_back, money_back, ctx.height
        );

        Ok(Response::with_events(vec![
            Event::new(EVENT_TYPE_BANCORLITE).attr(ATTRIBUTE_KEY_CANCEL_FOR, &key),
            Event::new(EVENT_TYPE_MESSAGE)
                .attr(ATTRIBUTE_MODULE, EVENT_TYPE_BANCORLITE)
                .attr(ATTRIBUTE_ACTION, "bancor_cancel")
                .attr(ATTRIBUTE_OWNER, pool.owner)
                .attr(ATTRIBUTE_COINS_FROM_POOL, format!("{},{}", stock_back, money_back)),
        ]))
    }
}
