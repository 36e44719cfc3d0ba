//! Guard Layer
//!
//! Side-effect-free pre-condition checks shared by init, trade and cancel.
//! Each guard passes silently or returns the named rejection. Handlers call
//! them in the order they are declared here, so that when several
//! conditions fail the most specific error surfaces first.
//!
//! Created: 2026-10-17

use alloy_primitives::Address;
use tracing::debug;

use crate::errors::{BancorError, BancorResult, OwnerRule};
use crate::keepers::{MarketKeeper, TokenKeeper};
use crate::params::Params;
use crate::pool::{Pool, PoolRegistry};
use crate::store::KvStore;
use crate::types::{pair_key, BlockContext};

/// Both denoms must be registered tokens
pub fn check_tokens_exist<T: TokenKeeper>(tokens: &T, stock: &str, money: &str) -> BancorResult<()> {
    for denom in [stock, money] {
        if !tokens.is_token_exists(denom) {
            debug!("Guard: unknown token {}", denom);
            return Err(BancorError::UnknownToken(denom.to_string()));
        }
    }
    Ok(())
}

/// Only the issuer of the stock may put it into a pool
pub fn check_token_issuer<T: TokenKeeper>(tokens: &T, stock: &str, owner: &Address) -> BancorResult<()> {
    if !tokens.is_token_issuer(stock, owner) {
        debug!("Guard: {} is not the issuer of {}", owner, stock);
        return Err(BancorError::NotTokenIssuer {
            token: stock.to_string(),
            account: *owner,
        });
    }
    Ok(())
}

/// Unless the pool is quoted in the reserve asset, a stock/reserve market
/// must exist: its last executed price is what trade fees are valued at.
pub fn check_market_exists<M: MarketKeeper>(
    market: &M,
    params: &Params,
    stock: &str,
    money: &str,
) -> BancorResult<()> {
    if params.is_reserve(money) {
        return Ok(());
    }
    let market_key = pair_key(stock, &params.reserve_denom);
    if !market.is_market_exist(&market_key) {
        debug!("Guard: market {} does not exist", market_key);
        return Err(BancorError::MarketNotFound(market_key));
    }
    Ok(())
}

/// No pool may already be registered under `key`
pub fn check_pool_absent<S: KvStore>(registry: &PoolRegistry<S>, key: &str) -> BancorResult<()> {
    if registry.contains(key) {
        debug!("Guard: pool {} already exists", key);
        return Err(BancorError::PoolAlreadyExists(key.to_string()));
    }
    Ok(())
}

/// Cancel is only allowed once block time reaches `enable_cancel_time`
pub fn check_cooldown(pool: &Pool, ctx: &BlockContext) -> BancorResult<()> {
    let block_time = ctx.unix_time();
    if block_time < pool.enable_cancel_time {
        debug!(
            "Guard: pool {} cooldown until {}, block time {}",
            pool.key(),
            pool.enable_cancel_time,
            block_time
        );
        return Err(BancorError::CooldownNotElapsed {
            enable_cancel_time: pool.enable_cancel_time,
            block_time,
        });
    }
    Ok(())
}

/// Only the pool owner may cancel
pub fn check_cancel_owner(pool: &Pool, caller: &Address) -> BancorResult<()> {
    if pool.owner != *caller {
        debug!("Guard: {} tried to cancel pool {} owned by {}", caller, pool.key(), pool.owner);
        return Err(BancorError::OwnerProhibited(OwnerRule::NotPoolOwner));
    }
    Ok(())
}

/// The pool owner may not trade against its own pool
pub fn check_not_owner(pool: &Pool, sender: &Address) -> BancorResult<()> {
    if pool.owner == *sender {
        debug!("Guard: owner {} tried to trade on own pool {}", sender, pool.key());
        return Err(BancorError::OwnerProhibited(OwnerRule::SelfTrade));
    }
    Ok(())
}
