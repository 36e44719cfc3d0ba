//! Bancor Keeper
//!
//! Owns the pool registry and the handles to the collaborating modules.
//! Operations live in `lifecycle` (init/cancel), `trade` and `handler`
//! (dispatch); queries in `query`.
//!
//! Created: 2026-10-17

use crate::keepers::{BankKeeper, MarketKeeper, TokenKeeper};
use crate::pool::PoolRegistry;
use crate::store::KvStore;

#[derive(Debug, Clone)]
pub struct BancorKeeper<S, T, M, B> {
    pub(crate) registry: PoolRegistry<S>,
    pub(crate) tokens: T,
    pub(crate) market: M,
    pub(crate) bank: B,
}

impl<S, T, M, B> BancorKeeper<S, T, M, B>
where
    S: KvStore,
    T: TokenKeeper,
    M: MarketKeeper,
    B: BankKeeper,
{
    pub fn new(store: S, tokens: T, market: M, bank: B) -> Self {
        Self {
            registry: PoolRegistry::new(store),
            tokens,
            market,
            bank,
        }
    }

    pub fn registry(&self) -> &PoolRegistry<S> {
        &self.registry
    }

    pub fn tokens(&self) -> &T {
        &self.tokens
    }

    pub fn tokens_mut(&mut self) -> &mut T {
        &mut self.tokens
    }

    pub fn market(&self) -> &M {
        &self.market
    }

    pub fn market_mut(&mut self) -> &mut M {
        &mut self.market
    }

    pub fn bank(&self) -> &B {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut B {
        &mut self.bank
    }
}
