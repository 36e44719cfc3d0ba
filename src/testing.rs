//! In-memory collaborators and a transactional test app
//!
//! Reference implementations of the token registry, market module and coin
//! ledger, plus `SimApp`, which delivers messages with the all-or-nothing
//! semantics the chain gives a transaction: the keeper is snapshotted
//! before delivery and restored when the handler fails.
//!
//! Used by unit tests, the operation simulator and the CLI.
//!
//! Created: 2026-10-17

use alloy_primitives::{Address, U256};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::errors::{BancorError, BancorResult, LedgerError};
use crate::events::Response;
use crate::keeper::BancorKeeper;
use crate::keepers::{BankKeeper, MarketKeeper, TokenKeeper};
use crate::msgs::Msg;
use crate::params::{Params, DEFAULT_RESERVE_DENOM};
use crate::pool::Pool;
use crate::store::MemStore;
use crate::types::{BlockContext, Coin};

/// Reserve denom used by the test app
pub const RESERVE: &str = DEFAULT_RESERVE_DENOM;

// ── Token Registry ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct MockTokenKeeper {
    issuers: BTreeMap<String, Address>,
}

impl MockTokenKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, denom: &str, issuer: Address) {
        self.issuers.insert(denom.to_string(), issuer);
    }

    pub fn denoms(&self) -> Vec<String> {
        self.issuers.keys().cloned().collect()
    }
}

impl TokenKeeper for MockTokenKeeper {
    fn is_token_exists(&self, denom: &str) -> bool {
        self.issuers.contains_key(denom)
    }

    fn issuer(&self, denom: &str) -> Option<Address> {
        self.issuers.get(denom).copied()
    }
}

// ── Market Module ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct MockMarketKeeper {
    /// market key -> last executed price (None = no trade yet)
    markets: BTreeMap<String, Option<Decimal>>,
}

impl MockMarketKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a market
    pub fn add_market(&mut self, market: &str, last_price: Option<Decimal>) {
        self.markets.insert(market.to_string(), last_price);
    }
}

impl MarketKeeper for MockMarketKeeper {
    fn is_market_exist(&self, market: &str) -> bool {
        self.markets.contains_key(market)
    }

    fn last_executed_price(&self, market: &str) -> Option<Decimal> {
        self.markets.get(market).copied().flatten()
    }
}

// ── Coin Ledger ─────────────────────────────────────────────────────────────

type BalanceKey = (Address, String);

/// Spendable and frozen balances per (account, denom), plus collected fees
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemBank {
    balances: BTreeMap<BalanceKey, U256>,
    frozen: BTreeMap<BalanceKey, U256>,
    collected_fees: BTreeMap<String, U256>,
}

impl MemBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create coins out of thin air (genesis allocation)
    pub fn mint(&mut self, account: Address, denom: &str, amount: U256) {
        let entry = self.balances.entry((account, denom.to_string())).or_insert(U256::ZERO);
        *entry = entry.saturating_add(amount);
    }

    pub fn balance(&self, account: &Address, denom: &str) -> U256 {
        self.balances
            .get(&(*account, denom.to_string()))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    pub fn frozen(&self, account: &Address, denom: &str) -> U256 {
        self.frozen
            .get(&(*account, denom.to_string()))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    pub fn collected_fee(&self, denom: &str) -> U256 {
        self.collected_fees.get(denom).copied().unwrap_or(U256::ZERO)
    }

    /// Spendable + frozen + collected fees of `denom` across all accounts
    pub fn total_supply(&self, denom: &str) -> U256 {
        let held = |map: &BTreeMap<BalanceKey, U256>| {
            map.iter()
                .filter(|((_, d), _)| d == denom)
                .fold(U256::ZERO, |acc, (_, v)| acc.saturating_add(*v))
        };
        held(&self.balances)
            .saturating_add(held(&self.frozen))
            .saturating_add(self.collected_fee(denom))
    }

    fn take_spendable(&mut self, account: &Address, coin: &Coin) -> Result<(), LedgerError> {
        let have = self.balance(account, &coin.denom);
        if have < coin.amount {
            return Err(LedgerError::InsufficientBalance {
                account: *account,
                denom: coin.denom.clone(),
                have,
                need: coin.amount,
            });
        }
        self.balances
            .insert((*account, coin.denom.clone()), have - coin.amount);
        Ok(())
    }

    fn add(map: &mut BTreeMap<BalanceKey, U256>, account: &Address, coin: &Coin) -> Result<(), LedgerError> {
        let entry = map.entry((*account, coin.denom.clone())).or_insert(U256::ZERO);
        *entry = entry.checked_add(coin.amount).ok_or_else(|| LedgerError::Overflow {
            denom: coin.denom.clone(),
        })?;
        Ok(())
    }
}

impl BankKeeper for MemBank {
    fn freeze_coins(&mut self, account: &Address, coin: &Coin) -> Result<(), LedgerError> {
        if coin.is_zero() {
            return Ok(());
        }
        self.take_spendable(account, coin)?;
        Self::add(&mut self.frozen, account, coin)
    }

    fn unfreeze_coins(&mut self, account: &Address, coin: &Coin) -> Result<(), LedgerError> {
        if coin.is_zero() {
            return Ok(());
        }
        let have = self.frozen(account, &coin.denom);
        if have < coin.amount {
            return Err(LedgerError::NotFrozen {
                account: *account,
                denom: coin.denom.clone(),
                have,
                need: coin.amount,
            });
        }
        self.frozen.insert((*account, coin.denom.clone()), have - coin.amount);
        Self::add(&mut self.balances, account, coin)
    }

    fn send_coins(&mut self, from: &Address, to: &Address, coin: &Coin) -> Result<(), LedgerError> {
        if coin.is_zero() {
            return Ok(());
        }
        self.take_spendable(from, coin)?;
        Self::add(&mut self.balances, to, coin)
    }

    fn deduct_fee(&mut self, account: &Address, coin: &Coin) -> Result<(), LedgerError> {
        if coin.is_zero() {
            return Ok(());
        }
        self.take_spendable(account, coin)?;
        let entry = self.collected_fees.entry(coin.denom.clone()).or_insert(U256::ZERO);
        *entry = entry.checked_add(coin.amount).ok_or_else(|| LedgerError::Overflow {
            denom: coin.denom.clone(),
        })?;
        Ok(())
    }
}

fn block_at(height: u64, unix_secs: Option<i64>) -> BancorResult<BlockContext> {
    unix_secs
        .and_then(|secs| BlockContext::at_unix(height, secs))
        .ok_or_else(|| BancorError::InvalidRequest(format!("block time out of range at height {}", height)))
}

// ── Test App ────────────────────────────────────────────────────────────────

pub type SimKeeper = BancorKeeper<MemStore, MockTokenKeeper, MockMarketKeeper, MemBank>;

/// Keeper plus block context and params, delivering messages transactionally
#[derive(Debug, Clone)]
pub struct SimApp {
    pub keeper: SimKeeper,
    pub params: Params,
    pub ctx: BlockContext,
}

impl Default for SimApp {
    fn default() -> Self {
        Self::new()
    }
}

impl SimApp {
    /// Empty chain at height 1, time 0, with the reserve token registered
    pub fn new() -> Self {
        Self::with_params(Params::default())
    }

    pub fn with_params(params: Params) -> Self {
        let mut tokens = MockTokenKeeper::new();
        tokens.issue(&params.reserve_denom, Address::ZERO);
        Self {
            keeper: BancorKeeper::new(MemStore::new(), tokens, MockMarketKeeper::new(), MemBank::new()),
            params,
            ctx: BlockContext::new(1, DateTime::<Utc>::UNIX_EPOCH),
        }
    }

    /// Register a token and credit its whole supply to the issuer
    pub fn issue_token(&mut self, denom: &str, issuer: Address, supply: U256) {
        self.keeper.tokens_mut().issue(denom, issuer);
        self.keeper.bank_mut().mint(issuer, denom, supply);
    }

    pub fn fund(&mut self, account: Address, denom: &str, amount: U256) {
        self.keeper.bank_mut().mint(account, denom, amount);
    }

    pub fn add_market(&mut self, market: &str, last_price: Option<Decimal>) {
        self.keeper.market_mut().add_market(market, last_price);
    }

    /// Move the current block to `unix_secs`; the context is unchanged on error
    pub fn set_block_time(&mut self, unix_secs: i64) -> BancorResult<()> {
        self.ctx = block_at(self.ctx.height, Some(unix_secs))?;
        Ok(())
    }

    /// Advance one block, `secs` later
    pub fn next_block(&mut self, secs: i64) -> BancorResult<()> {
        self.ctx = block_at(self.ctx.height + 1, self.ctx.unix_time().checked_add(secs))?;
        Ok(())
    }

    /// Deliver one message as a transaction: all of its writes or none
    pub fn deliver(&mut self, msg: Msg) -> BancorResult<Response> {
        let snapshot = self.keeper.clone();
        let result = self.keeper.handle(&self.ctx, &self.params, &msg);
        if result.is_err() {
            self.keeper = snapshot;
        }
        result
    }

    pub fn pool(&self, key: &str) -> Option<Pool> {
        self.keeper.get_pool(key).ok()
    }

    pub fn balance(&self, account: Address, denom: &str) -> U256 {
        self.keeper.bank().balance(&account, denom)
    }

    pub fn frozen(&self, account: Address, denom: &str) -> U256 {
        self.keeper.bank().frozen(&account, denom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Address {
        Address::repeat_byte(0xa1)
    }

    fn bob() -> Address {
        Address::repeat_byte(0xb0)
    }

    #[test]
    fn test_freeze_and_unfreeze() {
        let mut bank = MemBank::new();
        bank.mint(alice(), "abc", U256::from(100u64));

        bank.freeze_coins(&alice(), &Coin::new("abc", U256::from(60u64))).unwrap();
        assert_eq!(bank.balance(&alice(), "abc"), U256::from(40u64));
        assert_eq!(bank.frozen(&alice(), "abc"), U256::from(60u64));

        let err = bank
            .unfreeze_coins(&alice(), &Coin::new("abc", U256::from(61u64)))
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFrozen { .. }));

        bank.unfreeze_coins(&alice(), &Coin::new("abc", U256::from(60u64))).unwrap();
        assert_eq!(bank.balance(&alice(), "abc"), U256::from(100u64));
    }

    #[test]
    fn test_send_and_fee_conserve_supply() {
        let mut bank = MemBank::new();
        bank.mint(alice(), "cet", U256::from(100u64));

        bank.send_coins(&alice(), &bob(), &Coin::new("cet", U256::from(30u64))).unwrap();
        bank.deduct_fee(&bob(), &Coin::new("cet", U256::from(5u64))).unwrap();

        assert_eq!(bank.balance(&bob(), "cet"), U256::from(25u64));
        assert_eq!(bank.collected_fee("cet"), U256::from(5u64));
        assert_eq!(bank.total_supply("cet"), U256::from(100u64));

        let err = bank
            .send_coins(&bob(), &alice(), &Coin::new("cet", U256::from(26u64)))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
    }

    #[test]
    fn test_out_of_range_block_time_keeps_context() {
        let mut app = SimApp::new();
        app.set_block_time(1_000).unwrap();
        assert!(app.set_block_time(i64::MAX).is_err());
        assert_eq!(app.ctx.unix_time(), 1_000);

        assert!(app.next_block(i64::MAX).is_err());
        assert_eq!(app.ctx.unix_time(), 1_000);
        assert_eq!(app.ctx.height, 1);

        app.next_block(5).unwrap();
        assert_eq!(app.ctx.unix_time(), 1_005);
        assert_eq!(app.ctx.height, 2);
    }

    #[test]
    fn test_zero_coin_is_noop() {
        let mut bank = MemBank::new();
        bank.unfreeze_coins(&alice(), &Coin::new("abc", U256::ZERO)).unwrap();
        bank.send_coins(&alice(), &bob(), &Coin::new("abc", U256::ZERO)).unwrap();
        assert_eq!(bank, MemBank::new());
    }
}
