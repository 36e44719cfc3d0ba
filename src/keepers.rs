//! Expected Keepers
//!
//! Contracts of the modules bancorlite depends on but does not own:
//! the token registry, the order-book market module and the coin ledger.
//! The chain wires in its real keepers; `crate::testing` has in-memory ones.

use alloy_primitives::Address;
use rust_decimal::Decimal;

use crate::errors::LedgerError;
use crate::types::Coin;

/// Token registry
pub trait TokenKeeper {
    fn is_token_exists(&self, denom: &str) -> bool;

    /// Issuer of `denom`, `None` when the token is unknown
    fn issuer(&self, denom: &str) -> Option<Address>;

    fn is_token_issuer(&self, denom: &str, account: &Address) -> bool {
        self.issuer(denom).as_ref() == Some(account)
    }
}

/// Order-book market module
pub trait MarketKeeper {
    /// Whether a market for "stock/money" exists
    fn is_market_exist(&self, market: &str) -> bool;

    /// Price of the last executed order in `market`, `None` when unavailable
    fn last_executed_price(&self, market: &str) -> Option<Decimal>;
}

/// Coin custody ledger.
///
/// Every call is atomic on its own; a failure leaves the ledger unchanged.
pub trait BankKeeper {
    /// Move coins from the spendable to the frozen balance
    fn freeze_coins(&mut self, account: &Address, coin: &Coin) -> Result<(), LedgerError>;

    /// Move coins from the frozen back to the spendable balance
    fn unfreeze_coins(&mut self, account: &Address, coin: &Coin) -> Result<(), LedgerError>;

    fn send_coins(&mut self, from: &Address, to: &Address, coin: &Coin) -> Result<(), LedgerError>;

    /// Charge a fee that leaves the account for the fee collector
    fn deduct_fee(&mut self, account: &Address, coin: &Coin) -> Result<(), LedgerError>;
}
