//! Bancorlite Errors
//!
//! Every rejection a handler can produce. None of them are fatal to the
//! process: the enclosing transaction fails and the chain reports the code
//! and message back to the submitter.

use alloy_primitives::{Address, U256};
use thiserror::Error;

/// Codespace reported alongside every error code
pub const CODESPACE: &str = "bancorlite";

/// Failure reported by the coin-custody ledger
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient balance: {account} has {have}{denom}, needs {need}{denom}")]
    InsufficientBalance {
        account: Address,
        denom: String,
        have: U256,
        need: U256,
    },

    #[error("insufficient frozen coins: {account} has {have}{denom} frozen, needs {need}{denom}")]
    NotFrozen {
        account: Address,
        denom: String,
        have: U256,
        need: U256,
    },

    #[error("balance overflow for {denom}")]
    Overflow { denom: String },
}

/// Error during bancor pool operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BancorError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("bancor pool already exists: {0}")]
    PoolAlreadyExists(String),

    #[error("no bancor pool exists: {0}")]
    PoolNotFound(String),

    #[error("no such token: {0}")]
    UnknownToken(String),

    #[error("{account} is not the issuer of {token}")]
    NotTokenIssuer { token: String, account: Address },

    #[error("market does not exist: {0}")]
    MarketNotFound(String),

    #[error("{0}")]
    OwnerProhibited(OwnerRule),

    #[error("cancel not enabled until {enable_cancel_time}, block time is {block_time}")]
    CooldownNotElapsed {
        enable_cancel_time: i64,
        block_time: i64,
    },

    #[error("stock in pool out of bound: {requested} is not within [0, {max_supply}]")]
    CurveBoundsExceeded { requested: String, max_supply: U256 },

    #[error("money amount {actual} is {direction} the limit {limit}")]
    SlippageExceeded {
        actual: U256,
        limit: U256,
        direction: &'static str,
    },

    #[error("failed to get last executed price of market {0}")]
    PriceOracleUnavailable(String),

    #[error("invalid price: {0}")]
    InvalidPrice(String),

    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),

    #[error("store error: {0}")]
    Store(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Which owner rule a request broke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerRule {
    /// Pool owner tried to trade against its own pool
    SelfTrade,
    /// Someone other than the owner tried to cancel the pool
    NotPoolOwner,
}

impl std::fmt::Display for OwnerRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OwnerRule::SelfTrade => write!(f, "pool owner is prohibited from trading"),
            OwnerRule::NotPoolOwner => write!(f, "only the pool owner may cancel the pool"),
        }
    }
}

impl BancorError {
    /// Stable numeric code within `CODESPACE`
    pub fn code(&self) -> u32 {
        match self {
            BancorError::InvalidRequest(_) => 701,
            BancorError::PoolAlreadyExists(_) => 702,
            BancorError::PoolNotFound(_) => 703,
            BancorError::UnknownToken(_) => 704,
            BancorError::NotTokenIssuer { .. } => 705,
            BancorError::MarketNotFound(_) => 706,
            BancorError::OwnerProhibited(OwnerRule::SelfTrade) => 707,
            BancorError::OwnerProhibited(OwnerRule::NotPoolOwner) => 708,
            BancorError::CooldownNotElapsed { .. } => 709,
            BancorError::CurveBoundsExceeded { .. } => 710,
            BancorError::SlippageExceeded { .. } => 711,
            BancorError::PriceOracleUnavailable(_) => 712,
            BancorError::InvalidPrice(_) => 713,
            BancorError::Overflow(_) => 714,
            BancorError::Store(_) => 715,
            BancorError::Ledger(LedgerError::InsufficientBalance { .. }) => 716,
            BancorError::Ledger(LedgerError::NotFrozen { .. }) => 717,
            BancorError::Ledger(LedgerError::Overflow { .. }) => 718,
        }
    }
}

/// Result type for bancor operations
pub type BancorResult<T> = Result<T, BancorError>;
