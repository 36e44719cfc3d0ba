//! Core chain-level types shared by every bancorlite component
//!
//! Coins, pair keys and the block context a handler executes under.
//!
//! Created: 2026-10-17

use alloy_primitives::U256;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between stock and money denoms in a pair key ("abc/cet")
pub const SYMBOL_SEPARATOR: &str = "/";

/// Build the registry / market key for an ordered (stock, money) pair.
///
/// The order is taken as given: "abc/cet" and "cet/abc" are different keys.
pub fn pair_key(stock: &str, money: &str) -> String {
    format!("{}{}{}", stock, SYMBOL_SEPARATOR, money)
}

/// An amount of a single denom
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: U256,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: U256) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Trade direction against a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn from_is_buy(is_buy: bool) -> Self {
        if is_buy {
            TradeSide::Buy
        } else {
            TradeSide::Sell
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "Buy"),
            TradeSide::Sell => write!(f, "Sell"),
        }
    }
}

/// Header data of the block a transaction is executed in.
///
/// Time comes from the block header, never from the local clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockContext {
    pub height: u64,
    pub time: DateTime<Utc>,
}

impl BlockContext {
    pub fn new(height: u64, time: DateTime<Utc>) -> Self {
        Self { height, time }
    }

    /// Block context from a Unix timestamp in seconds, `None` when the
    /// timestamp is outside chrono's representable range
    pub fn at_unix(height: u64, unix_secs: i64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp(unix_secs, 0).map(|time| Self { height, time })
    }

    /// Block time as Unix seconds
    pub fn unix_time(&self) -> i64 {
        self.time.timestamp()
    }
}
