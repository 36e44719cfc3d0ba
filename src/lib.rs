//! Bancor-lite Library
//!
//! Bonding-curve pools that sell a token along a linear price curve against
//! a money token, with escrowed reserves, fees and cooldown-gated cancel.
//! Deterministic: the same state, params and message always give the same
//! result.
//!
//! Created: 2026-10-17

pub mod config;
pub mod errors;
pub mod events;
pub mod genesis;
pub mod guards;
pub mod handler;
pub mod keeper;
pub mod keepers;
pub mod lifecycle;
pub mod msgs;
pub mod params;
pub mod pool;
pub mod query;
pub mod simulation;
pub mod store;
pub mod testing;
pub mod trade;
pub mod types;

// Re-export commonly used types
pub use config::BancorConfig;
pub use errors::{BancorError, BancorResult, LedgerError, OwnerRule};
pub use events::{Event, Response};
pub use genesis::GenesisState;
pub use keeper::BancorKeeper;
pub use keepers::{BankKeeper, MarketKeeper, TokenKeeper};
pub use msgs::{Msg, MsgBancorCancel, MsgBancorInit, MsgBancorTrade};
pub use params::Params;
pub use pool::{BondingCurve, Pool, PoolRegistry};
pub use store::{KvStore, MemStore};
pub use types::{BlockContext, Coin, TradeSide};
