//! Bonding-curve pools
//!
//! Curve arithmetic, the persisted pool record and the keyed registry
//! that stores one record per "stock/money" pair.
//!
//! Created: 2026-10-17

pub mod calculator;
pub mod info;
pub mod registry;

pub use calculator::{commission, round_half_even, BondingCurve, CurvePoint, PRICE_DECIMALS};
pub use info::Pool;
pub use registry::{pool_store_key, PoolRegistry, POOL_KEY_PREFIX};
