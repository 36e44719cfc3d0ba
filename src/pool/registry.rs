//! Pool Registry
//!
//! Keyed storage of bancor pool records over a `KvStore`.
//! Key is the 0x10 prefix followed by "stock/money" in caller order.
//! The registry does no validation: invariants are enforced by the
//! handlers before they save.
//!
//! Created: 2026-10-17

use tracing::debug;

use super::info::Pool;
use crate::errors::{BancorError, BancorResult};
use crate::store::KvStore;

/// Store prefix of pool records
pub const POOL_KEY_PREFIX: &[u8] = &[0x10];

/// Full store key of a pool
pub fn pool_store_key(key: &str) -> Vec<u8> {
    let mut store_key = POOL_KEY_PREFIX.to_vec();
    store_key.extend_from_slice(key.as_bytes());
    store_key
}

/// Pool records indexed by pair key
#[derive(Debug, Clone, Default)]
pub struct PoolRegistry<S> {
    store: S,
}

impl<S: KvStore> PoolRegistry<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Load the pool stored under `key`, if any
    pub fn load(&self, key: &str) -> BancorResult<Option<Pool>> {
        match self.store.get(&pool_store_key(key)) {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| BancorError::Store(format!("decode pool {}: {}", key, e))),
            None => Ok(None),
        }
    }

    /// Add or replace a pool record
    pub fn save(&mut self, pool: &Pool) -> BancorResult<()> {
        let bytes = serde_json::to_vec(pool)
            .map_err(|e| BancorError::Store(format!("encode pool {}: {}", pool.key(), e)))?;
        debug!(
            "Saving pool: {} - reserves: (stock {}, money {}) price {}",
            pool.key(),
            pool.stock_in_pool,
            pool.money_in_pool,
            pool.price
        );
        self.store.set(&pool_store_key(&pool.key()), bytes);
        Ok(())
    }

    /// Remove a pool record
    pub fn remove(&mut self, pool: &Pool) {
        debug!("Removing pool: {}", pool.key());
        self.store.delete(&pool_store_key(&pool.key()));
    }

    /// Check if a pool exists
    pub fn contains(&self, key: &str) -> bool {
        self.store.has(&pool_store_key(key))
    }

    /// Every pool, ordered by key
    pub fn all_pools(&self) -> BancorResult<Vec<Pool>> {
        self.store
            .prefix_iter(POOL_KEY_PREFIX)
            .into_iter()
            .map(|(key, bytes)| {
                serde_json::from_slice(&bytes).map_err(|e| {
                    BancorError::Store(format!(
                        "decode pool {}: {}",
                        String::from_utf8_lossy(&key[POOL_KEY_PREFIX.len()..]),
                        e
                    ))
                })
            })
            .collect()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
