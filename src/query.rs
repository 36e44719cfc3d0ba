//! Read-only queries for external inspection

use crate::errors::{BancorError, BancorResult};
use crate::keeper::BancorKeeper;
use crate::pool::Pool;
use crate::store::KvStore;
use crate::types::pair_key;

impl<S: KvStore, T, M, B> BancorKeeper<S, T, M, B> {
    /// GetPool: the pool registered under "stock/money"
    pub fn get_pool(&self, key: &str) -> BancorResult<Pool> {
        self.registry
            .load(key)?
            .ok_or_else(|| BancorError::PoolNotFound(key.to_string()))
    }

    pub fn get_pool_by_pair(&self, stock: &str, money: &str) -> BancorResult<Pool> {
        self.get_pool(&pair_key(stock, money))
    }

    /// Every registered pool, ordered by key
    pub fn pools(&self) -> BancorResult<Vec<Pool>> {
        self.registry.all_pools()
    }

    /// Pools whose stock is `stock`, across all money denoms
    pub fn pools_for_stock(&self, stock: &str) -> BancorResult<Vec<Pool>> {
        Ok(self
            .pools()?
            .into_iter()
            .filter(|p| p.stock == stock)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::BancorError;
    use crate::msgs::{Msg, MsgBancorInit};
    use crate::testing::{SimApp, RESERVE};
    use alloy_primitives::{Address, U256};
    use rust_decimal_macros::dec;

    #[test]
    fn test_get_pool() {
        let owner = Address::repeat_byte(1);
        let mut app = SimApp::new();
        app.issue_token("abc", owner, U256::from(100u64));
        app.fund(owner, RESERVE, U256::from(1_000_000_000_000u64));

        assert_eq!(
            app.keeper.get_pool("abc/cet").unwrap_err(),
            BancorError::PoolNotFound("abc/cet".to_string())
        );

        app.deliver(Msg::Init(MsgBancorInit {
            owner,
            stock: "abc".to_string(),
            money: RESERVE.to_string(),
            init_price: dec!(0.1),
            max_supply: U256::from(100u64),
            max_price: dec!(1),
            enable_cancel_time: 0,
        }))
        .unwrap();

        let pool = app.keeper.get_pool_by_pair("abc", "cet").unwrap();
        assert_eq!(pool.owner, owner);
        assert_eq!(app.keeper.pools().unwrap().len(), 1);
        assert_eq!(app.keeper.pools_for_stock("abc").unwrap().len(), 1);
        assert!(app.keeper.pools_for_stock("cet").unwrap().is_empty());
    }
}
