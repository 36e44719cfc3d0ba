//! Bancorlite Messages
//!
//! The three requests the module accepts, as a closed enum. Each message
//! has a stateless `validate_basic` that runs before any state is read.
//!
//! Created: 2026-10-17

use alloy_primitives::{Address, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{BancorError, BancorResult};
use crate::types::{pair_key, TradeSide};

/// Create a pool seeded with `max_supply` of `stock`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgBancorInit {
    pub owner: Address,
    pub stock: String,
    pub money: String,
    pub init_price: Decimal,
    pub max_supply: U256,
    pub max_price: Decimal,
    pub enable_cancel_time: i64,
}

/// Buy or sell `amount` of stock against a pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgBancorTrade {
    pub sender: Address,
    pub stock: String,
    pub money: String,
    pub amount: U256,
    pub is_buy: bool,
    /// Most money a buy may cost / least a sell must yield. Zero disables it.
    #[serde(default)]
    pub money_limit: U256,
}

/// Withdraw a pool back to its owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgBancorCancel {
    pub owner: Address,
    pub stock: String,
    pub money: String,
}

/// Every request bancorlite handles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Msg {
    Init(MsgBancorInit),
    Trade(MsgBancorTrade),
    Cancel(MsgBancorCancel),
}

fn validate_denom(denom: &str) -> BancorResult<()> {
    let valid = !denom.is_empty()
        && denom.len() <= 16
        && denom
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.');
    if !valid {
        return Err(BancorError::InvalidRequest(format!("invalid denom: {:?}", denom)));
    }
    Ok(())
}

fn validate_pair(stock: &str, money: &str) -> BancorResult<()> {
    validate_denom(stock)?;
    validate_denom(money)?;
    if stock == money {
        return Err(BancorError::InvalidRequest(format!(
            "stock and money must differ: {}",
            pair_key(stock, money)
        )));
    }
    Ok(())
}

fn validate_account(account: &Address, role: &str) -> BancorResult<()> {
    if account.is_zero() {
        return Err(BancorError::InvalidRequest(format!("missing {} address", role)));
    }
    Ok(())
}

impl MsgBancorInit {
    pub fn validate_basic(&self) -> BancorResult<()> {
        validate_account(&self.owner, "owner")?;
        validate_pair(&self.stock, &self.money)?;
        if self.max_supply.is_zero() {
            return Err(BancorError::InvalidRequest(
                "max supply must be positive".to_string(),
            ));
        }
        if self.init_price < Decimal::ZERO {
            return Err(BancorError::InvalidPrice("init price is negative".to_string()));
        }
        if self.max_price <= Decimal::ZERO {
            return Err(BancorError::InvalidPrice("max price must be positive".to_string()));
        }
        if self.max_price < self.init_price {
            return Err(BancorError::InvalidPrice(
                "max price must not be less than init price".to_string(),
            ));
        }
        if self.enable_cancel_time < 0 {
            return Err(BancorError::InvalidRequest(
                "enable cancel time must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

impl MsgBancorTrade {
    pub fn validate_basic(&self) -> BancorResult<()> {
        validate_account(&self.sender, "sender")?;
        validate_pair(&self.stock, &self.money)?;
        if self.amount.is_zero() {
            return Err(BancorError::InvalidRequest(
                "trade amount must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn side(&self) -> TradeSide {
        TradeSide::from_is_buy(self.is_buy)
    }
}

impl MsgBancorCancel {
    pub fn validate_basic(&self) -> BancorResult<()> {
        validate_account(&self.owner, "owner")?;
        validate_pair(&self.stock, &self.money)
    }
}

impl Msg {
    pub fn validate_basic(&self) -> BancorResult<()> {
        match self {
            Msg::Init(msg) => msg.validate_basic(),
            Msg::Trade(msg) => msg.validate_basic(),
            Msg::Cancel(msg) => msg.validate_basic(),
        }
    }

    /// Message type name, as reported in events
    pub fn kind(&self) -> &'static str {
        match self {
            Msg::Init(_) => "bancor_init",
            Msg::Trade(_) => "bancor_trade",
            Msg::Cancel(_) => "bancor_cancel",
        }
    }

    /// Account that signs the message
    pub fn signer(&self) -> Address {
        match self {
            Msg::Init(msg) => msg.owner,
            Msg::Trade(msg) => msg.sender,
            Msg::Cancel(msg) => msg.owner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn init_msg() -> MsgBancorInit {
        MsgBancorInit {
            owner: Address::repeat_byte(1),
            stock: "abc".to_string(),
            money: "cet".to_string(),
            init_price: dec!(1),
            max_supply: U256::from(1000u64),
            max_price: dec!(2),
            enable_cancel_time: 0,
        }
    }

    #[test]
    fn test_valid_init() {
        assert!(init_msg().validate_basic().is_ok());
    }

    #[test]
    fn test_init_field_checks() {
        let mut msg = init_msg();
        msg.max_supply = U256::ZERO;
        assert!(msg.validate_basic().is_err());

        let mut msg = init_msg();
        msg.max_price = dec!(0.5);
        assert!(matches!(msg.validate_basic(), Err(BancorError::InvalidPrice(_))));

        let mut msg = init_msg();
        msg.init_price = dec!(-1);
        assert!(msg.validate_basic().is_err());

        let mut msg = init_msg();
        msg.money = "abc".to_string();
        assert!(msg.validate_basic().is_err());

        let mut msg = init_msg();
        msg.stock = "ABC".to_string();
        assert!(msg.validate_basic().is_err());

        let mut msg = init_msg();
        msg.owner = Address::ZERO;
        assert!(msg.validate_basic().is_err());
    }

    #[test]
    fn test_trade_amount_must_be_positive() {
        let msg = MsgBancorTrade {
            sender: Address::repeat_byte(2),
            stock: "abc".to_string(),
            money: "cet".to_string(),
            amount: U256::ZERO,
            is_buy: true,
            money_limit: U256::ZERO,
        };
        assert!(msg.validate_basic().is_err());
        assert_eq!(msg.side(), TradeSide::Buy);
    }

    #[test]
    fn test_msg_json_is_tagged() {
        let msg = Msg::Cancel(MsgBancorCancel {
            owner: Address::repeat_byte(1),
            stock: "abc".to_string(),
            money: "cet".to_string(),
        });
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "Cancel");
        assert_eq!(msg.kind(), "bancor_cancel");
        let back: Msg = serde_json::from_value(json).unwrap();
        assert_eq!(back, msg);
    }
}
