//! Module Events
//!
//! Typed events emitted by committed operations. Attributes are plain
//! strings so the chain can index them as-is.
//!
//! Created: 2026-10-17

use serde::{Deserialize, Serialize};

pub const EVENT_TYPE_BANCORLITE: &str = "bancorlite";
pub const EVENT_TYPE_MESSAGE: &str = "message";

pub const ATTRIBUTE_MODULE: &str = "module";
pub const ATTRIBUTE_ACTION: &str = "action";
pub const ATTRIBUTE_KEY_CREATE_FOR: &str = "create_for";
pub const ATTRIBUTE_KEY_TRADE_FOR: &str = "trade_for";
pub const ATTRIBUTE_KEY_CANCEL_FOR: &str = "cancel_for";
pub const ATTRIBUTE_OWNER: &str = "owner";
pub const ATTRIBUTE_MAX_SUPPLY: &str = "max_supply";
pub const ATTRIBUTE_NEW_STOCK_IN_POOL: &str = "new_stock_in_pool";
pub const ATTRIBUTE_NEW_MONEY_IN_POOL: &str = "new_money_in_pool";
pub const ATTRIBUTE_NEW_PRICE: &str = "new_price";
pub const ATTRIBUTE_TRADE_SIDE: &str = "side";
pub const ATTRIBUTE_COINS_FROM_POOL: &str = "coins_from_pool";
pub const ATTRIBUTE_COINS_TO_POOL: &str = "coins_to_pool";
pub const ATTRIBUTE_COMMISSION: &str = "commission";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub kind: String,
    pub attributes: Vec<Attribute>,
}

impl Event {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            attributes: Vec::new(),
        }
    }

    pub fn attr(mut self, key: &str, value: impl ToString) -> Self {
        self.attributes.push(Attribute {
            key: key.to_string(),
            value: value.to_string(),
        });
        self
    }

    /// First value recorded under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }
}

/// Result of a successfully handled message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub events: Vec<Event>,
}

impl Response {
    pub fn with_events(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// First event of the given kind
    pub fn event(&self, kind: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_builder() {
        let event = Event::new(EVENT_TYPE_BANCORLITE)
            .attr(ATTRIBUTE_KEY_TRADE_FOR, "abc/cet")
            .attr(ATTRIBUTE_NEW_PRICE, 1.5);
        assert_eq!(event.get(ATTRIBUTE_KEY_TRADE_FOR), Some("abc/cet"));
        assert_eq!(event.get(ATTRIBUTE_NEW_PRICE), Some("1.5"));
        assert_eq!(event.get(ATTRIBUTE_OWNER), None);

        let response = Response::with_events(vec![event]);
        assert!(response.event(EVENT_TYPE_BANCORLITE).is_some());
        assert!(response.event(EVENT_TYPE_MESSAGE).is_none());
    }
}
