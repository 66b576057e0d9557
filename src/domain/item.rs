use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of an [`Item`]. Assigned by the store, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(i64);

impl ItemId {
    pub const FIRST: ItemId = ItemId(1);

    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    /// `None` once the id space is exhausted.
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Stored ids are always positive.
    pub const fn is_valid(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An inventory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub price: f64,
    pub quantity_in_stock: u32,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, price: f64, quantity_in_stock: u32) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            quantity_in_stock,
        }
    }

    pub fn is_in_stock(&self) -> bool {
        self.quantity_in_stock > 0
    }

    /// Price with a currency symbol and two decimals, e.g. `$2.50`.
    pub fn formatted_price(&self, currency_symbol: &str) -> String {
        format!("{}{:.2}", currency_symbol, self.price)
    }
}

/// Payload for creating a new item. `id: None` lets the store assign one.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub id: Option<ItemId>,
    pub name: String,
    pub price: f64,
    pub quantity_in_stock: u32,
}

impl NewItem {
    pub fn new(name: impl Into<String>, price: f64, quantity_in_stock: u32) -> Self {
        Self {
            id: None,
            name: name.into(),
            price,
            quantity_in_stock,
        }
    }

    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = Some(id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatted_price() {
        let item = Item::new(ItemId::new(1), "Widget", 2.5, 10);
        assert_eq!(item.formatted_price("$"), "$2.50");
        assert_eq!(item.formatted_price("€"), "€2.50");

        let cheap = Item::new(ItemId::new(2), "Bolt", 0.126, 1);
        assert_eq!(cheap.formatted_price("$"), "$0.13");
    }

    #[test]
    fn test_item_id_next_stops_at_max() {
        assert_eq!(ItemId::new(41).next(), Some(ItemId::new(42)));
        assert_eq!(ItemId::new(i64::MAX).next(), None);
        assert!(!ItemId::new(0).is_valid());
        assert!(!ItemId::new(-3).is_valid());
    }

    #[test]
    fn test_stock_availability() {
        let mut item = Item::new(ItemId::new(1), "Widget", 1.0, 1);
        assert!(item.is_in_stock());
        item.quantity_in_stock = 0;
        assert!(!item.is_in_stock());
    }

    #[test]
    fn test_item_json_shape() {
        let item = Item::new(ItemId::new(7), "Widget", 2.5, 10);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 7, "name": "Widget", "price": 2.5, "quantity_in_stock": 10})
        );
    }
}
