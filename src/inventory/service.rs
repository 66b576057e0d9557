//! Inventory Service - business logic between a UI and the item store

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::actor_framework::InsertOutcome;
use crate::clients::ItemClient;
use crate::domain::{Item, ItemId, NewItem};
use crate::item_actor::ItemError;
use crate::subscription::{RecordSubscription, Subscription, SubscriptionHandle};

use super::error::{Field, InventoryError, InventoryResult};

/// A validated and parsed add/edit form entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemEntry {
    pub name: String,
    pub price: f64,
    pub quantity_in_stock: u32,
}

/// Mediates between UI-originated commands and the item store.
///
/// Writes return futures: await them for the outcome, or spawn them and rely
/// on the subscriptions to show the effect. Either way the store applies them
/// on its own task.
#[derive(Clone)]
pub struct InventoryService {
    items: ItemClient,
    currency_symbol: Arc<str>,
}

impl InventoryService {
    pub fn new(items: ItemClient, currency_symbol: impl Into<Arc<str>>) -> Self {
        Self {
            items,
            currency_symbol: currency_symbol.into(),
        }
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    /// `false` if any of the raw inputs is empty or whitespace-only.
    /// Numbers are not parsed here; see [`InventoryService::parse_entry`].
    pub fn validate(&self, name: &str, price: &str, quantity: &str) -> bool {
        first_blank(name, price, quantity).is_none()
    }

    /// Blank check plus parsing of price and quantity.
    pub fn parse_entry(&self, name: &str, price: &str, quantity: &str) -> InventoryResult<ItemEntry> {
        if let Some(field) = first_blank(name, price, quantity) {
            return Err(InventoryError::Blank(field));
        }

        Ok(ItemEntry {
            name: name.trim().to_string(),
            price: parse_price(price)?,
            quantity_in_stock: parse_quantity(quantity)?,
        })
    }

    #[instrument(skip(self, name, price, quantity), fields(item_name = %name))]
    pub async fn add_item(&self, name: &str, price: &str, quantity: &str) -> InventoryResult<ItemId> {
        let entry = match self.parse_entry(name, price, quantity) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Item entry rejected");
                return Err(e);
            }
        };

        let new_item = NewItem::new(entry.name, entry.price, entry.quantity_in_stock);
        match self.items.insert_item(new_item).await? {
            InsertOutcome::Inserted(id) => {
                info!(item_id = %id, "Item added");
                Ok(id)
            }
            // no id is requested here, so the store should never ignore the
            // insert; surface it rather than report an id that was not written
            InsertOutcome::Ignored(id) => Err(InventoryError::Duplicate(id)),
        }
    }

    /// Overwrites the item with `id`. `Ok(false)` if it no longer exists.
    #[instrument(skip(self, id, name, price, quantity), fields(item_id = %id, item_name = %name))]
    pub async fn update_item(
        &self,
        id: ItemId,
        name: &str,
        price: &str,
        quantity: &str,
    ) -> InventoryResult<bool> {
        let entry = match self.parse_entry(name, price, quantity) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Item entry rejected");
                return Err(e);
            }
        };

        let item = Item::new(id, entry.name, entry.price, entry.quantity_in_stock);
        let updated = self.items.update_item(item).await?;
        if updated {
            info!("Item updated");
        } else {
            warn!("Item no longer exists, update dropped");
        }
        Ok(updated)
    }

    /// Sells one unit of `item` if the displayed copy shows stock left.
    ///
    /// The decrement itself happens inside the store, so concurrent sells of
    /// the same item never lose an update or go below zero. Returns whether a
    /// unit was actually sold.
    #[instrument(skip(self, item), fields(item_id = %item.id, quantity = item.quantity_in_stock))]
    pub async fn sell(&self, item: &Item) -> InventoryResult<bool> {
        if !self.is_stock_available(item) {
            debug!("Out of stock, nothing to sell");
            return Ok(false);
        }

        match self.items.sell_item(item.id).await {
            Ok(Some(remaining)) => {
                info!(remaining, "Item sold");
                Ok(true)
            }
            Ok(None) => {
                debug!("Stock ran out before the sale");
                Ok(false)
            }
            Err(ItemError::NotFound(_)) => {
                warn!("Item no longer exists, sale dropped");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn is_stock_available(&self, item: &Item) -> bool {
        item.is_in_stock()
    }

    #[instrument(skip(self, item), fields(item_id = %item.id))]
    pub async fn delete_item(&self, item: &Item) -> InventoryResult<bool> {
        let deleted = self.items.delete_item(item.id).await?;
        if deleted {
            info!("Item deleted");
        }
        Ok(deleted)
    }

    pub async fn fetch_item(&self, id: ItemId) -> InventoryResult<Option<Item>> {
        Ok(self.items.get_item(id).await?)
    }

    pub fn formatted_price(&self, item: &Item) -> String {
        item.formatted_price(&self.currency_symbol)
    }

    pub fn observe_all(&self) -> Subscription<Item> {
        self.items.observe_items()
    }

    pub fn observe_by_id(&self, id: ItemId) -> RecordSubscription<Item> {
        self.items.observe_item(id)
    }

    /// Calls `callback` with the current items and again on every change
    /// until the returned handle is unsubscribed or dropped.
    pub fn subscribe_all<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: FnMut(&[Item]) + Send + 'static,
    {
        self.observe_all().for_each(callback)
    }

    pub fn subscribe_by_id<F>(&self, id: ItemId, callback: F) -> SubscriptionHandle
    where
        F: FnMut(&Item) + Send + 'static,
    {
        self.observe_by_id(id).for_each(callback)
    }
}

fn first_blank(name: &str, price: &str, quantity: &str) -> Option<Field> {
    [
        (Field::Name, name),
        (Field::Price, price),
        (Field::Quantity, quantity),
    ]
    .into_iter()
    .find(|(_, value)| value.trim().is_empty())
    .map(|(field, _)| field)
}

fn parse_price(text: &str) -> InventoryResult<f64> {
    let text = text.trim();
    let price: f64 = text.parse().map_err(|_| InventoryError::InvalidInput {
        field: Field::Price,
        reason: format!("'{}' is not a number", text),
    })?;

    if !price.is_finite() || price < 0.0 {
        return Err(InventoryError::InvalidInput {
            field: Field::Price,
            reason: format!("'{}' is not a non-negative amount", text),
        });
    }
    // -0.0 -> 0.0
    Ok(price.abs())
}

fn parse_quantity(text: &str) -> InventoryResult<u32> {
    let text = text.trim();
    text.parse().map_err(|_| InventoryError::InvalidInput {
        field: Field::Quantity,
        reason: format!("'{}' is not a non-negative whole number", text),
    })
}
