use crate::actor_framework::Entity;
use crate::domain::{Item, ItemId, NewItem};
use super::actions::{ItemAction, ItemActionResult};

fn check_price(price: f64) -> Result<(), String> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(format!("Price must be a non-negative number, got {}", price))
    }
}

impl Entity for Item {
    type Id = ItemId;
    type CreateParams = NewItem;
    type Action = ItemAction;
    type ActionResult = ItemActionResult;

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn next_id(last: Option<&ItemId>) -> Option<ItemId> {
        match last {
            Some(id) => id.next(),
            None => Some(ItemId::FIRST),
        }
    }

    fn requested_id(params: &NewItem) -> Option<ItemId> {
        params.id
    }

    fn validate_requested_id(id: &ItemId) -> Result<(), String> {
        if id.is_valid() {
            Ok(())
        } else {
            Err(format!("Item id must be positive, got {}", id))
        }
    }

    /// Creates a new Item from creation parameters.
    ///
    /// # Arguments
    /// * `id` - Identifier assigned by the store (or requested by the caller)
    /// * `params` - Name, price and quantity in stock
    fn from_create_params(id: ItemId, params: NewItem) -> Result<Self, String> {
        Ok(Self {
            id,
            name: params.name,
            price: params.price,
            quantity_in_stock: params.quantity_in_stock,
        })
    }

    fn on_create(&mut self) -> Result<(), String> {
        check_price(self.price)
    }

    /// Overwrites every field of the stored item.
    ///
    /// # Errors
    /// Rejects a negative or non-finite price; the stored row is then kept as it was.
    fn on_replace(&mut self, replacement: Item) -> Result<(), String> {
        check_price(replacement.price)?;
        *self = replacement;
        Ok(())
    }

    /// Handles item-specific actions.
    ///
    /// # Actions
    /// - `Sell`: Decrements stock by one if any is left
    fn handle_action(&mut self, action: ItemAction) -> Result<ItemActionResult, String> {
        match action {
            ItemAction::Sell => {
                if self.quantity_in_stock > 0 {
                    self.quantity_in_stock -= 1;
                    Ok(ItemActionResult::Sold {
                        remaining: self.quantity_in_stock,
                    })
                } else {
                    Ok(ItemActionResult::OutOfStock)
                }
            }
        }
    }
}
