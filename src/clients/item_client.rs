use tracing::{debug, instrument};

use crate::actor_framework::{InsertOutcome, ResourceClient};
use crate::domain::{Item, ItemId, NewItem};
use crate::item_actor::{ItemAction, ItemActionResult, ItemError};

/// Client for interacting with the Item store actor.
#[derive(Clone)]
pub struct ItemClient {
    inner: ResourceClient<Item>,
}

impl_basic_client!(ItemClient, Item, ItemError, item);

impl ItemClient {
    /// Adds a row. A requested id that is taken or was deleted is reported as
    /// [`InsertOutcome::Ignored`] and leaves the table unchanged.
    #[instrument(skip(self, item), fields(item_name = %item.name))]
    pub async fn insert_item(&self, item: NewItem) -> Result<InsertOutcome<ItemId>, ItemError> {
        debug!("Sending request");
        self.inner.create(item).await.map_err(ItemError::from)
    }

    /// Replaces the row with the same id. `Ok(false)` when no such row exists.
    #[instrument(skip(self, item), fields(item_id = %item.id))]
    pub async fn update_item(&self, item: Item) -> Result<bool, ItemError> {
        debug!("Sending request");
        self.inner.replace(item).await.map_err(ItemError::from)
    }

    /// Sells one unit. Returns the remaining stock, or `None` if the item was
    /// already out of stock.
    #[instrument(skip(self))]
    pub async fn sell_item(&self, id: ItemId) -> Result<Option<u32>, ItemError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ItemAction::Sell).await {
            Ok(ItemActionResult::Sold { remaining }) => Ok(Some(remaining)),
            Ok(ItemActionResult::OutOfStock) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
