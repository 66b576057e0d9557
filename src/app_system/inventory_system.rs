use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::actor_framework::ResourceActor;
use crate::clients::ItemClient;
use crate::domain::Item;
use crate::inventory::InventoryService;
use crate::persistence::SnapshotFile;

use super::config::InventoryConfig;
use super::error::SystemError;

/// The application root: owns the item store actor and hands out the service.
///
/// The store is constructed here and injected into the service; there is no
/// global store handle.
pub struct InventorySystem {
    pub service: InventoryService,
    handle: JoinHandle<()>,
}

impl InventorySystem {
    /// Start the item store (loading its snapshot when a data path is
    /// configured) and wire the service to it.
    pub async fn start(config: &InventoryConfig) -> Result<Self, SystemError> {
        info!(
            data_path = ?config.data_path,
            mailbox_size = config.mailbox_size,
            "Starting inventory system"
        );

        let (actor, resource_client) = match &config.data_path {
            Some(path) => {
                ResourceActor::<Item>::open(config.mailbox_size, SnapshotFile::new(path)).await?
            }
            None => ResourceActor::<Item>::new(config.mailbox_size),
        };
        let handle = tokio::spawn(actor.run());

        let service = InventoryService::new(
            ItemClient::new(resource_client),
            config.currency_symbol.as_str(),
        );

        Ok(Self { service, handle })
    }

    /// Stop the store once every outstanding request has been handled.
    ///
    /// The actor stops when the last client handle goes away, so any
    /// `InventoryService` clones still held elsewhere keep it alive until
    /// they are dropped.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down inventory system...");
        drop(self.service);

        if let Err(e) = self.handle.await {
            error!("Item store task failed: {:?}", e);
            return Err(e.into());
        }

        info!("Inventory system shutdown complete.");
        Ok(())
    }
}
