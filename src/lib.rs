//! # Inventory Store
//!
//! Inventory items (name, price, quantity in stock) kept by a single store
//! actor, with a service layer that validates form input, derives display
//! values and issues writes.
//!
//! ## Layout
//!
//! - **Store** - [`ResourceActor`] owns every [`Item`] row and serializes all
//!   writes; [`ItemClient`] is its typed handle. Committed changes are
//!   persisted to an optional JSON snapshot and published to subscribers.
//! - **Service** - [`InventoryService`] is the surface a UI calls: `validate`,
//!   `add_item`, `update_item`, `sell`, `delete_item`, `observe_all`,
//!   `observe_by_id` and friends.
//! - **System** - [`InventorySystem`] reads an [`InventoryConfig`], starts the
//!   store and shuts it down.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use inventory_store::{setup_tracing, InventoryConfig, InventorySystem};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! setup_tracing();
//! let system = InventorySystem::start(&InventoryConfig::from_env()?).await?;
//!
//! let id = system.service.add_item("Widget", "2.50", "10").await?;
//! let mut widget = system.service.observe_by_id(id);
//! if let Some(item) = widget.next().await {
//!     system.service.sell(&item).await?;
//! }
//!
//! system.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod actor_framework;
pub mod app_system;
pub mod clients;
pub mod domain;
pub mod inventory;
pub mod item_actor;
pub mod persistence;
pub mod subscription;

#[cfg(test)]
mod mock_framework;

pub use actor_framework::{Entity, FrameworkError, InsertOutcome, ResourceActor, ResourceClient};
pub use app_system::{setup_tracing, ConfigError, InventoryConfig, InventorySystem, SystemError};
pub use clients::ItemClient;
pub use domain::{Item, ItemId, NewItem};
pub use inventory::{Field, InventoryError, InventoryService, ItemEntry};
pub use item_actor::ItemError;
pub use subscription::{RecordSubscription, Subscription, SubscriptionHandle};
