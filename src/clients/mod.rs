//! Typed client handles over the generic [`ResourceClient`](crate::actor_framework::ResourceClient).

#[macro_use]
mod macros;
mod item_client;

pub use item_client::ItemClient;
