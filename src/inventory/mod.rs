//! Validation, derived values and orchestration between a UI and the item store.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
