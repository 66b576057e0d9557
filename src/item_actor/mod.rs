//! Item-specific store logic, including the atomic sell action.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
