use std::fmt;

use thiserror::Error;

use crate::domain::ItemId;
use crate::item_actor::ItemError;

/// A form field of the add/edit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Price,
    Quantity,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Name => "name",
            Field::Price => "price",
            Field::Quantity => "quantity",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum InventoryError {
    #[error("Item {0} must not be blank")]
    Blank(Field),
    #[error("Invalid item {field}: {reason}")]
    InvalidInput { field: Field, reason: String },
    #[error("Item id {0} is already taken")]
    Duplicate(ItemId),
    #[error(transparent)]
    Store(#[from] ItemError),
}

pub type InventoryResult<T> = Result<T, InventoryError>;
