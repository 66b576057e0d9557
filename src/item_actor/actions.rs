/// Custom actions for Item entities.
///
/// These run inside the store actor, so read-modify-write sequences on a
/// single row cannot interleave with other writers.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemAction {
    /// Removes one unit from stock. Does nothing when stock is already zero.
    Sell,
}

/// Results from ItemActions
#[derive(Debug, Clone, PartialEq)]
pub enum ItemActionResult {
    Sold { remaining: u32 },
    OutOfStock,
}
