//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Per-session cart state.
///
/// ```text
/// EMPTY --add--> HAS_ITEMS --add / update (qty > 0)--> HAS_ITEMS
/// HAS_ITEMS --update (all lines removed) / checkout--> EMPTY
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CartState {
    Empty,
    HasItems,
}
