//! Session-related types.
//!
//! The cart is the only thing stored in a visitor's session.

/// Session keys for storefront data.
pub mod keys {
    /// Key for the visitor's cart (`sweet_bites_core::Cart` in serde form).
    pub const CART: &str = "cart";
}
