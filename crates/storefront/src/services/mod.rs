//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - Session-backed cart operations over the core cart state machine

pub mod cart;

pub use cart::{CartServiceError, CartSession};
