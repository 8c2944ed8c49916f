//! Core types for Sweet Bites.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod order_id;
pub mod price;
pub mod status;

pub use id::*;
pub use order_id::OrderId;
pub use price::{CurrencyCode, Price};
pub use status::CartState;
