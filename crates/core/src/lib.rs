//! Sweet Bites Core - Domain types and cart logic.
//!
//! This crate provides the types shared by every Sweet Bites component:
//! - `storefront` - Public-facing bakery shop
//! - `cli` - Command-line tools for catalog checks and migrations
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O,
//! no sessions, no HTTP. Persisting a [`Cart`] is the caller's job.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product ids, order ids, and prices
//! - [`catalog`] - The read-only product catalog
//! - [`cart`] - The per-visitor cart and its checkout transition

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod types;

pub use cart::{Cart, CartError, CartLine, CartSummary, Order, ValidationError};
pub use catalog::{Catalog, CatalogError, MAX_PRICE, Product};
pub use types::*;
