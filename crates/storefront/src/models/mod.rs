//! Domain models for storefront.
//!
//! Catalog, cart and order types live in `sweet-bites-core`; this module only
//! holds what is specific to the web layer.

pub mod session;

pub use session::keys as session_keys;
