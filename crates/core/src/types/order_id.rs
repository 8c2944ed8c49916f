//! Opaque order identifiers.

use core::fmt;

use rand::RngCore;
use serde::{Deserialize, Serialize};

/// A random, non-sequential order identifier.
///
/// Generated from the thread-local CSPRNG and rendered as lowercase hex.
/// Nothing about the value is derivable from previous orders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Number of random bytes drawn per identifier.
    pub const RANDOM_BYTES: usize = 6;

    /// Generate a fresh identifier.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0_u8; Self::RANDOM_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
