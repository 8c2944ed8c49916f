//! The read-only product catalog.
//!
//! A [`Catalog`] is built once at process start (from the built-in bakery
//! list or a JSON file) and shared by reference afterwards. It is never
//! mutated, so concurrent readers need no synchronization.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CurrencyCode, Price, ProductId};

/// Highest unit price a catalog accepts.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Errors that can occur when building a [`Catalog`].
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    /// The catalog has no products.
    #[error("catalog must contain at least one product")]
    Empty,
    /// A product id is below 1.
    #[error("product id must be at least 1 (got {0})")]
    InvalidId(ProductId),
    /// Two products share an id.
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),
    /// A product has a blank name.
    #[error("product {0} has an empty name")]
    EmptyName(ProductId),
    /// A product has a negative price.
    #[error("product {id} has a negative price ({price})")]
    NegativePrice {
        /// Offending product.
        id: ProductId,
        /// The rejected price.
        price: Decimal,
    },
    /// A product price is above [`MAX_PRICE`].
    #[error("product {id} price {price} exceeds the maximum of {max}", max = MAX_PRICE)]
    PriceTooHigh {
        /// Offending product.
        id: ProductId,
        /// The rejected price.
        price: Decimal,
    },
    /// The catalog source is not valid JSON.
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A purchasable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price in the catalog currency.
    pub price: Decimal,
    /// Image URL or path relative to the site root.
    pub image: String,
}

impl Product {
    /// Create a new product.
    #[must_use]
    pub fn new(id: i32, name: impl Into<String>, price: Decimal, image: impl Into<String>) -> Self {
        Self {
            id: ProductId::new(id),
            name: name.into(),
            price,
            image: image.into(),
        }
    }
}

/// Ordered, immutable list of products.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    currency_code: CurrencyCode,
}

impl Catalog {
    /// Build a catalog, validating ids, names and prices.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty, an id is below 1 or repeated,
    /// a name is blank, or a price is negative or above [`MAX_PRICE`].
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        if products.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if product.id.as_i32() < 1 {
                return Err(CatalogError::InvalidId(product.id));
            }
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
            if product.name.trim().is_empty() {
                return Err(CatalogError::EmptyName(product.id));
            }
            if product.price < Decimal::ZERO {
                return Err(CatalogError::NegativePrice {
                    id: product.id,
                    price: product.price,
                });
            }
            if product.price > MAX_PRICE {
                return Err(CatalogError::PriceTooHigh {
                    id: product.id,
                    price: product.price,
                });
            }
        }

        Ok(Self {
            products,
            currency_code: CurrencyCode::default(),
        })
    }

    /// Parse and validate a catalog from a JSON array of products.
    ///
    /// Prices may be given as strings (`"25.99"`) or numbers.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the products are invalid.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// The built-in Sweet Bites cake list.
    #[must_use]
    pub fn default_bakery() -> Self {
        Self {
            products: vec![
                Product::new(1, "Strawberry Dream", Decimal::new(2599, 2), "/static/images/image1.svg"),
                Product::new(2, "Chocolate Heaven", Decimal::new(2999, 2), "/static/images/image2.svg"),
                Product::new(3, "Vanilla Delight", Decimal::new(2299, 2), "/static/images/image3.svg"),
                Product::new(4, "Pink Velvet", Decimal::new(2799, 2), "/static/images/image4.svg"),
            ],
            currency_code: CurrencyCode::USD,
        }
    }

    /// All products in definition order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Returns true if a product with this id exists.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Wrap an amount in this catalog's currency.
    #[must_use]
    pub const fn price(&self, amount: Decimal) -> Price {
        Price::new(amount, self.currency_code)
    }

    /// Serialize the products back to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(&self.products)?)
    }
}
