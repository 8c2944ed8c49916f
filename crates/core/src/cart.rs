//! The per-visitor cart and its state transitions.
//!
//! A [`Cart`] is a keyed quantity ledger: product id to a positive unit
//! count. Every operation here is pure. The storefront loads the cart from
//! the visitor's session, applies one transition, and writes it back.
//!
//! ```text
//! EMPTY --add_item--> HAS_ITEMS
//! HAS_ITEMS --add_item / update_quantities (net qty > 0)--> HAS_ITEMS
//! HAS_ITEMS --update_quantities (all lines removed)--> EMPTY
//! HAS_ITEMS --checkout (ok)--> EMPTY
//! ```
//!
//! A failed checkout never changes the cart.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Product};
use crate::types::price::round_money;
use crate::types::{CartState, OrderId, ProductId};

/// Minimum trimmed length of the payment token accepted at checkout.
pub const MIN_PAYMENT_TOKEN_LEN: usize = 6;

/// Errors returned by cart operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The product id is not in the catalog.
    #[error("product {0} not found")]
    NotFound(ProductId),
    /// Checkout input was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Reasons a checkout is rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// There is nothing to buy.
    #[error("Your cart is empty.")]
    EmptyCart,
    /// No customer name was given.
    #[error("Please enter your name.")]
    MissingName,
    /// The card-like token is too short.
    #[error("Please enter a valid card number (at least {min} characters, demo only).")]
    PaymentTokenTooShort {
        /// Minimum accepted length.
        min: usize,
    },
}

/// Mapping of product id to quantity, owned by one visitor's session.
///
/// Serializes as a JSON object keyed by the id string, e.g.
/// `{"1": 2, "3": 1}`. Quantities are always at least 1; a line that would
/// drop to zero is removed instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: BTreeMap<ProductId, u32>,
}

/// One catalog-joined cart entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
    /// `product.price * quantity`, unrounded.
    pub line_total: Decimal,
}

/// The rendered view of a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    /// Lines in catalog order. Stale ids are left out.
    pub lines: Vec<CartLine>,
    /// Sum of line totals, rounded to cents.
    pub total: Decimal,
    /// Sum of quantities over `lines`.
    pub item_count: u32,
}

impl CartSummary {
    /// Returns true if no line could be joined against the catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Confirmation record for a successful checkout. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub order_id: OrderId,
    pub customer_name: String,
    pub total: Decimal,
    pub item_count: u32,
    pub placed_at: DateTime<Utc>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of the cart.
    #[must_use]
    pub fn state(&self) -> CartState {
        if self.lines.is_empty() {
            CartState::Empty
        } else {
            CartState::HasItems
        }
    }

    /// Returns true if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Quantity stored for `id`, if any.
    #[must_use]
    pub fn quantity(&self, id: ProductId) -> Option<u32> {
        self.lines.get(&id).copied()
    }

    /// Total units across all stored lines, stale ones included.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.values().fold(0, |acc, qty| acc.saturating_add(*qty))
    }

    /// Number of distinct stored lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Iterate over stored `(id, quantity)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ProductId, u32)> + '_ {
        self.lines.iter().map(|(id, qty)| (*id, *qty))
    }

    /// Add one unit of `id`, inserting the line at 1 if absent.
    ///
    /// Returns the new total quantity of the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotFound`] if `id` is not in the catalog; the
    /// cart is left unchanged.
    pub fn add_item(&mut self, catalog: &Catalog, id: ProductId) -> Result<u32, CartError> {
        if !catalog.contains(id) {
            return Err(CartError::NotFound(id));
        }

        let qty = self.lines.entry(id).or_insert(0);
        *qty = qty.saturating_add(1);
        Ok(self.item_count())
    }

    /// Apply a bulk quantity edit.
    ///
    /// Each entry is `(product id, requested quantity)` as raw form text.
    /// A positive integer sets the line. Zero, a negative number, or
    /// anything that is not an integer in range removes the line; malformed
    /// input is never an error. Entries whose id does not parse or is not
    /// in the catalog are ignored.
    pub fn update_quantities<'a, I>(&mut self, catalog: &Catalog, updates: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (raw_id, raw_qty) in updates {
            let Ok(id) = raw_id.parse::<ProductId>() else {
                continue;
            };
            if !catalog.contains(id) {
                continue;
            }

            match parse_quantity(raw_qty) {
                Some(qty) => {
                    self.lines.insert(id, qty);
                }
                None => {
                    self.lines.remove(&id);
                }
            }
        }
    }

    /// Join the cart against the catalog.
    ///
    /// Lines come out in catalog order. Ids with no matching product are
    /// skipped without error; see [`Cart::prune`] to drop them from storage.
    #[must_use]
    pub fn compute_lines(&self, catalog: &Catalog) -> CartSummary {
        let mut lines = Vec::with_capacity(self.lines.len());
        let mut total = Decimal::ZERO;
        let mut item_count = 0_u32;

        for product in catalog.products() {
            let Some(&quantity) = self.lines.get(&product.id) else {
                continue;
            };
            let line_total = product.price.saturating_mul(Decimal::from(quantity));
            total = total.saturating_add(line_total);
            item_count = item_count.saturating_add(quantity);
            lines.push(CartLine {
                product: product.clone(),
                quantity,
                line_total,
            });
        }

        CartSummary {
            lines,
            total: round_money(total),
            item_count,
        }
    }

    /// Remove lines whose product is no longer in the catalog, or whose
    /// quantity is zero. Returns the number of lines removed.
    pub fn prune(&mut self, catalog: &Catalog) -> usize {
        let before = self.lines.len();
        self.lines
            .retain(|id, qty| *qty > 0 && catalog.contains(*id));
        before - self.lines.len()
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Validate checkout input and turn the cart into an [`Order`].
    ///
    /// Checks, in order: the cart has at least one catalog line, the trimmed
    /// name is non-empty, and the trimmed payment token has at least
    /// [`MIN_PAYMENT_TOKEN_LEN`] characters. This is demonstration-only
    /// validation; no payment is authorized.
    ///
    /// On success the cart is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Validation`] without touching the cart.
    pub fn checkout(
        &mut self,
        catalog: &Catalog,
        customer_name: &str,
        payment_token: &str,
    ) -> Result<Order, CartError> {
        let summary = self.compute_lines(catalog);
        if summary.is_empty() {
            return Err(ValidationError::EmptyCart.into());
        }

        let customer_name = customer_name.trim();
        if customer_name.is_empty() {
            return Err(ValidationError::MissingName.into());
        }

        if payment_token.trim().chars().count() < MIN_PAYMENT_TOKEN_LEN {
            return Err(ValidationError::PaymentTokenTooShort {
                min: MIN_PAYMENT_TOKEN_LEN,
            }
            .into());
        }

        let order = Order {
            order_id: OrderId::generate(),
            customer_name: customer_name.to_string(),
            total: summary.total,
            item_count: summary.item_count,
            placed_at: Utc::now(),
        };
        self.clear();
        Ok(order)
    }
}

/// Parse a requested quantity; `None` means "remove the line".
fn parse_quantity(raw: &str) -> Option<u32> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|qty| *qty > 0)
        .and_then(|qty| u32::try_from(qty).ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::MAX_PRICE;

    fn catalog() -> Catalog {
        Catalog::default_bakery()
    }

    fn id(n: i32) -> ProductId {
        ProductId::new(n)
    }

    #[test]
    fn test_new_cart_is_empty() {
        let cart = Cart::new();
        assert_eq!(cart.state(), CartState::Empty);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_add_item_inserts_single_line_for_every_product() {
        let catalog = catalog();
        for product in catalog.products() {
            let mut cart = Cart::new();
            let count = cart.add_item(&catalog, product.id).unwrap();
            assert_eq!(count, 1);
            assert_eq!(cart.line_count(), 1);
            assert_eq!(cart.quantity(product.id), Some(1));
            assert_eq!(cart.state(), CartState::HasItems);
        }
    }

    #[test]
    fn test_add_item_increments() {
        let catalog = catalog();
        let mut cart = Cart::new();
        for _ in 0..5 {
            cart.add_item(&catalog, id(3)).unwrap();
        }
        assert_eq!(cart.quantity(id(3)), Some(5));
        assert_eq!(cart.add_item(&catalog, id(1)).unwrap(), 6);
    }

    #[test]
    fn test_add_item_unknown_id_leaves_cart_untouched() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(&catalog, id(1)).unwrap();
        let before = cart.clone();

        let err = cart.add_item(&catalog, id(99)).unwrap_err();
        assert_eq!(err, CartError::NotFound(id(99)));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_update_sets_positive_quantity() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(&catalog, id(1)).unwrap();
        cart.update_quantities(&catalog, [("1", "4"), ("2", " 2 ")]);
        assert_eq!(cart.quantity(id(1)), Some(4));
        assert_eq!(cart.quantity(id(2)), Some(2));
    }

    #[test]
    fn test_update_removes_on_zero_negative_or_garbage() {
        let catalog = catalog();
        for raw in ["0", "-3", "abc", "", "2.5", "99999999999"] {
            let mut cart = Cart::new();
            cart.add_item(&catalog, id(1)).unwrap();
            cart.add_item(&catalog, id(2)).unwrap();
            cart.update_quantities(&catalog, [("1", raw)]);
            assert_eq!(cart.quantity(id(1)), None, "input {raw:?}");
            assert_eq!(cart.quantity(id(2)), Some(1));
        }
    }

    #[test]
    fn test_update_removing_last_line_empties_cart() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(&catalog, id(4)).unwrap();
        cart.update_quantities(&catalog, [("4", "0")]);
        assert_eq!(cart.state(), CartState::Empty);
    }

    #[test]
    fn test_update_ignores_unknown_and_malformed_ids() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(&catalog, id(1)).unwrap();
        let before = cart.clone();
        cart.update_quantities(&catalog, [("42", "3"), ("x", "3"), ("", "1")]);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_compute_lines_total() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.update_quantities(&catalog, [("1", "2"), ("2", "1")]);

        let summary = cart.compute_lines(&catalog);
        assert_eq!(summary.total, Decimal::new(8197, 2));
        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.lines.len(), 2);
        assert_eq!(summary.lines[0].product.id, id(1));
        assert_eq!(summary.lines[0].line_total, Decimal::new(5198, 2));
        assert_eq!(summary.lines[1].line_total, Decimal::new(2999, 2));
    }

    #[test]
    fn test_compute_lines_largest_order_does_not_overflow() {
        let catalog = Catalog::new(vec![
            Product::new(1, "Wedding Tower", MAX_PRICE, "a.svg"),
            Product::new(2, "Anniversary Tower", MAX_PRICE, "b.svg"),
        ])
        .unwrap();
        let max = u32::MAX.to_string();
        let mut cart = Cart::new();
        cart.update_quantities(&catalog, [("1", max.as_str()), ("2", max.as_str())]);

        let summary = cart.compute_lines(&catalog);
        let line = MAX_PRICE * Decimal::from(u32::MAX);
        assert_eq!(summary.lines[0].line_total, line);
        assert_eq!(summary.total, line * Decimal::TWO);
        assert_eq!(summary.item_count, u32::MAX);
    }

    #[test]
    fn test_compute_lines_follows_catalog_order() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(&catalog, id(4)).unwrap();
        cart.add_item(&catalog, id(2)).unwrap();
        let ids: Vec<_> = cart
            .compute_lines(&catalog)
            .lines
            .iter()
            .map(|l| l.product.id)
            .collect();
        assert_eq!(ids, [id(2), id(4)]);
    }

    #[test]
    fn test_compute_lines_skips_stale_ids() {
        let catalog = catalog();
        let cart: Cart = serde_json::from_str(r#"{"1": 1, "77": 3}"#).unwrap();
        let summary = cart.compute_lines(&catalog);
        assert_eq!(summary.lines.len(), 1);
        assert_eq!(summary.total, Decimal::new(2599, 2));
        // Stale key still stored until pruned.
        assert_eq!(cart.quantity(id(77)), Some(3));
    }

    #[test]
    fn test_prune_drops_stale_and_zero_lines() {
        let catalog = catalog();
        let mut cart: Cart = serde_json::from_str(r#"{"1": 1, "2": 0, "77": 3}"#).unwrap();
        assert_eq!(cart.prune(&catalog), 2);
        assert_eq!(cart.iter().collect::<Vec<_>>(), [(id(1), 1)]);
        assert_eq!(cart.prune(&catalog), 0);
    }

    #[test]
    fn test_checkout_empty_cart_fails() {
        let catalog = catalog();
        let mut cart = Cart::new();
        let err = cart.checkout(&catalog, "Jane", "123456").unwrap_err();
        assert_eq!(err, CartError::Validation(ValidationError::EmptyCart));
    }

    #[test]
    fn test_checkout_only_stale_lines_counts_as_empty() {
        let catalog = catalog();
        let mut cart: Cart = serde_json::from_str(r#"{"77": 3}"#).unwrap();
        let err = cart.checkout(&catalog, "Jane", "123456").unwrap_err();
        assert_eq!(err, CartError::Validation(ValidationError::EmptyCart));
    }

    #[test]
    fn test_checkout_short_token_fails_without_mutation() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(&catalog, id(1)).unwrap();
        let before = cart.clone();

        let err = cart.checkout(&catalog, "Jane", "1234").unwrap_err();
        assert_eq!(
            err,
            CartError::Validation(ValidationError::PaymentTokenTooShort { min: 6 })
        );
        assert_eq!(cart, before);

        // Whitespace does not count toward the length.
        let err = cart.checkout(&catalog, "Jane", "  12345  ").unwrap_err();
        assert!(matches!(
            err,
            CartError::Validation(ValidationError::PaymentTokenTooShort { .. })
        ));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_checkout_missing_name_fails() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(&catalog, id(1)).unwrap();
        for name in ["", "   "] {
            let err = cart.checkout(&catalog, name, "123456").unwrap_err();
            assert_eq!(err, CartError::Validation(ValidationError::MissingName));
        }
        assert_eq!(cart.state(), CartState::HasItems);
    }

    #[test]
    fn test_checkout_success_clears_cart() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.update_quantities(&catalog, [("1", "2"), ("2", "1")]);

        let order = cart.checkout(&catalog, " Jane ", "123456").unwrap();
        assert_eq!(order.customer_name, "Jane");
        assert_eq!(order.total, Decimal::new(8197, 2));
        assert_eq!(order.item_count, 3);
        assert_eq!(order.order_id.as_str().len(), 12);
        assert_eq!(cart.state(), CartState::Empty);
    }

    #[test]
    fn test_serde_uses_string_keys() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(&catalog, id(1)).unwrap();
        cart.add_item(&catalog, id(1)).unwrap();
        cart.add_item(&catalog, id(3)).unwrap();

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json, serde_json::json!({"1": 2, "3": 1}));

        let back: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(back, cart);
    }

    #[test]
    fn test_validation_messages_are_user_facing() {
        assert_eq!(ValidationError::EmptyCart.to_string(), "Your cart is empty.");
        let err: CartError = ValidationError::MissingName.into();
        assert_eq!(err.to_string(), "Please enter your name.");
    }
}
