//! Cart persistence at the session-store boundary.
//!
//! [`CartSession`] binds one request's [`Session`] to the shared catalog and
//! runs each cart transition as load, apply, save. The cart is stored under
//! [`session_keys::CART`] in its serde form (`{"<id>": qty}`); an absent
//! value is an empty cart.
//!
//! Requests for one session are assumed to be serialized by the hosting
//! layer. There is no read-modify-write protection across concurrent
//! requests of the same visitor.

use sweet_bites_core::{Cart, CartError, CartSummary, Catalog, Order, ProductId};
use thiserror::Error;
use tower_sessions::Session;
use tracing::instrument;

use crate::models::session_keys;

/// Errors from a session-backed cart operation.
#[derive(Debug, Error)]
pub enum CartServiceError {
    /// The cart transition was rejected.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The session store failed.
    #[error("session store error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// A visitor's cart, backed by their session.
pub struct CartSession<'a> {
    session: &'a Session,
    catalog: &'a Catalog,
}

impl<'a> CartSession<'a> {
    /// Bind a session to the catalog.
    #[must_use]
    pub const fn new(session: &'a Session, catalog: &'a Catalog) -> Self {
        Self { session, catalog }
    }

    /// Load the cart, pruning lines whose product no longer exists.
    ///
    /// Pruned carts are written back so stale ids do not accumulate.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn load(&self) -> Result<Cart, CartServiceError> {
        let mut cart = self
            .session
            .get::<Cart>(session_keys::CART)
            .await?
            .unwrap_or_default();

        let pruned = cart.prune(self.catalog);
        if pruned > 0 {
            tracing::info!(pruned, "Dropped stale cart lines");
            self.save(&cart).await?;
        }

        Ok(cart)
    }

    /// Persist the cart. An empty cart removes the session key.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn save(&self, cart: &Cart) -> Result<(), CartServiceError> {
        if cart.is_empty() {
            self.clear().await
        } else {
            self.session.insert(session_keys::CART, cart).await?;
            Ok(())
        }
    }

    /// Remove the cart from the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn clear(&self) -> Result<(), CartServiceError> {
        self.session.remove::<Cart>(session_keys::CART).await?;
        Ok(())
    }

    /// Total units in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn item_count(&self) -> Result<u32, CartServiceError> {
        Ok(self.load().await?.item_count())
    }

    /// Catalog-joined lines and total for rendering.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn summary(&self) -> Result<CartSummary, CartServiceError> {
        Ok(self.load().await?.compute_lines(self.catalog))
    }

    /// Add one unit of `product_id`, returning the new total quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotFound`] for an unknown product (nothing is
    /// written), or an error if the session store fails.
    #[instrument(skip(self))]
    pub async fn add_item(&self, product_id: ProductId) -> Result<u32, CartServiceError> {
        let mut cart = self.load().await?;
        let count = cart.add_item(self.catalog, product_id)?;
        self.save(&cart).await?;
        Ok(count)
    }

    /// Apply a bulk quantity edit; see [`Cart::update_quantities`].
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn update_quantities<'u, I>(&self, updates: I) -> Result<Cart, CartServiceError>
    where
        I: IntoIterator<Item = (&'u str, &'u str)>,
    {
        let mut cart = self.load().await?;
        cart.update_quantities(self.catalog, updates);
        self.save(&cart).await?;
        Ok(cart)
    }

    /// Validate checkout input and, on success, clear the stored cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Validation`] with the cart untouched, or an
    /// error if the session store fails.
    #[instrument(skip(self, payment_token))]
    pub async fn checkout(
        &self,
        customer_name: &str,
        payment_token: &str,
    ) -> Result<Order, CartServiceError> {
        let mut cart = self.load().await?;
        let order = cart.checkout(self.catalog, customer_name, payment_token)?;
        self.clear().await?;
        Ok(order)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use sweet_bites_core::{CartState, Product, ValidationError};
    use tower_sessions::MemoryStore;

    use super::*;

    fn session(store: &Arc<MemoryStore>) -> Session {
        Session::new(None, store.clone(), None)
    }

    #[tokio::test]
    async fn test_load_absent_is_empty() {
        let store = Arc::new(MemoryStore::default());
        let session = session(&store);
        let catalog = Catalog::default_bakery();
        let cart = CartSession::new(&session, &catalog).load().await.unwrap();
        assert_eq!(cart.state(), CartState::Empty);
    }

    #[tokio::test]
    async fn test_add_and_count() {
        let store = Arc::new(MemoryStore::default());
        let session = session(&store);
        let catalog = Catalog::default_bakery();
        let carts = CartSession::new(&session, &catalog);

        assert_eq!(carts.add_item(ProductId::new(1)).await.unwrap(), 1);
        assert_eq!(carts.add_item(ProductId::new(1)).await.unwrap(), 2);
        assert_eq!(carts.add_item(ProductId::new(2)).await.unwrap(), 3);
        assert_eq!(carts.item_count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_add_unknown_does_not_write() {
        let store = Arc::new(MemoryStore::default());
        let session = session(&store);
        let catalog = Catalog::default_bakery();
        let carts = CartSession::new(&session, &catalog);

        let err = carts.add_item(ProductId::new(404)).await.unwrap_err();
        assert!(matches!(err, CartServiceError::Cart(CartError::NotFound(_))));
        assert!(
            session
                .get::<Cart>(session_keys::CART)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_round_trip_through_store() {
        let store = Arc::new(MemoryStore::default());
        let catalog = Catalog::default_bakery();

        let first = session(&store);
        let carts = CartSession::new(&first, &catalog);
        carts.update_quantities([("1", "2"), ("3", "5")]).await.unwrap();
        let saved = carts.load().await.unwrap();
        first.save().await.unwrap();

        // A fresh handle with the same id reads from the store.
        let reloaded = Session::new(first.id(), store.clone(), None);
        let cart = CartSession::new(&reloaded, &catalog).load().await.unwrap();
        assert_eq!(cart, saved);
        assert_eq!(cart.quantity(ProductId::new(3)), Some(5));
    }

    #[tokio::test]
    async fn test_load_prunes_stale_ids() {
        let store = Arc::new(MemoryStore::default());
        let session = session(&store);
        let full = Catalog::default_bakery();
        CartSession::new(&session, &full)
            .update_quantities([("1", "1"), ("4", "2")])
            .await
            .unwrap();

        // Product 4 was removed from the catalog since the cart was written.
        let reduced = Catalog::new(vec![Product::new(
            1,
            "Strawberry Dream",
            Decimal::new(2599, 2),
            "/static/images/image1.svg",
        )])
        .unwrap();
        let cart = CartSession::new(&session, &reduced).load().await.unwrap();
        assert_eq!(cart.line_count(), 1);

        let stored = session
            .get::<Cart>(session_keys::CART)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, cart);
    }

    #[tokio::test]
    async fn test_update_removing_everything_clears_key() {
        let store = Arc::new(MemoryStore::default());
        let session = session(&store);
        let catalog = Catalog::default_bakery();
        let carts = CartSession::new(&session, &catalog);

        carts.add_item(ProductId::new(2)).await.unwrap();
        let cart = carts.update_quantities([("2", "0")]).await.unwrap();
        assert!(cart.is_empty());
        assert!(
            session
                .get::<Cart>(session_keys::CART)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_checkout_flow() {
        let store = Arc::new(MemoryStore::default());
        let session = session(&store);
        let catalog = Catalog::default_bakery();
        let carts = CartSession::new(&session, &catalog);

        let err = carts.checkout("Jane", "123456").await.unwrap_err();
        assert!(matches!(
            err,
            CartServiceError::Cart(CartError::Validation(ValidationError::EmptyCart))
        ));

        carts.update_quantities([("1", "2"), ("2", "1")]).await.unwrap();
        let err = carts.checkout("Jane", "1234").await.unwrap_err();
        assert!(matches!(
            err,
            CartServiceError::Cart(CartError::Validation(
                ValidationError::PaymentTokenTooShort { .. }
            ))
        ));
        assert_eq!(carts.item_count().await.unwrap(), 3);

        let order = carts.checkout("Jane", "123456").await.unwrap();
        assert_eq!(order.total, Decimal::new(8197, 2));
        assert_eq!(carts.load().await.unwrap().state(), CartState::Empty);
    }
}
