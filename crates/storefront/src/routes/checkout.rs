//! Checkout route handlers.
//!
//! Checkout is demonstration-only: the card field is checked for length and
//! then discarded. A successful order is shown once and not stored anywhere.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use sweet_bites_core::{CartError, Order};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::routes::cart::CartView;
use crate::services::{CartServiceError, CartSession};
use crate::state::AppState;

/// Checkout form data.
#[derive(Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub card: String,
}

impl std::fmt::Debug for CheckoutForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutForm")
            .field("name", &self.name)
            .field("card", &"[REDACTED]")
            .finish()
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub cart: CartView,
    pub cart_count: u32,
    pub name: String,
    pub error: Option<String>,
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirm.html")]
pub struct ConfirmTemplate {
    pub order_id: String,
    pub name: String,
    pub total: String,
    pub item_count: u32,
    pub placed_at: String,
    pub cart_count: u32,
}

impl ConfirmTemplate {
    fn new(order: &Order, total: String) -> Self {
        Self {
            order_id: order.order_id.to_string(),
            name: order.customer_name.clone(),
            total,
            item_count: order.item_count,
            placed_at: order.placed_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            cart_count: 0,
        }
    }
}

/// Display the checkout form with an order summary.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<CheckoutTemplate> {
    checkout_page(&state, &session, String::new(), None).await
}

/// Place the order.
///
/// Validation failures re-render the form with the message and a 422; the
/// cart is kept. On success the cart is cleared and the confirmation shown.
#[instrument(skip(state, session))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let catalog = state.catalog();
    let carts = CartSession::new(&session, catalog);

    match carts.checkout(&form.name, &form.card).await {
        Ok(order) => {
            tracing::info!(
                order_id = %order.order_id,
                total = %order.total,
                items = order.item_count,
                "Order placed"
            );
            let total = catalog.price(order.total).display();
            Ok(ConfirmTemplate::new(&order, total).into_response())
        }
        Err(CartServiceError::Cart(CartError::Validation(err))) => {
            tracing::debug!(reason = %err, "Checkout rejected");
            let page =
                checkout_page(&state, &session, form.name.trim().to_string(), Some(err.to_string()))
                    .await?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

async fn checkout_page(
    state: &AppState,
    session: &Session,
    name: String,
    error: Option<String>,
) -> Result<CheckoutTemplate> {
    let catalog = state.catalog();
    let summary = CartSession::new(session, catalog).summary().await?;
    let cart = CartView::new(&summary, catalog);

    Ok(CheckoutTemplate {
        cart_count: cart.item_count,
        cart,
        name,
        error,
    })
}
