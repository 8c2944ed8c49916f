//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Adding an item is a JSON call
//! made by `static/js/app.js`; quantity edits are a plain form post that
//! redirects back to the cart page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use sweet_bites_core::{CartError, CartSummary, Catalog, ProductId};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::services::{CartServiceError, CartSession};
use crate::state::AppState;

/// Form field prefix for bulk quantity edits (`qty_<product id>`).
pub const QUANTITY_FIELD_PREFIX: &str = "qty_";

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u32,
}

impl CartView {
    /// Build the view from a computed summary.
    #[must_use]
    pub fn new(summary: &CartSummary, catalog: &Catalog) -> Self {
        Self {
            items: summary
                .lines
                .iter()
                .map(|line| CartItemView {
                    id: line.product.id.as_i32(),
                    name: line.product.name.clone(),
                    image: line.product.image.clone(),
                    quantity: line.quantity,
                    price: catalog.price(line.product.price).display(),
                    line_price: catalog.price(line.line_total).display(),
                })
                .collect(),
            total: catalog.price(summary.total).display(),
            item_count: summary.item_count,
        }
    }

    /// Returns true if there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// JSON body returned by the add-to-cart endpoint.
#[derive(Debug, Serialize)]
pub struct AddToCartResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// JSON body returned by the cart count endpoint.
#[derive(Debug, Serialize)]
pub struct CartCountResponse {
    pub cart_count: u32,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub cart_count: u32,
}

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<CartShowTemplate> {
    let catalog = state.catalog();
    let summary = CartSession::new(&session, catalog).summary().await?;
    let cart = CartView::new(&summary, catalog);

    Ok(CartShowTemplate {
        cart_count: cart.item_count,
        cart,
    })
}

/// Add one unit of a product to the cart.
///
/// Unknown or malformed ids get a 404 with `success: false` and leave the
/// cart alone.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Path(raw_id): Path<String>,
) -> Result<Response> {
    let Ok(product_id) = raw_id.parse::<ProductId>() else {
        tracing::debug!(product_id = %raw_id, "Add to cart for malformed product id");
        return Ok(product_not_found());
    };
    let carts = CartSession::new(&session, state.catalog());

    match carts.add_item(product_id).await {
        Ok(count) => {
            let id = product_id.to_string();
            add_breadcrumb("cart", "Added item", Some(&[("product_id", id.as_str())]));
            Ok(Json(AddToCartResponse {
                success: true,
                cart_count: Some(count),
                message: None,
            })
            .into_response())
        }
        Err(CartServiceError::Cart(CartError::NotFound(id))) => {
            tracing::debug!(product_id = %id, "Add to cart for unknown product");
            Ok(product_not_found())
        }
        Err(e) => Err(e.into()),
    }
}

fn product_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(AddToCartResponse {
            success: false,
            cart_count: None,
            message: Some("Product not found".to_string()),
        }),
    )
        .into_response()
}

/// Apply a bulk quantity edit and return to the cart page.
///
/// Only `qty_<id>` fields are read. Fields are applied in submission
/// order, so a later field for the same id wins (the per-line remove
/// button relies on this).
#[instrument(skip(state, session, form))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<Vec<(String, String)>>,
) -> Result<Redirect> {
    let updates = quantity_updates(&form);
    let cart = CartSession::new(&session, state.catalog())
        .update_quantities(updates)
        .await?;

    tracing::debug!(lines = cart.line_count(), "Cart quantities updated");
    Ok(Redirect::to("/cart"))
}

/// Get the cart count.
#[instrument(skip(state, session))]
pub async fn count(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<CartCountResponse>> {
    let cart_count = CartSession::new(&session, state.catalog())
        .item_count()
        .await?;
    Ok(Json(CartCountResponse { cart_count }))
}

/// Pick `(id, quantity)` pairs out of the submitted form fields.
fn quantity_updates(form: &[(String, String)]) -> impl Iterator<Item = (&str, &str)> {
    form.iter().filter_map(|(key, value)| {
        key.strip_prefix(QUANTITY_FIELD_PREFIX)
            .map(|id| (id, value.as_str()))
    })
}
