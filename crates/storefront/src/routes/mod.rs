//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Catalog with cart count
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (session database if configured)
//!
//! # Cart
//! GET  /cart                   - Cart page (lines + total)
//! POST /cart/add/{id}          - Add one unit (JSON: success + cart_count, 404 if unknown)
//! POST /cart/update            - Bulk quantity form (qty_<id>=<n>), redirects to /cart
//! GET  /cart/count             - Cart count (JSON)
//!
//! # Checkout
//! GET  /checkout               - Checkout form with order summary
//! POST /checkout               - Place order: confirmation page, or form with error (422)
//!
//! # Assets
//! GET  /static/*               - CSS, JS, images
//! ```

pub mod cart;
pub mod checkout;
pub mod health;
pub mod home;

use axum::{
    Router,
    extract::Request,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add/{id}", post(cart::add))
        .route("/update", post(cart::update))
        .route("/count", get(cart::count))
}

/// Create all page routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/", get(home::home))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout form and submission
        .route("/checkout", get(checkout::show).post(checkout::submit))
        // Health checks
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}

/// Build the complete application: routes, static assets and middleware.
///
/// Sentry layers are added by the binary on top of this.
pub fn app<S>(state: AppState, session_layer: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    let static_dir = state.config().static_dir.clone();

    Router::new()
        .merge(routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
}
