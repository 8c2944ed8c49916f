//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use sweet_bites_core::{Catalog, Product};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::services::CartSession;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub price: String,
    pub image: String,
}

impl ProductView {
    fn new(product: &Product, catalog: &Catalog) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            price: catalog.price(product.price).display(),
            image: product.image.clone(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub products: Vec<ProductView>,
    pub cart_count: u32,
}

/// Display the catalog with the current cart count.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<HomeTemplate> {
    let catalog = state.catalog();
    let cart_count = CartSession::new(&session, catalog).item_count().await?;

    let products = catalog
        .products()
        .iter()
        .map(|product| ProductView::new(product, catalog))
        .collect();

    Ok(HomeTemplate {
        products,
        cart_count,
    })
}
