//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;
use sweet_bites_core::{Catalog, CatalogError};

use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The catalog inside is built
/// once at startup and only ever read afterwards.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    pool: Option<PgPool>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `catalog` - Product catalog served for the life of the process
    /// * `pool` - `PostgreSQL` pool when sessions are database-backed
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog, pool: Option<PgPool>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                pool,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the session database pool, if configured.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }
}

/// Load the catalog named by the configuration, or the built-in cakes.
///
/// # Errors
///
/// Returns an error if the catalog file cannot be read or fails validation.
pub fn load_catalog(config: &StorefrontConfig) -> Result<Catalog, CatalogLoadError> {
    let Some(path) = config.catalog_path.as_ref() else {
        return Ok(Catalog::default_bakery());
    };

    let json = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Catalog::from_json(&json)?)
}

/// Error loading the catalog at startup.
#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Invalid(#[from] CatalogError),
}
