//! Catalog inspection commands.
//!
//! # Usage
//!
//! ```bash
//! # Validate a catalog file before pointing STOREFRONT_CATALOG_PATH at it
//! sb-cli catalog check ./catalog.json
//!
//! # Print the built-in cakes as a starting point for a custom catalog
//! sb-cli catalog show > catalog.json
//! ```

use std::path::Path;

use sweet_bites_core::{Catalog, CatalogError};
use thiserror::Error;
use tracing::info;

/// Errors from catalog commands.
#[derive(Debug, Error)]
pub enum CatalogCommandError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("{path} is not a valid catalog: {source}")]
    Invalid { path: String, source: CatalogError },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Validate a catalog file and print its normalized form.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails validation.
pub fn check(path: &Path) -> Result<(), CatalogCommandError> {
    let catalog = load(path)?;
    info!(
        path = %path.display(),
        products = catalog.products().len(),
        "Catalog is valid"
    );
    print_catalog(&catalog)
}

/// Print the built-in catalog.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn show() -> Result<(), CatalogCommandError> {
    print_catalog(&Catalog::default_bakery())
}

/// Read and validate a catalog file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails validation.
pub fn load(path: &Path) -> Result<Catalog, CatalogCommandError> {
    let json = std::fs::read_to_string(path).map_err(|source| CatalogCommandError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Catalog::from_json(&json).map_err(|source| CatalogCommandError::Invalid {
        path: path.display().to_string(),
        source,
    })
}

fn print_catalog(catalog: &Catalog) -> Result<(), CatalogCommandError> {
    let json = catalog.to_json_pretty()?;
    #[allow(clippy::print_stdout)]
    {
        println!("{json}");
    }
    Ok(())
}
