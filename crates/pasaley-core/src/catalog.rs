use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::ConfigError;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConfig {
    pub name: String,
    /// Price in minor currency units (paisa).
    pub price_cents: i32,
    pub unit: Option<String>,
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub in_stock: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub name: String,
    pub description: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub address: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub products: Vec<ProductConfig>,
}

impl StoreConfig {
    /// The store's position, if its coordinates are within bounds.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::InvalidCoordinate`] for out-of-range values.
    pub fn coordinate(&self) -> Result<Coordinate, crate::CoreError> {
        Coordinate::new(self.lat, self.lng)
    }
}

#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub stores: Vec<StoreConfig>,
}

/// Load and validate the sample store catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<CatalogFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let catalog: CatalogFile =
        serde_yaml::from_str(&content).map_err(ConfigError::CatalogFileParse)?;

    validate_catalog(&catalog)?;

    Ok(catalog)
}

fn validate_catalog(catalog: &CatalogFile) -> Result<(), ConfigError> {
    let mut seen_stores = HashSet::new();

    for store in &catalog.stores {
        if store.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store name must be non-empty".to_string(),
            ));
        }

        if !seen_stores.insert(store.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate store name: '{}'",
                store.name
            )));
        }

        if let Err(e) = store.coordinate() {
            return Err(ConfigError::Validation(format!(
                "store '{}' has {e}",
                store.name
            )));
        }

        let mut seen_products = HashSet::new();
        for product in &store.products {
            if product.name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "store '{}' has a product with an empty name",
                    store.name
                )));
            }
            if product.price_cents < 0 {
                return Err(ConfigError::Validation(format!(
                    "product '{}' at '{}' has negative price {}",
                    product.name, store.name, product.price_cents
                )));
            }
            if !seen_products.insert(product.name.to_lowercase()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate product '{}' at '{}'",
                    product.name, store.name
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
