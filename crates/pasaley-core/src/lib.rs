pub mod app_config;
pub mod browse;
pub mod catalog;
pub mod config;
pub mod geo;
pub mod rank;

pub use app_config::{AppConfig, Environment};
pub use browse::{apply_product_query, format_price, Browsable, ProductQuery, ProductSort};
pub use catalog::{load_catalog, CatalogFile, ProductConfig, StoreConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{
    format_km, haversine_km, round_km, Coordinate, ReferencePoint, ReferenceSource,
    DEFAULT_REFERENCE, EARTH_RADIUS_KM,
};
pub use rank::{annotate, rank, rerank, Located, Ranked};

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid coordinate: lat {lat}, lng {lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[source] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}
