use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::geo::Coordinate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub catalog_path: PathBuf,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Reference point substituted when no location is supplied or acquired.
    pub default_reference: Coordinate,
    pub default_radius_km: f64,
    /// IP geolocation endpoint; `None` means no location capability.
    pub locate_url: Option<String>,
    pub locate_timeout_ms: u64,
    pub locate_max_age_ms: u64,
    pub locate_fallback_timeout_ms: u64,
    pub locate_fallback_max_age_ms: u64,
}

impl AppConfig {
    #[must_use]
    pub fn locate_timeout(&self) -> Duration {
        Duration::from_millis(self.locate_timeout_ms)
    }

    #[must_use]
    pub fn locate_max_age(&self) -> Duration {
        Duration::from_millis(self.locate_max_age_ms)
    }

    #[must_use]
    pub fn locate_fallback_timeout(&self) -> Duration {
        Duration::from_millis(self.locate_fallback_timeout_ms)
    }

    #[must_use]
    pub fn locate_fallback_max_age(&self) -> Duration {
        Duration::from_millis(self.locate_fallback_max_age_ms)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("catalog_path", &self.catalog_path)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("default_reference", &self.default_reference)
            .field("default_radius_km", &self.default_radius_km)
            .field("locate_url", &self.locate_url)
            .field("locate_timeout_ms", &self.locate_timeout_ms)
            .field("locate_max_age_ms", &self.locate_max_age_ms)
            .field(
                "locate_fallback_timeout_ms",
                &self.locate_fallback_timeout_ms,
            )
            .field(
                "locate_fallback_max_age_ms",
                &self.locate_fallback_max_age_ms,
            )
            .finish()
    }
}
