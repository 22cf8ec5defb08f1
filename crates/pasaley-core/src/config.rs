use crate::app_config::{AppConfig, Environment};
use crate::geo::Coordinate;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let database_url = require("DATABASE_URL")?;

    let env = parse_environment(&or_default("PASALEY_ENV", "development"))?;

    let bind_addr: SocketAddr = parse_as(
        "PASALEY_BIND_ADDR",
        &or_default("PASALEY_BIND_ADDR", "0.0.0.0:3000"),
    )?;
    let log_level = or_default("PASALEY_LOG_LEVEL", "info");
    let catalog_path = PathBuf::from(or_default(
        "PASALEY_CATALOG_PATH",
        "./config/stores.yaml",
    ));

    let db_max_connections: u32 = parse_as(
        "PASALEY_DB_MAX_CONNECTIONS",
        &or_default("PASALEY_DB_MAX_CONNECTIONS", "10"),
    )?;
    let db_min_connections: u32 = parse_as(
        "PASALEY_DB_MIN_CONNECTIONS",
        &or_default("PASALEY_DB_MIN_CONNECTIONS", "1"),
    )?;
    let db_acquire_timeout_secs: u64 = parse_as(
        "PASALEY_DB_ACQUIRE_TIMEOUT_SECS",
        &or_default("PASALEY_DB_ACQUIRE_TIMEOUT_SECS", "10"),
    )?;

    let default_lat: f64 = parse_as(
        "PASALEY_DEFAULT_LAT",
        &or_default("PASALEY_DEFAULT_LAT", "27.7172"),
    )?;
    let default_lng: f64 = parse_as(
        "PASALEY_DEFAULT_LNG",
        &or_default("PASALEY_DEFAULT_LNG", "85.324"),
    )?;
    let default_reference =
        Coordinate::new(default_lat, default_lng).map_err(|e| ConfigError::InvalidEnvVar {
            var: "PASALEY_DEFAULT_LAT/PASALEY_DEFAULT_LNG".to_string(),
            reason: e.to_string(),
        })?;

    let default_radius_km: f64 = parse_as(
        "PASALEY_DEFAULT_RADIUS_KM",
        &or_default("PASALEY_DEFAULT_RADIUS_KM", "10"),
    )?;
    if !default_radius_km.is_finite() || default_radius_km < 0.0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PASALEY_DEFAULT_RADIUS_KM".to_string(),
            reason: format!("radius must be a non-negative number, got {default_radius_km}"),
        });
    }

    let locate_url = lookup("PASALEY_LOCATE_URL")
        .ok()
        .filter(|s| !s.trim().is_empty());
    let locate_timeout_ms: u64 = parse_as(
        "PASALEY_LOCATE_TIMEOUT_MS",
        &or_default("PASALEY_LOCATE_TIMEOUT_MS", "15000"),
    )?;
    let locate_max_age_ms: u64 = parse_as(
        "PASALEY_LOCATE_MAX_AGE_MS",
        &or_default("PASALEY_LOCATE_MAX_AGE_MS", "300000"),
    )?;
    let locate_fallback_timeout_ms: u64 = parse_as(
        "PASALEY_LOCATE_FALLBACK_TIMEOUT_MS",
        &or_default("PASALEY_LOCATE_FALLBACK_TIMEOUT_MS", "10000"),
    )?;
    let locate_fallback_max_age_ms: u64 = parse_as(
        "PASALEY_LOCATE_FALLBACK_MAX_AGE_MS",
        &or_default("PASALEY_LOCATE_FALLBACK_MAX_AGE_MS", "600000"),
    )?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        catalog_path,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        default_reference,
        default_radius_km,
        locate_url,
        locate_timeout_ms,
        locate_max_age_ms,
        locate_fallback_timeout_ms,
        locate_fallback_max_age_ms,
    })
}

fn parse_as<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PASALEY_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
