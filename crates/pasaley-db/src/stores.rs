//! Database operations for the `stores` table.

use chrono::{DateTime, Utc};
use pasaley_core::{Coordinate, Located};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `stores` table.
///
/// `lat`/`lng` are stored as `NUMERIC` and read back as `float8`; decoding
/// fails if they fall outside valid bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreRow {
    pub id: i64,
    pub public_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub coordinate: Coordinate,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for StoreRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            public_id: row.try_get("public_id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            coordinate: decode_coordinate(row, "lat", "lng")?,
            address: row.try_get("address")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl Located for StoreRow {
    fn coordinate(&self) -> Coordinate {
        self.coordinate
    }
}

pub(crate) fn decode_coordinate(
    row: &PgRow,
    lat_column: &str,
    lng_column: &str,
) -> Result<Coordinate, sqlx::Error> {
    let lat: f64 = row.try_get(lat_column)?;
    let lng: f64 = row.try_get(lng_column)?;
    Coordinate::new(lat, lng).map_err(|e| sqlx::Error::ColumnDecode {
        index: lat_column.to_owned(),
        source: Box::new(e),
    })
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

const STORE_COLUMNS: &str = "id, public_id, name, description, lat::float8 AS lat, \
     lng::float8 AS lng, address, is_active, created_at, updated_at";

/// Returns all active stores, ordered by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_stores(pool: &PgPool) -> Result<Vec<StoreRow>, DbError> {
    let rows = sqlx::query_as::<_, StoreRow>(&format!(
        "SELECT {STORE_COLUMNS} \
         FROM stores \
         WHERE is_active = true \
         ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single active store by public id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_store_by_public_id(
    pool: &PgPool,
    public_id: Uuid,
) -> Result<Option<StoreRow>, DbError> {
    let row = sqlx::query_as::<_, StoreRow>(&format!(
        "SELECT {STORE_COLUMNS} \
         FROM stores \
         WHERE public_id = $1 AND is_active = true"
    ))
    .bind(public_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
