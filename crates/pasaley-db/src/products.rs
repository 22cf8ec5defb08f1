//! Database operations for the `products` table.

use chrono::{DateTime, Utc};
use pasaley_core::{Browsable, Coordinate, Located};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::stores::decode_coordinate;
use crate::DbError;

/// A row from the `products` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub public_id: Uuid,
    pub store_id: i64,
    pub name: String,
    pub price_cents: i32,
    pub unit: Option<String>,
    pub image_url: Option<String>,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product joined with the store that sells it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductWithStoreRow {
    pub product: ProductRow,
    pub store_public_id: Uuid,
    pub store_name: String,
    pub store_address: Option<String>,
    pub store_coordinate: Coordinate,
}

impl<'r> sqlx::FromRow<'r, PgRow> for ProductWithStoreRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            product: <ProductRow as sqlx::FromRow<'r, PgRow>>::from_row(row)?,
            store_public_id: row.try_get("store_public_id")?,
            store_name: row.try_get("store_name")?,
            store_address: row.try_get("store_address")?,
            store_coordinate: decode_coordinate(row, "store_lat", "store_lng")?,
        })
    }
}

impl Located for ProductWithStoreRow {
    fn coordinate(&self) -> Coordinate {
        self.store_coordinate
    }
}

impl Browsable for ProductWithStoreRow {
    fn product_name(&self) -> &str {
        &self.product.name
    }

    fn store_name(&self) -> &str {
        &self.store_name
    }

    fn in_stock(&self) -> bool {
        self.product.in_stock
    }

    fn price_cents(&self) -> i32 {
        self.product.price_cents
    }
}

/// Returns the products of one store, ordered by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_store_products(pool: &PgPool, store_id: i64) -> Result<Vec<ProductRow>, DbError> {
    let rows = sqlx::query_as::<_, ProductRow>(
        "SELECT id, public_id, store_id, name, price_cents, unit, image_url, in_stock, \
                created_at, updated_at \
         FROM products \
         WHERE store_id = $1 \
         ORDER BY name",
    )
    .bind(store_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns every product of an active store together with its store context.
///
/// Ordered by product name so the explore listing has a deterministic base
/// order before distance or price sorting.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_products_with_stores(pool: &PgPool) -> Result<Vec<ProductWithStoreRow>, DbError> {
    let rows = sqlx::query_as::<_, ProductWithStoreRow>(
        "SELECT p.id, p.public_id, p.store_id, p.name, p.price_cents, p.unit, p.image_url, \
                p.in_stock, p.created_at, p.updated_at, \
                s.public_id AS store_public_id, s.name AS store_name, \
                s.address AS store_address, \
                s.lat::float8 AS store_lat, s.lng::float8 AS store_lng \
         FROM products p \
         JOIN stores s ON s.id = p.store_id \
         WHERE s.is_active = true \
         ORDER BY p.name, p.id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
