use pasaley_core::StoreConfig;
use sqlx::PgPool;

use crate::DbError;

/// Counts of rows written by [`seed_catalog`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub stores: usize,
    pub products: usize,
}

/// Upsert the sample catalog: stores keyed by name, products keyed by
/// (store, name).
///
/// All upserts run inside a single transaction; if any operation fails the
/// entire batch is rolled back. Products present in the database but absent
/// from a store's config entry are left untouched.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_catalog(pool: &PgPool, stores: &[StoreConfig]) -> Result<SeedSummary, DbError> {
    let mut tx = pool.begin().await?;
    let mut summary = SeedSummary::default();

    for store in stores {
        let store_id: i64 = sqlx::query_scalar(
            "INSERT INTO stores (name, description, lat, lng, address, is_active) \
             VALUES ($1, $2, $3::float8, $4::float8, $5, $6) \
             ON CONFLICT (name) DO UPDATE SET \
                 description = EXCLUDED.description, \
                 lat = EXCLUDED.lat, \
                 lng = EXCLUDED.lng, \
                 address = EXCLUDED.address, \
                 is_active = EXCLUDED.is_active, \
                 updated_at = NOW() \
             RETURNING id",
        )
        .bind(&store.name)
        .bind(&store.description)
        .bind(store.lat)
        .bind(store.lng)
        .bind(&store.address)
        .bind(store.is_active)
        .fetch_one(&mut *tx)
        .await?;

        for product in &store.products {
            sqlx::query(
                "INSERT INTO products (store_id, name, price_cents, unit, image_url, in_stock) \
                 VALUES ($1, $2, $3, $4, $5, $6) \
                 ON CONFLICT (store_id, name) DO UPDATE SET \
                     price_cents = EXCLUDED.price_cents, \
                     unit = EXCLUDED.unit, \
                     image_url = EXCLUDED.image_url, \
                     in_stock = EXCLUDED.in_stock, \
                     updated_at = NOW()",
            )
            .bind(store_id)
            .bind(&product.name)
            .bind(product.price_cents)
            .bind(&product.unit)
            .bind(&product.image_url)
            .bind(product.in_stock)
            .execute(&mut *tx)
            .await?;

            summary.products += 1;
        }

        tracing::debug!(store = %store.name, products = store.products.len(), "seeded store");
        summary.stores += 1;
    }

    tx.commit().await?;
    Ok(summary)
}
