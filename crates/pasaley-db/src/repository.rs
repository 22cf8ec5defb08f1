//! The data-access interface handed to every surface at startup.

use std::future::Future;

use sqlx::PgPool;
use uuid::Uuid;

use crate::products::{ProductRow, ProductWithStoreRow};
use crate::stores::StoreRow;
use crate::DbError;

/// Read access to stores and products.
///
/// Built once at process start and passed explicitly to whoever needs it, so
/// handlers can be exercised against an in-memory implementation.
pub trait StoreRepository: Send + Sync + 'static {
    /// Active stores, ordered by name.
    fn list_active_stores(&self) -> impl Future<Output = Result<Vec<StoreRow>, DbError>> + Send;

    /// An active store by public id.
    fn get_store(
        &self,
        public_id: Uuid,
    ) -> impl Future<Output = Result<Option<StoreRow>, DbError>> + Send;

    /// Products of one store, ordered by name.
    fn list_store_products(
        &self,
        store_id: i64,
    ) -> impl Future<Output = Result<Vec<ProductRow>, DbError>> + Send;

    /// Products of active stores with their store context.
    fn list_products_with_stores(
        &self,
    ) -> impl Future<Output = Result<Vec<ProductWithStoreRow>, DbError>> + Send;

    fn health(&self) -> impl Future<Output = Result<(), DbError>> + Send;
}

/// [`StoreRepository`] backed by a Postgres pool.
#[derive(Debug, Clone)]
pub struct PgStoreRepository {
    pool: PgPool,
}

impl PgStoreRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl StoreRepository for PgStoreRepository {
    async fn list_active_stores(&self) -> Result<Vec<StoreRow>, DbError> {
        crate::stores::list_active_stores(&self.pool).await
    }

    async fn get_store(&self, public_id: Uuid) -> Result<Option<StoreRow>, DbError> {
        crate::stores::get_store_by_public_id(&self.pool, public_id).await
    }

    async fn list_store_products(&self, store_id: i64) -> Result<Vec<ProductRow>, DbError> {
        crate::products::list_store_products(&self.pool, store_id).await
    }

    async fn list_products_with_stores(&self) -> Result<Vec<ProductWithStoreRow>, DbError> {
        crate::products::list_products_with_stores(&self.pool).await
    }

    async fn health(&self) -> Result<(), DbError> {
        crate::health_check(&self.pool).await
    }
}
