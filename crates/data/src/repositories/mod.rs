//! Repository implementations for database persistence.

mod pool_repository;

pub use pool_repository::{
    CreatorPools, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PoolPage, PoolQuery, PoolStoreRepository,
    StatusFilter, StoreSortField, StoredPool, SupplyInfo,
};

use sqlx::PgPool;
use std::sync::Arc;

/// Database connection wrapper for repositories.
#[derive(Clone)]
pub struct Database {
    pool: Arc<PgPool>,
}

impl Database {
    /// Creates a new Database wrapper from a connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Creates a new database connection from a connection string.
    ///
    /// # Errors
    /// Returns an error if the connection fails.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates a PoolStoreRepository instance.
    #[must_use]
    pub fn pools(&self) -> PoolStoreRepository {
        PoolStoreRepository::new(self.pool.clone())
    }

    /// Creates the schema if it does not exist.
    ///
    /// # Errors
    /// Returns an error if the schema statements fail.
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql(include_str!("../../migrations/001_initial_schema.sql"))
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
