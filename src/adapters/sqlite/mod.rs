//! SQLite adapters: the item document mapper and blob storage.

pub mod blob_storage;
pub mod connection;
pub mod item_repository;
pub mod migrations;

pub use blob_storage::SqliteBlobStorage;
pub use connection::{create_pool, create_test_pool, verify_connection, ConnectionError};
pub use item_repository::SqliteItemRepository;
pub use migrations::{all_embedded_migrations, Migration, MigrationError, Migrator};

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::DatabaseConfig;

/// Parse a UUID stored as text.
pub(crate) fn parse_uuid(s: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(s).map_err(|e| DomainError::Serialization(e.to_string()))
}

/// Parse a UUID stored as text, mapping the nil sentinel to `None`.
///
/// The sentinel exists only in storage; domain types carry `Option`.
pub(crate) fn parse_optional_uuid(s: &str) -> DomainResult<Option<Uuid>> {
    let id = parse_uuid(s)?;
    Ok(if id.is_nil() { None } else { Some(id) })
}

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),
    #[error("Query error: {0}")]
    Query(#[from] sqlx::Error),
}

/// Create a pool against the configured database with all migrations
/// applied.
pub async fn initialize_database(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
    let pool = create_pool(config).await?;
    let migrator = Migrator::new(pool.clone());
    migrator
        .run_embedded_migrations(all_embedded_migrations())
        .await?;
    Ok(pool)
}

/// Create an in-memory test pool with all migrations applied.
pub async fn create_migrated_test_pool() -> Result<SqlitePool, DatabaseError> {
    let pool = create_test_pool().await?;
    let migrator = Migrator::new(pool.clone());
    migrator
        .run_embedded_migrations(all_embedded_migrations())
        .await?;
    Ok(pool)
}
