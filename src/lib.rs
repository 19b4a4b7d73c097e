//! Strata - hierarchical content repository persistence adapter
//!
//! Strata exposes a hierarchical, versioned, multi-language content-item
//! repository on top of a document-oriented backing store. It translates
//! generic repository operations (item metadata, child enumeration,
//! per-language/per-version field access, item creation and deletion, blob
//! storage) into single-document queries and writes, enforcing the
//! consistency rules the store does not natively provide.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture
//! principles:
//!
//! - **Domain Layer** (`domain`): the item/field data model, its scope
//!   resolution rules, and the repository ports
//! - **Adapters Layer** (`adapters`): the SQLite-backed item document
//!   mapper and blob storage, plus the prefetch cache decorator
//! - **Infrastructure Layer** (`infrastructure`): configuration loading
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use strata::{
//!     CachedItemRepository, ConfigLoader, ItemRepository, SqliteItemRepository,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::load()?;
//!     let pool = strata::adapters::sqlite::initialize_database(&config.database).await?;
//!
//!     let mapper = SqliteItemRepository::new(pool, &config.repository);
//!     mapper.ensure_root().await?;
//!
//!     let repo = CachedItemRepository::new(Arc::new(mapper), &config.cache);
//!     let root = repo.get_item_definition(strata::ROOT_ITEM_ID).await?;
//!     println!("{root:?}");
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use adapters::cache::CachedItemRepository;
pub use adapters::sqlite::{
    create_migrated_test_pool, initialize_database, SqliteBlobStorage, SqliteItemRepository,
};
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    CacheConfig, Config, DatabaseConfig, FieldChange, FieldEntry, FieldKey, Item, ItemChanges,
    ItemDefinition, PropertyChanges, RepositoryConfig, VersionDescriptor, VersionScope,
    CREATED_FIELD_ID, ROOT_ITEM_ID, ROOT_ITEM_NAME, ROOT_TEMPLATE_ID, TEMPLATE_TEMPLATE_ID,
};
pub use domain::ports::{BlobStorage, ItemRepository};
pub use infrastructure::config::{ConfigError, ConfigLoader};
