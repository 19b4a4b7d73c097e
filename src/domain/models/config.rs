//! Adapter configuration model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::item::ROOT_ITEM_ID;

/// Top-level configuration for the adapter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub repository: RepositoryConfig,
    pub cache: CacheConfig,
}

/// Backing store connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database URL (e.g. "sqlite:.strata/strata.db" or
    /// "sqlite::memory:").
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:.strata/strata.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Repository semantics settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Identifier reported as the parent of store-level roots, mapping the
    /// store's flat "no parent" representation onto the single root the
    /// host repository expects. With the default value the bootstrap root
    /// reports itself as its own parent.
    pub join_parent_id: Uuid,
    /// Language used when registering the bootstrap root's blank version.
    pub default_language: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            join_parent_id: ROOT_ITEM_ID,
            default_language: "en".to_string(),
        }
    }
}

/// Prefetch cache sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum total weight of cached definitions, in bytes.
    pub max_weight: u64,
    /// Optional time-to-live for cached definitions, in seconds. The cache
    /// is never invalidated by writes, so the TTL bounds how long a stale
    /// definition can survive a concurrent mutation.
    pub ttl_secs: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_weight: 4 * 1024 * 1024,
            ttl_secs: None,
        }
    }
}
