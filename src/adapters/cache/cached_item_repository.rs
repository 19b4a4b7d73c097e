//! Cached wrapper for ItemRepository using a weighted moka cache.
//!
//! Caches `get_item_definition` lookups, which the host reads far more
//! often than field content. Write operations do NOT invalidate the cache:
//! a cached definition can disagree with storage after a concurrent
//! mutation until it is evicted or its TTL expires. That staleness window
//! is accepted and bounded by the configured capacity and TTL.

use std::collections::HashMap;
use std::mem;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    CacheConfig, ItemChanges, ItemDefinition, VersionDescriptor, VersionScope,
};
use crate::domain::ports::ItemRepository;

/// Storage weight of one cached definition, proportional to its size.
fn entry_weight(definition: &ItemDefinition) -> u32 {
    let bytes = mem::size_of::<ItemDefinition>() + definition.name.len();
    u32::try_from(bytes).unwrap_or(u32::MAX)
}

/// Prefetch cache for item identity metadata.
///
/// The cache instance is constructed exactly once, here; concurrent gets
/// and inserts rely on the cache's own synchronization and need no
/// additional locking. Eviction is delegated to the cache (weighted
/// capacity, least-recently-used).
pub struct CachedItemRepository<R: ItemRepository> {
    inner: Arc<R>,
    definitions: Cache<Uuid, Arc<ItemDefinition>>,
}

impl<R: ItemRepository> CachedItemRepository<R> {
    pub fn new(inner: Arc<R>, config: &CacheConfig) -> Self {
        let mut builder = Cache::builder()
            .max_capacity(config.max_weight)
            .weigher(|_id: &Uuid, definition: &Arc<ItemDefinition>| entry_weight(definition));
        if let Some(ttl_secs) = config.ttl_secs {
            builder = builder.time_to_live(Duration::from_secs(ttl_secs));
        }

        Self {
            inner,
            definitions: builder.build(),
        }
    }

    /// Number of definitions currently cached.
    ///
    /// Flushes the cache's pending maintenance first so the count is
    /// accurate rather than eventually consistent.
    pub async fn cached_definitions(&self) -> u64 {
        self.definitions.run_pending_tasks().await;
        self.definitions.entry_count()
    }
}

#[async_trait]
impl<R: ItemRepository + 'static> ItemRepository for CachedItemRepository<R> {
    async fn get_item_definition(&self, id: Uuid) -> DomainResult<Option<ItemDefinition>> {
        if let Some(cached) = self.definitions.get(&id).await {
            if cached.id.is_nil() {
                // A stale negative marker is never a positive hit; drop it
                // and report absence without re-querying.
                tracing::warn!(%id, "discarding cached definition with empty identity");
                self.definitions.invalidate(&id).await;
                return Ok(None);
            }
            return Ok(Some((*cached).clone()));
        }

        tracing::trace!(%id, "definition cache miss");
        match self.inner.get_item_definition(id).await? {
            Some(definition) if !definition.id.is_nil() => {
                self.definitions
                    .insert(id, Arc::new(definition.clone()))
                    .await;
                Ok(Some(definition))
            }
            // Absence is not cached; an empty identity counts as absence.
            _ => Ok(None),
        }
    }

    async fn get_item_versions(&self, id: Uuid) -> DomainResult<Option<Vec<VersionDescriptor>>> {
        self.inner.get_item_versions(id).await
    }

    async fn get_item_fields(
        &self,
        id: Uuid,
        scope: &VersionScope,
    ) -> DomainResult<Option<HashMap<Uuid, String>>> {
        self.inner.get_item_fields(id, scope).await
    }

    async fn get_child_ids(&self, parent_id: Uuid) -> DomainResult<Vec<Uuid>> {
        self.inner.get_child_ids(parent_id).await
    }

    async fn get_parent_id(&self, id: Uuid) -> DomainResult<Option<Uuid>> {
        self.inner.get_parent_id(id).await
    }

    async fn create_item(
        &self,
        id: Uuid,
        name: &str,
        template_id: Uuid,
        parent: Option<Uuid>,
    ) -> DomainResult<bool> {
        self.inner.create_item(id, name, template_id, parent).await
    }

    async fn add_version(&self, id: Uuid, base: &VersionScope) -> DomainResult<Option<u32>> {
        self.inner.add_version(id, base).await
    }

    async fn save_item(&self, id: Uuid, changes: &ItemChanges) -> DomainResult<bool> {
        self.inner.save_item(id, changes).await
    }

    async fn delete_item(&self, id: Uuid) -> DomainResult<bool> {
        self.inner.delete_item(id).await
    }

    async fn get_template_item_ids(&self) -> DomainResult<Vec<Uuid>> {
        self.inner.get_template_item_ids().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_weight_grows_with_name() {
        let short = ItemDefinition {
            id: Uuid::new_v4(),
            name: "a".to_string(),
            template_id: Uuid::new_v4(),
            branch_id: None,
            parent_id: Uuid::new_v4(),
        };
        let mut long = short.clone();
        long.name = "a much longer item name".to_string();
        assert!(entry_weight(&long) > entry_weight(&short));
    }
}
