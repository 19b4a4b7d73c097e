//! SQLite implementation of the item document mapper.
//!
//! Each item is persisted as one row-document: identity and hierarchy
//! columns plus the whole field-value collection as a single JSON column.
//! Every write replaces the row with `INSERT .. ON CONFLICT DO UPDATE`,
//! relying on the store's per-row atomicity; no multi-row transactions.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    FieldEntry, Item, ItemChanges, ItemDefinition, RepositoryConfig, VersionDescriptor,
    VersionScope, ROOT_ITEM_ID, ROOT_ITEM_NAME, ROOT_TEMPLATE_ID, TEMPLATE_TEMPLATE_ID,
};
use crate::domain::ports::ItemRepository;

use super::{parse_optional_uuid, parse_uuid};

/// The item document mapper: single source of truth for all reads and
/// writes against item documents.
///
/// The "no parent" storage sentinel and the configured join-parent
/// identifier are translated at this boundary in both directions; callers
/// only ever see the join parent.
#[derive(Clone)]
pub struct SqliteItemRepository {
    pool: SqlitePool,
    join_parent_id: Uuid,
    default_language: String,
}

/// Raw row shape; UUID columns are text, the field set is a JSON array.
#[derive(sqlx::FromRow)]
struct ItemRow {
    id: String,
    parent_id: String,
    name: String,
    template_id: String,
    branch_id: String,
    field_values: String,
}

impl TryFrom<ItemRow> for Item {
    type Error = DomainError;

    fn try_from(row: ItemRow) -> DomainResult<Item> {
        let fields: Vec<FieldEntry> = serde_json::from_str(&row.field_values)?;
        Ok(Item {
            id: parse_uuid(&row.id)?,
            parent_id: parse_optional_uuid(&row.parent_id)?,
            name: row.name,
            template_id: parse_uuid(&row.template_id)?,
            branch_id: parse_optional_uuid(&row.branch_id)?,
            fields,
        })
    }
}

impl SqliteItemRepository {
    pub fn new(pool: SqlitePool, config: &RepositoryConfig) -> Self {
        Self {
            pool,
            join_parent_id: config.join_parent_id,
            default_language: config.default_language.clone(),
        }
    }

    /// Point lookup by primary key.
    async fn fetch_item(&self, id: Uuid) -> DomainResult<Option<Item>> {
        let row: Option<ItemRow> = sqlx::query_as(
            "SELECT id, parent_id, name, template_id, branch_id, field_values
             FROM items WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Item::try_from).transpose()
    }

    /// Replace the whole stored document for `item.id` in one row write.
    async fn upsert_item(&self, item: &Item) -> DomainResult<()> {
        let field_values = serde_json::to_string(&item.fields)?;
        sqlx::query(
            "INSERT INTO items (id, parent_id, name, template_id, branch_id, field_values)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 parent_id = excluded.parent_id,
                 name = excluded.name,
                 template_id = excluded.template_id,
                 branch_id = excluded.branch_id,
                 field_values = excluded.field_values",
        )
        .bind(item.id.to_string())
        .bind(item.parent_id.unwrap_or_else(Uuid::nil).to_string())
        .bind(&item.name)
        .bind(item.template_id.to_string())
        .bind(item.branch_id.unwrap_or_else(Uuid::nil).to_string())
        .bind(&field_values)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert the well-known root document if the collection is empty, so
    /// the repository never observes a rootless store.
    ///
    /// The root is created with a blank version in the configured default
    /// language to make it discoverable through version enumeration.
    pub async fn ensure_root(&self) -> DomainResult<()> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;
        if count > 0 {
            return Ok(());
        }

        let mut root = Item::new(ROOT_ITEM_ID, ROOT_ITEM_NAME, ROOT_TEMPLATE_ID, None);
        root.add_version(&VersionScope::new(self.default_language.clone(), 0));
        self.upsert_item(&root).await?;
        tracing::info!(id = %ROOT_ITEM_ID, "bootstrapped repository root");
        Ok(())
    }
}

#[async_trait]
impl ItemRepository for SqliteItemRepository {
    async fn get_item_definition(&self, id: Uuid) -> DomainResult<Option<ItemDefinition>> {
        Ok(self
            .fetch_item(id)
            .await?
            .map(|item| item.definition(self.join_parent_id)))
    }

    async fn get_item_versions(&self, id: Uuid) -> DomainResult<Option<Vec<VersionDescriptor>>> {
        Ok(self.fetch_item(id).await?.map(|item| item.versions()))
    }

    async fn get_item_fields(
        &self,
        id: Uuid,
        scope: &VersionScope,
    ) -> DomainResult<Option<HashMap<Uuid, String>>> {
        Ok(self
            .fetch_item(id)
            .await?
            .map(|item| item.resolve_fields(scope)))
    }

    async fn get_child_ids(&self, parent_id: Uuid) -> DomainResult<Vec<Uuid>> {
        // The repository's logical root maps back to the stored sentinel.
        let stored_parent = if parent_id == self.join_parent_id {
            Uuid::nil()
        } else {
            parent_id
        };
        let rows: Vec<(String,)> = sqlx::query_as("SELECT id FROM items WHERE parent_id = ?")
            .bind(stored_parent.to_string())
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(|(id,)| parse_uuid(&id)).collect()
    }

    async fn get_parent_id(&self, id: Uuid) -> DomainResult<Option<Uuid>> {
        Ok(self
            .fetch_item(id)
            .await?
            .map(|item| item.parent_id.unwrap_or(self.join_parent_id)))
    }

    async fn create_item(
        &self,
        id: Uuid,
        name: &str,
        template_id: Uuid,
        parent: Option<Uuid>,
    ) -> DomainResult<bool> {
        if self.fetch_item(id).await?.is_some() {
            tracing::warn!(%id, "create declined: item already exists");
            return Ok(false);
        }
        if let Some(parent_id) = parent {
            if self.fetch_item(parent_id).await?.is_none() {
                tracing::warn!(%id, %parent_id, "create declined: parent does not exist");
                return Ok(false);
            }
        }

        self.upsert_item(&Item::new(id, name, template_id, parent))
            .await?;
        tracing::debug!(%id, name, "created item");
        Ok(true)
    }

    async fn add_version(&self, id: Uuid, base: &VersionScope) -> DomainResult<Option<u32>> {
        let Some(mut item) = self.fetch_item(id).await? else {
            return Ok(None);
        };
        let new_version = item.add_version(base);
        self.upsert_item(&item).await?;
        tracing::debug!(%id, language = %base.language, new_version, "added version");
        Ok(Some(new_version))
    }

    async fn save_item(&self, id: Uuid, changes: &ItemChanges) -> DomainResult<bool> {
        let Some(mut item) = self.fetch_item(id).await? else {
            return Ok(false);
        };
        if changes.has_property_changes() || changes.has_field_changes() {
            item.apply_changes(changes);
            self.upsert_item(&item).await?;
            tracing::debug!(%id, field_changes = changes.fields.len(), "saved item");
        }
        Ok(true)
    }

    async fn delete_item(&self, id: Uuid) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        let removed = result.rows_affected() > 0;
        if removed {
            tracing::debug!(%id, "deleted item");
        }
        Ok(removed)
    }

    async fn get_template_item_ids(&self) -> DomainResult<Vec<Uuid>> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT id FROM items WHERE template_id = ?")
            .bind(TEMPLATE_TEMPLATE_ID.to_string())
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(|(id,)| parse_uuid(&id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;

    async fn setup() -> SqliteItemRepository {
        let pool = create_migrated_test_pool()
            .await
            .expect("failed to create test pool");
        SqliteItemRepository::new(pool, &RepositoryConfig::default())
    }

    #[tokio::test]
    async fn test_ensure_root_is_idempotent() {
        let repo = setup().await;
        repo.ensure_root().await.expect("failed to bootstrap root");
        repo.ensure_root().await.expect("second bootstrap failed");

        let def = repo
            .get_item_definition(ROOT_ITEM_ID)
            .await
            .expect("failed to get root")
            .expect("root not found");
        assert_eq!(def.name, ROOT_ITEM_NAME);
        assert_eq!(def.template_id, ROOT_TEMPLATE_ID);

        let versions = repo
            .get_item_versions(ROOT_ITEM_ID)
            .await
            .expect("failed to get versions")
            .expect("root not found");
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].version, 1);
    }

    #[tokio::test]
    async fn test_round_trip_preserves_field_scopes() {
        let repo = setup().await;
        let id = Uuid::new_v4();
        let field = Uuid::new_v4();

        assert!(repo
            .create_item(id, "page", TEMPLATE_TEMPLATE_ID, None)
            .await
            .expect("create failed"));
        assert!(repo
            .save_item(
                id,
                &ItemChanges::default().with_field(
                    crate::domain::models::FieldChange::set(field, "en", 1, "hello"),
                ),
            )
            .await
            .expect("save failed"));

        let fields = repo
            .get_item_fields(id, &VersionScope::new("en", 1))
            .await
            .expect("fields query failed")
            .expect("item not found");
        assert_eq!(fields.get(&field).map(String::as_str), Some("hello"));

        // The same field is invisible under another language.
        let fields = repo
            .get_item_fields(id, &VersionScope::new("de", 1))
            .await
            .expect("fields query failed")
            .expect("item not found");
        assert!(fields.is_empty());
    }
}
