use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{ItemChanges, ItemDefinition, VersionDescriptor, VersionScope};

/// Repository port for item document persistence.
///
/// Absence of a backing document is not an error: operations report it
/// through `None` or `false` returns. Only infrastructure failures surface
/// as `Err`.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Identity and hierarchy metadata for one item, or `None` if no
    /// document exists.
    async fn get_item_definition(&self, id: Uuid) -> DomainResult<Option<ItemDefinition>>;

    /// The distinct `(language, version)` pairs stored for the item.
    ///
    /// `None` if no document exists; an empty list if the document exists
    /// but carries no versioned fields.
    async fn get_item_versions(&self, id: Uuid) -> DomainResult<Option<Vec<VersionDescriptor>>>;

    /// Field id to value for every stored key matching the scope, or
    /// `None` if no document exists.
    async fn get_item_fields(
        &self,
        id: Uuid,
        scope: &VersionScope,
    ) -> DomainResult<Option<HashMap<Uuid, String>>>;

    /// Identifiers of all items whose stored parent equals `parent_id`.
    ///
    /// The configured join-parent identifier and the stored "no parent"
    /// sentinel are equivalent inputs.
    async fn get_child_ids(&self, parent_id: Uuid) -> DomainResult<Vec<Uuid>>;

    /// The item's parent identifier (a top-level root reports the
    /// configured join parent), or `None` if no document exists.
    async fn get_parent_id(&self, id: Uuid) -> DomainResult<Option<Uuid>>;

    /// Insert a new item document with no field values.
    ///
    /// Declined (`false`, no write) when the identifier already exists or
    /// when a parent is given but no document exists for it.
    async fn create_item(
        &self,
        id: Uuid,
        name: &str,
        template_id: Uuid,
        parent: Option<Uuid>,
    ) -> DomainResult<bool>;

    /// Allocate a new version, copying from `base` when it names a
    /// positive existing version. Returns the new version number, or
    /// `None` if no document exists.
    async fn add_version(&self, id: Uuid, base: &VersionScope) -> DomainResult<Option<u32>>;

    /// Apply a change set and persist the document once.
    ///
    /// Returns `true` whenever the document was found, even if the change
    /// set was empty; `false` if no document exists.
    async fn save_item(&self, id: Uuid, changes: &ItemChanges) -> DomainResult<bool>;

    /// Delete the item document. Returns whether one was removed.
    async fn delete_item(&self, id: Uuid) -> DomainResult<bool>;

    /// Identifiers of all items conforming to the "Template" template.
    async fn get_template_item_ids(&self) -> DomainResult<Vec<Uuid>>;
}
