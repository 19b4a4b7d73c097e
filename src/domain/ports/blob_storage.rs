use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;

/// Port for binary large-object storage, addressed by 128-bit blob
/// identifier.
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Store a blob, replacing any previous content under the identifier.
    async fn put_blob(&self, blob_id: Uuid, data: &[u8]) -> DomainResult<()>;

    /// Retrieve a blob, or `None` if nothing is stored under the
    /// identifier.
    async fn get_blob(&self, blob_id: Uuid) -> DomainResult<Option<Vec<u8>>>;

    /// Whether any content is stored under the identifier.
    async fn blob_exists(&self, blob_id: Uuid) -> DomainResult<bool>;

    /// Remove a blob. Returns whether anything was removed.
    async fn delete_blob(&self, blob_id: Uuid) -> DomainResult<bool>;
}
