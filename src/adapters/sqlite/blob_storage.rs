//! SQLite implementation of chunked blob storage.
//!
//! Blobs are addressed by a 128-bit identifier and stored as ordered
//! fixed-size chunk rows; retrieval concatenates the chunks in index
//! order.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::ports::BlobStorage;

/// Chunk size for stored blobs.
const BLOB_CHUNK_SIZE: usize = 256 * 1024;

#[derive(Clone)]
pub struct SqliteBlobStorage {
    pool: SqlitePool,
}

impl SqliteBlobStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlobStorage for SqliteBlobStorage {
    async fn put_blob(&self, blob_id: Uuid, data: &[u8]) -> DomainResult<()> {
        sqlx::query("DELETE FROM blob_chunks WHERE blob_id = ?")
            .bind(blob_id.to_string())
            .execute(&self.pool)
            .await?;

        // An empty blob still gets one row so it remains addressable.
        let chunks: Vec<&[u8]> = if data.is_empty() {
            vec![&[]]
        } else {
            data.chunks(BLOB_CHUNK_SIZE).collect()
        };
        for (index, chunk) in chunks.into_iter().enumerate() {
            sqlx::query("INSERT INTO blob_chunks (blob_id, chunk_index, data) VALUES (?, ?, ?)")
                .bind(blob_id.to_string())
                .bind(i64::try_from(index).unwrap_or(i64::MAX))
                .bind(chunk)
                .execute(&self.pool)
                .await?;
        }
        tracing::debug!(%blob_id, bytes = data.len(), "stored blob");
        Ok(())
    }

    async fn get_blob(&self, blob_id: Uuid) -> DomainResult<Option<Vec<u8>>> {
        let chunks: Vec<(Vec<u8>,)> = sqlx::query_as(
            "SELECT data FROM blob_chunks WHERE blob_id = ? ORDER BY chunk_index",
        )
        .bind(blob_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        if chunks.is_empty() {
            return Ok(None);
        }
        let mut data = Vec::new();
        for (chunk,) in chunks {
            data.extend_from_slice(&chunk);
        }
        Ok(Some(data))
    }

    async fn blob_exists(&self, blob_id: Uuid) -> DomainResult<bool> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM blob_chunks WHERE blob_id = ? LIMIT 1")
                .bind(blob_id.to_string())
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.is_some())
    }

    async fn delete_blob(&self, blob_id: Uuid) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM blob_chunks WHERE blob_id = ?")
            .bind(blob_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
