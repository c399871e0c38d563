//! The `VectorStore` capability: collections, transactional writes, and
//! cosine-similarity search.

use crate::chunk::{Chunk, EmbeddingModel};
use crate::error::VectorStoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A handle to an open write transaction. Opaque to callers; concrete
/// implementations may downcast or wrap a real database transaction
/// handle behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxnId(pub u64);

/// One row returned from [`VectorStore::search_content`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRow {
    /// The stored chunk's text.
    pub content: String,
    /// The batch id the chunk belongs to.
    pub content_id: String,
    /// The chunk's position within its batch.
    pub chunk_id: usize,
    /// Cosine distance from the query vector (lower is closer).
    pub distance: f32,
    /// Optional display name.
    pub name: Option<String>,
    /// Optional free-form metadata.
    pub meta: Option<serde_json::Value>,
}

/// The persistence and retrieval capability consumed by the Memory
/// Controller. Object-safe `#[async_trait]` for the same reason as
/// [`crate::llm::LlmClient`] — it must be shared as `Arc<dyn VectorStore>`.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// List known collection (partition) names.
    async fn list_collections(&self) -> Result<Vec<String>, VectorStoreError>;

    /// Create a collection under the given embedding model.
    async fn create_collection(&self, name: &str, model: EmbeddingModel) -> Result<(), VectorStoreError>;

    /// Delete a collection and all of its rows.
    async fn delete_collection(&self, name: &str) -> Result<(), VectorStoreError>;

    /// Open a write transaction.
    async fn create_transaction(&self) -> Result<TxnId, VectorStoreError>;

    /// Commit a previously opened transaction.
    async fn commit_transaction(&self, txn: TxnId) -> Result<(), VectorStoreError>;

    /// Write one chunk's row within an open transaction. The chunk MUST
    /// carry an embedding; implementations return
    /// [`VectorStoreError::DimensionMismatch`] if it is absent or the wrong
    /// length for the collection's model.
    async fn write_content(
        &self,
        txn: TxnId,
        partition: &str,
        chunk: &Chunk,
    ) -> Result<(), VectorStoreError>;

    /// Top-`k` cosine-similarity search within `partition`.
    async fn search_content(
        &self,
        partition: &str,
        query_vector: &[f32],
        k: usize,
    ) -> Result<Vec<SearchRow>, VectorStoreError>;
}
