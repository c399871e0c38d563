//! `Chunk` and the embedding model tag.

use crate::error::MemoryError;
use serde::{Deserialize, Serialize};

/// Embedding backends tagged by their declared vector dimension.
///
/// Values mirror `embedding_model` in the source this is based on
/// (`oai_3small = 1536`, `oai_3large = 3072`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingModel {
    /// Small embedding model, 1536 dimensions.
    Small,
    /// Large embedding model, 3072 dimensions.
    Large,
}

impl EmbeddingModel {
    /// The vector dimension this model tag declares.
    pub fn dimension(&self) -> usize {
        match self {
            EmbeddingModel::Small => 1536,
            EmbeddingModel::Large => 3072,
        }
    }

    /// The provider-facing model name.
    pub fn model_name(&self) -> &'static str {
        match self {
            EmbeddingModel::Small => "text-embedding-3-small",
            EmbeddingModel::Large => "text-embedding-3-large",
        }
    }
}

/// A single embedded unit of content, content-addressed within a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Id shared by every chunk produced from the same ingest call.
    pub content_id: String,
    /// Position of this chunk within its batch.
    pub chunk_id: usize,
    /// The chunk's raw text.
    pub text: String,
    /// The embedding vector, once computed.
    pub embedding: Option<Vec<f32>>,
    /// Optional display name (e.g. source file name).
    pub name: Option<String>,
    /// Optional free-form metadata.
    pub meta: Option<serde_json::Value>,
    /// Milliseconds since the Unix epoch when the chunk was created.
    pub created_at: Option<u64>,
}

impl Chunk {
    /// Build a chunk with no embedding yet assigned.
    pub fn new(content_id: impl Into<String>, chunk_id: usize, text: impl Into<String>) -> Self {
        Self {
            content_id: content_id.into(),
            chunk_id,
            text: text.into(),
            embedding: None,
            name: None,
            meta: None,
            created_at: Some(crate::id::now_millis()),
        }
    }

    /// Attach an embedding vector, validating its dimension against `model`
    /// per invariant I7. Returns `MemoryError::DimensionMismatch` if the
    /// vector's length does not equal the model's declared dimension.
    pub fn with_embedding(
        mut self,
        embedding: Vec<f32>,
        model: EmbeddingModel,
    ) -> Result<Self, MemoryError> {
        if embedding.len() != model.dimension() {
            return Err(MemoryError::DimensionMismatch {
                expected: model.dimension(),
                actual: embedding.len(),
            });
        }
        self.embedding = Some(embedding);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_dimensions_match_documented_values() {
        assert_eq!(EmbeddingModel::Small.dimension(), 1536);
        assert_eq!(EmbeddingModel::Large.dimension(), 3072);
    }

    #[test]
    fn with_embedding_rejects_wrong_dimension() {
        let chunk = Chunk::new("abc123", 0, "hello");
        let result = chunk.with_embedding(vec![0.0; 10], EmbeddingModel::Small);
        assert!(matches!(
            result,
            Err(MemoryError::DimensionMismatch {
                expected: 1536,
                actual: 10
            })
        ));
    }

    #[test]
    fn with_embedding_accepts_correct_dimension() {
        let chunk = Chunk::new("abc123", 0, "hello");
        let result = chunk.with_embedding(vec![0.0; 1536], EmbeddingModel::Small);
        assert!(result.is_ok());
    }
}
