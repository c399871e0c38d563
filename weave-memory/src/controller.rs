//! [`MemoryController`]: fan out embeddings, write through a transaction,
//! answer top-k retrieval.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tracing::warn;
use weave_core::chunk::{Chunk, EmbeddingModel};
use weave_core::error::MemoryError;
use weave_core::id::gen_content_id;
use weave_core::llm::LlmClient;
use weave_core::progress::ProgressSink;
use weave_core::vector_store::{SearchRow, VectorStore};

type EmbedResult = Result<Chunk, (usize, MemoryError)>;

/// Embeds, stores, and retrieves chunk batches under a fixed embedding
/// model tag. One controller owns one in-flight batch at a time: calling
/// `process_chunks` again before `write_chunks` drains the previous batch
/// simply appends more handles to the same pending buffer, mirroring the
/// source this is based on pooling futures across calls.
pub struct MemoryController {
    llm: Arc<dyn LlmClient>,
    store: Arc<dyn VectorStore>,
    model: EmbeddingModel,
    pending: Mutex<Vec<JoinHandle<EmbedResult>>>,
    processed_tokens: Arc<AtomicU64>,
    processed_bytes: AtomicU64,
}

impl MemoryController {
    /// Build a controller embedding under `model`, backed by `llm` and
    /// persisting through `store`.
    pub fn new(llm: Arc<dyn LlmClient>, store: Arc<dyn VectorStore>, model: EmbeddingModel) -> Self {
        Self {
            llm,
            store,
            model,
            pending: Mutex::new(Vec::new()),
            processed_tokens: Arc::new(AtomicU64::new(0)),
            processed_bytes: AtomicU64::new(0),
        }
    }

    /// Create a collection under this controller's model tag.
    pub async fn create_collection(&self, name: &str) -> Result<(), MemoryError> {
        self.store.create_collection(name, self.model).await?;
        Ok(())
    }

    /// Delete a collection and all of its rows.
    pub async fn delete_collection(&self, name: &str) -> Result<(), MemoryError> {
        self.store.delete_collection(name).await?;
        Ok(())
    }

    /// Spawn one independent embedding task per chunk, tagged with a fresh
    /// content id shared by the whole batch. Returns immediately; tasks
    /// are awaited by the next [`MemoryController::write_chunks`] call.
    pub fn process_chunks(
        &self,
        chunks: Vec<String>,
        name: Option<String>,
        meta: Option<serde_json::Value>,
    ) -> String {
        let content_id = gen_content_id().as_str().to_string();
        let mut pending = self.pending.lock().unwrap();
        for (chunk_id, text) in chunks.into_iter().enumerate() {
            self.processed_bytes.fetch_add(text.len() as u64, Ordering::SeqCst);
            let llm = self.llm.clone();
            let model = self.model;
            let content_id = content_id.clone();
            let name = name.clone();
            let meta = meta.clone();
            let processed_tokens = self.processed_tokens.clone();
            pending.push(tokio::spawn(async move {
                embed_one(llm, model, content_id, chunk_id, text, name, meta, processed_tokens).await
            }));
        }
        content_id
    }

    /// Await every pending embedding task, write the survivors to
    /// `partition` within one transaction (committed unconditionally), and
    /// reset the running counters. Returns the chunk ids that failed to
    /// embed; an `Err` is reserved for transaction-level failures.
    pub async fn write_chunks(
        &self,
        partition: &str,
        progress: Option<&dyn ProgressSink>,
    ) -> Result<Vec<usize>, MemoryError> {
        let handles: Vec<_> = self.pending.lock().unwrap().drain(..).collect();
        let total = handles.len().max(1);
        let txn = self.store.create_transaction().await?;
        let mut failed = Vec::new();

        for (done, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(Ok(chunk)) => {
                    self.store.write_content(txn, partition, &chunk).await?;
                }
                Ok(Err((chunk_id, err))) => {
                    warn!(chunk_id, %err, "chunk embedding failed");
                    failed.push(chunk_id);
                }
                Err(join_err) => {
                    return Err(MemoryError::Other(Box::new(std::io::Error::other(join_err.to_string()))));
                }
            }
            if let Some(sink) = progress {
                sink.report((done + 1) as f32 / total as f32);
            }
        }

        self.store.commit_transaction(txn).await?;
        self.processed_tokens.store(0, Ordering::SeqCst);
        self.processed_bytes.store(0, Ordering::SeqCst);
        Ok(failed)
    }

    /// Embed `query` under this controller's model and return the store's
    /// top-`k` rows verbatim.
    pub async fn read_chunks(
        &self,
        partition: &str,
        query: &str,
        k: usize,
    ) -> Result<Vec<SearchRow>, MemoryError> {
        let response = self.llm.embedding(query, self.model).await?;
        let rows = self.store.search_content(partition, &response.embedding, k).await?;
        Ok(rows)
    }

    /// Tokens billed across pending and already-resolved embedding calls
    /// since the last `write_chunks`.
    pub fn processed_tokens(&self) -> u64 {
        self.processed_tokens.load(Ordering::SeqCst)
    }

    /// Bytes of chunk text submitted via `process_chunks` since the last
    /// `write_chunks`.
    pub fn processed_bytes(&self) -> u64 {
        self.processed_bytes.load(Ordering::SeqCst)
    }
}

#[allow(clippy::too_many_arguments)]
async fn embed_one(
    llm: Arc<dyn LlmClient>,
    model: EmbeddingModel,
    content_id: String,
    chunk_id: usize,
    text: String,
    name: Option<String>,
    meta: Option<serde_json::Value>,
    processed_tokens: Arc<AtomicU64>,
) -> EmbedResult {
    let response = llm
        .embedding_async(&text, model)
        .await
        .map_err(|err| (chunk_id, MemoryError::Llm(err)))?;
    processed_tokens.fetch_add(response.total_tokens, Ordering::SeqCst);

    let mut chunk = Chunk::new(content_id, chunk_id, text)
        .with_embedding(response.embedding, model)
        .map_err(|err| (chunk_id, err))?;
    chunk.name = name;
    chunk.meta = meta;
    Ok(chunk)
}
