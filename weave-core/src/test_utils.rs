//! In-memory test doubles for every capability trait, gated behind the
//! `test-utils` feature — mirrors `layer0`'s `test-utils` feature.

use crate::chunk::EmbeddingModel;
use crate::code::CodeExecutor;
use crate::context::Context;
use crate::error::{LlmError, ToolError, VectorStoreError};
use crate::file::FileReader;
use crate::llm::{ChatChoice, ChatOptions, ChatResponse, ChatUsage, EmbeddingResponse, LlmClient};
use crate::progress::UserIo;
use crate::vector_store::{SearchRow, TxnId, VectorStore};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Queues canned chat-completion responses and a fixed embedding vector,
/// for driving the Agent Executor / Memory Controller in tests without a
/// real network client.
pub struct MockLlmClient {
    chat_responses: Mutex<VecDeque<ChatResponse>>,
    embedding_vector: Vec<f32>,
    embedding_failures: Mutex<VecDeque<bool>>,
    call_count: AtomicU64,
}

impl MockLlmClient {
    /// Build a mock that returns `chat_responses` in order and always
    /// embeds to `embedding_vector` (sized for whichever model is asked for
    /// only if the caller chose a matching dimension up front).
    pub fn new(chat_responses: Vec<ChatResponse>, embedding_vector: Vec<f32>) -> Self {
        Self {
            chat_responses: Mutex::new(chat_responses.into()),
            embedding_vector,
            embedding_failures: Mutex::new(VecDeque::new()),
            call_count: AtomicU64::new(0),
        }
    }

    /// Queue per-call embedding outcomes: `true` means "fail this call".
    /// Consumed in FIFO order; once exhausted, calls succeed.
    pub fn with_embedding_failures(self, failures: Vec<bool>) -> Self {
        *self.embedding_failures.lock().unwrap() = failures.into();
        self
    }

    /// Number of chat_completion calls made so far.
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }
}

/// Build a `ChatResponse` carrying a single text choice — the common case
/// in tests.
pub fn text_response(content: impl Into<String>) -> ChatResponse {
    ChatResponse {
        choices: vec![ChatChoice { content: content.into() }],
        usage: Some(ChatUsage {
            completion_tokens: 1,
            total_tokens: 1,
        }),
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn chat_completion(
        &self,
        _ctx: &Context,
        _temperature: f32,
        _options: ChatOptions,
    ) -> Result<ChatResponse, LlmError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.chat_responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| LlmError::Transport("MockLlmClient: no more responses queued".into()))
    }

    async fn embedding(&self, _text: &str, _model: EmbeddingModel) -> Result<EmbeddingResponse, LlmError> {
        let should_fail = self
            .embedding_failures
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(false);
        if should_fail {
            return Err(LlmError::Transport("mock embedding failure".into()));
        }
        Ok(EmbeddingResponse {
            embedding: self.embedding_vector.clone(),
            total_tokens: self.embedding_vector.len() as u64,
        })
    }
}

/// An in-memory `VectorStore`, storing rows per partition in insertion
/// order within committed transactions only.
#[derive(Default)]
pub struct InMemoryVectorStore {
    collections: Mutex<HashMap<String, EmbeddingModel>>,
    pending: Mutex<HashMap<u64, Vec<(String, crate::chunk::Chunk)>>>,
    rows: Mutex<HashMap<String, Vec<crate::chunk::Chunk>>>,
    next_txn: AtomicU64,
}

impl InMemoryVectorStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows currently committed for `partition`.
    pub fn rows_in(&self, partition: &str) -> Vec<crate::chunk::Chunk> {
        self.rows.lock().unwrap().get(partition).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn list_collections(&self) -> Result<Vec<String>, VectorStoreError> {
        Ok(self.collections.lock().unwrap().keys().cloned().collect())
    }

    async fn create_collection(&self, name: &str, model: EmbeddingModel) -> Result<(), VectorStoreError> {
        self.collections.lock().unwrap().insert(name.to_string(), model);
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<(), VectorStoreError> {
        self.collections.lock().unwrap().remove(name);
        self.rows.lock().unwrap().remove(name);
        Ok(())
    }

    async fn create_transaction(&self) -> Result<TxnId, VectorStoreError> {
        let id = self.next_txn.fetch_add(1, Ordering::SeqCst);
        self.pending.lock().unwrap().insert(id, Vec::new());
        Ok(TxnId(id))
    }

    async fn commit_transaction(&self, txn: TxnId) -> Result<(), VectorStoreError> {
        let writes = self
            .pending
            .lock()
            .unwrap()
            .remove(&txn.0)
            .unwrap_or_default();
        let mut rows = self.rows.lock().unwrap();
        for (partition, chunk) in writes {
            rows.entry(partition).or_default().push(chunk);
        }
        Ok(())
    }

    async fn write_content(
        &self,
        txn: TxnId,
        partition: &str,
        chunk: &crate::chunk::Chunk,
    ) -> Result<(), VectorStoreError> {
        let model = *self
            .collections
            .lock()
            .unwrap()
            .get(partition)
            .ok_or_else(|| VectorStoreError::CollectionNotFound(partition.to_string()))?;
        let embedding = chunk
            .embedding
            .as_ref()
            .ok_or_else(|| VectorStoreError::DimensionMismatch {
                expected: model.dimension(),
                actual: 0,
            })?;
        if embedding.len() != model.dimension() {
            return Err(VectorStoreError::DimensionMismatch {
                expected: model.dimension(),
                actual: embedding.len(),
            });
        }
        self.pending
            .lock()
            .unwrap()
            .entry(txn.0)
            .or_default()
            .push((partition.to_string(), chunk.clone()));
        Ok(())
    }

    async fn search_content(
        &self,
        partition: &str,
        query_vector: &[f32],
        k: usize,
    ) -> Result<Vec<SearchRow>, VectorStoreError> {
        let rows = self.rows.lock().unwrap();
        let mut scored: Vec<(f32, &crate::chunk::Chunk)> = rows
            .get(partition)
            .into_iter()
            .flatten()
            .filter_map(|c| c.embedding.as_ref().map(|e| (cosine_distance(e, query_vector), c)))
            .collect();
        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        Ok(scored
            .into_iter()
            .take(k)
            .map(|(distance, c)| SearchRow {
                content: c.text.clone(),
                content_id: c.content_id.clone(),
                chunk_id: c.chunk_id,
                distance,
                name: c.name.clone(),
                meta: c.meta.clone(),
            })
            .collect())
    }
}

fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - (dot / (norm_a * norm_b))
}

/// An in-memory `FileReader`, backed by a `HashMap<String, String>`.
#[derive(Default)]
pub struct InMemoryFileReader {
    files: Mutex<HashMap<String, String>>,
}

impl InMemoryFileReader {
    /// An empty filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file before the test runs.
    pub fn seed(&self, path: impl Into<String>, content: impl Into<String>) {
        self.files.lock().unwrap().insert(path.into(), content.into());
    }
}

#[async_trait]
impl FileReader for InMemoryFileReader {
    async fn read(&self, path: &str) -> Result<String, ToolError> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| ToolError::ExecutionFailed(format!("no such file: {path}")))
    }

    async fn write(&self, path: &str, content: &str) -> Result<(), ToolError> {
        self.files.lock().unwrap().insert(path.to_string(), content.to_string());
        Ok(())
    }

    async fn append(&self, path: &str, content: &str) -> Result<(), ToolError> {
        let mut files = self.files.lock().unwrap();
        files.entry(path.to_string()).or_default().push_str(content);
        Ok(())
    }
}

/// A `CodeExecutor` returning canned output, recording what it was asked
/// to run.
pub struct MockCodeExecutor {
    bash_output: String,
    python_output: String,
    calls: Mutex<Vec<String>>,
}

impl MockCodeExecutor {
    /// Build a mock that returns fixed output for both operations.
    pub fn new(bash_output: impl Into<String>, python_output: impl Into<String>) -> Self {
        Self {
            bash_output: bash_output.into(),
            python_output: python_output.into(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Commands/scripts passed in, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CodeExecutor for MockCodeExecutor {
    async fn execute_bash_command(&self, command: &str) -> Result<String, ToolError> {
        self.calls.lock().unwrap().push(command.to_string());
        Ok(self.bash_output.clone())
    }

    async fn execute_python_script(
        &self,
        script: &str,
        _dependencies: Option<&[String]>,
    ) -> Result<String, ToolError> {
        self.calls.lock().unwrap().push(script.to_string());
        Ok(self.python_output.clone())
    }
}

/// A `UserIo` that records sent messages and replies with a fixed, queued
/// line of input.
pub struct MockUserIo {
    sent: Mutex<Vec<String>>,
    replies: Mutex<VecDeque<String>>,
}

impl MockUserIo {
    /// Build a mock with a queue of canned replies to `user_input`.
    pub fn new(replies: Vec<String>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            replies: Mutex::new(replies.into()),
        }
    }

    /// Messages sent so far, in order.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserIo for MockUserIo {
    async fn send_message(&self, message: &str) -> Result<(), ToolError> {
        self.sent.lock().unwrap().push(message.to_string());
        Ok(())
    }

    async fn user_input(&self, _prompt: &str) -> Result<String, ToolError> {
        Ok(self.replies.lock().unwrap().pop_front().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_llm_client_serves_queued_responses_in_order() {
        let client = MockLlmClient::new(vec![text_response("one"), text_response("two")], vec![0.0; 4]);
        let ctx = Context::new();
        let first = client.chat_completion(&ctx, 0.1, ChatOptions::default()).await.unwrap();
        let second = client.chat_completion(&ctx, 0.1, ChatOptions::default()).await.unwrap();
        assert_eq!(first.first_content(), Some("one"));
        assert_eq!(second.first_content(), Some("two"));
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn in_memory_vector_store_round_trips() {
        let store = InMemoryVectorStore::new();
        store.create_collection("col", EmbeddingModel::Small).await.unwrap();
        let txn = store.create_transaction().await.unwrap();
        let chunk = crate::chunk::Chunk::new("abc", 0, "hello")
            .with_embedding(vec![1.0; 1536], EmbeddingModel::Small)
            .unwrap();
        store.write_content(txn, "col", &chunk).await.unwrap();
        store.commit_transaction(txn).await.unwrap();

        assert_eq!(store.rows_in("col").len(), 1);
        let results = store.search_content("col", &vec![1.0; 1536], 5).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn in_memory_vector_store_rejects_wrong_dimension() {
        let store = InMemoryVectorStore::new();
        store.create_collection("col", EmbeddingModel::Small).await.unwrap();
        let txn = store.create_transaction().await.unwrap();
        let mut chunk = crate::chunk::Chunk::new("abc", 0, "hello");
        chunk.embedding = Some(vec![1.0; 10]);
        let result = store.write_content(txn, "col", &chunk).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn in_memory_file_reader_round_trips() {
        let reader = InMemoryFileReader::new();
        reader.write("a.txt", "hello").await.unwrap();
        reader.append("a.txt", " world").await.unwrap();
        assert_eq!(reader.read("a.txt").await.unwrap(), "hello world");
    }
}
