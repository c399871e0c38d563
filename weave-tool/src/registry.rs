//! [`ToolDyn`] and [`ToolRegistry`]: name-keyed dispatch for native tools.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use weave_core::error::ToolError;
use weave_core::state::CatalogueEntry;

use crate::context::ToolContext;

/// Object-safe trait for a single native tool.
///
/// Handlers are stateless beyond the [`ToolContext`] they receive at call
/// time — they never hold an owning reference back to the executor.
#[async_trait]
pub trait ToolDyn: Send + Sync {
    /// The tool's unique name, as it appears in a parsed `name` field.
    fn name(&self) -> &str;

    /// Human-readable description, used in the instructions catalogue.
    fn description(&self) -> &str;

    /// Parameter name/description pairs, rendered into the few-shot block.
    fn parameters(&self) -> Vec<(String, String)>;

    /// Execute the tool against `params`, returning the human-readable
    /// result string appended to working memory.
    async fn call(&self, ctx: &ToolContext, params: Value) -> Result<String, ToolError>;
}

/// A single dispatch request: the tool name, its parameters, and the
/// monotonically increasing id assigned at construction.
#[derive(Debug, Clone)]
pub struct ToolCall {
    /// Assigned in submission order by [`ToolRegistry::next_call`].
    pub id: u64,
    /// Name of the tool to dispatch to.
    pub name: String,
    /// Parameters passed to the handler.
    pub params: Value,
}

/// Name-keyed registry of native tools.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn ToolDyn>>,
    next_id: AtomicU64,
}

impl ToolRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            next_id: AtomicU64::new(0),
        }
    }

    /// Register a tool, replacing any existing one with the same name.
    pub fn register(&mut self, tool: Arc<dyn ToolDyn>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Whether `name` is a registered native tool.
    pub fn is_registered(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry holds no tools.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Build a [`ToolCall`] with the next monotonically increasing id.
    pub fn next_call(&self, name: impl Into<String>, params: Value) -> ToolCall {
        ToolCall {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: name.into(),
            params,
        }
    }

    /// The catalogue entry for every registered tool, for the executor's
    /// `native_instructions` table.
    pub fn catalogue(&self) -> Vec<CatalogueEntry> {
        let mut entries: Vec<_> = self
            .tools
            .values()
            .map(|tool| CatalogueEntry {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters(),
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    /// Synchronous single dispatch. `Ok(None)` when `call.name` is not a
    /// registered tool; `Err` on handler failure.
    pub async fn call(
        &self,
        ctx: &ToolContext,
        call: &ToolCall,
    ) -> Result<Option<String>, ToolError> {
        match self.tools.get(&call.name) {
            Some(tool) => Ok(Some(tool.call(ctx, call.params.clone()).await?)),
            None => Ok(None),
        }
    }

    /// Submit every call in `batch` concurrently, harvesting results in
    /// submission order. Each entry's id is preserved alongside its result
    /// (`None` for an unrecognized tool name, `Err` for handler failure).
    pub async fn async_batch_call(
        &self,
        ctx: &ToolContext,
        batch: Vec<ToolCall>,
    ) -> Vec<(u64, Result<Option<String>, ToolError>)> {
        let mut handles = Vec::with_capacity(batch.len());
        for call in batch {
            let tool = self.tools.get(&call.name).cloned();
            let ctx = ctx.clone();
            handles.push((
                call.id,
                tokio::spawn(async move {
                    match tool {
                        Some(tool) => tool.call(&ctx, call.params).await.map(Some),
                        None => Ok(None),
                    }
                }),
            ));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (id, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(join_err) => Err(ToolError::ExecutionFailed(join_err.to_string())),
            };
            results.push((id, result));
        }
        results
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
