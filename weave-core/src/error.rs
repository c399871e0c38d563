//! Error types for each component boundary.

use thiserror::Error;

/// Errors from parsing an agent file or its embedded directives.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file did not have a `.gen` extension.
    #[error("only .gen files are supported: {0}")]
    UnsupportedExtension(String),

    /// Reading the file from disk failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A `## max_context:` directive's value was not a valid integer.
    #[error("invalid max_context value: {0}")]
    InvalidMaxContext(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors raised while chunking text.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ChunkError {
    /// The chunker could not decode the input as text.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors from an `LlmClient` implementation.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LlmError {
    /// The provider rejected the request (auth, malformed payload, etc).
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The provider's connection or transport failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The request exceeded its configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The response could not be parsed into the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors from a `VectorStore` implementation.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum VectorStoreError {
    /// The named collection does not exist.
    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    /// The embedding's dimension did not match the collection's model.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension declared by the collection's model tag.
        expected: usize,
        /// Dimension of the vector actually supplied.
        actual: usize,
    },

    /// The store's connection or transport failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors from a `FileReader`/`CodeExecutor` capability or a tool handler
/// built on top of one.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found in the registry.
    #[error("tool not found: {0}")]
    NotFound(String),

    /// Tool execution failed.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// The input provided to the tool was invalid.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors from the Pipeline Runtime.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A stage received a value whose tag did not match what it expects.
    #[error("stage {stage} expected {expected}, got {actual}")]
    TypeMismatch {
        /// Name of the stage that rejected the input.
        stage: String,
        /// Tag name the stage declares as its input type.
        expected: String,
        /// Tag name of the value actually passed in.
        actual: String,
    },

    /// A stage returned an empty/null result, halting the pipeline.
    #[error("stage {0} produced an empty result")]
    EmptyResult(String),

    /// No stage is registered under the given name.
    #[error("unknown stage: {0}")]
    UnknownStage(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors raised by the Memory Controller.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MemoryError {
    /// An embedded chunk's vector did not match the declared model dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension declared by the model tag.
        expected: usize,
        /// Dimension of the vector actually produced.
        actual: usize,
    },

    /// The embedding client failed.
    #[error("embedding error: {0}")]
    Llm(#[from] LlmError),

    /// The vector store failed.
    #[error("vector store error: {0}")]
    Store(#[from] VectorStoreError),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors raised by the Agent Executor.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// A label in an instruction's `use` list resolved to neither a
    /// registered native tool nor another instruction.
    #[error("unresolved use label: {0}")]
    UnresolvedUse(String),

    /// The call stack was unexpectedly empty.
    #[error("call stack is empty")]
    EmptyCallStack,

    /// The requested entry instruction does not exist.
    #[error("unknown instruction: {0}")]
    UnknownInstruction(String),

    /// An LLM call failed.
    #[error("llm error: {0}")]
    Llm(#[from] LlmError),

    /// A tool call failed.
    #[error("tool error: {0}")]
    Tool(#[from] ToolError),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
