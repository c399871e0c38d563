#![deny(missing_docs)]
//! # weave — umbrella crate
//!
//! A single import surface over the workspace's components, each gated
//! behind its own feature so a consumer only pulls in what it uses.

#[cfg(feature = "core")]
pub use weave_core;
#[cfg(feature = "chunker")]
pub use weave_chunker;
#[cfg(feature = "executor")]
pub use weave_executor;
#[cfg(feature = "memory")]
pub use weave_memory;
#[cfg(feature = "parser")]
pub use weave_parser;
#[cfg(feature = "pipeline")]
pub use weave_pipeline;
#[cfg(feature = "tool")]
pub use weave_tool;

/// Happy-path imports for composing a weave agent runtime.
pub mod prelude {
    #[cfg(feature = "core")]
    pub use weave_core::{
        Chunk, CodeExecutor, Context, ContentId, DurationMs, EmbeddingModel, ExecutorState,
        FileReader, Instruction, LlmClient, Message, MemoryNote, NullProgressSink, ProgressSink,
        Role, RunConfig, ShortTermMemory, UserIo, VectorStore,
    };

    #[cfg(feature = "chunker")]
    pub use weave_chunker::{Chunker, SentenceChunker};

    #[cfg(feature = "parser")]
    pub use weave_parser::{interpolate, load_from_file, parse_str, ParsedFile};

    #[cfg(feature = "tool")]
    pub use weave_tool::{register_builtins, ToolCall, ToolContext, ToolDyn, ToolRegistry};

    #[cfg(feature = "pipeline")]
    pub use weave_pipeline::{FileReaderToText, Pipeline, PipelineFactory, PipelineStage, PipelineValue, TextToChunks};

    #[cfg(feature = "memory")]
    pub use weave_memory::MemoryController;

    #[cfg(feature = "executor")]
    pub use weave_executor::{AgentExecutor, Usage};
}

#[cfg(all(test, feature = "full"))]
mod tests {
    use super::prelude::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use weave_core::test_utils::{text_response, InMemoryFileReader, MockCodeExecutor, MockLlmClient, MockUserIo};

    // The facade's `full` feature set composes into a working end-to-end
    // run: parse an agent file, wire it into an executor, run it to
    // completion through the prelude's re-exported types alone.
    #[tokio::test]
    async fn prelude_types_compose_into_a_runnable_executor() {
        let source = "# root\nSay hello then return.\n";
        let parsed = parse_str(source).unwrap();

        let llm = Arc::new(MockLlmClient::new(vec![text_response("Hello.<<RETURN>>")], vec![]));
        let tool_ctx = ToolContext::new(
            Arc::new(InMemoryFileReader::new()),
            Arc::new(MockCodeExecutor::new("", "")),
            Arc::new(MockUserIo::new(vec![])),
        );

        let mut exec = AgentExecutor::new(llm, tool_ctx, RunConfig::default());
        exec.init_native_tools(ToolRegistry::new());

        let instructions: HashMap<String, Instruction> = parsed.instructions;
        exec.init_agent(instructions).await.unwrap();

        let output = exec.run("root", "").await.unwrap();
        assert_eq!(output, "Hello.");
    }
}
