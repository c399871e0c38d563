//! # weave-core — data model, errors, and capability traits
//!
//! The shared foundation for the `weave` agent runtime: the `Message`/
//! `Context` conversation log, `Instruction`, `Chunk`/`EmbeddingModel`, the
//! per-component error taxonomy, the `LlmClient`/`VectorStore`/
//! `FileReader`/`CodeExecutor`/`UserIo` capability traits that the rest of
//! the workspace is built against, and `RunConfig`.
//!
//! Enable the `test-utils` feature to pull in in-memory doubles for every
//! capability trait (see [`test_utils`]).

#![deny(missing_docs)]

pub mod chunk;
pub mod code;
pub mod config;
pub mod context;
pub mod duration;
pub mod error;
pub mod file;
pub mod id;
pub mod instruction;
pub mod llm;
pub mod progress;
pub mod state;
pub mod vector_store;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use chunk::{Chunk, EmbeddingModel};
pub use code::CodeExecutor;
pub use config::RunConfig;
pub use context::{Context, Message, Role};
pub use duration::DurationMs;
pub use file::FileReader;
pub use id::ContentId;
pub use instruction::Instruction;
pub use llm::LlmClient;
pub use progress::{NullProgressSink, ProgressSink, UserIo};
pub use state::{ExecutorState, MemoryNote, ShortTermMemory};
pub use vector_store::VectorStore;
