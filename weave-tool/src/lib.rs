#![deny(missing_docs)]
//! Tool registry and built-in native tools for the weave agent runtime.
//!
//! [`ToolRegistry`] dispatches by name to an object-safe [`ToolDyn`]
//! handler, each handed a [`ToolContext`] capability bundle at call time
//! rather than a back-reference to the executor that owns it. The eight
//! built-in handlers (`builtin`) implement the tool surface the original
//! agent runtime shipped; [`PlainTextFileReader`], [`StdUserIo`], and
//! [`ProcessCodeExecutor`] are the workspace's one concrete implementation
//! of each capability trait they back.

pub mod builtin;
pub mod catalogue;
pub mod code_executor;
pub mod context;
pub mod file_reader;
pub mod registry;
pub mod user_io;

pub use builtin::register_builtins;
pub use catalogue::{load_catalogue, parse_catalogue};
pub use code_executor::ProcessCodeExecutor;
pub use context::ToolContext;
pub use file_reader::PlainTextFileReader;
pub use registry::{ToolCall, ToolDyn, ToolRegistry};
pub use user_io::StdUserIo;
