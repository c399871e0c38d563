//! The `ProgressSink` observer capability and a small user I/O capability.

use crate::error::ToolError;
use async_trait::async_trait;

/// Observes fractional completion of a long-running operation (currently:
/// `MemoryController::write_chunks`). Invoked monotonically; implementations
/// MUST NOT call back into the component that owns the sink.
pub trait ProgressSink: Send + Sync {
    /// Report progress as a fraction in `[0.0, 1.0]`.
    fn report(&self, fraction: f32);
}

/// A sink that discards all progress reports.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn report(&self, _fraction: f32) {}
}

/// Surfaces messages to the operator and reads a line of input back, used
/// by the `send_message`/`user_input` tool handlers.
#[async_trait]
pub trait UserIo: Send + Sync {
    /// Surface `message` to the user.
    async fn send_message(&self, message: &str) -> Result<(), ToolError>;

    /// Surface `prompt` and read one line of input back.
    async fn user_input(&self, prompt: &str) -> Result<String, ToolError>;
}
