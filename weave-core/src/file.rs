//! The `FileReader` capability: decode a file's contents to plain text.

use crate::error::ToolError;
use async_trait::async_trait;

/// Reads, writes, and appends to files. A concrete implementation is free
/// to support TXT/PDF/DOC(X) or any other format for `read`; only a plain
/// UTF-8 filesystem implementation ships in this workspace (in
/// `weave-tool`) — PDF/DOC(X) decoding is out of scope here.
#[async_trait]
pub trait FileReader: Send + Sync {
    /// Read and decode `path` to plain text.
    async fn read(&self, path: &str) -> Result<String, ToolError>;

    /// Write `content` to `path`, overwriting any existing file.
    async fn write(&self, path: &str, content: &str) -> Result<(), ToolError>;

    /// Append `content` to `path`, creating it if absent.
    async fn append(&self, path: &str, content: &str) -> Result<(), ToolError>;
}
