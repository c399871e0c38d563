//! The workspace's one concrete [`FileReader`]: a plain UTF-8 filesystem
//! implementation. PDF/DOC(X) decoding is out of scope.

use async_trait::async_trait;
use weave_core::error::ToolError;
use weave_core::file::FileReader;

/// Reads, writes, and appends UTF-8 text files on the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextFileReader;

impl PlainTextFileReader {
    /// Build a reader rooted at the process's current working directory.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileReader for PlainTextFileReader {
    async fn read(&self, path: &str) -> Result<String, ToolError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|err| ToolError::ExecutionFailed(format!("reading {path}: {err}")))
    }

    async fn write(&self, path: &str, content: &str) -> Result<(), ToolError> {
        tokio::fs::write(path, content)
            .await
            .map_err(|err| ToolError::ExecutionFailed(format!("writing {path}: {err}")))
    }

    async fn append(&self, path: &str, content: &str) -> Result<(), ToolError> {
        use tokio::io::AsyncWriteExt;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|err| ToolError::ExecutionFailed(format!("opening {path}: {err}")))?;
        file.write_all(content.as_bytes())
            .await
            .map_err(|err| ToolError::ExecutionFailed(format!("appending to {path}: {err}")))
    }
}
