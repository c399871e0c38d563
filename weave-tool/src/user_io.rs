//! The workspace's one concrete [`UserIo`]: plain stdout/stdin.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use weave_core::error::ToolError;
use weave_core::progress::UserIo;

/// Surfaces `send_message` on stdout and reads `user_input` replies from
/// stdin, one line at a time.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdUserIo;

impl StdUserIo {
    /// Build a reader/writer pair over the process's stdio.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl UserIo for StdUserIo {
    async fn send_message(&self, message: &str) -> Result<(), ToolError> {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(format!("{message}\n").as_bytes())
            .await
            .map_err(|err| ToolError::ExecutionFailed(err.to_string()))?;
        stdout
            .flush()
            .await
            .map_err(|err| ToolError::ExecutionFailed(err.to_string()))
    }

    async fn user_input(&self, prompt: &str) -> Result<String, ToolError> {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(format!("{prompt}\n> ").as_bytes())
            .await
            .map_err(|err| ToolError::ExecutionFailed(err.to_string()))?;
        stdout
            .flush()
            .await
            .map_err(|err| ToolError::ExecutionFailed(err.to_string()))?;

        let mut line = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await
            .map_err(|err| ToolError::ExecutionFailed(err.to_string()))?;
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }
}
