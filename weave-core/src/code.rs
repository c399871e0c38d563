//! The `CodeExecutor` capability: sandboxed Python execution and shell commands.

use crate::error::ToolError;
use async_trait::async_trait;

/// Runs shell commands and Python scripts. `weave-tool` ships a concrete
/// implementation backed by real subprocesses for both; what it does NOT
/// provide is per-run virtual-environment creation or dependency
/// installation for `execute_python_script` — `dependencies` is accepted
/// for interface parity but not acted on, matching the documented
/// Non-goal of a full venv sandbox.
#[async_trait]
pub trait CodeExecutor: Send + Sync {
    /// Run a shell command and return its combined stdout/stderr.
    async fn execute_bash_command(&self, command: &str) -> Result<String, ToolError>;

    /// Run a Python script, optionally installing `dependencies` first,
    /// and return its combined stdout/stderr.
    async fn execute_python_script(
        &self,
        script: &str,
        dependencies: Option<&[String]>,
    ) -> Result<String, ToolError>;
}
