//! The workspace's one concrete [`CodeExecutor`]: real subprocesses for
//! shell commands and Python scripts. No virtual-environment management or
//! dependency installation is performed (see the trait's doc comment).

use async_trait::async_trait;
use tokio::process::Command;
use weave_core::code::CodeExecutor;
use weave_core::error::ToolError;

/// Runs `bash -c <command>` and `python3 <script>` as child processes,
/// returning their combined stdout/stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessCodeExecutor;

impl ProcessCodeExecutor {
    /// Build an executor that shells out on the local machine.
    pub fn new() -> Self {
        Self
    }
}

fn combined_output(output: std::process::Output) -> String {
    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    combined
}

#[async_trait]
impl CodeExecutor for ProcessCodeExecutor {
    async fn execute_bash_command(&self, command: &str) -> Result<String, ToolError> {
        let output = Command::new("bash")
            .arg("-c")
            .arg(command)
            .output()
            .await
            .map_err(|err| ToolError::ExecutionFailed(format!("spawning bash: {err}")))?;
        Ok(combined_output(output))
    }

    async fn execute_python_script(
        &self,
        script: &str,
        _dependencies: Option<&[String]>,
    ) -> Result<String, ToolError> {
        let output = Command::new("python3")
            .arg("-c")
            .arg(script)
            .output()
            .await
            .map_err(|err| ToolError::ExecutionFailed(format!("spawning python3: {err}")))?;
        Ok(combined_output(output))
    }
}
