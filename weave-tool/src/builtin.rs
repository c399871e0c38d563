//! The eight built-in tool handlers dispatched by name from a parsed
//! `name`/`parameters` JSON call. Each is stateless beyond the
//! [`ToolContext`] it is handed at call time.

use async_trait::async_trait;
use serde_json::Value;
use weave_core::error::ToolError;
use weave_core::state::MemoryNote;

use crate::context::ToolContext;
use crate::registry::ToolDyn;

fn string_param(params: &Value, name: &str) -> Result<String, ToolError> {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ToolError::InvalidInput(format!("missing '{name}' field")))
}

/// `memory(keyword, content, description)` — replace any existing note
/// under `keyword`, then remember the new one.
pub struct MemoryTool;

#[async_trait]
impl ToolDyn for MemoryTool {
    fn name(&self) -> &str {
        "memory"
    }
    fn description(&self) -> &str {
        "Remember a piece of content under a keyword for later recall."
    }
    fn parameters(&self) -> Vec<(String, String)> {
        vec![
            ("keyword".to_string(), "short key to file this memory under".to_string()),
            ("content".to_string(), "the content to remember".to_string()),
            ("description".to_string(), "what this memory holds".to_string()),
        ]
    }
    async fn call(&self, ctx: &ToolContext, params: Value) -> Result<String, ToolError> {
        let keyword = string_param(&params, "keyword")?;
        let content = string_param(&params, "content")?;
        let description = string_param(&params, "description")?;
        ctx.short_term_memory.lock().unwrap().remember(MemoryNote {
            keyword,
            description,
            content: content.clone(),
        });
        Ok(format!("The content: '{content}' has been memorised."))
    }
}

/// `read_file(file_path)` — delegate to the host filesystem capability.
pub struct ReadFileTool;

#[async_trait]
impl ToolDyn for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }
    fn description(&self) -> &str {
        "Read the contents of a text file on disk."
    }
    fn parameters(&self) -> Vec<(String, String)> {
        vec![("file_path".to_string(), "path to the file to read".to_string())]
    }
    async fn call(&self, ctx: &ToolContext, params: Value) -> Result<String, ToolError> {
        let file_path = string_param(&params, "file_path")?;
        let file_content = ctx.file_reader.read(&file_path).await?;
        Ok(format!(
            "The file: '{file_path}' has been read with content: '{file_content}'"
        ))
    }
}

/// `write_file(file_path, content)` — delegate to the host filesystem
/// capability, overwriting any existing file.
pub struct WriteFileTool;

#[async_trait]
impl ToolDyn for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }
    fn description(&self) -> &str {
        "Write content to a text file on disk, overwriting it."
    }
    fn parameters(&self) -> Vec<(String, String)> {
        vec![
            ("file_path".to_string(), "path to the file to write".to_string()),
            ("content".to_string(), "content to write".to_string()),
        ]
    }
    async fn call(&self, ctx: &ToolContext, params: Value) -> Result<String, ToolError> {
        let file_path = string_param(&params, "file_path")?;
        let content = string_param(&params, "content")?;
        ctx.file_reader.write(&file_path, &content).await?;
        Ok(format!(
            "The content: '{content}' was written to the file: '{file_path}'"
        ))
    }
}

/// `append_file(file_path, content)` — delegate to the host filesystem
/// capability, creating the file if absent.
pub struct AppendFileTool;

#[async_trait]
impl ToolDyn for AppendFileTool {
    fn name(&self) -> &str {
        "append_file"
    }
    fn description(&self) -> &str {
        "Append content to a text file on disk, creating it if absent."
    }
    fn parameters(&self) -> Vec<(String, String)> {
        vec![
            ("file_path".to_string(), "path to the file to append to".to_string()),
            ("content".to_string(), "content to append".to_string()),
        ]
    }
    async fn call(&self, ctx: &ToolContext, params: Value) -> Result<String, ToolError> {
        let file_path = string_param(&params, "file_path")?;
        let content = string_param(&params, "content")?;
        ctx.file_reader.append(&file_path, &content).await?;
        Ok(format!(
            "The content: '{content}' was appended to the file: '{file_path}'"
        ))
    }
}

/// `send_message(message)` — surface the message on the user I/O sink.
pub struct SendMessageTool;

#[async_trait]
impl ToolDyn for SendMessageTool {
    fn name(&self) -> &str {
        "send_message"
    }
    fn description(&self) -> &str {
        "Display a message to the user."
    }
    fn parameters(&self) -> Vec<(String, String)> {
        vec![("message".to_string(), "message to display".to_string())]
    }
    async fn call(&self, ctx: &ToolContext, params: Value) -> Result<String, ToolError> {
        let message = string_param(&params, "message")?;
        ctx.user_io.send_message(&message).await?;
        Ok(format!("The message: '{message}' was successfully displayed"))
    }
}

/// `user_input(prompt)` — surface the prompt and read one line of reply.
pub struct UserInputTool;

#[async_trait]
impl ToolDyn for UserInputTool {
    fn name(&self) -> &str {
        "user_input"
    }
    fn description(&self) -> &str {
        "Ask the user a question and wait for their reply."
    }
    fn parameters(&self) -> Vec<(String, String)> {
        vec![("prompt".to_string(), "question to ask the user".to_string())]
    }
    async fn call(&self, ctx: &ToolContext, params: Value) -> Result<String, ToolError> {
        let prompt = string_param(&params, "prompt")?;
        let message = ctx.user_io.user_input(&prompt).await?;
        Ok(format!("User message is: '{message}'"))
    }
}

/// `execute_bash_command(command)` — delegate to the host shell capability.
pub struct ExecuteBashCommandTool;

#[async_trait]
impl ToolDyn for ExecuteBashCommandTool {
    fn name(&self) -> &str {
        "execute_bash_command"
    }
    fn description(&self) -> &str {
        "Run a shell command and return its output."
    }
    fn parameters(&self) -> Vec<(String, String)> {
        vec![("command".to_string(), "shell command to run".to_string())]
    }
    async fn call(&self, ctx: &ToolContext, params: Value) -> Result<String, ToolError> {
        let command = string_param(&params, "command")?;
        let mut stdout = ctx.code_executor.execute_bash_command(&command).await?;
        if stdout.trim().is_empty() {
            stdout = "Success".to_string();
        }
        Ok(format!(
            "The bash command: '{command}' was executed with result: '{stdout}'"
        ))
    }
}

/// `execute_python_script(script, dependencies?)` — delegate to the
/// sandboxed `CodeExecutor`.
pub struct ExecutePythonScriptTool;

#[async_trait]
impl ToolDyn for ExecutePythonScriptTool {
    fn name(&self) -> &str {
        "execute_python_script"
    }
    fn description(&self) -> &str {
        "Run a Python script and return its output."
    }
    fn parameters(&self) -> Vec<(String, String)> {
        vec![
            ("script".to_string(), "python source to run".to_string()),
            (
                "dependencies".to_string(),
                "optional comma-separated pip packages".to_string(),
            ),
        ]
    }
    async fn call(&self, ctx: &ToolContext, params: Value) -> Result<String, ToolError> {
        let script = string_param(&params, "script")?;
        let dependencies: Option<Vec<String>> = params
            .get("dependencies")
            .and_then(Value::as_str)
            .filter(|deps| !deps.is_empty())
            .map(|deps| deps.split(',').map(|d| d.trim().to_string()).collect());
        let result = ctx
            .code_executor
            .execute_python_script(&script, dependencies.as_deref())
            .await?;
        Ok(format!(
            "The python script: '{script}' was executed with result: '{result}'"
        ))
    }
}

/// Register all eight built-in tools into `registry`.
pub fn register_builtins(registry: &mut crate::registry::ToolRegistry) {
    use std::sync::Arc;
    registry.register(Arc::new(MemoryTool));
    registry.register(Arc::new(ReadFileTool));
    registry.register(Arc::new(WriteFileTool));
    registry.register(Arc::new(AppendFileTool));
    registry.register(Arc::new(SendMessageTool));
    registry.register(Arc::new(UserInputTool));
    registry.register(Arc::new(ExecuteBashCommandTool));
    registry.register(Arc::new(ExecutePythonScriptTool));
}
