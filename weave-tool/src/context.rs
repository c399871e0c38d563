//! The capability bundle passed to a tool handler at dispatch time.
//!
//! Built-in handlers never hold a back-reference to the executor that owns
//! them — they receive exactly the capabilities they need, borrowed for the
//! duration of the call. This breaks the executor/tool-registry reference
//! cycle the handlers were modeled on.

use std::sync::{Arc, Mutex};

use weave_core::code::CodeExecutor;
use weave_core::file::FileReader;
use weave_core::progress::UserIo;
use weave_core::state::ShortTermMemory;

/// Capabilities a tool handler may need: scratch memory, the filesystem,
/// a sandboxed code executor, and a way to talk to the user.
#[derive(Clone)]
pub struct ToolContext {
    /// Shared with the executor so `memory()` calls are visible in the
    /// next Update-State pass.
    pub short_term_memory: Arc<Mutex<ShortTermMemory>>,
    /// Backing store for `read_file`/`write_file`/`append_file`.
    pub file_reader: Arc<dyn FileReader>,
    /// Backing store for `execute_bash_command`/`execute_python_script`.
    pub code_executor: Arc<dyn CodeExecutor>,
    /// Backing store for `send_message`/`user_input`.
    pub user_io: Arc<dyn UserIo>,
}

impl ToolContext {
    /// Bundle capabilities into a context.
    pub fn new(
        file_reader: Arc<dyn FileReader>,
        code_executor: Arc<dyn CodeExecutor>,
        user_io: Arc<dyn UserIo>,
    ) -> Self {
        Self {
            short_term_memory: Arc::new(Mutex::new(ShortTermMemory::new())),
            file_reader,
            code_executor,
            user_io,
        }
    }
}
