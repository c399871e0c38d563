#![deny(missing_docs)]
//! The Agent Executor: a loop-based instruction interpreter over an
//! explicit call stack, the assistant-response parser it drives, and the
//! few-shot summarizer used to keep the active-instructions catalogue short.

mod executor;
mod parse;
mod summarizer;

pub use executor::{AgentExecutor, Usage};
pub use parse::{extract_named_call, strip_return_token};
pub use summarizer::{summarize, word_count, SUMMARIZER_TEMPERATURE};
