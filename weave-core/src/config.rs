//! `RunConfig`: the single threaded-through configuration value that
//! replaces the source's global mutable flags.

use crate::duration::DurationMs;
use serde::{Deserialize, Serialize};

/// Connection settings for an LLM provider, as loaded from `config.toml`'s
/// `[llm]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmConnectionConfig {
    /// Provider endpoint URL.
    pub endpoint: Option<String>,
    /// API key.
    pub api_key: Option<String>,
    /// Model identifier.
    pub model: Option<String>,
}

/// Connection settings for a vector store, as loaded from `config.toml`'s
/// `[vdb]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VectorStoreConnectionConfig {
    /// Database name.
    pub dbname: Option<String>,
    /// Database user.
    pub user: Option<String>,
    /// Database password.
    pub password: Option<String>,
    /// Host address.
    pub hostaddr: Option<String>,
    /// Port.
    pub port: Option<u16>,
}

/// Run-scoped configuration: everything that was a global mutable flag or
/// a compile-time constant in the source this is based on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Verbose diagnostic logging.
    pub debug: bool,
    /// Timeout applied to LLM chat-completion requests.
    pub llm_request_timeout: DurationMs,
    /// Default sentences-per-chunk for the chunker's default policy.
    pub sentences_per_chunk: usize,
    /// Word limit passed to the few-shot summarizer.
    pub few_shot_word_limit: usize,
    /// System prompt template rendered by Update-State.
    pub system_prompt_template: String,
    /// LLM connection settings, if loaded from `config.toml`.
    pub llm: LlmConnectionConfig,
    /// Vector store connection settings, if loaded from `config.toml`.
    pub vdb: VectorStoreConnectionConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            debug: false,
            llm_request_timeout: DurationMs::from_secs(120),
            sentences_per_chunk: 20,
            few_shot_word_limit: 120,
            system_prompt_template: default_system_prompt_template().to_string(),
            llm: LlmConnectionConfig::default(),
            vdb: VectorStoreConnectionConfig::default(),
        }
    }
}

impl RunConfig {
    /// Parse a `config.toml` document into connection settings, keeping
    /// every other field at its default.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        #[derive(Deserialize)]
        struct Document {
            #[serde(default)]
            llm: LlmConnectionConfig,
            #[serde(default)]
            vdb: VectorStoreConnectionConfig,
        }
        let doc: Document = toml::from_str(text)?;
        Ok(Self {
            llm: doc.llm,
            vdb: doc.vdb,
            ..Self::default()
        })
    }
}

fn default_system_prompt_template() -> &'static str {
    "You are executing instruction '{{instruction_name}}'.\n\n\
{{instruction}}\n\n\
Short-term memory:\n{{short_term_memory}}\n\n\
Available instructions:\n{{instructions}}\n\n\
Call format example:\n{{instruction_call_few_shot}}"
}
