//! `Instruction`: a single parsed entry of an agent file.

use serde::{Deserialize, Serialize};

/// The default sampling temperature for an instruction that does not
/// declare one explicitly (the parser never emits a `## temperature:`
/// directive — temperature is fixed at parse time).
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// The default `input_prompt` used when no `## input:` directive is present.
pub const DEFAULT_INPUT_PROMPT: &str = "Content in a plain text to send to the function.";

/// A single named instruction parsed from an agent file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// Unique name.
    pub label: String,
    /// Prompt template with `{{variable}}` holes, directives stripped.
    pub prompt: String,
    /// Human description of what an inbound caller should pass as input.
    pub input_prompt: String,
    /// Sampling temperature in `[0, 2]`.
    pub temperature: f32,
    /// Labels this instruction may call — other instructions or native tools.
    pub use_labels: Vec<String>,
    /// If false, working memory for this instruction is discarded on return.
    pub keep_context: bool,
    /// If `> 0`, working memory is truncated to this many messages before
    /// each LLM call. `0` means unbounded.
    pub max_context: usize,
}

impl Instruction {
    /// Build an instruction with the parser's documented defaults for every
    /// field besides label and prompt.
    pub fn new(label: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            prompt: prompt.into(),
            input_prompt: DEFAULT_INPUT_PROMPT.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            use_labels: Vec::new(),
            keep_context: true,
            max_context: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_applies_documented_defaults() {
        let inst = Instruction::new("root", "hello {{x}}");
        assert_eq!(inst.input_prompt, DEFAULT_INPUT_PROMPT);
        assert_eq!(inst.temperature, DEFAULT_TEMPERATURE);
        assert!(inst.use_labels.is_empty());
        assert!(inst.keep_context);
        assert_eq!(inst.max_context, 0);
    }
}
