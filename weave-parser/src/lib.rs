#![deny(missing_docs)]
//! Parser for `.gen` agent files.
//!
//! An agent file is plain text made of `///` comment lines (stripped
//! outright), `{{name}}...{{/name}}` variable blocks (extracted before
//! sectioning), and `# label` sections. Each section's body may carry
//! `## input:`, `## use:`, `## keep_context:` and `## max_context:`
//! directives, extracted in that order; whatever text is left becomes the
//! instruction's prompt. A later `interpolate` pass resolves `{{var}}`
//! references against the extracted variables and a synthetic `input`
//! variable.

pub mod directives;
pub mod interpolate;
pub mod sections;
pub mod variables;

use std::collections::HashMap;
use std::path::Path;

use weave_core::error::ParseError;
use weave_core::instruction::Instruction;

pub use interpolate::interpolate;

/// The parsed contents of an agent file: its variable definitions and its
/// named instructions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFile {
    /// Variables extracted from `{{name}}...{{/name}}` blocks.
    pub variables: HashMap<String, String>,
    /// Instructions extracted from `# label` sections, keyed by label.
    pub instructions: HashMap<String, Instruction>,
}

fn strip_comments(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("///"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse agent file source text into a [`ParsedFile`].
pub fn parse_str(text: &str) -> Result<ParsedFile, ParseError> {
    let stripped = strip_comments(text);
    let (content, variables) = variables::extract_variable_blocks(&stripped);

    let mut instructions = HashMap::new();
    for (label, body) in sections::split_sections(&content) {
        let (input_prompt, body) = directives::extract_input(&body);
        let (use_labels, body) = directives::extract_use(&body);
        let (keep_context, body) = directives::extract_keep_context(&body);
        let (max_context, body) = directives::extract_max_context(&body)?;

        let prompt = body.trim().to_string();
        let mut instruction = Instruction::new(label.clone(), prompt);
        instruction.input_prompt = input_prompt;
        instruction.use_labels = use_labels;
        instruction.keep_context = keep_context;
        instruction.max_context = max_context;
        instructions.insert(label, instruction);
    }

    Ok(ParsedFile {
        variables,
        instructions,
    })
}

/// Load and parse an agent file from disk. The path must have a `.gen`
/// extension.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<ParsedFile, ParseError> {
    let path = path.as_ref();
    let has_gen_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("gen"))
        .unwrap_or(false);
    if !has_gen_extension {
        return Err(ParseError::UnsupportedExtension(
            path.display().to_string(),
        ));
    }

    let text = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_str(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_core::instruction::{DEFAULT_INPUT_PROMPT, DEFAULT_TEMPERATURE};

    #[test]
    fn parses_defaults_when_no_directives_present() {
        let text = "# root\nJust say hello.";
        let parsed = parse_str(text).unwrap();
        let root = parsed.instructions.get("root").unwrap();
        assert!(root.use_labels.is_empty());
        assert!(root.keep_context);
        assert_eq!(root.max_context, 0);
        assert_eq!(root.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(root.input_prompt, DEFAULT_INPUT_PROMPT);
        assert_eq!(root.prompt, "Just say hello.");
    }

    #[test]
    fn parses_full_grammar_with_variables_and_multiple_instructions() {
        let text = "\
/// this is a comment, ignored entirely
{{persona}}
You are a careful assistant.
{{/persona}}

# root
{{persona}}
## use: summarize, search
## keep_context: false
## max_context: 5
## input: the user's question
Answer the question: {{input}}

# summarize
## input: text to summarize
Summarize this: {{input}}
";
        let parsed = parse_str(text).unwrap();

        assert_eq!(
            parsed.variables.get("persona").unwrap(),
            "You are a careful assistant."
        );

        let root = parsed.instructions.get("root").unwrap();
        assert_eq!(root.use_labels, vec!["summarize", "search"]);
        assert!(!root.keep_context);
        assert_eq!(root.max_context, 5);
        assert_eq!(root.input_prompt, "the user's question");
        assert!(root.prompt.contains("Answer the question: {{input}}"));
        assert!(root.prompt.contains("{{persona}}"));

        let summarize = parsed.instructions.get("summarize").unwrap();
        assert_eq!(summarize.input_prompt, "text to summarize");
        assert_eq!(summarize.prompt, "Summarize this: {{input}}");

        let rendered = interpolate(&root.prompt, &parsed.variables, "why is the sky blue?");
        assert_eq!(
            rendered,
            "You are a careful assistant.\nAnswer the question: why is the sky blue?"
        );
    }

    #[test]
    fn load_from_file_rejects_non_gen_extension() {
        let err = load_from_file("/tmp/not-an-agent.txt").unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedExtension(_)));
    }

    #[test]
    fn load_from_file_reads_and_parses_a_gen_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent.gen");
        std::fs::write(&path, "# root\nhello").unwrap();

        let parsed = load_from_file(&path).unwrap();
        assert_eq!(parsed.instructions.get("root").unwrap().prompt, "hello");
    }
}
