//! Loads the native tool catalogue from a `native_tools.toml` file.
//!
//! The catalogue describes each built-in tool's name, description, and
//! parameters for the executor's few-shot block and system prompt — it is
//! loaded independently of [`crate::registry::ToolRegistry`] registration
//! so the descriptions shown to the model can be tuned without a rebuild.

use serde::Deserialize;
use weave_core::error::ToolError;
use weave_core::state::CatalogueEntry;

#[derive(Debug, Deserialize)]
struct TomlCatalogue {
    #[serde(default, rename = "instruction")]
    instruction: Vec<TomlInstruction>,
}

#[derive(Debug, Deserialize)]
struct TomlInstruction {
    name: String,
    description: String,
    #[serde(default)]
    parameters: Vec<TomlParameter>,
}

#[derive(Debug, Deserialize)]
struct TomlParameter {
    name: String,
    description: String,
}

/// Parse `native_tools.toml` source text into catalogue entries.
pub fn parse_catalogue(text: &str) -> Result<Vec<CatalogueEntry>, ToolError> {
    let parsed: TomlCatalogue =
        toml::from_str(text).map_err(|err| ToolError::InvalidInput(err.to_string()))?;
    Ok(parsed
        .instruction
        .into_iter()
        .map(|entry| CatalogueEntry {
            name: entry.name,
            description: entry.description,
            parameters: entry
                .parameters
                .into_iter()
                .map(|p| (p.name, p.description))
                .collect(),
        })
        .collect())
}

/// Load and parse `native_tools.toml` from disk.
pub fn load_catalogue(path: impl AsRef<std::path::Path>) -> Result<Vec<CatalogueEntry>, ToolError> {
    let text = std::fs::read_to_string(path.as_ref())
        .map_err(|err| ToolError::ExecutionFailed(format!("reading {}: {err}", path.as_ref().display())))?;
    parse_catalogue(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_instructions_and_parameters() {
        let text = r#"
[[instruction]]
name = "memory"
description = "Remember a piece of content under a keyword for later recall."

[[instruction.parameters]]
name = "keyword"
description = "short key to file this memory under"

[[instruction.parameters]]
name = "content"
description = "the content to remember"

[[instruction]]
name = "send_message"
description = "Display a message to the user."

[[instruction.parameters]]
name = "message"
description = "message to display"
"#;
        let catalogue = parse_catalogue(text).unwrap();
        assert_eq!(catalogue.len(), 2);
        assert_eq!(catalogue[0].name, "memory");
        assert_eq!(catalogue[0].parameters.len(), 2);
        assert_eq!(catalogue[0].parameters[0], ("keyword".to_string(), "short key to file this memory under".to_string()));
        assert_eq!(catalogue[1].name, "send_message");
    }

    #[test]
    fn missing_instruction_array_yields_empty_catalogue() {
        let catalogue = parse_catalogue("").unwrap();
        assert!(catalogue.is_empty());
    }

    #[test]
    fn workspace_native_tools_toml_lists_all_eight_builtins() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../native_tools.toml");
        let catalogue = load_catalogue(path).unwrap();
        let mut names: Vec<&str> = catalogue.iter().map(|e| e.name.as_str()).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "append_file",
                "execute_bash_command",
                "execute_python_script",
                "memory",
                "read_file",
                "send_message",
                "user_input",
                "write_file",
            ]
        );
    }
}
