//! `ExecutorState`: the per-run keyed state consumed by template rendering.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One entry kept in [`ShortTermMemory`], written by the `memory` tool
/// handler and rendered into `ExecutorState::short_term_memory`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryNote {
    /// Key used to find and replace this note on a later `memory` call.
    pub keyword: String,
    /// Short human description of what `content` holds.
    pub description: String,
    /// The remembered content itself.
    pub content: String,
}

/// The executor's scratch memory: a list of [`MemoryNote`]s keyed by
/// `keyword`, serialized into `ExecutorState::short_term_memory` on every
/// Update-State pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShortTermMemory(Vec<MemoryNote>);

impl ShortTermMemory {
    /// An empty memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove any existing note with `note.keyword`, then append `note`.
    pub fn remember(&mut self, note: MemoryNote) {
        self.0.retain(|existing| existing.keyword != note.keyword);
        self.0.push(note);
    }

    /// The notes currently held, in insertion order.
    pub fn notes(&self) -> &[MemoryNote] {
        &self.0
    }

    /// Render as the JSON blob `ExecutorState::short_term_memory` expects.
    pub fn serialize(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_default()
    }
}

/// One entry in the active-instructions catalogue rendered into the
/// few-shot block and the system prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogueEntry {
    /// Instruction or native tool name.
    pub name: String,
    /// Description (the instruction's prompt, or its summarized form).
    pub description: String,
    /// Parameter descriptions, keyed by parameter name.
    pub parameters: Vec<(String, String)>,
}

/// The executor's per-run state. Spec describes this as "a string-keyed
/// map"; it is modeled here as a typed struct with named fields — matching
/// every field the spec names — plus [`ExecutorState::to_template_map`]
/// for `{{var}}` rendering, which is the only place the map-of-strings
/// view is actually needed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutorState {
    /// Label of the instruction currently executing.
    pub instruction_name: String,
    /// That instruction's prompt template text.
    pub instruction: String,
    /// Serialized short-term memory blob.
    pub short_term_memory: String,
    /// Serialized active-instructions catalogue.
    pub instructions: Vec<CatalogueEntry>,
    /// Generated few-shot example block.
    pub instruction_call_few_shot: String,
    /// Last assistant content (truncated at the parsed JSON call, if any).
    pub output: String,
    /// Whether the run has terminated.
    pub should_return: bool,
}

impl ExecutorState {
    /// Render the catalogue as the JSON blob the system prompt template
    /// expects under `{{instructions}}`.
    fn instructions_json(&self) -> String {
        serde_json::to_string(&self.instructions).unwrap_or_default()
    }

    /// Produce the `{{var}} -> value` map used to interpolate the system
    /// prompt template in Update-State.
    pub fn to_template_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("instruction_name".to_string(), self.instruction_name.clone());
        map.insert("instruction".to_string(), self.instruction.clone());
        map.insert("short_term_memory".to_string(), self.short_term_memory.clone());
        map.insert("instructions".to_string(), self.instructions_json());
        map.insert(
            "instruction_call_few_shot".to_string(),
            self.instruction_call_few_shot.clone(),
        );
        map.insert("output".to_string(), self.output.clone());
        map.insert(
            "return".to_string(),
            if self.should_return { "true" } else { "false" }.to_string(),
        );
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_map_reflects_return_flag() {
        let mut state = ExecutorState::default();
        assert_eq!(state.to_template_map()["return"], "false");
        state.should_return = true;
        assert_eq!(state.to_template_map()["return"], "true");
    }

    #[test]
    fn template_map_includes_every_documented_field() {
        let state = ExecutorState {
            instruction_name: "root".into(),
            instruction: "do thing".into(),
            ..Default::default()
        };
        let map = state.to_template_map();
        for key in [
            "instruction_name",
            "instruction",
            "short_term_memory",
            "instructions",
            "instruction_call_few_shot",
            "output",
            "return",
        ] {
            assert!(map.contains_key(key), "missing key {key}");
        }
    }

    #[test]
    fn short_term_memory_replaces_same_keyword() {
        let mut mem = ShortTermMemory::new();
        mem.remember(MemoryNote {
            keyword: "city".into(),
            description: "where the user lives".into(),
            content: "Berlin".into(),
        });
        mem.remember(MemoryNote {
            keyword: "city".into(),
            description: "where the user lives".into(),
            content: "Lisbon".into(),
        });
        assert_eq!(mem.notes().len(), 1);
        assert_eq!(mem.notes()[0].content, "Lisbon");
    }

    #[test]
    fn short_term_memory_serializes_to_json_array() {
        let mut mem = ShortTermMemory::new();
        mem.remember(MemoryNote {
            keyword: "k".into(),
            description: "d".into(),
            content: "c".into(),
        });
        assert_eq!(mem.serialize(), r#"[{"keyword":"k","description":"d","content":"c"}]"#);
    }
}
