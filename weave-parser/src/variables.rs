//! Variable block extraction: `{{name}}...{{/name}}`.
//!
//! The source this is based on matches this with a single backreferencing
//! regex (`\{\{(\w+)\}\}([\s\S]*?)\{\{/\1\}\}`). Rust's `regex` crate has
//! no backreference support, so the scan is hand-rolled instead: find an
//! opening `{{name}}` tag, then search for its matching `{{/name}}`
//! closing tag. A `{{name}}` with no matching close tag is left in place —
//! it is a plain interpolation placeholder, not a variable definition.

use regex::Regex;
use std::collections::HashMap;

/// Extract every `{{name}}...{{/name}}` block from `text`, returning the
/// text with those blocks removed and a `name -> trimmed value` map.
pub fn extract_variable_blocks(text: &str) -> (String, HashMap<String, String>) {
    let open_re = Regex::new(r"\{\{(\w+)\}\}").unwrap();
    let mut content = text.to_string();
    let mut variables = HashMap::new();
    let mut search_from = 0usize;

    loop {
        let Some(caps) = open_re.captures_at(&content, search_from) else {
            break;
        };
        let whole = caps.get(0).unwrap();
        let name = caps.get(1).unwrap().as_str().to_string();
        let close_tag = format!("{{{{/{name}}}}}");

        match content[whole.end()..].find(&close_tag) {
            Some(offset) => {
                let value_start = whole.end();
                let value_end = whole.end() + offset;
                let value = trim_newlines(&content[value_start..value_end]);
                let block_end = value_end + close_tag.len();
                variables.insert(name, value);
                content.replace_range(whole.start()..block_end, "");
                search_from = 0;
            }
            None => {
                search_from = whole.end();
            }
        }
    }

    let content = content.trim_end_matches(['\r', '\n']).to_string();
    (content, variables)
}

fn trim_newlines(s: &str) -> String {
    s.trim_matches(|c: char| c == '\r' || c == '\n').to_string()
}
