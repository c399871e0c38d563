//! Extract the first fenced `json` block carrying a `name` field out of an
//! assistant response, and the `<<RETURN>>` stop-token protocol.

use regex::Regex;
use serde_json::Value;

const RETURN_TOKEN: &str = "<<RETURN>>";

/// The first fenced ` ```json ... ``` ` block in `content` whose parsed
/// object has a `name` field, alongside `content` truncated to end right
/// after that block (everything past it is discarded, per the parser's
/// "anything after the call is not part of the reasoning trace" rule).
/// Returns `None` if no block qualifies.
pub fn extract_named_call(content: &str) -> Option<(Value, String)> {
    let pattern = Regex::new(r"(?s)```json\n(\{.*?\})\n\s*```").expect("static pattern is valid");
    for captures in pattern.captures_iter(content) {
        let whole = captures.get(0).expect("capture 0 always matches");
        let json_text = &captures[1];
        if let Ok(value) = serde_json::from_str::<Value>(json_text) {
            if value.get("name").is_some() {
                return Some((value, content[..whole.end()].to_string()));
            }
        }
    }
    None
}

/// Strip the literal `<<RETURN>>` token from `content`, if present.
/// Returns the stripped text and whether the token was found.
pub fn strip_return_token(content: &str) -> (String, bool) {
    match content.find(RETURN_TOKEN) {
        Some(pos) => {
            let mut stripped = content.to_string();
            stripped.replace_range(pos..pos + RETURN_TOKEN.len(), "");
            (stripped, true)
        }
        None => (content.to_string(), false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_the_first_block_with_a_name_field() {
        let content = "reasoning...\n```json\n{\"name\": \"read_file\", \"file_path\": \"a.txt\"}\n```\ntrailing text";
        let (value, truncated) = extract_named_call(content).unwrap();
        assert_eq!(value["name"], "read_file");
        assert!(truncated.ends_with("```"));
        assert!(!truncated.contains("trailing text"));
    }

    #[test]
    fn skips_blocks_without_a_name_field() {
        let content = "```json\n{\"not_name\": 1}\n```\n```json\n{\"name\": \"memory\"}\n```";
        let (value, _) = extract_named_call(content).unwrap();
        assert_eq!(value["name"], "memory");
    }

    #[test]
    fn returns_none_when_no_block_qualifies() {
        assert!(extract_named_call("just plain text").is_none());
    }

    #[test]
    fn strip_return_token_removes_literal_marker() {
        let (stripped, found) = strip_return_token("done <<RETURN>> now");
        assert!(found);
        assert_eq!(stripped, "done  now");
    }

    #[test]
    fn strip_return_token_is_a_no_op_when_absent() {
        let (stripped, found) = strip_return_token("nothing here");
        assert!(!found);
        assert_eq!(stripped, "nothing here");
    }
}
