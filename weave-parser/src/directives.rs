//! Per-line directive extraction, operating on a section's remaining body
//! text after comments have been stripped and variable blocks removed.

use regex::Regex;
use weave_core::error::ParseError;
use weave_core::instruction::DEFAULT_INPUT_PROMPT;

/// Extract the `## input:` directive, removing its line from the body.
/// Returns the documented default when absent.
pub fn extract_input(text: &str) -> (String, String) {
    let re = Regex::new(r"^##\s*input:\s*(.+?)\s*$").unwrap();
    let mut remaining = String::new();
    let mut input_prompt = DEFAULT_INPUT_PROMPT.to_string();
    for line in text.lines() {
        if let Some(caps) = re.captures(line) {
            input_prompt = caps.get(1).unwrap().as_str().to_string();
        } else {
            remaining.push_str(line);
            remaining.push('\n');
        }
    }
    (input_prompt, remaining)
}

/// Extract the `## use:` directive, which may continue onto following
/// lines as long as each continuation line is blank or starts with
/// whitespace. Names are comma-separated and individually trimmed.
pub fn extract_use(text: &str) -> (Vec<String>, String) {
    let re = Regex::new(r"(?i)^##\s*use:\s*(.*)$").unwrap();
    let mut remaining = String::new();
    let mut names = Vec::new();
    let mut in_use_section = false;
    let mut use_section = String::new();

    let flush = |use_section: &str, names: &mut Vec<String>| {
        for name in use_section.split(',') {
            let trimmed = name.trim();
            if !trimmed.is_empty() {
                names.push(trimmed.to_string());
            }
        }
    };

    for line in text.lines() {
        if in_use_section {
            let is_continuation =
                line.is_empty() || line.trim_start().is_empty() || line.starts_with(' ');
            if is_continuation {
                use_section.push(' ');
                use_section.push_str(line);
            } else {
                flush(&use_section, &mut names);
                use_section.clear();
                in_use_section = false;
                remaining.push_str(line);
                remaining.push('\n');
            }
        } else if let Some(caps) = re.captures(line) {
            in_use_section = true;
            use_section = caps.get(1).unwrap().as_str().to_string();
        } else {
            remaining.push_str(line);
            remaining.push('\n');
        }
    }
    if !use_section.is_empty() {
        flush(&use_section, &mut names);
    }
    (names, remaining)
}

/// Extract the `## keep_context:` directive. Defaults to `true`.
pub fn extract_keep_context(text: &str) -> (bool, String) {
    let re = Regex::new(r"^##\s*keep_context:\s*(true|false)\s*$").unwrap();
    let mut remaining = String::new();
    let mut keep_context = true;
    for line in text.lines() {
        if let Some(caps) = re.captures(line) {
            keep_context = caps.get(1).unwrap().as_str() == "true";
        } else {
            remaining.push_str(line);
            remaining.push('\n');
        }
    }
    (keep_context, remaining)
}

/// Extract the `## max_context:` directive. Defaults to `0` (unbounded).
pub fn extract_max_context(text: &str) -> Result<(usize, String), ParseError> {
    let re = Regex::new(r"^##\s*max_context:\s*(\d+)\s*$").unwrap();
    let mut remaining = String::new();
    let mut max_context = 0usize;
    for line in text.lines() {
        if let Some(caps) = re.captures(line) {
            let raw = caps.get(1).unwrap().as_str();
            max_context = raw
                .parse()
                .map_err(|_| ParseError::InvalidMaxContext(raw.to_string()))?;
        } else {
            remaining.push_str(line);
            remaining.push('\n');
        }
    }
    Ok((max_context, remaining))
}
