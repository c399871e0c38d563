//! Splits comment-stripped, variable-free agent file content into
//! `# label` sections.

use regex::Regex;

/// Split `text` into `(label, body)` pairs, one per `# label` header line.
/// A section's body runs from just after its header to just before the
/// next header (or end of file), with a single trailing newline trimmed.
pub fn split_sections(text: &str) -> Vec<(String, String)> {
    let header_re = Regex::new(r"(?m)^# (\w+)[ \t]*$").unwrap();
    let headers: Vec<_> = header_re.captures_iter(text).collect();
    let mut sections = Vec::with_capacity(headers.len());

    for (i, caps) in headers.iter().enumerate() {
        let label = caps.get(1).unwrap().as_str().to_string();
        let header_match = caps.get(0).unwrap();
        let mut body_start = header_match.end();
        if text[body_start..].starts_with("\r\n") {
            body_start += 2;
        } else if text[body_start..].starts_with('\n') {
            body_start += 1;
        }
        let body_end = headers
            .get(i + 1)
            .map(|next| next.get(0).unwrap().start())
            .unwrap_or(text.len());

        let mut body = text[body_start..body_end].to_string();
        if body.ends_with('\n') {
            body.pop();
            if body.ends_with('\r') {
                body.pop();
            }
        }
        sections.push((label, body));
    }
    sections
}
