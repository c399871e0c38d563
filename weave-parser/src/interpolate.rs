//! Post-parse `{{var}}` interpolation against the variables map and a
//! synthetic `input` variable.

use regex::Regex;
use std::collections::HashMap;

/// Replace every `{{name}}` occurrence in `text` with `variables[name]`,
/// falling back to `input` for the synthetic `input` variable. A
/// placeholder with no resolving entry is left as-is.
pub fn interpolate(text: &str, variables: &HashMap<String, String>, input: &str) -> String {
    let re = Regex::new(r"\{\{(\w+)\}\}").unwrap();
    re.replace_all(text, |caps: &regex::Captures| {
        let name = &caps[1];
        if name == "input" {
            input.to_string()
        } else if let Some(value) = variables.get(name) {
            value.clone()
        } else {
            caps[0].to_string()
        }
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_known_variables() {
        let mut vars = HashMap::new();
        vars.insert("greeting".to_string(), "hello".to_string());
        assert_eq!(interpolate("{{greeting}} world", &vars, ""), "hello world");
    }

    #[test]
    fn substitutes_synthetic_input_variable() {
        let vars = HashMap::new();
        assert_eq!(interpolate("say {{input}}", &vars, "hi"), "say hi");
    }

    #[test]
    fn leaves_unresolved_placeholders_in_place() {
        let vars = HashMap::new();
        assert_eq!(interpolate("{{unknown}} text", &vars, ""), "{{unknown}} text");
    }
}
