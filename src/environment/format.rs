//! Environment file format.
//!
//! An environment file is a YAML (or JSON) mapping with at most two
//! sections:
//!
//! ```yaml
//! parameters:
//!   flavor: m1.small
//! resource_registry:
//!   My::Server: OS::Nova::Server
//!   My::Stack: nested.yaml
//!   resources:
//!     db:
//!       My::Server: My::Database
//! ```

use crate::error::FormatError;
use serde_json::{Map, Value};

pub const PARAMETERS: &str = "parameters";
pub const RESOURCE_REGISTRY: &str = "resource_registry";

/// Known top-level sections.
pub const SECTIONS: [&str; 2] = [PARAMETERS, RESOURCE_REGISTRY];

/// Parse environment text into a body.
///
/// An empty document is an empty environment.
pub fn parse(text: &str) -> Result<Value, FormatError> {
    if text.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    let body: Value = serde_yaml::from_str(text)?;
    let body = match body {
        Value::Null => Value::Object(Map::new()),
        Value::Object(_) => body,
        other => return Err(FormatError::NotAMapping(kind(&other))),
    };

    if let Some(map) = body.as_object() {
        if let Some(section) = map.keys().find(|k| !SECTIONS.contains(&k.as_str())) {
            return Err(FormatError::UnknownSection(section.clone()));
        }
    }

    Ok(body)
}

/// Fill in an empty mapping for every missing section.
pub fn default_for_missing(body: &mut Value) {
    if let Value::Object(map) = body {
        for section in SECTIONS {
            map.entry(section).or_insert_with(|| Value::Object(Map::new()));
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_yaml() {
        let body = parse("resource_registry:\n  MyType: OS::Heat::None\n").unwrap();
        assert_eq!(body, json!({"resource_registry": {"MyType": "OS::Heat::None"}}));
    }

    #[test]
    fn test_parse_json() {
        let body = parse(r#"{"parameters": {"flavor": "m1.small"}}"#).unwrap();
        assert_eq!(body, json!({"parameters": {"flavor": "m1.small"}}));
    }

    #[test]
    fn test_empty_document_is_empty_environment() {
        assert_eq!(parse("").unwrap(), json!({}));
        assert_eq!(parse("~").unwrap(), json!({}));
    }

    #[test]
    fn test_malformed_text_fails() {
        assert!(matches!(parse("{{{"), Err(FormatError::Yaml(_))));
    }

    #[test]
    fn test_non_mapping_fails() {
        let err = parse("- a\n- b\n").unwrap_err();
        assert!(matches!(err, FormatError::NotAMapping("a list")));
    }

    #[test]
    fn test_unknown_section_fails() {
        let err = parse("resource_registry: {}\noutputs: {}\n").unwrap_err();
        match err {
            FormatError::UnknownSection(name) => assert_eq!(name, "outputs"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_default_for_missing_fills_sections() {
        let mut body = parse("parameters:\n  a: 1\n").unwrap();
        default_for_missing(&mut body);
        assert_eq!(body, json!({"parameters": {"a": 1}, "resource_registry": {}}));

        // Idempotent
        default_for_missing(&mut body);
        assert_eq!(body, json!({"parameters": {"a": 1}, "resource_registry": {}}));
    }
}
