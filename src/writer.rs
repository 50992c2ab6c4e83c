//! Document output
//!
//! Rendered trees are written as pretty-printed JSON, or as YAML when the
//! output path ends in `.yaml`/`.yml`. YAML output of OpenAPI documents can
//! be decorated with section comments; the comments carry no data.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

/// Serialization of an output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Pretty-printed JSON, two-space indent
    #[default]
    Json,
    /// YAML
    Yaml,
}

impl OutputFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                OutputFormat::Yaml
            }
            _ => OutputFormat::Json,
        }
    }
}

const YAML_HEADER: &[&str] = &[
    "IEEE 2030.5 OpenAPI Specification",
    "Generated from XSD schema and WADL definition",
    "This spec includes JSON-LD context for semantic understanding of API terms",
];

/// Serialize `value` as pretty JSON
pub fn to_json_string(value: &Value) -> Result<String> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}

/// Serialize `value` as YAML, optionally with OpenAPI section comments
pub fn to_yaml_string(value: &Value, comments: bool) -> Result<String> {
    let yaml = serde_yaml::to_string(value)?;
    Ok(if comments { decorate(&yaml, value) } else { yaml })
}

/// Write `value` to `path` in `format`
pub fn write_document(
    value: &Value,
    path: impl AsRef<Path>,
    format: OutputFormat,
    comments: bool,
) -> Result<()> {
    let path = path.as_ref();
    let text = match format {
        OutputFormat::Json => to_json_string(value)?,
        OutputFormat::Yaml => to_yaml_string(value, comments)?,
    };
    fs::write(path, text).map_err(|e| Error::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    debug!(path = %path.display(), ?format, "wrote document");
    Ok(())
}

/// Mapping keys that receive a section comment
const SECTION_KEYS: &[&str] = &[
    "openapi",
    "info",
    "servers",
    "paths",
    "components",
    "x-jsonld-context",
    "schemas",
    "x-enum-descriptions",
];

/// The section key a YAML line opens, if any
fn section_key(trimmed: &str) -> Option<&'static str> {
    SECTION_KEYS.iter().copied().find(|key| {
        trimmed
            .strip_prefix(key)
            .map_or(false, |rest| rest == ":" || rest.starts_with(": "))
    })
}

/// Comment lines to place before a mapping key
fn section_comment(top: &str, indent: usize, key: &str, document: &Value) -> Option<&'static str> {
    if key == "x-enum-descriptions" {
        return Some("Enum value descriptions (bit positions and their meanings)");
    }
    match (indent, key) {
        (0, "openapi") => Some("OpenAPI Specification Version"),
        (0, "info") => Some("API Information"),
        (0, "servers") => Some("API Server URLs"),
        (0, "paths") => Some("API Endpoints (from WADL)"),
        (0, "components") => Some("Reusable Components"),
        (0, "x-jsonld-context") => Some(match document.get("x-jsonld-context") {
            Some(Value::String(_)) => {
                "JSON-LD Context Reference (IETF draft: draft-polli-restapi-ld-keywords)\n\
                 This references an external context file for semantic understanding of API terms."
            }
            _ => {
                "JSON-LD Context (IETF draft: draft-polli-restapi-ld-keywords)\n\
                 Embedded context for semantic understanding of API terms, enum values, and type relationships."
            }
        }),
        (2, "schemas") if top == "components" => Some("JSON Schema Definitions (from XSD)"),
        _ => None,
    }
}

fn decorate(yaml: &str, document: &Value) -> String {
    let mut out = String::with_capacity(yaml.len() + 1024);
    for line in YAML_HEADER {
        out.push_str("# ");
        out.push_str(line);
        out.push('\n');
    }

    let mut top = "";
    for line in yaml.lines() {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();
        let key = section_key(trimmed);
        if indent == 0 {
            top = key.unwrap_or("");
        }

        if let Some(comment) = key.and_then(|k| section_comment(top, indent, k, document)) {
            for comment_line in comment.lines() {
                out.push_str(&" ".repeat(indent));
                out.push_str("# ");
                out.push_str(comment_line);
                out.push('\n');
            }
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn openapi() -> Value {
        json!({
            "openapi": "3.0.0",
            "info": {"title": "T", "version": "1"},
            "servers": [{"url": "https://api.example.com"}],
            "paths": {},
            "components": {"schemas": {"A": {
                "type": "object",
                "properties": {"k": {"type": "integer", "x-enum-descriptions": {"0": "Off"}}}
            }}},
            "x-jsonld-context": "context.jsonld"
        })
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(OutputFormat::from_path("out/api.yaml"), OutputFormat::Yaml);
        assert_eq!(OutputFormat::from_path("api.YML"), OutputFormat::Yaml);
        assert_eq!(OutputFormat::from_path("api.json"), OutputFormat::Json);
        assert_eq!(OutputFormat::from_path("api"), OutputFormat::Json);
    }

    #[test]
    fn test_yaml_comments() {
        let yaml = to_yaml_string(&openapi(), true).unwrap();

        assert!(yaml.starts_with("# IEEE 2030.5 OpenAPI Specification\n"));
        assert!(yaml.contains("# API Information\ninfo:"));
        assert!(yaml.contains("# Reusable Components\ncomponents:"));
        assert!(yaml.contains("  # JSON Schema Definitions (from XSD)\n  schemas:"));
        assert!(yaml.contains("# Enum value descriptions (bit positions and their meanings)\n"));
        assert!(yaml.contains("# JSON-LD Context Reference"));
    }

    #[test]
    fn test_comments_need_exact_keys() {
        let value = json!({
            "components:v2": {"schemas": {}},
            "paths": {"/info:x": {}}
        });
        let yaml = to_yaml_string(&value, true).unwrap();

        assert!(!yaml.contains("# Reusable Components"));
        assert!(!yaml.contains("# JSON Schema Definitions"));
        assert!(!yaml.contains("# API Information"));
        assert!(yaml.contains("# API Endpoints (from WADL)\npaths:"));
    }

    #[test]
    fn test_comments_do_not_change_data() {
        let value = openapi();
        let yaml = to_yaml_string(&value, true).unwrap();
        let parsed: Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, value);

        let plain = to_yaml_string(&value, false).unwrap();
        assert!(!plain.contains('#'));
    }

    #[test]
    fn test_write_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ctx.jsonld");
        let value = json!({"@context": {"@vocab": "https://x/"}});

        write_document(&value, &path, OutputFormat::from_path(&path), false).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\n  \"@context\": {\n    \"@vocab\": \"https://x/\"\n  }\n}\n");
    }

    #[test]
    fn test_write_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.json");
        let err = write_document(&json!({}), &path, OutputFormat::Json, false).unwrap_err();
        assert!(matches!(err, Error::Write { .. }));
    }
}
