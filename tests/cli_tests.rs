//! CLI integration tests
//!
//! These tests verify the CLI commands work correctly by running the binary.

#![cfg(feature = "cli")]

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_xsd-semantic"))
}

fn fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path.to_string_lossy().into_owned()
}

fn run(args: &[&str]) -> Output {
    Command::new(bin())
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn read_json(path: &Path) -> Value {
    let text = fs::read_to_string(path).expect("output file exists");
    serde_json::from_str(&text).expect("output is JSON")
}

// ============================================================================
// Generator Commands
// ============================================================================

#[test]
fn test_cli_jsonld_context() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("context.jsonld");

    let output = run(&[
        "jsonld-context",
        &fixture("sep_subset.xsd"),
        out.to_str().unwrap(),
        "--shacl-file-url",
        "https://example.com/shapes.jsonld",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "jsonld-context should succeed");
    assert!(stdout.contains("✓ Generated:"), "should report output file");

    let context = read_json(&out);
    assert_eq!(
        context["@context"]["@shacl"],
        Value::from("https://example.com/shapes.jsonld")
    );
    assert!(context["@context"].get("changedTime").is_some());
}

#[test]
fn test_cli_jsonld_context_exclude_schema() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("context.jsonld");

    let output = run(&[
        "jsonld-context",
        &fixture("sep_subset.xsd"),
        out.to_str().unwrap(),
        "--exclude-schema",
    ]);
    assert!(output.status.success());

    let context = read_json(&out);
    assert!(context["@context"].get("changedTime").is_none());
    assert!(context["@context"].get("EndDevice").is_some());
}

#[test]
fn test_cli_jsonld_schema_base_uri() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("schema.jsonld");

    let output = run(&[
        "jsonld-schema",
        &fixture("sep_subset.xsd"),
        out.to_str().unwrap(),
        "--base-uri",
        "https://example.com/sep#",
        "--exclude-docs",
    ]);
    assert!(output.status.success());

    let schema = read_json(&out);
    let graph = schema["@graph"].as_array().unwrap();
    assert!(graph
        .iter()
        .any(|n| n["@id"] == Value::from("https://example.com/sep#EndDevice")));
    assert!(graph.iter().all(|n| n.get("rdfs:comment").is_none()));
}

#[test]
fn test_cli_shacl() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("shapes.jsonld");

    let output = run(&["shacl", &fixture("sep_subset.xsd"), out.to_str().unwrap()]);
    assert!(output.status.success());

    let shapes = read_json(&out);
    assert!(shapes["@graph"]
        .as_array()
        .unwrap()
        .iter()
        .any(|n| n["@id"] == Value::from("EndDeviceShape")));
}

#[test]
fn test_cli_json_schema_yaml() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("schema.yaml");

    let output = run(&["json-schema", &fixture("sep_subset.xsd"), out.to_str().unwrap()]);
    assert!(output.status.success());

    let text = fs::read_to_string(&out).unwrap();
    assert!(!text.starts_with('#'), "only OpenAPI output is decorated");
    let schema: Value = serde_yaml::from_str(&text).unwrap();
    assert!(schema["definitions"].get("EndDevice").is_some());
}

// ============================================================================
// OpenAPI Command
// ============================================================================

#[test]
fn test_cli_openapi_embedded_context() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("openapi.json");

    let output = run(&[
        "openapi",
        &fixture("sep_subset.xsd"),
        out.to_str().unwrap(),
        "--wadl-file",
        &fixture("sample.wadl"),
        "--api-title",
        "SEP Test API",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "openapi should succeed");
    assert!(stdout.contains("(with embedded context)"));

    let doc = read_json(&out);
    assert_eq!(doc["info"]["title"], Value::from("SEP Test API"));
    assert!(doc["paths"].get("/edev/{mrid}").is_some());
    assert!(doc["x-jsonld-context"].is_object());
}

#[test]
fn test_cli_openapi_external_context_yaml() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("openapi.yaml");
    let context = dir.path().join("contexts").join("sep.jsonld");
    fs::create_dir_all(context.parent().unwrap()).unwrap();

    let output = run(&[
        "openapi",
        &fixture("sep_subset.xsd"),
        out.to_str().unwrap(),
        "--context-output-file",
        context.to_str().unwrap(),
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert_eq!(stdout.matches("✓ Generated:").count(), 2);

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("# IEEE 2030.5 OpenAPI Specification"));
    assert!(text.contains("# JSON-LD Context Reference"));

    let doc: Value = serde_yaml::from_str(&text).unwrap();
    assert_eq!(doc["x-jsonld-context"], Value::from("contexts/sep.jsonld"));
    assert!(read_json(&context)["@context"].get("EndDevice").is_some());
}

#[test]
fn test_cli_openapi_exclude_context() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("openapi.json");

    let output = run(&[
        "openapi",
        &fixture("sep_subset.xsd"),
        out.to_str().unwrap(),
        "--exclude-context",
    ]);
    assert!(output.status.success());

    let doc = read_json(&out);
    assert!(doc.get("x-jsonld-context").is_none());
}

// ============================================================================
// Inspect Command Tests
// ============================================================================

#[test]
fn test_cli_inspect_basic() {
    let output = run(&["inspect", &fixture("sep_subset.xsd")]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "inspect should succeed");
    assert!(stdout.contains("xsd-semantic"), "should show version");
    assert!(stdout.contains("urn:ieee:std:2030.5:ns"), "should show namespace");
    assert!(stdout.contains("Complex Types: 8"), "should show complex type count");
    assert!(stdout.contains("Root Elements: 2"), "should show root element count");
}

#[test]
fn test_cli_inspect_json_output() {
    let output = run(&["inspect", "--json", &fixture("sep_subset.xsd")]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    let json: Value = serde_json::from_str(&stdout).expect("inspect --json prints JSON");
    assert_eq!(json["baseUri"], Value::from("https://ieee/std/2030.5/ns/"));
    assert_eq!(json["statistics"]["rootElements"], Value::from(2));
}

// ============================================================================
// Error Handling
// ============================================================================

#[test]
fn test_cli_missing_schema() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.json");

    let output = run(&["shacl", "does-not-exist.xsd", out.to_str().unwrap()]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("Error:"));
    assert!(!out.exists());
}

#[test]
fn test_cli_unwritable_output() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("missing").join("out.json");

    let output = run(&["shacl", &fixture("sep_subset.xsd"), out.to_str().unwrap()]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("cannot write"));
}
