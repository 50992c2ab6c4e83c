//! Integration tests running every renderer over an IEEE 2030.5 subset
//!
//! Fixtures live in `tests/fixtures/`: `sep_subset.xsd` mirrors the shape of
//! the real schema (extension chains, documentation-mined enumerations,
//! facet enumerations, a hex-encoded bitmap) and `sample.wadl` describes the
//! end device resources.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::path::PathBuf;

use xsd_semantic::api::ApiModel;
use xsd_semantic::limits::Limits;
use xsd_semantic::render::{
    compose_openapi, render_context, render_json_schema, render_rdf_schema, render_shacl,
    OpenApiOptions, RenderOptions,
};
use xsd_semantic::schema::{EnumRange, SchemaModel, SchemaParser, TypeKind};
use xsd_semantic::writer::{to_json_string, to_yaml_string};
use xsd_semantic::Error;

fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn model() -> SchemaModel {
    SchemaModel::from_file(fixture("sep_subset.xsd")).expect("fixture schema parses")
}

fn api() -> ApiModel {
    ApiModel::from_file(fixture("sample.wadl")).expect("fixture WADL parses")
}

fn property_shape<'a>(shacl: &'a Value, shape: &str, path: &str) -> &'a Value {
    shacl["@graph"]
        .as_array()
        .unwrap()
        .iter()
        .find(|node| node["@id"] == json!(shape))
        .unwrap_or_else(|| panic!("missing shape {}", shape))["sh:property"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["sh:path"]["@id"] == json!(path))
        .unwrap_or_else(|| panic!("missing property {} on {}", path, shape))
}

// ============================================================================
// Schema model
// ============================================================================

#[test]
fn test_registry_and_base_uri() {
    let model = model();

    assert_eq!(model.target_namespace(), Some("urn:ieee:std:2030.5:ns"));
    assert_eq!(model.base_uri(), "https://ieee/std/2030.5/ns/");

    let complex: Vec<_> = model
        .types()
        .filter(|t| t.kind == TypeKind::Complex)
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(
        complex,
        vec![
            "Resource",
            "Link",
            "ListLink",
            "List",
            "SubscribableResource",
            "AbstractDevice",
            "EndDevice",
            "EndDeviceList"
        ]
    );

    let roots: Vec<_> = model.root_elements().map(|e| e.name.as_str()).collect();
    assert_eq!(roots, vec!["EndDevice", "EndDeviceList"]);
    assert!(model.diagnostics().is_empty());
}

#[test]
fn test_file_size_limit() {
    let strict = SchemaParser::new().with_limits(Limits::strict());
    assert!(strict.parse_file(fixture("sep_subset.xsd")).is_ok());

    let tiny = SchemaParser::new().with_limits(Limits::strict().with_max_size(64));
    assert!(matches!(
        tiny.parse_file(fixture("sep_subset.xsd")),
        Err(Error::LimitExceeded(_))
    ));
}

#[test]
fn test_facets_yield_one_value_each() {
    let model = model();
    let kind = model.get_type("ServiceKind").unwrap();
    let values = kind.annotation.values.as_ref().unwrap();

    let pairs: Vec<_> = values.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    assert_eq!(
        pairs,
        vec![("0", "Electricity"), ("1", "Gas"), ("2", "Water"), ("3", "3")]
    );
    assert_eq!(kind.documentation.as_deref(), Some("Service kind"));
}

#[test]
fn test_default_note_is_stripped() {
    let model = model();
    let values = model
        .get_type("CurrencyCode")
        .unwrap()
        .annotation
        .values
        .clone()
        .unwrap();
    assert_eq!(values["0"], "Not Applicable");
}

#[test]
fn test_reserved_range() {
    let model = model();
    let subscribable = &model.get_type("SubscribableType").unwrap().annotation;

    assert_eq!(
        subscribable.ranges.as_deref(),
        Some(
            &[EnumRange {
                start: 4,
                end: 255,
                description: "Reserved".to_string()
            }][..]
        )
    );
    let values = subscribable.values.as_ref().unwrap();
    assert_eq!(values.len(), 4);
    assert!(!values.contains_key("4"));
}

// ============================================================================
// Renderers
// ============================================================================

#[test]
fn test_rendering_is_reproducible() {
    let options = RenderOptions::default();
    let openapi = OpenApiOptions::default();

    let first = {
        let model = model();
        let api = api();
        vec![
            render_context(&model, &options),
            render_rdf_schema(&model, &options),
            render_shacl(&model, &options),
            render_json_schema(&model, &options),
            compose_openapi(&model, Some(&api), &openapi),
        ]
    };
    let second = {
        let model = model();
        let api = api();
        vec![
            render_context(&model, &options),
            render_rdf_schema(&model, &options),
            render_shacl(&model, &options),
            render_json_schema(&model, &options),
            compose_openapi(&model, Some(&api), &openapi),
        ]
    };

    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(to_json_string(a).unwrap(), to_json_string(b).unwrap());
    }
    assert_eq!(
        to_yaml_string(&first[4], true).unwrap(),
        to_yaml_string(&second[4], true).unwrap()
    );
}

#[test]
fn test_context_terms() {
    let context = render_context(&model(), &RenderOptions::default());
    let terms = context["@context"].as_object().unwrap();

    assert_eq!(terms["@vocab"], json!("https://ieee/std/2030.5/ns/"));
    assert!(terms.contains_key("EndDevice"));
    assert!(terms.contains_key("changedTime"));
    assert_eq!(terms["string"], json!("xsd:string"));
}

#[test]
fn test_rdf_subclass_chain() {
    let schema = render_rdf_schema(&model(), &RenderOptions::default());
    let end_device = schema["@graph"]
        .as_array()
        .unwrap()
        .iter()
        .find(|n| n["@id"] == json!("https://ieee/std/2030.5/ns/EndDevice"))
        .unwrap();

    assert_eq!(
        end_device["rdfs:subClassOf"],
        json!({"@id": "https://ieee/std/2030.5/ns/AbstractDevice"})
    );
}

#[test]
fn test_shacl_unsigned_byte_enum() {
    let shacl = render_shacl(&model(), &RenderOptions::default());
    let reduction = property_shape(&shacl, "EndDeviceShape", "loadReduction");

    assert_eq!(reduction["sh:in"], json!([0, 1]));
    assert_eq!(reduction["sh:minInclusive"], json!(0));
    assert_eq!(reduction["sh:maxInclusive"], json!(255));
    assert_eq!(reduction["sh:maxCount"], json!(1));
    assert!(reduction.get("sh:minCount").is_none());
}

#[test]
fn test_shacl_reserved_range_is_open() {
    let shacl = render_shacl(&model(), &RenderOptions::default());
    let subscribable = property_shape(&shacl, "SubscribableResourceShape", "subscribable");

    assert!(subscribable.get("sh:in").is_none());
    assert_eq!(subscribable["sh:maxInclusive"], json!(255));
}

#[test]
fn test_json_schema_bitmap() {
    let schema = render_json_schema(&model(), &RenderOptions::default());
    let category = &schema["definitions"]["AbstractDevice"]["properties"]["deviceCategory"];

    assert!(category.get("enum").is_none());
    assert_eq!(category["type"], json!("string"));
    assert_eq!(category["format"], json!("hexBinary"));
    assert_eq!(category["pattern"], json!("^[0-9A-Fa-f]{1,8}$"));
    assert_eq!(category["x-bit-positions"]["1"], json!("Strip Heaters"));
}

#[test]
fn test_json_schema_required_and_refs() {
    let schema = render_json_schema(&model(), &RenderOptions::default());
    let list = &schema["definitions"]["EndDeviceList"];

    assert_eq!(list["required"], json!([]));
    assert_eq!(
        list["properties"]["EndDevice"],
        json!({"type": "array", "items": {"$ref": "#/definitions/EndDevice"}})
    );
    assert_eq!(
        schema["definitions"]["AbstractDevice"]["required"],
        json!(["sFDI"])
    );
}

// ============================================================================
// OpenAPI
// ============================================================================

#[test]
fn test_openapi_path_parameter() {
    let api = api();
    let doc = compose_openapi(&model(), Some(&api), &OpenApiOptions::default());

    let get = &doc["paths"]["/edev/{mrid}"]["get"];
    assert_eq!(
        get["parameters"],
        json!([{
            "name": "mrid",
            "in": "path",
            "required": true,
            "schema": {"type": "string"}
        }])
    );
    assert_eq!(get["operationId"], json!("getEndDevice"));
}

#[test]
fn test_openapi_paths_from_wadl() {
    let api = api();
    let doc = compose_openapi(&model(), Some(&api), &OpenApiOptions::default());

    assert_eq!(
        doc["servers"],
        json!([{"url": "http://example.com/sep", "description": "IEEE 2030.5 API Server"}])
    );

    let list = doc["paths"]["/edev"].as_object().unwrap();
    let verbs: Vec<_> = list.keys().map(String::as_str).collect();
    assert_eq!(verbs, vec!["get", "post"]);

    let query: Vec<_> = list["get"]["parameters"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| (p["name"].clone(), p["schema"]["type"].clone()))
        .collect();
    assert_eq!(
        query,
        vec![(json!("s"), json!("integer")), (json!("l"), json!("integer"))]
    );

    assert_eq!(
        list["post"]["requestBody"]["content"]["application/sep+xml"]["schema"],
        json!({"$ref": "#/components/schemas/EndDevice"})
    );
}

#[test]
fn test_openapi_enum_descriptions() {
    let doc = compose_openapi(&model(), None, &OpenApiOptions::default());
    let currency = &doc["components"]["schemas"]["EndDevice"]["properties"]["currency"];

    let description = currency["description"].as_str().unwrap();
    assert!(description.contains("Enum values:"));
    assert!(description.contains("840: US Dollar"));
}

#[test]
fn test_openapi_without_context() {
    let options = OpenApiOptions::new().with_embed_context(false);
    let doc = compose_openapi(&model(), None, &options);

    assert!(doc.get("x-jsonld-context").is_none());
    assert!(doc["components"]["schemas"]
        .as_object()
        .unwrap()
        .contains_key("EndDeviceList"));
}
