//! OpenAPI 3.0 composition
//!
//! Component schemas come from the JSON Schema renderer with their
//! `#/definitions/` references rewritten. Paths come from an optional
//! [`ApiModel`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use super::{render_context, render_json_schema, RenderOptions};
use crate::api::{ApiModel, Method, Parameter, Representation, Resource};
use crate::names::local_name;
use crate::schema::SchemaModel;

/// OpenAPI version written into the document
pub const OPENAPI_VERSION: &str = "3.0.0";

const DEFINITIONS_PREFIX: &str = "#/definitions/";
const COMPONENTS_PREFIX: &str = "#/components/schemas/";
const DEFAULT_MEDIA_TYPE: &str = "application/json";
const HTTP_VERBS: &[&str] = &["get", "post", "put", "delete", "patch", "head", "options"];
const BODY_VERBS: &[&str] = &["post", "put", "patch"];

static PATH_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(\w+)\}").unwrap());

/// Options of the OpenAPI composer
#[derive(Debug, Clone)]
pub struct OpenApiOptions {
    api_title: String,
    api_version: String,
    embed_context: bool,
    external_context_path: Option<String>,
    render: RenderOptions,
}

impl Default for OpenApiOptions {
    fn default() -> Self {
        Self {
            api_title: "IEEE 2030.5 API".to_string(),
            api_version: "1.0.0".to_string(),
            embed_context: true,
            external_context_path: None,
            render: RenderOptions::default(),
        }
    }
}

impl OpenApiOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// `info.title`
    pub fn api_title(&self) -> &str {
        &self.api_title
    }

    /// `info.version`
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Whether `x-jsonld-context` is written
    pub fn embed_context(&self) -> bool {
        self.embed_context
    }

    /// Path written as `x-jsonld-context` instead of the context object
    pub fn external_context_path(&self) -> Option<&str> {
        self.external_context_path.as_deref()
    }

    /// Options passed to the JSON Schema and context renderers
    pub fn render_options(&self) -> &RenderOptions {
        &self.render
    }

    /// Set the API title
    pub fn with_api_title(mut self, title: impl Into<String>) -> Self {
        self.api_title = title.into();
        self
    }

    /// Set the API version
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Write or omit `x-jsonld-context`
    pub fn with_embed_context(mut self, embed: bool) -> Self {
        self.embed_context = embed;
        self
    }

    /// Reference the context by path rather than embedding it
    pub fn with_external_context_path(mut self, path: Option<String>) -> Self {
        self.external_context_path = path;
        self
    }

    /// Set the render options
    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }
}

/// Build an OpenAPI document from a schema and, optionally, a WADL model
pub fn compose_openapi(
    model: &SchemaModel,
    api: Option<&ApiModel>,
    options: &OpenApiOptions,
) -> Value {
    let render = options.render_options();

    let mut json_schema = render_json_schema(model, render);
    let mut schemas = match json_schema.get_mut("definitions").map(Value::take) {
        Some(Value::Object(definitions)) => definitions,
        _ => Map::new(),
    };
    for schema in schemas.values_mut() {
        rewrite_refs(schema);
    }

    let context = if options.embed_context() {
        let context_options = render
            .clone()
            .with_schema_relationships(true)
            .with_shacl_reference_url(None);
        match render_context(model, &context_options) {
            Value::Object(mut document) => match document.remove("@context") {
                Some(Value::Object(context)) => Some(context),
                _ => None,
            },
            _ => None,
        }
    } else {
        None
    };

    if let Some(context) = &context {
        if render.include_enumerations() {
            enrich_with_context(&mut schemas, context);
        }
    }

    let mut document = Map::new();
    document.insert("openapi".to_string(), Value::from(OPENAPI_VERSION));
    document.insert("info".to_string(), info(options, api.is_some()));
    document.insert("servers".to_string(), servers(api));
    document.insert(
        "paths".to_string(),
        Value::Object(api.map(|api| paths(api, &schemas)).unwrap_or_default()),
    );

    let mut components = Map::new();
    components.insert("schemas".to_string(), Value::Object(schemas));
    document.insert("components".to_string(), Value::Object(components));

    if let Some(context) = context {
        let value = match options.external_context_path() {
            Some(path) => Value::from(path),
            None => Value::Object(context),
        };
        document.insert("x-jsonld-context".to_string(), value);
    }

    debug!(
        paths = document["paths"].as_object().map_or(0, Map::len),
        with_api = api.is_some(),
        "composed OpenAPI document"
    );

    Value::Object(document)
}

fn info(options: &OpenApiOptions, with_api: bool) -> Value {
    let description = format!(
        "API specification generated from IEEE 2030.5 XSD schema{}. This OpenAPI spec validates JSON structure. For JSON-LD semantic validation, use SHACL shapes.",
        if with_api { " and WADL" } else { "" }
    );

    let mut contact = Map::new();
    contact.insert("name".to_string(), Value::from("IEEE 2030.5"));
    contact.insert(
        "url".to_string(),
        Value::from("https://standards.ieee.org/ieee/2030.5/"),
    );

    let mut info = Map::new();
    info.insert("title".to_string(), Value::from(options.api_title()));
    info.insert("version".to_string(), Value::from(options.api_version()));
    info.insert("description".to_string(), Value::String(description));
    info.insert("contact".to_string(), Value::Object(contact));
    Value::Object(info)
}

fn servers(api: Option<&ApiModel>) -> Value {
    let (url, description) = match api.and_then(|api| api.base_url.as_deref()) {
        Some(base) => (base.trim_end_matches('/'), "IEEE 2030.5 API Server"),
        None => ("https://api.example.com", "Production server"),
    };
    let mut server = Map::new();
    server.insert("url".to_string(), Value::from(url));
    server.insert("description".to_string(), Value::from(description));
    Value::Array(vec![Value::Object(server)])
}

/// Point `#/definitions/` references at `#/components/schemas/`
pub fn rewrite_refs(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(reference)) = map.get_mut("$ref") {
                if let Some(name) = reference.strip_prefix(DEFINITIONS_PREFIX) {
                    *reference = format!("{}{}", COMPONENTS_PREFIX, name);
                }
            }
            for child in map.values_mut() {
                rewrite_refs(child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(rewrite_refs),
        _ => {}
    }
}

/// Append `@enum` descriptions found in a context to matching property schemas
pub fn enrich_with_context(schemas: &mut Map<String, Value>, context: &Map<String, Value>) {
    for schema in schemas.values_mut() {
        if let Some(Value::Object(properties)) = schema.get_mut("properties") {
            for (name, property) in properties.iter_mut() {
                enrich_property(property, Some(name.as_str()), context);
            }
        }
    }
}

fn enrich_property(schema: &mut Value, name: Option<&str>, context: &Map<String, Value>) {
    let Value::Object(map) = schema else {
        return;
    };

    let enum_lines: Vec<String> = name
        .and_then(|name| context.get(name))
        .and_then(|term| term.get("@enum"))
        .and_then(Value::as_object)
        .map(|values| {
            values
                .iter()
                .map(|(key, desc)| match desc {
                    Value::String(s) => format!("  - {}: {}", key, s),
                    other => format!("  - {}: {}", key, other),
                })
                .collect()
        })
        .unwrap_or_default();

    if !enum_lines.is_empty() {
        let text = format!("\nEnum values:\n{}", enum_lines.join("\n"));
        let description = match map.get("description").and_then(Value::as_str) {
            Some(existing) if !existing.is_empty() => format!("{}{}", existing, text),
            _ => text.trim().to_string(),
        };
        map.insert("description".to_string(), Value::String(description));
    }

    if let Some(Value::Object(properties)) = map.get_mut("properties") {
        for (nested, property) in properties.iter_mut() {
            enrich_property(property, Some(nested.as_str()), context);
        }
    }
    if let Some(items) = map.get_mut("items") {
        enrich_property(items, None, context);
    }
}

fn paths(api: &ApiModel, schemas: &Map<String, Value>) -> Map<String, Value> {
    let mut paths = Map::new();
    for resource in &api.resources {
        let path = if resource.path.starts_with('/') {
            resource.path.clone()
        } else {
            format!("/{}", resource.path)
        };

        let item = paths
            .entry(path.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        let Value::Object(item) = item else {
            continue;
        };

        for method in &resource.methods {
            let Some(verb) = method.name.as_deref().map(str::to_lowercase) else {
                continue;
            };
            if !HTTP_VERBS.contains(&verb.as_str()) {
                continue;
            }
            item.insert(verb.clone(), operation(resource, method, &verb, &path, schemas));
        }
    }
    paths
}

fn operation(
    resource: &Resource,
    method: &Method,
    verb: &str,
    path: &str,
    schemas: &Map<String, Value>,
) -> Value {
    let resource_id = resource.id.as_deref().unwrap_or("");

    let mut operation = Map::new();
    if let Some(id) = &method.id {
        operation.insert("operationId".to_string(), Value::from(id.as_str()));
    }
    operation.insert(
        "summary".to_string(),
        Value::String(format!("{} {}", verb.to_uppercase(), resource_id)),
    );
    if let Some(id) = &resource.id {
        operation.insert("tags".to_string(), Value::Array(vec![Value::from(id.as_str())]));
    }
    if let Some(description) = &resource.description {
        operation.insert("description".to_string(), Value::from(description.as_str()));
    }

    if BODY_VERBS.contains(&verb) {
        if let Some(request) = method.request.as_ref().filter(|r| !r.representations.is_empty()) {
            let mut body = Map::new();
            body.insert("required".to_string(), Value::Bool(true));
            body.insert(
                "content".to_string(),
                content(&request.representations, schemas),
            );
            operation.insert("requestBody".to_string(), Value::Object(body));
        }
    }

    let mut responses = Map::new();
    if method.responses.is_empty() {
        let mut success = Map::new();
        success.insert("description".to_string(), Value::from("Success"));
        responses.insert("200".to_string(), Value::Object(success));
    }
    for response in &method.responses {
        let mut definition = Map::new();
        definition.insert(
            "description".to_string(),
            Value::String(format!("{} response", response.status)),
        );
        if !response.representations.is_empty() {
            definition.insert(
                "content".to_string(),
                content(&response.representations, schemas),
            );
        }
        responses.insert(response.status.clone(), Value::Object(definition));
    }
    operation.insert("responses".to_string(), Value::Object(responses));

    let mut parameters: Vec<Value> = Vec::new();
    if verb == "get" {
        if let Some(request) = &method.request {
            parameters.extend(request.parameters.iter().filter_map(request_parameter));
        }
    }
    parameters.extend(
        PATH_PLACEHOLDER
            .captures_iter(path)
            .map(|caps| path_parameter(&caps[1])),
    );
    if !parameters.is_empty() {
        operation.insert("parameters".to_string(), Value::Array(parameters));
    }

    Value::Object(operation)
}

/// Media type map for a list of representations
fn content(representations: &[Representation], schemas: &Map<String, Value>) -> Value {
    let mut content = Map::new();
    for representation in representations {
        let media_type = representation
            .media_type
            .as_deref()
            .unwrap_or(DEFAULT_MEDIA_TYPE);
        let element = representation.element.as_deref().map(local_name).unwrap_or("");

        let mut schema = Map::new();
        if !element.is_empty() && schemas.contains_key(element) {
            schema.insert(
                "$ref".to_string(),
                Value::String(format!("{}{}", COMPONENTS_PREFIX, element)),
            );
        } else {
            schema.insert("type".to_string(), Value::from("object"));
        }

        let mut entry = Map::new();
        entry.insert("schema".to_string(), Value::Object(schema));
        content.insert(media_type.to_string(), Value::Object(entry));
    }
    Value::Object(content)
}

fn request_parameter(param: &Parameter) -> Option<Value> {
    let name = param.name.as_deref()?;
    let declared = param.type_name.as_deref().unwrap_or("");
    let json_type = if declared.contains("int") { "integer" } else { "string" };

    let mut schema = Map::new();
    schema.insert("type".to_string(), Value::from(json_type));

    let mut definition = Map::new();
    definition.insert("name".to_string(), Value::from(name));
    definition.insert(
        "in".to_string(),
        Value::from(param.style.as_deref().unwrap_or("query")),
    );
    definition.insert("required".to_string(), Value::Bool(param.required));
    definition.insert("schema".to_string(), Value::Object(schema));
    if let Some(description) = &param.description {
        definition.insert("description".to_string(), Value::from(description.as_str()));
    }
    Some(Value::Object(definition))
}

fn path_parameter(name: &str) -> Value {
    let mut schema = Map::new();
    schema.insert("type".to_string(), Value::from("string"));

    let mut definition = Map::new();
    definition.insert("name".to_string(), Value::from(name));
    definition.insert("in".to_string(), Value::from("path"));
    definition.insert("required".to_string(), Value::Bool(true));
    definition.insert("schema".to_string(), Value::Object(schema));
    Value::Object(definition)
}
