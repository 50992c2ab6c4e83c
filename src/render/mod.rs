//! Renderers
//!
//! Each renderer is a pure function of an immutable [`SchemaModel`] and a
//! set of options, returning a `serde_json::Value` tree:
//!
//! - [`render_context`]: JSON-LD context
//! - [`render_rdf_schema`]: RDF/OWL class graph
//! - [`render_shacl`]: SHACL node shapes plus class and property nodes
//! - [`render_json_schema`]: draft-07 JSON Schema
//! - [`compose_openapi`]: OpenAPI 3.0 from the JSON Schema output and an
//!   optional [`ApiModel`](crate::api::ApiModel)
//!
//! Key order in every produced object is stable, so identical input renders
//! to identical bytes.
//!
//! [`SchemaModel`]: crate::schema::SchemaModel

pub mod constraints;
mod context;
mod json_schema;
mod openapi;
mod rdf;
mod shacl;

pub use context::render_context;
pub use json_schema::render_json_schema;
pub use openapi::{compose_openapi, enrich_with_context, rewrite_refs, OpenApiOptions};
pub use rdf::render_rdf_schema;
pub use shacl::render_shacl;

use serde_json::{Map, Value};

/// XML Schema datatypes
pub const XSD_PREFIX: &str = "http://www.w3.org/2001/XMLSchema#";
/// RDF
pub const RDF_PREFIX: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
/// RDF Schema
pub const RDFS_PREFIX: &str = "http://www.w3.org/2000/01/rdf-schema#";
/// OWL
pub const OWL_PREFIX: &str = "http://www.w3.org/2002/07/owl#";
/// SHACL
pub const SH_PREFIX: &str = "http://www.w3.org/ns/shacl#";

/// Options shared by all renderers
#[derive(Debug, Clone)]
pub struct RenderOptions {
    include_documentation: bool,
    include_enumerations: bool,
    include_schema_relationships: bool,
    shacl_reference_url: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_documentation: true,
            include_enumerations: true,
            include_schema_relationships: true,
            shacl_reference_url: None,
        }
    }
}

impl RenderOptions {
    /// Everything included
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit `rdfs:comment` and `description` fields
    pub fn include_documentation(&self) -> bool {
        self.include_documentation
    }

    /// Emit enumeration constraints and descriptions
    pub fn include_enumerations(&self) -> bool {
        self.include_enumerations
    }

    /// Add property terms to the JSON-LD context
    pub fn include_schema_relationships(&self) -> bool {
        self.include_schema_relationships
    }

    /// `@shacl` link written into the context
    pub fn shacl_reference_url(&self) -> Option<&str> {
        self.shacl_reference_url.as_deref()
    }

    /// Set documentation inclusion
    pub fn with_documentation(mut self, include: bool) -> Self {
        self.include_documentation = include;
        self
    }

    /// Set enumeration inclusion
    pub fn with_enumerations(mut self, include: bool) -> Self {
        self.include_enumerations = include;
        self
    }

    /// Set property term inclusion
    pub fn with_schema_relationships(mut self, include: bool) -> Self {
        self.include_schema_relationships = include;
        self
    }

    /// Set the SHACL shapes link
    pub fn with_shacl_reference_url(mut self, url: Option<String>) -> Self {
        self.shacl_reference_url = url;
        self
    }
}

/// `{"@id": id}`
pub(crate) fn id_ref(id: impl Into<String>) -> Value {
    let mut node = Map::new();
    node.insert("@id".to_string(), Value::String(id.into()));
    Value::Object(node)
}

/// `@context` prefix block used by the graph renderers
pub(crate) fn graph_prefixes(base_uri: &str, prefixes: &[(&str, &str)]) -> Map<String, Value> {
    let mut context = Map::new();
    context.insert("@vocab".to_string(), Value::String(base_uri.to_string()));
    for (prefix, iri) in prefixes {
        context.insert(prefix.to_string(), Value::String(iri.to_string()));
    }
    context
}

/// Prefixes of the context and RDF schema documents
pub(crate) const VOCABULARY_PREFIXES: &[(&str, &str)] = &[
    ("xsd", XSD_PREFIX),
    ("rdf", RDF_PREFIX),
    ("rdfs", RDFS_PREFIX),
    ("owl", OWL_PREFIX),
];
