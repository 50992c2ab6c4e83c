//! SHACL shapes with the class and property ontology alongside

use serde_json::{Map, Value};
use tracing::debug;

use super::constraints::{
    self, coerce_enum_key, effective_enums, enum_constraint, EnumConstraint, SHACL_DATATYPES,
    XSD_PRIMITIVES,
};
use super::rdf::enum_object;
use super::{
    graph_prefixes, id_ref, RenderOptions, OWL_PREFIX, RDFS_PREFIX, RDF_PREFIX, SH_PREFIX,
    XSD_PREFIX,
};
use crate::schema::{MaxOccurs, Property, SchemaModel, TypeEntry, TypeRef};

const SHACL_PREFIXES: &[(&str, &str)] = &[
    ("sh", SH_PREFIX),
    ("rdf", RDF_PREFIX),
    ("rdfs", RDFS_PREFIX),
    ("xsd", XSD_PREFIX),
    ("owl", OWL_PREFIX),
];

/// Render SHACL shapes for every type that has elements or attributes
///
/// The graph holds, in order: the node shapes, one `rdfs:Class` node per
/// registered type, then one `rdf:Property` node per shaped property. All
/// ids are relative to `@vocab`.
pub fn render_shacl(model: &SchemaModel, options: &RenderOptions) -> Value {
    let shaped: Vec<&TypeEntry> = model.types().filter(|t| t.has_structure()).collect();

    let mut graph: Vec<Value> = shaped
        .iter()
        .map(|entry| node_shape(model, entry, options))
        .collect();
    let shapes = graph.len();

    graph.extend(model.types().map(|entry| class_node(model, entry, options)));

    for entry in &shaped {
        graph.extend(
            entry
                .properties()
                .map(|property| property_node(model, entry, property, options)),
        );
    }

    debug!(shapes, nodes = graph.len(), "rendered SHACL shapes");

    let mut document = Map::new();
    document.insert(
        "@context".to_string(),
        Value::Object(graph_prefixes(model.base_uri(), SHACL_PREFIXES)),
    );
    document.insert("@graph".to_string(), Value::Array(graph));
    Value::Object(document)
}

fn node_shape(model: &SchemaModel, entry: &TypeEntry, options: &RenderOptions) -> Value {
    let mut shape = Map::new();
    shape.insert("@id".to_string(), Value::String(format!("{}Shape", entry.name)));
    shape.insert("@type".to_string(), Value::String("sh:NodeShape".to_string()));
    shape.insert("sh:targetClass".to_string(), id_ref(entry.name.clone()));

    if options.include_documentation() {
        if let Some(doc) = &entry.documentation {
            shape.insert("rdfs:comment".to_string(), Value::String(doc.clone()));
        }
    }

    let properties: Vec<Value> = entry
        .properties()
        .map(|property| property_shape(model, property, options))
        .collect();
    if !properties.is_empty() {
        shape.insert("sh:property".to_string(), Value::Array(properties));
    }

    Value::Object(shape)
}

fn property_shape(model: &SchemaModel, property: &Property, options: &RenderOptions) -> Value {
    let type_name = property.type_name.as_deref().unwrap_or("");
    let numeric = constraints::is_numeric(type_name, model);

    let mut shape = Map::new();
    shape.insert("sh:path".to_string(), id_ref(property.name.clone()));

    if options.include_enumerations() {
        if let EnumConstraint::Closed(values) = enum_constraint(effective_enums(property, model)) {
            let allowed = values.keys().map(|k| coerce_enum_key(k, numeric)).collect();
            shape.insert("sh:in".to_string(), Value::Array(allowed));
        }
    }

    let min = property.min_count();
    if min > 0 {
        shape.insert("sh:minCount".to_string(), Value::from(min));
    }

    let max = match property.max_bound() {
        MaxOccurs::Unbounded => None,
        MaxOccurs::Literal(n) => Some(n),
        MaxOccurs::Invalid => Some(1),
    };
    if let Some(max) = max.filter(|&n| n > 0) {
        shape.insert("sh:maxCount".to_string(), Value::from(max));
    }

    if numeric {
        if let Some((low, high)) = constraints::unsigned_bounds(type_name, model) {
            shape.insert("sh:minInclusive".to_string(), Value::from(low));
            shape.insert("sh:maxInclusive".to_string(), Value::from(high));
        }
    }

    if property.type_name.is_some() {
        match model.resolve(type_name) {
            TypeRef::Resolved(entry) if entry.has_structure() => {
                shape.insert("sh:node".to_string(), id_ref(format!("{}Shape", entry.name)));
            }
            resolved => {
                shape.insert(
                    "sh:datatype".to_string(),
                    Value::String(datatype(resolved).to_string()),
                );
            }
        }
    }

    if options.include_documentation() {
        if let Some(doc) = &property.documentation {
            shape.insert("rdfs:comment".to_string(), Value::String(doc.clone()));
        }
    }

    if let Some(default) = property.default.as_deref().filter(|d| !d.is_empty()) {
        shape.insert("sh:defaultValue".to_string(), Value::String(default.to_string()));
    }

    Value::Object(shape)
}

/// XSD datatype for a non-structural type reference
fn datatype(type_ref: TypeRef<'_>) -> &'static str {
    if let Some(mapped) = SHACL_DATATYPES.get(type_ref.name()).copied() {
        return mapped;
    }
    let name = match type_ref {
        TypeRef::Resolved(entry) => match entry.derived_from() {
            Some(base) => base,
            None => return "xsd:string",
        },
        TypeRef::Unresolved(name) => name,
    };
    match SHACL_DATATYPES.get(name).copied() {
        Some(mapped) => mapped,
        None if constraints::looks_integer(name) => "xsd:integer",
        None => "xsd:string",
    }
}

fn class_node(model: &SchemaModel, entry: &TypeEntry, options: &RenderOptions) -> Value {
    let mut node = Map::new();
    node.insert("@id".to_string(), Value::String(entry.name.clone()));
    node.insert("@type".to_string(), Value::String("rdfs:Class".to_string()));

    if options.include_documentation() {
        if let Some(doc) = &entry.documentation {
            node.insert("rdfs:comment".to_string(), Value::String(doc.clone()));
        }
    }

    if let Some(base) = entry.base_local().filter(|b| model.contains_type(b)) {
        node.insert("rdfs:subClassOf".to_string(), id_ref(base));
    }

    if options.include_enumerations() {
        if let Some(values) = &entry.annotation.values {
            node.insert("@enum".to_string(), enum_object(values));
        }
    }

    Value::Object(node)
}

fn property_node(
    model: &SchemaModel,
    owner: &TypeEntry,
    property: &Property,
    options: &RenderOptions,
) -> Value {
    let mut node = Map::new();
    node.insert("@id".to_string(), Value::String(property.name.clone()));
    node.insert("@type".to_string(), Value::String("rdf:Property".to_string()));
    node.insert("rdfs:domain".to_string(), id_ref(owner.name.clone()));

    let range = property.type_local();
    if model.contains_type(range) {
        node.insert("rdfs:range".to_string(), id_ref(range));
    } else if XSD_PRIMITIVES.contains(&range) {
        node.insert("rdfs:range".to_string(), Value::String(format!("xsd:{}", range)));
    }

    if options.include_documentation() {
        if let Some(doc) = &property.documentation {
            node.insert("rdfs:comment".to_string(), Value::String(doc.clone()));
        }
    }

    match property.min_count() {
        0 => {
            node.insert("owl:minCardinality".to_string(), Value::from(0));
        }
        1 => {}
        n => {
            node.insert("owl:minCardinality".to_string(), Value::from(n));
        }
    }

    if let MaxOccurs::Literal(n) = property.max_bound() {
        if n > 1 {
            node.insert("owl:maxCardinality".to_string(), Value::from(n));
        }
    }

    Value::Object(node)
}
