//! RDF/OWL schema graph

use serde_json::{Map, Value};
use tracing::debug;

use super::{graph_prefixes, id_ref, RenderOptions, VOCABULARY_PREFIXES};
use crate::schema::{EnumValues, SchemaModel, TypeEntry};

/// Render one `rdfs:Class` node per registered type
///
/// Class ids are absolute (`base_uri` + name). Property nodes are not part
/// of this graph; the SHACL document carries them.
pub fn render_rdf_schema(model: &SchemaModel, options: &RenderOptions) -> Value {
    let graph: Vec<Value> = model
        .types()
        .map(|entry| class_node(model, entry, options))
        .collect();

    debug!(classes = graph.len(), "rendered RDF schema");

    let mut document = Map::new();
    document.insert(
        "@context".to_string(),
        Value::Object(graph_prefixes(model.base_uri(), VOCABULARY_PREFIXES)),
    );
    document.insert("@graph".to_string(), Value::Array(graph));
    Value::Object(document)
}

fn class_node(model: &SchemaModel, entry: &TypeEntry, options: &RenderOptions) -> Value {
    let base_uri = model.base_uri();
    let mut node = Map::new();
    node.insert(
        "@id".to_string(),
        Value::String(format!("{}{}", base_uri, entry.name)),
    );
    node.insert("@type".to_string(), Value::String("rdfs:Class".to_string()));

    if options.include_documentation() {
        if let Some(doc) = &entry.documentation {
            node.insert("rdfs:comment".to_string(), Value::String(doc.clone()));
        }
    }

    if let Some(base) = entry.base_local().filter(|b| model.contains_type(b)) {
        node.insert(
            "rdfs:subClassOf".to_string(),
            id_ref(format!("{}{}", base_uri, base)),
        );
    }

    if options.include_enumerations() {
        if let Some(values) = &entry.annotation.values {
            node.insert("@enum".to_string(), enum_object(values));
        }
    }

    Value::Object(node)
}

/// Enumeration values as a JSON object, keys in document order
pub(crate) fn enum_object(values: &EnumValues) -> Value {
    Value::Object(
        values
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}
