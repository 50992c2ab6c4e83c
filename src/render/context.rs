//! JSON-LD context

use serde_json::{Map, Value};
use tracing::debug;

use super::constraints::XSD_PRIMITIVES;
use super::{graph_prefixes, RenderOptions, VOCABULARY_PREFIXES};
use crate::schema::SchemaModel;

/// Render the JSON-LD context for a schema
///
/// Every term is a relative `"@id"` under `@vocab`. Documentation and
/// enumerations never appear here: term definitions cannot carry them.
pub fn render_context(model: &SchemaModel, options: &RenderOptions) -> Value {
    let mut context = graph_prefixes(model.base_uri(), VOCABULARY_PREFIXES);

    if let Some(url) = options.shacl_reference_url() {
        context.insert("@shacl".to_string(), Value::String(url.to_string()));
    }

    for entry in model.types() {
        context.insert(entry.name.clone(), id_term());
    }

    if options.include_schema_relationships() {
        for property in model.types().flat_map(|t| t.properties()) {
            add_term(&mut context, &property.name, id_term());
        }
    }

    for element in model.root_elements() {
        add_term(&mut context, &element.name, id_term());
    }

    for primitive in XSD_PRIMITIVES {
        add_term(&mut context, primitive, Value::String(format!("xsd:{}", primitive)));
    }

    debug!(terms = context.len(), "rendered JSON-LD context");

    let mut document = Map::new();
    document.insert("@context".to_string(), Value::Object(context));
    Value::Object(document)
}

fn id_term() -> Value {
    Value::String("@id".to_string())
}

/// First definition of a term wins
fn add_term(context: &mut Map<String, Value>, term: &str, definition: Value) {
    if !context.contains_key(term) {
        context.insert(term.to_string(), definition);
    }
}
