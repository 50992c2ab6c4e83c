//! JSON Schema (draft-07)

use serde_json::{Map, Value};
use tracing::debug;

use super::constraints::{
    self, coerce_enum_key, effective_enums, enum_constraint, EffectiveEnums, EnumConstraint,
    JSON_TYPES,
};
use super::RenderOptions;
use crate::schema::{EnumRange, EnumValues, MaxOccurs, Property, SchemaModel, TypeEntry, TypeRef};

/// JSON Schema dialect of the produced document
pub const JSON_SCHEMA_DRAFT: &str = "http://json-schema.org/draft-07/schema#";

const HEX_BINARY_FORMAT: &str = "hexBinary";

/// Render one object schema per type that has elements or attributes
pub fn render_json_schema(model: &SchemaModel, options: &RenderOptions) -> Value {
    let definitions: Map<String, Value> = model
        .types()
        .filter(|t| t.has_structure())
        .map(|entry| (entry.name.clone(), type_schema(model, entry, options)))
        .collect();

    debug!(definitions = definitions.len(), "rendered JSON Schema");

    let mut document = Map::new();
    document.insert("$schema".to_string(), Value::String(JSON_SCHEMA_DRAFT.to_string()));
    document.insert(
        "$id".to_string(),
        Value::String(format!("{}schema.json", model.base_uri())),
    );
    document.insert(
        "title".to_string(),
        Value::String("IEEE 2030.5 Schema".to_string()),
    );
    document.insert(
        "description".to_string(),
        Value::String("JSON Schema generated from IEEE 2030.5 XSD".to_string()),
    );
    document.insert("definitions".to_string(), Value::Object(definitions));
    Value::Object(document)
}

fn type_schema(model: &SchemaModel, entry: &TypeEntry, options: &RenderOptions) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    // Anonymous inline types have nothing to describe
    for property in entry.properties().filter(|p| p.type_name.is_some()) {
        properties.insert(property.name.clone(), property_schema(model, property, options));
        if property.min_count() > 0 {
            required.push(Value::String(property.name.clone()));
        }
    }

    let mut schema = Map::new();
    schema.insert("type".to_string(), Value::String("object".to_string()));
    schema.insert("properties".to_string(), Value::Object(properties));
    schema.insert("required".to_string(), Value::Array(required));
    if options.include_documentation() {
        if let Some(doc) = &entry.documentation {
            schema.insert("description".to_string(), Value::String(doc.clone()));
        }
    }
    Value::Object(schema)
}

/// JSON type and optional format for a non-structural type reference
fn json_type(type_ref: TypeRef<'_>) -> (&'static str, Option<&'static str>) {
    if let Some(json) = JSON_TYPES.get(type_ref.name()).copied() {
        return (json, None);
    }

    let name = match type_ref {
        TypeRef::Resolved(entry) => match entry.derived_from() {
            Some(base) => base,
            None => return ("string", None),
        },
        TypeRef::Unresolved(name) => name,
    };

    if let Some(json) = JSON_TYPES.get(name).copied() {
        let hex = name == HEX_BINARY_FORMAT || name.contains("HexBinary");
        (json, hex.then_some(HEX_BINARY_FORMAT))
    } else if constraints::looks_integer(name) {
        ("integer", constraints::integer_format(name))
    } else if name.contains("HexBinary") {
        ("string", Some(HEX_BINARY_FORMAT))
    } else {
        ("string", None)
    }
}

fn property_schema(model: &SchemaModel, property: &Property, options: &RenderOptions) -> Value {
    let type_name = property.type_name.as_deref().unwrap_or("");
    let type_ref = model.resolve(type_name);
    let documentation = property
        .documentation
        .as_deref()
        .filter(|_| options.include_documentation());

    let mut schema = Map::new();
    match type_ref {
        TypeRef::Resolved(entry) if entry.has_structure() => {
            schema.insert(
                "$ref".to_string(),
                Value::String(format!("#/definitions/{}", entry.name)),
            );
        }
        _ => {
            let (json, format) = json_type(type_ref);
            schema.insert("type".to_string(), Value::String(json.to_string()));
            if let Some(format) = format {
                schema.insert("format".to_string(), Value::String(format.to_string()));
            }

            let enums = if options.include_enumerations() {
                effective_enums(property, model)
            } else {
                EffectiveEnums::default()
            };
            if let Some(values) = enums.values {
                if is_bitmask(property, type_ref, format) {
                    bitmask(&mut schema, model, type_name, values, documentation);
                } else {
                    let underived_integer = type_ref.entry().map_or(false, |t| {
                        t.derived_from().is_none() && constraints::looks_integer(&t.name)
                    });
                    let numeric = json == "integer" || underived_integer;
                    enumeration(&mut schema, enums, values, numeric, documentation);
                }
            }

            if json == "integer" {
                if let Some((low, high)) = constraints::unsigned_bounds(type_name, model) {
                    schema.insert("minimum".to_string(), Value::from(low));
                    schema.insert("maximum".to_string(), Value::from(high));
                }
            }
        }
    }

    let mut schema = if property.is_array() {
        array_of(schema, property)
    } else {
        schema
    };

    if let Some(doc) = documentation {
        if !schema.contains_key("description") {
            schema.insert("description".to_string(), Value::String(doc.to_string()));
        }
    }
    if let Some(default) = property.default.as_deref().filter(|d| !d.is_empty()) {
        schema.insert("default".to_string(), Value::String(default.to_string()));
    }

    Value::Object(schema)
}

/// Hex-encoded property whose documentation talks about bits
fn is_bitmask(property: &Property, type_ref: TypeRef<'_>, format: Option<&str>) -> bool {
    if format != Some(HEX_BINARY_FORMAT) {
        return false;
    }
    let own = property.documentation.as_deref().unwrap_or("").to_lowercase();
    let of_type = type_ref
        .entry()
        .and_then(|t| t.documentation.as_deref())
        .unwrap_or("")
        .to_lowercase();
    own.contains("bit") || of_type.contains("bit position") || of_type.contains("bitmap")
}

fn bitmask(
    schema: &mut Map<String, Value>,
    model: &SchemaModel,
    type_name: &str,
    values: &EnumValues,
    documentation: Option<&str>,
) {
    let mut positions: Vec<(&String, &String)> = values.iter().collect();
    positions.sort_by_key(|(bit, _)| bit.parse::<u64>().unwrap_or(999));

    let mut text = String::from("\n\nBit positions (multiple bits can be set, value is hex-encoded):\n");
    for (bit, meaning) in &positions {
        text.push_str(&format!("  - Bit {}: {}\n", bit, meaning));
    }
    text.push_str("\nExample: To set bits 0 and 1, use hex value \"00000003\" (0x00000001 | 0x00000002)");

    let description = match documentation {
        Some(doc) => format!("{}{}", doc, text),
        None => text.trim().to_string(),
    };
    schema.insert("description".to_string(), Value::String(description));

    let bits: Map<String, Value> = values
        .iter()
        .map(|(bit, meaning)| (bit.clone(), Value::String(meaning.clone())))
        .collect();
    schema.insert("x-bit-positions".to_string(), Value::Object(bits));

    if let Some(width) = constraints::hex_binary_width(type_name, model) {
        if let Some(chars) = constraints::hex_pattern_chars(width) {
            schema.insert(
                "pattern".to_string(),
                Value::String(format!("^[0-9A-Fa-f]{{1,{}}}$", chars)),
            );
            let all_set = if width >= 32 { "FFFFFFFF" } else { "FF" };
            schema.insert(
                "x-examples".to_string(),
                Value::Array(vec![
                    Value::from("00000001"),
                    Value::from("00000003"),
                    Value::from(all_set),
                ]),
            );
        }
    }
}

fn enumeration(
    schema: &mut Map<String, Value>,
    enums: EffectiveEnums<'_>,
    values: &EnumValues,
    numeric: bool,
    documentation: Option<&str>,
) {
    let mut allowed = Vec::with_capacity(values.len());
    let mut described: Vec<(String, &str)> = Vec::new();
    for (key, meaning) in values {
        let value = coerce_enum_key(key, numeric);
        if !meaning.is_empty() {
            let label = match &value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            described.push((label, meaning));
        }
        allowed.push(value);
    }

    if let EnumConstraint::Closed(_) = enum_constraint(enums) {
        schema.insert("enum".to_string(), Value::Array(allowed));
    }

    let ranges: &[EnumRange] = enums.ranges.unwrap_or(&[]);
    if described.is_empty() && ranges.is_empty() {
        return;
    }

    let mut side_channel = Map::new();
    for (label, meaning) in &described {
        side_channel.insert(label.clone(), Value::String(meaning.to_string()));
    }
    for range in ranges {
        side_channel.insert(
            format!("{} - {}", range.start, range.end),
            Value::String(range.description.clone()),
        );
    }
    schema.insert("x-enum-descriptions".to_string(), Value::Object(side_channel));

    let mut lines = Vec::new();
    let specific: Vec<_> = described.iter().filter(|(k, _)| !k.contains(" - ")).collect();
    if !specific.is_empty() {
        lines.push("Enum values:".to_string());
        lines.extend(specific.iter().map(|(k, v)| format!("  - {}: {}", k, v)));
    }
    if !ranges.is_empty() {
        if !described.is_empty() {
            lines.push(String::new());
        }
        lines.push("Value ranges:".to_string());
        lines.extend(
            ranges
                .iter()
                .map(|r| format!("  - {} - {}: {}", r.start, r.end, r.description)),
        );
    }
    if lines.is_empty() {
        return;
    }

    let block = format!("\n{}", lines.join("\n"));
    let description = match documentation {
        Some(doc) => format!("{}{}", doc, block),
        None => block.trim().to_string(),
    };
    schema.insert("description".to_string(), Value::String(description));
}

fn array_of(items: Map<String, Value>, property: &Property) -> Map<String, Value> {
    let mut array = Map::new();
    array.insert("type".to_string(), Value::String("array".to_string()));
    array.insert("items".to_string(), Value::Object(items));

    let min = property.min_count();
    if min > 0 {
        array.insert("minItems".to_string(), Value::from(min));
    }
    if let MaxOccurs::Literal(max) = property.max_bound() {
        array.insert("maxItems".to_string(), Value::from(max));
    }
    array
}
