//! Constraint decisions shared by the SHACL and JSON Schema renderers
//!
//! Both renderers must agree on which values a property may take, so the
//! enumeration, numeric range and hex width rules live here once.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::names::local_name;
use crate::schema::{EnumRange, EnumValues, Property, SchemaModel, TypeRef};

/// Integer-valued XSD and IEEE 2030.5 type names
pub const NUMERIC_TYPES: &[&str] = &[
    "Int8",
    "Int16",
    "Int32",
    "Int48",
    "Int64",
    "UInt8",
    "UInt16",
    "UInt32",
    "UInt40",
    "UInt48",
    "UInt64",
    "int",
    "long",
    "unsignedByte",
    "unsignedShort",
    "unsignedInt",
    "unsignedLong",
    "byte",
    "short",
];

/// XSD primitives every renderer knows by name, in context order
pub const XSD_PRIMITIVES: &[&str] = &[
    "string",
    "int",
    "long",
    "boolean",
    "unsignedByte",
    "unsignedShort",
    "unsignedInt",
    "unsignedLong",
    "byte",
    "short",
    "anyURI",
    "hexBinary",
];

lazy_static::lazy_static! {
    /// XSD primitive to SHACL datatype
    pub static ref SHACL_DATATYPES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("string", "xsd:string");
        m.insert("int", "xsd:integer");
        m.insert("long", "xsd:long");
        m.insert("boolean", "xsd:boolean");
        m.insert("unsignedByte", "xsd:unsignedByte");
        m.insert("unsignedShort", "xsd:unsignedShort");
        m.insert("unsignedInt", "xsd:unsignedInt");
        m.insert("unsignedLong", "xsd:unsignedLong");
        m.insert("byte", "xsd:byte");
        m.insert("short", "xsd:short");
        m.insert("anyURI", "xsd:anyURI");
        m.insert("hexBinary", "xsd:hexBinary");
        m
    };

    /// XSD primitive to JSON Schema type
    pub static ref JSON_TYPES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("string", "string");
        m.insert("int", "integer");
        m.insert("long", "integer");
        m.insert("boolean", "boolean");
        m.insert("unsignedByte", "integer");
        m.insert("unsignedShort", "integer");
        m.insert("unsignedInt", "integer");
        m.insert("unsignedLong", "integer");
        m.insert("byte", "integer");
        m.insert("short", "integer");
        m.insert("anyURI", "string");
        m.insert("hexBinary", "string");
        m
    };
}

static HEX_BINARY_WIDTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"HexBinary([0-9]+)").unwrap());

/// Enumeration data that applies to one property
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EffectiveEnums<'a> {
    /// Discrete values
    pub values: Option<&'a EnumValues>,
    /// Value spans
    pub ranges: Option<&'a [EnumRange]>,
}

impl<'a> EffectiveEnums<'a> {
    /// True if neither values nor ranges apply
    pub fn is_empty(&self) -> bool {
        self.values.is_none() && self.ranges.is_none()
    }
}

/// Values and ranges for `property`: its own annotation first, each falling
/// back independently to the annotation of its resolved type
pub fn effective_enums<'a>(property: &'a Property, model: &'a SchemaModel) -> EffectiveEnums<'a> {
    let resolved = model.resolve_property(property).entry();
    EffectiveEnums {
        values: property
            .annotation
            .values
            .as_ref()
            .or_else(|| resolved.and_then(|t| t.annotation.values.as_ref())),
        ranges: property
            .annotation
            .ranges
            .as_deref()
            .or_else(|| resolved.and_then(|t| t.annotation.ranges.as_deref())),
    }
}

/// How an enumeration restricts a property
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnumConstraint<'a> {
    /// Only the listed values are allowed
    Closed(&'a EnumValues),
    /// Ranges exist, so any value in the type's domain is allowed
    Open,
    /// No enumeration data
    Absent,
}

/// Decide between a closed value list and an open, range-documented domain
pub fn enum_constraint<'a>(enums: EffectiveEnums<'a>) -> EnumConstraint<'a> {
    match (enums.values, enums.ranges) {
        (_, Some(_)) => EnumConstraint::Open,
        (Some(values), None) => EnumConstraint::Closed(values),
        (None, None) => EnumConstraint::Absent,
    }
}

/// Name that numeric rules look at: the resolved type's base or restriction
/// when it has one, else the reference itself (prefix stripped)
pub fn constraint_base<'a>(type_name: &'a str, model: &'a SchemaModel) -> &'a str {
    match model.resolve(type_name) {
        TypeRef::Resolved(entry) => entry.derived_from().unwrap_or(&entry.name),
        TypeRef::Unresolved(name) => name,
    }
}

/// True if values of `type_name` are integers
pub fn is_numeric(type_name: &str, model: &SchemaModel) -> bool {
    let local = local_name(type_name);
    if NUMERIC_TYPES.contains(&local) {
        return true;
    }
    model
        .get_type(local)
        .and_then(|entry| entry.derived_from())
        .map_or(false, |base| NUMERIC_TYPES.contains(&base))
}

/// Inclusive bounds for the unsigned 8, 16 and 32 bit families
pub fn unsigned_bounds(type_name: &str, model: &SchemaModel) -> Option<(u64, u64)> {
    let base = constraint_base(type_name, model);
    if base.contains("UInt8") || base == "unsignedByte" {
        Some((0, 255))
    } else if base.contains("UInt16") || base == "unsignedShort" {
        Some((0, 65_535))
    } else if base.contains("UInt32") || base == "unsignedInt" {
        Some((0, 4_294_967_295))
    } else {
        None
    }
}

/// OpenAPI integer format for a type name; none for widths without one
pub fn integer_format(type_name: &str) -> Option<&'static str> {
    let format = match (type_name.to_lowercase().as_str(), type_name) {
        ("uint8", _) | (_, "unsignedByte") => "uint8",
        ("uint16", _) | (_, "unsignedShort") => "uint16",
        ("uint32", _) | (_, "unsignedInt") => "uint32",
        ("uint64", _) | (_, "unsignedLong") => "uint64",
        ("int8", _) | (_, "byte") => "int8",
        ("int16", _) | (_, "short") => "int16",
        ("int32", _) | (_, "int") => "int32",
        ("int64", _) | (_, "long") => "int64",
        _ => return None,
    };
    Some(format)
}

/// True for names of the `IntN`/`UIntN` families
pub fn looks_integer(name: &str) -> bool {
    name.contains("Int")
}

/// Declared bit width of a `HexBinaryN` derived type
pub fn hex_binary_width(type_name: &str, model: &SchemaModel) -> Option<u32> {
    let base = model.get_type(local_name(type_name))?.derived_from()?;
    let width = HEX_BINARY_WIDTH.captures(base)?[1].parse().ok()?;
    hex_pattern_chars(width).map(|_| width)
}

/// Maximum hex characters for a bit width
pub fn hex_pattern_chars(width: u32) -> Option<u32> {
    match width {
        8 => Some(2),
        16 => Some(4),
        32 => Some(8),
        48 => Some(12),
        64 => Some(16),
        160 => Some(40),
        _ => None,
    }
}

/// Enumeration key as a JSON value, as an integer when the property is numeric
pub fn coerce_enum_key(key: &str, numeric: bool) -> Value {
    if numeric {
        if let Ok(n) = key.trim().parse::<i64>() {
            return Value::from(n);
        }
        if let Ok(n) = key.trim().parse::<u64>() {
            return Value::from(n);
        }
    }
    Value::String(key.to_string())
}
