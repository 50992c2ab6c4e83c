//! Normalized schema model
//!
//! The registry the renderers read from. Everything here is created in one
//! parse pass and never mutated afterwards.

use crate::names::local_name;
use indexmap::IndexMap;
use serde::Serialize;

/// Raw enumeration token (usually digits) to description, in document order
pub type EnumValues = IndexMap<String, String>;

/// A contiguous span of raw values sharing one documented meaning
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumRange {
    /// First value of the span
    pub start: u64,
    /// Last value of the span (inclusive)
    pub end: u64,
    /// Meaning of every value in the span
    pub description: String,
}

/// Enumeration information attached to a type or property
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Annotation {
    /// Discrete values; never `Some` of an empty map
    pub values: Option<EnumValues>,
    /// Value spans; never `Some` of an empty list
    pub ranges: Option<Vec<EnumRange>>,
}

impl Annotation {
    /// True if neither values nor ranges are present
    pub fn is_empty(&self) -> bool {
        self.values.is_none() && self.ranges.is_none()
    }
}

/// Which declaration produced a [`TypeEntry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeKind {
    /// `xs:complexType`
    Complex,
    /// `xs:simpleType`
    Simple,
}

/// `use` of an attribute declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeUse {
    /// `use="required"`
    Required,
    /// Anything else
    Optional,
}

/// Element or attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyKind {
    /// Child `xs:element`
    Element,
    /// `xs:attribute`
    Attribute,
}

/// Upper cardinality bound as written in the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxOccurs {
    /// `maxOccurs="unbounded"`
    Unbounded,
    /// A plain non-negative integer
    Literal(u64),
    /// Anything that is not a plain integer
    Invalid,
}

/// Parse a string made only of ASCII digits
pub fn parse_digits(value: &str) -> Option<u64> {
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        value.parse().ok()
    } else {
        None
    }
}

/// A named element or attribute belonging to a [`TypeEntry`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Element or attribute
    pub kind: PropertyKind,
    /// Property name, unique only within its owning type
    pub name: String,
    /// Type reference as written (may carry a prefix)
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    /// Lower cardinality, default `"1"`; attributes synthesize `"1"`/`"0"`
    pub min_occurs: String,
    /// Upper cardinality, default `"1"`
    pub max_occurs: String,
    /// Attribute `use`
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub usage: Option<AttributeUse>,
    /// Attribute default literal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Documentation text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    /// Enumerations mined from the property documentation
    #[serde(skip_serializing_if = "Annotation::is_empty")]
    pub annotation: Annotation,
}

impl Property {
    /// Type reference with any namespace prefix removed (empty if absent)
    pub fn type_local(&self) -> &str {
        self.type_name.as_deref().map(local_name).unwrap_or("")
    }

    /// Lower bound as an integer; anything that is not plain digits counts as 0
    pub fn min_count(&self) -> u64 {
        parse_digits(&self.min_occurs).unwrap_or(0)
    }

    /// Upper bound
    pub fn max_bound(&self) -> MaxOccurs {
        if self.max_occurs == "unbounded" {
            MaxOccurs::Unbounded
        } else {
            parse_digits(&self.max_occurs)
                .map(MaxOccurs::Literal)
                .unwrap_or(MaxOccurs::Invalid)
        }
    }

    /// True if the property holds a list of values
    pub fn is_array(&self) -> bool {
        match self.max_bound() {
            MaxOccurs::Unbounded => true,
            MaxOccurs::Literal(n) => n > 1,
            MaxOccurs::Invalid => false,
        }
    }
}

/// One parsed `complexType` or `simpleType`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeEntry {
    /// Registry key
    pub name: String,
    /// Declaration kind
    pub kind: TypeKind,
    /// `extension/@base`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// `restriction/@base`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restriction: Option<String>,
    /// Child elements in document order
    pub elements: Vec<Property>,
    /// Attributes in document order
    pub attributes: Vec<Property>,
    /// Documentation text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    /// Enumeration facets and documentation-mined enumerations
    #[serde(skip_serializing_if = "Annotation::is_empty")]
    pub annotation: Annotation,
}

impl TypeEntry {
    /// Create an empty entry
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            base: None,
            restriction: None,
            elements: Vec::new(),
            attributes: Vec::new(),
            documentation: None,
            annotation: Annotation::default(),
        }
    }

    /// True if the type has elements or attributes of its own
    pub fn has_structure(&self) -> bool {
        !self.elements.is_empty() || !self.attributes.is_empty()
    }

    /// Extension base, else restriction base, prefix stripped
    pub fn derived_from(&self) -> Option<&str> {
        self.base
            .as_deref()
            .or(self.restriction.as_deref())
            .map(local_name)
    }

    /// Extension base with the prefix stripped
    pub fn base_local(&self) -> Option<&str> {
        self.base.as_deref().map(local_name)
    }

    /// Elements followed by attributes
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.elements.iter().chain(self.attributes.iter())
    }
}

/// A top-level `xs:element` declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RootElement {
    /// Element name
    pub name: String,
    /// Referenced type as written
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// Lower cardinality
    pub min_occurs: String,
    /// Upper cardinality
    pub max_occurs: String,
}

/// Something the parser noticed but did not treat as fatal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Diagnostic {
    /// A later declaration replaced an earlier one with the same local name
    DuplicateTypeName {
        /// Colliding local name
        name: String,
        /// Kind of the declaration that won
        winner: TypeKind,
        /// Kind of the declaration that was replaced
        replaced: TypeKind,
    },
}

/// Outcome of looking a type reference up in the registry
#[derive(Debug, Clone, Copy)]
pub enum TypeRef<'a> {
    /// Known type
    Resolved(&'a TypeEntry),
    /// Primitive or unknown name, prefix stripped; treated as opaque
    Unresolved(&'a str),
}

impl<'a> TypeRef<'a> {
    /// The registry entry, if resolved
    pub fn entry(&self) -> Option<&'a TypeEntry> {
        match self {
            TypeRef::Resolved(entry) => Some(entry),
            TypeRef::Unresolved(_) => None,
        }
    }

    /// Local type name either way
    pub fn name(&self) -> &'a str {
        match self {
            TypeRef::Resolved(entry) => &entry.name,
            TypeRef::Unresolved(name) => name,
        }
    }
}

/// Parsed XSD: the type registry plus root elements
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaModel {
    pub(crate) base_uri: String,
    pub(crate) target_namespace: Option<String>,
    pub(crate) types: IndexMap<String, TypeEntry>,
    pub(crate) root_elements: IndexMap<String, RootElement>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl SchemaModel {
    /// Vocabulary IRI all graph renderers use
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// `targetNamespace` of the schema
    pub fn target_namespace(&self) -> Option<&str> {
        self.target_namespace.as_deref()
    }

    /// Types in registry order
    pub fn types(&self) -> impl Iterator<Item = &TypeEntry> {
        self.types.values()
    }

    /// Number of registered types
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Look a type up by local name
    pub fn get_type(&self, name: &str) -> Option<&TypeEntry> {
        self.types.get(name)
    }

    /// True if `name` is a registered type
    pub fn contains_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Top-level element declarations
    pub fn root_elements(&self) -> impl Iterator<Item = &RootElement> {
        self.root_elements.values()
    }

    /// Non-fatal findings from the parse
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Resolve a (possibly prefixed) type reference
    pub fn resolve<'a>(&'a self, type_name: &'a str) -> TypeRef<'a> {
        let local = local_name(type_name);
        match self.types.get(local) {
            Some(entry) => TypeRef::Resolved(entry),
            None => TypeRef::Unresolved(local),
        }
    }

    /// Resolve a property's type
    pub fn resolve_property<'a>(&'a self, property: &'a Property) -> TypeRef<'a> {
        self.resolve(property.type_name.as_deref().unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(max_occurs: &str, min_occurs: &str) -> Property {
        Property {
            kind: PropertyKind::Element,
            name: "x".to_string(),
            type_name: Some("xs:string".to_string()),
            min_occurs: min_occurs.to_string(),
            max_occurs: max_occurs.to_string(),
            usage: None,
            default: None,
            documentation: None,
            annotation: Annotation::default(),
        }
    }

    #[test]
    fn test_parse_digits() {
        assert_eq!(parse_digits("0"), Some(0));
        assert_eq!(parse_digits("12"), Some(12));
        assert_eq!(parse_digits("+1"), None);
        assert_eq!(parse_digits("-1"), None);
        assert_eq!(parse_digits(""), None);
    }

    #[test]
    fn test_cardinality() {
        assert!(element("unbounded", "0").is_array());
        assert!(element("3", "0").is_array());
        assert!(!element("1", "0").is_array());
        assert!(!element("many", "0").is_array());
        assert_eq!(element("1", "bogus").min_count(), 0);
        assert_eq!(element("many", "1").max_bound(), MaxOccurs::Invalid);
    }

    #[test]
    fn test_type_local_strips_prefix() {
        assert_eq!(element("1", "1").type_local(), "string");
    }

    #[test]
    fn test_derived_from_prefers_base() {
        let mut entry = TypeEntry::new("T", TypeKind::Complex);
        entry.restriction = Some("xs:hexBinary".to_string());
        assert_eq!(entry.derived_from(), Some("hexBinary"));
        entry.base = Some("sep:Resource".to_string());
        assert_eq!(entry.derived_from(), Some("Resource"));
        assert!(!entry.has_structure());
    }
}
