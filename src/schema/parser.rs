//! XSD extraction
//!
//! Single pass over an XSD document tree. Type declarations are collected
//! wherever they appear (not only at top level) and indexed by local name.

use std::path::Path;

use indexmap::IndexMap;
use tracing::{debug, warn};
use url::Url;

use super::annotations;
use super::model::{
    Annotation, AttributeUse, Diagnostic, Property, PropertyKind, RootElement, SchemaModel,
    TypeEntry, TypeKind,
};
use crate::documents::{Document, Element};
use crate::error::{Error, ParseError, Result};
use crate::limits::Limits;
use crate::loaders::Loader;
use crate::names::local_name;
use crate::namespaces::XSD_NAMESPACE;

/// Base URI used when neither the caller nor the schema provides one
pub const DEFAULT_BASE_URI: &str = "https://schemas.ieee.org/2030.5/";

/// XSD element local names
mod xsd_elements {
    pub const SCHEMA: &str = "schema";
    pub const ELEMENT: &str = "element";
    pub const COMPLEX_TYPE: &str = "complexType";
    pub const SIMPLE_TYPE: &str = "simpleType";
    pub const ATTRIBUTE: &str = "attribute";
    pub const ANNOTATION: &str = "annotation";
    pub const DOCUMENTATION: &str = "documentation";
    pub const RESTRICTION: &str = "restriction";
    pub const EXTENSION: &str = "extension";
    pub const ENUMERATION: &str = "enumeration";
}

/// XSD attribute names
mod xsd_attrs {
    pub const NAME: &str = "name";
    pub const TYPE: &str = "type";
    pub const REF: &str = "ref";
    pub const TARGET_NAMESPACE: &str = "targetNamespace";
    pub const DEFAULT: &str = "default";
    pub const BASE: &str = "base";
    pub const VALUE: &str = "value";
    pub const MIN_OCCURS: &str = "minOccurs";
    pub const MAX_OCCURS: &str = "maxOccurs";
    pub const USE: &str = "use";
}

/// Builds a [`SchemaModel`] from XSD input
#[derive(Debug, Clone, Default)]
pub struct SchemaParser {
    base_uri: Option<String>,
    limits: Limits,
}

impl SchemaParser {
    /// Create a parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit vocabulary base URI instead of deriving one
    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = Some(base_uri.into());
        self
    }

    /// Set input limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Parse an XSD schema from a string
    pub fn parse_str(&self, xml: &str) -> Result<SchemaModel> {
        self.parse_bytes(xml.as_bytes())
    }

    /// Parse an XSD schema from bytes
    pub fn parse_bytes(&self, xml: &[u8]) -> Result<SchemaModel> {
        let doc = Document::parse_with_limits(xml, &self.limits)?;
        self.parse_document(&doc)
    }

    /// Parse an XSD schema from a file path
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<SchemaModel> {
        let path = path.as_ref();
        let bytes = Loader::new().with_limits(self.limits.clone()).load_bytes(path)?;
        self.parse_bytes(&bytes)
            .map_err(|e| e.at(path.display().to_string()))
    }

    /// Parse an XSD schema from a parsed Document
    pub fn parse_document(&self, doc: &Document) -> Result<SchemaModel> {
        let root = doc
            .root()
            .ok_or_else(|| Error::Parse(ParseError::new("Empty document")))?;

        if root.local_name() != xsd_elements::SCHEMA {
            return Err(Error::Parse(ParseError::new(format!(
                "Expected xs:schema root element, got {}",
                root.local_name()
            ))));
        }

        let target_namespace = root
            .get_attribute(xsd_attrs::TARGET_NAMESPACE)
            .map(str::to_string);

        let base_uri = self
            .base_uri
            .clone()
            .or_else(|| target_namespace.as_deref().and_then(derive_base_uri))
            .unwrap_or_else(|| DEFAULT_BASE_URI.to_string());

        let mut types: IndexMap<String, TypeEntry> = IndexMap::new();
        let mut diagnostics = Vec::new();

        for (kind, local) in [
            (TypeKind::Complex, xsd_elements::COMPLEX_TYPE),
            (TypeKind::Simple, xsd_elements::SIMPLE_TYPE),
        ] {
            for elem in root.find_all(XSD_NAMESPACE, local) {
                let Some(name) = elem.get_attribute(xsd_attrs::NAME) else {
                    continue;
                };
                let entry = parse_type(name, kind, elem);
                // IndexMap keeps the first insertion position, like the registry order callers see
                if let Some(replaced) = types.insert(name.to_string(), entry) {
                    warn!(name, ?kind, "duplicate type name, later declaration wins");
                    diagnostics.push(Diagnostic::DuplicateTypeName {
                        name: name.to_string(),
                        winner: kind,
                        replaced: replaced.kind,
                    });
                }
            }
        }

        let mut root_elements = IndexMap::new();
        for elem in root
            .children
            .iter()
            .filter(|e| e.is(XSD_NAMESPACE, xsd_elements::ELEMENT))
        {
            if let Some(name) = elem.get_attribute(xsd_attrs::NAME) {
                root_elements.insert(
                    name.to_string(),
                    RootElement {
                        name: name.to_string(),
                        type_name: elem.get_attribute(xsd_attrs::TYPE).map(str::to_string),
                        min_occurs: occurs(elem, xsd_attrs::MIN_OCCURS),
                        max_occurs: occurs(elem, xsd_attrs::MAX_OCCURS),
                    },
                );
            }
        }

        debug!(
            types = types.len(),
            root_elements = root_elements.len(),
            duplicates = diagnostics.len(),
            %base_uri,
            "parsed XSD schema"
        );

        Ok(SchemaModel {
            base_uri,
            target_namespace,
            types,
            root_elements,
            diagnostics,
        })
    }
}

impl SchemaModel {
    /// Parse an XSD schema from a string with default settings
    pub fn from_str(xml: &str) -> Result<Self> {
        SchemaParser::new().parse_str(xml)
    }

    /// Parse an XSD schema file with default settings
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        SchemaParser::new().parse_file(path)
    }
}

/// Turn a target namespace into a vocabulary IRI
///
/// `urn:ieee:std:2030.5:ns` becomes `https://ieee/std/2030.5/ns/`; http(s)
/// namespaces are used as they are. Returns `None` if the result is not an
/// absolute URL.
pub fn derive_base_uri(namespace: &str) -> Option<String> {
    let namespace = namespace.trim();
    let mut iri = match namespace.strip_prefix("urn:") {
        Some(rest) => format!("https://{}", rest.replace(':', "/")),
        None => namespace.to_string(),
    };

    let url = Url::parse(&iri).ok()?;
    if url.cannot_be_a_base() {
        return None;
    }

    if !iri.ends_with('/') && !iri.ends_with('#') {
        iri.push('/');
    }
    Some(iri)
}

fn occurs(elem: &Element, attr: &str) -> String {
    elem.get_attribute(attr).unwrap_or("1").to_string()
}

/// Documentation text of the first annotation in `elem`'s subtree
fn documentation(elem: &Element) -> (Option<String>, Annotation) {
    let Some(doc) = elem
        .find(XSD_NAMESPACE, xsd_elements::ANNOTATION)
        .and_then(|a| a.find(XSD_NAMESPACE, xsd_elements::DOCUMENTATION))
    else {
        return (None, Annotation::default());
    };

    let text = doc.text.as_deref().unwrap_or("");
    let annotation = annotations::interpret(text);
    let trimmed = text.trim();
    let documentation = (!trimmed.is_empty()).then(|| trimmed.to_string());
    (documentation, annotation)
}

fn parse_type(name: &str, kind: TypeKind, elem: &Element) -> TypeEntry {
    let mut entry = TypeEntry::new(name, kind);

    let (doc, annotation) = documentation(elem);
    entry.documentation = doc;
    entry.annotation = annotation;

    let extension = elem.find(XSD_NAMESPACE, xsd_elements::EXTENSION);
    if let Some(extension) = extension {
        entry.base = extension.get_attribute(xsd_attrs::BASE).map(str::to_string);
        entry.elements = extension
            .find_all(XSD_NAMESPACE, xsd_elements::ELEMENT)
            .filter_map(element_property)
            .collect();
    }

    if let Some(restriction) = elem.find(XSD_NAMESPACE, xsd_elements::RESTRICTION) {
        entry.restriction = restriction.get_attribute(xsd_attrs::BASE).map(str::to_string);
        for facet in restriction.find_all(XSD_NAMESPACE, xsd_elements::ENUMERATION) {
            let Some(value) = facet.get_attribute(xsd_attrs::VALUE).filter(|v| !v.is_empty())
            else {
                continue;
            };
            let description = documentation(facet).0.unwrap_or_else(|| value.to_string());
            entry
                .annotation
                .values
                .get_or_insert_with(Default::default)
                .insert(value.to_string(), description);
        }
    }

    entry.attributes = elem
        .find_all(XSD_NAMESPACE, xsd_elements::ATTRIBUTE)
        .filter_map(attribute_property)
        .collect();

    if extension.is_none() {
        entry.elements = elem
            .find_all(XSD_NAMESPACE, xsd_elements::ELEMENT)
            .filter_map(element_property)
            .collect();
    }

    entry
}

/// Name and type of a declaration; `ref` stands in for both when there is no name
fn declared_name(elem: &Element) -> Option<(String, Option<String>)> {
    match (elem.get_attribute(xsd_attrs::NAME), elem.get_attribute(xsd_attrs::REF)) {
        (Some(name), _) => Some((
            name.to_string(),
            elem.get_attribute(xsd_attrs::TYPE).map(str::to_string),
        )),
        (None, Some(reference)) => Some((local_name(reference).to_string(), Some(reference.to_string()))),
        (None, None) => None,
    }
}

fn element_property(elem: &Element) -> Option<Property> {
    let (name, type_name) = declared_name(elem)?;
    let (documentation, annotation) = documentation(elem);
    Some(Property {
        kind: PropertyKind::Element,
        name,
        type_name,
        min_occurs: occurs(elem, xsd_attrs::MIN_OCCURS),
        max_occurs: occurs(elem, xsd_attrs::MAX_OCCURS),
        usage: None,
        default: None,
        documentation,
        annotation,
    })
}

fn attribute_property(elem: &Element) -> Option<Property> {
    let (name, type_name) = declared_name(elem)?;
    let usage = match elem.get_attribute(xsd_attrs::USE) {
        Some("required") => AttributeUse::Required,
        _ => AttributeUse::Optional,
    };
    let (documentation, annotation) = documentation(elem);
    Some(Property {
        kind: PropertyKind::Attribute,
        name,
        type_name,
        min_occurs: if usage == AttributeUse::Required { "1" } else { "0" }.to_string(),
        max_occurs: "1".to_string(),
        usage: Some(usage),
        default: elem.get_attribute(xsd_attrs::DEFAULT).map(str::to_string),
        documentation,
        annotation,
    })
}
