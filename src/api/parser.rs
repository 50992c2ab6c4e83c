//! WADL extraction

use std::path::Path;

use tracing::debug;

use super::model::{
    ApiModel, Method, Parameter, Representation, Request, Resource, Response, DEFAULT_BASE_URL,
};
use crate::documents::{Document, Element};
use crate::error::{Error, ParseError, Result};
use crate::limits::Limits;
use crate::loaders::Loader;
use crate::namespaces::{WADL_EXT_NAMESPACE, WADL_NAMESPACE};

/// Builds an [`ApiModel`] from WADL input
#[derive(Debug, Clone, Default)]
pub struct ApiParser {
    limits: Limits,
}

impl ApiParser {
    /// Create a parser with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Set input limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Parse WADL from a string
    pub fn parse_str(&self, xml: &str) -> Result<ApiModel> {
        let doc = Document::parse_with_limits(xml.as_bytes(), &self.limits)?;
        self.parse_document(&doc)
    }

    /// Parse a WADL file
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<ApiModel> {
        let path = path.as_ref();
        let bytes = Loader::new().with_limits(self.limits.clone()).load_bytes(path)?;
        Document::parse_with_limits(&bytes, &self.limits)
            .and_then(|doc| self.parse_document(&doc))
            .map_err(|e| e.at(path.display().to_string()))
    }

    /// Parse WADL from a parsed Document
    pub fn parse_document(&self, doc: &Document) -> Result<ApiModel> {
        let root = doc
            .root()
            .ok_or_else(|| Error::Parse(ParseError::new("Empty document")))?;

        let base_url = container(root).map(|resources| {
            resources
                .get_attribute_ns(WADL_EXT_NAMESPACE, "sampleBase")
                .unwrap_or(DEFAULT_BASE_URL)
                .to_string()
        });

        let resources: Vec<_> = std::iter::once(root)
            .chain(root.descendants())
            .filter(|e| e.is(WADL_NAMESPACE, "resource"))
            .map(parse_resource)
            .collect();

        debug!(resources = resources.len(), ?base_url, "parsed WADL");

        Ok(ApiModel { base_url, resources })
    }
}

impl ApiModel {
    /// Parse WADL from a string with default limits
    pub fn from_str(xml: &str) -> Result<Self> {
        ApiParser::new().parse_str(xml)
    }

    /// Parse a WADL file with default limits
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        ApiParser::new().parse_file(path)
    }
}

fn container(root: &Element) -> Option<&Element> {
    std::iter::once(root)
        .chain(root.descendants())
        .find(|e| e.is(WADL_NAMESPACE, "resources"))
}

fn is_resource(e: &Element) -> bool {
    e.is(WADL_NAMESPACE, "resource")
}

fn attr(elem: &Element, name: &str) -> Option<String> {
    elem.get_attribute(name).map(str::to_string)
}

fn doc_text(doc: &Element) -> Option<String> {
    doc.text.as_deref().map(str::trim).filter(|t| !t.is_empty()).map(str::to_string)
}

/// Resource fields come from its own subtree; nested resources are separate entries
fn parse_resource(resource: &Element) -> Resource {
    let own = || resource.descendants_pruned(&is_resource);

    let doc = own().find(|e| e.is(WADL_NAMESPACE, "doc"));
    let path = resource
        .get_attribute_ns(WADL_EXT_NAMESPACE, "samplePath")
        .or_else(|| resource.get_attribute("path"))
        .unwrap_or("")
        .to_string();

    Resource {
        id: attr(resource, "id"),
        path,
        title: doc.and_then(|d| attr(d, "title")),
        description: doc.and_then(doc_text),
        methods: own()
            .filter(|e| e.is(WADL_NAMESPACE, "method"))
            .map(parse_method)
            .collect(),
        parameters: own()
            .filter(|e| e.is(WADL_EXT_NAMESPACE, "sampleParam"))
            .map(|p| Parameter {
                name: attr(p, "name"),
                style: attr(p, "style"),
                type_name: attr(p, "type"),
                ..Default::default()
            })
            .collect(),
    }
}

fn parse_method(method: &Element) -> Method {
    Method {
        id: attr(method, "id"),
        name: attr(method, "name"),
        mode: method
            .get_attribute_ns(WADL_EXT_NAMESPACE, "mode")
            .map(str::to_string),
        request: method.find(WADL_NAMESPACE, "request").map(|request| Request {
            representations: representations(request),
            parameters: request
                .find_all(WADL_NAMESPACE, "param")
                .map(parse_param)
                .collect(),
        }),
        responses: method
            .find_all(WADL_NAMESPACE, "response")
            .map(|response| Response {
                status: response.get_attribute("status").unwrap_or("200").to_string(),
                representations: representations(response),
            })
            .collect(),
    }
}

fn representations(elem: &Element) -> Vec<Representation> {
    elem.find_all(WADL_NAMESPACE, "representation")
        .map(|r| Representation {
            media_type: attr(r, "mediaType"),
            element: attr(r, "element"),
        })
        .collect()
}

fn parse_param(param: &Element) -> Parameter {
    Parameter {
        name: attr(param, "name"),
        style: attr(param, "style"),
        type_name: attr(param, "type"),
        required: param.get_attribute("required") == Some("true"),
        description: param.find(WADL_NAMESPACE, "doc").and_then(doc_text),
    }
}
