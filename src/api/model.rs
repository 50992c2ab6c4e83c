//! HTTP resource model extracted from WADL

use serde::Serialize;

/// Base URL used when a `resources` container has no sample base
pub const DEFAULT_BASE_URL: &str = "http://localhost/sep/";

/// A WADL description flattened into a list of resources
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiModel {
    /// `wx:sampleBase` of the first `resources` container
    pub base_url: Option<String>,
    /// Every `resource` in document order, nested ones included
    pub resources: Vec<Resource>,
}

impl ApiModel {
    /// Look a resource up by id
    pub fn get_resource(&self, id: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id.as_deref() == Some(id))
    }
}

/// An addressable path
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Resource id
    pub id: Option<String>,
    /// URL template, `{name}` marks a placeholder; empty if unknown
    pub path: String,
    /// `doc/@title`
    pub title: Option<String>,
    /// `doc` text
    pub description: Option<String>,
    /// Methods in document order
    pub methods: Vec<Method>,
    /// Template parameters (`wx:sampleParam`)
    pub parameters: Vec<Parameter>,
}

/// One HTTP method on a resource
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    /// Method id, used as the OpenAPI operationId
    pub id: Option<String>,
    /// HTTP verb as written
    pub name: Option<String>,
    /// `wx:mode` (M, S, O, D)
    pub mode: Option<String>,
    /// Request description
    pub request: Option<Request>,
    /// Responses in document order
    pub responses: Vec<Response>,
}

/// Request part of a method
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Accepted representations
    pub representations: Vec<Representation>,
    /// Query, header or template parameters
    pub parameters: Vec<Parameter>,
}

/// One response of a method
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Status code, `"200"` when not given
    pub status: String,
    /// Returned representations
    pub representations: Vec<Representation>,
}

/// A (media type, element) pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Representation {
    /// `mediaType`
    pub media_type: Option<String>,
    /// Root element name, may carry a prefix
    pub element: Option<String>,
}

/// A request or template parameter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Parameter name
    pub name: Option<String>,
    /// `style` (query, header, template)
    pub style: Option<String>,
    /// Declared type, e.g. `xs:unsignedInt`
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    /// `required="true"`
    pub required: bool,
    /// `doc` text
    pub description: Option<String>,
}
