//! XML namespace handling
//!
//! Qualified names, prefix scopes, and the namespaces the parsers look for
//! in XSD and WADL input.

use crate::error::{Error, ParseError, Result};
use std::collections::HashMap;
use std::fmt;

/// XML Schema namespace
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// WADL namespace
pub const WADL_NAMESPACE: &str = "http://wadl.dev.java.net/2009/02";

/// ZigBee WADL extension namespace (sample paths, sample base URL)
pub const WADL_EXT_NAMESPACE: &str = "http://zigbee.org/wadlExt";

/// XML namespace, implicitly bound to the `xml` prefix
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Qualified name (QName) - combination of namespace and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<String>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a new QName
    pub fn new(namespace: Option<impl Into<String>>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(|s| s.into()),
            local_name: local_name.into(),
        }
    }

    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }

    /// True if this name is `{namespace}local_name`
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.local_name == local_name && self.namespace.as_deref() == Some(namespace)
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// Namespace declarations made on a single element
#[derive(Debug, Clone, Default)]
pub struct NamespaceContext {
    /// Mapping from prefix to namespace URI
    prefixes: HashMap<String, String>,
    /// Default namespace (no prefix); `Some("")` undeclares it
    default_namespace: Option<String>,
}

impl NamespaceContext {
    /// Create a new empty namespace context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a namespace prefix mapping
    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Set the default namespace
    pub fn set_default_namespace(&mut self, namespace: impl Into<String>) {
        self.default_namespace = Some(namespace.into());
    }

    /// Get the namespace for a prefix
    pub fn get_namespace(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(|s| s.as_str())
    }

    /// Get the default namespace
    pub fn get_default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    /// Iterate over prefix declarations
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.prefixes.iter()
    }

    /// True if the element declared nothing
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty() && self.default_namespace.is_none()
    }
}

/// Stack of in-scope namespace declarations while walking a document
#[derive(Debug, Default)]
pub struct NamespaceScope {
    frames: Vec<NamespaceContext>,
}

impl NamespaceScope {
    /// Create an empty scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter an element carrying `context` declarations
    pub fn push(&mut self, context: NamespaceContext) {
        self.frames.push(context);
    }

    /// Leave the innermost element
    pub fn pop(&mut self) {
        self.frames.pop();
    }

    fn lookup_prefix(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(XML_NAMESPACE);
        }
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get_namespace(prefix))
    }

    fn default_namespace(&self) -> Option<&str> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get_default_namespace())
            .filter(|ns| !ns.is_empty())
    }

    /// Resolve an element name; unprefixed names take the default namespace
    pub fn resolve_element(&self, name: &str) -> Result<QName> {
        match name.split_once(':') {
            Some((prefix, local)) => self.resolve_prefixed(prefix, local),
            None => Ok(QName::new(self.default_namespace(), name)),
        }
    }

    /// Resolve an attribute name; unprefixed attributes have no namespace
    pub fn resolve_attribute(&self, name: &str) -> Result<QName> {
        match name.split_once(':') {
            Some((prefix, local)) => self.resolve_prefixed(prefix, local),
            None => Ok(QName::local(name)),
        }
    }

    fn resolve_prefixed(&self, prefix: &str, local: &str) -> Result<QName> {
        let namespace = self.lookup_prefix(prefix).ok_or_else(|| {
            Error::Parse(ParseError::new(format!("Unbound namespace prefix: {}", prefix)))
        })?;
        Ok(QName::namespaced(namespace, local))
    }
}
