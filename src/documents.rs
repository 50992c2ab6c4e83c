//! XML document tree
//!
//! A small namespace-resolving element tree built on quick-xml. The XSD and
//! WADL extractors navigate it by `{namespace}local` names.

use crate::error::{Error, ParseError, Result};
use crate::limits::Limits;
use crate::namespaces::{NamespaceContext, NamespaceScope, QName};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

/// XML Element in the document tree
#[derive(Debug, Clone)]
pub struct Element {
    /// Element qualified name
    pub qname: QName,
    /// Element attributes
    pub attributes: HashMap<QName, String>,
    /// Concatenated text content of direct text children (if any)
    pub text: Option<String>,
    /// Child elements
    pub children: Vec<Element>,
    /// Namespace declarations made on this element
    pub namespaces: NamespaceContext,
}

impl Element {
    /// Create a new element
    pub fn new(qname: QName) -> Self {
        Self {
            qname,
            attributes: HashMap::new(),
            text: None,
            children: Vec::new(),
            namespaces: NamespaceContext::new(),
        }
    }

    /// Get the local name of the element
    pub fn local_name(&self) -> &str {
        &self.qname.local_name
    }

    /// Get the namespace of the element
    pub fn namespace(&self) -> Option<&str> {
        self.qname.namespace.as_deref()
    }

    /// True if the element is `{namespace}local_name`
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.qname.is(namespace, local_name)
    }

    /// Get an unqualified attribute value by name
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(&QName::local(name)).map(|s| s.as_str())
    }

    /// Get a namespace-qualified attribute value
    pub fn get_attribute_ns(&self, namespace: &str, name: &str) -> Option<&str> {
        self.attributes
            .get(&QName::namespaced(namespace, name))
            .map(|s| s.as_str())
    }

    /// Add a child element
    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Append text content
    pub fn append_text(&mut self, text: &str) {
        match self.text {
            Some(ref mut existing) => existing.push_str(text),
            None => self.text = Some(text.to_string()),
        }
    }

    /// All descendants in document order, excluding `self`
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants::new(self, None)
    }

    /// Descendants in document order, skipping any element matching `prune`
    /// together with its whole subtree
    pub fn descendants_pruned<'a>(&'a self, prune: &'a dyn Fn(&Element) -> bool) -> Descendants<'a> {
        Descendants::new(self, Some(prune))
    }

    /// First descendant named `{namespace}local_name`
    pub fn find(&self, namespace: &str, local_name: &str) -> Option<&Element> {
        self.descendants().find(|e| e.is(namespace, local_name))
    }

    /// All descendants named `{namespace}local_name`
    pub fn find_all<'a>(
        &'a self,
        namespace: &'a str,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.descendants().filter(move |e| e.is(namespace, local_name))
    }
}

/// Pre-order iterator over an element's descendants
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
    prune: Option<&'a dyn Fn(&Element) -> bool>,
}

impl<'a> Descendants<'a> {
    fn new(root: &'a Element, prune: Option<&'a dyn Fn(&Element) -> bool>) -> Self {
        Self {
            stack: root.children.iter().rev().collect(),
            prune,
        }
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let next = self.stack.pop()?;
            if self.prune.map_or(false, |prune| prune(next)) {
                continue;
            }
            self.stack.extend(next.children.iter().rev());
            return Some(next);
        }
    }
}

/// XML Document representation
#[derive(Debug, Default)]
pub struct Document {
    /// Root element of the document
    pub root: Option<Element>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an XML document from a string
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse(xml.as_bytes())
    }

    /// Parse an XML document from bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        Self::parse_with_limits(xml, &Limits::default())
    }

    /// Parse an XML document from bytes, enforcing `limits`
    pub fn parse_with_limits(xml: &[u8], limits: &Limits) -> Result<Self> {
        limits.check_xml_size(xml.len())?;

        let mut reader = Reader::from_reader(xml);
        reader.trim_text(true);

        let mut doc = Document::new();
        let mut element_stack: Vec<Element> = Vec::new();
        let mut scope = NamespaceScope::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    limits.check_xml_depth(element_stack.len() + 1)?;
                    let element = Self::parse_element(&e, &mut scope)?;
                    element_stack.push(element);
                }
                Ok(Event::End(_)) => {
                    scope.pop();
                    if let Some(current) = element_stack.pop() {
                        if let Some(parent) = element_stack.last_mut() {
                            parent.add_child(current);
                        } else {
                            doc.root = Some(current);
                        }
                    }
                }
                Ok(Event::Empty(e)) => {
                    limits.check_xml_depth(element_stack.len() + 1)?;
                    let element = Self::parse_element(&e, &mut scope)?;
                    scope.pop();
                    if let Some(parent) = element_stack.last_mut() {
                        parent.add_child(element);
                    } else {
                        doc.root = Some(element);
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some(current) = element_stack.last_mut() {
                        let text = e
                            .unescape()
                            .map_err(|e| Error::Xml(format!("Failed to unescape text: {}", e)))?;
                        if !text.trim().is_empty() {
                            current.append_text(&text);
                        }
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(current) = element_stack.last_mut() {
                        let text = std::str::from_utf8(&e)
                            .map_err(|e| Error::Xml(format!("Invalid CDATA content: {}", e)))?;
                        current.append_text(text);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Parse(ParseError::new(format!(
                        "Error parsing XML at position {}: {}",
                        reader.buffer_position(),
                        e
                    ))))
                }
                _ => {} // Comments, processing instructions, doctype
            }
            buf.clear();
        }

        if let Some(open) = element_stack.last() {
            return Err(Error::Parse(ParseError::new(format!(
                "Unexpected end of document: <{}> is not closed",
                open.local_name()
            ))));
        }

        Ok(doc)
    }

    /// Parse an element start tag, pushing its declarations onto `scope`
    fn parse_element(start: &BytesStart, scope: &mut NamespaceScope) -> Result<Element> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| Error::Xml(format!("Invalid element name: {}", e)))?
            .to_string();

        // Namespace declarations first, they apply to the element's own name
        let mut namespaces = NamespaceContext::new();
        let mut raw_attributes = Vec::new();
        for attr_result in start.attributes() {
            let attr = attr_result
                .map_err(|e| Error::Xml(format!("Failed to parse attribute: {}", e)))?;

            let attr_name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| Error::Xml(format!("Invalid attribute name: {}", e)))?
                .to_string();

            let attr_value = attr
                .unescape_value()
                .map_err(|e| Error::Xml(format!("Failed to unescape attribute value: {}", e)))?
                .to_string();

            if attr_name == "xmlns" {
                namespaces.set_default_namespace(attr_value);
            } else if let Some(prefix) = attr_name.strip_prefix("xmlns:") {
                namespaces.add_prefix(prefix, attr_value);
            } else {
                raw_attributes.push((attr_name, attr_value));
            }
        }

        scope.push(namespaces.clone());

        let mut element = Element::new(scope.resolve_element(&name)?);
        element.namespaces = namespaces;
        for (attr_name, attr_value) in raw_attributes {
            element
                .attributes
                .insert(scope.resolve_attribute(&attr_name)?, attr_value);
        }

        Ok(element)
    }

    /// Get the root element
    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces::{WADL_EXT_NAMESPACE, XSD_NAMESPACE};

    #[test]
    fn test_parse_simple_xml() {
        let xml = r#"<root><child>text</child></root>"#;
        let doc = Document::from_string(xml).unwrap();

        let root = doc.root.unwrap();
        assert_eq!(root.local_name(), "root");
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].local_name(), "child");
        assert_eq!(root.children[0].text.as_deref(), Some("text"));
    }

    #[test]
    fn test_parse_resolves_namespaces() {
        let xml = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
            <xs:complexType name="A"/>
        </xs:schema>"#;
        let doc = Document::from_string(xml).unwrap();

        let root = doc.root.unwrap();
        assert!(root.is(XSD_NAMESPACE, "schema"));
        assert!(root.children[0].is(XSD_NAMESPACE, "complexType"));
        assert_eq!(root.children[0].get_attribute("name"), Some("A"));
    }

    #[test]
    fn test_prefixed_attributes() {
        let xml = r#"<resources xmlns:wx="http://zigbee.org/wadlExt" wx:sampleBase="http://x/sep/"/>"#;
        let doc = Document::from_string(xml).unwrap();

        let root = doc.root.unwrap();
        assert_eq!(
            root.get_attribute_ns(WADL_EXT_NAMESPACE, "sampleBase"),
            Some("http://x/sep/")
        );
        assert_eq!(root.get_attribute("sampleBase"), None);
    }

    #[test]
    fn test_text_and_cdata_are_concatenated() {
        let xml = "<doc>0 = Off<!-- c --><![CDATA[\n1 = On]]></doc>";
        let doc = Document::from_string(xml).unwrap();
        assert_eq!(doc.root.unwrap().text.as_deref(), Some("0 = Off\n1 = On"));
    }

    #[test]
    fn test_descendants_in_document_order() {
        let xml = r#"<a><b><c/></b><d/></a>"#;
        let doc = Document::from_string(xml).unwrap();

        let names: Vec<_> = doc
            .root
            .as_ref()
            .unwrap()
            .descendants()
            .map(|e| e.local_name().to_string())
            .collect();
        assert_eq!(names, vec!["b", "c", "d"]);
    }

    #[test]
    fn test_descendants_pruned() {
        let xml = r#"<a><b><c/></b><d/></a>"#;
        let doc = Document::from_string(xml).unwrap();

        let prune = |e: &Element| e.local_name() == "b";
        let names: Vec<_> = doc
            .root
            .as_ref()
            .unwrap()
            .descendants_pruned(&prune)
            .map(|e| e.local_name().to_string())
            .collect();
        assert_eq!(names, vec!["d"]);
    }

    #[test]
    fn test_malformed_xml_fails() {
        assert!(Document::from_string("<a><b></a>").is_err());
        assert!(Document::from_string("<a><b>").is_err());
    }

    #[test]
    fn test_unbound_prefix_fails() {
        assert!(Document::from_string("<xs:schema/>").is_err());
    }

    #[test]
    fn test_depth_limit() {
        let limits = Limits::new().with_max_depth(2);
        assert!(Document::parse_with_limits(b"<a><b/></a>", &limits).is_ok());
        assert!(Document::parse_with_limits(b"<a><b><c/></b></a>", &limits).is_err());
    }
}
