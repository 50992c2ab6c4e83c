//! Name utilities
//!
//! Type references in XSD and WADL attributes are written as prefixed names
//! (`xs:string`, `sep:EndDevice`). The registry is keyed by local name.

/// Split a QName into prefix and local name
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    if let Some((prefix, local)) = qname.split_once(':') {
        (Some(prefix), local)
    } else {
        (None, qname)
    }
}

/// Strip any namespace prefix from a name
pub fn local_name(qname: &str) -> &str {
    split_qname(qname).1
}
