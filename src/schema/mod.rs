//! XSD schema extraction
//!
//! Parses an XSD document into a [`SchemaModel`]: an insertion-ordered
//! registry of complex and simple types, plus top-level element
//! declarations. Renderers only ever read from the model.

pub mod annotations;
pub mod model;
mod parser;

pub use model::{
    Annotation, AttributeUse, Diagnostic, EnumRange, EnumValues, MaxOccurs, Property,
    PropertyKind, RootElement, SchemaModel, TypeEntry, TypeKind, TypeRef,
};
pub use parser::{derive_base_uri, SchemaParser, DEFAULT_BASE_URI};
