//! # xsd-semantic
//!
//! Converts the IEEE 2030.5 (Smart Energy Profile) XSD, and optionally its
//! WADL resource description, into semantic and API artifacts.
//!
//! ## Features
//!
//! - JSON-LD context mapping XSD terms to IRIs
//! - RDF/OWL schema graph of the type hierarchy
//! - SHACL shapes with cardinality, datatype and enumeration constraints
//! - JSON Schema with documentation-mined enumerations and bitmasks
//! - OpenAPI 3.0 built from the JSON Schema and WADL resources
//! - JSON or comment-decorated YAML output
//!
//! ## Example
//!
//! ```rust,ignore
//! use xsd_semantic::render::{render_shacl, RenderOptions};
//! use xsd_semantic::schema::SchemaModel;
//!
//! let model = SchemaModel::from_file("sep.xsd")?;
//! let shapes = render_shacl(&model, &RenderOptions::default());
//! println!("{}", serde_json::to_string_pretty(&shapes)?);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;

// XML utilities
pub mod namespaces;
pub mod names;

// Resource loading
pub mod loaders;
pub mod documents;

// Input models
pub mod schema;
pub mod api;

// Output
pub mod render;
pub mod writer;

// Re-exports for convenience
pub use api::{ApiModel, ApiParser};
pub use error::{Error, Result};
pub use render::{OpenApiOptions, RenderOptions};
pub use schema::{SchemaModel, SchemaParser};
pub use writer::{write_document, OutputFormat};

/// Version of the xsd-semantic library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
