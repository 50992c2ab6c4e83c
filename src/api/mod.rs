//! WADL resource extraction
//!
//! Flattens a WADL document into HTTP resources, methods, parameters and
//! representations for the OpenAPI composer.

pub mod model;
mod parser;

pub use model::{
    ApiModel, Method, Parameter, Representation, Request, Resource, Response, DEFAULT_BASE_URL,
};
pub use parser::ApiParser;
