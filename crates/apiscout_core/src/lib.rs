//! Core data model for apiscout
//!
//! Type descriptors and the declaration table they resolve against, the
//! endpoint/tag model produced by route extraction, the primitive type
//! classifier, and the OpenAPI document structures written at the end of a run.

pub mod data_type;
pub mod declaration;
pub mod descriptor;
pub mod endpoint;
pub mod openapi;
pub mod schema;

pub use data_type::OpenApiDataType;
pub use declaration::{AccessorDecl, FieldDecl, TypeDecl, TypeRegistry};
pub use descriptor::{Classification, TypeDescriptor, TypeExpr, TypeIdentity, TypeKind};
pub use endpoint::{Endpoint, EndpointParameter, HttpMethod, ParameterLocation, Tag};
