//! Class/property registry and graph objects.
//!
//! The registry maps class URIs to resolved entity classes and property URIs
//! to traits. It is built once, from schema documents and native
//! [`SchemaModule`] declarations, by [`build_registry`], and then shared as an
//! `Arc<Registry>`. [`GraphObject`]s hold that `Arc` and dispatch attribute
//! reads and writes through the per-class tables it precomputes.

pub mod declaration;
pub mod error;
mod flat;
pub mod object;
pub mod pipeline;
pub mod registry;
pub mod statement;

pub use declaration::{
  Declaration, EntityDeclaration, OntologyDeclaration, PropertyTrait,
  SchemaModule,
};
pub use error::{Error, Result};
pub use object::GraphObject;
pub use pipeline::{BuildOptions, build_registry};
pub use registry::{
  AllowedProperty, ClassInfo, DomainProperty, Registry, RegistryBuilder,
  SharedRegistry,
};
pub use statement::{ObjectTerm, Statement};
