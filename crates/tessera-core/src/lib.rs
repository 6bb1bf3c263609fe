//! Core value types for the Tessera graph object model.
//!
//! This crate knows nothing about ontologies or registries. It defines the
//! scalar kinds a property value can take, the strict coercion rules that turn
//! loosely typed input into a [`PropertyValue`], and the two serialized forms
//! (flat and statement) every value supports.
//!
//! ```
//! use tessera_core::{PropertyValue, RawValue, ScalarKind};
//!
//! let v = PropertyValue::coerce(ScalarKind::Integer, RawValue::from("42")).unwrap();
//! assert_eq!(v, 42_i64);
//! assert_eq!(v.to_flat(), serde_json::json!({ "value": 42 }));
//! ```

pub mod bound;
pub mod error;
pub mod kind;
pub mod literal;
pub mod raw;
pub mod uri;
pub mod value;
pub mod vocab;

pub use bound::BoundProperty;
pub use error::{Error, Result};
pub use kind::{Datatype, ScalarKind};
pub use literal::{GeoLocation, Truth};
pub use raw::RawValue;
pub use value::{MultiValue, PropertyValue};
