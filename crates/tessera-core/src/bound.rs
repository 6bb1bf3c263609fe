//! A value bound to the property it was stored under.

use serde_json::Value;

use crate::{kind::ScalarKind, value::PropertyValue};

/// One stored `(property, value)` pair on a graph object.
///
/// Identity and hash are the pair itself: two bound properties are equal when
/// they name the same property URI and hold equal values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoundProperty {
  property_uri: String,
  value:        PropertyValue,
}

impl BoundProperty {
  pub fn new(property_uri: impl Into<String>, value: PropertyValue) -> Self {
    Self {
      property_uri: property_uri.into(),
      value,
    }
  }

  pub fn property_uri(&self) -> &str { &self.property_uri }

  pub fn value(&self) -> &PropertyValue { &self.value }

  pub fn into_value(self) -> PropertyValue { self.value }

  pub fn kind(&self) -> ScalarKind { self.value.kind() }

  pub fn is_multi_valued(&self) -> bool { self.value.is_multi() }

  pub fn to_flat(&self) -> Value { self.value.to_flat() }

  pub fn to_statement(&self) -> Value { self.value.to_statement() }
}
