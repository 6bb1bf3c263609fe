//! The flat wire form.
//!
//! ```json
//! {
//!   "URI":  "http://example.org/people/Person/1",
//!   "type": "http://example.org/people#Person",
//!   "http://example.org/people#hasName": { "value": "John" }
//! }
//! ```

use std::sync::Arc;

use serde_json::{Map, Value};
use tessera_core::{RawValue, vocab};

use crate::{
  error::{Error, Result},
  object::GraphObject,
  registry::Registry,
};

impl GraphObject {
  /// One entry per stored property plus `URI` (when set) and `type`.
  pub fn to_flat(&self) -> Value {
    let mut map = Map::new();
    if let Some(uri) = self.uri() {
      map.insert(vocab::IDENTITY_ATTRIBUTE.to_string(), Value::from(uri));
    }
    map.insert(vocab::TYPE_KEY.to_string(), Value::from(self.class_uri()));
    for bound in self.properties() {
      map.insert(bound.property_uri().to_string(), bound.to_flat());
    }
    Value::Object(map)
  }

  /// Rebuild an object from its flat form. Keys naming properties the class
  /// does not allow are skipped.
  pub fn from_flat(registry: Arc<Registry>, flat: &Value) -> Result<Self> {
    let map = flat.as_object().ok_or_else(|| {
      tessera_core::Error::MalformedSerialization(format!("not an object: {flat}"))
    })?;
    let class = map
      .get(vocab::TYPE_KEY)
      .and_then(Value::as_str)
      .ok_or(Error::MissingType)?;

    let mut object = GraphObject::new(registry, class)?;
    if let Some(uri) = map.get(vocab::IDENTITY_ATTRIBUTE) {
      object.set(vocab::IDENTITY_ATTRIBUTE, RawValue::from_json(uri)?)?;
    }

    for (key, entry) in map {
      if key == vocab::IDENTITY_ATTRIBUTE || key == vocab::TYPE_KEY {
        continue;
      }
      if object.class().find_property(key).is_none() {
        tracing::debug!(class = %class, property = %key, "skipping unknown property");
        continue;
      }
      let value = entry
        .get("value")
        .ok_or_else(|| tessera_core::Error::MalformedSerialization(entry.to_string()))?;
      object.set_property(key, RawValue::from_json(value)?)?;
    }
    Ok(object)
  }

  pub fn to_flat_string(&self) -> Result<String> {
    Ok(serde_json::to_string(&self.to_flat())?)
  }

  pub fn from_flat_str(registry: Arc<Registry>, text: &str) -> Result<Self> {
    Self::from_flat(registry, &serde_json::from_str(text)?)
  }
}
