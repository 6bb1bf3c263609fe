//! Graph objects: entity instances with registry-driven attribute dispatch.

use std::{collections::BTreeMap, sync::Arc};

use tessera_core::{BoundProperty, PropertyValue, RawValue, ScalarKind, vocab};

use crate::{
  error::{Error, Result},
  registry::{AllowedProperty, ClassInfo, Registry},
};

/// An instance of a registered entity class.
///
/// The attribute surface is closed: the identity attribute (`URI`) plus the
/// short name of every property allowed on the class. Any other name is an
/// [`Error::UnknownAttribute`].
#[derive(Debug, Clone)]
pub struct GraphObject {
  registry:   Arc<Registry>,
  class:      Arc<ClassInfo>,
  identity:   Option<BoundProperty>,
  /// Stored values keyed by property URI.
  properties: BTreeMap<String, BoundProperty>,
}

impl PartialEq for GraphObject {
  fn eq(&self, other: &Self) -> bool {
    self.class.uri == other.class.uri
      && self.identity == other.identity
      && self.properties == other.properties
  }
}

impl GraphObject {
  pub fn new(registry: Arc<Registry>, class_uri: &str) -> Result<Self> {
    let class = Arc::clone(registry.resolve_class(class_uri)?);
    Ok(Self {
      registry,
      class,
      identity: None,
      properties: BTreeMap::new(),
    })
  }

  /// A new instance with a freshly minted identity.
  pub fn create(registry: Arc<Registry>, class_uri: &str) -> Result<Self> {
    let mut object = Self::new(registry, class_uri)?;
    let uri = object.registry.mint_uri(class_uri)?;
    object.set(vocab::IDENTITY_ATTRIBUTE, uri)?;
    Ok(object)
  }

  pub fn class(&self) -> &ClassInfo { &self.class }

  pub fn class_uri(&self) -> &str { &self.class.uri }

  pub fn registry(&self) -> &Arc<Registry> { &self.registry }

  pub fn uri(&self) -> Option<&str> {
    self.identity.as_ref().and_then(|b| b.value().as_str())
  }

  /// Attribute names this object answers to: `URI` first, then the allowed
  /// properties' short names in ancestor order. A short name shadowed by an
  /// earlier property is listed once.
  pub fn attribute_names(&self) -> Vec<&str> {
    let mut names = vec![vocab::IDENTITY_ATTRIBUTE];
    for p in self.class.allowed_properties() {
      if !names.contains(&p.short_name.as_str()) {
        names.push(&p.short_name);
      }
    }
    names
  }

  /// Write an attribute. [`RawValue::Null`] (or `None`) clears it.
  pub fn set(&mut self, name: &str, value: impl Into<RawValue>) -> Result<()> {
    let raw = value.into();
    if name == vocab::IDENTITY_ATTRIBUTE {
      self.identity = if raw.is_null() {
        None
      } else {
        Some(self.registry.bind(
          ScalarKind::Uri,
          vocab::IDENTITY_PROPERTY,
          raw,
        )?)
      };
      return Ok(());
    }

    let entry = self.attribute(name)?.clone();
    self.store(&entry, raw)
  }

  /// Read an attribute. `Ok(None)` means the attribute exists but is unset.
  pub fn get(&self, name: &str) -> Result<Option<&PropertyValue>> {
    if name == vocab::IDENTITY_ATTRIBUTE {
      return Ok(self.identity.as_ref().map(BoundProperty::value));
    }
    let entry = self.attribute(name)?;
    Ok(self.properties.get(&entry.uri).map(BoundProperty::value))
  }

  /// Write by property URI rather than short name. Returns `false` (and
  /// stores nothing) when the property is not allowed on the class.
  pub fn set_property(
    &mut self,
    property_uri: &str,
    value: impl Into<RawValue>,
  ) -> Result<bool> {
    if property_uri == vocab::IDENTITY_PROPERTY {
      self.set(vocab::IDENTITY_ATTRIBUTE, value)?;
      return Ok(true);
    }
    let Some(entry) = self.class.find_property(property_uri).cloned() else {
      return Ok(false);
    };
    self.store(&entry, value.into())?;
    Ok(true)
  }

  pub fn property(&self, property_uri: &str) -> Option<&BoundProperty> {
    self.properties.get(property_uri)
  }

  /// Stored values, excluding the identity, ordered by property URI.
  pub fn properties(&self) -> impl Iterator<Item = &BoundProperty> {
    self.properties.values()
  }

  fn attribute(&self, name: &str) -> Result<&AllowedProperty> {
    self
      .class
      .find_attribute(name)
      .ok_or_else(|| Error::UnknownAttribute {
        class:     self.class.uri.clone(),
        attribute: name.to_string(),
      })
  }

  fn store(&mut self, entry: &AllowedProperty, raw: RawValue) -> Result<()> {
    if raw.is_null() {
      self.properties.remove(&entry.uri);
      return Ok(());
    }
    let bound = self.registry.bind(entry.kind, &entry.uri, raw)?;
    self.properties.insert(entry.uri.clone(), bound);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use tessera_core::RawValue;

  use super::*;
  use crate::declaration::{EntityDeclaration, PropertyTrait, SchemaModule};

  const NS: &str = "http://example.org/people#";

  fn registry() -> Arc<Registry> {
    Arc::new(
      Registry::builder()
        .module(
          SchemaModule::new("people")
            .with_trait(PropertyTrait::new(NS, "hasName", ScalarKind::String))
            .with_trait(PropertyTrait::new(NS, "isActive", ScalarKind::Boolean))
            .with_trait(
              PropertyTrait::new(NS, "hasNickname", ScalarKind::String).multi_valued(),
            )
            .with_trait(PropertyTrait::new("http://example.org/other#", "hasName", ScalarKind::Integer))
            .with_entity(
              EntityDeclaration::new(format!("{NS}Person"))
                .with_property(format!("{NS}hasName"))
                .with_property(format!("{NS}isActive"))
                .with_property(format!("{NS}hasNickname")),
            )
            .with_entity(
              EntityDeclaration::new(format!("{NS}Employee"))
                .with_parent(format!("{NS}Person"))
                .with_property("http://example.org/other#hasName"),
            ),
        )
        .build(),
    )
  }

  #[test]
  fn name_round_trips() {
    let mut person = GraphObject::new(registry(), &format!("{NS}Person")).unwrap();
    person.set("name", "John").unwrap();
    assert_eq!(person.get("name").unwrap().unwrap(), &"John");
    assert_eq!(
      person.property(&format!("{NS}hasName")).unwrap().kind(),
      ScalarKind::String
    );
  }

  #[test]
  fn undeclared_attribute_is_an_error() {
    let mut person = GraphObject::new(registry(), &format!("{NS}Person")).unwrap();
    assert!(matches!(
      person.set("shoeSize", 42),
      Err(Error::UnknownAttribute { ref attribute, .. }) if attribute == "shoeSize"
    ));
    assert!(matches!(
      person.get("shoeSize"),
      Err(Error::UnknownAttribute { .. })
    ));
  }

  #[test]
  fn unset_attribute_reads_as_none() {
    let person = GraphObject::new(registry(), &format!("{NS}Person")).unwrap();
    assert!(person.get("active").unwrap().is_none());
    assert!(person.get("URI").unwrap().is_none());
  }

  #[test]
  fn null_clears() {
    let mut person = GraphObject::new(registry(), &format!("{NS}Person")).unwrap();
    person.set("active", true).unwrap();
    person.set("URI", "http://example.org/people/1").unwrap();
    person.set("active", RawValue::Null).unwrap();
    person.set("URI", None::<String>).unwrap();
    assert!(person.get("active").unwrap().is_none());
    assert!(person.uri().is_none());
  }

  #[test]
  fn identity_must_be_a_uri() {
    let mut person = GraphObject::new(registry(), &format!("{NS}Person")).unwrap();
    assert!(person.set("URI", "not a uri").is_err());
    person.set("URI", "urn:example:person:1").unwrap();
    assert_eq!(person.uri(), Some("urn:example:person:1"));
  }

  #[test]
  fn first_short_name_match_wins() {
    let mut employee =
      GraphObject::new(registry(), &format!("{NS}Employee")).unwrap();
    assert_eq!(employee.attribute_names(), [
      "URI", "name", "active", "nickname"
    ]);
    // the ancestor's string-valued hasName shadows the integer one
    employee.set("name", "Ada").unwrap();
    assert!(employee.property(&format!("{NS}hasName")).is_some());
    assert!(employee.property("http://example.org/other#hasName").is_none());

    assert!(
      employee
        .set_property("http://example.org/other#hasName", 7)
        .unwrap()
    );
    assert!(!employee.set_property("http://example.org/x#y", 7).unwrap());
  }

  #[test]
  fn multi_valued_attribute_keeps_order() {
    let mut person = GraphObject::new(registry(), &format!("{NS}Person")).unwrap();
    person.set("nickname", vec!["Jo", "Johnny"]).unwrap();
    let nicknames: Vec<_> = person
      .get("nickname")
      .unwrap()
      .unwrap()
      .entries()
      .map(|v| v.to_string())
      .collect();
    assert_eq!(nicknames, ["Jo", "Johnny"]);
  }

  #[test]
  fn create_mints_an_identity() {
    let person = GraphObject::create(registry(), &format!("{NS}Person")).unwrap();
    assert!(
      person
        .uri()
        .unwrap()
        .starts_with("http://example.org/people/Person/")
    );
  }
}
