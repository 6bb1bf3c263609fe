//! The class/property registry.
//!
//! A [`Registry`] is assembled once by a [`RegistryBuilder`] from registered
//! [`SchemaModule`]s and the extracted schema facts. Every per-class lookup
//! (ancestor chain, allowed properties, attribute short names) is computed at
//! build time; after that the registry is immutable and is shared behind an
//! `Arc`. [`SharedRegistry`] swaps in a rebuilt registry wholesale.

use std::{
  collections::{BTreeMap, BTreeSet, HashSet},
  sync::{Arc, PoisonError, RwLock},
};

use serde::Serialize;
use tessera_core::{
  BoundProperty, MultiValue, PropertyValue, RawValue, ScalarKind,
  uri::split_iri, vocab,
};
use tessera_ontology::{DomainRange, LoadedOntology, PropertyKind, SchemaSet};
use uuid::Uuid;

use crate::{
  declaration::{Declaration, EntityDeclaration, PropertyTrait, SchemaModule},
  error::{Error, Result},
};

// ─── Lookup types ────────────────────────────────────────────────────────────

/// One entry of a class's attribute surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllowedProperty {
  pub uri:             String,
  /// Attribute name the property is reachable under.
  pub short_name:      String,
  pub kind:            ScalarKind,
  pub multiple_values: bool,
}

/// A `(property, kind)` pair from the schema's domain facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainProperty {
  pub uri:  String,
  pub kind: PropertyKind,
}

/// A resolved entity class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassInfo {
  pub uri:            String,
  pub parent:         Option<String>,
  pub label:          Option<String>,
  /// Module the winning declaration came from.
  pub module_id:      String,
  /// Trait URIs this class declares itself.
  pub own_properties: Vec<String>,
  ancestors:          Vec<String>,
  allowed:            Vec<AllowedProperty>,
}

impl ClassInfo {
  /// The chain from the root class down to and including this class.
  pub fn ancestors(&self) -> &[String] { &self.ancestors }

  /// Ancestor-first attribute surface. An ancestor's property is never listed
  /// twice.
  pub fn allowed_properties(&self) -> &[AllowedProperty] { &self.allowed }

  /// First allowed property whose short name is `name`.
  pub fn find_attribute(&self, name: &str) -> Option<&AllowedProperty> {
    self.allowed.iter().find(|p| p.short_name == name)
  }

  pub fn find_property(&self, uri: &str) -> Option<&AllowedProperty> {
    self.allowed.iter().find(|p| p.uri == uri)
  }

  pub fn is_subclass_of(&self, class: &str) -> bool {
    self.ancestors.iter().any(|a| a == class)
  }
}

// ─── Registry ────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Registry {
  classes:    BTreeMap<String, Arc<ClassInfo>>,
  traits:     BTreeMap<String, PropertyTrait>,
  /// Declared ontology IRI → module id.
  declared:   BTreeMap<String, String>,
  ontologies: Vec<LoadedOntology>,
  namespaces: BTreeMap<String, String>,
  schema:     DomainRange,
}

impl Default for Registry {
  fn default() -> Self { RegistryBuilder::new().build() }
}

impl Registry {
  pub fn builder() -> RegistryBuilder { RegistryBuilder::new() }

  pub fn resolve_class(&self, uri: &str) -> Result<&Arc<ClassInfo>> {
    self
      .classes
      .get(uri)
      .ok_or_else(|| Error::ClassNotFound(uri.to_string()))
  }

  pub fn resolve_trait(&self, uri: &str) -> Result<&PropertyTrait> {
    self
      .traits
      .get(uri)
      .ok_or_else(|| Error::TraitNotFound(uri.to_string()))
  }

  pub fn get_allowed_properties(&self, class: &str) -> Result<&[AllowedProperty]> {
    Ok(self.resolve_class(class)?.allowed_properties())
  }

  /// Schema-declared properties for `class`: the domain facts of the class,
  /// its superclasses and their equivalent classes. Sorted by URI.
  pub fn get_domain_property_list(&self, class: &str) -> Vec<DomainProperty> {
    let mut out = BTreeMap::new();
    for c in self.schema.superclass_closure(class) {
      let Some(properties) = self.schema.properties_for_class(&c) else {
        continue;
      };
      for uri in properties {
        if let Some(descriptor) = self.schema.property(uri) {
          out.insert(uri.clone(), descriptor.kind);
        }
      }
    }
    out
      .into_iter()
      .map(|(uri, kind)| DomainProperty { uri, kind })
      .collect()
  }

  /// Coerce `raw` to `kind` and bind it to `property_uri`. A multi-valued
  /// trait wraps the value (or list of values) in an ordered container.
  pub fn bind(
    &self,
    kind: ScalarKind,
    property_uri: &str,
    raw: impl Into<RawValue>,
  ) -> Result<BoundProperty> {
    let t = self.resolve_trait(property_uri)?;
    let raw = raw.into();
    let value = if t.multiple_values {
      PropertyValue::Multi(MultiValue::coerce(kind, raw)?)
    } else {
      PropertyValue::coerce(kind, raw)?
    };
    Ok(BoundProperty::new(property_uri, value))
  }

  /// A fresh identity for an instance of `class`:
  /// `{class namespace}/{ClassLocalName}/{uuid}`.
  pub fn mint_uri(&self, class: &str) -> Result<String> {
    let info = self.resolve_class(class)?;
    let (namespace, local) = split_iri(&info.uri);
    let namespace = namespace.trim_end_matches(['#', '/']);
    Ok(format!("{namespace}/{local}/{}", Uuid::new_v4()))
  }

  pub fn classes(&self) -> impl Iterator<Item = &Arc<ClassInfo>> {
    self.classes.values()
  }

  pub fn traits(&self) -> impl Iterator<Item = &PropertyTrait> {
    self.traits.values()
  }

  pub fn declared_ontologies(&self) -> impl Iterator<Item = (&str, &str)> {
    self
      .declared
      .iter()
      .map(|(iri, module)| (iri.as_str(), module.as_str()))
  }

  /// Ontologies loaded from schema documents, in load order.
  pub fn ontologies(&self) -> &[LoadedOntology] { &self.ontologies }

  pub fn namespaces(&self) -> &BTreeMap<String, String> { &self.namespaces }

  pub fn schema(&self) -> &DomainRange { &self.schema }
}

// ─── Builder ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RegistryBuilder {
  modules:    Vec<SchemaModule>,
  ontologies: Vec<LoadedOntology>,
  namespaces: BTreeMap<String, String>,
  schema:     DomainRange,
}

/// A declaration tagged with the module that made it.
struct Owned<T> {
  module: String,
  item:   T,
}

impl RegistryBuilder {
  pub fn new() -> Self { Self::default() }

  /// Attach loaded schema facts. Only the ontology list, the namespace map and
  /// the extracted facts are kept; the triples are dropped.
  pub fn with_schema(mut self, set: SchemaSet, schema: DomainRange) -> Self {
    self.ontologies = set.ontologies;
    self.namespaces = set.namespaces;
    self.schema = schema;
    self
  }

  /// Register a module. Later registrations win over earlier ones for the same
  /// class or trait URI.
  pub fn register(&mut self, module: SchemaModule) -> &mut Self {
    self.modules.push(module);
    self
  }

  pub fn module(mut self, module: SchemaModule) -> Self {
    self.register(module);
    self
  }

  pub fn build(self) -> Registry {
    let mut traits: BTreeMap<String, Owned<PropertyTrait>> = BTreeMap::new();
    let mut entities: BTreeMap<String, Owned<EntityDeclaration>> =
      BTreeMap::new();
    let mut declared: BTreeMap<String, String> = BTreeMap::new();

    let identity = PropertyTrait::identity();
    traits.insert(identity.uri(), Owned {
      module: BUILTIN.to_string(),
      item:   identity,
    });
    entities.insert(vocab::GRAPH_OBJECT.to_string(), Owned {
      module: BUILTIN.to_string(),
      item:   EntityDeclaration::new(vocab::GRAPH_OBJECT).with_label("GraphObject"),
    });

    for module in self.modules {
      if let Err(e) = module.validate() {
        tracing::warn!(module = %module.id, error = %e, "skipping module");
        continue;
      }
      for declaration in module.declarations {
        match declaration {
          Declaration::Trait(t) => {
            let uri = t.uri();
            if let Some(previous) = traits.get(&uri) {
              redeclared("trait", &uri, &previous.module, &module.id);
            }
            traits.insert(uri, Owned {
              module: module.id.clone(),
              item:   t,
            });
          }
          Declaration::Entity(e) => {
            if let Some(previous) = entities.get(&e.uri) {
              redeclared("entity", &e.uri, &previous.module, &module.id);
            }
            entities.insert(e.uri.clone(), Owned {
              module: module.id.clone(),
              item:   e,
            });
          }
          Declaration::Ontology(o) => {
            if let Some(previous) = declared.get(&o.iri) {
              redeclared("ontology", &o.iri, previous, &module.id);
            }
            declared.insert(o.iri, module.id.clone());
          }
        }
      }
    }

    let classes = resolve_classes(&entities, &traits);
    tracing::info!(
      classes = classes.len(),
      traits = traits.len(),
      "registry built"
    );

    Registry {
      classes,
      traits: traits.into_iter().map(|(k, v)| (k, v.item)).collect(),
      declared,
      ontologies: self.ontologies,
      namespaces: self.namespaces,
      schema: self.schema,
    }
  }
}

const BUILTIN: &str = "builtin";

fn redeclared(what: &str, uri: &str, previous: &str, module: &str) {
  tracing::warn!(
    uri = %uri,
    previous = %previous,
    module = %module,
    "{what} redeclared, last registration wins"
  );
}

/// Compute ancestor chains and attribute surfaces. Entities whose chain does
/// not reach the root are dropped.
fn resolve_classes(
  entities: &BTreeMap<String, Owned<EntityDeclaration>>,
  traits: &BTreeMap<String, Owned<PropertyTrait>>,
) -> BTreeMap<String, Arc<ClassInfo>> {
  let parent_of = |decl: &EntityDeclaration| -> Option<String> {
    if decl.uri == vocab::GRAPH_OBJECT {
      None
    } else {
      Some(
        decl
          .parent
          .clone()
          .unwrap_or_else(|| vocab::GRAPH_OBJECT.to_string()),
      )
    }
  };

  let mut classes = BTreeMap::new();

  'entities: for (uri, owned) in entities {
    // Walk up to the root, then reverse.
    let mut chain = vec![uri.clone()];
    let mut visited: HashSet<&str> = HashSet::from([uri.as_str()]);
    let mut current = &owned.item;
    while let Some(parent) = parent_of(current) {
      let Some(next) = entities.get(&parent) else {
        tracing::warn!(class = %uri, parent = %parent, "unknown parent class, dropping entity");
        continue 'entities;
      };
      if !visited.insert(next.item.uri.as_str()) {
        tracing::warn!(class = %uri, "ancestor chain loops, dropping entity");
        continue 'entities;
      }
      chain.push(parent);
      current = &next.item;
    }
    chain.reverse();

    let mut allowed = Vec::new();
    let mut listed = BTreeSet::new();
    for class in &chain {
      let Some(decl) = entities.get(class) else {
        continue;
      };
      for property in &decl.item.properties {
        let Some(t) = traits.get(property) else {
          tracing::warn!(
            class = %class,
            property = %property,
            "entity names an unknown trait, dropping property"
          );
          continue;
        };
        if listed.insert(property.clone()) {
          allowed.push(AllowedProperty {
            uri:             property.clone(),
            short_name:      t.item.short_name(),
            kind:            t.item.kind,
            multiple_values: t.item.multiple_values,
          });
        }
      }
    }

    classes.insert(
      uri.clone(),
      Arc::new(ClassInfo {
        uri: uri.clone(),
        parent: parent_of(&owned.item),
        label: owned.item.label.clone(),
        module_id: owned.module.clone(),
        own_properties: owned.item.properties.clone(),
        ancestors: chain,
        allowed,
      }),
    );
  }

  classes
}

// ─── Shared handle ───────────────────────────────────────────────────────────

/// A process-wide registry handle. Readers take a snapshot `Arc`; a rebuild
/// replaces the whole registry at once.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
  inner: Arc<RwLock<Arc<Registry>>>,
}

impl SharedRegistry {
  pub fn new(registry: Registry) -> Self {
    Self {
      inner: Arc::new(RwLock::new(Arc::new(registry))),
    }
  }

  pub fn current(&self) -> Arc<Registry> {
    self
      .inner
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
  }

  /// Swap in `registry`, returning the one it replaced.
  pub fn replace(&self, registry: Registry) -> Arc<Registry> {
    let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *guard, Arc::new(registry))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const NS: &str = "http://example.org/onto#";

  fn uri(local: &str) -> String { format!("{NS}{local}") }

  fn chain_module() -> SchemaModule {
    SchemaModule::new("chain")
      .with_trait(PropertyTrait::new(NS, "p0", ScalarKind::String))
      .with_trait(PropertyTrait::new(NS, "p1", ScalarKind::Integer))
      .with_trait(PropertyTrait::new(NS, "p2", ScalarKind::Boolean))
      .with_entity(EntityDeclaration::new(uri("Root")).with_property(uri("p0")))
      .with_entity(
        EntityDeclaration::new(uri("Mid"))
          .with_parent(uri("Root"))
          .with_property(uri("p1"))
          .with_property(uri("p0")),
      )
      .with_entity(
        EntityDeclaration::new(uri("Leaf"))
          .with_parent(uri("Mid"))
          .with_property(uri("p2")),
      )
  }

  #[test]
  fn allowed_properties_are_ancestor_first() {
    let registry = Registry::builder().module(chain_module()).build();
    let allowed: Vec<_> = registry
      .get_allowed_properties(&uri("Leaf"))
      .unwrap()
      .iter()
      .map(|p| p.uri.clone())
      .collect();
    assert_eq!(allowed, [uri("p0"), uri("p1"), uri("p2")]);

    let leaf = registry.resolve_class(&uri("Leaf")).unwrap();
    assert_eq!(leaf.ancestors(), [
      vocab::GRAPH_OBJECT.to_string(),
      uri("Root"),
      uri("Mid"),
      uri("Leaf"),
    ]);
    assert!(leaf.is_subclass_of(&uri("Root")));
  }

  #[test]
  fn misses_are_not_found() {
    let registry = Registry::default();
    assert!(matches!(
      registry.resolve_class("http://example.org/Nope"),
      Err(Error::ClassNotFound(_))
    ));
    assert!(matches!(
      registry.resolve_trait("http://example.org/nope"),
      Err(Error::TraitNotFound(_))
    ));
    assert!(registry.resolve_class(vocab::GRAPH_OBJECT).is_ok());
    assert_eq!(
      registry.resolve_trait(vocab::IDENTITY_PROPERTY).unwrap().kind,
      ScalarKind::Uri
    );
  }

  #[test]
  fn broken_entities_are_dropped() {
    let registry = Registry::builder()
      .module(
        SchemaModule::new("broken")
          .with_entity(EntityDeclaration::new(uri("Orphan")).with_parent(uri("Ghost")))
          .with_entity(EntityDeclaration::new(uri("A")).with_parent(uri("B")))
          .with_entity(EntityDeclaration::new(uri("B")).with_parent(uri("A")))
          .with_entity(
            EntityDeclaration::new(uri("Loose")).with_property(uri("undeclared")),
          ),
      )
      .build();

    assert!(registry.resolve_class(&uri("Orphan")).is_err());
    assert!(registry.resolve_class(&uri("A")).is_err());
    assert!(registry.resolve_class(&uri("B")).is_err());
    let loose = registry.resolve_class(&uri("Loose")).unwrap();
    assert!(loose.allowed_properties().is_empty());
    assert_eq!(loose.parent.as_deref(), Some(vocab::GRAPH_OBJECT));
  }

  #[test]
  fn malformed_module_is_skipped_whole() {
    let registry = Registry::builder()
      .module(
        SchemaModule::new("bad")
          .with_entity(EntityDeclaration::new(uri("Fine")))
          .with_entity(EntityDeclaration::new("not a uri")),
      )
      .build();
    assert!(registry.resolve_class(&uri("Fine")).is_err());
  }

  #[test]
  fn last_registration_wins() {
    let registry = Registry::builder()
      .module(
        SchemaModule::new("first")
          .with_trait(PropertyTrait::new(NS, "hasAge", ScalarKind::String)),
      )
      .module(
        SchemaModule::new("second")
          .with_trait(PropertyTrait::new(NS, "hasAge", ScalarKind::Integer)),
      )
      .build();
    assert_eq!(
      registry.resolve_trait(&uri("hasAge")).unwrap().kind,
      ScalarKind::Integer
    );
  }

  #[test]
  fn redeclared_ontology_belongs_to_the_last_module() {
    let registry = Registry::builder()
      .module(SchemaModule::new("first").with_ontology("http://example.org/app"))
      .module(SchemaModule::new("second").with_ontology("http://example.org/app"))
      .module(SchemaModule::new("third").with_ontology("http://example.org/other"))
      .build();

    let declared: Vec<_> = registry.declared_ontologies().collect();
    assert_eq!(declared, [
      ("http://example.org/app", "second"),
      ("http://example.org/other", "third"),
    ]);
  }

  #[test]
  fn bind_wraps_multi_valued_traits() {
    let registry = Registry::builder()
      .module(
        SchemaModule::new("m")
          .with_trait(PropertyTrait::new(NS, "hasTag", ScalarKind::String).multi_valued())
          .with_trait(PropertyTrait::new(NS, "hasAge", ScalarKind::Integer)),
      )
      .build();

    let tags = registry
      .bind(ScalarKind::String, &uri("hasTag"), vec!["a", "b"])
      .unwrap();
    assert!(tags.is_multi_valued());
    assert_eq!(tags.value().entries().count(), 2);

    let single = registry
      .bind(ScalarKind::String, &uri("hasTag"), "solo")
      .unwrap();
    assert_eq!(single.value().entries().count(), 1);

    let age = registry.bind(ScalarKind::Integer, &uri("hasAge"), "41").unwrap();
    assert_eq!(*age.value(), 41_i64);

    assert!(matches!(
      registry.bind(ScalarKind::Integer, &uri("hasAge"), "forty"),
      Err(Error::Value(tessera_core::Error::Coercion { .. }))
    ));
    assert!(matches!(
      registry.bind(ScalarKind::String, &uri("hasNothing"), "x"),
      Err(Error::TraitNotFound(_))
    ));
  }

  #[test]
  fn minted_uris_live_under_the_class() {
    let registry = Registry::builder().module(chain_module()).build();
    let a = registry.mint_uri(&uri("Leaf")).unwrap();
    let b = registry.mint_uri(&uri("Leaf")).unwrap();
    assert!(a.starts_with("http://example.org/onto/Leaf/"));
    assert_ne!(a, b);
    assert!(registry.mint_uri(&uri("Nope")).is_err());
  }

  #[test]
  fn shared_registry_swaps_wholesale() {
    let shared = SharedRegistry::new(Registry::default());
    let before = shared.current();
    assert!(before.resolve_class(&uri("Leaf")).is_err());

    let old = shared.replace(Registry::builder().module(chain_module()).build());
    assert!(Arc::ptr_eq(&old, &before));
    assert!(shared.current().resolve_class(&uri("Leaf")).is_ok());
    // the old snapshot is untouched
    assert!(before.resolve_class(&uri("Leaf")).is_err());
  }
}
