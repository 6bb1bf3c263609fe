//! Native declarations: the manifest a module registers with the registry.
//!
//! A [`SchemaModule`] lists three kinds of capability marker:
//!
//! - [`PropertyTrait`]: a property, with its value kind and multiplicity.
//! - [`EntityDeclaration`]: a class, its single parent and the traits it
//!   declares itself.
//! - [`OntologyDeclaration`]: the ontology IRI the module ships.

use serde::{Deserialize, Serialize};
use tessera_core::{
  ScalarKind,
  uri::{is_absolute_uri, short_name, split_iri},
  vocab,
};
use tessera_ontology::{DomainRange, SchemaSet};

use crate::error::{Error, Result};

// ─── Markers ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyTrait {
  /// Namespace including its trailing `#` or `/`.
  pub namespace:       String,
  pub local_name:      String,
  pub kind:            ScalarKind,
  #[serde(default)]
  pub multiple_values: bool,
}

impl PropertyTrait {
  pub fn new(
    namespace: impl Into<String>,
    local_name: impl Into<String>,
    kind: ScalarKind,
  ) -> Self {
    Self {
      namespace: namespace.into(),
      local_name: local_name.into(),
      kind,
      multiple_values: false,
    }
  }

  /// Split `uri` at its last `#` or `/`.
  pub fn from_uri(uri: &str, kind: ScalarKind) -> Self {
    let (namespace, local_name) = split_iri(uri);
    Self::new(namespace, local_name, kind)
  }

  pub fn multi_valued(mut self) -> Self {
    self.multiple_values = true;
    self
  }

  pub fn uri(&self) -> String { format!("{}{}", self.namespace, self.local_name) }

  /// Attribute name on entities: `hasName` → `name`.
  pub fn short_name(&self) -> String { short_name(&self.local_name) }

  /// The reserved identity trait.
  pub(crate) fn identity() -> Self {
    Self::from_uri(vocab::IDENTITY_PROPERTY, ScalarKind::Uri)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDeclaration {
  pub uri:        String,
  /// Immediate parent class. `None` hangs the class under the root.
  #[serde(default)]
  pub parent:     Option<String>,
  /// Trait URIs declared by this class itself, in declaration order.
  #[serde(default)]
  pub properties: Vec<String>,
  #[serde(default)]
  pub label:      Option<String>,
}

impl EntityDeclaration {
  pub fn new(uri: impl Into<String>) -> Self {
    Self {
      uri:        uri.into(),
      parent:     None,
      properties: Vec::new(),
      label:      None,
    }
  }

  pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
    self.parent = Some(parent.into());
    self
  }

  pub fn with_property(mut self, trait_uri: impl Into<String>) -> Self {
    self.properties.push(trait_uri.into());
    self
  }

  pub fn with_label(mut self, label: impl Into<String>) -> Self {
    self.label = Some(label.into());
    self
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyDeclaration {
  pub iri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "marker", rename_all = "snake_case")]
pub enum Declaration {
  Entity(EntityDeclaration),
  Trait(PropertyTrait),
  Ontology(OntologyDeclaration),
}

// ─── Module ──────────────────────────────────────────────────────────────────

/// Everything one module contributes to the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaModule {
  pub id:           String,
  pub declarations: Vec<Declaration>,
}

impl SchemaModule {
  pub fn new(id: impl Into<String>) -> Self {
    Self {
      id:           id.into(),
      declarations: Vec::new(),
    }
  }

  pub fn with_trait(mut self, t: PropertyTrait) -> Self {
    self.declarations.push(Declaration::Trait(t));
    self
  }

  pub fn with_entity(mut self, e: EntityDeclaration) -> Self {
    self.declarations.push(Declaration::Entity(e));
    self
  }

  pub fn with_ontology(mut self, iri: impl Into<String>) -> Self {
    self
      .declarations
      .push(Declaration::Ontology(OntologyDeclaration { iri: iri.into() }));
    self
  }

  /// Reject a module any of whose declarations names a non-absolute IRI, an
  /// empty local name, or a class that is its own parent.
  pub fn validate(&self) -> Result<()> {
    let malformed = |reason: String| Error::MalformedModule {
      module: self.id.clone(),
      reason,
    };
    let absolute = |iri: &str, what: &str| {
      if is_absolute_uri(iri) {
        Ok(())
      } else {
        Err(malformed(format!("{what} `{iri}` is not an absolute IRI")))
      }
    };

    for declaration in &self.declarations {
      match declaration {
        Declaration::Trait(t) => {
          if t.local_name.is_empty() {
            return Err(malformed(format!(
              "trait in `{}` has an empty local name",
              t.namespace
            )));
          }
          absolute(&t.uri(), "trait")?;
        }
        Declaration::Entity(e) => {
          absolute(&e.uri, "entity")?;
          if let Some(parent) = &e.parent {
            absolute(parent, "parent")?;
            if *parent == e.uri {
              return Err(malformed(format!("`{}` is its own parent", e.uri)));
            }
          }
          for p in &e.properties {
            absolute(p, "property")?;
          }
        }
        Declaration::Ontology(o) => absolute(&o.iri, "ontology")?,
      }
    }
    Ok(())
  }

  /// Declarations synthesised from extracted schema facts.
  ///
  /// Every extracted property except the identity becomes a trait (data
  /// properties take their value type's kind, relations the URI kind). Every
  /// class becomes an entity whose parent is its lexically first named
  /// superclass that is itself a declared class, and whose own properties are
  /// those whose domain names it directly. Every loaded ontology becomes an
  /// ontology declaration.
  pub fn from_schema(
    id: impl Into<String>,
    set: &SchemaSet,
    schema: &DomainRange,
  ) -> Self {
    let mut module = Self::new(id);

    for iri in set.ontology_iris() {
      module = module.with_ontology(iri);
    }

    for (uri, descriptor) in &schema.properties {
      if uri == vocab::IDENTITY_PROPERTY {
        continue;
      }
      let mut t = PropertyTrait::from_uri(uri, descriptor.scalar_kind());
      t.multiple_values = descriptor.multiple_values;
      module = module.with_trait(t);
    }

    for (uri, facts) in &schema.classes {
      let parent = facts
        .parents
        .iter()
        .find(|p| *p != uri && schema.classes.contains_key(*p))
        .cloned();
      let properties = schema
        .properties_for_class(uri)
        .map(|ps| ps.iter().cloned().collect())
        .unwrap_or_default();
      module = module.with_entity(EntityDeclaration {
        uri: uri.clone(),
        parent,
        properties,
        label: facts.label.clone(),
      });
    }

    tracing::debug!(
      module = %module.id,
      declarations = module.declarations.len(),
      "derived declarations from schema"
    );
    module
  }
}
