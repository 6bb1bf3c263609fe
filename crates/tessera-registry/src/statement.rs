//! The statement wire form: one subject-predicate-object statement per stored
//! value, plus an `rdf:type` statement naming the class.

use std::{collections::BTreeMap, sync::Arc};

use oxigraph::{
  io::{RdfFormat, RdfParser, RdfSerializer},
  model::{Literal, NamedNode, Subject, Term, Triple, TripleRef},
};
use serde::{Deserialize, Serialize};
use tessera_core::{Datatype, RawValue, vocab};

use crate::{
  error::{Error, Result},
  object::GraphObject,
  registry::Registry,
};

/// Object position of a statement: a lexical form and its datatype tag.
/// [`Datatype::Reference`] marks a resource reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectTerm {
  pub value:    String,
  pub datatype: Datatype,
}

impl ObjectTerm {
  pub fn reference(iri: impl Into<String>) -> Self {
    Self {
      value:    iri.into(),
      datatype: Datatype::Reference,
    }
  }

  pub fn is_reference(&self) -> bool { self.datatype == Datatype::Reference }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Statement {
  pub subject:   String,
  pub predicate: String,
  pub object:    ObjectTerm,
}

impl Statement {
  pub fn to_triple(&self) -> Result<Triple> {
    let iri = |s: &str| {
      NamedNode::new(s)
        .map_err(|e| Error::InvalidStatement(format!("invalid IRI `{s}`: {e}")))
    };
    let object: Term = match self.object.datatype.xsd_iri() {
      None => iri(&self.object.value)?.into(),
      Some(datatype) => Literal::new_typed_literal(
        self.object.value.as_str(),
        NamedNode::new_unchecked(datatype),
      )
      .into(),
    };
    Ok(Triple::new(iri(&self.subject)?, iri(&self.predicate)?, object))
  }

  pub fn from_triple(triple: TripleRef<'_>) -> Result<Self> {
    let Triple {
      subject,
      predicate,
      object,
    } = triple.into_owned();
    let subject = match subject {
      Subject::NamedNode(n) => n,
      other => {
        return Err(Error::InvalidStatement(format!(
          "subject must be an IRI: {other}"
        )));
      }
    };
    let object = match object {
      Term::NamedNode(n) => ObjectTerm::reference(n.into_string()),
      Term::Literal(l) => ObjectTerm {
        datatype: Datatype::from_xsd_iri(l.datatype().as_str()),
        value:    l.value().to_string(),
      },
      other => {
        return Err(Error::InvalidStatement(format!(
          "unsupported object: {other}"
        )));
      }
    };
    Ok(Self {
      subject: subject.into_string(),
      predicate: predicate.into_string(),
      object,
    })
  }
}

// ─── Export ──────────────────────────────────────────────────────────────────

impl GraphObject {
  /// `rdf:type` first, then one statement per stored value. Multi-valued
  /// properties yield one statement per entry.
  pub fn to_statements(&self) -> Result<Vec<Statement>> {
    let subject = self.uri().ok_or(Error::MissingIdentity)?.to_string();

    let mut statements = vec![Statement {
      subject:   subject.clone(),
      predicate: vocab::rdf::TYPE.to_string(),
      object:    ObjectTerm::reference(self.class_uri()),
    }];

    for bound in self.properties() {
      let datatype = bound.kind().datatype();
      for entry in bound.value().entries() {
        statements.push(Statement {
          subject:   subject.clone(),
          predicate: bound.property_uri().to_string(),
          object:    ObjectTerm {
            value: entry.lexical(),
            datatype,
          },
        });
      }
    }
    Ok(statements)
  }

  pub fn to_triples(&self) -> Result<Vec<Triple>> {
    self.to_statements()?.iter().map(Statement::to_triple).collect()
  }

  pub fn to_ntriples(&self) -> Result<String> {
    let mut serializer =
      RdfSerializer::from_format(RdfFormat::NTriples).for_writer(Vec::new());
    for triple in self.to_triples()? {
      serializer.serialize_triple(&triple)?;
    }
    let bytes = serializer.finish()?;
    String::from_utf8(bytes)
      .map_err(|e| Error::InvalidStatement(format!("non UTF-8 output: {e}")))
  }
}

// ─── Import ──────────────────────────────────────────────────────────────────

impl GraphObject {
  /// One object per subject that carries an `rdf:type` statement, in the
  /// order subjects first appear. The first type the registry knows is used;
  /// a subject none of whose types is registered fails the import. Statements
  /// about properties the class does not allow are skipped.
  pub fn from_statements(
    registry: Arc<Registry>,
    statements: &[Statement],
  ) -> Result<Vec<Self>> {
    let mut subjects: Vec<&str> = Vec::new();
    let mut by_subject: BTreeMap<&str, Vec<&Statement>> = BTreeMap::new();
    for s in statements {
      let group = by_subject.entry(s.subject.as_str()).or_insert_with(|| {
        subjects.push(&s.subject);
        Vec::new()
      });
      group.push(s);
    }

    let mut objects = Vec::new();
    for subject in subjects {
      let group = &by_subject[subject];
      let types: Vec<&str> = group
        .iter()
        .filter(|s| s.predicate == vocab::rdf::TYPE && s.object.is_reference())
        .map(|s| s.object.value.as_str())
        .collect();
      let Some(first) = types.first() else {
        tracing::debug!(subject = %subject, "untyped subject, skipping");
        continue;
      };
      let class = types
        .iter()
        .find(|t| registry.resolve_class(t).is_ok())
        .ok_or_else(|| Error::ClassNotFound(first.to_string()))?;

      let mut object = GraphObject::new(Arc::clone(&registry), class)?;
      object.set(vocab::IDENTITY_ATTRIBUTE, subject)?;
      object.replay(group)?;
      objects.push(object);
    }
    Ok(objects)
  }

  /// Import the single object described by `statements`.
  pub fn from_statements_single(
    registry: Arc<Registry>,
    statements: &[Statement],
  ) -> Result<Self> {
    Self::from_statements(registry, statements)?
      .into_iter()
      .next()
      .ok_or(Error::MissingType)
  }

  pub fn from_triples<'a>(
    registry: Arc<Registry>,
    triples: impl IntoIterator<Item = TripleRef<'a>>,
  ) -> Result<Vec<Self>> {
    let statements = triples
      .into_iter()
      .map(Statement::from_triple)
      .collect::<Result<Vec<_>>>()?;
    Self::from_statements(registry, &statements)
  }

  pub fn from_ntriples(registry: Arc<Registry>, text: &str) -> Result<Vec<Self>> {
    let triples = RdfParser::from_format(RdfFormat::NTriples)
      .for_reader(text.as_bytes())
      .map(|quad| {
        quad
          .map(|q| Triple::new(q.subject, q.predicate, q.object))
          .map_err(|e| Error::InvalidStatement(e.to_string()))
      })
      .collect::<Result<Vec<_>>>()?;
    Self::from_triples(registry, triples.iter().map(Triple::as_ref))
  }

  /// Apply every statement about an allowed property. Values for a
  /// multi-valued property are gathered in statement order; a single-valued
  /// property keeps the last statement.
  fn replay(&mut self, group: &[&Statement]) -> Result<()> {
    let mut values: Vec<(&str, Vec<RawValue>)> = Vec::new();
    for s in group {
      if s.predicate == vocab::rdf::TYPE {
        continue;
      }
      let raw = RawValue::Text(s.object.value.clone());
      match values.iter_mut().find(|(p, _)| *p == s.predicate) {
        Some((_, list)) => list.push(raw),
        None => values.push((s.predicate.as_str(), vec![raw])),
      }
    }

    for (predicate, mut raws) in values {
      let multi = self
        .class()
        .find_property(predicate)
        .is_some_and(|p| p.multiple_values);
      let raw = if multi {
        RawValue::List(raws)
      } else {
        raws.pop().unwrap_or_default()
      };
      if !self.set_property(predicate, raw)? {
        tracing::debug!(
          class = %self.class_uri(),
          property = %predicate,
          "skipping unknown property"
        );
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use tessera_core::ScalarKind;

  use super::*;
  use crate::declaration::{EntityDeclaration, PropertyTrait, SchemaModule};

  const NS: &str = "http://example.org/people#";

  fn registry() -> Arc<Registry> {
    Arc::new(
      Registry::builder()
        .module(
          SchemaModule::new("people")
            .with_trait(PropertyTrait::new(NS, "hasName", ScalarKind::String))
            .with_trait(PropertyTrait::new(NS, "hasAge", ScalarKind::Integer))
            .with_trait(PropertyTrait::new(NS, "hasFriend", ScalarKind::Uri))
            .with_trait(
              PropertyTrait::new(NS, "hasTag", ScalarKind::String).multi_valued(),
            )
            .with_entity(
              EntityDeclaration::new(format!("{NS}Person"))
                .with_property(format!("{NS}hasName"))
                .with_property(format!("{NS}hasAge"))
                .with_property(format!("{NS}hasFriend"))
                .with_property(format!("{NS}hasTag")),
            ),
        )
        .build(),
    )
  }

  fn john(registry: Arc<Registry>) -> GraphObject {
    let mut person = GraphObject::new(registry, &format!("{NS}Person")).unwrap();
    person.set("URI", "http://example.org/people/john").unwrap();
    person.set("name", "John").unwrap();
    person.set("age", 41).unwrap();
    person.set("friend", "http://example.org/people/ada").unwrap();
    person.set("tag", vec!["a", "b"]).unwrap();
    person
  }

  #[test]
  fn export_emits_type_and_one_statement_per_value() {
    let statements = john(registry()).to_statements().unwrap();
    assert_eq!(statements.len(), 6);
    assert_eq!(statements[0].predicate, vocab::rdf::TYPE);
    assert_eq!(statements[0].object, ObjectTerm::reference(format!("{NS}Person")));

    let age = statements
      .iter()
      .find(|s| s.predicate == format!("{NS}hasAge"))
      .unwrap();
    assert_eq!(age.object, ObjectTerm {
      value:    "41".into(),
      datatype: Datatype::Integer,
    });

    let friend = statements
      .iter()
      .find(|s| s.predicate == format!("{NS}hasFriend"))
      .unwrap();
    assert!(friend.object.is_reference());

    let tags = statements
      .iter()
      .filter(|s| s.predicate == format!("{NS}hasTag"))
      .count();
    assert_eq!(tags, 2);
  }

  #[test]
  fn export_requires_identity() {
    let person = GraphObject::new(registry(), &format!("{NS}Person")).unwrap();
    assert!(matches!(person.to_statements(), Err(Error::MissingIdentity)));
  }

  #[test]
  fn statements_round_trip() {
    let registry = registry();
    let person = john(registry.clone());
    let back = GraphObject::from_statements_single(
      registry,
      &person.to_statements().unwrap(),
    )
    .unwrap();
    assert_eq!(back, person);
  }

  #[test]
  fn ntriples_round_trip() {
    let registry = registry();
    let person = john(registry.clone());
    let text = person.to_ntriples().unwrap();
    assert!(text.contains(
      "<http://example.org/people/john> <http://example.org/people#hasName> \"John\""
    ));

    let objects = GraphObject::from_ntriples(registry, &text).unwrap();
    assert_eq!(objects, [person]);
  }

  #[test]
  fn import_groups_subjects_and_skips_strangers() {
    let statements = [
      Statement {
        subject:   "urn:p:1".into(),
        predicate: vocab::rdf::TYPE.into(),
        object:    ObjectTerm::reference(format!("{NS}Person")),
      },
      Statement {
        subject:   "urn:p:2".into(),
        predicate: format!("{NS}hasName"),
        object:    ObjectTerm {
          value:    "Untyped".into(),
          datatype: Datatype::String,
        },
      },
      Statement {
        subject:   "urn:p:1".into(),
        predicate: "http://example.org/elsewhere#hasColour".into(),
        object:    ObjectTerm {
          value:    "red".into(),
          datatype: Datatype::String,
        },
      },
      Statement {
        subject:   "urn:p:3".into(),
        predicate: vocab::rdf::TYPE.into(),
        object:    ObjectTerm::reference(format!("{NS}Person")),
      },
    ];

    let objects = GraphObject::from_statements(registry(), &statements).unwrap();
    assert_eq!(
      objects.iter().map(|o| o.uri().unwrap()).collect::<Vec<_>>(),
      ["urn:p:1", "urn:p:3"]
    );
    assert_eq!(objects[0].properties().count(), 0);
  }

  #[test]
  fn unknown_type_fails_import() {
    let statements = [Statement {
      subject:   "urn:p:1".into(),
      predicate: vocab::rdf::TYPE.into(),
      object:    ObjectTerm::reference("http://example.org/Unknown"),
    }];
    assert!(matches!(
      GraphObject::from_statements(registry(), &statements),
      Err(Error::ClassNotFound(_))
    ));
  }
}
