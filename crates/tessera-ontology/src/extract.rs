//! Domain/range extraction over a combined schema graph.
//!
//! Two structural queries are run: one over `owl:DatatypeProperty` subjects
//! and one over `owl:ObjectProperty` subjects. Each property's `rdfs:domain`
//! expressions are expanded into the set of named classes they cover, where an
//! anonymous `owl:unionOf` or `owl:intersectionOf` expression expands to the
//! union of the expansion of every member.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use oxigraph::model::{
  BlankNodeRef, Graph, NamedNodeRef, SubjectRef, TermRef, TripleRef,
};
use serde::Serialize;
use tessera_core::{
  ScalarKind,
  vocab::{self, xsd},
};

use crate::terms::{
  HAS_MULTIPLE_VALUES, OWL_CLASS, OWL_DATATYPE_PROPERTY, OWL_EQUIVALENT_CLASS,
  OWL_INTERSECTION_OF, OWL_OBJECT_PROPERTY, OWL_UNION_OF, RDF_FIRST, RDF_NIL,
  RDF_REST, RDF_TYPE, RDFS_CLASS, RDFS_DOMAIN, RDFS_LABEL, RDFS_RANGE,
  RDFS_SUB_CLASS_OF,
};

// ─── Descriptors ─────────────────────────────────────────────────────────────

/// Value-type tag of a data-valued property, read from its `rdfs:range`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
  Boolean,
  String,
  Integer,
  Long,
  Double,
  Float,
  DateTime,
  GeoLocation,
  Truth,
  /// No range, or a datatype without a dedicated kind.
  Other,
}

impl ValueType {
  pub fn from_range(iri: Option<&str>) -> Self {
    match iri {
      Some(xsd::BOOLEAN) => Self::Boolean,
      Some(xsd::STRING) => Self::String,
      Some(xsd::INTEGER | xsd::INT | xsd::SHORT | xsd::NON_NEGATIVE_INTEGER) => {
        Self::Integer
      }
      Some(xsd::LONG) => Self::Long,
      Some(xsd::DOUBLE) => Self::Double,
      Some(xsd::FLOAT) => Self::Float,
      Some(xsd::DATE_TIME | xsd::DATE_TIME_STAMP) => Self::DateTime,
      Some(vocab::GEO_LOCATION) => Self::GeoLocation,
      Some(vocab::TRUTH) => Self::Truth,
      _ => Self::Other,
    }
  }
}

impl From<ValueType> for ScalarKind {
  fn from(value: ValueType) -> Self {
    match value {
      ValueType::Boolean => Self::Boolean,
      ValueType::String | ValueType::Other => Self::String,
      ValueType::Integer => Self::Integer,
      ValueType::Long => Self::Long,
      ValueType::Double => Self::Double,
      ValueType::Float => Self::Float,
      ValueType::DateTime => Self::DateTime,
      ValueType::GeoLocation => Self::GeoLocation,
      ValueType::Truth => Self::Truth,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
  /// Holds literal values.
  Data,
  /// Points at other resources.
  Relation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyRange {
  Value(ValueType),
  /// Target classes of a relation. Empty means unconstrained.
  Targets(BTreeSet<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyDescriptor {
  pub uri:               String,
  pub kind:              PropertyKind,
  pub declaring_classes: BTreeSet<String>,
  pub range:             PropertyRange,
  pub multiple_values:   bool,
  pub label:             Option<String>,
}

impl PropertyDescriptor {
  /// The synthetic entry for the reserved identity property.
  fn identity() -> Self {
    Self {
      uri:               vocab::IDENTITY_PROPERTY.to_string(),
      kind:              PropertyKind::Relation,
      declaring_classes: BTreeSet::new(),
      range:             PropertyRange::Targets(BTreeSet::new()),
      multiple_values:   false,
      label:             None,
    }
  }

  pub fn value_type(&self) -> Option<ValueType> {
    match self.range {
      PropertyRange::Value(v) => Some(v),
      PropertyRange::Targets(_) => None,
    }
  }

  pub fn target_classes(&self) -> Option<&BTreeSet<String>> {
    match &self.range {
      PropertyRange::Targets(t) => Some(t),
      PropertyRange::Value(_) => None,
    }
  }

  /// The scalar kind a value of this property is stored as.
  pub fn scalar_kind(&self) -> ScalarKind {
    match self.range {
      PropertyRange::Value(v) => v.into(),
      PropertyRange::Targets(_) => ScalarKind::Uri,
    }
  }
}

/// What the schema says about one named class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassFacts {
  pub uri:         String,
  /// Named `rdfs:subClassOf` targets.
  pub parents:     BTreeSet<String>,
  /// Named `owl:equivalentClass` peers, in either direction.
  pub equivalents: BTreeSet<String>,
  pub label:       Option<String>,
}

// ─── Extraction ──────────────────────────────────────────────────────────────

/// Per-property and per-class facts extracted from a schema graph.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DomainRange {
  /// class URI → URIs of the properties whose domain covers it.
  pub domain_properties: BTreeMap<String, BTreeSet<String>>,
  pub properties:        BTreeMap<String, PropertyDescriptor>,
  pub classes:           BTreeMap<String, ClassFacts>,
}

impl DomainRange {
  pub fn extract(graph: &Graph) -> Self {
    let mut out = Self {
      classes: class_facts(graph),
      ..Self::default()
    };

    for subject in graph.subjects_for_predicate_object(RDF_TYPE, OWL_DATATYPE_PROPERTY)
    {
      let SubjectRef::NamedNode(property) = subject else {
        continue;
      };
      let range = graph
        .object_for_subject_predicate(property, RDFS_RANGE)
        .and_then(|t| match t {
          TermRef::NamedNode(n) => Some(n.as_str()),
          _ => None,
        });
      out.insert(graph, property, PropertyKind::Data, PropertyRange::Value(
        ValueType::from_range(range),
      ));
    }

    for subject in graph.subjects_for_predicate_object(RDF_TYPE, OWL_OBJECT_PROPERTY)
    {
      let SubjectRef::NamedNode(property) = subject else {
        continue;
      };
      if out.properties.contains_key(property.as_str()) {
        tracing::warn!(
          property = %property.as_str(),
          "property is typed both data and relation, keeping data reading"
        );
        continue;
      }
      let targets = graph
        .objects_for_subject_predicate(property, RDFS_RANGE)
        .flat_map(|expr| expand(graph, expr))
        .collect();
      out.insert(
        graph,
        property,
        PropertyKind::Relation,
        PropertyRange::Targets(targets),
      );
    }

    out
      .properties
      .insert(vocab::IDENTITY_PROPERTY.to_string(), PropertyDescriptor::identity());

    tracing::debug!(
      classes = out.classes.len(),
      properties = out.properties.len(),
      "extracted domain/range facts"
    );
    out
  }

  fn insert(
    &mut self,
    graph: &Graph,
    property: NamedNodeRef<'_>,
    kind: PropertyKind,
    range: PropertyRange,
  ) {
    let declaring_classes: BTreeSet<String> = graph
      .objects_for_subject_predicate(property, RDFS_DOMAIN)
      .flat_map(|expr| expand(graph, expr))
      .collect();

    for class in &declaring_classes {
      self
        .domain_properties
        .entry(class.clone())
        .or_default()
        .insert(property.as_str().to_string());
    }

    let multiple_values = graph
      .object_for_subject_predicate(property, HAS_MULTIPLE_VALUES)
      .is_some_and(|t| match t {
        TermRef::Literal(l) => matches!(l.value(), "true" | "1"),
        _ => false,
      });

    self.properties.insert(property.as_str().to_string(), PropertyDescriptor {
      uri: property.as_str().to_string(),
      kind,
      declaring_classes,
      range,
      multiple_values,
      label: label(graph, property.into()),
    });
  }

  pub fn property(&self, uri: &str) -> Option<&PropertyDescriptor> {
    self.properties.get(uri)
  }

  pub fn class(&self, uri: &str) -> Option<&ClassFacts> { self.classes.get(uri) }

  /// Properties whose domain names `class` directly.
  pub fn properties_for_class(&self, class: &str) -> Option<&BTreeSet<String>> {
    self.domain_properties.get(class)
  }

  /// `class` itself, every class reachable through `rdfs:subClassOf`, and the
  /// `owl:equivalentClass` peers of each of those.
  pub fn superclass_closure(&self, class: &str) -> BTreeSet<String> {
    let mut closure = BTreeSet::new();
    let mut stack = vec![class.to_string()];
    while let Some(current) = stack.pop() {
      if !closure.insert(current.clone()) {
        continue;
      }
      if let Some(facts) = self.classes.get(&current) {
        stack.extend(facts.parents.iter().cloned());
        stack.extend(facts.equivalents.iter().cloned());
      }
    }
    closure
  }
}

/// Every named class declared with `owl:Class` or `rdfs:Class`.
fn class_facts(graph: &Graph) -> BTreeMap<String, ClassFacts> {
  let mut classes: BTreeMap<String, ClassFacts> = BTreeMap::new();

  let declared = graph
    .subjects_for_predicate_object(RDF_TYPE, OWL_CLASS)
    .chain(graph.subjects_for_predicate_object(RDF_TYPE, RDFS_CLASS));
  for subject in declared {
    let SubjectRef::NamedNode(class) = subject else {
      continue;
    };
    let facts = classes.entry(class.as_str().to_string()).or_default();
    facts.uri = class.as_str().to_string();
    facts.parents = named_objects(graph, class, RDFS_SUB_CLASS_OF).collect();
    facts.equivalents =
      named_objects(graph, class, OWL_EQUIVALENT_CLASS).collect();
    facts.label = label(graph, class.into());
  }

  // equivalence is symmetric
  let pairs: Vec<(String, String)> = classes
    .values()
    .flat_map(|f| f.equivalents.iter().map(|e| (e.clone(), f.uri.clone())))
    .collect();
  for (class, peer) in pairs {
    if let Some(facts) = classes.get_mut(&class) {
      facts.equivalents.insert(peer);
    }
  }

  classes
}

fn named_objects<'a>(
  graph: &'a Graph,
  subject: NamedNodeRef<'a>,
  predicate: NamedNodeRef<'a>,
) -> impl Iterator<Item = String> + 'a {
  graph
    .objects_for_subject_predicate(subject, predicate)
    .filter_map(|t| match t {
      TermRef::NamedNode(n) => Some(n.as_str().to_string()),
      _ => None,
    })
}

fn label(graph: &Graph, subject: SubjectRef<'_>) -> Option<String> {
  graph
    .objects_for_subject_predicate(subject, RDFS_LABEL)
    .find_map(|t| match t {
      TermRef::Literal(l) => Some(l.value().to_string()),
      _ => None,
    })
}

// ─── Class expressions ───────────────────────────────────────────────────────

/// The declared named classes a class expression covers. A named term that is
/// not declared `owl:Class` or `rdfs:Class` covers nothing.
pub fn expand(graph: &Graph, expr: TermRef<'_>) -> BTreeSet<String> {
  let mut seen = HashSet::new();
  let mut out = BTreeSet::new();
  expand_into(graph, expr, &mut seen, &mut out);
  out
}

fn expand_into<'a>(
  graph: &'a Graph,
  expr: TermRef<'a>,
  seen: &mut HashSet<BlankNodeRef<'a>>,
  out: &mut BTreeSet<String>,
) {
  match expr {
    TermRef::NamedNode(n) => {
      if is_declared_class(graph, n) {
        out.insert(n.as_str().to_string());
      } else {
        tracing::debug!(
          term = %n.as_str(),
          "class expression names an undeclared class"
        );
      }
    }
    TermRef::BlankNode(b) => {
      if !seen.insert(b) {
        return;
      }
      for operator in [OWL_UNION_OF, OWL_INTERSECTION_OF] {
        for list in graph.objects_for_subject_predicate(b, operator) {
          for member in rdf_list(graph, list) {
            expand_into(graph, member, seen, out);
          }
        }
      }
    }
    _ => {}
  }
}

/// Whether `node` is typed `owl:Class` or `rdfs:Class`.
fn is_declared_class(graph: &Graph, node: NamedNodeRef<'_>) -> bool {
  [OWL_CLASS, RDFS_CLASS]
    .into_iter()
    .any(|class| graph.contains(TripleRef::new(node, RDF_TYPE, class)))
}

/// Members of an RDF collection, stopping at `rdf:nil`, a dangling tail or a
/// node already visited.
fn rdf_list<'a>(graph: &'a Graph, head: TermRef<'a>) -> Vec<TermRef<'a>> {
  let mut items = Vec::new();
  let mut visited = HashSet::new();
  let mut current = head;

  loop {
    let node: SubjectRef<'a> = match current {
      TermRef::NamedNode(n) if n == RDF_NIL => break,
      TermRef::NamedNode(n) => n.into(),
      TermRef::BlankNode(b) => b.into(),
      _ => break,
    };
    if !visited.insert(current) {
      tracing::warn!("cyclic RDF list in class expression");
      break;
    }
    if let Some(first) = graph.object_for_subject_predicate(node, RDF_FIRST) {
      items.push(first);
    }
    match graph.object_for_subject_predicate(node, RDF_REST) {
      Some(next) => current = next,
      None => break,
    }
  }

  items
}

#[cfg(test)]
mod tests {
  use std::path::Path;

  use super::*;
  use crate::{SchemaDocument, SchemaFormat, test_helpers::rdf_xml};

  fn graph(body: &str) -> Graph {
    let doc = SchemaDocument::parse(
      "test",
      Path::new("test.owl"),
      SchemaFormat::RdfXml,
      rdf_xml("http://example.org/test", &[], body).as_bytes(),
    )
    .unwrap();
    let mut graph = Graph::new();
    for t in &doc.triples {
      graph.insert(t);
    }
    graph
  }

  const UNION_DOMAIN: &str = r#"
  <owl:Class rdf:about="http://example.org/X"/>
  <owl:Class rdf:about="http://example.org/Y"/>
  <owl:Class rdf:about="http://example.org/Z"/>
  <owl:DatatypeProperty rdf:about="http://example.org/hasName">
    <rdfs:domain>
      <owl:Class>
        <owl:unionOf rdf:parseType="Collection">
          <owl:Class rdf:about="http://example.org/X"/>
          <owl:Class>
            <owl:intersectionOf rdf:parseType="Collection">
              <owl:Class rdf:about="http://example.org/Y"/>
              <owl:Class rdf:about="http://example.org/Z"/>
            </owl:intersectionOf>
          </owl:Class>
        </owl:unionOf>
      </owl:Class>
    </rdfs:domain>
    <rdfs:range rdf:resource="http://www.w3.org/2001/XMLSchema#string"/>
  </owl:DatatypeProperty>
"#;

  #[test]
  fn union_domain_covers_every_member() {
    let dr = DomainRange::extract(&graph(UNION_DOMAIN));
    for class in ["X", "Y", "Z"] {
      let class = format!("http://example.org/{class}");
      assert!(
        dr.properties_for_class(&class)
          .unwrap()
          .contains("http://example.org/hasName"),
        "{class} should carry hasName"
      );
    }
    let name = dr.property("http://example.org/hasName").unwrap();
    assert_eq!(name.kind, PropertyKind::Data);
    assert_eq!(name.value_type(), Some(ValueType::String));
    assert_eq!(name.declaring_classes.len(), 3);
  }

  #[test]
  fn data_and_relation_properties() {
    let dr = DomainRange::extract(&graph(
      r#"
  <owl:Class rdf:about="http://example.org/Person">
    <rdfs:label>Person</rdfs:label>
  </owl:Class>
  <owl:Class rdf:about="http://example.org/Place"/>
  <owl:DatatypeProperty rdf:about="http://example.org/hasBirthday">
    <rdfs:domain rdf:resource="http://example.org/Person"/>
    <rdfs:range rdf:resource="http://www.w3.org/2001/XMLSchema#dateTime"/>
  </owl:DatatypeProperty>
  <owl:DatatypeProperty rdf:about="http://example.org/hasNickname">
    <rdfs:domain rdf:resource="http://example.org/Person"/>
    <hasMultipleValues xmlns="http://tessera.dev/ontology/core#" rdf:datatype="http://www.w3.org/2001/XMLSchema#boolean">true</hasMultipleValues>
  </owl:DatatypeProperty>
  <owl:ObjectProperty rdf:about="http://example.org/livesIn">
    <rdfs:domain rdf:resource="http://example.org/Person"/>
    <rdfs:range rdf:resource="http://example.org/Place"/>
  </owl:ObjectProperty>
"#,
    ));

    let birthday = dr.property("http://example.org/hasBirthday").unwrap();
    assert_eq!(birthday.value_type(), Some(ValueType::DateTime));
    assert_eq!(birthday.scalar_kind(), ScalarKind::DateTime);
    assert!(!birthday.multiple_values);

    let nickname = dr.property("http://example.org/hasNickname").unwrap();
    assert_eq!(nickname.value_type(), Some(ValueType::Other));
    assert!(nickname.multiple_values);

    let lives_in = dr.property("http://example.org/livesIn").unwrap();
    assert_eq!(lives_in.kind, PropertyKind::Relation);
    assert_eq!(
      lives_in.target_classes().unwrap().iter().collect::<Vec<_>>(),
      ["http://example.org/Place"]
    );
    assert_eq!(lives_in.scalar_kind(), ScalarKind::Uri);

    assert_eq!(
      dr.class("http://example.org/Person").unwrap().label.as_deref(),
      Some("Person")
    );
  }

  #[test]
  fn undeclared_domain_terms_are_not_classes() {
    let dr = DomainRange::extract(&graph(
      r#"
  <owl:Class rdf:about="http://example.org/Person"/>
  <owl:DatatypeProperty rdf:about="http://example.org/hasName">
    <rdfs:domain rdf:resource="http://example.org/NotAClass"/>
  </owl:DatatypeProperty>
  <owl:ObjectProperty rdf:about="http://example.org/knows">
    <rdfs:domain>
      <owl:Class>
        <owl:unionOf rdf:parseType="Collection">
          <rdf:Description rdf:about="http://example.org/Ghost"/>
          <owl:Class rdf:about="http://example.org/Person"/>
        </owl:unionOf>
      </owl:Class>
    </rdfs:domain>
    <rdfs:range rdf:resource="http://example.org/Ghost"/>
  </owl:ObjectProperty>
"#,
    ));

    assert!(dr.properties_for_class("http://example.org/NotAClass").is_none());
    assert!(dr.properties_for_class("http://example.org/Ghost").is_none());
    assert!(
      dr.property("http://example.org/hasName")
        .unwrap()
        .declaring_classes
        .is_empty()
    );

    let knows = dr.property("http://example.org/knows").unwrap();
    assert_eq!(
      knows.declaring_classes.iter().collect::<Vec<_>>(),
      ["http://example.org/Person"]
    );
    assert!(knows.target_classes().unwrap().is_empty());
  }

  #[test]
  fn identity_property_is_always_present() {
    let dr = DomainRange::extract(&Graph::new());
    let identity = dr.property(vocab::IDENTITY_PROPERTY).unwrap();
    assert_eq!(identity.kind, PropertyKind::Relation);
    assert!(identity.target_classes().unwrap().is_empty());
  }

  #[test]
  fn closure_follows_parents_and_equivalents() {
    let dr = DomainRange::extract(&graph(
      r#"
  <owl:Class rdf:about="http://example.org/Root"/>
  <owl:Class rdf:about="http://example.org/Alias">
    <owl:equivalentClass rdf:resource="http://example.org/Root"/>
  </owl:Class>
  <owl:Class rdf:about="http://example.org/Leaf">
    <rdfs:subClassOf rdf:resource="http://example.org/Root"/>
  </owl:Class>
"#,
    ));

    let closure = dr.superclass_closure("http://example.org/Leaf");
    assert_eq!(closure.into_iter().collect::<Vec<_>>(), [
      "http://example.org/Alias",
      "http://example.org/Leaf",
      "http://example.org/Root",
    ]);
    assert!(
      dr.class("http://example.org/Root")
        .unwrap()
        .equivalents
        .contains("http://example.org/Alias")
    );
  }
}
