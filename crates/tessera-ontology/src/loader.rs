//! Batch loading of schema documents into one combined graph.

use std::{
  collections::{BTreeMap, BTreeSet},
  path::PathBuf,
};

use oxigraph::model::Graph;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{document::SchemaDocument, error::Result, resolver::ImportGraph};

/// One `(module id, schema path)` pair from the discovery feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSource {
  #[serde(alias = "module")]
  pub module_id: String,
  pub path:      PathBuf,
}

impl SchemaSource {
  pub fn new(module_id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
    Self {
      module_id: module_id.into(),
      path:      path.into(),
    }
  }
}

/// Bookkeeping kept for each ontology merged into a [`SchemaSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedOntology {
  pub iri:          String,
  pub module_id:    String,
  pub path:         PathBuf,
  pub imports:      BTreeSet<String>,
  pub version_info: Option<String>,
  pub content_hash: String,
}

impl From<&SchemaDocument> for LoadedOntology {
  fn from(doc: &SchemaDocument) -> Self {
    Self {
      iri:          doc.ontology_iri.clone(),
      module_id:    doc.module_id.clone(),
      path:         doc.path.clone(),
      imports:      doc.imports.clone(),
      version_info: doc.version_info.clone(),
      content_hash: doc.content_hash.clone(),
    }
  }
}

/// The combined schema: every loaded triple, the ontologies in load order and
/// the accumulated prefix map.
#[derive(Debug, Clone, Default)]
pub struct SchemaSet {
  pub graph:      Graph,
  pub ontologies: Vec<LoadedOntology>,
  pub namespaces: BTreeMap<String, String>,
}

impl SchemaSet {
  /// Ontology IRIs in the order they were merged.
  pub fn ontology_iris(&self) -> impl Iterator<Item = &str> {
    self.ontologies.iter().map(|o| o.iri.as_str())
  }

  pub fn ontology(&self, iri: &str) -> Option<&LoadedOntology> {
    self.ontologies.iter().find(|o| o.iri == iri)
  }
}

/// Accumulates a [`SchemaSet`] over one or more batches.
///
/// Ontologies merged by an earlier batch satisfy the imports of later ones.
#[derive(Debug, Default)]
pub struct OntologyLoader {
  set: SchemaSet,
}

impl OntologyLoader {
  pub fn new() -> Self { Self::default() }

  /// Parse `sources` in parallel, order them by their imports and merge them.
  ///
  /// Documents that fail to parse, or that declare an ontology IRI already
  /// loaded, are logged and skipped. An import cycle fails the batch and
  /// leaves the loader unchanged. Returns the newly merged ontology IRIs in
  /// load order.
  pub fn load_batch(&mut self, sources: &[SchemaSource]) -> Result<Vec<String>> {
    let parsed: Vec<_> = sources
      .par_iter()
      .map(|source| (source, SchemaDocument::load(source)))
      .collect();

    let loaded: BTreeSet<String> =
      self.set.ontology_iris().map(str::to_string).collect();
    let mut seen = loaded.clone();
    let mut documents = Vec::with_capacity(parsed.len());

    for (source, result) in parsed {
      match result {
        Ok(doc) if seen.contains(&doc.ontology_iri) => {
          tracing::warn!(
            module = %source.module_id,
            path = %source.path.display(),
            ontology = %doc.ontology_iri,
            "ontology already loaded, skipping document"
          );
        }
        Ok(doc) => {
          seen.insert(doc.ontology_iri.clone());
          documents.push(doc);
        }
        Err(e) => {
          tracing::warn!(
            module = %source.module_id,
            path = %source.path.display(),
            error = %e,
            "skipping schema document"
          );
        }
      }
    }

    let order = ImportGraph::new(&documents, &loaded).topological_order()?;

    let mut slots: Vec<Option<SchemaDocument>> =
      documents.into_iter().map(Some).collect();
    let mut merged = Vec::with_capacity(order.len());
    for i in order {
      if let Some(doc) = slots[i].take() {
        merged.push(doc.ontology_iri.clone());
        self.merge(doc);
      }
    }

    tracing::info!(
      ontologies = merged.len(),
      triples = self.set.graph.len(),
      "loaded schema batch"
    );
    Ok(merged)
  }

  fn merge(&mut self, doc: SchemaDocument) {
    tracing::debug!(
      ontology = %doc.ontology_iri,
      triples = doc.triples.len(),
      "merging ontology"
    );
    for triple in &doc.triples {
      self.set.graph.insert(triple);
    }
    for (prefix, iri) in &doc.prefixes {
      match self.set.namespaces.get(prefix) {
        Some(existing) if existing != iri => {
          tracing::warn!(
            prefix = %prefix,
            kept = %existing,
            ignored = %iri,
            ontology = %doc.ontology_iri,
            "conflicting namespace prefix"
          );
        }
        Some(_) => {}
        None => {
          self.set.namespaces.insert(prefix.clone(), iri.clone());
        }
      }
    }
    self.set.ontologies.push(LoadedOntology::from(&doc));
  }

  pub fn schema_set(&self) -> &SchemaSet { &self.set }

  pub fn finish(self) -> SchemaSet { self.set }
}

/// Load a single batch into a fresh [`SchemaSet`].
pub fn load(sources: &[SchemaSource]) -> Result<SchemaSet> {
  let mut loader = OntologyLoader::new();
  loader.load_batch(sources)?;
  Ok(loader.finish())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    Error,
    test_helpers::{rdf_xml, write_source},
  };

  #[test]
  fn loads_in_import_order() {
    let dir = tempfile::tempdir().unwrap();
    let sources = [
      write_source(
        dir.path(),
        "app.owl",
        &rdf_xml("http://example.org/app", &["http://example.org/base"], ""),
      ),
      write_source(
        dir.path(),
        "base.owl",
        &rdf_xml("http://example.org/base", &[], ""),
      ),
    ];

    let set = load(&sources).unwrap();
    assert_eq!(set.ontology_iris().collect::<Vec<_>>(), [
      "http://example.org/base",
      "http://example.org/app"
    ]);
    assert_eq!(set.ontology("http://example.org/app").unwrap().module_id, "app");
    assert_eq!(set.namespaces["owl"], "http://www.w3.org/2002/07/owl#");
  }

  #[test]
  fn mutual_import_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let sources = [
      write_source(
        dir.path(),
        "a.owl",
        &rdf_xml("http://example.org/a", &["http://example.org/b"], ""),
      ),
      write_source(
        dir.path(),
        "b.owl",
        &rdf_xml("http://example.org/b", &["http://example.org/a"], ""),
      ),
    ];

    let mut loader = OntologyLoader::new();
    let err = loader.load_batch(&sources).unwrap_err();
    assert!(matches!(err, Error::ImportCycle { ref ontologies } if ontologies.len() == 2));
    assert!(loader.schema_set().ontologies.is_empty());
  }

  #[test]
  fn broken_and_duplicate_documents_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let sources = [
      write_source(dir.path(), "broken.owl", "<rdf:RDF><nope"),
      write_source(
        dir.path(),
        "good.owl",
        &rdf_xml("http://example.org/good", &[], ""),
      ),
      write_source(
        dir.path(),
        "again.owl",
        &rdf_xml("http://example.org/good", &[], ""),
      ),
      write_source(dir.path(), "notes.txt", "not a schema"),
      SchemaSource::new("missing", dir.path().join("missing.owl")),
    ];

    let set = load(&sources).unwrap();
    assert_eq!(set.ontologies.len(), 1);
    assert_eq!(set.ontologies[0].module_id, "good");
  }

  #[test]
  fn earlier_batches_satisfy_imports() {
    let dir = tempfile::tempdir().unwrap();
    let base = write_source(
      dir.path(),
      "base.owl",
      &rdf_xml("http://example.org/base", &[], ""),
    );
    let app = write_source(
      dir.path(),
      "app.owl",
      &rdf_xml("http://example.org/app", &["http://example.org/base"], ""),
    );

    let mut loader = OntologyLoader::new();
    assert_eq!(loader.load_batch(&[base.clone()]).unwrap(), [
      "http://example.org/base"
    ]);
    assert_eq!(loader.load_batch(&[app, base]).unwrap(), [
      "http://example.org/app"
    ]);
    assert_eq!(loader.finish().ontologies.len(), 2);
  }

  #[test]
  fn first_prefix_binding_wins() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_source(
      dir.path(),
      "first.ttl",
      "@prefix ex: <http://example.org/one#> .\n\
       <http://example.org/one> a <http://www.w3.org/2002/07/owl#Ontology> .\n",
    );
    let second = write_source(
      dir.path(),
      "second.ttl",
      "@prefix ex: <http://example.org/two#> .\n\
       <http://example.org/two> a <http://www.w3.org/2002/07/owl#Ontology> ;\n\
       <http://www.w3.org/2002/07/owl#imports> <http://example.org/one> .\n",
    );

    let set = load(&[second, first]).unwrap();
    assert_eq!(set.namespaces["ex"], "http://example.org/one#");
  }

  #[test]
  fn source_accepts_module_alias() {
    let source: SchemaSource =
      serde_json::from_str(r#"{"module": "app", "path": "schemas/app.owl"}"#)
        .unwrap();
    assert_eq!(source, SchemaSource::new("app", "schemas/app.owl"));
  }
}
