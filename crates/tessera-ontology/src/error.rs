//! Error types for `tessera-ontology`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to read {path}: {source}")]
  Io {
    path:   PathBuf,
    source: std::io::Error,
  },

  #[error("unsupported schema format: {0}")]
  UnsupportedFormat(PathBuf),

  #[error("RDF syntax error in {path}: {message}")]
  Rdf { path: PathBuf, message: String },

  #[error("XML error in {path}: {message}")]
  Xml { path: PathBuf, message: String },

  #[error("{0} declares no ontology IRI")]
  MissingOntologyIri(PathBuf),

  #[error("{path} declares more than one ontology IRI: {iris:?}")]
  MultipleOntologyIris { path: PathBuf, iris: Vec<String> },

  /// The import graph of a load batch is not acyclic. Fatal to the build.
  #[error("import cycle between ontologies: {}", ontologies.join(", "))]
  ImportCycle { ontologies: Vec<String> },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
