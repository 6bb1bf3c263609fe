//! Error types for `tessera-registry`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("class not found: {0}")]
  ClassNotFound(String),

  #[error("trait not found: {0}")]
  TraitNotFound(String),

  /// The name is neither the identity attribute nor the short name of any
  /// property allowed on the class.
  #[error("{class} has no attribute `{attribute}`")]
  UnknownAttribute { class: String, attribute: String },

  #[error("module `{module}` is malformed: {reason}")]
  MalformedModule { module: String, reason: String },

  #[error("graph object has no identity")]
  MissingIdentity,

  #[error("serialized object has no `type`")]
  MissingType,

  #[error("invalid statement: {0}")]
  InvalidStatement(String),

  #[error(transparent)]
  Value(#[from] tessera_core::Error),

  #[error(transparent)]
  Ontology(#[from] tessera_ontology::Error),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
