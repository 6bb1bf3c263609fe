//! Error types for `tessera-core`.

use thiserror::Error;

use crate::kind::{Datatype, ScalarKind};

#[derive(Debug, Error)]
pub enum Error {
  /// The raw input cannot be coerced to the requested scalar kind.
  #[error("cannot coerce {value} to {kind}")]
  Coercion { kind: ScalarKind, value: String },

  #[error("invalid geo-location: {0}")]
  InvalidGeoLocation(String),

  #[error("JSON value cannot be used as a property value: {0}")]
  UnsupportedJson(String),

  #[error("malformed serialized value: {0}")]
  MalformedSerialization(String),

  #[error("datatype `{found}` does not match kind {kind}")]
  DatatypeMismatch { kind: ScalarKind, found: String },

  #[error("unknown datatype tag `{0}`")]
  UnknownDatatype(String),

  #[error("serialization error: {0}")]
  Json(#[from] serde_json::Error),
}

impl Error {
  pub(crate) fn coercion(kind: ScalarKind, value: impl std::fmt::Debug) -> Self {
    Self::Coercion {
      kind,
      value: format!("{value:?}"),
    }
  }

  pub(crate) fn datatype_mismatch(kind: ScalarKind, found: Datatype) -> Self {
    Self::DatatypeMismatch {
      kind,
      found: found.to_string(),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
