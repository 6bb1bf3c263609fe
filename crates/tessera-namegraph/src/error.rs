//! Error types for `tessera-namegraph`.

use thiserror::Error;

/// Why a name graph could not be built or decoded. No partial value is ever
/// returned alongside one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("missing scheme in {0:?}")]
  MissingScheme(String),

  #[error("missing authority in {0:?}")]
  MissingAuthority(String),

  #[error("{uri:?} is not under base {base:?}")]
  BaseMismatch { base: String, uri: String },

  #[error("too few path segments in {0:?}")]
  TooFewSegments(String),

  #[error("graph id may not be GLOBAL in {0:?}")]
  GraphIdIsGlobal(String),

  #[error("account id may not be GLOBAL in {0:?}")]
  AccountIsGlobal(String),

  #[error("empty namespace in {0:?}")]
  EmptyNamespace(String),

  #[error("invalid {component}: {value:?}")]
  InvalidComponent {
    component: &'static str,
    value:     String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
