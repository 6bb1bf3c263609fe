//! Name graphs: hierarchical, string-encoded identifiers for stored graphs.
//!
//! | global | account | encoded form                                      |
//! |--------|---------|---------------------------------------------------|
//! | yes    | none    | `{base}/{namespace}/GLOBAL/{graph_id}`            |
//! | yes    | some    | `{base}/{namespace}/GLOBAL/{account_id}/{graph_id}` |
//! | no     | none    | `{base}/{namespace}/{graph_id}`                   |
//! | no     | some    | `{base}/{namespace}/{account_id}/{graph_id}`      |
//!
//! ```
//! use tessera_namegraph::NameGraph;
//!
//! let g = NameGraph::global("http://x", "ns", "g2").unwrap().with_account("a1").unwrap();
//! assert_eq!(g.encode(), "http://x/ns/GLOBAL/a1/g2");
//! assert_eq!(NameGraph::decode("http://x/ns/GLOBAL/a1/g2").unwrap(), g);
//! ```

pub mod error;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub use self::error::{Error, Result};

/// Path segment marking a global graph.
pub const GLOBAL: &str = "GLOBAL";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NameGraph {
  base_uri:   String,
  namespace:  String,
  graph_id:   String,
  account_id: Option<String>,
  global:     bool,
}

impl NameGraph {
  /// A private graph with no account.
  pub fn new(
    base_uri: impl Into<String>,
    namespace: impl Into<String>,
    graph_id: impl Into<String>,
  ) -> Result<Self> {
    Self::from_parts(base_uri, namespace, graph_id, None, false)
  }

  /// A global graph with no account.
  pub fn global(
    base_uri: impl Into<String>,
    namespace: impl Into<String>,
    graph_id: impl Into<String>,
  ) -> Result<Self> {
    Self::from_parts(base_uri, namespace, graph_id, None, true)
  }

  pub fn with_account(self, account_id: impl Into<String>) -> Result<Self> {
    Self::from_parts(
      self.base_uri,
      self.namespace,
      self.graph_id,
      Some(account_id.into()),
      self.global,
    )
  }

  /// Validate and assemble all components. A trailing `/` on the base is
  /// dropped.
  pub fn from_parts(
    base_uri: impl Into<String>,
    namespace: impl Into<String>,
    graph_id: impl Into<String>,
    account_id: Option<String>,
    global: bool,
  ) -> Result<Self> {
    let base_uri = base_uri.into().trim_end_matches('/').to_string();
    split_base(&base_uri)?;

    let namespace = namespace.into();
    if namespace.is_empty() {
      return Err(Error::EmptyNamespace(namespace));
    }
    for segment in namespace.split('/') {
      check_segment("namespace", segment)?;
    }

    let graph_id = graph_id.into();
    check_segment("graph id", &graph_id)?;

    if let Some(account) = &account_id {
      check_segment("account id", account)?;
    }

    Ok(Self {
      base_uri,
      namespace,
      graph_id,
      account_id,
      global,
    })
  }

  pub fn base_uri(&self) -> &str { &self.base_uri }

  pub fn namespace(&self) -> &str { &self.namespace }

  pub fn graph_id(&self) -> &str { &self.graph_id }

  pub fn account_id(&self) -> Option<&str> { self.account_id.as_deref() }

  pub fn is_global(&self) -> bool { self.global }

  pub fn encode(&self) -> String {
    let mut out = format!("{}/{}", self.base_uri, self.namespace);
    if self.global {
      out.push('/');
      out.push_str(GLOBAL);
    }
    if let Some(account) = &self.account_id {
      out.push('/');
      out.push_str(account);
    }
    out.push('/');
    out.push_str(&self.graph_id);
    out
  }

  /// Decode with the base taken to be the URI's scheme and authority.
  ///
  /// A private URI with exactly two path segments has no account; with more,
  /// the second-to-last segment is the account.
  pub fn decode(uri: &str) -> Result<Self> {
    let (base, path) = split_base(uri)?;
    Self::decode_path(uri, base, path)
  }

  /// Decode relative to a known base, which may itself carry a path.
  pub fn decode_with_base(base_uri: &str, uri: &str) -> Result<Self> {
    let base = base_uri.trim_end_matches('/');
    split_base(base)?;
    let path = uri
      .strip_prefix(base)
      .filter(|rest| rest.is_empty() || rest.starts_with('/'))
      .ok_or_else(|| Error::BaseMismatch {
        base: base.to_string(),
        uri:  uri.to_string(),
      })?;
    Self::decode_path(uri, base, path)
  }

  fn decode_path(uri: &str, base: &str, path: &str) -> Result<Self> {
    if path.contains(['?', '#']) {
      return Err(Error::InvalidComponent {
        component: "path",
        value:     path.to_string(),
      });
    }
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let Some((&graph_id, rest)) = segments.split_last() else {
      return Err(Error::TooFewSegments(uri.to_string()));
    };
    if graph_id == GLOBAL {
      return Err(Error::GraphIdIsGlobal(uri.to_string()));
    }

    let n = rest.len();
    let (namespace, account, global) = if n >= 2 && rest[n - 2] == GLOBAL {
      if rest[n - 1] == GLOBAL {
        return Err(Error::AccountIsGlobal(uri.to_string()));
      }
      (&rest[..n - 2], Some(rest[n - 1]), true)
    } else if n >= 1 && rest[n - 1] == GLOBAL {
      (&rest[..n - 1], None, true)
    } else if n >= 2 {
      (&rest[..n - 1], Some(rest[n - 1]), false)
    } else {
      // A lone segment ahead of the graph id is the namespace, never an
      // account.
      (rest, None, false)
    };

    if namespace.is_empty() {
      return Err(Error::EmptyNamespace(uri.to_string()));
    }

    Self::from_parts(
      base,
      namespace.join("/"),
      graph_id,
      account.map(str::to_string),
      global,
    )
  }
}

/// Split `uri` into `scheme://authority` and the remaining path.
fn split_base(uri: &str) -> Result<(&str, &str)> {
  let Some((scheme, rest)) = uri.split_once("://") else {
    return Err(Error::MissingScheme(uri.to_string()));
  };
  let valid_scheme = scheme
    .chars()
    .next()
    .is_some_and(|c| c.is_ascii_alphabetic())
    && scheme
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
  if !valid_scheme {
    return Err(Error::MissingScheme(uri.to_string()));
  }

  let authority_len = rest.find('/').unwrap_or(rest.len());
  if authority_len == 0 {
    return Err(Error::MissingAuthority(uri.to_string()));
  }
  let split = scheme.len() + 3 + authority_len;
  Ok((&uri[..split], &uri[split..]))
}

fn check_segment(component: &'static str, value: &str) -> Result<()> {
  let invalid = value.is_empty()
    || value == GLOBAL
    || value
      .chars()
      .any(|c| c == '/' || c == '?' || c == '#' || c.is_whitespace());
  if invalid {
    return Err(Error::InvalidComponent {
      component,
      value: value.to_string(),
    });
  }
  Ok(())
}

impl fmt::Display for NameGraph {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.encode())
  }
}

impl FromStr for NameGraph {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::decode(s) }
}

impl TryFrom<String> for NameGraph {
  type Error = Error;

  fn try_from(value: String) -> Result<Self> { Self::decode(&value) }
}

impl From<NameGraph> for String {
  fn from(value: NameGraph) -> Self { value.encode() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn private_graph_under_a_base_with_a_path() {
    let g = NameGraph::new("http://vital.ai/graph", "svc", "g1").unwrap();
    assert_eq!(g.encode(), "http://vital.ai/graph/svc/g1");

    let back =
      NameGraph::decode_with_base("http://vital.ai/graph", &g.encode()).unwrap();
    assert_eq!(back, g);
    assert!(!back.is_global());
    assert_eq!(back.account_id(), None);
  }

  #[test]
  fn account_needs_a_namespace_segment_before_it() {
    let bare = NameGraph::decode("http://x/ns/g").unwrap();
    assert_eq!(bare.namespace(), "ns");
    assert_eq!(bare.account_id(), None);
    assert!(!bare.is_global());
    assert_eq!(bare, NameGraph::new("http://x", "ns", "g").unwrap());

    let owned = NameGraph::decode("http://x/ns/acct/g").unwrap();
    assert_eq!(owned.namespace(), "ns");
    assert_eq!(owned.account_id(), Some("acct"));
    assert!(!owned.is_global());
    assert_eq!(owned.encode(), "http://x/ns/acct/g");
  }

  #[test]
  fn global_with_account_round_trips() {
    let g = NameGraph::global("http://x", "ns", "g2")
      .unwrap()
      .with_account("a1")
      .unwrap();
    assert_eq!(g.encode(), "http://x/ns/GLOBAL/a1/g2");

    let back = NameGraph::decode("http://x/ns/GLOBAL/a1/g2").unwrap();
    assert_eq!(back, g);
    assert_eq!(back.base_uri(), "http://x");
    assert_eq!(back.namespace(), "ns");
    assert_eq!(back.account_id(), Some("a1"));
    assert_eq!(back.graph_id(), "g2");
    assert!(back.is_global());
  }

  #[test]
  fn every_pattern_round_trips() {
    let cases = [
      NameGraph::new("https://example.org", "ns", "g").unwrap(),
      NameGraph::global("https://example.org", "ns", "g").unwrap(),
      NameGraph::new("https://example.org", "ns", "g")
        .unwrap()
        .with_account("acct")
        .unwrap(),
      NameGraph::global("https://example.org", "a/b", "g")
        .unwrap()
        .with_account("acct")
        .unwrap(),
      NameGraph::new("https://example.org:8443", "a/b", "g")
        .unwrap()
        .with_account("acct")
        .unwrap(),
    ];
    for g in cases {
      let encoded = g.encode();
      assert_eq!(NameGraph::decode(&encoded).unwrap(), g, "{encoded}");
      assert_eq!(NameGraph::decode(&encoded).unwrap().encode(), encoded);
    }
  }

  #[test]
  fn graph_id_global_is_rejected() {
    assert_eq!(
      NameGraph::decode("http://x/ns/GLOBAL"),
      Err(Error::GraphIdIsGlobal("http://x/ns/GLOBAL".into()))
    );
    assert!(NameGraph::new("http://x", "ns", "GLOBAL").is_err());
  }

  #[test]
  fn account_global_is_rejected() {
    assert!(matches!(
      NameGraph::decode("http://x/ns/GLOBAL/GLOBAL/g"),
      Err(Error::AccountIsGlobal(_))
    ));
    assert!(
      NameGraph::new("http://x", "ns", "g")
        .unwrap()
        .with_account(GLOBAL)
        .is_err()
    );
  }

  #[test]
  fn malformed_uris() {
    assert!(matches!(
      NameGraph::decode("x/ns/g"),
      Err(Error::MissingScheme(_))
    ));
    assert!(matches!(
      NameGraph::decode("http:///ns/g"),
      Err(Error::MissingAuthority(_))
    ));
    assert!(matches!(
      NameGraph::decode("http://x/GLOBAL/g"),
      Err(Error::EmptyNamespace(_))
    ));
    assert!(matches!(
      NameGraph::decode("http://x/g"),
      Err(Error::EmptyNamespace(_))
    ));
    assert!(matches!(
      NameGraph::decode("http://x"),
      Err(Error::TooFewSegments(_))
    ));
    assert!(matches!(
      NameGraph::decode_with_base("http://y", "http://x/ns/g"),
      Err(Error::BaseMismatch { .. })
    ));
    assert!(matches!(
      NameGraph::decode_with_base("http://x/graph", "http://x/graphs/ns/g"),
      Err(Error::BaseMismatch { .. })
    ));
  }

  #[test]
  fn string_forms() {
    let g: NameGraph = "http://x/ns/acct/g".parse().unwrap();
    assert_eq!(g.account_id(), Some("acct"));
    assert_eq!(g.to_string(), "http://x/ns/acct/g");

    let json = serde_json::to_string(&g).unwrap();
    assert_eq!(json, "\"http://x/ns/acct/g\"");
    let back: NameGraph = serde_json::from_str(&json).unwrap();
    assert_eq!(back, g);
    assert!(serde_json::from_str::<NameGraph>("\"http://x/ns/GLOBAL\"").is_err());
  }
}
