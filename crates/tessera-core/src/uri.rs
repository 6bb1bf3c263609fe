//! IRI helpers: absolute-reference detection and name splitting.

/// Whether `s` parses as an absolute reference.
///
/// `http`, `https`, `ftp`, `mailto` and `file` must carry a non-empty
/// authority (`scheme://authority`); `urn` and `data` must carry a path; any
/// other scheme needs at least a path or an authority.
pub fn is_absolute_uri(s: &str) -> bool {
  let Some((scheme, rest)) = s.split_once(':') else {
    return false;
  };
  if !is_scheme(scheme) || s.chars().any(|c| c.is_whitespace() || c.is_control())
  {
    return false;
  }

  let (authority, path) = match rest.strip_prefix("//") {
    Some(after) => {
      let end = after.find(['/', '?', '#']).unwrap_or(after.len());
      (Some(&after[..end]), strip_query(&after[end..]))
    }
    None => (None, strip_query(rest)),
  };
  let has_authority = authority.is_some_and(|a| !a.is_empty());

  match scheme.to_ascii_lowercase().as_str() {
    "http" | "https" | "ftp" | "mailto" | "file" => has_authority,
    "urn" | "data" => !path.is_empty(),
    _ => has_authority || !path.is_empty(),
  }
}

fn is_scheme(scheme: &str) -> bool {
  let mut chars = scheme.chars();
  chars.next().is_some_and(|c| c.is_ascii_alphabetic())
    && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn strip_query(s: &str) -> &str {
  let end = s.find(['?', '#']).unwrap_or(s.len());
  &s[..end]
}

/// Split an IRI into `(namespace, local name)` at the last `#` or `/`.
///
/// The namespace keeps its trailing separator. An IRI with neither separator
/// is all local name.
pub fn split_iri(iri: &str) -> (&str, &str) {
  match iri.rfind(['#', '/']) {
    Some(pos) => (&iri[..=pos], &iri[pos + 1..]),
    None => ("", iri),
  }
}

/// The attribute name derived from a property's local name: a leading `has`
/// or `is` is dropped, then the first letter is lower-cased. A local name
/// that is nothing but the prefix is kept whole.
///
/// `hasName` → `name`, `isActive` → `active`, `history` → `tory`.
pub fn short_name(local_name: &str) -> String {
  let stripped = ["has", "is"]
    .iter()
    .find_map(|prefix| {
      local_name
        .strip_prefix(prefix)
        .filter(|rest| !rest.is_empty())
    })
    .unwrap_or(local_name);

  let mut chars = stripped.chars();
  match chars.next() {
    Some(first) => first.to_lowercase().chain(chars).collect(),
    None => String::new(),
  }
}
