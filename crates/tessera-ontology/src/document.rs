//! A single parsed schema document.

use std::{
  collections::{BTreeMap, BTreeSet},
  path::{Path, PathBuf},
};

use oxigraph::{
  io::{RdfFormat, RdfParser},
  model::{Subject, Term, TermRef, Triple},
};
use quick_xml::{Reader, events::Event};
use sha2::{Digest, Sha256};

use crate::{
  error::{Error, Result},
  loader::SchemaSource,
  terms::{OWL_IMPORTS, OWL_ONTOLOGY, OWL_VERSION_INFO, RDF_TYPE},
};

// ─── Format ──────────────────────────────────────────────────────────────────

/// Serialization of a schema file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
  /// `.owl`, `.rdf`, `.xml`
  RdfXml,
  /// `.ttl`
  Turtle,
  /// `.nt`
  NTriples,
}

impl SchemaFormat {
  pub fn from_path(path: &Path) -> Option<Self> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
      "owl" | "rdf" | "xml" => Some(Self::RdfXml),
      "ttl" => Some(Self::Turtle),
      "nt" => Some(Self::NTriples),
      _ => None,
    }
  }

  fn rdf_format(self) -> RdfFormat {
    match self {
      Self::RdfXml => RdfFormat::RdfXml,
      Self::Turtle => RdfFormat::Turtle,
      Self::NTriples => RdfFormat::NTriples,
    }
  }
}

// ─── Document ────────────────────────────────────────────────────────────────

/// One parsed schema file. Immutable once parsed.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
  pub module_id:    String,
  pub path:         PathBuf,
  pub format:       SchemaFormat,
  /// The single IRI declared with `rdf:type owl:Ontology`.
  pub ontology_iri: String,
  pub imports:      BTreeSet<String>,
  pub version_info: Option<String>,
  /// Namespace prefixes bound in the document header.
  pub prefixes:     BTreeMap<String, String>,
  pub triples:      Vec<Triple>,
  /// Hex SHA-256 of the raw file bytes.
  pub content_hash: String,
}

impl SchemaDocument {
  /// Read and parse the file named by `source`.
  pub fn load(source: &SchemaSource) -> Result<Self> {
    let format = SchemaFormat::from_path(&source.path)
      .ok_or_else(|| Error::UnsupportedFormat(source.path.clone()))?;
    let bytes = std::fs::read(&source.path).map_err(|e| Error::Io {
      path:   source.path.clone(),
      source: e,
    })?;
    Self::parse(&source.module_id, &source.path, format, &bytes)
  }

  /// Parse an in-memory document. `path` is only used for diagnostics.
  pub fn parse(
    module_id: &str,
    path: &Path,
    format: SchemaFormat,
    bytes: &[u8],
  ) -> Result<Self> {
    let triples = RdfParser::from_format(format.rdf_format())
      .for_reader(bytes)
      .map(|quad| {
        quad
          .map(|q| Triple::new(q.subject, q.predicate, q.object))
          .map_err(|e| Error::Rdf {
            path:    path.to_path_buf(),
            message: e.to_string(),
          })
      })
      .collect::<Result<Vec<_>>>()?;

    let prefixes = match format {
      SchemaFormat::RdfXml => xml_prefixes(path, bytes)?,
      SchemaFormat::Turtle => turtle_prefixes(bytes),
      SchemaFormat::NTriples => BTreeMap::new(),
    };

    let ontology_iri = declared_ontology(path, &triples)?;
    let about_ontology = |t: &&Triple| {
      matches!(&t.subject, Subject::NamedNode(n) if n.as_str() == ontology_iri)
    };

    let imports = triples
      .iter()
      .filter(about_ontology)
      .filter(|t| t.predicate.as_ref() == OWL_IMPORTS)
      .filter_map(|t| match &t.object {
        Term::NamedNode(n) => Some(n.as_str().to_string()),
        _ => None,
      })
      .collect();

    let version_info = triples
      .iter()
      .filter(about_ontology)
      .filter(|t| t.predicate.as_ref() == OWL_VERSION_INFO)
      .find_map(|t| match &t.object {
        Term::Literal(l) => Some(l.value().to_string()),
        _ => None,
      });

    Ok(Self {
      module_id: module_id.to_string(),
      path: path.to_path_buf(),
      format,
      ontology_iri,
      imports,
      version_info,
      prefixes,
      triples,
      content_hash: hex::encode(Sha256::digest(bytes)),
    })
  }
}

/// The one subject typed `owl:Ontology`.
fn declared_ontology(path: &Path, triples: &[Triple]) -> Result<String> {
  let iris: BTreeSet<&str> = triples
    .iter()
    .filter(|t| {
      t.predicate.as_ref() == RDF_TYPE
        && t.object.as_ref() == TermRef::NamedNode(OWL_ONTOLOGY)
    })
    .filter_map(|t| match &t.subject {
      Subject::NamedNode(n) => Some(n.as_str()),
      _ => None,
    })
    .collect();

  let mut iter = iris.iter();
  match (iter.next(), iter.next()) {
    (Some(iri), None) => Ok(iri.to_string()),
    (None, _) => Err(Error::MissingOntologyIri(path.to_path_buf())),
    (Some(_), Some(_)) => Err(Error::MultipleOntologyIris {
      path: path.to_path_buf(),
      iris: iris.iter().map(|s| s.to_string()).collect(),
    }),
  }
}

// ─── Prefix scanning ─────────────────────────────────────────────────────────

/// `xmlns` bindings on the root element of an RDF/XML document. The default
/// namespace is recorded under the empty prefix.
fn xml_prefixes(path: &Path, bytes: &[u8]) -> Result<BTreeMap<String, String>> {
  let xml_error = |message: String| Error::Xml {
    path: path.to_path_buf(),
    message,
  };

  let mut reader = Reader::from_reader(bytes);
  reader.config_mut().trim_text(true);
  let mut buf = Vec::new();

  loop {
    match reader.read_event_into(&mut buf) {
      Ok(Event::Start(ref e) | Event::Empty(ref e)) => {
        let mut prefixes = BTreeMap::new();
        for attr in e.attributes() {
          let attr = attr.map_err(|err| xml_error(err.to_string()))?;
          let key = attr.key.as_ref();
          let prefix = if key == b"xmlns" {
            ""
          } else if let Some(p) = key.strip_prefix(b"xmlns:") {
            std::str::from_utf8(p).map_err(|err| xml_error(err.to_string()))?
          } else {
            continue;
          };
          let value = attr
            .unescape_value()
            .map_err(|err| xml_error(err.to_string()))?;
          prefixes.insert(prefix.to_string(), value.into_owned());
        }
        return Ok(prefixes);
      }
      Ok(Event::Eof) => return Ok(BTreeMap::new()),
      Err(e) => return Err(xml_error(e.to_string())),
      _ => {}
    }
    buf.clear();
  }
}

/// `@prefix p: <iri> .` and `PREFIX p: <iri>` directives.
fn turtle_prefixes(bytes: &[u8]) -> BTreeMap<String, String> {
  let text = String::from_utf8_lossy(bytes);
  text
    .lines()
    .filter_map(|line| {
      let line = line.trim();
      let rest = match line.strip_prefix("@prefix") {
        Some(rest) => rest,
        None => line
          .get(..6)
          .filter(|head| head.eq_ignore_ascii_case("prefix"))
          .map(|_| &line[6..])?,
      };
      let (prefix, iri) = rest.trim().split_once(':')?;
      let iri = iri.trim().strip_prefix('<')?.split_once('>')?.0;
      Some((prefix.trim().to_string(), iri.to_string()))
    })
    .collect()
}
