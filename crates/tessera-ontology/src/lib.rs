//! Ontology loading and domain/range extraction.
//!
//! Pipeline:
//!   [`SchemaSource`] list
//!     └─ [`SchemaDocument::load`]   (parallel, one per file)
//!          └─ [`ImportGraph`]       → dependency order, cycle check
//!               └─ [`SchemaSet`]    → combined graph + namespaces
//!                    └─ [`DomainRange::extract`] → per-property facts
//!
//! A document that fails to parse is logged and skipped. An import cycle
//! fails the whole batch with [`Error::ImportCycle`].

pub mod document;
pub mod error;
pub mod extract;
pub mod loader;
pub mod resolver;
mod terms;

pub use document::{SchemaDocument, SchemaFormat};
pub use error::{Error, Result};
pub use extract::{
  ClassFacts, DomainRange, PropertyDescriptor, PropertyKind, PropertyRange,
  ValueType,
};
pub use loader::{LoadedOntology, OntologyLoader, SchemaSet, SchemaSource, load};
pub use resolver::ImportGraph;

#[cfg(test)]
pub(crate) mod test_helpers {
  use std::path::PathBuf;

  use crate::SchemaSource;

  pub(crate) const PREAMBLE: &str = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
         xmlns:owl="http://www.w3.org/2002/07/owl#"
         xmlns:xsd="http://www.w3.org/2001/XMLSchema#"
         xmlns:ex="http://example.org/"#;

  /// An RDF/XML ontology document with the given imports and body.
  pub(crate) fn rdf_xml(iri: &str, imports: &[&str], body: &str) -> String {
    let imports: String = imports
      .iter()
      .map(|i| format!("    <owl:imports rdf:resource=\"{i}\"/>\n"))
      .collect();
    format!(
      "{PREAMBLE}\">\n  <owl:Ontology rdf:about=\"{iri}\">\n{imports}  \
       </owl:Ontology>\n{body}\n</rdf:RDF>\n"
    )
  }

  /// Write `contents` to `dir/name` and return a source pointing at it.
  pub(crate) fn write_source(
    dir: &std::path::Path,
    name: &str,
    contents: &str,
  ) -> SchemaSource {
    let path: PathBuf = dir.join(name);
    std::fs::write(&path, contents).expect("write schema fixture");
    SchemaSource {
      module_id: name.trim_end_matches(".owl").to_string(),
      path,
    }
  }
}
